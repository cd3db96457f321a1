#![doc = "release-asset-core: core logic library for release-asset."]

//! This crate contains the upload contract, configuration value and request construction
//! for publishing a single local file as a release asset.
//! Transport (the reqwest client) lives in the CLI crate and implements [`contract::AssetUploader`].
//!
//! # Usage
//! Add this as a dependency for anything that builds or performs a release asset upload.

pub mod config;
pub mod contract;
pub mod request;
