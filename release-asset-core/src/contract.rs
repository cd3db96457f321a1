//! # contract: interface for uploading a release asset
//!
//! This module defines a single trait (`AssetUploader`) and the plain data types passed
//! across it, plus the [`UploadError`] every implementation returns.
//!
//! ## Interface & Extensibility
//! - Implement the [`AssetUploader`] trait for a concrete transport (the CLI crate ships a reqwest client).
//! - The single method is async and performs exactly one upload; there is no retry.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate deterministic mocks for unit/integration tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

/// Everything needed to upload one local file to one release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewReleaseAsset<'a> {
    /// Account or organisation owning the repository.
    pub owner: &'a str,
    /// Repository name.
    pub repo: &'a str,
    /// Identifier of an existing release.
    pub release_id: &'a str,
    /// Local file to stream as the request body.
    pub path: &'a Path,
    /// Display name of the asset, sent as the `name` query parameter.
    pub name: &'a str,
    /// Sent verbatim as the `Content-Type` header.
    pub content_type: &'a str,
}

/// The asset as returned by the platform after a successful upload.
///
/// Every field is optional or defaulted so that partial bodies still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    /// `sha256:<hex>` when reported by the platform.
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

/// Failure of an upload. Callers map every variant to the same non-zero exit status.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid API base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API base URL {0:?} cannot carry a path")]
    BaseUrlCannotHavePath(String),

    #[error("invalid value for header {name}: {source}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("failed to read asset file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API rejected upload with status {status}: {message}")]
    Api { status: u16, message: String },
}

/// Trait for uploading a release asset.
/// The implementor is responsible for connecting to the hosting platform.
///
/// The trait is implemented by real clients and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Upload the file named in `req` as a new asset of the release.
    ///
    /// Exactly one request is sent. A repeated call creates another asset.
    async fn upload_asset<'a>(&self, req: NewReleaseAsset<'a>)
        -> Result<ReleaseAsset, UploadError>;
}
