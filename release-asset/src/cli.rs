//! # release-asset CLI interface
//!
//! Argument parsing and the async entrypoint. The upload contract, request construction
//! and error type live in `release-asset-core`; the transport lives in [`crate::upload`].
//!
//! - For command-line users: `release-asset --help`.
//! - For programmatic/integration use: call [`run`] with a constructed [`Cli`], or
//!   [`upload_with`] with any [`AssetUploader`] (e.g. a mock).
use crate::load_config::load_config;
use crate::upload::ReleaseClient;
use anyhow::{Context, Result};
use clap::Parser;
use release_asset_core::config::UploadConfig;
use release_asset_core::contract::{AssetUploader, ReleaseAsset};

/// Marker printed on stdout once the platform has accepted the asset.
pub const FINISHED: &str = "finished";

/// Upload a local file as an asset of an existing release.
///
/// The bearer token is read from the GH_TOKEN environment variable.
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "release-asset",
    version,
    about = "Upload a local file as a release asset"
)]
pub struct Cli {
    /// Owner of the repository
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Identifier of the release to attach the asset to
    pub release_id: String,
    /// Local file to upload; also used as the asset name
    pub filename: String,
    /// Value of the Content-Type header, e.g. application/java-archive
    pub content_type: String,
    /// API host, e.g. uploads.github.com (https is assumed unless a scheme is given)
    pub api_host: String,
}

/// Performs the single upload described by `config` through `uploader`.
pub async fn upload_with<U>(config: &UploadConfig, uploader: &U) -> Result<ReleaseAsset>
where
    U: AssetUploader + ?Sized,
{
    uploader
        .upload_asset(config.new_asset())
        .await
        .with_context(|| {
            format!(
                "uploading {} to {}/{} release {}",
                config.filename, config.owner, config.repo, config.release_id
            )
        })
}

async fn upload_from_cli(cli: &Cli) -> Result<ReleaseAsset> {
    let config = load_config(cli)?;
    let client = ReleaseClient::from_config(&config).context("building release API client")?;
    upload_with(&config, &client).await
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("upload_started");

    let result = match upload_from_cli(&cli).await {
        Ok(asset) => {
            tracing::info!(name = %asset.name, asset_id = ?asset.id, "Upload complete");
            println!("{FINISHED}");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Upload failed");
            Err(e)
        }
    };

    let exit_span = tracing::info_span!("exit");
    exit_span.in_scope(|| {
        tracing::info!(success = result.is_ok(), "emitting exit");
    });

    result
}
