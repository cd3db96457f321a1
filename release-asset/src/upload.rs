//! # Uploader integration (CLI <-> Core)
//!
//! This module wires the [`AssetUploader`] trait from `release-asset-core` to a real
//! reqwest client. [`ReleaseClient`] streams the local file as the request body, adds the
//! bearer credential when one is configured, and maps every failure to [`UploadError`].
//!
//! - Construct it with [`ReleaseClient::from_config`] (or [`ReleaseClient::new`] in tests).
//! - No timeout and no retry are configured; one call is one request.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::CONTENT_LENGTH;
use sha2::{Digest, Sha256};
use tokio_util::io::ReaderStream;

pub use release_asset_core::contract::{NewReleaseAsset, ReleaseAsset, UploadError};

use release_asset_core::config::UploadConfig;
use release_asset_core::contract::AssetUploader;
use release_asset_core::request::{api_error_message, asset_headers, asset_url};

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct ReleaseClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ReleaseClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, UploadError> {
        let base_url = base_url.into();
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build HTTP client");
                UploadError::Client(e)
            })?;
        tracing::info!(
            base_url = %base_url,
            token_set = token.is_some(),
            "Initialized ReleaseClient"
        );
        Ok(ReleaseClient {
            http,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &UploadConfig) -> Result<Self, UploadError> {
        Self::new(config.base_url(), config.token.clone())
    }
}

#[async_trait]
impl AssetUploader for ReleaseClient {
    async fn upload_asset<'a>(
        &self,
        req: NewReleaseAsset<'a>,
    ) -> Result<ReleaseAsset, UploadError> {
        let url = asset_url(
            &self.base_url,
            req.owner,
            req.repo,
            req.release_id,
            req.name,
        )?;
        let headers = asset_headers(req.content_type)?;

        let file_error = |source| UploadError::File {
            path: req.path.to_path_buf(),
            source,
        };
        let file = tokio::fs::File::open(req.path).await.map_err(|e| {
            tracing::error!(error = %e, path = %req.path.display(), "Failed to open asset file");
            file_error(e)
        })?;
        let size = file.metadata().await.map_err(file_error)?.len();

        // Hashes the bytes as they go out so the file is only read once.
        let hasher = Arc::new(Mutex::new(Sha256::new()));
        let body = {
            let hasher = Arc::clone(&hasher);
            ReaderStream::new(file).inspect_ok(move |chunk| {
                if let Ok(mut hasher) = hasher.lock() {
                    hasher.update(chunk);
                }
            })
        };

        tracing::info!(
            %url,
            path = %req.path.display(),
            size,
            content_type = req.content_type,
            "Uploading release asset"
        );

        let mut request = self
            .http
            .post(url.clone())
            .headers(headers)
            .header(CONTENT_LENGTH, size)
            .body(reqwest::Body::wrap_stream(body));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let transport_error = |source| UploadError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, %url, "Release asset request failed");
            transport_error(e)
        })?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = api_error_message(&body);
            tracing::error!(
                status = status.as_u16(),
                %message,
                "API rejected release asset upload"
            );
            return Err(UploadError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let asset = match serde_json::from_slice::<ReleaseAsset>(&body) {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    status = status.as_u16(),
                    "Upload accepted but response body is not a release asset"
                );
                ReleaseAsset {
                    name: req.name.to_string(),
                    ..ReleaseAsset::default()
                }
            }
        };

        let local_digest = hasher
            .lock()
            .map(|hasher| format!("sha256:{:x}", hasher.clone().finalize()))
            .ok();
        if let (Some(remote), Some(local)) = (asset.digest.as_deref(), local_digest.as_deref()) {
            if !remote.eq_ignore_ascii_case(local) {
                tracing::warn!(remote, local, "Digest reported by API differs from bytes sent");
            }
        }

        tracing::info!(
            asset_id = ?asset.id,
            name = %asset.name,
            state = ?asset.state,
            download_url = ?asset.browser_download_url,
            "Successfully uploaded release asset"
        );
        Ok(asset)
    }
}
