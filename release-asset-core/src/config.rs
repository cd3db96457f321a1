use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::contract::NewReleaseAsset;

/// Scheme assumed when the API host is given without one.
pub const DEFAULT_SCHEME: &str = "https://";

/// The request-scoped values of a single upload, merged from arguments and environment.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub owner: String,
    pub repo: String,
    pub release_id: String,
    /// Local file, relative to the working directory. Also the asset name.
    pub filename: String,
    pub content_type: String,
    /// Host name of the API, optionally with an explicit scheme and base path.
    pub api_host: String,
    pub token: Option<String>,
}

impl UploadConfig {
    /// Base URL of the API. A bare host gets `https://`; an explicit scheme is kept.
    pub fn base_url(&self) -> String {
        if has_scheme(&self.api_host) {
            self.api_host.clone()
        } else {
            format!("{DEFAULT_SCHEME}{}", self.api_host)
        }
    }

    pub fn new_asset(&self) -> NewReleaseAsset<'_> {
        NewReleaseAsset {
            owner: &self.owner,
            repo: &self.repo,
            release_id: &self.release_id,
            path: Path::new(&self.filename),
            name: &self.filename,
            content_type: &self.content_type,
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            owner = %self.owner,
            repo = %self.repo,
            release_id = %self.release_id,
            filename = %self.filename,
            base_url = %self.base_url(),
            token_set = self.token.is_some(),
            "Loaded UploadConfig"
        );
        debug!(?self, "UploadConfig loaded (full debug)");
    }
}

fn has_scheme(host: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        host.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

// Hand-written so the token never reaches a log line.
impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("release_id", &self.release_id)
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("api_host", &self.api_host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
