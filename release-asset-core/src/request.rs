//! Pure construction of the "create release asset" request: endpoint URL, headers, and
//! decoding of the platform's error bodies. No I/O happens here.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::contract::UploadError;

pub const GITHUB_JSON_MIME: HeaderValue = HeaderValue::from_static("application/vnd.github+json");
pub const API_VERSION_HEADER: HeaderName = HeaderName::from_static("x-github-api-version");
pub const API_VERSION: HeaderValue = HeaderValue::from_static("2022-11-28");

/// Environment variable holding the bearer credential.
pub const TOKEN_ENV: &str = "GH_TOKEN";

/// `{base_url}/repos/{owner}/{repo}/releases/{release_id}/assets?name={name}`
///
/// Any path already present on `base_url` is kept as a prefix. Segments are percent-encoded.
pub fn asset_url(
    base_url: &str,
    owner: &str,
    repo: &str,
    release_id: &str,
    name: &str,
) -> Result<Url, UploadError> {
    let mut url = Url::parse(base_url).map_err(|source| UploadError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;

    url.path_segments_mut()
        .map_err(|()| UploadError::BaseUrlCannotHavePath(base_url.to_string()))?
        .pop_if_empty()
        .extend(["repos", owner, repo, "releases", release_id, "assets"]);
    url.query_pairs_mut().append_pair("name", name);

    debug!(%url, "Built release asset URL");
    Ok(url)
}

/// Headers every upload carries. Authorization and length are added by the transport.
pub fn asset_headers(content_type: &str) -> Result<HeaderMap, UploadError> {
    let content_type =
        HeaderValue::from_str(content_type).map_err(|source| UploadError::InvalidHeader {
            name: "content-type",
            source,
        })?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, GITHUB_JSON_MIME);
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(API_VERSION_HEADER, API_VERSION);
    Ok(headers)
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    documentation_url: Option<String>,
}

/// Human-readable message from a non-2xx response body.
pub fn api_error_message(body: &[u8]) -> String {
    if let Ok(ApiErrorBody {
        message: Some(message),
        documentation_url,
    }) = serde_json::from_slice::<ApiErrorBody>(body)
    {
        return match documentation_url {
            Some(doc) => format!("{message} (see {doc})"),
            None => message,
        };
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "<empty response body>".to_string()
    } else {
        text.to_string()
    }
}
