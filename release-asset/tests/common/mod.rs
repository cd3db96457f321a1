#![allow(dead_code)]
//! Local stand-in for the release asset API: records every request it receives and answers
//! the way the hosting platform does.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use sha2::{Digest, Sha256};

pub const TEST_TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// How the server answers an authorized request.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// 201 with a JSON asset whose digest matches the received body.
    Asset,
    /// 201 with a JSON asset whose digest does not match.
    WrongDigest,
    /// 201 with a body that is not JSON.
    PlainText,
    /// 422 with a platform-style validation error.
    AlreadyExists,
}

#[derive(Clone)]
struct ServerState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    reply: Reply,
}

pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start(reply: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            requests: requests.clone(),
            reply,
        };
        let app = Router::new().fallback(capture).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let addr = listener.local_addr().expect("test server address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });

        TestServer {
            base_url: format!("http://{addr}"),
            requests,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn capture(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"));

    let id = {
        let mut requests = state.requests.lock().unwrap();
        requests.push(CapturedRequest {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers: headers.clone(),
            body: body.to_vec(),
        });
        requests.len() as u64
    };

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "message": "Bad credentials",
                "documentation_url": "https://docs.github.com/rest",
            })),
        )
            .into_response();
    }

    let name = params.get("name").cloned().unwrap_or_default();
    let digest = format!("sha256:{:x}", Sha256::digest(&body));

    match state.reply {
        Reply::Asset | Reply::WrongDigest => {
            let digest = match state.reply {
                Reply::WrongDigest => format!("sha256:{}", "0".repeat(64)),
                _ => digest,
            };
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": id,
                    "name": name,
                    "label": "",
                    "content_type": headers.get("content-type").and_then(|v| v.to_str().ok()),
                    "state": "uploaded",
                    "size": body.len(),
                    "digest": digest,
                    "url": format!("https://api.github.com/repos/acme/widgets/releases/assets/{id}"),
                    "browser_download_url": format!("https://github.com/acme/widgets/releases/download/v1/{name}"),
                })),
            )
                .into_response()
        }
        Reply::PlainText => (StatusCode::CREATED, "ok").into_response(),
        Reply::AlreadyExists => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "Validation Failed",
                "errors": [{ "resource": "ReleaseAsset", "code": "already_exists", "field": "name" }],
            })),
        )
            .into_response(),
    }
}
