//! Shared fixtures: a mock upstream forecast server and request helpers.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, Uri},
    response::Response,
};
use marine_forecast_proxy::config::ProxyConfig;
use marine_forecast_proxy::state::AppState;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// A request the mock upstream saw: path and user agent.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub user_agent: Option<String>,
}

pub struct MockUpstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

/// Start an upstream that answers every GET with `status` and `body`.
pub async fn start_upstream(status: StatusCode, body: &'static str) -> MockUpstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let app = {
        let hits = hits.clone();
        let seen = seen.clone();
        Router::new().fallback(move |uri: Uri, headers: HeaderMap| {
            let hits = hits.clone();
            let seen = seen.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                seen.lock().unwrap().push(SeenRequest {
                    path: uri.path().to_string(),
                    user_agent: headers
                        .get("user-agent")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                });
                (status, body)
            }
        })
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{}/data/forecasts/marine/coastal", addr),
        hits,
        seen,
    }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn state_for(upstream_base: String) -> Arc<AppState> {
    let config = ProxyConfig {
        upstream_base,
        ..ProxyConfig::default()
    };
    Arc::new(AppState::new(config).unwrap())
}

pub async fn send(
    state: &Arc<AppState>,
    method: &str,
    uri: &str,
    client: &str,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", client)
        .body(Body::empty())
        .unwrap();

    marine_forecast_proxy::app(state.clone())
        .oneshot(request)
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
