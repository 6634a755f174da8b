//! Mock PokeAPI server for testing the API client.

#![allow(dead_code)]

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::routing::any;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A canned response for one route.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay_ms: u64,
}

impl MockResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay_ms: 0,
        }
    }

    pub fn error(status: u16) -> Self {
        Self {
            status,
            body: r#"{"detail": "Not found."}"#.to_string(),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }
}

#[derive(Clone)]
struct MockState {
    routes: Arc<Mutex<HashMap<String, MockResponse>>>,
    hits: Arc<Mutex<Vec<String>>>,
}

/// Mock PokeAPI. Unrouted paths answer 404.
pub struct MockApi {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockApi {
    pub async fn start() -> Self {
        let state = MockState {
            routes: Arc::new(Mutex::new(HashMap::new())),
            hits: Arc::new(Mutex::new(Vec::new())),
        };

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/{*path}", any(handle_request))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Base URL to put in `ApiConfig::base_url`.
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v2", self.addr)
    }

    /// Route `path_and_query` (e.g. "/api/v2/pokemon/pikachu") to `resp`.
    pub async fn route(&self, path_and_query: &str, resp: MockResponse) {
        self.state
            .routes
            .lock()
            .await
            .insert(path_and_query.to_string(), resp);
    }

    /// Serve a minimal detail record at `/api/v2/pokemon/{name}`.
    pub async fn add_pokemon(&self, id: u32, name: &str, types: &[&str]) {
        self.route(
            &format!("/api/v2/pokemon/{}", name),
            MockResponse::json(pokemon_json(id, name, types)),
        )
        .await;
    }

    /// Every path_and_query requested so far.
    pub async fn hits(&self) -> Vec<String> {
        self.state.hits.lock().await.clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

pub fn pokemon_json(id: u32, name: &str, types: &[&str]) -> String {
    let types: Vec<serde_json::Value> = types
        .iter()
        .enumerate()
        .map(|(i, t)| serde_json::json!({"slot": i + 1, "type": {"name": t}}))
        .collect();
    serde_json::json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "types": types,
        "sprites": {
            "other": {
                "official-artwork": {
                    "front_default": format!("https://img.example/{}.png", id)
                }
            }
        }
    })
    .to_string()
}

/// List page body whose entries point back at this mock.
pub fn list_json(api: &MockApi, names: &[&str], next: Option<&str>) -> String {
    let results: Vec<serde_json::Value> = names
        .iter()
        .map(|n| serde_json::json!({"name": n, "url": format!("{}/pokemon/{}", api.base_url(), n)}))
        .collect();
    serde_json::json!({
        "count": names.len(),
        "next": next,
        "previous": null,
        "results": results,
    })
    .to_string()
}

async fn handle_request(State(state): State<MockState>, req: Request<Body>) -> Response<Body> {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    state.hits.lock().await.push(path_and_query.clone());

    let mock_resp = {
        let routes = state.routes.lock().await;
        routes
            .get(&path_and_query)
            .or_else(|| routes.get(req.uri().path()))
            .cloned()
    }
    .unwrap_or_else(|| MockResponse::error(404));

    if mock_resp.delay_ms > 0 {
        tokio::time::sleep(tokio::time::Duration::from_millis(mock_resp.delay_ms)).await;
    }

    Response::builder()
        .status(StatusCode::from_u16(mock_resp.status).unwrap())
        .header("content-type", "application/json")
        .body(Body::from(mock_resp.body))
        .unwrap()
}
