//! Fake media server for end-to-end tests
//!
//! Serves canned JSON payloads keyed by request path. Tests can switch it to
//! failing, slow or garbage modes, and read how many requests it received.

use super::constants::*;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Debug)]
pub enum UpstreamMode {
    /// Answer from the canned payloads, 404 for unknown paths
    Normal,
    /// Answer every request with this status
    Failing(u16),
    /// Sleep before answering normally
    Slow(Duration),
    /// Answer 200 with a body that is not JSON
    Garbage,
}

struct UpstreamState {
    mode: Mutex<UpstreamMode>,
    payloads: Mutex<HashMap<String, Value>>,
    hits: AtomicUsize,
    last_token: Mutex<Option<String>>,
}

pub struct FakePlex {
    pub base_url: String,
    state: Arc<UpstreamState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

async fn answer(State(state): State<Arc<UpstreamState>>, uri: Uri, headers: HeaderMap) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_token.lock().unwrap() = headers
        .get("X-Plex-Token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mode = state.mode.lock().unwrap().clone();
    match mode {
        UpstreamMode::Failing(status) => {
            return StatusCode::from_u16(status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
        UpstreamMode::Garbage => return "<html>not json</html>".into_response(),
        UpstreamMode::Slow(delay) => tokio::time::sleep(delay).await,
        UpstreamMode::Normal => {}
    }

    let payload = state.payloads.lock().unwrap().get(uri.path()).cloned();
    match payload {
        Some(body) => axum::Json(body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

impl FakePlex {
    /// Spawns the fake server on a random port with the default payloads.
    pub async fn spawn() -> Self {
        let state = Arc::new(UpstreamState {
            mode: Mutex::new(UpstreamMode::Normal),
            payloads: Mutex::new(default_payloads()),
            hits: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        });

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake upstream");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let app = Router::new().fallback(answer).with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake upstream failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn set_mode(&self, mode: UpstreamMode) {
        *self.state.mode.lock().unwrap() = mode;
    }

    pub fn set_payload(&self, path: &str, payload: Value) {
        self.state
            .payloads
            .lock()
            .unwrap()
            .insert(path.to_string(), payload);
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.state.last_token.lock().unwrap().clone()
    }
}

impl Drop for FakePlex {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn default_payloads() -> HashMap<String, Value> {
    let mut payloads = HashMap::new();

    payloads.insert(
        "/library/all".to_string(),
        json!({
            "MediaContainer": {
                "size": 2,
                "totalSize": UPSTREAM_MOVIE_TOTAL,
                "Metadata": [
                    {
                        "type": "movie",
                        "ratingKey": UPSTREAM_MOVIE_1_ID.to_string(),
                        "title": "Heat",
                        "year": 1995,
                        "duration": 10_200_000,
                        "updatedAt": 1_714_557_600,
                        "Media": [{
                            "videoCodec": "h264",
                            "videoResolution": "1080",
                            "container": "mkv",
                            "Part": [{"size": 5_200_000_000u64, "container": "mkv"}]
                        }]
                    },
                    {"type": "movie", "ratingKey": UPSTREAM_MOVIE_2_ID, "title": "Ronin"}
                ]
            }
        }),
    );

    // XML-derived shape: attributes under `$`, single item not wrapped in a list
    payloads.insert(
        format!("/library/metadata/{}", UPSTREAM_MOVIE_1_ID),
        json!({
            "MediaContainer": {
                "Video": {
                    "$": {
                        "type": "movie",
                        "ratingKey": UPSTREAM_MOVIE_1_ID.to_string(),
                        "title": "Heat",
                        "year": "1995"
                    }
                }
            }
        }),
    );

    payloads.insert(
        "/search".to_string(),
        json!({
            "MediaContainer": {
                "Metadata": [
                    {"type": "movie", "ratingKey": 600, "title": "Heat"},
                    {"type": "clip", "ratingKey": 601, "title": "Heat trailer"},
                    {"type": "artist", "ratingKey": 602, "title": "Heatwave"}
                ]
            }
        }),
    );

    payloads
}
