use anyhow::{Context, Result};
use std::time::Duration;

use tracing::info;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{log_requests, state::*, ServerConfig};
use crate::model::MediaKind;

const DEFAULT_LIST_LIMIT: usize = 50;
const DEFAULT_SEARCH_LIMIT: usize = 20;
const DEFAULT_RECENT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 500;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: &'static str,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug, Default)]
struct PageParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
struct LimitParams {
    pub limit: Option<usize>,
}

fn clamp_limit(limit: Option<usize>, default: usize) -> usize {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
        .into_response()
}

fn parse_kind(kind: &str) -> Result<MediaKind, Response> {
    kind.parse::<MediaKind>().map_err(|e| bad_request(e.to_string()))
}

fn parse_id(id: &str) -> Result<i64, Response> {
    id.trim()
        .parse::<i64>()
        .map_err(|_| bad_request(format!("invalid id: {}", id)))
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
    };
    Json(stats)
}

async fn health(State(resolver): State<GuardedResolver>) -> impl IntoResponse {
    Json(resolver.health())
}

async fn list_by_kind(
    State(resolver): State<GuardedResolver>,
    Path(kind): Path<String>,
    Query(params): Query<PageParams>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT);
    let offset = params.offset.unwrap_or(0);
    Json(resolver.list_by_kind(kind, limit, offset).await).into_response()
}

async fn get_by_id(
    State(resolver): State<GuardedResolver>,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    let (kind, id) = match (parse_kind(&kind), parse_id(&id)) {
        (Ok(kind), Ok(id)) => (kind, id),
        (Err(response), _) | (_, Err(response)) => return response,
    };
    let resolved = resolver.get_by_id(kind, id).await;
    if resolved.data.is_none() {
        return (StatusCode::NOT_FOUND, Json(resolved)).into_response();
    }
    Json(resolved).into_response()
}

async fn list_children(
    State(resolver): State<GuardedResolver>,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    let (kind, id) = match (parse_kind(&kind), parse_id(&id)) {
        (Ok(kind), Ok(id)) => (kind, id),
        (Err(response), _) | (_, Err(response)) => return response,
    };
    if kind.child_kind().is_none() {
        return bad_request(format!("{} has no children", kind.as_str()));
    }
    Json(resolver.list_children(kind, id).await).into_response()
}

async fn search(
    State(resolver): State<GuardedResolver>,
    Query(params): Query<SearchParams>,
) -> Response {
    let text = params.q.unwrap_or_default();
    if text.trim().is_empty() {
        return bad_request("missing search query");
    }
    let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT);
    Json(resolver.search(&text, limit).await).into_response()
}

async fn list_recent(
    State(resolver): State<GuardedResolver>,
    Query(params): Query<LimitParams>,
) -> Response {
    let limit = clamp_limit(params.limit, DEFAULT_RECENT_LIMIT);
    Json(resolver.list_recent(limit).await).into_response()
}

pub fn make_app(config: ServerConfig, resolver: GuardedResolver) -> Router {
    let state = ServerState::new(config, resolver);

    let api_routes: Router = Router::new()
        .route("/health", get(health))
        .route("/library/{kind}", get(list_by_kind))
        .route("/library/{kind}/{id}", get(get_by_id))
        .route("/library/{kind}/{id}/children", get(list_children))
        .route("/search", get(search))
        .route("/recent", get(list_recent))
        .with_state(state.clone());

    Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(config: ServerConfig, resolver: GuardedResolver) -> Result<()> {
    let port = config.port;
    let app = make_app(config, resolver);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
