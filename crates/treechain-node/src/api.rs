//! HTTP API for CoreNode.

use crate::engine::{SyncOutcome, now_ms};
use crate::node::CoreState;
use crate::ws::ws_dashboard_handler;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use treechain_core::{Glyph, LogEntry, Node, Witness};

type AppState = Arc<CoreState>;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    // CORS layer for browser dashboards
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/", get(health))
        // Nodes
        .route("/api/nodes", get(list_nodes))
        .route("/api/nodes", post(add_node))
        // Witnesses
        .route("/api/witnesses", get(list_witnesses))
        // Logs
        .route("/api/logs", get(list_logs))
        .route("/api/logs", post(post_log))
        // Engine operations
        .route("/api/sync", post(sync_nodes))
        .route("/api/blaze", post(blaze_network))
        .route("/api/purge", post(purge_corrupted))
        // Glyphs
        .route("/api/glyphs", get(list_glyphs))
        .route("/api/glyphs", post(generate_glyph))
        // WebSocket for the live aggregate stream
        .route("/ws/dashboard", get(ws_dashboard_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// --- Health ---

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    time: u64,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "TreeChain CoreNode active",
        time: now_ms() / 1000,
    })
}

// --- Node endpoints ---

async fn list_nodes(State(state): State<AppState>) -> Result<Json<Vec<Node>>, StatusCode> {
    let nodes = state
        .storage
        .list_nodes()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(nodes))
}

#[derive(Debug, Default, Deserialize)]
struct AddNodeRequest {
    #[serde(rename = "type")]
    node_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddNodeResponse {
    status: &'static str,
    node: Node,
}

async fn add_node(
    State(state): State<AppState>,
    body: Option<Json<AddNodeRequest>>,
) -> Result<Json<AddNodeResponse>, StatusCode> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let node_type = req.node_type.unwrap_or_else(|| "GenericNode".to_string());

    let node = state
        .engine
        .create_node(&node_type)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(AddNodeResponse {
        status: "added",
        node,
    }))
}

// --- Witness endpoints ---

async fn list_witnesses(State(state): State<AppState>) -> Result<Json<Vec<Witness>>, StatusCode> {
    let witnesses = state
        .storage
        .list_witnesses()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(witnesses))
}

// --- Log endpoints ---

/// The 50 most recent entries, oldest first.
async fn list_logs(State(state): State<AppState>) -> Result<Json<Vec<LogEntry>>, StatusCode> {
    let mut logs = state
        .storage
        .recent_logs(50)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    logs.reverse();
    Ok(Json(logs))
}

#[derive(Debug, Default, Deserialize)]
struct PostLogRequest {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct PostLogResponse {
    status: &'static str,
    log: LogEntry,
}

async fn post_log(
    State(state): State<AppState>,
    body: Option<Json<PostLogRequest>>,
) -> Result<Json<PostLogResponse>, StatusCode> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let message = req.message.unwrap_or_else(|| "no content".to_string());

    let log = state
        .engine
        .post_log(message)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(PostLogResponse {
        status: "logged",
        log,
    }))
}

// --- Engine operations ---

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum SyncResponse {
    Synced {
        status: &'static str,
        avg_resonance: f64,
    },
    NoNodes {
        status: &'static str,
    },
}

async fn sync_nodes(State(state): State<AppState>) -> Result<Json<SyncResponse>, StatusCode> {
    match state.engine.sync() {
        Ok(SyncOutcome::Synced { avg_resonance }) => Ok(Json(SyncResponse::Synced {
            status: "synced",
            avg_resonance,
        })),
        Ok(SyncOutcome::NoNodes) => Ok(Json(SyncResponse::NoNodes {
            status: "no nodes to sync",
        })),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[derive(Debug, Serialize)]
struct BlazeResponse {
    status: &'static str,
    nodes: usize,
}

async fn blaze_network(State(state): State<AppState>) -> Result<Json<BlazeResponse>, StatusCode> {
    let nodes = state
        .engine
        .blaze()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(BlazeResponse {
        status: "blazed",
        nodes,
    }))
}

#[derive(Debug, Serialize)]
struct PurgeResponse {
    status: &'static str,
    deleted: usize,
}

async fn purge_corrupted(State(state): State<AppState>) -> Result<Json<PurgeResponse>, StatusCode> {
    let deleted = state
        .engine
        .purge()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(PurgeResponse {
        status: "purged",
        deleted,
    }))
}

// --- Glyph endpoints ---

#[derive(Debug, Serialize)]
struct GlyphResponse {
    status: &'static str,
    glyph: Glyph,
}

async fn generate_glyph(State(state): State<AppState>) -> Result<Json<GlyphResponse>, StatusCode> {
    let glyph = state
        .engine
        .emit_glyph()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(GlyphResponse {
        status: "created",
        glyph,
    }))
}

/// The 25 most recent glyphs, newest first.
async fn list_glyphs(State(state): State<AppState>) -> Result<Json<Vec<Glyph>>, StatusCode> {
    let glyphs = state
        .storage
        .recent_glyphs(25)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(glyphs))
}
