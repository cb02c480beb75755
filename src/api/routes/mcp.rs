//! MCP Route
//!
//! - POST /mcp - One JSON-RPC message per request

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::state::AppState;

/// POST /mcp
///
/// Requests get the JSON-RPC response; notifications get 202 with no body.
pub async fn handle_message(State(state): State<Arc<AppState>>, body: String) -> Response {
    match state.mcp.handle_line(&body).await {
        Some(text) => ([(header::CONTENT_TYPE, "application/json")], text).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
