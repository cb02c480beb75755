//! Tool Routes
//!
//! - GET /api/v1/tools - List tools
//! - POST /api/v1/tools/suggest_settings - Run the settings analysis

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{SuggestSettingsRequest, ToolResponse};
use crate::api::state::AppState;
use crate::mcp::{NightscoutTools, ToolDescriptor, DEFAULT_HOURS};

/// GET /api/v1/tools
pub async fn list_tools() -> Json<Vec<ToolDescriptor>> {
    Json(NightscoutTools::list_tools())
}

/// POST /api/v1/tools/suggest_settings
///
/// Always answers 200; fetch failures are reported in `text`.
pub async fn suggest_settings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestSettingsRequest>,
) -> Json<ToolResponse> {
    let hours = req.hours.unwrap_or(DEFAULT_HOURS);
    let text = state.tools.suggest_settings(hours).await;

    Json(ToolResponse { text })
}
