//! Resource Routes
//!
//! - GET /api/v1/resources - List resources
//! - GET /api/v1/resources/:name - Raw Nightscout payload as pretty JSON

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::mcp::{NightscoutTools, Resource, ResourceDescriptor};

/// GET /api/v1/resources
pub async fn list_resources() -> Json<Vec<ResourceDescriptor>> {
    Json(NightscoutTools::list_resources())
}

/// GET /api/v1/resources/:name
///
/// `name` is one of `entries`, `treatments`, `profile`, `device_status`.
pub async fn read_resource(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let resource = Resource::from_name(&name)
        .ok_or_else(|| ApiError::NotFound(format!("Resource {} not found", name)))?;

    let text = state.tools.read_resource(resource).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], text))
}
