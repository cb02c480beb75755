//! Data Transfer Objects
//!
//! Request and response types for the HTTP endpoints.

use serde::{Deserialize, Serialize};

/// `POST /api/v1/tools/suggest_settings` request
#[derive(Debug, Default, Deserialize)]
pub struct SuggestSettingsRequest {
    /// Hours of history to analyze (default 24)
    #[serde(default)]
    pub hours: Option<u32>,
}

/// Result of a tool call
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Tool output: a JSON array of suggestions or an error message
    pub text: String,
}

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "ok" or "unreachable"
    pub nightscout: String,
    pub uptime_seconds: u64,
    pub version: String,
}
