//! Application State
//!
//! Shared state accessible by all HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::mcp::{McpServer, NightscoutTools};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Tool and resource handlers
    pub tools: Arc<NightscoutTools>,
    /// JSON-RPC dispatcher for `/mcp`
    pub mcp: McpServer,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state around the given tool handlers
    pub fn new(tools: Arc<NightscoutTools>) -> Self {
        Self {
            mcp: McpServer::new(Arc::clone(&tools)),
            tools,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
