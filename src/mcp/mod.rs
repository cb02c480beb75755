//! Model Context Protocol Layer
//!
//! Exposes the Nightscout client and the settings advisor to agents as MCP
//! resources and tools over JSON-RPC 2.0.
//!
//! ## Resources
//!
//! - `nightscout://entries` - latest 10 glucose entries
//! - `nightscout://treatments` - latest 10 treatments
//! - `nightscout://profile` - the profile payload
//! - `nightscout://device_status` - latest device status
//!
//! ## Tools
//!
//! - `suggest_settings(hours = 24)` - fetch `hours * 12` records of each kind
//!   and return suggestions as a JSON array, or an error message on fetch failure

pub mod jsonrpc;
mod server;
mod tools;

pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use server::{McpServer, PROTOCOL_VERSION, SERVER_NAME};
pub use tools::{
    NightscoutTools, Resource, ResourceDescriptor, ToolDescriptor, ToolError, DEFAULT_HOURS,
    RECORDS_PER_HOUR, SUGGEST_SETTINGS,
};
