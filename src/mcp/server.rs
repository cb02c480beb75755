//! MCP Server
//!
//! Dispatches JSON-RPC requests to the Nightscout tools and resources, and
//! runs the newline-delimited stdio transport.

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::jsonrpc::{
    JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR, RESOURCE_NOT_FOUND,
};
use super::tools::{NightscoutTools, Resource, ToolError};

/// MCP protocol revision we implement
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported in `initialize`
pub const SERVER_NAME: &str = "Nightscout";

/// MCP request dispatcher
#[derive(Clone)]
pub struct McpServer {
    tools: Arc<NightscoutTools>,
}

impl McpServer {
    pub fn new(tools: Arc<NightscoutTools>) -> Self {
        Self { tools }
    }

    /// Handle one request; notifications yield no response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "jsonrpc must be \"2.0\"",
            ));
        }

        if request.is_notification() {
            tracing::debug!(method = %request.method, "Received notification");
            return None;
        }

        let id = request.id.clone();
        let params = request.params.unwrap_or(Value::Null);

        tracing::debug!(method = %request.method, "Handling MCP request");

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, initialize_result()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                json!({ "tools": NightscoutTools::list_tools() }),
            ),
            "resources/list" => JsonRpcResponse::success(
                id,
                json!({ "resources": NightscoutTools::list_resources() }),
            ),
            "tools/call" => match self.call_tool(&params).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => error_response(id, &e),
            },
            "resources/read" => match self.read_resource(&params).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => error_response(id, &e),
            },
            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };

        Some(response)
    }

    /// Handle one raw JSON line; returns the serialized response, if any
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await?,
            Err(e) => {
                tracing::warn!("Invalid JSON-RPC message: {}", e);
                JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e))
            }
        };

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                None
            }
        }
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until EOF
    pub async fn run_stdio(&self) -> std::io::Result<()> {
        tracing::info!("MCP stdio transport ready");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line).await {
                stdout.write_all(response.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }

        tracing::info!("stdin closed, MCP server exiting");
        Ok(())
    }

    async fn call_tool(&self, params: &Value) -> Result<Value, ToolError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("missing tool name".to_string()))?;
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let text = self.tools.call_tool(name, &arguments).await?;

        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "isError": false
        }))
    }

    async fn read_resource(&self, params: &Value) -> Result<Value, ToolError> {
        let uri = params
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("missing resource uri".to_string()))?;
        let resource =
            Resource::from_uri(uri).ok_or_else(|| ToolError::UnknownResource(uri.to_string()))?;

        let text = self.tools.read_resource(resource).await?;

        Ok(json!({
            "contents": [{
                "uri": resource.uri(),
                "mimeType": "application/json",
                "text": text
            }]
        }))
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {},
            "resources": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn error_response(id: Option<Value>, error: &ToolError) -> JsonRpcResponse {
    let code = match error {
        ToolError::UnknownTool(_) | ToolError::InvalidArguments(_) => INVALID_PARAMS,
        ToolError::UnknownResource(_) => RESOURCE_NOT_FOUND,
        ToolError::Nightscout(_) | ToolError::Encode(_) => INTERNAL_ERROR,
    };
    JsonRpcResponse::error(id, code, error.to_string())
}
