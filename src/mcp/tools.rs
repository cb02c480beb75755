//! Nightscout Tools & Resources
//!
//! The operations an agent can call: four read-only resources returning the
//! raw Nightscout payloads as pretty-printed JSON, and the `suggest_settings`
//! tool running the full fetch-and-analyze pipeline.

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::analysis::Advisor;
use crate::nightscout::{
    NightscoutClient, NightscoutError, DEFAULT_DEVICE_STATUS_COUNT, DEFAULT_ENTRY_COUNT,
    DEFAULT_TREATMENT_COUNT,
};

/// Name of the settings suggestion tool
pub const SUGGEST_SETTINGS: &str = "suggest_settings";

/// Default analysis window for `suggest_settings`
pub const DEFAULT_HOURS: u32 = 24;

/// Expected CGM records per hour (one every 5 minutes)
pub const RECORDS_PER_HOUR: u32 = 12;

/// Read-only Nightscout resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Entries,
    Treatments,
    Profile,
    DeviceStatus,
}

impl Resource {
    /// Every resource, in listing order
    pub const ALL: [Resource; 4] = [
        Resource::Entries,
        Resource::Treatments,
        Resource::Profile,
        Resource::DeviceStatus,
    ];

    /// Resource URI
    pub fn uri(self) -> &'static str {
        match self {
            Resource::Entries => "nightscout://entries",
            Resource::Treatments => "nightscout://treatments",
            Resource::Profile => "nightscout://profile",
            Resource::DeviceStatus => "nightscout://device_status",
        }
    }

    /// Short name, also used in the HTTP route
    pub fn name(self) -> &'static str {
        match self {
            Resource::Entries => "entries",
            Resource::Treatments => "treatments",
            Resource::Profile => "profile",
            Resource::DeviceStatus => "device_status",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Resource::Entries => "Get the latest glucose entries from Nightscout.",
            Resource::Treatments => "Get the latest treatments from Nightscout.",
            Resource::Profile => "Get the active Nightscout profile.",
            Resource::DeviceStatus => "Get the latest device status.",
        }
    }

    /// Look up a resource by URI
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.uri() == uri)
    }

    /// Look up a resource by short name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

/// MCP descriptor for a resource
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

impl From<Resource> for ResourceDescriptor {
    fn from(resource: Resource) -> Self {
        Self {
            uri: resource.uri(),
            name: resource.name(),
            description: resource.description(),
            mime_type: "application/json",
        }
    }
}

/// MCP descriptor for a tool
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Tool and resource handlers backed by a Nightscout client
pub struct NightscoutTools {
    client: Arc<NightscoutClient>,
    advisor: Advisor,
}

impl NightscoutTools {
    /// Create handlers for the given client and advisor
    pub fn new(client: Arc<NightscoutClient>, advisor: Advisor) -> Self {
        Self { client, advisor }
    }

    /// The underlying client
    pub fn client(&self) -> &NightscoutClient {
        &self.client
    }

    /// Descriptors for every resource
    pub fn list_resources() -> Vec<ResourceDescriptor> {
        Resource::ALL.into_iter().map(ResourceDescriptor::from).collect()
    }

    /// Descriptors for every tool
    pub fn list_tools() -> Vec<ToolDescriptor> {
        vec![ToolDescriptor {
            name: SUGGEST_SETTINGS,
            description: "Analyze Nightscout data and suggest therapy setting changes.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "hours": {
                        "type": "integer",
                        "minimum": 0,
                        "default": DEFAULT_HOURS,
                        "description": "Number of hours of data to analyze"
                    }
                }
            }),
        }]
    }

    /// Fetch a resource and render it as pretty-printed JSON
    ///
    /// Fetch errors are returned to the caller.
    pub async fn read_resource(&self, resource: Resource) -> Result<String, ToolError> {
        let text = match resource {
            Resource::Entries => pretty(&self.client.get_entries(DEFAULT_ENTRY_COUNT).await?)?,
            Resource::Treatments => {
                pretty(&self.client.get_treatments(DEFAULT_TREATMENT_COUNT).await?)?
            }
            Resource::Profile => pretty(&self.client.get_profile().await?)?,
            Resource::DeviceStatus => pretty(
                &self
                    .client
                    .get_device_status(DEFAULT_DEVICE_STATUS_COUNT)
                    .await?,
            )?,
        };

        Ok(text)
    }

    /// Analyze the last `hours` of data and return suggestions as a JSON array
    ///
    /// Never fails: fetch errors come back as a plain error message.
    pub async fn suggest_settings(&self, hours: u32) -> String {
        let count = hours.saturating_mul(RECORDS_PER_HOUR);
        tracing::info!(hours, count, "Running settings analysis");

        let fetched = async {
            let entries = self.client.get_entries(count).await?;
            let treatments = self.client.get_treatments(count).await?;
            let device_statuses = self.client.get_device_status(count).await?;
            let profile = self.client.get_profile().await?;
            Ok::<_, NightscoutError>((entries, treatments, device_statuses, profile))
        }
        .await;

        let (entries, treatments, device_statuses, profile) = match fetched {
            Ok(data) => data,
            Err(e) => return format!("Error fetching data from Nightscout: {}", e),
        };

        let suggestions = self
            .advisor
            .analyze(&profile, &entries, &treatments, &device_statuses);

        serde_json::to_string_pretty(&suggestions)
            .unwrap_or_else(|e| format!("Error encoding suggestions: {}", e))
    }

    /// Dispatch a tool call by name
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> Result<String, ToolError> {
        match name {
            SUGGEST_SETTINGS => {
                let hours = hours_argument(arguments)?;
                Ok(self.suggest_settings(hours).await)
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

/// Parse the optional `hours` argument
fn hours_argument(arguments: &Value) -> Result<u32, ToolError> {
    match arguments.get("hours") {
        None | Some(Value::Null) => Ok(DEFAULT_HOURS),
        Some(value) => value
            .as_u64()
            .and_then(|h| u32::try_from(h).ok())
            .ok_or_else(|| {
                ToolError::InvalidArguments(format!(
                    "hours must be a non-negative integer, got {}",
                    value
                ))
            }),
    }
}

fn pretty<T: Serialize>(value: &T) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value).map_err(|e| ToolError::Encode(e.to_string()))
}

/// Errors raised by tool and resource handlers
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Nightscout error: {0}")]
    Nightscout(#[from] NightscoutError),

    #[error("Encoding error: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_lookup() {
        for resource in Resource::ALL {
            assert_eq!(Resource::from_uri(resource.uri()), Some(resource));
            assert_eq!(Resource::from_name(resource.name()), Some(resource));
        }
        assert_eq!(Resource::from_uri("nightscout://food"), None);
    }

    #[test]
    fn test_hours_argument() {
        assert_eq!(hours_argument(&json!({})).unwrap(), DEFAULT_HOURS);
        assert_eq!(hours_argument(&json!({"hours": null})).unwrap(), DEFAULT_HOURS);
        assert_eq!(hours_argument(&json!({"hours": 6})).unwrap(), 6);
        assert!(hours_argument(&json!({"hours": -1})).is_err());
        assert!(hours_argument(&json!({"hours": "six"})).is_err());
    }

    #[test]
    fn test_descriptors() {
        let resources = serde_json::to_value(NightscoutTools::list_resources()).unwrap();
        assert_eq!(resources[0]["uri"], "nightscout://entries");
        assert_eq!(resources[3]["mimeType"], "application/json");

        let tools = serde_json::to_value(NightscoutTools::list_tools()).unwrap();
        assert_eq!(tools[0]["name"], SUGGEST_SETTINGS);
        assert_eq!(tools[0]["inputSchema"]["properties"]["hours"]["default"], 24);
    }

    #[tokio::test]
    async fn test_suggest_settings_reports_transport_failure() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = NightscoutClient::new(crate::nightscout::NightscoutConfig::new(
            "http://127.0.0.1:9",
        ))
        .unwrap();
        let tools = NightscoutTools::new(Arc::new(client), Advisor::default());

        let text = tools.suggest_settings(1).await;
        assert!(text.starts_with("Error fetching data from Nightscout"));
    }
}
