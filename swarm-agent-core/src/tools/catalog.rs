//! Catalog of remote storage-network operations
//!
//! The catalog is the only source of tool names the agent may call. An
//! unknown name is reported as an error rather than guessed at.
//!
//! # Example
//!
//! ```rust
//! use swarm_agent_core::tools::{CandidateArguments, ToolCatalog};
//!
//! let catalog = ToolCatalog::swarm();
//! let candidate = CandidateArguments::new().with(
//!     "reference",
//!     "76d133e2798d2b15db55b6c3de01303acd86e43998eab372e25c5a2115bf3f0b",
//! );
//!
//! let outcome = catalog.validate("download_data", &candidate).unwrap();
//! assert!(outcome.is_approved());
//! ```

use super::candidate::CandidateArguments;
use super::format::ParamFormat::{
    Boolean, DurationLiteral, FreeText, HexIdentifier, RedundancyLevel, UnsignedInteger,
};
use super::gate::{ValidationOutcome, validate};
use super::schema::ToolSchema;
use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Tool entry as it appears in an MCP `tools/list` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolInfo {
    /// Tool name
    pub name: String,

    /// Tool description
    #[serde(default)]
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema", default)]
    pub input_schema: Value,
}

/// Ordered set of tool schemas, unique by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolCatalog {
    tools: Vec<ToolSchema>,
}

impl ToolCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The storage-network operations exposed by the Swarm MCP server
    pub fn swarm() -> Self {
        Self {
            tools: swarm_tools(),
        }
    }

    /// Build a catalog from an MCP `tools/list` result
    ///
    /// Accepts either the full result object (`{"tools": [...]}`) or the
    /// bare array.
    pub fn from_mcp_listing(listing: &Value) -> Result<Self> {
        let entries = listing.get("tools").unwrap_or(listing);
        let infos: Vec<McpToolInfo> = serde_json::from_value(entries.clone())?;

        let mut catalog = Self::new();
        for info in infos {
            let input_schema = if info.input_schema.is_null() {
                serde_json::json!({ "type": "object" })
            } else {
                info.input_schema
            };
            catalog.register(ToolSchema::from_input_schema(
                info.name,
                info.description,
                &input_schema,
            )?)?;
        }
        Ok(catalog)
    }

    /// Add a schema
    ///
    /// # Errors
    ///
    /// Fails if a tool with the same name exists or the schema is inconsistent.
    pub fn register(&mut self, schema: ToolSchema) -> Result<()> {
        schema.check_consistency()?;
        if self.contains(&schema.name) {
            return Err(AgentError::invalid_schema(
                &schema.name,
                "tool is already registered",
            ));
        }
        debug!(tool = %schema.name, "Registered tool schema");
        self.tools.push(schema);
        Ok(())
    }

    /// Look up a schema by tool name
    pub fn get(&self, name: &str) -> Option<&ToolSchema> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Tool names in catalog order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Get iterator over schemas
    pub fn iter(&self) -> impl Iterator<Item = &ToolSchema> {
        self.tools.iter()
    }

    /// Number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run the gate for a named tool
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnknownTool`] if the name is not in the catalog.
    pub fn validate(&self, tool: &str, candidate: &CandidateArguments) -> Result<ValidationOutcome> {
        let schema = self
            .get(tool)
            .ok_or_else(|| AgentError::UnknownTool(tool.to_string()))?;
        Ok(validate(schema, candidate))
    }
}

fn swarm_tools() -> Vec<ToolSchema> {
    vec![
        ToolSchema::new(
            "create_postage_stamp",
            "Buy a postage stamp batch with the given capacity (MB) and time to live",
        )
        .require("size", UnsignedInteger)
        .require("duration", DurationLiteral)
        .optional("label", FreeText),
        ToolSchema::new("get_postage_stamp", "Show usage, capacity and expiry of a batch")
            .require("postageBatchId", HexIdentifier),
        ToolSchema::new("list_postage_stamps", "List the node's postage stamp batches")
            .optional("leastUsed", Boolean)
            .optional("minUsage", UnsignedInteger)
            .optional("maxUsage", UnsignedInteger),
        ToolSchema::new(
            "extend_postage_stamp",
            "Extend the duration and/or capacity of a batch",
        )
        .require("postageBatchId", HexIdentifier)
        .optional("duration", DurationLiteral)
        .optional("size", UnsignedInteger),
        ToolSchema::new("upload_data", "Upload text data and return its reference")
            .require("data", FreeText)
            .optional("redundancyLevel", RedundancyLevel)
            .optional("postageBatchId", HexIdentifier),
        ToolSchema::new("download_data", "Download text data by reference")
            .require("reference", HexIdentifier),
        ToolSchema::new("update_feed", "Write data to the feed of a topic")
            .require("data", FreeText)
            .require("memoryTopic", FreeText)
            .optional("postageBatchId", HexIdentifier),
        ToolSchema::new("read_feed", "Read the latest data from the feed of a topic")
            .require("memoryTopic", FreeText)
            .optional("owner", FreeText),
        ToolSchema::new("upload_file", "Upload a file by path or inline content")
            .require("data", FreeText)
            .optional("isPath", Boolean)
            .optional("redundancyLevel", RedundancyLevel)
            .optional("postageBatchId", HexIdentifier),
        ToolSchema::new("upload_folder", "Upload a local folder as a collection")
            .require("folderPath", FreeText)
            .optional("redundancyLevel", RedundancyLevel)
            .optional("postageBatchId", HexIdentifier),
        ToolSchema::new("download_files", "Download a file or collection to a local folder")
            .require("reference", HexIdentifier)
            .optional("filePath", FreeText),
        ToolSchema::new("query_upload_progress", "Report sync progress of an upload tag")
            .require("tagId", UnsignedInteger),
    ]
}

#[cfg(test)]
mod catalog_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_swarm_catalog_contents() {
        let catalog = ToolCatalog::swarm();

        assert_eq!(catalog.len(), 12);
        for tool in catalog.iter() {
            assert!(tool.check_consistency().is_ok(), "{} inconsistent", tool.name);
        }
        assert_eq!(
            catalog.get("get_postage_stamp").unwrap().required_names(),
            vec!["postageBatchId"]
        );
        assert!(catalog.get("list_postage_stamps").unwrap().required.is_empty());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut catalog = ToolCatalog::swarm();
        let result = catalog.register(ToolSchema::new("read_feed", "again"));

        assert!(matches!(result, Err(AgentError::InvalidSchema { .. })));
        assert_eq!(catalog.len(), 12);
    }

    #[test]
    fn test_unknown_tool() {
        let catalog = ToolCatalog::swarm();
        let result = catalog.validate("delete_everything", &CandidateArguments::new());

        assert!(matches!(result, Err(AgentError::UnknownTool(name)) if name == "delete_everything"));
    }

    #[test]
    fn test_from_mcp_listing() {
        let listing = json!({
            "tools": [
                {
                    "name": "download_data",
                    "description": "Download data",
                    "inputSchema": {
                        "type": "object",
                        "properties": { "reference": { "type": "string" } },
                        "required": ["reference"]
                    }
                },
                { "name": "list_postage_stamps" }
            ]
        });

        let catalog = ToolCatalog::from_mcp_listing(&listing).unwrap();
        assert_eq!(catalog.names(), vec!["download_data", "list_postage_stamps"]);
        assert_eq!(
            catalog.get("download_data").unwrap().required[0].format,
            HexIdentifier
        );
    }

    #[test]
    fn test_from_mcp_listing_duplicate_names() {
        let listing = json!([{ "name": "read_feed" }, { "name": "read_feed" }]);
        assert!(ToolCatalog::from_mcp_listing(&listing).is_err());
    }
}
