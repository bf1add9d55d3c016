//! Tool parameter schemas
//!
//! A [`ToolSchema`] names one remote operation and partitions its parameters
//! into required and optional, each with a [`ParamFormat`]. Schemas are
//! supplied by the tool-calling runtime (or the built-in catalog) and are
//! read-only to the gate.

use super::format::ParamFormat;
use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashSet;

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name as the remote operation expects it
    pub name: String,

    /// Format constraint
    pub format: ParamFormat,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamSpec {
    /// Create a parameter spec
    pub fn new(name: impl Into<String>, format: ParamFormat) -> Self {
        Self {
            name: name.into(),
            format,
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Declared parameters of one remote operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name (unique within a catalog)
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Parameters that must be supplied
    #[serde(default)]
    pub required: Vec<ParamSpec>,

    /// Parameters that may be supplied
    #[serde(default)]
    pub optional: Vec<ParamSpec>,
}

impl ToolSchema {
    /// Create a schema with no parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: Vec::new(),
            optional: Vec::new(),
        }
    }

    /// Declare a required parameter
    pub fn require(mut self, name: impl Into<String>, format: ParamFormat) -> Self {
        self.required.push(ParamSpec::new(name, format));
        self
    }

    /// Declare an optional parameter
    pub fn optional(mut self, name: impl Into<String>, format: ParamFormat) -> Self {
        self.optional.push(ParamSpec::new(name, format));
        self
    }

    /// Check if a parameter name is declared, required or optional
    pub fn recognises(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    /// Look up a declared parameter
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params().find(|p| p.name == name)
    }

    /// Iterate over all declared parameters, required first
    pub fn params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.required.iter().chain(self.optional.iter())
    }

    /// Names of required parameters, in declaration order
    pub fn required_names(&self) -> Vec<&str> {
        self.required.iter().map(|p| p.name.as_str()).collect()
    }

    /// Names of optional parameters, in declaration order
    pub fn optional_names(&self) -> Vec<&str> {
        self.optional.iter().map(|p| p.name.as_str()).collect()
    }

    /// Reject schemas that declare a parameter twice
    pub fn check_consistency(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AgentError::invalid_schema(&self.name, "tool name is empty"));
        }

        let mut seen = HashSet::new();
        for param in self.params() {
            if param.name.trim().is_empty() {
                return Err(AgentError::invalid_schema(&self.name, "parameter name is empty"));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(AgentError::invalid_schema(
                    &self.name,
                    format!("parameter '{}' is declared more than once", param.name),
                ));
            }
        }
        Ok(())
    }

    /// Build a schema from an MCP tool listing's JSON `inputSchema`
    ///
    /// Formats are inferred from well-known parameter names first and the
    /// JSON type second; anything else is free text.
    pub fn from_input_schema(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: &Value,
    ) -> Result<Self> {
        let name = name.into();
        let object = input_schema
            .as_object()
            .ok_or_else(|| AgentError::invalid_schema(&name, "inputSchema is not an object"))?;

        let empty = Map::new();
        let properties = match object.get("properties") {
            None => &empty,
            Some(Value::Object(props)) => props,
            Some(_) => {
                return Err(AgentError::invalid_schema(&name, "properties is not an object"));
            }
        };

        let required_names: Vec<&str> = match object.get("required") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().ok_or_else(|| {
                        AgentError::invalid_schema(&name, "required entries must be strings")
                    })
                })
                .collect::<Result<_>>()?,
            Some(_) => {
                return Err(AgentError::invalid_schema(&name, "required is not an array"));
            }
        };

        let spec_for = |param: &str| {
            let property = properties.get(param);
            let mut spec = ParamSpec::new(param, infer_format(param, property));
            if let Some(text) = property
                .and_then(|p| p.get("description"))
                .and_then(Value::as_str)
            {
                spec = spec.with_description(text);
            }
            spec
        };

        let schema = Self {
            required: required_names.iter().map(|p| spec_for(*p)).collect(),
            optional: properties
                .keys()
                .filter(|p| !required_names.contains(&p.as_str()))
                .map(|p| spec_for(p.as_str()))
                .collect(),
            name,
            description: description.into(),
        };

        schema.check_consistency()?;
        Ok(schema)
    }

    /// Render this schema as a JSON Schema object
    pub fn to_input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params()
            .map(|p| (p.name.clone(), property_schema(p)))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_names(),
        })
    }
}

/// Format for a parameter the storage network uses under a fixed name
pub fn known_format(param: &str) -> Option<ParamFormat> {
    match param {
        "postageBatchId" | "reference" => Some(ParamFormat::HexIdentifier),
        "duration" => Some(ParamFormat::DurationLiteral),
        "size" | "tagId" | "minUsage" | "maxUsage" => Some(ParamFormat::UnsignedInteger),
        "redundancyLevel" => Some(ParamFormat::RedundancyLevel),
        "leastUsed" | "isPath" => Some(ParamFormat::Boolean),
        _ => None,
    }
}

fn infer_format(param: &str, property: Option<&Value>) -> ParamFormat {
    known_format(param).unwrap_or_else(|| {
        match property.and_then(|p| p.get("type")).and_then(Value::as_str) {
            Some("integer") => ParamFormat::UnsignedInteger,
            Some("boolean") => ParamFormat::Boolean,
            _ => ParamFormat::FreeText,
        }
    })
}

fn property_schema(param: &ParamSpec) -> Value {
    let mut property = match param.format {
        ParamFormat::HexIdentifier => json!({
            "type": "string",
            "pattern": "^[0-9a-fA-F]{64}$",
        }),
        ParamFormat::DurationLiteral | ParamFormat::FreeText => json!({ "type": "string" }),
        ParamFormat::UnsignedInteger => json!({ "type": "integer", "minimum": 0 }),
        ParamFormat::RedundancyLevel => json!({
            "type": "integer",
            "minimum": 0,
            "maximum": super::format::MAX_REDUNDANCY_LEVEL,
        }),
        ParamFormat::Boolean => json!({ "type": "boolean" }),
    };

    let description = param
        .description
        .clone()
        .unwrap_or_else(|| param.format.describe().to_string());
    property["description"] = Value::String(description);
    property
}
