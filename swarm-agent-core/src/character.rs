//! Persona document handed to the hosting agent runtime
//!
//! The runtime loads plugins, launches the MCP server and primes the model
//! from this document. Nothing here makes decisions: the plugin list comes
//! from an assembled [`CapabilitySet`] and the tool names from a
//! [`ToolCatalog`].

use crate::capabilities::CapabilitySet;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::tools::{ParamFormat, ToolCatalog};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Display name of the agent
pub const AGENT_NAME: &str = "Swarm Agent";

/// Placeholder the runtime substitutes with the user's name
const USER_PLACEHOLDER: &str = "{{user}}";

const BIO: &str = "AI agent specialized in Swarm network operations with Swarm MCP integration \
                   for uploads, downloads and feed updates on decentralized storage.";

const RULES: &[&str] = &[
    "Only include toolArguments that are explicitly provided by the user.",
    "NEVER invent, assume, guess, derive, hash, or add sample values.",
    "If a parameter is missing, omit it entirely from toolArguments.",
    "If validation fails or parameters are ambiguous, explain the issue and request clarification instead of calling a tool.",
    "In tool responses always display the IDs, references and postageBatchIds.",
];

const TOPICS: &[&str] = &[
    "postage stamps",
    "create postage stamp",
    "list postage stamps",
    "get postage stamp",
    "extend postage stamp",
    "upload data",
    "download data",
    "Swarm feeds",
    "update feed",
    "read feed",
    "upload file",
    "upload folder",
    "download files",
    "upload progress",
    "Swarm storage",
    "Bee node",
    "content hash",
    "decentralized upload",
    "postage batch",
    "Swarm reference",
    "redundancy level",
    "feed topic",
    "tag ID",
];

const ADJECTIVES: &[&str] = &[
    "decentralized",
    "distributed",
    "fault-tolerant",
    "immutable",
    "content-addressed",
    "peer-to-peer",
    "censorship-resistant",
    "persistent",
    "scalable",
    "efficient",
    "web3-native",
    "trustless",
    "verifiable",
    "permanent",
    "encrypted",
    "high-availability",
    "geo-distributed",
    "bandwidth-optimized",
];

const STYLE_ALL: &[&str] = &[
    "Use precise Swarm terminology: batchID, content hash, reference, feed topic",
    "Validate that batch IDs and Swarm hashes are 64-character hex; if invalid, explain the problem and do not fabricate values.",
    "Format responses with clear sections: Status, Batch ID, Hash, Usage",
    "Include exact MCP tool names when suggesting commands",
    "Never fabricate MCP tools; if a tool is unknown, state that explicitly.",
    "Provide parameter validation guidance for failed requests",
    "Use technical language matching Swarm documentation",
    "List duration formats: 1d, 1w, 1month explicitly",
    "Highlight required vs optional parameters clearly",
    "Return JSON-like structures for stamp lists and tool results",
    "Warn about invalid batch IDs or missing stamps immediately",
    "When explaining sizes, prefer decimal MB/GB; clarify approximations explicitly.",
    "Admit uncertainty when appropriate",
];

const STYLE_CHAT: &[&str] = &[
    "Respond like a Swarm node operator monitoring Bee client",
    "Direct, technical, no casual language",
    "Always include actionable next steps or correct syntax",
    "Reference specific README sample prompts for complex requests",
    "Confirm parameters before tool execution when ambiguous",
];

/// Canned exchange per built-in tool: (tool, user, agent, thought)
const EXAMPLES: &[(&str, &str, &str, Option<&str>)] = &[
    (
        "create_postage_stamp",
        "Create new stamp with 4 days, 10 megabytes.",
        "[create_postage_stamp] New batch created: 3b3881ac37f936a4023a4562c69f1f138df8c1c24994f7b047514fbcbe9388fa (10MB, 4d TTL)",
        None,
    ),
    (
        "get_postage_stamp",
        "Give me the details for batch 3b3881ac37f936a4023a4562c69f1f138df8c1c24994f7b047514fbcbe9388fa.",
        "[get_postage_stamp] Batch 3b3881ac37f936a4023a4562c69f1f138df8c1c24994f7b047514fbcbe9388fa: 45% used, 10MB capacity, expires in 3d",
        None,
    ),
    (
        "list_postage_stamps",
        "List my stamps.",
        "[list_postage_stamps] Available batches: 3b3881ac... (45% used), a1b2c3d... (12% used)",
        Some("I need to display to the user the postage batches and include for each batch the reference."),
    ),
    (
        "extend_postage_stamp",
        "Extend 3b3881ac37f936a4023a4562c69f1f138df8c1c24994f7b047514fbcbe9388fa to 5 days.",
        "[extend_postage_stamp] Extended batch 3b3881ac... TTL now 5 days from original expiration.",
        None,
    ),
    (
        "upload_data",
        "Upload data to Swarm: Hello World!. Use batch 3b3881ac37f936a4023a4562c69f1f138df8c1c24994f7b047514fbcbe9388fa.",
        "[upload_data] Uploaded! Reference: 76d133e2798d2b15db55b6c3de01303acd86e43998eab372e25c5a2115bf3f0b (redundancy:1)",
        None,
    ),
    (
        "download_data",
        "Download data from Swarm: 76d133e2798d2b15db55b6c3de01303acd86e43998eab372e25c5a2115bf3f0b.",
        "[download_data] Downloaded: \"Hello World!\" from hash 76d133e2798d2b15db55b6c3de01303acd86e43998eab372e25c5a2115bf3f0b",
        None,
    ),
    (
        "update_feed",
        "Update the Swarm feed of Topic1 with: Message1.",
        "[update_feed] Topic1 feed updated with \"Message1\".",
        None,
    ),
    (
        "read_feed",
        "Read the Swarm feed of Topic1.",
        "[read_feed] Topic1 latest: \"Message1\" (hash: abc123def456...)",
        None,
    ),
    (
        "upload_file",
        "Upload to Swarm the file: uploads/file.txt.",
        "[upload_file] File uploads/file.txt → b4a5c6d7e8f9... (tag: 123)",
        None,
    ),
    (
        "upload_folder",
        "Upload to Swarm folder: /home/conversational-agent-client/uploads.",
        "[upload_folder] Folder uploaded → ref: ba35af06601ddf5ac3d71ee33da0db7537215a914fd6a5414b5597bb3d618bdb (tag: 456)",
        None,
    ),
    (
        "download_files",
        "Download from Swarm the file with reference ba35af06601ddf5ac3d71ee33da0db7537215a914fd6a5414b5597bb3d618bdb to folder downloads.",
        "[download_files] Saved to downloads/ from ref ba35af06601ddf5ac3d71ee33da0db7537215a914fd6a5414b5597bb3d618bdb",
        None,
    ),
    (
        "query_upload_progress",
        "Query Swarm for upload tag with id: 1.",
        "[query_upload_progress] Tag 1: 75% complete (split 4/6 synced)",
        None,
    ),
];

/// The persona document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Display name
    pub name: String,

    /// System prompt
    pub system: String,

    /// One-line description
    pub bio: String,

    /// Plugin packages to load, in order
    pub plugins: Vec<String>,

    /// Runtime settings
    pub settings: CharacterSettings,

    /// Conversation topics
    pub topics: Vec<String>,

    /// Personality adjectives
    pub adjectives: Vec<String>,

    /// Knowledge documents
    pub knowledge: Vec<KnowledgeItem>,

    /// Sample conversations, one per tool
    pub message_examples: Vec<Vec<MessageExample>>,

    /// Response style guidance
    pub style: Style,
}

/// Runtime settings block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSettings {
    /// MCP servers the runtime launches
    pub mcp: McpSettings,

    /// Avatar image URL
    pub avatar: String,
}

/// MCP server registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpSettings {
    /// Servers by name
    pub servers: BTreeMap<String, McpServerEntry>,
}

/// Launch description of one MCP server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpServerEntry {
    /// Transport (`stdio` or `sse`)
    #[serde(rename = "type")]
    pub transport: String,

    /// Executable
    pub command: String,

    /// Arguments
    pub args: Vec<String>,

    /// Environment for the server process
    pub env: BTreeMap<String, String>,
}

/// A knowledge document reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Path as the runtime resolves it
    pub path: String,

    /// Share between agents
    pub shared: bool,
}

/// One turn of a sample conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageExample {
    /// Speaker
    pub name: String,

    /// What was said
    pub content: MessageContent,
}

/// Content of a sample turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    /// Visible text
    pub text: String,

    /// Internal reasoning shown to the model as an example
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
}

/// Style guidance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    /// Applies everywhere
    pub all: Vec<String>,

    /// Applies to chat
    pub chat: Vec<String>,
}

impl Character {
    /// Build the document from configuration, the assembled capabilities
    /// and the tool catalog
    pub fn build(config: &AgentConfig, capabilities: &CapabilitySet, catalog: &ToolCatalog) -> Self {
        let server = McpServerEntry {
            transport: config.mcp.transport.as_str().to_string(),
            command: config.mcp.command.clone(),
            args: config.mcp.args.clone(),
            env: config.mcp.env(),
        };

        Self {
            name: AGENT_NAME.to_string(),
            system: system_prompt(catalog),
            bio: BIO.to_string(),
            plugins: capabilities.plugins().into_iter().map(str::to_string).collect(),
            settings: CharacterSettings {
                mcp: McpSettings {
                    servers: BTreeMap::from([(config.mcp.server_name.clone(), server)]),
                },
                avatar: config.character.avatar.clone(),
            },
            topics: to_strings(TOPICS),
            adjectives: to_strings(ADJECTIVES),
            knowledge: config
                .character
                .knowledge
                .iter()
                .map(|path| KnowledgeItem {
                    path: path.display().to_string(),
                    shared: false,
                })
                .collect(),
            message_examples: catalog.iter().map(|tool| example_for(&tool.name, catalog)).collect(),
            style: Style {
                all: to_strings(STYLE_ALL),
                chat: to_strings(STYLE_CHAT),
            },
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn system_prompt(catalog: &ToolCatalog) -> String {
    let identifiers: BTreeSet<&str> = catalog
        .iter()
        .flat_map(|tool| tool.params())
        .filter(|p| p.format == ParamFormat::HexIdentifier)
        .map(|p| p.name.as_str())
        .collect();
    let identifiers: Vec<&str> = identifiers.into_iter().collect();
    let parameters = catalog
        .iter()
        .flat_map(|tool| tool.params())
        .map(|p| p.name.as_str())
        .fold(Vec::new(), |mut names, name| {
            if !names.contains(&name) {
                names.push(name);
            }
            names
        });

    let mut prompt = String::from(
        "You are a Swarm-integrated agent. Use MCP tools to interact with the Swarm \
         decentralized storage network via Bee.\n\n",
    );
    prompt.push_str("Available MCP tools:\n");
    prompt.push_str(&catalog.names().join(", "));
    prompt.push_str(".\n\nCRITICAL RULES:\n");
    for rule in RULES {
        prompt.push_str("- ");
        prompt.push_str(rule);
        prompt.push('\n');
    }
    if !identifiers.is_empty() {
        prompt.push_str(&format!(
            "- Validate Swarm identifiers before tool execution: {} must be 64-character hex.\n",
            identifiers.join(", ")
        ));
    }
    if !parameters.is_empty() {
        prompt.push_str(&format!(
            "- This applies to all parameters, including {}.\n",
            parameters.join(", ")
        ));
    }
    prompt
}

fn example_for(tool: &str, catalog: &ToolCatalog) -> Vec<MessageExample> {
    let (user, agent, thought) = match EXAMPLES.iter().find(|(name, ..)| *name == tool) {
        Some((_, user, agent, thought)) => {
            (user.to_string(), agent.to_string(), thought.map(str::to_string))
        }
        None => {
            let required = catalog
                .get(tool)
                .map(|schema| schema.required_names().join(", "))
                .unwrap_or_default();
            (
                format!("Run {} for me.", tool),
                format!(
                    "[{}] Which values should I use? Required: {}.",
                    tool,
                    if required.is_empty() { "none" } else { required.as_str() }
                ),
                None,
            )
        }
    };

    vec![
        MessageExample {
            name: USER_PLACEHOLDER.to_string(),
            content: MessageContent {
                text: user,
                thought: None,
            },
        },
        MessageExample {
            name: AGENT_NAME.to_string(),
            content: MessageContent {
                text: agent,
                thought,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::assemble;
    use crate::credentials::{CredentialSet, StaticFlags};
    use crate::tools::ToolSchema;

    fn build_default() -> Character {
        let capabilities = assemble(
            &CredentialSet::from_pairs([("OPENAI_API_KEY", "sk-test")]),
            &StaticFlags::new(),
        );
        Character::build(&AgentConfig::default(), &capabilities, &ToolCatalog::swarm())
    }

    #[test]
    fn test_plugins_follow_capabilities() {
        let character = build_default();

        assert_eq!(
            character.plugins,
            vec![
                "@elizaos/plugin-sql",
                "@elizaos/plugin-mcp",
                "@elizaos/plugin-openai",
                "@elizaos/plugin-bootstrap",
            ]
        );
    }

    #[test]
    fn test_system_prompt_lists_every_tool() {
        let character = build_default();

        for name in ToolCatalog::swarm().names() {
            assert!(character.system.contains(name), "{} missing", name);
        }
        assert!(character.system.contains("NEVER invent"));
        assert!(character.system.contains("postageBatchId, reference must be 64-character hex"));
    }

    #[test]
    fn test_system_prompt_names_every_parameter() {
        let character = build_default();
        let rule = character
            .system
            .lines()
            .find(|line| line.starts_with("- This applies to all parameters"))
            .unwrap();

        for name in [
            "postageBatchId",
            "size",
            "duration",
            "reference",
            "tagId",
            "memoryTopic",
            "owner",
            "redundancyLevel",
        ] {
            assert!(rule.contains(name), "{} missing", name);
        }
        assert_eq!(rule.matches("postageBatchId").count(), 1);
    }

    #[test]
    fn test_one_example_per_tool() {
        let character = build_default();

        assert_eq!(character.message_examples.len(), 12);
        let list = &character.message_examples[2];
        assert_eq!(list[0].name, "{{user}}");
        assert_eq!(list[1].name, AGENT_NAME);
        assert!(list[1].content.text.starts_with("[list_postage_stamps]"));
        assert!(list[1].content.thought.is_some());
    }

    #[test]
    fn test_example_for_unlisted_tool() {
        let mut catalog = ToolCatalog::new();
        catalog
            .register(
                ToolSchema::new("pin_reference", "Pin a reference")
                    .require("reference", ParamFormat::HexIdentifier),
            )
            .unwrap();

        let example = example_for("pin_reference", &catalog);
        assert_eq!(
            example[1].content.text,
            "[pin_reference] Which values should I use? Required: reference."
        );
    }

    #[test]
    fn test_settings_and_serialization() {
        let character = build_default();
        let json: serde_json::Value = serde_json::from_str(&character.to_json().unwrap()).unwrap();

        let server = &json["settings"]["mcp"]["servers"]["swarm-mcp"];
        assert_eq!(server["type"], "stdio");
        assert_eq!(server["command"], "npx");
        assert_eq!(server["args"], serde_json::json!(["-y", "swarm-mcp"]));
        assert_eq!(server["env"]["BEE_API_URL"], crate::config::DEFAULT_BEE_API_URL);
        assert!(json["messageExamples"].is_array());
        assert_eq!(json["knowledge"][0]["shared"], false);

        let yaml = character.to_yaml().unwrap();
        let back: Character = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, character);
    }
}
