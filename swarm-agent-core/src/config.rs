//! Configuration types for the Swarm agent

use crate::credentials::{StaticFlag, StaticFlags};
use crate::error::{AgentError, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Public Bee gateway used when no node URL is configured
pub const DEFAULT_BEE_API_URL: &str = "https://api.gateway.ethswarm.org";

/// Environment variables read into the `mcp` section: (variable, field, typed)
///
/// Typed values are parsed the way figment parses environment values;
/// the others are kept as strings.
const MCP_ENV_VARS: &[(&str, &str, bool)] = &[
    ("BEE_API_URL", "bee_api_url", false),
    ("AUTO_ASSIGN_STAMP", "auto_assign_stamp", true),
    (
        "DEFERRED_UPLOAD_SIZE_THRESHOLD_MB",
        "deferred_upload_size_threshold_mb",
        true,
    ),
    ("BEE_FEED_PK", "bee_feed_pk", false),
];

/// Main configuration for the Swarm agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AgentConfig {
    /// Storage-network tool server
    #[serde(default)]
    pub mcp: McpServerConfig,

    /// Static switches
    #[serde(default)]
    pub flags: FlagsConfig,

    /// Persona settings
    #[serde(default)]
    pub character: CharacterConfig,
}

/// How the hosting runtime talks to the tool server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum McpTransport {
    /// Child process over stdin/stdout
    #[default]
    Stdio,

    /// Server-sent events over HTTP
    Sse,
}

impl McpTransport {
    /// Get the string name of this transport
    pub fn as_str(&self) -> &'static str {
        match self {
            McpTransport::Stdio => "stdio",
            McpTransport::Sse => "sse",
        }
    }
}

/// Launch description of the Swarm MCP server
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// Key the server is registered under
    pub server_name: String,

    /// Executable to launch
    pub command: String,

    /// Arguments for the executable
    pub args: Vec<String>,

    /// Transport between runtime and server
    pub transport: McpTransport,

    /// Bee node API the server talks to
    pub bee_api_url: String,

    /// Let the server pick a usable stamp when none is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_assign_stamp: Option<bool>,

    /// Uploads above this size (MB) are deferred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_upload_size_threshold_mb: Option<u64>,

    /// Private key for signing feed updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bee_feed_pk: Option<String>,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            server_name: "swarm-mcp".to_string(),
            command: "npx".to_string(),
            args: vec!["-y".to_string(), "swarm-mcp".to_string()],
            transport: McpTransport::Stdio,
            bee_api_url: DEFAULT_BEE_API_URL.to_string(),
            auto_assign_stamp: None,
            deferred_upload_size_threshold_mb: None,
            bee_feed_pk: None,
        }
    }
}

impl std::fmt::Debug for McpServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServerConfig")
            .field("server_name", &self.server_name)
            .field("command", &self.command)
            .field("args", &self.args)
            .field("transport", &self.transport)
            .field("bee_api_url", &self.bee_api_url)
            .field("auto_assign_stamp", &self.auto_assign_stamp)
            .field(
                "deferred_upload_size_threshold_mb",
                &self.deferred_upload_size_threshold_mb,
            )
            .field("bee_feed_pk", &self.bee_feed_pk.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl McpServerConfig {
    /// Environment forwarded to the server process
    ///
    /// Unset options are left out rather than passed as empty strings.
    pub fn env(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        env.insert("BEE_API_URL".to_string(), self.bee_api_url.clone());
        if let Some(auto_assign) = self.auto_assign_stamp {
            env.insert("AUTO_ASSIGN_STAMP".to_string(), auto_assign.to_string());
        }
        if let Some(threshold) = self.deferred_upload_size_threshold_mb {
            env.insert(
                "DEFERRED_UPLOAD_SIZE_THRESHOLD_MB".to_string(),
                threshold.to_string(),
            );
        }
        if let Some(pk) = self.bee_feed_pk.as_ref().filter(|pk| !pk.trim().is_empty()) {
            env.insert("BEE_FEED_PK".to_string(), pk.clone());
        }
        env
    }
}

/// Static switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FlagsConfig {
    /// Leave out the default conversational behaviour
    #[serde(default)]
    pub ignore_bootstrap: bool,
}

/// Persona settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterConfig {
    /// Avatar image URL
    pub avatar: String,

    /// Knowledge documents handed to the runtime
    pub knowledge: Vec<PathBuf>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            avatar: "https://api.gateway.ethswarm.org/bzz/1edce57714b542d7198b0fb271086f0f5eb6ece309bf0b5f8011a7b228c42bdd/img/avatar.jpg".to_string(),
            knowledge: vec![PathBuf::from("../knowledge/swarm-mcp.md")],
        }
    }
}

impl AgentConfig {
    /// Load configuration from files and environment variables.
    ///
    /// Loads in this order, later layers winning:
    /// 1. Default configuration
    /// 2. `swarm-agent.toml` in the working directory
    /// 3. `swarm-agent/config.toml` in the user config directory
    /// 4. `explicit`, or the path in `SWARM_AGENT_CONFIG_PATH`
    /// 5. `SWARM_AGENT_` environment variables (`__` separates sections)
    /// 6. The MCP server variables (`BEE_API_URL`, `AUTO_ASSIGN_STAMP`,
    ///    `DEFERRED_UPLOAD_SIZE_THRESHOLD_MB`, `BEE_FEED_PK`)
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is invalid or a value fails
    /// validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AgentConfig::default()))
            .merge(Toml::file("swarm-agent.toml"));

        if let Some(dir) = dirs::config_dir() {
            figment = figment.merge(Toml::file(dir.join("swarm-agent").join("config.toml")));
        }

        let custom = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("SWARM_AGENT_CONFIG_PATH").map(PathBuf::from));
        if let Some(path) = custom {
            debug!(path = %path.display(), "Using custom configuration file");
            figment = figment.merge(Toml::file(path));
        }

        let figment = figment
            .merge(Env::prefixed("SWARM_AGENT_").ignore(&["CONFIG_PATH"]).split("__"))
            .merge(mcp_env_overrides(|name| std::env::var(name).ok()));

        let mut config = Self::from_figment(figment)?;
        if StaticFlags::from_env().contains(StaticFlag::IgnoreBootstrap) {
            config.flags.ignore_bootstrap = true;
        }
        Ok(config)
    }

    /// Load configuration from a specific file path over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AgentError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        Self::from_figment(
            Figment::from(Serialized::defaults(AgentConfig::default())).merge(Toml::file(path)),
        )
    }

    /// Extract and validate configuration from a prepared figment
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AgentConfig = figment.extract().map_err(|e| {
            AgentError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Static flags raised by configuration
    pub fn static_flags(&self) -> StaticFlags {
        StaticFlags::new().with_if(StaticFlag::IgnoreBootstrap, self.flags.ignore_bootstrap)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        let url = self.mcp.bee_api_url.trim();
        let host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| {
                AgentError::Configuration(format!(
                    "bee_api_url must be an http(s) URL, got '{}'",
                    url
                ))
            })?;
        if host.is_empty() || host.starts_with('/') {
            return Err(AgentError::Configuration(format!(
                "bee_api_url has no host: '{}'",
                url
            )));
        }

        if self.mcp.server_name.trim().is_empty() {
            return Err(AgentError::Configuration(
                "mcp.server_name must not be empty".to_string(),
            ));
        }
        if self.mcp.command.trim().is_empty() {
            return Err(AgentError::Configuration(
                "mcp.command must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Provider for the MCP server variables
///
/// Blank values are treated as unset so the layers below them still apply.
fn mcp_env_overrides(
    lookup: impl Fn(&str) -> Option<String>,
) -> Serialized<BTreeMap<String, Value>> {
    let overrides: BTreeMap<String, Value> = MCP_ENV_VARS
        .iter()
        .filter_map(|(var, field, typed)| {
            let raw = lookup(var)?;
            let raw = raw.trim();
            if raw.is_empty() {
                debug!(var, "Ignoring blank MCP environment variable");
                return None;
            }
            let value = if *typed {
                raw.parse().unwrap_or_else(|_| Value::from(raw.to_string()))
            } else {
                Value::from(raw.to_string())
            };
            Some((field.to_string(), value))
        })
        .collect();

    Serialized::default("mcp", overrides)
}
