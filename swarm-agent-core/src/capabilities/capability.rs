//! Statically enumerated optional integrations
//!
//! Capabilities are never created at runtime; assembly only selects from a
//! catalog. The built-in catalog is [`BUILTIN_CAPABILITIES`], declared in
//! ascending precedence rank.

use super::assembler::CapabilitySet;
use crate::credentials::{CredentialSet, StaticFlag, StaticFlags};
use serde::Serialize;
use std::collections::BTreeSet;

/// Kind of integration a capability provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityCategory {
    /// Unconditional baseline integration
    Core,

    /// Text-generation model provider
    ModelText,

    /// Model provider that also serves embeddings
    ModelEmbedding,

    /// Local model used only when no other model provider is selected
    ModelFallback,

    /// Chat platform connector
    Platform,

    /// Auxiliary agent behavior
    Behavior,
}

impl CapabilityCategory {
    /// Whether capabilities of this category provide a model
    pub fn is_model(&self) -> bool {
        matches!(
            self,
            CapabilityCategory::ModelText
                | CapabilityCategory::ModelEmbedding
                | CapabilityCategory::ModelFallback
        )
    }

    /// Get the string name of this category
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityCategory::Core => "core",
            CapabilityCategory::ModelText => "model-text",
            CapabilityCategory::ModelEmbedding => "model-embedding",
            CapabilityCategory::ModelFallback => "model-fallback",
            CapabilityCategory::Platform => "platform",
            CapabilityCategory::Behavior => "behavior",
        }
    }
}

impl std::fmt::Display for CapabilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credential condition a capability needs to activate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "credentials", rename_all = "snake_case")]
pub enum Activation {
    /// No credentials needed
    Always,

    /// Every listed credential must be present and non-blank
    AllCredentials(&'static [&'static str]),
}

impl Activation {
    /// Credential names this condition consults
    pub fn credentials(&self) -> &'static [&'static str] {
        match self {
            Activation::Always => &[],
            Activation::AllCredentials(names) => *names,
        }
    }

    /// Evaluate the condition against a credential snapshot
    pub fn is_satisfied(&self, credentials: &CredentialSet) -> bool {
        match self {
            Activation::Always => true,
            Activation::AllCredentials(names) => credentials.all_present(names),
        }
    }
}

/// One optional integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capability {
    /// Stable identifier
    pub id: &'static str,

    /// Package the hosting plugin loader resolves for this capability
    pub plugin: &'static str,

    /// Integration kind
    pub category: CapabilityCategory,

    /// Credential condition
    pub activation: Activation,

    /// Lower ranks are evaluated and emitted first
    pub precedence_rank: u32,

    /// Flag that suppresses this capability regardless of credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppressed_by: Option<StaticFlag>,
}

impl Capability {
    /// Declare a capability
    pub const fn new(
        id: &'static str,
        plugin: &'static str,
        category: CapabilityCategory,
        activation: Activation,
        precedence_rank: u32,
    ) -> Self {
        Self {
            id,
            plugin,
            category,
            activation,
            precedence_rank,
            suppressed_by: None,
        }
    }

    /// Make this capability suppressible by a static flag
    pub const fn with_suppression(mut self, flag: StaticFlag) -> Self {
        self.suppressed_by = Some(flag);
        self
    }

    /// Decide whether this capability joins the set being built
    ///
    /// `selected` holds every capability of equal or lower rank that has
    /// already been chosen. Only fallback models look at it.
    pub fn activates(
        &self,
        credentials: &CredentialSet,
        flags: &StaticFlags,
        selected: &CapabilitySet,
    ) -> bool {
        if let Some(flag) = self.suppressed_by
            && flags.contains(flag)
        {
            return false;
        }

        match self.category {
            CapabilityCategory::Core => true,
            CapabilityCategory::ModelFallback => {
                !selected.has_model() && self.activation.is_satisfied(credentials)
            }
            _ => self.activation.is_satisfied(credentials),
        }
    }
}

const SQL: Capability = Capability::new(
    "sql",
    "@elizaos/plugin-sql",
    CapabilityCategory::Core,
    Activation::Always,
    0,
);

const MCP: Capability = Capability::new(
    "mcp",
    "@elizaos/plugin-mcp",
    CapabilityCategory::Core,
    Activation::Always,
    1,
);

const ANTHROPIC: Capability = Capability::new(
    "anthropic",
    "@elizaos/plugin-anthropic",
    CapabilityCategory::ModelText,
    Activation::AllCredentials(&["ANTHROPIC_API_KEY"]),
    10,
);

const OPENROUTER: Capability = Capability::new(
    "openrouter",
    "@elizaos/plugin-openrouter",
    CapabilityCategory::ModelText,
    Activation::AllCredentials(&["OPENROUTER_API_KEY"]),
    11,
);

const OPENAI: Capability = Capability::new(
    "openai",
    "@elizaos/plugin-openai",
    CapabilityCategory::ModelEmbedding,
    Activation::AllCredentials(&["OPENAI_API_KEY"]),
    20,
);

const GOOGLE_GENAI: Capability = Capability::new(
    "google-genai",
    "@elizaos/plugin-google-genai",
    CapabilityCategory::ModelEmbedding,
    Activation::AllCredentials(&["GOOGLE_GENERATIVE_AI_API_KEY"]),
    21,
);

const OLLAMA: Capability = Capability::new(
    "ollama",
    "@elizaos/plugin-ollama",
    CapabilityCategory::ModelFallback,
    Activation::AllCredentials(&["OLLAMA_API_ENDPOINT"]),
    30,
);

const DISCORD: Capability = Capability::new(
    "discord",
    "@elizaos/plugin-discord",
    CapabilityCategory::Platform,
    Activation::AllCredentials(&["DISCORD_API_TOKEN"]),
    40,
);

const TWITTER: Capability = Capability::new(
    "twitter",
    "@elizaos/plugin-twitter",
    CapabilityCategory::Platform,
    Activation::AllCredentials(&[
        "TWITTER_API_KEY",
        "TWITTER_API_SECRET_KEY",
        "TWITTER_ACCESS_TOKEN",
        "TWITTER_ACCESS_TOKEN_SECRET",
    ]),
    41,
);

const TELEGRAM: Capability = Capability::new(
    "telegram",
    "@elizaos/plugin-telegram",
    CapabilityCategory::Platform,
    Activation::AllCredentials(&["TELEGRAM_BOT_TOKEN"]),
    42,
);

const BOOTSTRAP: Capability = Capability::new(
    "bootstrap",
    "@elizaos/plugin-bootstrap",
    CapabilityCategory::Behavior,
    Activation::Always,
    50,
)
.with_suppression(StaticFlag::IgnoreBootstrap);

/// The agent's capability catalog, in ascending precedence rank
pub const BUILTIN_CAPABILITIES: &[Capability] = &[
    SQL,
    MCP,
    ANTHROPIC,
    OPENROUTER,
    OPENAI,
    GOOGLE_GENAI,
    OLLAMA,
    DISCORD,
    TWITTER,
    TELEGRAM,
    BOOTSTRAP,
];

/// Every credential name a catalog consults, sorted and deduplicated
pub fn required_credentials(catalog: &[Capability]) -> Vec<&'static str> {
    catalog
        .iter()
        .flat_map(|cap| cap.activation.credentials().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod capability_tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_rank_ordered() {
        let ranks: Vec<u32> = BUILTIN_CAPABILITIES
            .iter()
            .map(|c| c.precedence_rank)
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let ids: BTreeSet<&str> = BUILTIN_CAPABILITIES.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), BUILTIN_CAPABILITIES.len());
    }

    #[test]
    fn test_required_credentials() {
        let names = required_credentials(BUILTIN_CAPABILITIES);

        assert!(names.contains(&"OPENAI_API_KEY"));
        assert!(names.contains(&"TWITTER_ACCESS_TOKEN_SECRET"));
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn test_category_model_classification() {
        assert!(CapabilityCategory::ModelText.is_model());
        assert!(CapabilityCategory::ModelEmbedding.is_model());
        assert!(CapabilityCategory::ModelFallback.is_model());
        assert!(!CapabilityCategory::Platform.is_model());
        assert!(!CapabilityCategory::Core.is_model());
    }

    #[test]
    fn test_suppression_overrides_activation() {
        let creds = CredentialSet::new();
        let flags = StaticFlags::new().with(StaticFlag::IgnoreBootstrap);
        let empty = CapabilitySet::new();

        assert!(BOOTSTRAP.activates(&creds, &StaticFlags::new(), &empty));
        assert!(!BOOTSTRAP.activates(&creds, &flags, &empty));
    }
}
