//! # Swarm Agent - decision layer for a Swarm storage agent
//!
//! This crate decides two things for an agent that operates on the Swarm
//! decentralized storage network:
//! - Which optional integrations to load, given the credentials available
//!   at startup ([`capabilities`])
//! - Whether a proposed storage-network tool call may be sent, or must be
//!   turned into a request for clarification ([`tools`])
//!
//! The hosting runtime owns the model, the conversation and the MCP
//! transport; this crate only hands it decisions and static persona data.
//!
//! ## Quick Start
//!
//! ```rust
//! use swarm_agent_core::prelude::*;
//!
//! let credentials = CredentialSet::from_pairs([("ANTHROPIC_API_KEY", "sk-ant-test")]);
//! let capabilities = assemble(&credentials, &StaticFlags::new());
//! assert_eq!(capabilities.ids(), vec!["sql", "mcp", "anthropic", "bootstrap"]);
//!
//! let catalog = ToolCatalog::swarm();
//! let candidate = CandidateArguments::new().with("postageBatchId", "abc123");
//! let outcome = catalog.validate("get_postage_stamp", &candidate).unwrap();
//!
//! let rejection = outcome.rejection().unwrap();
//! assert_eq!(rejection.kind, RejectionKind::MalformedParameter);
//! ```

pub mod capabilities;
pub mod character;
pub mod config;
pub mod credentials;
pub mod error;
pub mod tools;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::capabilities::{
        Capability, CapabilityCategory, CapabilitySet, assemble, assemble_with,
    };
    pub use crate::character::Character;
    pub use crate::config::AgentConfig;
    pub use crate::credentials::{CredentialSet, StaticFlag, StaticFlags};
    pub use crate::error::{AgentError, Result};
    pub use crate::tools::{
        ApprovedCall, CandidateArguments, DispatchOutcome, GatedDispatcher, Provenance,
        Rejection, RejectionKind, ToolCatalog, ToolDispatcher, ToolSchema, ValidationOutcome,
        validate,
    };
}
