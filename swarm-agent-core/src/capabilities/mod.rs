//! Capability assembly
//!
//! Decides, once per process start, which optional integrations the agent
//! exposes. The decision is driven by which credentials are present and by
//! a few static switches, and its output is an ordered [`CapabilitySet`]
//! handed to the hosting runtime's plugin loader.
//!
//! # Example
//!
//! ```rust
//! use swarm_agent_core::capabilities::assemble;
//! use swarm_agent_core::credentials::{CredentialSet, StaticFlags};
//!
//! let creds = CredentialSet::from_pairs([("OPENAI_API_KEY", "sk-test")]);
//! let set = assemble(&creds, &StaticFlags::new());
//!
//! assert_eq!(set.ids(), vec!["sql", "mcp", "openai", "bootstrap"]);
//! ```

mod assembler;
mod capability;

pub use assembler::{CapabilitySet, assemble, assemble_with};
pub use capability::{
    Activation, BUILTIN_CAPABILITIES, Capability, CapabilityCategory, required_credentials,
};
