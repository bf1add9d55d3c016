//! Storage-network tools and the gate in front of them
//!
//! This module decides whether a tool call may be sent to the storage
//! network. Key pieces:
//! - [`ToolCatalog`]: the remote operations and their declared parameters
//! - [`CandidateArguments`]: the values the user supplied for one attempt
//! - [`validate`]: the completeness, no-fabrication and format checks
//! - [`GatedDispatcher`]: hands approved calls to an external channel
//!
//! # Example
//!
//! ```rust
//! use swarm_agent_core::tools::{CandidateArguments, RejectionKind, ToolCatalog};
//!
//! let catalog = ToolCatalog::swarm();
//!
//! // The user asked for a stamp but did not say which one
//! let outcome = catalog
//!     .validate("get_postage_stamp", &CandidateArguments::new())
//!     .unwrap();
//!
//! let rejection = outcome.rejection().unwrap();
//! assert_eq!(rejection.kind, RejectionKind::MissingParameter);
//! assert!(rejection.missing.contains("postageBatchId"));
//! ```

mod candidate;
mod catalog;
mod dispatch;
mod format;
mod gate;
mod schema;

pub use candidate::{CandidateArguments, CandidateValue, Provenance};
pub use catalog::{McpToolInfo, ToolCatalog};
pub use dispatch::{CallProvenance, DispatchOutcome, GatedDispatcher, ToolDispatcher};
pub use format::{MAX_REDUNDANCY_LEVEL, ParamFormat, is_duration_literal, is_hex_identifier};
pub use gate::{
    ApprovedCall, MalformedParameter, Rejection, RejectionKind, ValidationOutcome, validate,
};
pub use schema::{ParamSpec, ToolSchema, known_format};
