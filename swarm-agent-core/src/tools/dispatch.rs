//! Hand-off of approved calls to the external dispatch channel
//!
//! The channel that actually reaches the storage network belongs to the
//! hosting runtime. [`GatedDispatcher`] puts the validation gate in front of
//! it so that nothing reaches the channel without approval.

use super::candidate::CandidateArguments;
use super::catalog::ToolCatalog;
use super::gate::{ApprovedCall, Rejection, ValidationOutcome};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// Channel that performs an approved remote call
///
/// Implementations must not retry on their own; a failed call is reported
/// back and the user decides what to do next.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Invoke the remote operation and return its result
    async fn dispatch(&self, call: &ApprovedCall) -> Result<Value>;
}

/// Trace metadata for one dispatched call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallProvenance {
    /// Unique id of this attempt
    pub attempt_id: Uuid,

    /// Tool that was invoked
    pub tool: String,

    /// Prefix of the SHA-256 of the serialized arguments
    pub args_hash: String,

    /// When the call was handed to the channel
    pub started_at: DateTime<Utc>,

    /// Time spent in the channel, in milliseconds
    pub duration_ms: u64,
}

/// Result of one gated attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The gate approved the call and the channel answered
    Completed {
        /// Value returned by the channel
        result: Value,
        /// Trace metadata
        provenance: CallProvenance,
    },

    /// The gate refused the call; the channel was never contacted
    Refused(Rejection),
}

impl DispatchOutcome {
    /// Check if the call completed
    pub fn is_completed(&self) -> bool {
        matches!(self, DispatchOutcome::Completed { .. })
    }

    /// Get the channel result, if the call completed
    pub fn result(&self) -> Option<&Value> {
        match self {
            DispatchOutcome::Completed { result, .. } => Some(result),
            DispatchOutcome::Refused(_) => None,
        }
    }

    /// Get the rejection, if the call was refused
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            DispatchOutcome::Completed { .. } => None,
            DispatchOutcome::Refused(rejection) => Some(rejection),
        }
    }
}

/// Validation gate in front of a dispatch channel
pub struct GatedDispatcher<D: ToolDispatcher> {
    catalog: ToolCatalog,
    dispatcher: D,
}

impl<D: ToolDispatcher> std::fmt::Debug for GatedDispatcher<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatedDispatcher")
            .field("tools", &self.catalog.names())
            .finish()
    }
}

impl<D: ToolDispatcher> GatedDispatcher<D> {
    /// Put a catalog's gate in front of a channel
    pub fn new(catalog: ToolCatalog, dispatcher: D) -> Self {
        Self {
            catalog,
            dispatcher,
        }
    }

    /// The catalog calls are validated against
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// The wrapped channel
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Validate a candidate and, only if approved, dispatch it
    ///
    /// # Errors
    ///
    /// Fails for tool names outside the catalog and for channel failures.
    /// Rejections are not errors; they come back as
    /// [`DispatchOutcome::Refused`].
    pub async fn invoke(&self, tool: &str, candidate: &CandidateArguments) -> Result<DispatchOutcome> {
        let attempt_id = Uuid::new_v4();
        let span = info_span!("tool_call", tool, %attempt_id);

        self.attempt(attempt_id, tool, candidate)
            .instrument(span)
            .await
    }

    async fn attempt(
        &self,
        attempt_id: Uuid,
        tool: &str,
        candidate: &CandidateArguments,
    ) -> Result<DispatchOutcome> {
        let call = match self.catalog.validate(tool, candidate)? {
            ValidationOutcome::Approved(call) => call,
            ValidationOutcome::Rejected(rejection) => {
                return Ok(DispatchOutcome::Refused(rejection));
            }
        };

        let args_hash = hash_arguments(&call.arguments_json())?;
        let started_at = Utc::now();
        let started = Instant::now();

        let result = self.dispatcher.dispatch(&call).await?;

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(duration_ms, "Tool call completed");

        Ok(DispatchOutcome::Completed {
            result,
            provenance: CallProvenance {
                attempt_id,
                tool: call.tool,
                args_hash,
                started_at,
                duration_ms,
            },
        })
    }
}

fn hash_arguments(arguments: &Value) -> Result<String> {
    let serialized = serde_json::to_string(arguments)?;
    let digest = Sha256::digest(serialized.as_bytes());
    let hex = format!("{:x}", digest);
    Ok(hex[..16].to_string())
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn test_hash_arguments_is_stable() {
        let args = serde_json::json!({ "tagId": 1 });
        let first = hash_arguments(&args).unwrap();
        let second = hash_arguments(&args).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 16);
        assert_ne!(first, hash_arguments(&serde_json::json!({ "tagId": 2 })).unwrap());
    }
}
