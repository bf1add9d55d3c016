//! Tool-invocation validation gate
//!
//! Every tool call passes through [`validate`] before anything is sent to
//! the storage network. The gate applies its rules in a fixed order and
//! stops at the first rule that finds a problem, after collecting every
//! violation of that rule:
//!
//! 1. Completeness: every required parameter has a value.
//! 2. No fabrication: undeclared keys are dropped; values tagged as derived
//!    are refused.
//! 3. Format: every present value matches its declared format.
//!
//! A call is either approved with exactly the declared keys, or rejected
//! with a reason meant for the user. Rejections are terminal for the
//! attempt: nothing is retried and nothing is remembered for the next one.

use super::candidate::{CandidateArguments, Provenance};
use super::format::ParamFormat;
use super::schema::ToolSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Arguments cleared for dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovedCall {
    /// Tool to invoke
    pub tool: String,

    /// Arguments restricted to the tool's declared parameters
    pub arguments: Map<String, Value>,
}

impl ApprovedCall {
    /// Arguments as a JSON object
    pub fn arguments_json(&self) -> Value {
        Value::Object(self.arguments.clone())
    }
}

/// A present value that failed its format check
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MalformedParameter {
    /// Parameter name
    pub name: String,

    /// Format the value should have had
    pub expected: ParamFormat,
}

/// Why a call was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// One or more required parameters are absent
    MissingParameter,

    /// Every absent required parameter was flagged ambiguous upstream
    AmbiguousRequest,

    /// A value was produced by the agent instead of the user
    FabricatedParameter,

    /// A value is present but does not match its format
    MalformedParameter,
}

impl RejectionKind {
    /// Get the string name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionKind::MissingParameter => "missing_parameter",
            RejectionKind::AmbiguousRequest => "ambiguous_request",
            RejectionKind::FabricatedParameter => "fabricated_parameter",
            RejectionKind::MalformedParameter => "malformed_parameter",
        }
    }
}

impl std::fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A refused tool call
///
/// Every rejection asks the user for clarification. The caller must show
/// `reason` and wait for a revised request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Tool that was refused
    pub tool: String,

    /// Failure class
    pub kind: RejectionKind,

    /// Message for the user
    pub reason: String,

    /// Required parameters with no value (includes ambiguous ones)
    pub missing: BTreeSet<String>,

    /// Required parameters flagged ambiguous upstream
    pub ambiguous: BTreeSet<String>,

    /// Parameters whose values were derived rather than supplied
    pub derived: BTreeSet<String>,

    /// Parameters whose values fail their format
    pub malformed: BTreeSet<MalformedParameter>,
}

impl Rejection {
    fn new(schema: &ToolSchema, kind: RejectionKind) -> Self {
        Self {
            tool: schema.name.clone(),
            kind,
            reason: String::new(),
            missing: BTreeSet::new(),
            ambiguous: BTreeSet::new(),
            derived: BTreeSet::new(),
            malformed: BTreeSet::new(),
        }
    }

    fn with_reason(mut self, schema: &ToolSchema) -> Self {
        let describe = |name: &str| match schema.param(name) {
            Some(p) => format!("{} ({})", name, p.format.describe()),
            None => name.to_string(),
        };

        let mut problems = Vec::new();

        let plain_missing: Vec<String> = self
            .missing
            .iter()
            .filter(|n| !self.ambiguous.contains(*n))
            .map(|n| describe(n.as_str()))
            .collect();
        if !plain_missing.is_empty() {
            problems.push(format!(
                "missing required parameter(s): {}",
                plain_missing.join(", ")
            ));
        }
        if !self.ambiguous.is_empty() {
            let names: Vec<String> = self.ambiguous.iter().map(|n| describe(n.as_str())).collect();
            problems.push(format!(
                "the request is ambiguous for: {}",
                names.join(", ")
            ));
        }
        if !self.derived.is_empty() {
            let names: Vec<&str> = self.derived.iter().map(String::as_str).collect();
            problems.push(format!(
                "value(s) not supplied by the user: {}",
                names.join(", ")
            ));
        }
        if !self.malformed.is_empty() {
            let names: Vec<String> = self
                .malformed
                .iter()
                .map(|m| format!("{} (expected {})", m.name, m.expected.describe()))
                .collect();
            problems.push(format!("invalid parameter(s): {}", names.join(", ")));
        }

        let list = |names: Vec<&str>| {
            if names.is_empty() {
                "none".to_string()
            } else {
                names.join(", ")
            }
        };

        self.reason = format!(
            "Cannot call {}: {}. Required: {}. Optional: {}. Please provide the correct value(s); no request was sent.",
            self.tool,
            problems.join("; "),
            list(schema.required_names()),
            list(schema.optional_names()),
        );
        self
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// Result of one pass through the gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Safe to dispatch
    Approved(ApprovedCall),

    /// Must not be dispatched
    Rejected(Rejection),
}

impl ValidationOutcome {
    /// Check if the call was approved
    pub fn is_approved(&self) -> bool {
        matches!(self, ValidationOutcome::Approved(_))
    }

    /// Get the approved call, if any
    pub fn approved(&self) -> Option<&ApprovedCall> {
        match self {
            ValidationOutcome::Approved(call) => Some(call),
            ValidationOutcome::Rejected(_) => None,
        }
    }

    /// Get the rejection, if any
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ValidationOutcome::Approved(_) => None,
            ValidationOutcome::Rejected(rejection) => Some(rejection),
        }
    }

    /// Convert into a `Result`, rejections as `Err`
    pub fn into_result(self) -> Result<ApprovedCall, Rejection> {
        match self {
            ValidationOutcome::Approved(call) => Ok(call),
            ValidationOutcome::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Validate a candidate against a tool schema
///
/// Pure: the same inputs always produce the same outcome.
pub fn validate(schema: &ToolSchema, candidate: &CandidateArguments) -> ValidationOutcome {
    let outcome = check_completeness(schema, candidate)
        .or_else(|| check_provenance(schema, candidate))
        .or_else(|| check_formats(schema, candidate))
        .map(ValidationOutcome::Rejected)
        .unwrap_or_else(|| ValidationOutcome::Approved(approve(schema, candidate)));

    if let ValidationOutcome::Rejected(rejection) = &outcome {
        let malformed: Vec<&str> = rejection.malformed.iter().map(|m| m.name.as_str()).collect();
        warn!(
            tool = %rejection.tool,
            kind = %rejection.kind,
            missing = ?rejection.missing,
            derived = ?rejection.derived,
            malformed = ?malformed,
            "Tool call rejected"
        );
    }
    outcome
}

fn check_completeness(schema: &ToolSchema, candidate: &CandidateArguments) -> Option<Rejection> {
    let missing: BTreeSet<String> = schema
        .required
        .iter()
        .filter(|p| !candidate.contains(&p.name))
        .map(|p| p.name.clone())
        .collect();

    if missing.is_empty() {
        return None;
    }

    let ambiguous: BTreeSet<String> = missing
        .iter()
        .filter(|name| candidate.is_ambiguous(name))
        .cloned()
        .collect();
    let kind = if ambiguous.len() == missing.len() {
        RejectionKind::AmbiguousRequest
    } else {
        RejectionKind::MissingParameter
    };

    let mut rejection = Rejection::new(schema, kind);
    rejection.missing = missing;
    rejection.ambiguous = ambiguous;
    Some(rejection.with_reason(schema))
}

fn check_provenance(schema: &ToolSchema, candidate: &CandidateArguments) -> Option<Rejection> {
    let derived: BTreeSet<String> = candidate
        .iter()
        .filter(|(name, _)| schema.recognises(name))
        .filter(|(_, value)| value.provenance == Provenance::Derived)
        .map(|(name, _)| name.to_string())
        .collect();

    if derived.is_empty() {
        return None;
    }

    let mut rejection = Rejection::new(schema, RejectionKind::FabricatedParameter);
    rejection.derived = derived;
    Some(rejection.with_reason(schema))
}

fn check_formats(schema: &ToolSchema, candidate: &CandidateArguments) -> Option<Rejection> {
    let malformed: BTreeSet<MalformedParameter> = schema
        .params()
        .filter_map(|param| {
            let value = candidate.get(&param.name)?;
            (!param.format.check(value)).then(|| MalformedParameter {
                name: param.name.clone(),
                expected: param.format,
            })
        })
        .collect();

    if malformed.is_empty() {
        return None;
    }

    let mut rejection = Rejection::new(schema, RejectionKind::MalformedParameter);
    rejection.malformed = malformed;
    Some(rejection.with_reason(schema))
}

fn approve(schema: &ToolSchema, candidate: &CandidateArguments) -> ApprovedCall {
    let mut arguments = Map::new();
    for (name, value) in candidate.iter() {
        if schema.recognises(name) {
            arguments.insert(name.to_string(), value.value.clone());
        } else {
            debug!(tool = %schema.name, key = name, "Dropping undeclared argument");
        }
    }

    ApprovedCall {
        tool: schema.name.clone(),
        arguments,
    }
}
