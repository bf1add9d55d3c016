//! Candidate arguments assembled from the current conversation
//!
//! The request-parsing layer fills a [`CandidateArguments`] with the values
//! the user explicitly supplied. Absence of a key is the only way to say
//! "missing": `null` values and blank strings are never stored.
//!
//! The gate cannot tell a synthesized identifier from a typed one. Callers
//! that derive a value (from memory, a previous answer, a hash they
//! computed) must tag it [`Provenance::Derived`] so the gate can refuse it;
//! untagged values are trusted to be verbatim user input.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Where a candidate value came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Echoed literally from the user-visible request
    #[default]
    Verbatim,

    /// Produced by the agent rather than typed by the user
    Derived,
}

/// A candidate value with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateValue {
    /// The value as it would be sent to the tool
    pub value: Value,

    /// Where the value came from
    #[serde(default)]
    pub provenance: Provenance,
}

/// Parameter values for one tool-call attempt
///
/// Each attempt builds a fresh instance; nothing carries over from a
/// rejected attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CandidateWire")]
pub struct CandidateArguments {
    values: BTreeMap<String, CandidateValue>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    ambiguous: BTreeSet<String>,
}

/// Serialized shape of [`CandidateArguments`]
#[derive(Deserialize)]
struct CandidateWire {
    #[serde(default)]
    values: BTreeMap<String, CandidateValue>,

    #[serde(default)]
    ambiguous: BTreeSet<String>,
}

impl From<CandidateWire> for CandidateArguments {
    fn from(wire: CandidateWire) -> Self {
        let mut candidate = Self::new();
        for (name, entry) in wire.values {
            candidate.insert(name, entry.value, entry.provenance);
        }
        wire.ambiguous
            .into_iter()
            .fold(candidate, |candidate, name| candidate.mark_ambiguous(name))
    }
}

impl CandidateArguments {
    /// Create an empty candidate
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a candidate from a JSON object of verbatim values
    ///
    /// Returns `None` when `args` is not an object. `null` members are
    /// skipped.
    pub fn from_json(args: &Value) -> Option<Self> {
        let object = args.as_object()?;
        Some(
            object
                .iter()
                .fold(Self::new(), |candidate, (name, value)| {
                    candidate.with(name.as_str(), value.clone())
                }),
        )
    }

    /// Add a verbatim value
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_provenance(name, value, Provenance::Verbatim)
    }

    /// Add a value the caller derived rather than copied from the user
    pub fn with_derived(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_provenance(name, value, Provenance::Derived)
    }

    /// Add a value with explicit provenance
    pub fn with_provenance(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        provenance: Provenance,
    ) -> Self {
        self.insert(name, value, provenance);
        self
    }

    /// Insert a value; absent-equivalent values clear the key instead
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>, provenance: Provenance) {
        let name = name.into();
        let value = value.into();

        if is_absent(&value) {
            self.values.remove(&name);
            return;
        }

        self.ambiguous.remove(&name);
        self.values.insert(name, CandidateValue { value, provenance });
    }

    /// Record that the request admits several readings of a parameter
    ///
    /// Any value already present for `name` is dropped: an ambiguous field
    /// reaches the gate as absent.
    pub fn mark_ambiguous(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.values.remove(&name);
        self.ambiguous.insert(name);
        self
    }

    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).map(|v| &v.value)
    }

    /// Get the provenance of a value
    pub fn provenance(&self, name: &str) -> Option<Provenance> {
        self.values.get(name).map(|v| v.provenance)
    }

    /// Check if a value is present
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Check if a parameter was flagged ambiguous
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous.contains(name)
    }

    /// Names of present values, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterate over present values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CandidateValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of present values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no value is present
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod candidate_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_blank_values_are_absent() {
        let candidate = CandidateArguments::new()
            .with("postageBatchId", Value::Null)
            .with("label", "   ")
            .with("size", 10);

        assert!(!candidate.contains("postageBatchId"));
        assert!(!candidate.contains("label"));
        assert_eq!(candidate.get("size"), Some(&json!(10)));
        assert_eq!(candidate.len(), 1);
    }

    #[test]
    fn test_blank_value_clears_existing_key() {
        let candidate = CandidateArguments::new().with("data", "hello").with("data", "");
        assert!(candidate.is_empty());
    }

    #[test]
    fn test_from_json() {
        let candidate = CandidateArguments::from_json(&json!({
            "reference": "abc",
            "filePath": null,
        }))
        .unwrap();

        assert!(candidate.contains("reference"));
        assert!(!candidate.contains("filePath"));
        assert_eq!(candidate.provenance("reference"), Some(Provenance::Verbatim));

        assert!(CandidateArguments::from_json(&json!(["reference"])).is_none());
    }

    #[test]
    fn test_mark_ambiguous_drops_value() {
        let candidate = CandidateArguments::new()
            .with("duration", "1d")
            .mark_ambiguous("duration");

        assert!(!candidate.contains("duration"));
        assert!(candidate.is_ambiguous("duration"));

        let resolved = candidate.with("duration", "1w");
        assert!(resolved.contains("duration"));
        assert!(!resolved.is_ambiguous("duration"));
    }

    #[test]
    fn test_deserialize_applies_absence_rules() {
        let candidate: CandidateArguments = serde_json::from_value(json!({
            "values": {
                "data": { "value": null },
                "label": { "value": "  " },
                "size": { "value": 10, "provenance": "derived" },
                "duration": { "value": "1d" }
            },
            "ambiguous": ["duration"]
        }))
        .unwrap();

        assert!(!candidate.contains("data"));
        assert!(!candidate.contains("label"));
        assert!(!candidate.contains("duration"));
        assert!(candidate.is_ambiguous("duration"));
        assert_eq!(candidate.provenance("size"), Some(Provenance::Derived));
        assert_eq!(candidate.len(), 1);
    }

    #[test]
    fn test_serialized_candidate_reads_back() {
        let candidate = CandidateArguments::new()
            .with("reference", "abc")
            .with_derived("owner", "0x1")
            .mark_ambiguous("filePath");

        let json = serde_json::to_value(&candidate).unwrap();
        let back: CandidateArguments = serde_json::from_value(json).unwrap();
        assert_eq!(back, candidate);
    }

    #[test]
    fn test_derived_provenance() {
        let candidate = CandidateArguments::new().with_derived("owner", "0xabc");
        assert_eq!(candidate.provenance("owner"), Some(Provenance::Derived));
    }
}
