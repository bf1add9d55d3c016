//! Capability selection
//!
//! Assembly is a fold over the catalog in precedence order. The partially
//! built set is threaded through the fold so that a fallback model can see
//! whether a higher-precedence model was already chosen.

use super::capability::{BUILTIN_CAPABILITIES, Capability, CapabilityCategory};
use crate::credentials::{CredentialSet, StaticFlags};
use serde::Serialize;
use tracing::{debug, info};

/// Ordered, duplicate-free set of activated capabilities
///
/// Built once per assembly run and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    capabilities: Vec<Capability>,
}

impl CapabilitySet {
    /// Create an empty capability set
    pub fn new() -> Self {
        Self::default()
    }

    /// Return this set with `capability` appended, unless its id is already present
    fn with(mut self, capability: Capability) -> Self {
        if !self.contains(capability.id) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Check if a capability id is present
    pub fn contains(&self, id: &str) -> bool {
        self.capabilities.iter().any(|c| c.id == id)
    }

    /// Check if any model capability is present
    pub fn has_model(&self) -> bool {
        self.capabilities.iter().any(|c| c.category.is_model())
    }

    /// Capabilities of one category, in set order
    pub fn by_category(&self, category: CapabilityCategory) -> Vec<&Capability> {
        self.capabilities
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    /// Capability ids in set order
    pub fn ids(&self) -> Vec<&'static str> {
        self.capabilities.iter().map(|c| c.id).collect()
    }

    /// Plugin packages in set order, as the plugin loader expects them
    pub fn plugins(&self) -> Vec<&'static str> {
        self.capabilities.iter().map(|c| c.plugin).collect()
    }

    /// Get iterator over capabilities
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }

    /// Number of capabilities
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl<'a> IntoIterator for &'a CapabilitySet {
    type Item = &'a Capability;
    type IntoIter = std::slice::Iter<'a, Capability>;

    fn into_iter(self) -> Self::IntoIter {
        self.capabilities.iter()
    }
}

/// Assemble the built-in catalog
pub fn assemble(credentials: &CredentialSet, flags: &StaticFlags) -> CapabilitySet {
    assemble_with(BUILTIN_CAPABILITIES, credentials, flags)
}

/// Assemble an arbitrary catalog
///
/// Capabilities are visited by ascending `precedence_rank`; equal ranks keep
/// their declaration order. Never fails: with no credentials the result
/// holds only the core capabilities.
pub fn assemble_with(
    catalog: &[Capability],
    credentials: &CredentialSet,
    flags: &StaticFlags,
) -> CapabilitySet {
    let mut ordered: Vec<&Capability> = catalog.iter().collect();
    ordered.sort_by_key(|c| c.precedence_rank);

    let set = ordered
        .into_iter()
        .fold(CapabilitySet::new(), |selected, capability| {
            if capability.activates(credentials, flags, &selected) {
                debug!(
                    id = capability.id,
                    category = %capability.category,
                    rank = capability.precedence_rank,
                    "Capability activated"
                );
                selected.with(*capability)
            } else {
                debug!(
                    id = capability.id,
                    category = %capability.category,
                    "Capability skipped"
                );
                selected
            }
        });

    info!(capabilities = ?set.ids(), "Capability set assembled");
    set
}
