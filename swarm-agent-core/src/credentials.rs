//! Credential snapshots and static switches
//!
//! Both types are read once at startup and never mutated afterwards.
//! A credential counts as present only when its value is non-empty after
//! trimming, so an unset variable and `FOO=""` behave identically.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Immutable snapshot of named credentials
///
/// Values are kept so the hosting runtime can hand them to the
/// integrations it loads, but they never appear in `Debug` output or logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    values: BTreeMap<String, String>,
}

impl CredentialSet {
    /// Create an empty credential set
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Build a credential set from name/value pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Check whether a credential is set to a non-blank value
    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get the trimmed value of a credential, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Check that every listed credential is present
    pub fn all_present(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.is_present(name))
    }

    /// Names of the credentials that are present, in sorted order
    pub fn present_names(&self) -> Vec<&str> {
        self.values
            .keys()
            .filter(|name| self.is_present(name))
            .map(String::as_str)
            .collect()
    }
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSet")
            .field("present", &self.present_names())
            .finish()
    }
}

/// Named on/off switches read at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticFlag {
    /// Suppress the default bootstrap behavior
    IgnoreBootstrap,
}

impl StaticFlag {
    /// Get all defined flags
    pub fn all() -> &'static [StaticFlag] {
        &[StaticFlag::IgnoreBootstrap]
    }

    /// Environment variable that raises this flag
    pub fn env_var(&self) -> &'static str {
        match self {
            StaticFlag::IgnoreBootstrap => "IGNORE_BOOTSTRAP",
        }
    }

    /// Get the string name of this flag
    pub fn as_str(&self) -> &'static str {
        match self {
            StaticFlag::IgnoreBootstrap => "ignore_bootstrap",
        }
    }
}

impl std::fmt::Display for StaticFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set of raised static flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticFlags {
    flags: BTreeSet<StaticFlag>,
}

impl StaticFlags {
    /// Create an empty flag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Read flags from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read flags through an arbitrary variable lookup
    ///
    /// A flag is raised by any non-empty value, including `"false"`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        StaticFlag::all()
            .iter()
            .copied()
            .filter(|flag| lookup(flag.env_var()).is_some_and(|v| !v.is_empty()))
            .collect()
    }

    /// Raise a flag
    pub fn with(mut self, flag: StaticFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    /// Raise a flag when `enabled` is true
    pub fn with_if(self, flag: StaticFlag, enabled: bool) -> Self {
        if enabled { self.with(flag) } else { self }
    }

    /// Merge another flag set into this one
    pub fn union(mut self, other: &StaticFlags) -> Self {
        self.flags.extend(other.flags.iter().copied());
        self
    }

    /// Check if a flag is raised
    pub fn contains(&self, flag: StaticFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Check if no flag is raised
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FromIterator<StaticFlag> for StaticFlags {
    fn from_iter<T: IntoIterator<Item = StaticFlag>>(iter: T) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_absent() {
        let creds = CredentialSet::from_pairs([
            ("OPENAI_API_KEY", ""),
            ("ANTHROPIC_API_KEY", "   "),
            ("DISCORD_API_TOKEN", "\t\n"),
            ("TELEGRAM_BOT_TOKEN", " tok "),
        ]);

        assert!(!creds.is_present("OPENAI_API_KEY"));
        assert!(!creds.is_present("ANTHROPIC_API_KEY"));
        assert!(!creds.is_present("DISCORD_API_TOKEN"));
        assert!(!creds.is_present("MISSING"));
        assert_eq!(creds.get("TELEGRAM_BOT_TOKEN"), Some("tok"));
        assert_eq!(creds.present_names(), vec!["TELEGRAM_BOT_TOKEN"]);
    }

    #[test]
    fn test_all_present_requires_every_name() {
        let creds = CredentialSet::from_pairs([("A", "1"), ("B", "2"), ("C", "")]);

        assert!(creds.all_present(&["A", "B"]));
        assert!(!creds.all_present(&["A", "B", "C"]));
        assert!(creds.all_present(&[]));
    }

    #[test]
    fn test_debug_hides_values() {
        let creds = CredentialSet::from_pairs([("OPENAI_API_KEY", "sk-secret-value")]);
        let rendered = format!("{:?}", creds);

        assert!(rendered.contains("OPENAI_API_KEY"));
        assert!(!rendered.contains("sk-secret-value"));
    }

    #[test]
    fn test_flags_from_lookup() {
        let raised = StaticFlags::from_lookup(|name| {
            (name == "IGNORE_BOOTSTRAP").then(|| "true".to_string())
        });
        assert!(raised.contains(StaticFlag::IgnoreBootstrap));

        let empty = StaticFlags::from_lookup(|_| Some(String::new()));
        assert!(!empty.contains(StaticFlag::IgnoreBootstrap));

        let unset = StaticFlags::from_lookup(|_| None);
        assert!(unset.is_empty());
    }

    #[test]
    fn test_flag_builders() {
        let flags = StaticFlags::new().with_if(StaticFlag::IgnoreBootstrap, false);
        assert!(flags.is_empty());

        let merged = flags.union(&StaticFlags::new().with(StaticFlag::IgnoreBootstrap));
        assert!(merged.contains(StaticFlag::IgnoreBootstrap));
    }
}
