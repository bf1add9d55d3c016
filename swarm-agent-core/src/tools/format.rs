//! Parameter format constraints
//!
//! Every declared parameter carries one [`ParamFormat`]. A format check only
//! looks at the value's shape; whether the value was actually supplied by the
//! user is decided elsewhere.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static HEX_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{64}$").expect("hex identifier pattern is valid"));

/// Highest redundancy level the storage network accepts
pub const MAX_REDUNDANCY_LEVEL: u64 = 4;

/// Format constraint for one tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamFormat {
    /// Exactly 64 hexadecimal characters, any case, no `0x` prefix
    HexIdentifier,

    /// Positive duration literal such as `1d`, `1w` or `1month`
    DurationLiteral,

    /// Non-negative integer, as a JSON number or a string of digits
    UnsignedInteger,

    /// Integer between 0 and [`MAX_REDUNDANCY_LEVEL`]
    RedundancyLevel,

    /// JSON boolean, or the strings `true` / `false`
    Boolean,

    /// Any non-empty value
    FreeText,
}

impl ParamFormat {
    /// Human-readable description used in rejection messages
    pub fn describe(&self) -> &'static str {
        match self {
            ParamFormat::HexIdentifier => "64-character hexadecimal string",
            ParamFormat::DurationLiteral => "duration literal (e.g. 1d, 1w, 1month)",
            ParamFormat::UnsignedInteger => "non-negative integer",
            ParamFormat::RedundancyLevel => "redundancy level between 0 and 4",
            ParamFormat::Boolean => "boolean (true or false)",
            ParamFormat::FreeText => "free text",
        }
    }

    /// Check a value against this format
    pub fn check(&self, value: &Value) -> bool {
        match self {
            ParamFormat::HexIdentifier => value.as_str().is_some_and(is_hex_identifier),
            ParamFormat::DurationLiteral => value.as_str().is_some_and(is_duration_literal),
            ParamFormat::UnsignedInteger => as_unsigned(value).is_some(),
            ParamFormat::RedundancyLevel => {
                as_unsigned(value).is_some_and(|level| level <= MAX_REDUNDANCY_LEVEL)
            }
            ParamFormat::Boolean => match value {
                Value::Bool(_) => true,
                Value::String(s) => matches!(s.as_str(), "true" | "false"),
                _ => false,
            },
            ParamFormat::FreeText => match value {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                _ => true,
            },
        }
    }
}

impl std::fmt::Display for ParamFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Check for a 64-character hex identifier (batch id, reference)
pub fn is_hex_identifier(s: &str) -> bool {
    HEX_IDENTIFIER.is_match(s)
}

/// Check for a strictly positive duration literal
pub fn is_duration_literal(s: &str) -> bool {
    humantime::parse_duration(s).is_ok_and(|d| !d.is_zero())
}

fn as_unsigned(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;
    use serde_json::json;

    const BATCH: &str = "3b3881ac37f936a4023a4562c69f1f138df8c1c24994f7b047514fbcbe9388fa";

    #[test]
    fn test_hex_identifier() {
        assert!(ParamFormat::HexIdentifier.check(&json!(BATCH)));
        assert!(ParamFormat::HexIdentifier.check(&json!(BATCH.to_uppercase())));

        // 65 characters
        assert!(!ParamFormat::HexIdentifier.check(&json!(format!("zz{}", &BATCH[..63]))));
        assert!(!ParamFormat::HexIdentifier.check(&json!(format!("{}a", BATCH))));
        // 63 characters
        assert!(!ParamFormat::HexIdentifier.check(&json!(&BATCH[1..])));
        assert!(!ParamFormat::HexIdentifier.check(&json!(format!("0x{}", &BATCH[2..]))));
        assert!(!ParamFormat::HexIdentifier.check(&json!(format!(" {}", &BATCH[1..]))));
        assert!(!ParamFormat::HexIdentifier.check(&json!(BATCH.replace('a', "g"))));
        assert!(!ParamFormat::HexIdentifier.check(&json!(12345)));
    }

    #[test]
    fn test_duration_literal() {
        for ok in ["1d", "4d", "1w", "1month", "2weeks", "12h", "1d 12h"] {
            assert!(ParamFormat::DurationLiteral.check(&json!(ok)), "{} rejected", ok);
        }
        for bad in ["", "0s", "soon", "4 days later", "-1d"] {
            assert!(!ParamFormat::DurationLiteral.check(&json!(bad)), "{} accepted", bad);
        }
        assert!(!ParamFormat::DurationLiteral.check(&json!(4)));
    }

    #[test]
    fn test_unsigned_integer() {
        assert!(ParamFormat::UnsignedInteger.check(&json!(10)));
        assert!(ParamFormat::UnsignedInteger.check(&json!("10")));
        assert!(ParamFormat::UnsignedInteger.check(&json!(0)));
        assert!(!ParamFormat::UnsignedInteger.check(&json!(-1)));
        assert!(!ParamFormat::UnsignedInteger.check(&json!(1.5)));
        assert!(!ParamFormat::UnsignedInteger.check(&json!("10MB")));
        assert!(!ParamFormat::UnsignedInteger.check(&json!("")));
        assert!(!ParamFormat::UnsignedInteger.check(&json!("+3")));
    }

    #[test]
    fn test_redundancy_level() {
        for level in 0..=4 {
            assert!(ParamFormat::RedundancyLevel.check(&json!(level)));
        }
        assert!(ParamFormat::RedundancyLevel.check(&json!("2")));
        assert!(!ParamFormat::RedundancyLevel.check(&json!(5)));
    }

    #[test]
    fn test_boolean_and_free_text() {
        assert!(ParamFormat::Boolean.check(&json!(true)));
        assert!(ParamFormat::Boolean.check(&json!("false")));
        assert!(!ParamFormat::Boolean.check(&json!("yes")));

        assert!(ParamFormat::FreeText.check(&json!("Hello World!")));
        assert!(ParamFormat::FreeText.check(&json!(42)));
        assert!(ParamFormat::FreeText.check(&json!({"k": "v"})));
        assert!(!ParamFormat::FreeText.check(&json!("  ")));
        assert!(!ParamFormat::FreeText.check(&Value::Null));
    }
}
