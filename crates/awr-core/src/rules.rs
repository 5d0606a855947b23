//! Category rule table embedded into the query script.
//!
//! The rules are declarative: matching happens inside the query service,
//! this process only serialises them in order.

use serde::ser::{Serialize, SerializeTuple, Serializer};
use thiserror::Error;

use crate::event::CategoryPath;

/// Rule construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The category path had no segments.
    #[error("category path cannot be empty")]
    EmptyPath,
    /// One of the path segments was empty.
    #[error("category path segment {index} cannot be empty")]
    EmptySegment { index: usize },
    /// The regex pattern was empty.
    #[error("pattern for {path} cannot be empty")]
    EmptyPattern { path: String },
    /// The rule table could not be encoded.
    #[error("failed to encode rule table: {0}")]
    Encode(String),
}

/// Matches window titles against a regex and assigns `path` on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub path: CategoryPath,
    pub pattern: String,
    pub ignore_case: bool,
}

impl CategoryRule {
    /// Creates a validated rule.
    pub fn new(
        path: CategoryPath,
        pattern: impl Into<String>,
        ignore_case: bool,
    ) -> Result<Self, RuleError> {
        if path.is_empty() {
            return Err(RuleError::EmptyPath);
        }
        if let Some(index) = path.segments().iter().position(|s| s.trim().is_empty()) {
            return Err(RuleError::EmptySegment { index });
        }
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(RuleError::EmptyPattern { path: path.key() });
        }
        Ok(Self {
            path,
            pattern,
            ignore_case,
        })
    }
}

/// Wire form of the matcher half of a rule.
#[derive(serde::Serialize)]
struct RegexMatcher<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    regex: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    ignore_case: bool,
}

/// Serialises as `[[segment, ...], {"type": "regex", "regex": ..., "ignore_case": true}]`.
impl Serialize for CategoryRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.path)?;
        pair.serialize_element(&RegexMatcher {
            kind: "regex",
            regex: &self.pattern,
            ignore_case: self.ignore_case,
        })?;
        pair.end()
    }
}

struct BuiltinRule {
    path: &'static [&'static str],
    pattern: &'static str,
    ignore_case: bool,
}

const BUILTIN_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        path: &["Work"],
        pattern: "Google Docs",
        ignore_case: false,
    },
    BuiltinRule {
        path: &["Work", "Programming"],
        pattern: "GitHub|Stack Overflow",
        ignore_case: false,
    },
    BuiltinRule {
        path: &["Work", "Programming", "ActivityWatch"],
        pattern: "ActivityWatch|aw-",
        ignore_case: true,
    },
    BuiltinRule {
        path: &["Media", "Games"],
        pattern: "Minecraft|RimWorld",
        ignore_case: false,
    },
    BuiltinRule {
        path: &["Media", "Video"],
        pattern: "YouTube|Plex",
        ignore_case: false,
    },
    BuiltinRule {
        path: &["Media", "Social Media"],
        pattern: "reddit|Facebook|Twitter|Instagram",
        ignore_case: true,
    },
    BuiltinRule {
        path: &["Comms", "IM"],
        pattern: "Messenger|Telegram|Signal|WhatsApp",
        ignore_case: false,
    },
    BuiltinRule {
        path: &["Comms", "Email"],
        pattern: "Gmail",
        ignore_case: false,
    },
];

/// Ordered list of category rules. Order matters to the query service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct CategoryRuleSet {
    rules: Vec<CategoryRule>,
}

impl CategoryRuleSet {
    pub const fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// The built-in rule table.
    pub fn default_rules() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|rule| CategoryRule {
                path: CategoryPath::new(rule.path.iter().copied()),
                pattern: rule.pattern.to_string(),
                ignore_case: rule.ignore_case,
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Renders the table as the JSON literal assigned to `classes` in the query.
    pub fn to_query_literal(&self) -> Result<String, RuleError> {
        serde_json::to_string(self).map_err(|err| RuleError::Encode(err.to_string()))
    }
}

impl Default for CategoryRuleSet {
    fn default() -> Self {
        Self::default_rules()
    }
}
