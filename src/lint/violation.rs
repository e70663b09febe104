use std::fmt;

use serde::Serialize;

/// A single mismatch between a directive's values and one of its rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Violation {
    /// The name of the offending directive.
    pub directive: String,
    /// What was wrong with it.
    pub kind: ViolationKind,
}

/// The ways a directive can fail a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The first value is not the recommended one.
    Mismatch {
        /// The recommended value.
        expected: &'static str,
        /// The value found.
        actual: String,
    },
    /// A value, or a comma-separated token of a value, is not permitted.
    NotAllowed {
        /// The permitted values.
        allowed: &'static [&'static str],
        /// The offending value or token.
        actual: String,
    },
    /// A value is the empty string.
    Empty,
    /// A value is not a base-10 integer.
    NotInteger {
        /// The value found.
        actual: String,
    },
    /// More than one value was declared for a directive that takes one.
    MultipleValues {
        /// How many values were found.
        count: usize,
    },
}

impl Violation {
    pub(crate) fn new(directive: &str, kind: ViolationKind) -> Self {
        Self {
            directive: directive.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "for key '{}', ", self.directive)?;
        match &self.kind {
            ViolationKind::Mismatch { expected, actual } => {
                write!(f, "expected {expected}, actual '{actual}'")
            }
            ViolationKind::NotAllowed { allowed, actual } => {
                write!(f, "expected one of '{}', actual '{actual}'", allowed.join(", "))
            }
            ViolationKind::Empty => f.write_str("value may not be empty"),
            ViolationKind::NotInteger { actual } => {
                write!(f, "expected integer, actual '{actual}'")
            }
            ViolationKind::MultipleValues { .. } => f.write_str("multiple values not allowed"),
        }
    }
}
