//! Validation of directives against a rulebook of best practices.
//!
//! Each directive name maps to zero or more explicit [`Rule`]s in a
//! [`Rulebook`]. On top of those, every directive must have non-empty values
//! and at most one value, unless exempted. Rules only ever look at a single
//! directive, so the violations found do not depend on iteration order.
//!
//! ```
//! use sshd_config::{Directives, lint};
//!
//! let directives: Directives = "PermitRootLogin yes".parse().unwrap();
//! let report = lint::lint(&directives);
//! assert!(!report.is_ok());
//! ```

mod rule;
mod rulebook;
mod violation;

use serde::Serialize;

pub use rule::Rule;
pub use rulebook::Rulebook;
pub use violation::{Violation, ViolationKind};

use crate::Directives;

/// Check directives against the built-in best-practice [`Rulebook`].
#[must_use]
pub fn lint(directives: &Directives) -> Report {
    Rulebook::best_practices().lint(directives)
}

/// The outcome of linting a set of directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    ok: bool,
    violations: Vec<Violation>,
}

impl Report {
    fn new(violations: Vec<Violation>) -> Self {
        Self {
            ok: violations.is_empty(),
            violations,
        }
    }

    /// Returns `true` if no violations were found.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.ok
    }

    /// Every violation found, in no particular order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}
