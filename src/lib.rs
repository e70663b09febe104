//! Editing and linting of OpenSSH server configuration files.
//!
//! A configuration file is parsed into [`Directives`], a map from directive
//! name to its values. Directives can be added, replaced or removed and then
//! written back, or checked against a rulebook of security best practices with
//! [`lint::lint`].

pub mod domain;
pub use domain::{Directive, Directives, ParseError};

pub mod lint;
pub use lint::{Report, Rule, Rulebook, Violation};

/// Loading and saving configuration files.
pub mod storage;
pub use storage::ConfigFile;
