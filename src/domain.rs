//! Domain models for sshd configuration files.
//!
//! A configuration file is a set of [`Directives`], each a [`Directive`] with
//! one or more values.

mod directive;
pub use directive::Directive;

pub mod directives;
pub use directives::{Directives, ParseError};
