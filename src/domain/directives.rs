//! The in-memory model of a configuration file.
//!
//! [`Directives`] maps each directive name to its [`Directive`]. It is built by
//! parsing text with [`str::parse`] and turned back into text with
//! [`ToString::to_string`].

use std::{
    collections::{HashMap, hash_map},
    fmt,
    str::FromStr,
    sync::LazyLock,
};

use regex::Regex;
use tracing::{debug, trace};

use super::Directive;

/// A name, one space, optional further ASCII whitespace, then a non-empty value.
///
/// Non-ASCII whitespace such as U+00A0 belongs to the value.
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_]+) [\t\n\x0C\r ]*(.+)$").expect("line pattern must compile")
});

/// Errors that can occur while parsing configuration text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// No line of the input was recognised as a directive.
    #[error("no entries found in file")]
    EmptyConfig,
}

/// The set of directives in a configuration file, keyed by name.
///
/// Names are unique and case-sensitive. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    entries: HashMap<String, Directive>,
}

impl Directives {
    /// Look up a directive by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.entries.get(name)
    }

    /// The values of a directive, most recently added first.
    ///
    /// Yields nothing if the directive is absent.
    pub fn values(&self, name: &str) -> impl Iterator<Item = &str> {
        self.entries.get(name).into_iter().flat_map(Directive::values)
    }

    /// Add a value to a directive.
    ///
    /// The value is placed before any existing values. If the directive does
    /// not exist yet it is created.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        debug!(name, %value, "adding value");
        match self.entries.entry(name.to_string()) {
            hash_map::Entry::Occupied(mut entry) => entry.get_mut().prepend(value),
            hash_map::Entry::Vacant(entry) => {
                entry.insert(Directive::new(name, value));
            }
        }
    }

    /// Replace every value of a directive with a single value.
    ///
    /// The directive is created if it does not exist.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        debug!(name, %value, "setting value");
        match self.entries.entry(name.to_string()) {
            hash_map::Entry::Occupied(mut entry) => entry.get_mut().replace(value),
            hash_map::Entry::Vacant(entry) => {
                entry.insert(Directive::new(name, value));
            }
        }
    }

    /// Remove a directive, returning it if it was present.
    pub fn unset(&mut self, name: &str) -> Option<Directive> {
        let removed = self.entries.remove(name);
        debug!(name, removed = removed.is_some(), "unset directive");
        removed
    }

    /// Iterate over the directives in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.entries.values()
    }

    /// The number of distinct directive names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render every `name value` pair as a line, sorted lexicographically.
    ///
    /// Lines are sorted as whole strings, so the values of one directive are
    /// not necessarily adjacent.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .iter()
            .flat_map(|directive| {
                directive
                    .values()
                    .map(move |value| format!("{} {value}", directive.name()))
            })
            .collect();
        lines.sort();
        lines
    }
}

impl FromStr for Directives {
    type Err = ParseError;

    /// Parse configuration text.
    ///
    /// Blank lines and lines that don't look like `name value` are skipped.
    /// Tabs are treated as spaces.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyConfig`] if no directive was found.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut directives = Self::default();

        for line in s.lines().filter(|line| !line.is_empty()) {
            let line = line.replace('\t', " ");
            let Some(captures) = LINE_PATTERN.captures(&line) else {
                trace!(%line, "skipping unrecognised line");
                continue;
            };
            directives.add(&captures[1], &captures[2]);
        }

        if directives.is_empty() {
            return Err(ParseError::EmptyConfig);
        }

        Ok(directives)
    }
}

impl fmt::Display for Directives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

impl<'a> IntoIterator for &'a Directives {
    type Item = &'a Directive;
    type IntoIter = hash_map::Values<'a, String, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}
