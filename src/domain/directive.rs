use nonempty::NonEmpty;

/// A single configuration key together with every value declared for it.
///
/// A directive always holds at least one value. A value may be the empty
/// string, which is distinct from the directive being absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: String,
    values: NonEmpty<String>,
}

impl Directive {
    /// Create a directive holding a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: NonEmpty::new(value.into()),
        }
    }

    /// The name of the directive, e.g. `PermitRootLogin`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first value.
    ///
    /// This is the most recently added value, since new values are prepended.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.values.head
    }

    /// All values, most recently added first.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// The number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; present for symmetry with [`Self::len`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Place a value in front of the existing ones.
    pub fn prepend(&mut self, value: impl Into<String>) {
        let previous = std::mem::replace(&mut self.values, NonEmpty::new(value.into()));
        self.values.tail = previous.into();
    }

    /// Discard every existing value and keep only `value`.
    pub fn replace(&mut self, value: impl Into<String>) {
        self.values = NonEmpty::new(value.into());
    }
}
