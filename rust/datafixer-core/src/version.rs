//! Version and type identifiers used as registry keys throughout the fixer
//! pipeline.
//!
//! [`DataVersion`] plays the same role `SchemaVersion` plays for snapshot
//! migration in an ordinary runtime: a totally ordered tag naming a schema
//! generation. Here it collapses to a single non-negative integer rather than
//! a `(major, minor, patch)` triple, matching `spec.md` §3.

use std::borrow::Cow;
use std::fmt;

/// A non-negative integer schema generation.
///
/// Two versions are equal iff their integer values are equal; ordering is
/// the natural integer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataVersion(u32);

impl DataVersion {
    /// The lowest representable version.
    pub const ZERO: DataVersion = DataVersion(0);

    /// Construct a version from a raw integer.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The underlying integer value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// `self + 1`.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for DataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DataVersion {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An opaque identifier naming a logical entity (e.g. `"player"`, `"world"`).
///
/// Equality and hashing are by identifier, not by any structural schema
/// information — two `TypeReference`s are the same type iff their names
/// match, deliberately avoiding the reflective "class as identity" pattern
/// `spec.md` §9 calls out for re-architecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeReference(Cow<'static, str>);

impl TypeReference {
    /// Construct a type reference from a `'static` name, avoiding an
    /// allocation for the common case of naming a type with a literal.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Construct a type reference from an owned or borrowed string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The identifier text.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&'static str> for TypeReference {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for TypeReference {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_integer_order() {
        assert!(DataVersion::new(1) < DataVersion::new(2));
        assert_eq!(DataVersion::new(3), DataVersion::new(3));
        assert!(DataVersion::ZERO < DataVersion::new(1));
    }

    #[test]
    fn next_increments() {
        assert_eq!(DataVersion::new(4).next(), DataVersion::new(5));
    }

    #[test]
    fn type_reference_equality_is_by_name() {
        let a = TypeReference::from_static("player");
        let b = TypeReference::new("player".to_string());
        let c = TypeReference::from_static("world");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
