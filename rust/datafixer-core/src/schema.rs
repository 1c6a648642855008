//! [`Schema`] and [`SchemaRegistry`] — versioned type-shape bookkeeping.
//!
//! A `Schema` is deliberately light here: the fixer pipeline drives
//! migrations off `DataFix` registrations, not off schema definitions, so a
//! `Schema` only needs to record which version it represents and let a
//! bootstrap author attach arbitrary per-type metadata (field lists, default
//! codecs, whatever the embedding application finds useful for diffing).
//! Grounded on the floor-lookup and freeze semantics of the teacher's
//! `MigrationRegistry` (`versioning.rs`).

use crate::context::DataFixerError;
use crate::version::{DataVersion, TypeReference};
use std::collections::BTreeMap;
use std::fmt;

/// A named schema generation.
#[derive(Debug, Clone)]
pub struct Schema {
    version: DataVersion,
    name: String,
}

impl Schema {
    pub fn new(version: DataVersion, name: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
        }
    }

    pub fn version(&self) -> DataVersion {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Registered schemas, keyed by version. [`SchemaRegistry::get`] has
/// floor-semantics lookup: asking for a version between two registered
/// schemas returns the highest registered schema at or below it —
/// [`SchemaRegistry::get_exact`] is the non-floor, precise-match
/// alternative.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<DataVersion, Schema>,
    frozen: bool,
}

/// Raised when a registry operation is attempted after [`SchemaRegistry::freeze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryFrozenError;

impl fmt::Display for RegistryFrozenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema registry is frozen and cannot accept new registrations")
    }
}

impl std::error::Error for RegistryFrozenError {}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema. Fails if the registry is frozen or if a schema is
    /// already registered at this exact version.
    pub fn register(&mut self, schema: Schema) -> Result<(), RegistryFrozenError> {
        if self.frozen {
            return Err(RegistryFrozenError);
        }
        self.schemas.insert(schema.version, schema);
        Ok(())
    }

    /// The highest registered schema at or below `version` — floor
    /// semantics, per `spec.md` §3/§184: a lookup between two registered
    /// generations resolves to the nearer one below, the same rule the
    /// teacher's `MigrationRegistry` uses to resolve a snapshot's declared
    /// version against sparse migration registrations.
    pub fn get(&self, version: DataVersion) -> Option<&Schema> {
        self.schemas.range(..=version).next_back().map(|(_, schema)| schema)
    }

    /// The schema registered at exactly `version`, with no floor fallback.
    pub fn get_exact(&self, version: DataVersion) -> Option<&Schema> {
        self.schemas.get(&version)
    }

    /// [`SchemaRegistry::get`], surfacing a [`DataFixerError::Schema`]
    /// instead of `None` when nothing is registered at or below `version`.
    /// `type_ref` is carried only for the error's diagnostic context — a
    /// `SchemaRegistry` itself has no per-type dimension (one schema's
    /// `TypeRegistry` covers every type at that version).
    pub fn require(&self, type_ref: &TypeReference, version: DataVersion) -> Result<&Schema, DataFixerError> {
        self.get(version).ok_or_else(|| DataFixerError::Schema {
            type_ref: type_ref.clone(),
            version,
            message: format!("no schema registered at or below version {version}"),
        })
    }

    /// The highest registered version, if any.
    pub fn latest(&self) -> Option<DataVersion> {
        self.schemas.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// All registered versions, in ascending order.
    pub fn versions(&self) -> impl Iterator<Item = DataVersion> + '_ {
        self.schemas.keys().copied()
    }

    /// All registered schemas, in ascending version order.
    pub fn stream(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Prevent any further registrations. Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_highest_schema_at_or_below() {
        let mut registry = SchemaRegistry::new();
        registry.register(Schema::new(DataVersion::new(0), "v0")).unwrap();
        registry.register(Schema::new(DataVersion::new(10), "v10")).unwrap();

        assert_eq!(registry.get(DataVersion::new(5)).unwrap().name(), "v0");
        assert_eq!(registry.get(DataVersion::new(10)).unwrap().name(), "v10");
        assert_eq!(registry.get(DataVersion::new(999)).unwrap().name(), "v10");
    }

    #[test]
    fn get_is_none_below_every_registration() {
        let mut registry = SchemaRegistry::new();
        registry.register(Schema::new(DataVersion::new(5), "v5")).unwrap();
        assert!(registry.get(DataVersion::new(0)).is_none());
    }

    #[test]
    fn get_exact_requires_an_exact_match() {
        let mut registry = SchemaRegistry::new();
        registry.register(Schema::new(DataVersion::new(5), "v5")).unwrap();
        assert!(registry.get_exact(DataVersion::new(5)).is_some());
        assert!(registry.get_exact(DataVersion::new(6)).is_none());
    }

    #[test]
    fn freeze_rejects_further_registrations() {
        let mut registry = SchemaRegistry::new();
        registry.freeze();
        let result = registry.register(Schema::new(DataVersion::new(1), "v1"));
        assert_eq!(result, Err(RegistryFrozenError));
    }

    #[test]
    fn latest_and_is_empty_reflect_registrations() {
        let mut registry = SchemaRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.latest().is_none());

        registry.register(Schema::new(DataVersion::new(3), "v3")).unwrap();
        assert!(!registry.is_empty());
        assert_eq!(registry.latest(), Some(DataVersion::new(3)));
    }

    #[test]
    fn require_returns_schema_error_when_nothing_registered_at_or_below() {
        let mut registry = SchemaRegistry::new();
        registry.register(Schema::new(DataVersion::new(5), "v5")).unwrap();
        let type_ref = TypeReference::from_static("player");
        let err = registry.require(&type_ref, DataVersion::new(2)).unwrap_err();
        assert!(matches!(err, DataFixerError::Schema { .. }));
        assert_eq!(err.to_string(), "schema error for player at version 2: no schema registered at or below version 2");
    }

    #[test]
    fn require_succeeds_when_a_floor_schema_exists() {
        let mut registry = SchemaRegistry::new();
        registry.register(Schema::new(DataVersion::new(0), "v0")).unwrap();
        let type_ref = TypeReference::from_static("player");
        assert_eq!(registry.require(&type_ref, DataVersion::new(5)).unwrap().name(), "v0");
    }
}
