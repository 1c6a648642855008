//! [`DataFix`] and [`DataFixRegistry`] — the unit of migration work and its
//! lookup table.
//!
//! A fix is addressed by `(TypeReference, fromVersion)`; several fixes may
//! share a key, and the registry preserves registration order within a key
//! so `DataFixer` applies them deterministically. Grounded on the ordered,
//! range-queryable registration table of the teacher's `MigrationRegistry`.

use crate::rewrite::{Typed, TypeRewriteRule};
use crate::value::DynamicOps;
use crate::version::{DataVersion, TypeReference};
use std::collections::BTreeMap;
use std::fmt;

/// The stable address of one registered fix, used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixId {
    pub type_ref: TypeReference,
    pub from_version: DataVersion,
    pub index: usize,
}

impl fmt::Display for FixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}#{}", self.type_ref, self.from_version, self.index)
    }
}

/// A single registered migration step: rewrite values of `type_ref` at
/// `from_version` into `to_version`.
pub struct DataFix<T, O> {
    pub type_ref: TypeReference,
    pub from_version: DataVersion,
    pub to_version: DataVersion,
    pub rule: TypeRewriteRule<T, O>,
}

impl<T, O> Clone for DataFix<T, O> {
    fn clone(&self) -> Self {
        Self {
            type_ref: self.type_ref.clone(),
            from_version: self.from_version,
            to_version: self.to_version,
            rule: self.rule.clone(),
        }
    }
}

impl<T, O> DataFix<T, O>
where
    T: Clone + fmt::Debug + 'static,
    O: DynamicOps<T> + 'static,
{
    /// Build a fix. Panics if `from_version > to_version`, mirroring the
    /// precondition `DataFixerBuilder::addFix` enforces at registration
    /// time (`spec.md` §4.G).
    pub fn new(
        type_ref: TypeReference,
        from_version: DataVersion,
        to_version: DataVersion,
        rule: TypeRewriteRule<T, O>,
    ) -> Self {
        assert!(
            from_version <= to_version,
            "fix fromVersion ({from_version}) must be <= toVersion ({to_version})"
        );
        Self {
            type_ref,
            from_version,
            to_version,
            rule,
        }
    }

    pub fn apply(&self, typed: &Typed<T, O>) -> crate::result::DataResult<Typed<T, O>> {
        self.rule.apply(typed)
    }
}

/// Registered fixes, keyed by `(TypeReference, fromVersion)`, preserving
/// registration order within a key.
pub struct DataFixRegistry<T, O> {
    by_key: BTreeMap<(TypeReference, DataVersion), Vec<DataFix<T, O>>>,
    frozen: bool,
}

impl<T, O> Default for DataFixRegistry<T, O> {
    fn default() -> Self {
        Self {
            by_key: BTreeMap::new(),
            frozen: false,
        }
    }
}

impl<T, O> DataFixRegistry<T, O>
where
    T: Clone + fmt::Debug + 'static,
    O: DynamicOps<T> + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fix. Fails if the registry is frozen.
    pub fn register(&mut self, fix: DataFix<T, O>) -> Result<FixId, crate::schema::RegistryFrozenError> {
        if self.frozen {
            return Err(crate::schema::RegistryFrozenError);
        }
        let key = (fix.type_ref.clone(), fix.from_version);
        let bucket = self.by_key.entry(key).or_default();
        let id = FixId {
            type_ref: fix.type_ref.clone(),
            from_version: fix.from_version,
            index: bucket.len(),
        };
        bucket.push(fix);
        Ok(id)
    }

    /// Fixes registered at exactly `(type_ref, from_version)`, in
    /// registration order.
    pub fn at(&self, type_ref: &TypeReference, from_version: DataVersion) -> &[DataFix<T, O>] {
        self.by_key
            .get(&(type_ref.clone(), from_version))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every `fromVersion` in `[from, to)` for `type_ref` that has at least
    /// one registered fix, in ascending order.
    pub fn versions_in_range(
        &self,
        type_ref: &TypeReference,
        from: DataVersion,
        to: DataVersion,
    ) -> Vec<DataVersion> {
        self.by_key
            .keys()
            .filter(|(t, v)| t == type_ref && *v >= from && *v < to)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Every fix registered for `type_ref` with `fromVersion` in
    /// `[from_inclusive, to_inclusive]`, flattened into one ordered list:
    /// ascending by `fromVersion`, then in registration order within a
    /// `fromVersion`.
    pub fn get_fixes(
        &self,
        type_ref: &TypeReference,
        from_inclusive: DataVersion,
        to_inclusive: DataVersion,
    ) -> Vec<DataFix<T, O>> {
        self.by_key
            .range((type_ref.clone(), from_inclusive)..=(type_ref.clone(), to_inclusive))
            .filter(|((t, _), _)| t == type_ref)
            .flat_map(|(_, fixes)| fixes.iter().cloned())
            .collect()
    }

    /// Whether any fix is registered for `type_ref` with `fromVersion` in
    /// `(from_exclusive, to_inclusive]`.
    pub fn has_fixes_in_range(&self, type_ref: &TypeReference, from_exclusive: DataVersion, to_inclusive: DataVersion) -> bool {
        if from_exclusive >= to_inclusive {
            return false;
        }
        self.by_key
            .range((type_ref.clone(), from_exclusive.next())..=(type_ref.clone(), to_inclusive))
            .any(|((t, _), fixes)| t == type_ref && !fixes.is_empty())
    }

    /// The highest `fromVersion` with any fix registered for `type_ref`.
    pub fn highest_from_version(&self, type_ref: &TypeReference) -> Option<DataVersion> {
        self.by_key
            .keys()
            .filter(|(t, _)| t == type_ref)
            .map(|(_, v)| *v)
            .max()
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
