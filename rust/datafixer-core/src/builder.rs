//! Two-phase bootstrap: register schemas and fixes, then freeze into an
//! immutable [`crate::fixer::DataFixer`].
//!
//! There is no file-based configuration surface in this library — the
//! builder *is* the configuration layer an embedding application drives,
//! mirroring how the teacher's `MigrationRegistry` is assembled once at
//! startup via a sequence of registration calls before first use.

use crate::context::{DataFixerContext, SilentContext};
use crate::fix::{DataFix, DataFixRegistry, FixId};
use crate::fixer::DataFixer;
use crate::rewrite::TypeRewriteRule;
use crate::schema::{RegistryFrozenError, Schema, SchemaRegistry};
use crate::value::DynamicOps;
use crate::version::{DataVersion, TypeReference};
use std::fmt;
use std::sync::Arc;

/// Accumulates fix and schema registrations before [`DataFixerBuilder::build`]
/// freezes them into a [`DataFixer`].
pub struct DataFixerBuilder<T, O> {
    current_version: DataVersion,
    fixes: DataFixRegistry<T, O>,
    schemas: SchemaRegistry,
    default_context: Option<Arc<dyn DataFixerContext>>,
}

impl<T, O> DataFixerBuilder<T, O>
where
    T: Clone + fmt::Debug + 'static,
    O: DynamicOps<T> + 'static,
{
    pub fn new(current_version: DataVersion) -> Self {
        Self {
            current_version,
            fixes: DataFixRegistry::new(),
            schemas: SchemaRegistry::new(),
            default_context: None,
        }
    }

    /// Register a single fix. Panics if `from_version > to_version`
    /// (enforced by [`DataFix::new`]) or if this builder was already
    /// consumed by [`DataFixerBuilder::build`].
    pub fn add_fix(
        &mut self,
        type_ref: TypeReference,
        from_version: DataVersion,
        to_version: DataVersion,
        rule: TypeRewriteRule<T, O>,
    ) -> FixId {
        let fix = DataFix::new(type_ref, from_version, to_version, rule);
        self.fixes
            .register(fix)
            .expect("DataFixerBuilder: registry unexpectedly frozen before build()")
    }

    /// Register several fixes for the same type in one call, each one
    /// version step at a time (`from`, `from + 1`), in the order given.
    pub fn add_fixes(
        &mut self,
        type_ref: TypeReference,
        start: DataVersion,
        rules: impl IntoIterator<Item = TypeRewriteRule<T, O>>,
    ) -> Vec<FixId> {
        let mut version = start;
        let mut ids = Vec::new();
        for rule in rules {
            let next = version.next();
            ids.push(self.add_fix(type_ref.clone(), version, next, rule));
            version = next;
        }
        ids
    }

    /// Register a schema. Fails only if the builder's schema registry was
    /// already frozen (impossible through the public API before `build`).
    pub fn add_schema(&mut self, schema: Schema) -> Result<(), RegistryFrozenError> {
        self.schemas.register(schema)
    }

    /// Supply the diagnostics sink `update` without an explicit context
    /// falls back to, overriding the library default of [`crate::context::SilentContext`].
    pub fn with_default_context(mut self, ctx: Arc<dyn DataFixerContext>) -> Self {
        self.default_context = Some(ctx);
        self
    }

    /// Freeze both registries and produce the immutable pipeline.
    pub fn build(mut self) -> DataFixer<T, O> {
        self.fixes.freeze();
        self.schemas.freeze();
        let default_context = self.default_context.unwrap_or_else(|| Arc::new(SilentContext));
        DataFixer::new(self.current_version, self.fixes, self.schemas, default_context)
    }
}

/// A reusable bundle of fix registrations an embedding application can apply
/// to several builders (e.g. shared fixes across related types).
pub trait FixRegistrar<T, O>
where
    T: Clone + fmt::Debug + 'static,
    O: DynamicOps<T> + 'static,
{
    fn register(&self, builder: &mut DataFixerBuilder<T, O>);

    /// Apply `self`, then `other`, to the same builder.
    fn register_all(&self, builder: &mut DataFixerBuilder<T, O>, others: &[&dyn FixRegistrar<T, O>]) {
        self.register(builder);
        for other in others {
            other.register(builder);
        }
    }
}

/// The bootstrap hook an embedding application implements to describe its
/// own schemas and fixes, analogous to the teacher's
/// `MigrationRegistry`-construction call site, but expressed as a trait so
/// it can be unit tested independent of any particular `DataFixer` instance.
pub trait DataFixerBootstrap<T, O>
where
    T: Clone + fmt::Debug + 'static,
    O: DynamicOps<T> + 'static,
{
    fn register_schemas(&self, builder: &mut DataFixerBuilder<T, O>);
    fn register_fixes(&self, builder: &mut DataFixerBuilder<T, O>);
}

/// Builds a frozen [`DataFixer`] from a [`DataFixerBootstrap`] in one call.
pub struct DataFixerRuntimeFactory;

impl DataFixerRuntimeFactory {
    pub fn create<T, O>(current_version: DataVersion, bootstrap: &dyn DataFixerBootstrap<T, O>) -> DataFixer<T, O>
    where
        T: Clone + fmt::Debug + 'static,
        O: DynamicOps<T> + 'static,
    {
        let mut builder = DataFixerBuilder::new(current_version);
        bootstrap.register_schemas(&mut builder);
        bootstrap.register_fixes(&mut builder);
        builder.build()
    }
}
