//! [`DataFixer`] — the migration pipeline entry point.
//!
//! `update` walks every registered fix between `from` and `to` for a given
//! type, applying each in turn and failing fast the moment one errors.
//! Grounded on the sequential migration-application loop of the teacher's
//! `MigrationRegistry::migrate`, generalized from a single migration chain
//! per snapshot to one addressed by `(TypeReference, DataVersion)` pairs.

use crate::context::{DataFixerContext, DataFixerError};
use crate::fix::DataFixRegistry;
use crate::rewrite::Typed;
use crate::schema::SchemaRegistry;
use crate::value::DynamicOps;
use crate::version::{DataVersion, TypeReference};
use std::fmt;
use std::sync::Arc;

/// The frozen, immutable migration pipeline built by
/// [`crate::builder::DataFixerBuilder::build`].
pub struct DataFixer<T, O> {
    current_version: DataVersion,
    fixes: DataFixRegistry<T, O>,
    schemas: SchemaRegistry,
    default_context: Arc<dyn DataFixerContext>,
}

impl<T, O> DataFixer<T, O>
where
    T: Clone + fmt::Debug + 'static,
    O: DynamicOps<T> + 'static,
{
    pub(crate) fn new(
        current_version: DataVersion,
        fixes: DataFixRegistry<T, O>,
        schemas: SchemaRegistry,
        default_context: Arc<dyn DataFixerContext>,
    ) -> Self {
        Self {
            current_version,
            fixes,
            schemas,
            default_context,
        }
    }

    /// The version this fixer migrates documents up to.
    pub fn current_version(&self) -> DataVersion {
        self.current_version
    }

    /// The highest `fromVersion` with any fix registered for `type_ref`, if
    /// any (`spec.md` §4.H addition).
    pub fn current_version_for(&self, type_ref: &TypeReference) -> Option<DataVersion> {
        self.fixes.highest_from_version(type_ref)
    }

    /// Migrate `input`, tagged as `type_ref` at `from`, up to `to`, using
    /// this fixer's default diagnostics sink ([`SilentContext`] unless the
    /// builder was given one via `with_default_context`).
    pub fn update(
        &self,
        type_ref: TypeReference,
        input: crate::value::Dynamic<T, O>,
        from: DataVersion,
        to: DataVersion,
    ) -> Result<crate::value::Dynamic<T, O>, DataFixerError> {
        let ctx = self.default_context.clone();
        self.update_with_context(type_ref, input, from, to, ctx.as_ref())
    }

    /// [`DataFixer::update`], reporting progress through `ctx`.
    pub fn update_with_context(
        &self,
        type_ref: TypeReference,
        input: crate::value::Dynamic<T, O>,
        from: DataVersion,
        to: DataVersion,
        ctx: &dyn DataFixerContext,
    ) -> Result<crate::value::Dynamic<T, O>, DataFixerError> {
        if from > to {
            return Err(DataFixerError::IllegalArgument {
                message: format!("fromVersion ({from}) must be <= toVersion ({to})"),
            });
        }
        if to > self.current_version {
            return Err(DataFixerError::IllegalArgument {
                message: format!(
                    "toVersion ({to}) must be <= this fixer's current version ({})",
                    self.current_version
                ),
            });
        }

        if from == to {
            ctx.info(&format!("{type_ref}: already at version {from}, nothing to do"));
            return Ok(input);
        }

        let mut steps = self.fixes.versions_in_range(&type_ref, from, to);
        if steps.is_empty() {
            ctx.info(&format!("{type_ref}: no fixes registered in [{from}, {to}), returning input unchanged"));
            return Ok(input);
        }
        steps.sort();

        let mut typed = Typed::new(type_ref.clone(), input);
        for step_version in steps {
            for (index, fix) in self.fixes.at(&type_ref, step_version).iter().enumerate() {
                ctx.info(&format!("{type_ref}: applying fix {step_version} -> {}", fix.to_version));
                typed = match fix.apply(&typed) {
                    crate::result::DataResult::Success(value) => value,
                    crate::result::DataResult::Error { message, .. } => {
                        let fix_id = crate::fix::FixId {
                            type_ref: type_ref.clone(),
                            from_version: step_version,
                            index,
                        };
                        ctx.warn(&format!("{fix_id} failed: {message}"));
                        return Err(DataFixerError::Fix {
                            fix_id,
                            message,
                            cause: None,
                        });
                    }
                };
            }
        }

        Ok(typed.value)
    }

    /// Exposes `SchemaRegistry` lookups for bootstrap-author diagnostics
    /// tooling (schema diffing is out of scope, but the registry itself is
    /// already built and cheap to expose read-only).
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DataFixerBuilder;
    use crate::rewrite::TypeRewriteRule;
    use crate::value::test_support::{TestOps, TestValue as V};
    use crate::value::{Dynamic, Number};

    fn player() -> TypeReference {
        TypeReference::from_static("player")
    }

    fn rename_name_to_username() -> TypeRewriteRule<V, TestOps> {
        TypeRewriteRule::simple("rename name->username", |dynamic| {
            match dynamic.get("name") {
                Some(name) => {
                    let ops = dynamic.ops();
                    let removed = ops.remove(dynamic.value.clone(), "name");
                    let updated = ops.set(removed, "username", name.value);
                    crate::result::DataResult::success(Dynamic::new(ops, updated))
                }
                None => crate::result::DataResult::success(dynamic.clone()),
            }
        })
    }

    #[test]
    fn from_equals_to_is_identity() {
        let mut builder = DataFixerBuilder::new(DataVersion::new(5));
        builder.add_fix(player(), DataVersion::new(0), DataVersion::new(1), TypeRewriteRule::identity());
        let fixer = builder.build();

        let input = Dynamic::new(TestOps, V::Str("unchanged".into()));
        let result = fixer.update(player(), input.clone(), DataVersion::new(2), DataVersion::new(2)).unwrap();
        assert_eq!(result.value, input.value);
    }

    #[test]
    fn no_registered_fixes_is_identity() {
        let builder = DataFixerBuilder::new(DataVersion::new(5));
        let fixer = builder.build();

        let input = Dynamic::new(TestOps, V::Str("unchanged".into()));
        let result = fixer.update(player(), input.clone(), DataVersion::new(0), DataVersion::new(5)).unwrap();
        assert_eq!(result.value, input.value);
    }

    #[test]
    fn precondition_rejects_from_greater_than_to() {
        let builder = DataFixerBuilder::new(DataVersion::new(5));
        let fixer = builder.build();
        let input = Dynamic::new(TestOps, V::Str("x".into()));
        let err = fixer.update(player(), input, DataVersion::new(3), DataVersion::new(1));
        assert!(matches!(err, Err(DataFixerError::IllegalArgument { .. })));
    }

    #[test]
    fn precondition_rejects_to_above_current_version() {
        let builder = DataFixerBuilder::new(DataVersion::new(5));
        let fixer = builder.build();
        let input = Dynamic::new(TestOps, V::Str("x".into()));
        let err = fixer.update(player(), input, DataVersion::new(0), DataVersion::new(6));
        assert!(matches!(err, Err(DataFixerError::IllegalArgument { .. })));
    }

    #[test]
    fn single_field_rename_applies() {
        let mut builder = DataFixerBuilder::new(DataVersion::new(2));
        builder.add_fix(player(), DataVersion::new(0), DataVersion::new(1), rename_name_to_username());
        let fixer = builder.build();

        let input = Dynamic::new(TestOps, V::Map(vec![(V::Str("name".into()), V::Str("Alice".into()))]));
        let result = fixer.update(player(), input, DataVersion::new(0), DataVersion::new(1)).unwrap();
        assert_eq!(result.get("username").unwrap().value, V::Str("Alice".into()));
        assert!(result.get("name").is_none());
    }

    #[test]
    fn multi_step_chain_applies_in_order() {
        let mut builder = DataFixerBuilder::new(DataVersion::new(3));
        builder.add_fix(player(), DataVersion::new(0), DataVersion::new(1), rename_name_to_username());
        builder.add_fix(
            player(),
            DataVersion::new(1),
            DataVersion::new(2),
            TypeRewriteRule::simple("add default level", |dynamic| {
                let ops = dynamic.ops();
                let updated = ops.set(dynamic.value.clone(), "level", V::Num(Number::Int(1)));
                crate::result::DataResult::success(Dynamic::new(ops, updated))
            }),
        );
        let fixer = builder.build();

        let input = Dynamic::new(TestOps, V::Map(vec![(V::Str("name".into()), V::Str("Alice".into()))]));
        let result = fixer.update(player(), input, DataVersion::new(0), DataVersion::new(2)).unwrap();
        assert_eq!(result.get("username").unwrap().value, V::Str("Alice".into()));
        assert_eq!(result.get("level").unwrap().value, V::Num(Number::Int(1)));
    }

    #[test]
    fn fix_failure_surfaces_as_fix_error() {
        let mut builder = DataFixerBuilder::new(DataVersion::new(2));
        builder.add_fix(player(), DataVersion::new(0), DataVersion::new(1), TypeRewriteRule::fail("boom"));
        let fixer = builder.build();

        let input = Dynamic::new(TestOps, V::Str("x".into()));
        let err = fixer.update(player(), input, DataVersion::new(0), DataVersion::new(1));
        assert!(err.is_err());
    }
}
