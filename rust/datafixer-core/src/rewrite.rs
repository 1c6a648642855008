//! Composable typed rewrite rules over [`Dynamic`] trees.
//!
//! A [`TypeRewriteRule`] operates on a [`Typed`] value — a `Dynamic` tagged
//! with the [`TypeReference`] it currently represents — so a rule can decide
//! whether it even applies before touching the tree. Grounded on the
//! conditional-match-then-transform shape of the teacher's schema drift
//! detection (`schema_drift.rs`), generalized from "detect a mismatch" to
//! "detect and rewrite".

use crate::result::DataResult;
use crate::value::{Dynamic, DynamicOps};
use crate::version::TypeReference;
use std::fmt;
use std::sync::Arc;

/// The compile-time tag distinguishing a value's primitive category —
/// separate from [`TypeReference`], which names a logical entity (`"player"`,
/// `"world"`) rather than a shape. `TypeRewriteRule::for_type`/`if_type` gate
/// on this tag, not on the entity name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Null,
    Bool,
    Number,
    String,
    List,
    Map,
}

impl Type {
    /// Classify a `Dynamic` value's current shape.
    pub fn of<T, O>(value: &Dynamic<T, O>) -> Self
    where
        T: Clone + fmt::Debug,
        O: DynamicOps<T>,
    {
        let ops = value.ops();
        if ops.is_boolean(&value.value) {
            Type::Bool
        } else if ops.is_number(&value.value) {
            Type::Number
        } else if ops.is_string(&value.value) {
            Type::String
        } else if ops.is_list(&value.value) {
            Type::List
        } else if ops.is_map(&value.value) {
            Type::Map
        } else {
            Type::Null
        }
    }
}

/// A `Dynamic` value paired with the type reference it is currently
/// interpreted as, plus the primitive-category [`Type`] tag derived from its
/// current shape.
#[derive(Debug, Clone)]
pub struct Typed<T, O> {
    pub type_ref: TypeReference,
    pub tag: Type,
    pub value: Dynamic<T, O>,
}

impl<T, O> Typed<T, O>
where
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    pub fn new(type_ref: TypeReference, value: Dynamic<T, O>) -> Self {
        let tag = Type::of(&value);
        Self { type_ref, tag, value }
    }

    pub fn with_value(&self, value: Dynamic<T, O>) -> Self {
        let tag = Type::of(&value);
        Self {
            type_ref: self.type_ref.clone(),
            tag,
            value,
        }
    }
}

/// A named, composable rewrite over [`Typed`] values.
///
/// Rules are applied by the fixer pipeline as single pipeline steps; they
/// compose with [`TypeRewriteRule::and_then`] and [`TypeRewriteRule::or_else`]
/// so a bootstrap author can build one fix out of several smaller, reusable
/// rules instead of one monolithic closure.
pub struct TypeRewriteRule<T, O> {
    name: String,
    apply_fn: Arc<dyn Fn(&Typed<T, O>) -> DataResult<Typed<T, O>> + Send + Sync>,
}

impl<T, O> Clone for TypeRewriteRule<T, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            apply_fn: self.apply_fn.clone(),
        }
    }
}

impl<T, O> fmt::Debug for TypeRewriteRule<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRewriteRule").field("name", &self.name).finish()
    }
}

impl<T, O> TypeRewriteRule<T, O>
where
    T: Clone + fmt::Debug + 'static,
    O: DynamicOps<T> + 'static,
{
    /// Build a rule from a raw transform function.
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&Typed<T, O>) -> DataResult<Typed<T, O>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            apply_fn: Arc::new(f),
        }
    }

    /// A rule that never fails and never changes anything.
    pub fn identity() -> Self {
        Self::new("identity", |typed| DataResult::success(typed.clone()))
    }

    /// A rule that always fails with `message`, for bootstrap code paths that
    /// should be unreachable if registered correctly.
    pub fn fail(message: impl Into<String> + Clone + Send + Sync + 'static) -> Self {
        Self::new("fail", move |_typed| DataResult::error(message.clone()))
    }

    /// A rule that unconditionally applies `f` to the `Dynamic` payload,
    /// keeping the same type reference.
    pub fn simple(
        name: impl Into<String>,
        f: impl Fn(&Dynamic<T, O>) -> DataResult<Dynamic<T, O>> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        Self::new(name, move |typed| {
            f(&typed.value).map(|value| typed.with_value(value))
        })
    }

    /// Only apply the wrapped rule when `typed.tag == expected`; otherwise
    /// pass the value through unchanged.
    pub fn for_type(expected: Type, rule: TypeRewriteRule<T, O>) -> Self {
        let name = format!("forType({expected:?})");
        Self::new(name, move |typed| {
            if typed.tag == expected {
                rule.apply(typed)
            } else {
                DataResult::success(typed.clone())
            }
        })
    }

    /// Run `self`, then run `next` on the result.
    pub fn and_then(self, next: TypeRewriteRule<T, O>) -> Self {
        let name = format!("{}.andThen({})", self.name, next.name);
        Self::new(name, move |typed| self.apply(typed).flat_map(|mid| next.apply(&mid)))
    }

    /// Run `self`; if it fails, run `fallback` on the original value instead.
    pub fn or_else(self, fallback: TypeRewriteRule<T, O>) -> Self {
        let name = format!("{}.orElse({})", self.name, fallback.name);
        Self::new(name, move |typed| {
            let attempt = self.apply(typed);
            if attempt.is_success() {
                attempt
            } else {
                fallback.apply(typed)
            }
        })
    }

    /// Run `self`; on failure, keep the original value instead of
    /// propagating the error (a softer variant of `or_else(identity())`,
    /// distinguished from it so a bootstrap author's intent — "best effort"
    /// versus "named recovery path" — stays visible in call sites).
    pub fn or_keep(self) -> Self {
        let name = format!("{}.orKeep", self.name);
        Self::new(name, move |typed| {
            let attempt = self.apply(typed);
            if attempt.is_success() {
                attempt
            } else {
                DataResult::success(typed.clone())
            }
        })
    }

    /// Filters like `for_type`, but as a guard added onto an arbitrary
    /// already-built rule rather than paired with it at construction time:
    /// if `typed.tag != tag`, the value passes through unchanged without
    /// consulting `self`.
    pub fn if_type(self, tag: Type) -> Self {
        let name = format!("{}.ifType({tag:?})", self.name);
        Self::new(name, move |typed| {
            if typed.tag == tag {
                self.apply(typed)
            } else {
                DataResult::success(typed.clone())
            }
        })
    }

    /// Wrap this rule with a diagnostic name, shown in `FixException`
    /// messages when the rule fails inside a registered fix.
    pub fn named(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            apply_fn: self.apply_fn,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the rule, returning a `DataResult` so callers can inspect or
    /// recover from failure.
    pub fn apply(&self, typed: &Typed<T, O>) -> DataResult<Typed<T, O>> {
        (self.apply_fn)(typed)
    }

    /// Apply the rule, panicking on failure. Reserved for bootstrap-time
    /// sanity checks, mirroring `DataResult::get_or_throw`.
    pub fn apply_or_throw(&self, typed: &Typed<T, O>) -> Typed<T, O> {
        self.apply(typed).get_or_throw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::test_support::{TestOps, TestValue as V};
    use crate::value::Number;

    fn typed(type_ref: &'static str, value: V) -> Typed<V, TestOps> {
        Typed::new(TypeReference::from_static(type_ref), Dynamic::new(TestOps, value))
    }

    #[test]
    fn identity_passes_through() {
        let t = typed("player", V::Str("Alice".into()));
        let result = TypeRewriteRule::identity().apply(&t).result().unwrap();
        assert_eq!(result.value.value, V::Str("Alice".into()));
    }

    #[test]
    fn for_type_only_applies_to_matching_tag() {
        let rename = TypeRewriteRule::simple("uppercase-name", |dynamic| {
            dynamic
                .as_string()
                .map(|s| Dynamic::new(dynamic.ops(), V::Str(s.to_uppercase())))
        });
        let rule = TypeRewriteRule::for_type(Type::String, rename);

        let matching = typed("player", V::Str("alice".into()));
        let matched = rule.apply(&matching).result().unwrap();
        assert_eq!(matched.value.value, V::Str("ALICE".into()));

        let other = typed("player", V::Num(Number::Int(1)));
        let unmatched = rule.apply(&other).result().unwrap();
        assert_eq!(unmatched.value.value, V::Num(Number::Int(1)));
    }

    #[test]
    fn and_then_chains_rules_in_order() {
        let add_one = TypeRewriteRule::simple("add-one", |dynamic| {
            dynamic
                .as_number()
                .map(|n| Dynamic::new(dynamic.ops(), V::Num(Number::Int(n.as_i64() as i32 + 1))))
        });
        let double = TypeRewriteRule::simple("double", |dynamic| {
            dynamic
                .as_number()
                .map(|n| Dynamic::new(dynamic.ops(), V::Num(Number::Int(n.as_i64() as i32 * 2))))
        });

        let rule = add_one.and_then(double);
        let t = typed("counter", V::Num(Number::Int(3)));
        let result = rule.apply(&t).result().unwrap();
        assert_eq!(result.value.value, V::Num(Number::Int(8)));
    }

    #[test]
    fn or_else_falls_back_on_failure() {
        let always_fails = TypeRewriteRule::fail("boom");
        let fallback = TypeRewriteRule::identity();
        let rule = always_fails.or_else(fallback);

        let t = typed("player", V::Str("Alice".into()));
        let result = rule.apply(&t);
        assert!(result.is_success());
    }

    #[test]
    fn or_keep_recovers_original_value_on_failure() {
        let always_fails = TypeRewriteRule::fail("boom");
        let rule = always_fails.or_keep();

        let t = typed("player", V::Str("Alice".into()));
        let result = rule.apply(&t).result().unwrap();
        assert_eq!(result.value.value, V::Str("Alice".into()));
    }

    #[test]
    fn if_type_guards_on_tag() {
        let rule = TypeRewriteRule::fail("should not run").if_type(Type::Number);

        let string_value = typed("player", V::Str("x".into()));
        assert!(rule.apply(&string_value).is_success());

        let number_value = typed("player", V::Num(Number::Int(1)));
        assert!(rule.apply(&number_value).is_error());
    }

    #[test]
    fn named_overrides_diagnostic_name() {
        let rule = TypeRewriteRule::identity().named("my-custom-rule");
        assert_eq!(rule.name(), "my-custom-rule");
    }

    #[test]
    #[should_panic(expected = "DataResult::get_or_throw: boom")]
    fn apply_or_throw_panics_on_failure() {
        let rule = TypeRewriteRule::fail("boom");
        let t = typed("player", V::Str("Alice".into()));
        rule.apply_or_throw(&t);
    }
}
