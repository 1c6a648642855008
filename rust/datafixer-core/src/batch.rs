//! [`BatchTransform`] — a builder that applies several field-level edits to
//! a map-shaped `Dynamic` in a single traversal pass.
//!
//! Most fixes only ever rename, drop, overwrite, or add a handful of fields.
//! Writing each as its own `TypeRewriteRule` works but reads poorly for a
//! bootstrap author skimming a long list of fixes; `BatchTransform` gives
//! those the shape of a flat list of operations applied in registration
//! order, grounded on the teacher's `json_ops.rs` free functions for
//! single-key get/set/merge, generalized into a reusable batch builder.

use crate::result::DataResult;
use crate::value::{Dynamic, DynamicOps};
use std::fmt;

enum Op<T, O> {
    Rename { from: String, to: String },
    Remove { name: String },
    Set { name: String, value: T },
    SetStatic { name: String, value: T },
    Transform {
        name: String,
        f: Box<dyn Fn(Dynamic<T, O>) -> DataResult<Dynamic<T, O>> + Send + Sync>,
    },
    AddIfMissing { name: String, value: T },
}

/// A sequence of field operations applied to a map value in one pass.
pub struct BatchTransform<T, O> {
    ops: Vec<Op<T, O>>,
}

impl<T, O> Default for BatchTransform<T, O> {
    fn default() -> Self {
        Self { ops: Vec::new() }
    }
}

impl<T, O> BatchTransform<T, O>
where
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename a field, keeping its value. A no-op if `from` is absent.
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.ops.push(Op::Rename {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Drop a field. A no-op if `name` is absent.
    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.ops.push(Op::Remove { name: name.into() });
        self
    }

    /// Overwrite a field with `value` unconditionally.
    pub fn set(mut self, name: impl Into<String>, value: T) -> Self {
        self.ops.push(Op::Set {
            name: name.into(),
            value,
        });
        self
    }

    /// Alias for [`BatchTransform::set`], naming the common case where the
    /// new value doesn't depend on anything already in the document.
    pub fn set_static(mut self, name: impl Into<String>, value: T) -> Self {
        self.ops.push(Op::SetStatic {
            name: name.into(),
            value,
        });
        self
    }

    /// Apply `f` to the current value of `name`, if present; a no-op if
    /// absent.
    pub fn transform(
        mut self,
        name: impl Into<String>,
        f: impl Fn(Dynamic<T, O>) -> DataResult<Dynamic<T, O>> + Send + Sync + 'static,
    ) -> Self {
        self.ops.push(Op::Transform {
            name: name.into(),
            f: Box::new(f),
        });
        self
    }

    /// Set `name` to `value` only if it is currently absent.
    pub fn add_if_missing(mut self, name: impl Into<String>, value: T) -> Self {
        self.ops.push(Op::AddIfMissing {
            name: name.into(),
            value,
        });
        self
    }

    /// Apply every queued operation, in registration order, to `dynamic`.
    /// Fails fast on the first `transform` whose function reports an error.
    pub fn apply(&self, dynamic: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        let mut current = dynamic;
        for op in &self.ops {
            current = match op {
                Op::Rename { from, to } => match current.get(from) {
                    Some(value) => {
                        let ops = current.ops();
                        let removed = ops.remove(current.value, from);
                        Dynamic::new(ops, ops.set(removed, to, value.value))
                    }
                    None => current,
                },
                Op::Remove { name } => {
                    let ops = current.ops();
                    Dynamic::new(ops, ops.remove(current.value, name))
                }
                Op::Set { name, value } => {
                    let ops = current.ops();
                    Dynamic::new(ops, ops.set(current.value, name, value.clone()))
                }
                Op::SetStatic { name, value } => {
                    let ops = current.ops();
                    Dynamic::new(ops, ops.set(current.value, name, value.clone()))
                }
                Op::Transform { name, f } => match current.get(name) {
                    Some(field_value) => match f(field_value) {
                        DataResult::Success(new_value) => {
                            let ops = current.ops();
                            Dynamic::new(ops, ops.set(current.value, name, new_value.value))
                        }
                        DataResult::Error { message, .. } => {
                            return DataResult::error(format!("{name}: {message}"))
                        }
                    },
                    None => current,
                },
                Op::AddIfMissing { name, value } => {
                    if current.has(name) {
                        current
                    } else {
                        let ops = current.ops();
                        Dynamic::new(ops, ops.set(current.value, name, value.clone()))
                    }
                }
            };
        }
        DataResult::success(current)
    }
}
