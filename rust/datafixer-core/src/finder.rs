//! [`Finder`] — composable optics over [`Dynamic`] trees.
//!
//! A `Finder` names a path into a tree (a field, a list index, or the
//! identity path) and exposes `get`/`set`/`update` over it, composing via
//! [`Finder::then`] the way field-access chains compose in the teacher's
//! JSON tool provider, generalized here from ad hoc `get`/`set` call chains
//! into a reusable, named value.

use crate::result::DataResult;
use crate::value::{Dynamic, DynamicOps};
use std::fmt;
use std::sync::Arc;

/// A composable path into a `Dynamic` tree.
pub struct Finder<T, O> {
    id: String,
    get_fn: Arc<dyn Fn(&Dynamic<T, O>) -> Option<Dynamic<T, O>> + Send + Sync>,
    set_fn: Arc<dyn Fn(&Dynamic<T, O>, Dynamic<T, O>) -> Dynamic<T, O> + Send + Sync>,
}

impl<T, O> Clone for Finder<T, O> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            get_fn: self.get_fn.clone(),
            set_fn: self.set_fn.clone(),
        }
    }
}

impl<T, O> fmt::Debug for Finder<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Finder").field("id", &self.id).finish()
    }
}

impl<T, O> Finder<T, O>
where
    T: Clone + fmt::Debug + 'static,
    O: DynamicOps<T> + 'static,
{
    /// The path that returns its input unchanged.
    pub fn identity() -> Self {
        Self {
            id: "identity".to_string(),
            get_fn: Arc::new(|value| Some(value.clone())),
            set_fn: Arc::new(|_root, new_value| new_value),
        }
    }

    /// A single map field.
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        let get_name = name.clone();
        let set_name = name.clone();
        Self {
            id: format!("field[{name}]"),
            get_fn: Arc::new(move |value| value.get(&get_name)),
            set_fn: Arc::new(move |root, new_value| Dynamic::new(root.ops(), root.ops().set(root.value.clone(), &set_name, new_value.value))),
        }
    }

    /// A single list index. Out-of-range reads are absent (`get` returns
    /// `None`); out-of-range writes are a no-op, matching the tree algebra's
    /// "pure, never panics" contract.
    pub fn index(i: usize) -> Self {
        Self {
            id: format!("index[{i}]"),
            get_fn: Arc::new(move |value| {
                value.as_stream().result().and_then(|items| items.into_iter().nth(i))
            }),
            set_fn: Arc::new(move |root, new_value| {
                let ops = root.ops();
                match ops.get_list(&root.value) {
                    DataResult::Success(mut items) => {
                        if i < items.len() {
                            items[i] = new_value.value;
                        }
                        Dynamic::new(ops, ops.create_list(items.into_iter()))
                    }
                    DataResult::Error { .. } => root.clone(),
                }
            }),
        }
    }

    /// The complement of a set of map keys: `get` yields the map with the
    /// named keys removed; `set` replaces every *non-excluded* entry with
    /// the provided map wholesale, while entries named in `names` keep
    /// their original value regardless of what the provided map contains.
    /// A non-map root is returned unchanged by `set`, and `get` reports it
    /// as absent.
    pub fn remainder<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let exclusions: Vec<String> = names.into_iter().map(Into::into).collect();
        let get_exclusions = exclusions.clone();
        let set_exclusions = exclusions;
        Self {
            id: "remainder".to_string(),
            get_fn: Arc::new(move |value| {
                let ops = value.ops();
                if !ops.is_map(&value.value) {
                    return None;
                }
                let entries = ops.read_map_unchecked(&value.value);
                let kept = entries.into_iter().filter(|(k, _)| {
                    !(ops.is_string(k) && get_exclusions.contains(&ops.read_string_unchecked(k)))
                });
                Some(Dynamic::new(ops, ops.create_map_entries_unchecked(kept)))
            }),
            set_fn: Arc::new(move |root, new_value| {
                let ops = root.ops();
                if !ops.is_map(&root.value) {
                    return root.clone();
                }
                let preserved: Vec<(T, T)> = ops
                    .read_map_unchecked(&root.value)
                    .into_iter()
                    .filter(|(k, _)| ops.is_string(k) && set_exclusions.contains(&ops.read_string_unchecked(k)))
                    .collect();
                let preserved_names: Vec<String> =
                    preserved.iter().map(|(k, _)| ops.read_string_unchecked(k)).collect();
                let incoming = if ops.is_map(&new_value.value) {
                    ops.read_map_unchecked(&new_value.value)
                } else {
                    Vec::new()
                };
                let rest = incoming
                    .into_iter()
                    .filter(|(k, _)| !(ops.is_string(k) && preserved_names.contains(&ops.read_string_unchecked(k))));
                let combined = preserved.into_iter().chain(rest);
                Dynamic::new(ops, ops.create_map_entries_unchecked(combined))
            }),
        }
    }

    /// Run `self`, then `next` on whatever `self` found. `id()` concatenates
    /// with `.`.
    pub fn then(self, next: Finder<T, O>) -> Self {
        let id = format!("{}.{}", self.id, next.id);
        let get_self = self.get_fn.clone();
        let get_next = next.get_fn.clone();
        let set_self = self.set_fn.clone();
        let set_next = next.set_fn.clone();
        Self {
            id,
            get_fn: Arc::new(move |value| get_self(value).and_then(|mid| get_next(&mid))),
            set_fn: Arc::new(move |root, new_value| {
                let set_self = set_self.clone();
                let set_next = set_next.clone();
                let root_clone = root.clone();
                match get_self(root) {
                    Some(mid) => {
                        let updated_mid = set_next(&mid, new_value);
                        set_self(&root_clone, updated_mid)
                    }
                    None => root_clone,
                }
            }),
        }
    }

    /// Read the value at this path, if present.
    pub fn get(&self, root: &Dynamic<T, O>) -> Option<Dynamic<T, O>> {
        (self.get_fn)(root)
    }

    /// Read the value at this path as a `DataResult`, reporting an absent
    /// path as an error rather than `None`.
    pub fn get_optional(&self, root: &Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        match self.get(root) {
            Some(value) => DataResult::success(value),
            None => DataResult::error(format!("No value found at {}", self.id)),
        }
    }

    /// Replace the value at this path, returning a new root.
    pub fn set(&self, root: &Dynamic<T, O>, new_value: Dynamic<T, O>) -> Dynamic<T, O> {
        (self.set_fn)(root, new_value)
    }

    /// Apply `f` to the value at this path, if present; a no-op if absent.
    pub fn update(
        &self,
        root: &Dynamic<T, O>,
        f: impl FnOnce(Dynamic<T, O>) -> Dynamic<T, O>,
    ) -> Dynamic<T, O> {
        match self.get(root) {
            Some(current) => self.set(root, f(current)),
            None => root.clone(),
        }
    }

    /// This finder's stable, debug-facing identifier, e.g. `"field[name]"`
    /// or `"field[address].field[city]"` after composing with [`Finder::then`].
    pub fn id(&self) -> &str {
        &self.id
    }
}
