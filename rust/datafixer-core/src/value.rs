//! The format-agnostic tree algebra ([`DynamicOps`]) and its ergonomic
//! wrapper ([`Dynamic`]).
//!
//! `DynamicOps<T>` is the one trait every concrete format (JSON, YAML, TOML,
//! XML, …) implements once; everything above this layer — codecs, rewrite
//! rules, finders, the fixer pipeline — is written purely in terms of the
//! trait and never touches a concrete `T` directly. Grounded on the
//! `json_get`/`json_merge` free functions of a runtime's JSON fast-path
//! builtins and the `get`/`set`/`merge` methods of its JSON tool provider,
//! generalized here from one hardcoded format to an algebra any format can
//! implement.

use crate::result::DataResult;
use std::fmt;

/// A runtime-tagged numeric value, preserving the most specific kind the
/// backing format exposed (`spec.md` §4.A, §6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    /// Widen to an `i64`, losslessly for every integer kind.
    pub fn as_i64(self) -> i64 {
        match self {
            Number::Byte(v) => v as i64,
            Number::Short(v) => v as i64,
            Number::Int(v) => v as i64,
            Number::Long(v) => v,
            Number::Float(v) => v as i64,
            Number::Double(v) => v as i64,
        }
    }

    /// Widen to an `f64`, losslessly for every kind up to `f32`.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Byte(v) => v as f64,
            Number::Short(v) => v as f64,
            Number::Int(v) => v as f64,
            Number::Long(v) => v as f64,
            Number::Float(v) => v as f64,
            Number::Double(v) => v,
        }
    }

    /// Whether this value is exactly representable as the target integer
    /// range. Used by `INT`/`SHORT`/`BYTE` codecs to report range errors
    /// instead of silently truncating.
    pub fn fits_i32(self) -> bool {
        i32::try_from(self.as_i64()).is_ok() && self.as_f64().fract() == 0.0
    }

    pub fn fits_i16(self) -> bool {
        i16::try_from(self.as_i64()).is_ok() && self.as_f64().fract() == 0.0
    }

    pub fn fits_i8(self) -> bool {
        i8::try_from(self.as_i64()).is_ok() && self.as_f64().fract() == 0.0
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Byte(v) => write!(f, "{v}"),
            Number::Short(v) => write!(f, "{v}"),
            Number::Int(v) => write!(f, "{v}"),
            Number::Long(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
            Number::Double(v) => write!(f, "{v}"),
        }
    }
}

/// The format-agnostic tree algebra.
///
/// Every method is pure: none may mutate `T` in place (`spec.md` I1).
/// Implementations must be cheap to construct and safe to share across
/// threads (`spec.md` §5) — in practice a zero-sized `Copy` type, used as a
/// process-wide singleton the way a concrete format's ops const is used
/// elsewhere in this workspace's provider crates.
pub trait DynamicOps<T>: Send + Sync + Copy
where
    T: Clone + fmt::Debug,
{
    // -- sentinels ----------------------------------------------------
    fn empty(&self) -> T;
    fn empty_list(&self) -> T;
    fn empty_map(&self) -> T;

    // -- type predicates ------------------------------------------------
    fn is_empty_value(&self, value: &T) -> bool;
    fn is_map(&self, value: &T) -> bool;
    fn is_list(&self, value: &T) -> bool;
    fn is_string(&self, value: &T) -> bool;
    fn is_number(&self, value: &T) -> bool;
    fn is_boolean(&self, value: &T) -> bool;

    // -- constructors -----------------------------------------------------
    fn create_string(&self, value: &str) -> T;
    fn create_boolean(&self, value: bool) -> T;
    fn create_byte(&self, value: i8) -> T {
        self.create_numeric(Number::Byte(value))
    }
    fn create_short(&self, value: i16) -> T {
        self.create_numeric(Number::Short(value))
    }
    fn create_int(&self, value: i32) -> T {
        self.create_numeric(Number::Int(value))
    }
    fn create_long(&self, value: i64) -> T {
        self.create_numeric(Number::Long(value))
    }
    fn create_float(&self, value: f32) -> T {
        self.create_numeric(Number::Float(value))
    }
    fn create_double(&self, value: f64) -> T {
        self.create_numeric(Number::Double(value))
    }
    fn create_numeric(&self, value: Number) -> T;

    // -- primitive readers ------------------------------------------------
    fn get_string_value(&self, value: &T) -> DataResult<String> {
        if self.is_string(value) {
            DataResult::success(self.read_string_unchecked(value))
        } else {
            DataResult::error(format!("Not a string: {value:?}"))
        }
    }
    /// Extract the string payload. Only ever called after `is_string`
    /// confirms the shape; implementations may assume that invariant.
    fn read_string_unchecked(&self, value: &T) -> String;

    fn get_number_value(&self, value: &T) -> DataResult<Number> {
        if self.is_number(value) {
            DataResult::success(self.read_number_unchecked(value))
        } else {
            DataResult::error(format!("Not a number: {value:?}"))
        }
    }
    fn read_number_unchecked(&self, value: &T) -> Number;

    fn get_boolean_value(&self, value: &T) -> DataResult<bool> {
        if self.is_boolean(value) {
            DataResult::success(self.read_boolean_unchecked(value))
        } else {
            DataResult::error(format!("Not a boolean: {value:?}"))
        }
    }
    fn read_boolean_unchecked(&self, value: &T) -> bool;

    // -- list ops -----------------------------------------------------------
    fn create_list(&self, items: impl Iterator<Item = T>) -> T;

    fn get_list(&self, value: &T) -> DataResult<Vec<T>> {
        if self.is_list(value) {
            DataResult::success(self.read_list_unchecked(value))
        } else {
            DataResult::error(format!("Not a list: {value:?}"))
        }
    }
    fn read_list_unchecked(&self, value: &T) -> Vec<T>;

    /// Append `value` to `list`. `list` must be a list or the empty
    /// sentinel.
    fn merge_to_list(&self, list: T, value: T) -> DataResult<T> {
        if self.is_empty_value(&list) {
            return DataResult::success(self.create_list(std::iter::once(value)));
        }
        if !self.is_list(&list) {
            return DataResult::error(format!("Not a list: {list:?}"));
        }
        let mut items = self.read_list_unchecked(&list);
        items.push(value);
        DataResult::success(self.create_list(items.into_iter()))
    }

    // -- map ops --------------------------------------------------------
    /// Build a map from entries. Non-string keys are coerced to their
    /// textual representation; entries with a null (empty-sentinel) key are
    /// silently skipped; null values are converted to `empty()`.
    fn create_map(&self, entries: impl Iterator<Item = (T, T)>) -> T {
        let mut pairs = Vec::new();
        for (key, value) in entries {
            if self.is_empty_value(&key) {
                continue;
            }
            let key_str = if self.is_string(&key) {
                self.read_string_unchecked(&key)
            } else if self.is_number(&key) {
                self.read_number_unchecked(&key).to_string()
            } else if self.is_boolean(&key) {
                self.read_boolean_unchecked(&key).to_string()
            } else {
                format!("{key:?}")
            };
            let value = if self.is_empty_value(&value) {
                self.empty()
            } else {
                value
            };
            pairs.push((self.create_string(&key_str), value));
        }
        self.create_map_entries_unchecked(pairs.into_iter())
    }
    /// Build a map node from entries already known to have string keys.
    fn create_map_entries_unchecked(&self, entries: impl Iterator<Item = (T, T)>) -> T;

    fn get_map_entries(&self, value: &T) -> DataResult<Vec<(T, T)>> {
        if self.is_map(value) {
            DataResult::success(self.read_map_unchecked(value))
        } else {
            DataResult::error(format!("Not a map: {value:?}"))
        }
    }
    fn read_map_unchecked(&self, value: &T) -> Vec<(T, T)>;

    /// Set a single key in a map (or the empty sentinel). `key` must be a
    /// string value.
    fn merge_to_map(&self, map: T, key: T, value: T) -> DataResult<T> {
        let key_str = match self.get_string_value(&key) {
            DataResult::Success(s) => s,
            DataResult::Error { message, .. } => {
                return DataResult::error(format!("key is not a string: {message}"))
            }
        };
        if self.is_empty_value(&map) {
            return DataResult::success(self.set(self.empty_map(), &key_str, value));
        }
        if !self.is_map(&map) {
            return DataResult::error(format!("Not a map: {map:?}"));
        }
        DataResult::success(self.set(map, &key_str, value))
    }

    /// Right-biased merge: keys in `other` override keys in `map`.
    fn merge_maps(&self, map: T, other: T) -> DataResult<T> {
        let base = if self.is_empty_value(&map) {
            self.empty_map()
        } else if self.is_map(&map) {
            map
        } else {
            return DataResult::error(format!("Not a map: {map:?}"));
        };
        let other_entries = match self.get_map_entries(&other) {
            DataResult::Success(entries) => entries,
            DataResult::Error { message, .. } => {
                return DataResult::error(format!("Not a map: {message}"))
            }
        };
        let mut result = base;
        for (key, value) in other_entries {
            let key_str = self.read_string_unchecked(&key);
            result = self.set(result, &key_str, value);
        }
        DataResult::success(result)
    }

    // -- field ops ------------------------------------------------------
    fn get(&self, value: &T, key: &str) -> Option<T> {
        if !self.is_map(value) {
            return None;
        }
        self.read_map_unchecked(value)
            .into_iter()
            .find(|(k, _)| self.is_string(k) && self.read_string_unchecked(k) == key)
            .map(|(_, v)| v)
    }

    /// Coerces a non-map input into a fresh one-entry map.
    fn set(&self, value: T, key: &str, new_value: T) -> T {
        let mut entries: Vec<(T, T)> = if self.is_map(&value) {
            self.read_map_unchecked(&value)
        } else {
            Vec::new()
        };
        let key_node = self.create_string(key);
        if let Some(slot) = entries
            .iter_mut()
            .find(|(k, _)| self.is_string(k) && self.read_string_unchecked(k) == key)
        {
            slot.1 = new_value;
        } else {
            entries.push((key_node, new_value));
        }
        self.create_map_entries_unchecked(entries.into_iter())
    }

    /// Non-map input is returned unchanged.
    fn remove(&self, value: T, key: &str) -> T {
        if !self.is_map(&value) {
            return value;
        }
        let entries = self.read_map_unchecked(&value);
        let filtered = entries
            .into_iter()
            .filter(|(k, _)| !(self.is_string(k) && self.read_string_unchecked(k) == key));
        self.create_map_entries_unchecked(filtered)
    }

    fn has(&self, value: &T, key: &str) -> bool {
        self.get(value, key).is_some()
    }
}

/// Convert a value from one format's tree into another's.
///
/// Probes in order: boolean → number → string → list (recurse) → map
/// (recurse, skipping null keys, converting null values via `empty()`);
/// otherwise returns `dest.empty()` (`spec.md` §4.A).
pub fn convert_value<T, U, OT, OU>(dest: &OT, source: &OU, value: U) -> T
where
    T: Clone + fmt::Debug,
    U: Clone + fmt::Debug,
    OT: DynamicOps<T>,
    OU: DynamicOps<U>,
{
    if source.is_boolean(&value) {
        return dest.create_boolean(source.read_boolean_unchecked(&value));
    }
    if source.is_number(&value) {
        return dest.create_numeric(source.read_number_unchecked(&value));
    }
    if source.is_string(&value) {
        return dest.create_string(&source.read_string_unchecked(&value));
    }
    if source.is_list(&value) {
        let items = source
            .read_list_unchecked(&value)
            .into_iter()
            .map(|item| convert_value(dest, source, item));
        return dest.create_list(items);
    }
    if source.is_map(&value) {
        let entries = source.read_map_unchecked(&value).into_iter().filter_map(|(k, v)| {
            if source.is_empty_value(&k) {
                return None;
            }
            let key = convert_value(dest, source, k);
            let value = if source.is_empty_value(&v) {
                dest.empty()
            } else {
                convert_value(dest, source, v)
            };
            Some((key, value))
        });
        return dest.create_map(entries);
    }
    dest.empty()
}

/// Pairs a value with the operations that interpret it.
///
/// Equality is by `value` alone; the bound `ops` is excluded (`spec.md`
/// §3). `O` is expected to be a zero-sized singleton type, so cloning a
/// `Dynamic` is as cheap as cloning its `T`.
#[derive(Debug, Clone, Copy)]
pub struct Dynamic<T, O> {
    ops: O,
    pub value: T,
}

impl<T, O> PartialEq for Dynamic<T, O>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T, O> Dynamic<T, O>
where
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    pub fn new(ops: O, value: T) -> Self {
        Self { ops, value }
    }

    pub fn ops(&self) -> O {
        self.ops
    }

    pub fn empty_map(&self) -> Self {
        Self::new(self.ops, self.ops.empty_map())
    }

    pub fn empty_list(&self) -> Self {
        Self::new(self.ops, self.ops.empty_list())
    }

    pub fn get(&self, key: &str) -> Option<Self> {
        self.ops.get(&self.value, key).map(|v| Self::new(self.ops, v))
    }

    pub fn set(&self, key: &str, new_value: T) -> Self {
        Self::new(self.ops, self.ops.set(self.value.clone(), key, new_value))
    }

    pub fn remove(&self, key: &str) -> Self {
        Self::new(self.ops, self.ops.remove(self.value.clone(), key))
    }

    pub fn has(&self, key: &str) -> bool {
        self.ops.has(&self.value, key)
    }

    pub fn as_string(&self) -> DataResult<String> {
        self.ops.get_string_value(&self.value)
    }

    pub fn as_boolean(&self) -> DataResult<bool> {
        self.ops.get_boolean_value(&self.value)
    }

    pub fn as_number(&self) -> DataResult<Number> {
        self.ops.get_number_value(&self.value)
    }

    pub fn as_int(&self) -> DataResult<i32> {
        self.as_number().flat_map(|n| {
            if n.fits_i32() {
                DataResult::success(n.as_i64() as i32)
            } else {
                DataResult::error(format!("Value out of int range: {n}"))
            }
        })
    }

    pub fn as_long(&self) -> DataResult<i64> {
        self.as_number().map(|n| n.as_i64())
    }

    pub fn as_double(&self) -> DataResult<f64> {
        self.as_number().map(|n| n.as_f64())
    }

    pub fn as_stream(&self) -> DataResult<Vec<Self>> {
        self.ops
            .get_list(&self.value)
            .map(|items| items.into_iter().map(|v| Self::new(self.ops, v)).collect())
    }

    /// Cross-format conversion into a `Dynamic` bound to a different ops
    /// singleton.
    pub fn convert<U, OU>(&self, dest_ops: OU) -> Dynamic<U, OU>
    where
        U: Clone + fmt::Debug,
        OU: DynamicOps<U>,
    {
        Dynamic::new(dest_ops, convert_value(&dest_ops, &self.ops, self.value.clone()))
    }
}

/// A minimal in-memory `DynamicOps` implementation shared by test modules
/// across this crate that need *some* concrete format to exercise codecs,
/// finders and the fixer pipeline against, without depending on any of the
/// provider crates.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum TestValue {
        Null,
        Bool(bool),
        Num(Number),
        Str(String),
        List(Vec<TestValue>),
        Map(Vec<(TestValue, TestValue)>),
    }

    #[derive(Debug, Clone, Copy)]
    pub(crate) struct TestOps;

    impl DynamicOps<TestValue> for TestOps {
        fn empty(&self) -> TestValue {
            TestValue::Null
        }
        fn empty_list(&self) -> TestValue {
            TestValue::List(Vec::new())
        }
        fn empty_map(&self) -> TestValue {
            TestValue::Map(Vec::new())
        }
        fn is_empty_value(&self, value: &TestValue) -> bool {
            matches!(value, TestValue::Null)
        }
        fn is_map(&self, value: &TestValue) -> bool {
            matches!(value, TestValue::Map(_))
        }
        fn is_list(&self, value: &TestValue) -> bool {
            matches!(value, TestValue::List(_))
        }
        fn is_string(&self, value: &TestValue) -> bool {
            matches!(value, TestValue::Str(_))
        }
        fn is_number(&self, value: &TestValue) -> bool {
            matches!(value, TestValue::Num(_))
        }
        fn is_boolean(&self, value: &TestValue) -> bool {
            matches!(value, TestValue::Bool(_))
        }
        fn create_string(&self, value: &str) -> TestValue {
            TestValue::Str(value.to_string())
        }
        fn create_boolean(&self, value: bool) -> TestValue {
            TestValue::Bool(value)
        }
        fn create_numeric(&self, value: Number) -> TestValue {
            TestValue::Num(value)
        }
        fn read_string_unchecked(&self, value: &TestValue) -> String {
            match value {
                TestValue::Str(s) => s.clone(),
                _ => unreachable!(),
            }
        }
        fn read_number_unchecked(&self, value: &TestValue) -> Number {
            match value {
                TestValue::Num(n) => *n,
                _ => unreachable!(),
            }
        }
        fn read_boolean_unchecked(&self, value: &TestValue) -> bool {
            match value {
                TestValue::Bool(b) => *b,
                _ => unreachable!(),
            }
        }
        fn create_list(&self, items: impl Iterator<Item = TestValue>) -> TestValue {
            TestValue::List(items.collect())
        }
        fn read_list_unchecked(&self, value: &TestValue) -> Vec<TestValue> {
            match value {
                TestValue::List(items) => items.clone(),
                _ => unreachable!(),
            }
        }
        fn create_map_entries_unchecked(
            &self,
            entries: impl Iterator<Item = (TestValue, TestValue)>,
        ) -> TestValue {
            TestValue::Map(entries.collect())
        }
        fn read_map_unchecked(&self, value: &TestValue) -> Vec<(TestValue, TestValue)> {
            match value {
                TestValue::Map(entries) => entries.clone(),
                _ => unreachable!(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum V {
        Null,
        Bool(bool),
        Num(Number),
        Str(String),
        List(Vec<V>),
        Map(Vec<(V, V)>),
    }

    #[derive(Debug, Clone, Copy)]
    struct Ops;

    impl DynamicOps<V> for Ops {
        fn empty(&self) -> V {
            V::Null
        }
        fn empty_list(&self) -> V {
            V::List(Vec::new())
        }
        fn empty_map(&self) -> V {
            V::Map(Vec::new())
        }
        fn is_empty_value(&self, value: &V) -> bool {
            matches!(value, V::Null)
        }
        fn is_map(&self, value: &V) -> bool {
            matches!(value, V::Map(_))
        }
        fn is_list(&self, value: &V) -> bool {
            matches!(value, V::List(_))
        }
        fn is_string(&self, value: &V) -> bool {
            matches!(value, V::Str(_))
        }
        fn is_number(&self, value: &V) -> bool {
            matches!(value, V::Num(_))
        }
        fn is_boolean(&self, value: &V) -> bool {
            matches!(value, V::Bool(_))
        }
        fn create_string(&self, value: &str) -> V {
            V::Str(value.to_string())
        }
        fn create_boolean(&self, value: bool) -> V {
            V::Bool(value)
        }
        fn create_numeric(&self, value: Number) -> V {
            V::Num(value)
        }
        fn read_string_unchecked(&self, value: &V) -> String {
            match value {
                V::Str(s) => s.clone(),
                _ => unreachable!(),
            }
        }
        fn read_number_unchecked(&self, value: &V) -> Number {
            match value {
                V::Num(n) => *n,
                _ => unreachable!(),
            }
        }
        fn read_boolean_unchecked(&self, value: &V) -> bool {
            match value {
                V::Bool(b) => *b,
                _ => unreachable!(),
            }
        }
        fn create_list(&self, items: impl Iterator<Item = V>) -> V {
            V::List(items.collect())
        }
        fn read_list_unchecked(&self, value: &V) -> Vec<V> {
            match value {
                V::List(items) => items.clone(),
                _ => unreachable!(),
            }
        }
        fn create_map_entries_unchecked(&self, entries: impl Iterator<Item = (V, V)>) -> V {
            V::Map(entries.collect())
        }
        fn read_map_unchecked(&self, value: &V) -> Vec<(V, V)> {
            match value {
                V::Map(entries) => entries.clone(),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn set_coerces_non_map_to_map() {
        let v = Ops.set(V::Null, "a", V::Num(Number::Int(1)));
        assert_eq!(v, V::Map(vec![(V::Str("a".into()), V::Num(Number::Int(1)))]));
    }

    #[test]
    fn set_is_immutable() {
        let original = V::Map(vec![(V::Str("a".into()), V::Num(Number::Int(1)))]);
        let before = original.clone();
        let _ = Ops.set(original.clone(), "b", V::Num(Number::Int(2)));
        assert_eq!(original, before);
    }

    #[test]
    fn remove_missing_is_noop() {
        let v = V::Map(vec![(V::Str("a".into()), V::Num(Number::Int(1)))]);
        let removed = Ops.remove(v.clone(), "nope");
        assert_eq!(removed, v);
    }

    #[test]
    fn remove_non_map_is_unchanged() {
        let v = V::Str("hi".into());
        assert_eq!(Ops.remove(v.clone(), "a"), v);
    }

    #[test]
    fn get_returns_none_for_absent_or_non_map() {
        assert_eq!(Ops.get(&V::Null, "a"), None);
        let v = V::Map(vec![(V::Str("a".into()), V::Num(Number::Int(1)))]);
        assert_eq!(Ops.get(&v, "missing"), None);
        assert_eq!(Ops.get(&v, "a"), Some(V::Num(Number::Int(1))));
    }

    #[test]
    fn create_map_skips_null_keys_and_converts_null_values() {
        let entries = vec![
            (V::Str("a".into()), V::Null),
            (V::Null, V::Num(Number::Int(9))),
            (V::Num(Number::Int(3)), V::Str("x".into())),
        ];
        let map = Ops.create_map(entries.into_iter());
        assert_eq!(
            map,
            V::Map(vec![
                (V::Str("a".into()), V::Null),
                (V::Str("3".into()), V::Str("x".into())),
            ])
        );
    }

    #[test]
    fn merge_to_list_appends_or_starts_from_empty() {
        let appended = Ops.merge_to_list(V::Null, V::Num(Number::Int(1))).result().unwrap();
        assert_eq!(appended, V::List(vec![V::Num(Number::Int(1))]));

        let appended2 = Ops
            .merge_to_list(appended, V::Num(Number::Int(2)))
            .result()
            .unwrap();
        assert_eq!(
            appended2,
            V::List(vec![V::Num(Number::Int(1)), V::Num(Number::Int(2))])
        );
    }

    #[test]
    fn merge_maps_is_right_biased() {
        let a = V::Map(vec![
            (V::Str("x".into()), V::Num(Number::Int(1))),
            (V::Str("y".into()), V::Num(Number::Int(2))),
        ]);
        let b = V::Map(vec![(V::Str("y".into()), V::Num(Number::Int(20)))]);
        let merged = Ops.merge_maps(a, b).result().unwrap();
        assert_eq!(Ops.get(&merged, "x"), Some(V::Num(Number::Int(1))));
        assert_eq!(Ops.get(&merged, "y"), Some(V::Num(Number::Int(20))));
    }

    #[test]
    fn primitive_reader_error_messages_match_format() {
        let err = Ops.get_string_value(&V::Num(Number::Int(1)));
        assert_eq!(err.error_message(), Some("Not a string: Num(Int(1))"));
    }

    #[test]
    fn convert_preserves_shape_and_drops_null_keys() {
        #[derive(Debug, Clone, PartialEq)]
        enum W {
            Null,
            Bool(bool),
            Num(Number),
            Str(String),
            List(Vec<W>),
            Map(Vec<(W, W)>),
        }
        #[derive(Debug, Clone, Copy)]
        struct WOps;
        impl DynamicOps<W> for WOps {
            fn empty(&self) -> W {
                W::Null
            }
            fn empty_list(&self) -> W {
                W::List(Vec::new())
            }
            fn empty_map(&self) -> W {
                W::Map(Vec::new())
            }
            fn is_empty_value(&self, value: &W) -> bool {
                matches!(value, W::Null)
            }
            fn is_map(&self, value: &W) -> bool {
                matches!(value, W::Map(_))
            }
            fn is_list(&self, value: &W) -> bool {
                matches!(value, W::List(_))
            }
            fn is_string(&self, value: &W) -> bool {
                matches!(value, W::Str(_))
            }
            fn is_number(&self, value: &W) -> bool {
                matches!(value, W::Num(_))
            }
            fn is_boolean(&self, value: &W) -> bool {
                matches!(value, W::Bool(_))
            }
            fn create_string(&self, value: &str) -> W {
                W::Str(value.to_string())
            }
            fn create_boolean(&self, value: bool) -> W {
                W::Bool(value)
            }
            fn create_numeric(&self, value: Number) -> W {
                W::Num(value)
            }
            fn read_string_unchecked(&self, value: &W) -> String {
                match value {
                    W::Str(s) => s.clone(),
                    _ => unreachable!(),
                }
            }
            fn read_number_unchecked(&self, value: &W) -> Number {
                match value {
                    W::Num(n) => *n,
                    _ => unreachable!(),
                }
            }
            fn read_boolean_unchecked(&self, value: &W) -> bool {
                match value {
                    W::Bool(b) => *b,
                    _ => unreachable!(),
                }
            }
            fn create_list(&self, items: impl Iterator<Item = W>) -> W {
                W::List(items.collect())
            }
            fn read_list_unchecked(&self, value: &W) -> Vec<W> {
                match value {
                    W::List(items) => items.clone(),
                    _ => unreachable!(),
                }
            }
            fn create_map_entries_unchecked(&self, entries: impl Iterator<Item = (W, W)>) -> W {
                W::Map(entries.collect())
            }
            fn read_map_unchecked(&self, value: &W) -> Vec<(W, W)> {
                match value {
                    W::Map(entries) => entries.clone(),
                    _ => unreachable!(),
                }
            }
        }

        let src = V::List(vec![
            V::Num(Number::Int(1)),
            V::Num(Number::Int(2)),
            V::Str("x".into()),
            V::Bool(true),
            V::Null,
        ]);
        let converted: W = convert_value(&WOps, &Ops, src);
        assert_eq!(
            converted,
            W::List(vec![
                W::Num(Number::Int(1)),
                W::Num(Number::Int(2)),
                W::Str("x".into()),
                W::Bool(true),
                W::Null,
            ])
        );
    }
}
