//! `DynamicOps<toml::Value>` — the TOML format provider.
//!
//! TOML has no null/empty value, unlike JSON, YAML or XML. This ops
//! implementation uses an empty table as the empty sentinel (`empty()`),
//! which means a genuinely empty table encountered in a real document is
//! indistinguishable from "nothing here" for the purposes of `create_map`'s
//! null-value handling and `merge_to_list`'s empty-start case. This is a
//! deliberate, documented tradeoff rather than an oversight: every
//! alternative (a dedicated empty-table-shaped newtype, refusing to support
//! `DynamicOps` for TOML at all) costs more than it buys for a format with
//! no concept of null in the first place. A TOML document's root must be a
//! table (`SPEC_FULL.md` §6); callers enforce that before calling `update`.

use datafixer_core::{DataResult, DynamicOps, Number};
use toml::value::{Array, Table};
use toml::Value;

/// Zero-sized, `Copy`, process-wide singleton implementing
/// `DynamicOps<toml::Value>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlOps;

impl TomlOps {
    pub const INSTANCE: TomlOps = TomlOps;
}

impl DynamicOps<Value> for TomlOps {
    fn empty(&self) -> Value {
        Value::Table(Table::new())
    }

    fn empty_list(&self) -> Value {
        Value::Array(Array::new())
    }

    fn empty_map(&self) -> Value {
        Value::Table(Table::new())
    }

    fn is_empty_value(&self, value: &Value) -> bool {
        matches!(value, Value::Table(t) if t.is_empty())
    }

    fn is_map(&self, value: &Value) -> bool {
        value.is_table()
    }

    fn is_list(&self, value: &Value) -> bool {
        value.is_array()
    }

    fn is_string(&self, value: &Value) -> bool {
        value.is_str()
    }

    fn is_number(&self, value: &Value) -> bool {
        value.is_integer() || value.is_float()
    }

    fn is_boolean(&self, value: &Value) -> bool {
        value.is_bool()
    }

    fn create_string(&self, value: &str) -> Value {
        Value::String(value.to_string())
    }

    fn create_boolean(&self, value: bool) -> Value {
        Value::Boolean(value)
    }

    fn create_numeric(&self, value: Number) -> Value {
        match value {
            Number::Byte(v) => Value::Integer(v as i64),
            Number::Short(v) => Value::Integer(v as i64),
            Number::Int(v) => Value::Integer(v as i64),
            Number::Long(v) => Value::Integer(v),
            Number::Float(v) => Value::Float(v as f64),
            Number::Double(v) => Value::Float(v),
        }
    }

    fn read_string_unchecked(&self, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            _ => unreachable!("read_string_unchecked called on non-string value"),
        }
    }

    fn read_number_unchecked(&self, value: &Value) -> Number {
        match value {
            Value::Integer(i) => Number::Long(*i),
            Value::Float(f) => Number::Double(*f),
            _ => unreachable!("read_number_unchecked called on non-number value"),
        }
    }

    fn read_boolean_unchecked(&self, value: &Value) -> bool {
        match value {
            Value::Boolean(b) => *b,
            _ => unreachable!("read_boolean_unchecked called on non-boolean value"),
        }
    }

    fn create_list(&self, items: impl Iterator<Item = Value>) -> Value {
        Value::Array(items.collect())
    }

    fn read_list_unchecked(&self, value: &Value) -> Vec<Value> {
        match value {
            Value::Array(items) => items.clone(),
            _ => unreachable!("read_list_unchecked called on non-list value"),
        }
    }

    fn create_map_entries_unchecked(&self, entries: impl Iterator<Item = (Value, Value)>) -> Value {
        let mut table = Table::new();
        for (key, value) in entries {
            let key = match key {
                Value::String(s) => s,
                other => other.to_string(),
            };
            table.insert(key, value);
        }
        Value::Table(table)
    }

    fn read_map_unchecked(&self, value: &Value) -> Vec<(Value, Value)> {
        match value {
            Value::Table(table) => table.iter().map(|(k, v)| (Value::String(k.clone()), v.clone())).collect(),
            _ => unreachable!("read_map_unchecked called on non-map value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafixer_core::Dynamic;

    #[test]
    fn set_and_get_preserve_insertion_order() {
        let root = Dynamic::new(TomlOps, Value::Table(Table::new()));
        let root = root.set("second", Value::String("b".into()));
        let root = root.set("first", Value::String("a".into()));
        match &root.value {
            Value::Table(t) => {
                let keys: Vec<_> = t.keys().cloned().collect();
                assert_eq!(keys, vec!["second".to_string(), "first".to_string()]);
            }
            _ => panic!("expected table"),
        }
    }

    #[test]
    fn integers_round_trip_as_long() {
        let root = Dynamic::new(TomlOps, Value::Integer(7));
        assert_eq!(root.as_long().result(), Some(7));
    }

    #[test]
    fn empty_table_is_the_empty_sentinel() {
        assert!(TomlOps.is_empty_value(&Value::Table(Table::new())));
        let mut non_empty = Table::new();
        non_empty.insert("a".to_string(), Value::Boolean(true));
        assert!(!TomlOps.is_empty_value(&Value::Table(non_empty)));
    }
}
