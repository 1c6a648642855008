//! `DynamicOps<serde_json::Value>` — the JSON format provider.
//!
//! A thin, logic-free mapping from the tree algebra onto `serde_json::Value`,
//! in the same spirit as the teacher's per-format provider crates: this
//! crate owns nothing but the `get`/`set`/`merge` mapping for one backing
//! value type. `serde_json`'s `preserve_order` feature keeps object key
//! order stable across a round trip, satisfying the ordered-map-iteration
//! invariant the core algebra requires.

use datafixer_core::{DataResult, DynamicOps, Number};
use serde_json::{Map, Value};

/// Zero-sized, `Copy`, process-wide singleton implementing
/// `DynamicOps<serde_json::Value>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOps;

impl JsonOps {
    pub const INSTANCE: JsonOps = JsonOps;
}

impl DynamicOps<Value> for JsonOps {
    fn empty(&self) -> Value {
        Value::Null
    }

    fn empty_list(&self) -> Value {
        Value::Array(Vec::new())
    }

    fn empty_map(&self) -> Value {
        Value::Object(Map::new())
    }

    fn is_empty_value(&self, value: &Value) -> bool {
        value.is_null()
    }

    fn is_map(&self, value: &Value) -> bool {
        value.is_object()
    }

    fn is_list(&self, value: &Value) -> bool {
        value.is_array()
    }

    fn is_string(&self, value: &Value) -> bool {
        value.is_string()
    }

    fn is_number(&self, value: &Value) -> bool {
        value.is_number()
    }

    fn is_boolean(&self, value: &Value) -> bool {
        value.is_boolean()
    }

    fn create_string(&self, value: &str) -> Value {
        Value::String(value.to_string())
    }

    fn create_boolean(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn create_numeric(&self, value: Number) -> Value {
        match value {
            Number::Byte(v) => Value::Number(v.into()),
            Number::Short(v) => Value::Number(v.into()),
            Number::Int(v) => Value::Number(v.into()),
            Number::Long(v) => Value::Number(v.into()),
            Number::Float(v) => serde_json::Number::from_f64(v as f64)
                .map(Value::Number)
                .unwrap_or(Value::Number(0.into())),
            Number::Double(v) => serde_json::Number::from_f64(v)
                .map(Value::Number)
                .unwrap_or(Value::Number(0.into())),
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
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Number::Long(i)
                } else if let Some(u) = n.as_u64() {
                    Number::Long(u as i64)
                } else {
                    Number::Double(n.as_f64().unwrap_or(0.0))
                }
            }
            _ => unreachable!("read_number_unchecked called on non-number value"),
        }
    }

    fn read_boolean_unchecked(&self, value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
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
        let mut map = Map::new();
        for (key, value) in entries {
            let key = match key {
                Value::String(s) => s,
                other => other.to_string(),
            };
            map.insert(key, value);
        }
        Value::Object(map)
    }

    fn read_map_unchecked(&self, value: &Value) -> Vec<(Value, Value)> {
        match value {
            Value::Object(map) => map.iter().map(|(k, v)| (Value::String(k.clone()), v.clone())).collect(),
            _ => unreachable!("read_map_unchecked called on non-map value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafixer_core::Dynamic;

    #[test]
    fn set_and_get_round_trip_preserving_key_order() {
        let root = Dynamic::new(JsonOps, serde_json::json!({}));
        let root = root.set("b", Value::String("second".into()));
        let root = root.set("a", Value::String("first".into()));
        match &root.value {
            Value::Object(map) => {
                let keys: Vec<_> = map.keys().cloned().collect();
                assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn numbers_widen_to_long_or_double() {
        let root = Dynamic::new(JsonOps, serde_json::json!(42));
        assert_eq!(root.as_long().result(), Some(42));

        let root = Dynamic::new(JsonOps, serde_json::json!(1.5));
        assert_eq!(root.as_double().result(), Some(1.5));
    }

    #[test]
    fn remove_drops_field_and_has_reports_absence() {
        let root = Dynamic::new(JsonOps, serde_json::json!({"name": "Alice", "age": 30}));
        let removed = root.remove("age");
        assert!(!removed.has("age"));
        assert!(removed.has("name"));
    }

    #[test]
    fn field_codec_decodes_and_leaves_remainder() {
        use datafixer_core::codec::{Codec, FieldCodec};
        use datafixer_core::codec::StringCodec;

        let codec = FieldCodec::new("name", StringCodec);
        let value = serde_json::json!({"name": "Alice", "age": 30});
        let (name, remainder) = codec.decode(JsonOps, value).result().unwrap();
        assert_eq!(name, "Alice");
        assert!(!JsonOps.has(&remainder, "name"));
        assert!(JsonOps.has(&remainder, "age"));
    }
}
