//! `DynamicOps<serde_yaml::Value>` — the YAML format provider.
//!
//! `serde_yaml::Mapping` preserves insertion order natively, so no
//! `preserve_order`-style feature flag is needed here. The one YAML-specific
//! wrinkle is `Value::Tagged`: this ops implementation treats a tagged node
//! as transparent, reading and writing straight through to its untagged
//! inner value (`SPEC_FULL.md` §6) since YAML tags carry no meaning in this
//! library's value algebra.

use datafixer_core::{DataResult, DynamicOps, Number};
use serde_yaml::{Mapping, Value};

/// Zero-sized, `Copy`, process-wide singleton implementing
/// `DynamicOps<serde_yaml::Value>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlOps;

impl YamlOps {
    pub const INSTANCE: YamlOps = YamlOps;
}

/// See a tagged node through to its untagged payload; every other variant
/// is returned unchanged.
fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

impl DynamicOps<Value> for YamlOps {
    fn empty(&self) -> Value {
        Value::Null
    }

    fn empty_list(&self) -> Value {
        Value::Sequence(Vec::new())
    }

    fn empty_map(&self) -> Value {
        Value::Mapping(Mapping::new())
    }

    fn is_empty_value(&self, value: &Value) -> bool {
        untag(value).is_null()
    }

    fn is_map(&self, value: &Value) -> bool {
        untag(value).is_mapping()
    }

    fn is_list(&self, value: &Value) -> bool {
        untag(value).is_sequence()
    }

    fn is_string(&self, value: &Value) -> bool {
        untag(value).is_string()
    }

    fn is_number(&self, value: &Value) -> bool {
        let v = untag(value);
        v.is_number() && !v.is_bool()
    }

    fn is_boolean(&self, value: &Value) -> bool {
        untag(value).is_bool()
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
            Number::Float(v) => Value::Number((v as f64).into()),
            Number::Double(v) => Value::Number(v.into()),
        }
    }

    fn read_string_unchecked(&self, value: &Value) -> String {
        match untag(value) {
            Value::String(s) => s.clone(),
            _ => unreachable!("read_string_unchecked called on non-string value"),
        }
    }

    fn read_number_unchecked(&self, value: &Value) -> Number {
        match untag(value) {
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
        match untag(value) {
            Value::Bool(b) => *b,
            _ => unreachable!("read_boolean_unchecked called on non-boolean value"),
        }
    }

    fn create_list(&self, items: impl Iterator<Item = Value>) -> Value {
        Value::Sequence(items.collect())
    }

    fn read_list_unchecked(&self, value: &Value) -> Vec<Value> {
        match untag(value) {
            Value::Sequence(items) => items.clone(),
            _ => unreachable!("read_list_unchecked called on non-list value"),
        }
    }

    fn create_map_entries_unchecked(&self, entries: impl Iterator<Item = (Value, Value)>) -> Value {
        let mut mapping = Mapping::new();
        for (key, value) in entries {
            mapping.insert(key, value);
        }
        Value::Mapping(mapping)
    }

    fn read_map_unchecked(&self, value: &Value) -> Vec<(Value, Value)> {
        match untag(value) {
            Value::Mapping(mapping) => mapping.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            _ => unreachable!("read_map_unchecked called on non-map value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafixer_core::Dynamic;

    #[test]
    fn tagged_values_are_transparent_to_reads() {
        let tagged = Value::Tagged(Box::new(serde_yaml::value::TaggedValue {
            tag: serde_yaml::value::Tag::new("!Custom"),
            value: Value::String("payload".into()),
        }));
        assert!(YamlOps.is_string(&tagged));
        assert_eq!(YamlOps.read_string_unchecked(&tagged), "payload");
    }

    #[test]
    fn set_and_remove_round_trip() {
        let root = Dynamic::new(YamlOps, Value::Mapping(Mapping::new()));
        let root = root.set("name", Value::String("Alice".into()));
        assert_eq!(root.get("name").unwrap().value, Value::String("Alice".into()));
        let root = root.remove("name");
        assert!(root.get("name").is_none());
    }

    #[test]
    fn merge_maps_is_right_biased() {
        let mut a = Mapping::new();
        a.insert(Value::String("x".into()), Value::Number(1.into()));
        let mut b = Mapping::new();
        b.insert(Value::String("x".into()), Value::Number(2.into()));

        let merged = YamlOps.merge_maps(Value::Mapping(a), Value::Mapping(b)).result().unwrap();
        assert_eq!(YamlOps.get(&merged, "x"), Some(Value::Number(2.into())));
    }
}
