//! Helpers for the proto JSON representation of Move objects.

use serde_json::Value;

/// Convert a proto value into serde_json.
pub fn proto_to_json(value: &prost_types::Value) -> Value {
    match &value.kind {
        Some(prost_types::value::Kind::StringValue(s)) => Value::String(s.clone()),
        Some(prost_types::value::Kind::NumberValue(n)) => Value::Number(
            serde_json::Number::from_f64(*n).unwrap_or_else(|| serde_json::Number::from(0)),
        ),
        Some(prost_types::value::Kind::BoolValue(b)) => Value::Bool(*b),
        Some(prost_types::value::Kind::NullValue(_)) => Value::Null,
        Some(prost_types::value::Kind::ListValue(list)) => {
            Value::Array(list.values.iter().map(proto_to_json).collect())
        }
        Some(prost_types::value::Kind::StructValue(s)) => {
            let map: serde_json::Map<String, Value> = s
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), proto_to_json(v)))
                .collect();
            Value::Object(map)
        }
        None => Value::Null,
    }
}

/// String field, empty when absent.
pub fn get_string(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// u64 field. Move u64 values arrive as decimal strings in the JSON view,
/// so both encodings are accepted.
pub fn get_u64(value: &Value, field: &str) -> u64 {
    match value.get(field) {
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

pub fn get_bool(value: &Value, field: &str) -> bool {
    match value.get(field) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// String-array field, skipping non-string entries.
pub fn get_string_vec(value: &Value, field: &str) -> Vec<String> {
    value
        .get(field)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn proto_string(s: &str) -> prost_types::Value {
        prost_types::Value {
            kind: Some(prost_types::value::Kind::StringValue(s.to_string())),
        }
    }

    #[test]
    fn test_proto_to_json_struct() {
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("balance".to_string(), proto_string("1000000000"));
        fields.insert(
            "is_active".to_string(),
            prost_types::Value {
                kind: Some(prost_types::value::Kind::BoolValue(true)),
            },
        );
        let value = prost_types::Value {
            kind: Some(prost_types::value::Kind::StructValue(prost_types::Struct {
                fields,
            })),
        };

        let json = proto_to_json(&value);
        assert_eq!(get_u64(&json, "balance"), 1_000_000_000);
        assert!(get_bool(&json, "is_active"));
    }

    #[test]
    fn test_field_accessors_tolerate_absence() {
        let json = json!({ "name": "REX", "health": "97", "skills": ["0xa", "0xb"] });
        assert_eq!(get_string(&json, "name"), "REX");
        assert_eq!(get_string(&json, "missing"), "");
        assert_eq!(get_u64(&json, "health"), 97);
        assert_eq!(get_u64(&json, "missing"), 0);
        assert_eq!(get_string_vec(&json, "skills"), vec!["0xa", "0xb"]);
        assert!(get_string_vec(&json, "missing").is_empty());
        assert!(!get_bool(&json, "missing"));
    }

    #[test]
    fn test_get_bool_from_string() {
        let json = json!({ "is_locked": "True" });
        assert!(get_bool(&json, "is_locked"));
    }
}
