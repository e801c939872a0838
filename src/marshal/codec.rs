// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `serde_json` <-> `google.protobuf.Struct` conversion.
//!
//! Protobuf numbers are always doubles. On the way back, integral values that
//! fit in an `i64` are restored as JSON integers so integer-valued mappings
//! survive a round trip unchanged.

use prost_types::value::Kind;
use prost_types::{ListValue, Struct};
use serde_json::{Map, Number, Value};

pub fn json_to_struct(map: &Map<String, Value>) -> Struct {
    Struct {
        fields: map
            .iter()
            .map(|(key, value)| (key.clone(), json_to_value(value)))
            .collect(),
    }
}

pub fn json_to_value(value: &Value) -> prost_types::Value {
    let kind = match value {
        Value::Null => Kind::NullValue(prost_types::NullValue::NullValue as i32),
        Value::Bool(b) => Kind::BoolValue(*b),
        Value::Number(n) => Kind::NumberValue(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => Kind::StringValue(s.clone()),
        Value::Array(items) => Kind::ListValue(ListValue {
            values: items.iter().map(json_to_value).collect(),
        }),
        Value::Object(map) => Kind::StructValue(json_to_struct(map)),
    };
    prost_types::Value { kind: Some(kind) }
}

pub fn struct_to_json(s: &Struct) -> Map<String, Value> {
    s.fields
        .iter()
        .map(|(key, value)| (key.clone(), value_to_json(value)))
        .collect()
}

pub fn value_to_json(value: &prost_types::Value) -> Value {
    match &value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(*b),
        Some(Kind::NumberValue(n)) => number_to_json(*n),
        Some(Kind::StringValue(s)) => Value::String(s.clone()),
        Some(Kind::ListValue(list)) => Value::Array(list.values.iter().map(value_to_json).collect()),
        Some(Kind::StructValue(s)) => Value::Object(struct_to_json(s)),
    }
}

/// Struct numbers are all doubles on the wire. Integral ones within 2^53 come
/// back as JSON integers, so `101.0` decodes as `101`; compare decoded numbers
/// with `as_f64`.
fn number_to_json(n: f64) -> Value {
    // 2^53: beyond this doubles stop representing every integer exactly
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        return Value::Number(Number::from(n as i64));
    }
    // JSON has no NaN or infinities
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_mapping_round_trip() {
        let original = json!({
            "trend": "bullish",
            "confidence": 0.75,
            "count": 3,
            "flags": [true, false, null],
            "nested": { "weights": [0.25, 0.5, 0.25], "label": "w" },
        });
        let map = original.as_object().unwrap();

        let restored = struct_to_json(&json_to_struct(map));
        assert_eq!(Value::Object(restored), original);
    }

    #[test]
    fn test_negative_integers_stay_integers() {
        assert_eq!(number_to_json(-42.0), json!(-42));
        assert_eq!(number_to_json(0.5), json!(0.5));
    }

    #[test]
    fn test_non_finite_numbers_become_null() {
        assert_eq!(number_to_json(f64::NAN), Value::Null);
        assert_eq!(number_to_json(f64::INFINITY), Value::Null);
    }

    #[test]
    fn test_missing_kind_is_null() {
        assert_eq!(value_to_json(&prost_types::Value { kind: None }), Value::Null);
    }
}
