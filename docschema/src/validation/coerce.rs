use serde_json::{Number, Value};

use crate::schema::FieldType;

/// Convert a raw value to `field_type`, or `None` when it cannot be.
///
/// Conversion is lax: numeric strings become numbers, `"yes"`/`1` become
/// `true`, and so on. Strings are never produced from other JSON types.
pub(crate) fn coerce(field_type: &FieldType, value: &Value) -> Option<Value> {
    match field_type {
        FieldType::Optional(inner) => {
            if value.is_null() {
                Some(Value::Null)
            } else {
                coerce(inner, value)
            }
        }
        FieldType::String | FieldType::Url => value.as_str().map(|s| Value::String(s.to_string())),
        FieldType::Integer => coerce_integer(value),
        FieldType::Float => coerce_float(value),
        FieldType::Boolean => coerce_bool(value),
    }
}

fn coerce_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
        Value::Number(n) => {
            let f = n.as_f64()?;
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Some(Value::from(f as i64))
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<Value> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Number::from_f64(f).map(Value::Number)
}

fn coerce_bool(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" | "y" => Some(Value::Bool(true)),
            "false" | "0" | "no" | "off" | "f" | "n" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}
