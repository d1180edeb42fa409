// Serializable descriptions of schemas for the viewer's schema endpoint

use serde_json::{json, Map, Number, Value};

use super::types::{ExtraFields, FieldDefinition, FieldType, SchemaDefinition};

impl SchemaDefinition {
    /// Describe this collection: name, type name, policy and ordered fields.
    pub fn describe(&self) -> Value {
        let fields: Vec<Value> = self.fields.iter().map(FieldDefinition::describe).collect();

        let mut out = Map::new();
        out.insert("name".into(), json!(self.collection_name));
        out.insert("type_name".into(), json!(self.type_name));
        if let Some(description) = &self.description {
            out.insert("description".into(), json!(description));
        }
        out.insert("extra".into(), json!(self.extra));
        out.insert("fields".into(), Value::Array(fields));
        Value::Object(out)
    }

    /// Render as a JSON Schema object.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(field.name.clone(), field.json_schema());
        }
        let required: Vec<&str> = self.required_fields().map(|f| f.name.as_str()).collect();

        let mut out = Map::new();
        out.insert("title".into(), json!(self.type_name));
        if let Some(description) = &self.description {
            out.insert("description".into(), json!(description));
        }
        out.insert("type".into(), json!("object"));
        out.insert("properties".into(), Value::Object(properties));
        out.insert("required".into(), json!(required));
        if self.extra == ExtraFields::Forbid {
            out.insert("additionalProperties".into(), json!(false));
        }
        Value::Object(out)
    }
}

impl FieldDefinition {
    pub fn describe(&self) -> Value {
        let mut constraints = Map::new();
        let c = &self.constraints;
        if let Some(n) = c.min_length {
            constraints.insert("min_length".into(), json!(n));
        }
        if let Some(n) = c.max_length {
            constraints.insert("max_length".into(), json!(n));
        }
        if let Some(n) = c.minimum {
            constraints.insert("minimum".into(), bound_value(n));
        }
        if let Some(n) = c.maximum {
            constraints.insert("maximum".into(), bound_value(n));
        }

        let mut out = Map::new();
        out.insert("name".into(), json!(self.name));
        out.insert("type".into(), json!(self.field_type.to_string()));
        out.insert("required".into(), json!(self.required()));
        if let Some(default) = self.effective_default() {
            out.insert("default".into(), default);
        }
        out.insert("constraints".into(), Value::Object(constraints));
        if let Some(description) = &self.description {
            out.insert("description".into(), json!(description));
        }
        Value::Object(out)
    }

    fn json_schema(&self) -> Value {
        let mut base = Map::new();
        match self.field_type.base() {
            FieldType::String => {
                base.insert("type".into(), json!("string"));
            }
            FieldType::Url => {
                base.insert("type".into(), json!("string"));
                base.insert("format".into(), json!("uri"));
            }
            FieldType::Integer => {
                base.insert("type".into(), json!("integer"));
            }
            FieldType::Float => {
                base.insert("type".into(), json!("number"));
            }
            FieldType::Boolean => {
                base.insert("type".into(), json!("boolean"));
            }
            FieldType::Optional(_) => unreachable!("base() strips optional"),
        }

        let c = &self.constraints;
        if let Some(n) = c.min_length {
            base.insert("minLength".into(), json!(n));
        }
        if let Some(n) = c.max_length {
            base.insert("maxLength".into(), json!(n));
        }
        if let Some(n) = c.minimum {
            base.insert("minimum".into(), bound_value(n));
        }
        if let Some(n) = c.maximum {
            base.insert("maximum".into(), bound_value(n));
        }

        let mut out = if self.field_type.is_optional() {
            let mut wrapper = Map::new();
            wrapper.insert(
                "anyOf".into(),
                json!([Value::Object(base), { "type": "null" }]),
            );
            wrapper
        } else {
            base
        };

        out.insert("title".into(), json!(title_case(&self.name)));
        if let Some(default) = self.effective_default() {
            out.insert("default".into(), default);
        }
        if let Some(description) = &self.description {
            out.insert("description".into(), json!(description));
        }
        Value::Object(out)
    }
}

/// Integral bounds render as integers (`0`, not `0.0`).
fn bound_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        json!(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// `image_url` -> `Image Url`
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
