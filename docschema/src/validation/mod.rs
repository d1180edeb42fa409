mod coerce;
pub mod url;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::ValidatedDocument;
use crate::error::ValidationError;
use crate::schema::{ConstraintKind, ExtraFields, FieldDefinition, FieldType, SchemaDefinition};

/// Every issue found in a candidate document, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    /// Undeclared fields that were silently dropped
    pub dropped: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_dropped(&self) -> bool {
        !self.dropped.is_empty()
    }
}

/// Validate a candidate against a schema, stopping at the first failure.
///
/// Declared fields are processed in declaration order; undeclared fields are
/// handled last according to the schema's `extra` policy.
pub fn validate_document(
    schema: &SchemaDefinition,
    candidate: &Map<String, Value>,
) -> Result<ValidatedDocument, ValidationError> {
    let mut fields = Map::new();

    for field in &schema.fields {
        let value = validate_field(field, candidate.get(&field.name))?;
        fields.insert(field.name.clone(), value);
    }

    for key in undeclared(schema, candidate) {
        match schema.extra {
            ExtraFields::Forbid => {
                return Err(ValidationError::UnknownField { field: key.clone() });
            }
            ExtraFields::Ignore => {
                log::debug!("Dropping undeclared field '{key}' from {}", schema.collection_name);
            }
        }
    }

    Ok(ValidatedDocument::new(schema.collection_name.clone(), fields))
}

/// Run every rule and collect all failures.
pub fn check_document(schema: &SchemaDefinition, candidate: &Map<String, Value>) -> ValidationReport {
    let mut report = ValidationReport::default();

    for field in &schema.fields {
        if let Err(e) = validate_field(field, candidate.get(&field.name)) {
            report.errors.push(e);
        }
    }

    for key in undeclared(schema, candidate) {
        match schema.extra {
            ExtraFields::Forbid => report
                .errors
                .push(ValidationError::UnknownField { field: key.clone() }),
            ExtraFields::Ignore => report.dropped.push(key.clone()),
        }
    }

    report
}

/// Validate one field's raw value (`None` when absent) and return the value
/// that belongs in the validated document.
pub fn validate_field(
    field: &FieldDefinition,
    value: Option<&Value>,
) -> Result<Value, ValidationError> {
    let value = match value {
        Some(raw) => coerce::coerce(&field.field_type, raw).ok_or_else(|| {
            ValidationError::TypeMismatch {
                field: field.name.clone(),
                expected: field.field_type.to_string(),
                actual: raw.clone(),
            }
        })?,
        None => field
            .effective_default()
            .ok_or_else(|| ValidationError::MissingField {
                field: field.name.clone(),
            })?,
    };

    check_constraints(field, value)
}

fn check_constraints(field: &FieldDefinition, value: Value) -> Result<Value, ValidationError> {
    if value.is_null() {
        return Ok(value);
    }

    let violation = |constraint: ConstraintKind, value: Value| ValidationError::ConstraintViolation {
        field: field.name.clone(),
        constraint,
        value,
    };
    let c = &field.constraints;

    match field.field_type.base() {
        FieldType::String | FieldType::Url => {
            let text = match value.as_str() {
                Some(text) => text.to_string(),
                None => return Ok(value),
            };

            let text = if *field.field_type.base() == FieldType::Url {
                match url::normalize_http_url(&text) {
                    Some(normalized) => normalized,
                    None => return Err(violation(ConstraintKind::Url, value)),
                }
            } else {
                text
            };

            let length = text.chars().count();
            if let Some(min) = c.min_length {
                if length < min {
                    return Err(violation(ConstraintKind::MinLength(min), value));
                }
            }
            if let Some(max) = c.max_length {
                if length > max {
                    return Err(violation(ConstraintKind::MaxLength(max), value));
                }
            }
            Ok(Value::String(text))
        }
        FieldType::Integer | FieldType::Float => {
            let Some(n) = value.as_f64() else {
                return Ok(value);
            };
            if let Some(min) = c.minimum {
                if n < min {
                    return Err(violation(ConstraintKind::Minimum(min), value));
                }
            }
            if let Some(max) = c.maximum {
                if n > max {
                    return Err(violation(ConstraintKind::Maximum(max), value));
                }
            }
            Ok(value)
        }
        FieldType::Boolean | FieldType::Optional(_) => Ok(value),
    }
}

fn undeclared<'a>(
    schema: &'a SchemaDefinition,
    candidate: &'a Map<String, Value>,
) -> impl Iterator<Item = &'a String> + 'a {
    candidate
        .keys()
        .filter(move |key| schema.get_field(key).is_none())
}
