use crate::schema::ConstraintKind;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Why a candidate document was rejected by a schema.
///
/// These are ordinary outcomes returned to the caller; none of them is fatal.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    #[error("Field '{field}' expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: Value,
    },

    #[error("Field '{field}' violates {constraint}, got {value}")]
    ConstraintViolation {
        field: String,
        constraint: ConstraintKind,
        value: Value,
    },

    #[error("Unexpected field '{field}' (undeclared fields are forbidden)")]
    UnknownField { field: String },

    #[error("Unknown collection: {collection}")]
    UnknownCollection { collection: String },
}

impl ValidationError {
    /// The offending field, when the failure is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::ConstraintViolation { field, .. }
            | ValidationError::UnknownField { field } => Some(field),
            ValidationError::UnknownCollection { .. } => None,
        }
    }

    /// Stable machine-readable code, matching the serialized `kind` tag.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => "missing_field",
            ValidationError::TypeMismatch { .. } => "type_mismatch",
            ValidationError::ConstraintViolation { .. } => "constraint_violation",
            ValidationError::UnknownField { .. } => "unknown_field",
            ValidationError::UnknownCollection { .. } => "unknown_collection",
        }
    }
}

#[derive(Error, Debug)]
pub enum DocSchemaError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocSchemaError>;
