use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::naming::CollectionNaming;

/// Declared type of a field.
///
/// The textual form (`string`, `integer`, `optional<url>`, ...) is what schema
/// files use and what introspection reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    /// Absolute http(s) URL
    Url,
    /// Accepts `null` in addition to the inner type
    Optional(Box<FieldType>),
}

impl FieldType {
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldType::Optional(_))
    }

    /// The type with any `optional<...>` wrapper removed.
    pub fn base(&self) -> &FieldType {
        match self {
            FieldType::Optional(inner) => inner.base(),
            other => other,
        }
    }

    /// Whether length constraints make sense for this type.
    pub fn is_textual(&self) -> bool {
        matches!(self.base(), FieldType::String | FieldType::Url)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.base(), FieldType::Integer | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Url => write!(f, "url"),
            FieldType::Optional(inner) => write!(f, "optional<{inner}>"),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s
            .strip_prefix("optional<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            let inner: FieldType = inner.parse()?;
            if inner.is_optional() {
                return Err(format!("Nested optional type '{s}' is not allowed"));
            }
            return Ok(FieldType::optional(inner));
        }

        match s {
            "string" | "str" => Ok(FieldType::String),
            "integer" | "int" => Ok(FieldType::Integer),
            "float" | "number" => Ok(FieldType::Float),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            "url" => Ok(FieldType::Url),
            other => Err(format!("Unknown field type '{other}'")),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.to_string()
    }
}

/// Inclusive bounds attached to a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, alias = "ge", skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, alias = "le", skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
    }
}

/// The rule a value broke, with the limit it was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "name", content = "limit", rename_all = "snake_case")]
pub enum ConstraintKind {
    MinLength(usize),
    MaxLength(usize),
    Minimum(f64),
    Maximum(f64),
    /// Not a well-formed absolute http(s) URL
    Url,
}

impl ConstraintKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::MinLength(_) => "min_length",
            ConstraintKind::MaxLength(_) => "max_length",
            ConstraintKind::Minimum(_) => "minimum",
            ConstraintKind::Maximum(_) => "maximum",
            ConstraintKind::Url => "url",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::MinLength(n) | ConstraintKind::MaxLength(n) => {
                write!(f, "{}={}", self.name(), n)
            }
            ConstraintKind::Minimum(n) | ConstraintKind::Maximum(n) => {
                write!(f, "{}={}", self.name(), n)
            }
            ConstraintKind::Url => write!(f, "url"),
        }
    }
}

/// Definition of a single field in a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Value substituted when the field is absent. `None` means no default;
    /// an explicit `default: null` is kept as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "explicit_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
    #[serde(flatten)]
    pub constraints: Constraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
            constraints: Constraints::default(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.constraints.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.constraints.max_length = Some(max);
        self
    }

    /// Inclusive lower bound.
    pub fn ge(mut self, minimum: f64) -> Self {
        self.constraints.minimum = Some(minimum);
        self
    }

    /// Inclusive upper bound.
    pub fn le(mut self, maximum: f64) -> Self {
        self.constraints.maximum = Some(maximum);
        self
    }

    /// A field must be supplied unless it is optional or has a default.
    pub fn required(&self) -> bool {
        !self.field_type.is_optional() && self.default.is_none()
    }

    /// What an absent field becomes: the declared default, or `null` for an
    /// optional field declared without one.
    pub fn effective_default(&self) -> Option<Value> {
        match &self.default {
            Some(value) => Some(value.clone()),
            None if self.field_type.is_optional() => Some(Value::Null),
            None => None,
        }
    }

    fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Field name must not be empty".into());
        }

        let c = &self.constraints;
        if (c.min_length.is_some() || c.max_length.is_some()) && !self.field_type.is_textual() {
            return Err(format!(
                "Field '{}': length constraints require a string or url type, not {}",
                self.name, self.field_type
            ));
        }
        if (c.minimum.is_some() || c.maximum.is_some()) && !self.field_type.is_numeric() {
            return Err(format!(
                "Field '{}': numeric bounds require an integer or float type, not {}",
                self.name, self.field_type
            ));
        }
        if let (Some(min), Some(max)) = (c.min_length, c.max_length) {
            if min > max {
                return Err(format!(
                    "Field '{}': min_length {min} exceeds max_length {max}",
                    self.name
                ));
            }
        }
        if let (Some(min), Some(max)) = (c.minimum, c.maximum) {
            if min > max {
                return Err(format!(
                    "Field '{}': minimum {min} exceeds maximum {max}",
                    self.name
                ));
            }
        }
        for bound in [c.minimum, c.maximum].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(format!("Field '{}': numeric bounds must be finite", self.name));
            }
        }

        Ok(())
    }
}

fn explicit_default<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// What happens to candidate fields the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraFields {
    /// Dropped from the validated document
    #[default]
    Ignore,
    /// Rejected with `UnknownField`
    Forbid,
}

/// A named, ordered set of field definitions for one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDefinition {
    pub type_name: String,
    pub collection_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub extra: ExtraFields,
    pub fields: Vec<FieldDefinition>,
}

impl SchemaDefinition {
    /// Create a schema whose collection name comes from the standard naming table.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self::with_naming(type_name, &CollectionNaming::standard())
    }

    pub fn with_naming(type_name: impl Into<String>, naming: &CollectionNaming) -> Self {
        let type_name = type_name.into();
        Self {
            collection_name: naming.resolve(&type_name),
            type_name,
            description: None,
            extra: ExtraFields::default(),
            fields: Vec::new(),
        }
    }

    /// Override the derived collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn extra(mut self, policy: ExtraFields) -> Self {
        self.extra = policy;
        self
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.required())
    }

    /// Validates the schema structure itself (not a document).
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.type_name.trim().is_empty() {
            return Err("Schema type name must not be empty".into());
        }
        if self.collection_name.trim().is_empty() {
            return Err(format!("Schema '{}' has an empty collection name", self.type_name));
        }
        if self.fields.is_empty() {
            return Err(format!("Schema '{}' declares no fields", self.type_name));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(format!(
                    "Schema '{}' declares field '{}' more than once",
                    self.type_name, field.name
                ));
            }
            field
                .validate_structure()
                .map_err(|e| format!("Schema '{}': {e}", self.type_name))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_text_form() {
        assert_eq!(FieldType::Integer.to_string(), "integer");
        assert_eq!(
            FieldType::optional(FieldType::Url).to_string(),
            "optional<url>"
        );
        assert_eq!(
            "optional<float>".parse::<FieldType>().unwrap(),
            FieldType::optional(FieldType::Float)
        );
        assert_eq!("bool".parse::<FieldType>().unwrap(), FieldType::Boolean);
        assert!("optional<optional<string>>".parse::<FieldType>().is_err());
        assert!("date".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_type_base() {
        let t = FieldType::optional(FieldType::Url);
        assert_eq!(t.base(), &FieldType::Url);
        assert!(t.is_textual());
        assert!(!t.is_numeric());
        assert!(FieldType::optional(FieldType::Float).is_numeric());
    }

    #[test]
    fn test_required_rules() {
        let plain = FieldDefinition::new("name", FieldType::String);
        assert!(plain.required());
        assert_eq!(plain.effective_default(), None);

        let defaulted = FieldDefinition::new("is_active", FieldType::Boolean).default_value(true);
        assert!(!defaulted.required());
        assert_eq!(defaulted.effective_default(), Some(json!(true)));

        let optional = FieldDefinition::new("age", FieldType::optional(FieldType::Integer));
        assert!(!optional.required());
        assert_eq!(optional.effective_default(), Some(Value::Null));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = SchemaDefinition::new("User")
            .with_field(FieldDefinition::new("name", FieldType::String))
            .with_field(FieldDefinition::new("name", FieldType::String));
        let err = schema.validate_structure().unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn test_empty_schema_rejected() {
        assert!(SchemaDefinition::new("Empty").validate_structure().is_err());
    }

    #[test]
    fn test_misplaced_constraints_rejected() {
        let schema = SchemaDefinition::new("Thing")
            .with_field(FieldDefinition::new("flag", FieldType::Boolean).min_length(1));
        assert!(schema.validate_structure().unwrap_err().contains("length"));

        let schema = SchemaDefinition::new("Thing")
            .with_field(FieldDefinition::new("title", FieldType::String).ge(0.0));
        assert!(schema.validate_structure().unwrap_err().contains("numeric"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let schema = SchemaDefinition::new("Thing")
            .with_field(FieldDefinition::new("n", FieldType::Integer).ge(10.0).le(1.0));
        assert!(schema.validate_structure().is_err());

        let schema = SchemaDefinition::new("Thing").with_field(
            FieldDefinition::new("s", FieldType::String)
                .min_length(5)
                .max_length(2),
        );
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_collection_name_resolution() {
        assert_eq!(SchemaDefinition::new("Product").collection_name, "product");
        assert_eq!(SchemaDefinition::new("BlogPost").collection_name, "blogs");
        assert_eq!(
            SchemaDefinition::new("Product").collection("goods").collection_name,
            "goods"
        );
    }

    #[test]
    fn test_field_definition_from_yaml() {
        let field: FieldDefinition = serde_yaml::from_str(
            "{ name: sweetness, type: 'optional<integer>', ge: 1, le: 10, default: 5 }",
        )
        .unwrap();
        assert_eq!(field.field_type, FieldType::optional(FieldType::Integer));
        assert_eq!(field.constraints.minimum, Some(1.0));
        assert_eq!(field.constraints.maximum, Some(10.0));
        assert_eq!(field.default, Some(json!(5)));
    }

    #[test]
    fn test_explicit_null_default_is_kept() {
        let field: FieldDefinition =
            serde_yaml::from_str("{ name: is_active, type: boolean, default: null }").unwrap();
        assert_eq!(field.default, Some(Value::Null));
        assert!(!field.required());

        let field: FieldDefinition =
            serde_yaml::from_str("{ name: is_active, type: boolean }").unwrap();
        assert_eq!(field.default, None);
        assert!(field.required());
    }
}
