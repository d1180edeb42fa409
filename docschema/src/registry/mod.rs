use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::document::ValidatedDocument;
use crate::error::{DocSchemaError, Result, ValidationError};
use crate::models::Model;
use crate::schema::{builtin, ExtraFields, SchemaDefinition};
use crate::validation::{self, ValidationReport};

/// The process-wide registry of built-in schemas.
///
/// Built on first use and never mutated afterwards, so it can be shared
/// across threads freely.
pub fn registry() -> &'static SchemaRegistry {
    static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| SchemaRegistry::builtin().expect("built-in schemas must be well-formed"))
}

/// An immutable set of schemas, indexed by collection name.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<SchemaDefinition>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding the built-in `User`, `Product` and `Fruit` schemas.
    pub fn builtin() -> Result<Self> {
        Self::builder().schemas(builtin::schemas()).build()
    }

    /// All registered schemas, in declaration order.
    pub fn list_schemas(&self) -> &[SchemaDefinition] {
        &self.schemas
    }

    pub fn get(&self, collection: &str) -> Option<&SchemaDefinition> {
        self.index.get(collection).map(|&i| &self.schemas[i])
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.collection_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    fn schema_for(&self, collection: &str) -> std::result::Result<&SchemaDefinition, ValidationError> {
        self.get(collection).ok_or_else(|| ValidationError::UnknownCollection {
            collection: collection.to_string(),
        })
    }

    /// Validate a candidate document against `collection`, stopping at the
    /// first failure. Performs no I/O.
    pub fn validate(
        &self,
        collection: &str,
        candidate: &Map<String, Value>,
    ) -> std::result::Result<ValidatedDocument, ValidationError> {
        let schema = self.schema_for(collection)?;
        validation::validate_document(schema, candidate).map_err(|e| {
            log::debug!("Document rejected by {collection}: {e}");
            e
        })
    }

    /// Like [`validate`](Self::validate), but accepts any JSON value. Anything
    /// other than an object is a type mismatch at `$root`.
    pub fn validate_value(
        &self,
        collection: &str,
        candidate: &Value,
    ) -> std::result::Result<ValidatedDocument, ValidationError> {
        let schema = self.schema_for(collection)?;
        let obj = candidate.as_object().ok_or_else(|| root_mismatch(candidate))?;
        self.validate(&schema.collection_name, obj)
    }

    /// Run every rule and report all failures at once.
    pub fn check(&self, collection: &str, candidate: &Value) -> ValidationReport {
        let errors = match self.schema_for(collection) {
            Ok(schema) => match candidate.as_object() {
                Some(obj) => return validation::check_document(schema, obj),
                None => vec![root_mismatch(candidate)],
            },
            Err(e) => vec![e],
        };
        ValidationReport {
            errors,
            dropped: Vec::new(),
        }
    }

    /// Validate against `T`'s collection and deserialize into `T`.
    ///
    /// Fails with a schema error when the collection is registered under a
    /// different type or with different fields than `T` declares.
    pub fn validate_as<T: Model>(&self, candidate: &Value) -> Result<T> {
        let collection = self.model_collection::<T>()?;
        self.validate_value(collection, candidate)?.deserialize()
    }

    /// Validate a typed model by its serialized form.
    pub fn validate_model<T: Model>(&self, model: &T) -> Result<ValidatedDocument> {
        let collection = self.model_collection::<T>()?;
        let value = serde_json::to_value(model)?;
        Ok(self.validate_value(collection, &value)?)
    }

    fn model_collection<T: Model>(&self) -> Result<&str> {
        let expected = T::schema();
        let registered = self.schema_for(&T::collection_name())?;

        let same_fields = registered
            .fields
            .iter()
            .map(|f| (&f.name, &f.field_type))
            .eq(expected.fields.iter().map(|f| (&f.name, &f.field_type)));
        if registered.type_name != expected.type_name || !same_fields {
            return Err(DocSchemaError::Schema(format!(
                "Collection '{}' is not registered with the {} model schema",
                registered.collection_name,
                T::TYPE_NAME
            )));
        }

        Ok(&registered.collection_name)
    }

    /// Payload for the viewer's schema endpoint: every collection with its
    /// ordered field metadata.
    pub fn describe(&self) -> Value {
        let collections: Vec<Value> = self.schemas.iter().map(SchemaDefinition::describe).collect();
        json!({ "collections": collections })
    }
}

fn root_mismatch(candidate: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        field: "$root".into(),
        expected: "object".into(),
        actual: candidate.clone(),
    }
}

/// Collects schema declarations and checks them before they become an
/// immutable [`SchemaRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemas: Vec<SchemaDefinition>,
    strict: bool,
}

impl RegistryBuilder {
    pub fn schema(mut self, schema: SchemaDefinition) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn schemas(mut self, schemas: impl IntoIterator<Item = SchemaDefinition>) -> Self {
        self.schemas.extend(schemas);
        self
    }

    /// Reject undeclared fields in every schema, whatever its own policy.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self) -> Result<SchemaRegistry> {
        let mut schemas = Vec::with_capacity(self.schemas.len());
        let mut index = HashMap::new();

        for mut schema in self.schemas {
            schema.validate_structure().map_err(DocSchemaError::Schema)?;

            if index.contains_key(&schema.collection_name) {
                return Err(DocSchemaError::Schema(format!(
                    "Collection '{}' is declared more than once",
                    schema.collection_name
                )));
            }

            if self.strict {
                schema.extra = ExtraFields::Forbid;
            }

            // Defaults are stored in their validated form so documents come
            // out type-correct without re-checking.
            for field in &mut schema.fields {
                if let Some(default) = &field.default {
                    let normalized = validation::validate_field(field, Some(default)).map_err(|e| {
                        DocSchemaError::Schema(format!(
                            "Schema '{}': invalid default for field '{}': {e}",
                            schema.type_name, field.name
                        ))
                    })?;
                    field.default = Some(normalized);
                }
            }

            index.insert(schema.collection_name.clone(), schemas.len());
            schemas.push(schema);
        }

        log::info!(
            "Schema registry ready with {} collection(s): {}",
            schemas.len(),
            schemas
                .iter()
                .map(|s| s.collection_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(SchemaRegistry { schemas, index })
    }
}
