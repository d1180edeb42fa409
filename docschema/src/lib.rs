pub mod schema;
pub mod validation;
pub mod document;
pub mod registry;
pub mod models;
pub mod error;

pub use document::ValidatedDocument;
pub use error::{DocSchemaError, Result, ValidationError};
pub use models::{Fruit, Model, Product, User};
pub use registry::{registry, RegistryBuilder, SchemaRegistry};
pub use schema::{
    CollectionNaming, ConstraintKind, Constraints, ExtraFields, FieldDefinition, FieldType,
    SchemaDefinition,
};
pub use validation::ValidationReport;
