//! The sample schemas the viewer ships with: `User`, `Product` and `Fruit`.

use super::types::{FieldDefinition, FieldType, SchemaDefinition};

/// All built-in schemas, in declaration order.
pub fn schemas() -> Vec<SchemaDefinition> {
    vec![user(), product(), fruit()]
}

pub fn user() -> SchemaDefinition {
    SchemaDefinition::new("User")
        .description("Users collection schema")
        .with_field(FieldDefinition::new("name", FieldType::String).description("Full name"))
        .with_field(FieldDefinition::new("email", FieldType::String).description("Email address"))
        .with_field(FieldDefinition::new("address", FieldType::String).description("Address"))
        .with_field(
            FieldDefinition::new("age", FieldType::optional(FieldType::Integer))
                .ge(0.0)
                .le(120.0)
                .description("Age in years"),
        )
        .with_field(
            FieldDefinition::new("is_active", FieldType::Boolean)
                .default_value(true)
                .description("Whether user is active"),
        )
}

pub fn product() -> SchemaDefinition {
    SchemaDefinition::new("Product")
        .description("Products collection schema")
        .with_field(FieldDefinition::new("title", FieldType::String).description("Product title"))
        .with_field(
            FieldDefinition::new("description", FieldType::optional(FieldType::String))
                .description("Product description"),
        )
        .with_field(
            FieldDefinition::new("price", FieldType::Float)
                .ge(0.0)
                .description("Price in dollars"),
        )
        .with_field(FieldDefinition::new("category", FieldType::String).description("Product category"))
        .with_field(
            FieldDefinition::new("in_stock", FieldType::Boolean)
                .default_value(true)
                .description("Whether product is in stock"),
        )
}

pub fn fruit() -> SchemaDefinition {
    SchemaDefinition::new("Fruit")
        .description("Fruits collection schema")
        .with_field(
            FieldDefinition::new("name", FieldType::String)
                .min_length(1)
                .max_length(60)
                .description("Fruit name"),
        )
        .with_field(
            FieldDefinition::new("color", FieldType::optional(FieldType::String))
                .description("Primary color"),
        )
        .with_field(
            FieldDefinition::new("sweetness", FieldType::optional(FieldType::Integer))
                .default_value(5)
                .ge(1.0)
                .le(10.0)
                .description("Sweetness level 1-10"),
        )
        .with_field(
            FieldDefinition::new("origin", FieldType::optional(FieldType::String))
                .description("Where it's commonly grown"),
        )
        .with_field(
            FieldDefinition::new("price", FieldType::optional(FieldType::Float))
                .ge(0.0)
                .description("Approx. price per unit or lb"),
        )
        .with_field(
            FieldDefinition::new("image_url", FieldType::optional(FieldType::Url))
                .description("Image URL"),
        )
        .with_field(
            FieldDefinition::new("description", FieldType::optional(FieldType::String))
                .description("Short description"),
        )
}
