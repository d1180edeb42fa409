use docschema::schema::{builtin, parse_schema_str};
use docschema::{
    registry, ConstraintKind, FieldType, SchemaRegistry, ValidationError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

/// A document satisfying every required field of a built-in collection.
fn minimal_document(collection: &str) -> Map<String, Value> {
    match collection {
        "user" => obj(json!({ "name": "A", "email": "a@b.com", "address": "x" })),
        "product" => obj(json!({ "title": "Lamp", "price": 19.99, "category": "home" })),
        "fruit" => obj(json!({ "name": "Mango" })),
        other => panic!("no sample for {other}"),
    }
}

#[test]
fn fruit_defaults_fill_in() {
    let doc = registry()
        .validate("fruit", &obj(json!({ "name": "Mango" })))
        .unwrap();
    assert_eq!(
        doc.into_value(),
        json!({
            "name": "Mango",
            "color": null,
            "sweetness": 5,
            "origin": null,
            "price": null,
            "image_url": null,
            "description": null
        })
    );
}

#[test]
fn fruit_empty_name_violates_min_length() {
    let err = registry()
        .validate("fruit", &obj(json!({ "name": "", "sweetness": 5 })))
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::ConstraintViolation {
            field: "name".into(),
            constraint: ConstraintKind::MinLength(1),
            value: json!(""),
        }
    );
}

#[test]
fn user_age_over_maximum() {
    let err = registry()
        .validate(
            "user",
            &obj(json!({ "name": "A", "email": "a@b.com", "address": "x", "age": 150 })),
        )
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::ConstraintViolation {
            field: "age".into(),
            constraint: ConstraintKind::Maximum(120.0),
            value: json!(150),
        }
    );
}

#[test]
fn list_schemas_returns_builtins_in_order() {
    let schemas = registry().list_schemas();
    let names: Vec<_> = schemas.iter().map(|s| s.collection_name.as_str()).collect();
    assert_eq!(names, vec!["user", "product", "fruit"]);

    let fruit = &schemas[2];
    assert_eq!(fruit.type_name, "Fruit");
    let sweetness = fruit.get_field("sweetness").unwrap();
    assert_eq!(sweetness.field_type, FieldType::optional(FieldType::Integer));
    assert_eq!(sweetness.default, Some(json!(5)));
    assert_eq!(sweetness.constraints.minimum, Some(1.0));
    assert_eq!(sweetness.constraints.maximum, Some(10.0));
    assert_eq!(sweetness.description.as_deref(), Some("Sweetness level 1-10"));
}

#[test]
fn every_required_field_is_enforced() {
    for schema in registry().list_schemas() {
        for field in schema.required_fields() {
            let mut doc = minimal_document(&schema.collection_name);
            doc.remove(&field.name);
            let err = registry().validate(&schema.collection_name, &doc).unwrap_err();
            assert_eq!(
                err,
                ValidationError::MissingField {
                    field: field.name.clone()
                },
                "{}.{}",
                schema.collection_name,
                field.name
            );
        }
    }
}

#[test]
fn every_default_is_applied() {
    for schema in registry().list_schemas() {
        let doc = registry()
            .validate(&schema.collection_name, &minimal_document(&schema.collection_name))
            .unwrap();
        for field in schema.fields.iter().filter(|f| !f.required()) {
            assert_eq!(
                doc.get(&field.name),
                field.effective_default().as_ref(),
                "{}.{}",
                schema.collection_name,
                field.name
            );
        }
    }
}

#[test]
fn numeric_bounds_are_inclusive_for_builtins() {
    let cases = [
        ("user", "age", 0, 120),
        ("fruit", "sweetness", 1, 10),
    ];
    for (collection, field, min, max) in cases {
        for (value, ok) in [(min, true), (max, true), (min - 1, false), (max + 1, false)] {
            let mut doc = minimal_document(collection);
            doc.insert(field.into(), json!(value));
            let result = registry().validate(collection, &doc);
            if ok {
                assert!(result.is_ok(), "{collection}.{field}={value} rejected");
            } else {
                assert!(
                    matches!(result, Err(ValidationError::ConstraintViolation { .. })),
                    "{collection}.{field}={value} accepted"
                );
            }
        }
    }
}

#[test]
fn price_lower_bound_is_inclusive() {
    let mut doc = minimal_document("product");
    doc.insert("price".into(), json!(0));
    assert!(registry().validate("product", &doc).is_ok());

    doc.insert("price".into(), json!(-0.01));
    let err = registry().validate("product", &doc).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::ConstraintViolation { constraint: ConstraintKind::Minimum(_), .. }
    ));
}

#[test]
fn name_length_bounds_are_inclusive() {
    let exact = "x".repeat(60);
    assert!(registry().validate("fruit", &obj(json!({ "name": exact }))).is_ok());
    assert!(registry().validate("fruit", &obj(json!({ "name": "x" }))).is_ok());

    let long = "x".repeat(61);
    let err = registry()
        .validate("fruit", &obj(json!({ "name": long })))
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::ConstraintViolation { constraint: ConstraintKind::MaxLength(60), .. }
    ));
}

#[test]
fn revalidation_is_idempotent() {
    let candidates = [
        ("user", json!({ "name": "A", "email": "a@b.com", "address": "x", "age": "33", "is_active": "no" })),
        ("product", json!({ "title": "Lamp", "price": 20, "category": "home", "in_stock": 0 })),
        ("fruit", json!({ "name": "Fig", "sweetness": 8.0, "image_url": "HTTP://Figs.Example.org", "extra": 1 })),
    ];

    for (collection, candidate) in candidates {
        let first = registry().validate_value(collection, &candidate).unwrap();
        let second = registry()
            .validate(collection, first.fields())
            .unwrap();
        assert_eq!(first, second, "{collection}");
    }
}

#[test]
fn describe_payload_matches_list() {
    let described = registry().describe();
    let collections = described["collections"].as_array().unwrap();
    assert_eq!(collections.len(), registry().list_schemas().len());
    for (desc, schema) in collections.iter().zip(registry().list_schemas()) {
        assert_eq!(desc["name"], json!(schema.collection_name));
        assert_eq!(
            desc["fields"].as_array().unwrap().len(),
            schema.fields.len()
        );
    }
}

#[test]
fn yaml_declarations_extend_the_builtins() {
    let extra = parse_schema_str(
        r#"
collections:
  - type_name: BlogPost
    extra: forbid
    fields:
      - { name: title, type: string, min_length: 1 }
      - { name: link, type: "optional<url>" }
      - { name: score, type: float, default: 1 }
"#,
    )
    .unwrap();

    let registry = SchemaRegistry::builder()
        .schemas(builtin::schemas())
        .schemas(extra)
        .build()
        .unwrap();
    assert_eq!(
        registry.collection_names().collect::<Vec<_>>(),
        vec!["user", "product", "fruit", "blogs"]
    );

    let doc = registry
        .validate("blogs", &obj(json!({ "title": "Hello" })))
        .unwrap();
    assert_eq!(doc.into_value(), json!({ "title": "Hello", "link": null, "score": 1.0 }));

    let err = registry
        .validate("blogs", &obj(json!({ "title": "Hello", "tags": [] })))
        .unwrap_err();
    assert_eq!(err.code(), "unknown_field");
}

#[test]
fn registry_is_shareable_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let doc = registry()
                    .validate("fruit", &obj(json!({ "name": format!("Fruit {i}") })))
                    .unwrap();
                doc.get("sweetness").cloned()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(json!(5)));
    }
}
