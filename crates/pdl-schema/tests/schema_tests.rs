//! Integration tests for validation, decoding and projection

use pdl_schema::{DecodeOptions, FieldDef, ProjectionError, Schema, ValidationErrorKind};
use pdl_types::{Field, Param, Type};
use serde_json::json;

fn age_schema() -> Schema {
    Schema::new("Age").field(FieldDef::new("age", Type::number()))
}

fn article_schema() -> Schema {
    Schema::new("Article")
        .with_description("A summarised article")
        .field(FieldDef::new("title", Type::string()).with_description("Headline"))
        .field(FieldDef::new("tags", Type::bounded_list(Type::string(), None, Some(5))))
        .field(FieldDef::new("published", Type::boolean()))
        .field(
            FieldDef::new(
                "author",
                Type::record(vec![
                    Field::new("name", Type::string()),
                    Field::optional("email", Type::dynamic_with("email")),
                ]),
            )
            .optional(),
        )
        .field(FieldDef::new("score", Type::union([Type::number(), Type::null()])).with_default(json!(null)))
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_missing_required_field() {
    let result = age_schema().validate(&json!({}));
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ValidationErrorKind::MissingField);
    assert_eq!(result.errors[0].path, "age");

    assert!(age_schema().validate(&json!({"age": 30})).valid);
}

#[test]
fn test_nested_paths() {
    let value = json!({
        "title": "Rust",
        "tags": ["a", 2],
        "published": true,
        "author": {"email": "x@y"}
    });
    let result = article_schema().validate(&value);
    let paths: Vec<_> = result.errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["tags[1]", "author.name"]);
}

#[test]
fn test_predicate_collects_alongside_other_errors() {
    let schema = Schema::new("Rating")
        .field(FieldDef::new("stars", Type::number()).with_validator(|v| {
            v.as_f64().is_some_and(|n| (1.0..=5.0).contains(&n))
        }))
        .field(FieldDef::new("comment", Type::string()));

    let result = schema.validate(&json!({"stars": 9}));
    assert_eq!(result.errors_of(ValidationErrorKind::PredicateFailed).count(), 1);
    assert_eq!(result.errors_of(ValidationErrorKind::MissingField).count(), 1);
}

#[test]
fn test_schema_is_shareable() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<Schema>();
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_direct_decode() {
    let result = age_schema().parse(r#"{"age": 30}"#);
    assert!(result.success);
    assert_eq!(result.value, Some(json!({"age": 30})));
}

#[test]
fn test_auto_correct_coerces_numbers() {
    let schema = age_schema();
    assert!(!schema.validate(&json!({"age": "30"})).valid);

    let result = schema.parse(r#"{"age":"30"}"#);
    assert!(result.success, "{:?}", result.errors);
    assert_eq!(result.value.unwrap()["age"], json!(30));
}

#[test]
fn test_fenced_block_is_extracted() {
    let result = age_schema().parse("```json\n{\"age\":30}\n```");
    assert!(result.success);
    assert_eq!(result.value, Some(json!({"age": 30})));

    let chatty = "Here you go:\n\n```\n{\"AGE\": \"41\"}\n```\nAnything else?";
    let result = age_schema().parse(chatty);
    assert_eq!(result.value, Some(json!({"age": 41})));
}

#[test]
fn test_auto_correct_full_article() {
    let text = r#"{
        "Title": 2024,
        "TAGS": ["x"],
        "published": "TRUE",
        "author": {"Name": "Ada"}
    }"#;
    let result = article_schema().parse(text);
    assert!(result.success, "{:?}", result.errors);
    let value = result.value.unwrap();
    assert_eq!(value["title"], json!("2024"));
    assert_eq!(value["tags"], json!(["x"]));
    assert_eq!(value["published"], json!(true));
    assert_eq!(value["author"], json!({"name": "Ada"}));
    assert_eq!(value["score"], json!(null));
}

#[test]
fn test_defaults_filled_on_direct_success() {
    let result = article_schema().parse(r#"{"title": "t", "tags": [], "published": false}"#);
    assert!(result.success);
    assert_eq!(result.value.unwrap().get("score"), Some(&json!(null)));
}

#[test]
fn test_strict_options_disable_fallbacks() {
    let options = DecodeOptions::strict();
    assert!(!age_schema().parse_with(r#"{"age":"30"}"#, &options).success);

    let result = age_schema().parse_with("```json\n{\"age\":30}\n```", &options);
    assert!(!result.success);
    assert_eq!(result.errors[0].kind, ValidationErrorKind::Malformed);
}

#[test]
fn test_unrepairable_value_reports_errors() {
    let result = age_schema().parse(r#"{"age": "thirty"}"#);
    assert!(!result.success);
    assert!(result.value.is_none());
    assert_eq!(result.errors[0].kind, ValidationErrorKind::TypeMismatch);
    assert!(result.into_result().is_err());
}

#[test]
fn test_garbage_is_malformed() {
    let result = age_schema().parse("I cannot answer that.");
    assert!(!result.success);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ValidationErrorKind::Malformed);
    assert_eq!(result.errors[0].path, "$");
}

#[test]
fn test_fence_is_only_extracted_once() {
    let nested = "```\n```json\n{\"age\": 1}\n```\n```";
    assert!(!age_schema().parse(nested).success);
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_openai_projection() {
    let schema = article_schema().strict();
    let projected = schema.to_openai_schema().unwrap();
    assert_eq!(
        projected,
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Headline"},
                "tags": {"type": "array", "items": {"type": "string"}, "maxItems": 5},
                "published": {"type": "boolean"},
                "author": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}, "email": {}},
                    "required": ["name"],
                    "additionalProperties": false
                },
                "score": {"oneOf": [{"type": "number"}, {"type": "null"}]}
            },
            "required": ["title", "tags", "published", "score"],
            "description": "A summarised article",
            "additionalProperties": false
        })
    );
}

#[test]
fn test_projection_rejects_functions() {
    let schema = Schema::new("Tool").field(FieldDef::new(
        "callback",
        Type::function(vec![Param::new("x", Type::string())], Type::string()),
    ));
    assert!(matches!(
        schema.to_openai_schema(),
        Err(ProjectionError::Unrepresentable { path, .. }) if path == "callback"
    ));
}
