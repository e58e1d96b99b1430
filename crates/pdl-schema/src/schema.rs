//! Schema definition and validation

use pdl_types::Type;
use serde_json::Value;

use crate::error::{ValidationError, ValidationErrorKind, ValidationResult};
use crate::field::FieldDef;
use crate::validate::{json_kind, unknown_field, Matcher, DEFAULT_MAX_DEPTH};

/// Declared shape of a structured prompt output
///
/// A schema is immutable once built and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDef>,
    strict: bool,
}

impl Schema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Schema {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            strict: false,
        }
    }

    /// Build a schema from a record type
    ///
    /// Optional record fields become optional schema fields and a closed
    /// record yields a strict schema. Returns `None` for non-record types.
    pub fn from_type(name: impl Into<String>, ty: &Type) -> Option<Self> {
        let record = ty.as_record()?;
        let mut schema = Schema::new(name);
        schema.strict = !record.open;
        for field in &record.fields {
            let def = FieldDef::new(field.name.clone(), field.ty.clone());
            schema.fields.push(if field.optional { def.optional() } else { def });
        }
        Some(schema)
    }

    /// Add a field
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reject top-level keys that no field declares
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Look up a field by exact name
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a value against every field
    ///
    /// All fields are checked; a failure on one does not hide the others.
    pub fn validate(&self, value: &Value) -> ValidationResult {
        self.validate_with_depth(value, DEFAULT_MAX_DEPTH)
    }

    pub(crate) fn validate_with_depth(&self, value: &Value, max_depth: usize) -> ValidationResult {
        let Value::Object(map) = value else {
            return ValidationResult::from_errors(vec![ValidationError::new(
                "$",
                ValidationErrorKind::NotAnObject,
                format!("expected an object, got {}", json_kind(value)),
            )]);
        };

        let matcher = Matcher::new(max_depth);
        let mut errors = Vec::new();

        for field in &self.fields {
            match map.get(&field.name) {
                Some(value) => {
                    let before = errors.len();
                    matcher.check(value, &field.ty, &field.name, 1, &mut errors);
                    // Predicates only run on structurally valid values
                    if errors.len() == before {
                        if let Some(predicate) = field.predicate() {
                            if !predicate(value) {
                                errors.push(ValidationError::new(
                                    field.name.clone(),
                                    ValidationErrorKind::PredicateFailed,
                                    format!("value rejected by validator for '{}'", field.name),
                                ));
                            }
                        }
                    }
                }
                None if field.is_mandatory() => errors.push(ValidationError::new(
                    field.name.clone(),
                    ValidationErrorKind::MissingField,
                    format!("missing required field '{}'", field.name),
                )),
                None => {}
            }
        }

        if self.strict {
            for key in map.keys() {
                if self.get_field(key).is_none() {
                    errors.push(unknown_field("$", key));
                }
            }
        }

        ValidationResult::from_errors(errors)
    }

    /// Insert defaults for absent fields
    pub(crate) fn apply_defaults(&self, value: &mut Value) {
        let Value::Object(map) = value else {
            return;
        };
        for field in &self.fields {
            if let Some(default) = &field.default {
                if !map.contains_key(&field.name) {
                    map.insert(field.name.clone(), default.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdl_types::Field;
    use serde_json::json;

    fn person() -> Schema {
        Schema::new("Person")
            .field(FieldDef::new("name", Type::string()))
            .field(FieldDef::new("age", Type::number()).with_validator(|v| v.as_f64().is_some_and(|n| n >= 0.0)))
            .field(FieldDef::new("role", Type::string()).with_default("guest"))
    }

    #[test]
    fn test_all_fields_are_reported() {
        let result = person().validate(&json!({"age": "old"}));
        assert!(!result.valid);
        let kinds: Vec<_> = result.errors.iter().map(|e| (e.path.as_str(), e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("name", ValidationErrorKind::MissingField),
                ("age", ValidationErrorKind::TypeMismatch),
            ]
        );
    }

    #[test]
    fn test_predicate_runs_after_structure() {
        let result = person().validate(&json!({"name": "a", "age": -1}));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ValidationErrorKind::PredicateFailed);
    }

    #[test]
    fn test_non_object_rejected() {
        let result = person().validate(&json!([1, 2]));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ValidationErrorKind::NotAnObject);
        assert_eq!(result.errors[0].path, "$");
    }

    #[test]
    fn test_strict_schema_rejects_extra_keys() {
        let value = json!({"name": "a", "age": 1, "color": "red"});
        assert!(person().validate(&value).valid);

        let result = person().strict().validate(&value);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "color");
        assert_eq!(result.errors[0].kind, ValidationErrorKind::UnknownField);
    }

    #[test]
    fn test_from_record_type() {
        let ty = Type::record(vec![
            Field::new("answer", Type::string()),
            Field::optional("confidence", Type::number()),
        ]);
        let schema = Schema::from_type("Answer", &ty).unwrap();
        assert!(schema.is_strict());
        assert!(schema.get_field("answer").unwrap().is_mandatory());
        assert!(!schema.get_field("confidence").unwrap().is_mandatory());

        assert!(Schema::from_type("X", &Type::string()).is_none());
    }

    #[test]
    fn test_apply_defaults() {
        let mut value = json!({"name": "a", "age": 3});
        person().apply_defaults(&mut value);
        assert_eq!(value["role"], "guest");
    }
}
