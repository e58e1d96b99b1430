//! Field definitions

use pdl_types::Type;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Custom predicate run on a field value after it passed the structural check
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A single named field of a [`Schema`](crate::Schema)
#[derive(Clone)]
pub struct FieldDef {
    /// Field name (the JSON object key)
    pub name: String,
    /// Declared type
    pub ty: Type,
    /// Whether the field must be present (unless it has a default)
    pub required: bool,
    /// Value used when the field is absent
    pub default: Option<Value>,
    /// Human-readable description, carried into the JSON Schema projection
    pub description: Option<String>,
    predicate: Option<Predicate>,
}

impl FieldDef {
    /// Create a required field
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        FieldDef {
            name: name.into(),
            ty,
            required: true,
            default: None,
            description: None,
            predicate: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a custom predicate
    ///
    /// The predicate only sees values that already match the declared type.
    pub fn with_validator<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Whether validation reports this field when it is absent
    pub fn is_mandatory(&self) -> bool {
        self.required && self.default.is_none()
    }

    pub(crate) fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("description", &self.description)
            .field("predicate", &self.predicate.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let field = FieldDef::new("age", Type::number());
        assert!(field.required);
        assert!(field.is_mandatory());

        let field = field.with_default(json!(18));
        assert!(!field.is_mandatory());

        let field = FieldDef::new("nick", Type::string()).optional();
        assert!(!field.is_mandatory());
        assert!(field.clone().required().is_mandatory());
    }

    #[test]
    fn test_debug_hides_predicate() {
        let field = FieldDef::new("x", Type::number()).with_validator(|v| v.is_number());
        let debug = format!("{:?}", field);
        assert!(debug.contains("predicate: Some(\"..\")"));
    }
}
