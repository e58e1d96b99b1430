//! Structural matching of JSON values against PDL types

use pdl_types::{ListType, PrimitiveType, RecordType, Type};
use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationErrorKind};

/// Default nesting limit for structural checks
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Name of a JSON value's kind, as used in messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Path of a record member or top-level field below `parent`
pub(crate) fn member_path(parent: &str, name: &str) -> String {
    if parent == "$" {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn element_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

/// Walks a value alongside a type and collects every mismatch
pub(crate) struct Matcher {
    max_depth: usize,
}

impl Matcher {
    pub(crate) fn new(max_depth: usize) -> Self {
        Matcher { max_depth }
    }

    /// Whether `value` has type `ty`, discarding the details
    pub(crate) fn matches(&self, value: &Value, ty: &Type) -> bool {
        let mut scratch = Vec::new();
        self.check(value, ty, "$", 0, &mut scratch);
        scratch.is_empty()
    }

    pub(crate) fn check(
        &self,
        value: &Value,
        ty: &Type,
        path: &str,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        if depth > self.max_depth {
            errors.push(ValidationError::new(
                path,
                ValidationErrorKind::DepthExceeded,
                format!("value nests deeper than {} levels", self.max_depth),
            ));
            return;
        }

        match ty {
            Type::Any | Type::Dynamic(_) => {}
            Type::Primitive(prim) => {
                if !primitive_matches(*prim, value) {
                    errors.push(mismatch(path, ty, value));
                }
            }
            Type::List(list) => self.check_list(value, list, ty, path, depth, errors),
            Type::Record(record) => match value {
                Value::Object(map) => self.check_record(map, record, path, depth, errors),
                _ => errors.push(mismatch(path, ty, value)),
            },
            Type::Union(members) => {
                if !members.iter().any(|member| self.matches_at(value, member, depth)) {
                    errors.push(mismatch(path, ty, value));
                }
            }
            Type::Intersection(members) => {
                for member in members {
                    self.check(value, member, path, depth + 1, errors);
                }
            }
            Type::Never | Type::Function(_) | Type::Prompt(_) => {
                errors.push(ValidationError::new(
                    path,
                    ValidationErrorKind::TypeMismatch,
                    format!("no JSON value has type {}", ty),
                ));
            }
        }
    }

    fn matches_at(&self, value: &Value, ty: &Type, depth: usize) -> bool {
        let mut scratch = Vec::new();
        self.check(value, ty, "$", depth + 1, &mut scratch);
        scratch.is_empty()
    }

    fn check_list(
        &self,
        value: &Value,
        list: &ListType,
        ty: &Type,
        path: &str,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        let Value::Array(items) = value else {
            errors.push(mismatch(path, ty, value));
            return;
        };

        let too_short = list.min_length.is_some_and(|min| items.len() < min);
        let too_long = list.max_length.is_some_and(|max| items.len() > max);
        if too_short || too_long {
            errors.push(ValidationError::new(
                path,
                ValidationErrorKind::LengthOutOfBounds,
                format!("list of length {} does not fit {}", items.len(), ty),
            ));
        }

        for (index, item) in items.iter().enumerate() {
            self.check(item, &list.element, &element_path(path, index), depth + 1, errors);
        }
    }

    /// Check a record's members; closed records reject undeclared keys
    pub(crate) fn check_record(
        &self,
        map: &Map<String, Value>,
        record: &RecordType,
        path: &str,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        for field in &record.fields {
            let field_path = member_path(path, &field.name);
            match map.get(&field.name) {
                Some(value) => self.check(value, &field.ty, &field_path, depth + 1, errors),
                None if !field.optional => errors.push(ValidationError::new(
                    field_path,
                    ValidationErrorKind::MissingField,
                    format!("missing required field '{}'", field.name),
                )),
                None => {}
            }
        }

        if !record.open {
            for key in map.keys() {
                if record.field(key).is_none() {
                    errors.push(unknown_field(path, key));
                }
            }
        }
    }
}

fn primitive_matches(prim: PrimitiveType, value: &Value) -> bool {
    match prim {
        PrimitiveType::String => value.is_string(),
        PrimitiveType::Number => value.is_number(),
        PrimitiveType::Boolean => value.is_boolean(),
        PrimitiveType::Null => value.is_null(),
    }
}

fn mismatch(path: &str, ty: &Type, value: &Value) -> ValidationError {
    ValidationError::new(
        path,
        ValidationErrorKind::TypeMismatch,
        format!("expected {}, got {}", ty, json_kind(value)),
    )
}

pub(crate) fn unknown_field(path: &str, key: &str) -> ValidationError {
    ValidationError::new(
        member_path(path, key),
        ValidationErrorKind::UnknownField,
        format!("unknown field '{}'", key),
    )
}
