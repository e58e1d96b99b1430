//! Projection of schemas to JSON Schema descriptors
//!
//! The descriptor is what structured-output model APIs accept to constrain a
//! response. Types without a JSON shape (functions, prompts) are an error
//! rather than a silent `string`.

use pdl_types::{RecordType, Type};
use serde_json::{json, Map, Value};

use crate::error::ProjectionError;
use crate::schema::Schema;
use crate::validate::member_path;

impl Schema {
    /// Project this schema to a JSON Schema object descriptor
    pub fn to_openai_schema(&self) -> Result<Value, ProjectionError> {
        let mut properties = Map::new();
        for field in self.fields() {
            let mut projected = project(&field.ty, &field.name)?;
            if let Some(description) = &field.description {
                projected["description"] = Value::from(description.as_str());
            }
            properties.insert(field.name.clone(), projected);
        }

        let required: Vec<Value> = self
            .fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| Value::from(f.name.as_str()))
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
            "required": required,
        });
        if let Some(description) = self.description() {
            schema["description"] = Value::from(description);
        }
        if self.is_strict() {
            schema["additionalProperties"] = Value::Bool(false);
        }
        Ok(schema)
    }
}

/// Project a single type; `path` names the field for error reporting
pub fn project(ty: &Type, path: &str) -> Result<Value, ProjectionError> {
    match ty {
        Type::Primitive(prim) => Ok(json!({ "type": prim.type_name() })),
        Type::List(list) => {
            let mut out = json!({
                "type": "array",
                "items": project(&list.element, &format!("{}[]", path))?,
            });
            if let Some(min) = list.min_length {
                out["minItems"] = Value::from(min);
            }
            if let Some(max) = list.max_length {
                out["maxItems"] = Value::from(max);
            }
            Ok(out)
        }
        Type::Record(record) => project_record(record, path),
        Type::Union(members) => Ok(json!({ "oneOf": project_all(members, path)? })),
        Type::Intersection(members) => Ok(json!({ "allOf": project_all(members, path)? })),
        Type::Any | Type::Dynamic(_) => Ok(json!({})),
        Type::Never => Ok(json!({ "not": {} })),
        Type::Function(_) | Type::Prompt(_) => Err(ProjectionError::Unrepresentable {
            path: path.to_string(),
            ty: ty.to_string(),
        }),
    }
}

fn project_all(members: &[Type], path: &str) -> Result<Vec<Value>, ProjectionError> {
    members.iter().map(|member| project(member, path)).collect()
}

fn project_record(record: &RecordType, path: &str) -> Result<Value, ProjectionError> {
    let mut properties = Map::new();
    for field in &record.fields {
        properties.insert(field.name.clone(), project(&field.ty, &member_path(path, &field.name))?);
    }
    let required: Vec<&str> = record
        .fields
        .iter()
        .filter(|f| !f.optional)
        .map(|f| f.name.as_str())
        .collect();

    let mut out = json!({
        "type": "object",
        "properties": properties,
        "required": required,
    });
    if !record.open {
        out["additionalProperties"] = Value::Bool(false);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDef;
    use pdl_types::{Field, Param};

    #[test]
    fn test_primitives() {
        assert_eq!(project(&Type::null(), "x").unwrap(), json!({"type": "null"}));
        assert_eq!(project(&Type::boolean(), "x").unwrap(), json!({"type": "boolean"}));
    }

    #[test]
    fn test_bounded_list() {
        let ty = Type::bounded_list(Type::string(), Some(1), Some(3));
        assert_eq!(
            project(&ty, "tags").unwrap(),
            json!({"type": "array", "items": {"type": "string"}, "minItems": 1, "maxItems": 3})
        );
    }

    #[test]
    fn test_open_and_closed_records() {
        let closed = Type::record(vec![Field::new("a", Type::number()), Field::optional("b", Type::string())]);
        let out = project(&closed, "r").unwrap();
        assert_eq!(out["required"], json!(["a"]));
        assert_eq!(out["additionalProperties"], json!(false));

        let open = Type::open_record(vec![]);
        assert!(project(&open, "r").unwrap().get("additionalProperties").is_none());
    }

    #[test]
    fn test_required_lists_non_optional_fields() {
        let schema = Schema::new("Reply")
            .field(FieldDef::new("text", Type::string()))
            .field(FieldDef::new("lang", Type::string()).with_default("en"))
            .field(FieldDef::new("notes", Type::string()).optional());
        let out = schema.to_openai_schema().unwrap();
        assert_eq!(out["required"], json!(["text", "lang"]));
    }

    #[test]
    fn test_function_inside_list_reports_path() {
        let ty = Type::list(Type::function(vec![Param::new("x", Type::string())], Type::string()));
        match project(&ty, "handlers") {
            Err(ProjectionError::Unrepresentable { path, ty }) => {
                assert_eq!(path, "handlers[]");
                assert_eq!(ty, "(x: string) -> string");
            }
            other => panic!("Expected projection error, got {:?}", other),
        }
    }
}
