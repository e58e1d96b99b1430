//! Decoding loosely structured model output against a schema
//!
//! Model responses are often almost right: keys in the wrong case, numbers
//! quoted as strings, JSON wrapped in a markdown code fence. Decoding tries
//! the strict route first and falls back to correction and extraction.

use once_cell::sync::Lazy;
use pdl_types::{PrimitiveType, Type};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::ValidationError;
use crate::schema::Schema;
use crate::validate::{Matcher, DEFAULT_MAX_DEPTH};

static FENCED_BLOCK: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_+.-]*[ \t]*\r?\n(.*?)```").ok());

/// Knobs for [`Schema::parse_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    /// Remap keys, coerce primitives and fill defaults when strict decoding fails
    pub auto_correct: bool,
    /// Look for a fenced code block when the text is not JSON
    pub extract_fenced: bool,
    /// Nesting limit for validation and correction
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            auto_correct: true,
            extract_fenced: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Strict decoding: no correction, no extraction
    pub fn strict() -> Self {
        DecodeOptions {
            auto_correct: false,
            extract_fenced: false,
            ..Self::default()
        }
    }
}

/// Outcome of decoding text against a schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

impl DecodeResult {
    fn ok(value: Value) -> Self {
        DecodeResult {
            success: true,
            value: Some(value),
            errors: Vec::new(),
        }
    }

    fn failed(errors: Vec<ValidationError>) -> Self {
        DecodeResult {
            success: false,
            value: None,
            errors,
        }
    }

    /// Turn the result into a `Result`
    pub fn into_result(self) -> Result<Value, Vec<ValidationError>> {
        match self.value {
            Some(value) if self.success => Ok(value),
            _ => Err(self.errors),
        }
    }
}

/// Payload of the first fenced code block in `text`, if any
pub fn extract_fenced(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .as_ref()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl Schema {
    /// Decode `text` with the default options
    pub fn parse(&self, text: &str) -> DecodeResult {
        self.parse_with(text, &DecodeOptions::default())
    }

    /// Decode `text` into a value matching this schema
    pub fn parse_with(&self, text: &str, options: &DecodeOptions) -> DecodeResult {
        self.decode(text, options, options.extract_fenced)
    }

    fn decode(&self, text: &str, options: &DecodeOptions, may_extract: bool) -> DecodeResult {
        let value = match serde_json::from_str::<Value>(text.trim()) {
            Ok(value) => value,
            Err(err) => {
                if may_extract {
                    if let Some(payload) = extract_fenced(text) {
                        debug!(schema = %self.name(), "decoding fenced block payload");
                        return self.decode(payload, options, false);
                    }
                }
                debug!(schema = %self.name(), error = %err, "text is not JSON");
                return DecodeResult::failed(vec![ValidationError::malformed(err.to_string())]);
            }
        };

        let direct = self.validate_with_depth(&value, options.max_depth);
        if direct.valid {
            debug!(schema = %self.name(), "direct decode validated");
            let mut value = value;
            self.apply_defaults(&mut value);
            return DecodeResult::ok(value);
        }

        if !options.auto_correct {
            return DecodeResult::failed(direct.errors);
        }

        let corrected = self.auto_correct(value, options.max_depth);
        let retry = self.validate_with_depth(&corrected, options.max_depth);
        if retry.valid {
            debug!(
                schema = %self.name(),
                fixed = direct.errors.len(),
                "auto-correction repaired value"
            );
            DecodeResult::ok(corrected)
        } else {
            debug!(
                schema = %self.name(),
                remaining = retry.errors.len(),
                "auto-correction could not repair value"
            );
            DecodeResult::failed(retry.errors)
        }
    }

    /// Remap keys case-insensitively, coerce primitives and fill defaults
    pub fn auto_correct(&self, value: Value, max_depth: usize) -> Value {
        let Value::Object(map) = value else {
            return value;
        };

        let corrector = Corrector {
            matcher: Matcher::new(max_depth),
            max_depth,
        };
        let fields: Vec<(&str, &Type)> = self
            .fields()
            .iter()
            .map(|f| (f.name.as_str(), &f.ty))
            .collect();

        let mut value = Value::Object(corrector.remap(map, &fields, 1));
        self.apply_defaults(&mut value);
        value
    }
}

struct Corrector {
    matcher: Matcher,
    max_depth: usize,
}

impl Corrector {
    /// Rename keys to their declared spelling and coerce each member
    ///
    /// An exact key always wins over a case-insensitive match for the same
    /// field; keys matching no field are kept unchanged.
    fn remap(&self, map: Map<String, Value>, fields: &[(&str, &Type)], depth: usize) -> Map<String, Value> {
        let mut out = Map::new();
        let mut deferred = Vec::new();

        for (key, value) in map {
            match fields.iter().find(|(name, _)| *name == key) {
                Some((name, ty)) => {
                    out.insert(name.to_string(), self.coerce(value, ty, depth));
                }
                None => deferred.push((key, value)),
            }
        }

        for (key, value) in deferred {
            let lower = key.to_lowercase();
            match fields.iter().find(|(name, _)| name.to_lowercase() == lower) {
                Some((name, ty)) if !out.contains_key(*name) => {
                    out.insert(name.to_string(), self.coerce(value, ty, depth));
                }
                _ => {
                    out.insert(key, value);
                }
            }
        }

        out
    }

    fn coerce(&self, value: Value, ty: &Type, depth: usize) -> Value {
        if depth > self.max_depth {
            return value;
        }

        match ty {
            Type::Primitive(prim) => coerce_primitive(value, *prim),
            Type::List(list) => match value {
                Value::Array(items) => Value::Array(
                    items
                        .into_iter()
                        .map(|item| self.coerce(item, &list.element, depth + 1))
                        .collect(),
                ),
                other => other,
            },
            Type::Record(record) => match value {
                Value::Object(map) => {
                    let fields: Vec<(&str, &Type)> = record
                        .fields
                        .iter()
                        .map(|f| (f.name.as_str(), &f.ty))
                        .collect();
                    Value::Object(self.remap(map, &fields, depth + 1))
                }
                other => other,
            },
            Type::Union(members) => {
                if members.iter().any(|member| self.matcher.matches(&value, member)) {
                    return value;
                }
                // First member the coerced value fits
                for member in members {
                    let candidate = self.coerce(value.clone(), member, depth + 1);
                    if self.matcher.matches(&candidate, member) {
                        return candidate;
                    }
                }
                value
            }
            Type::Intersection(members) => members
                .iter()
                .fold(value, |acc, member| self.coerce(acc, member, depth + 1)),
            Type::Any
            | Type::Dynamic(_)
            | Type::Never
            | Type::Function(_)
            | Type::Prompt(_) => value,
        }
    }
}

fn coerce_primitive(value: Value, prim: PrimitiveType) -> Value {
    match (prim, value) {
        (PrimitiveType::Number, Value::String(text)) => {
            parse_number(text.trim()).unwrap_or(Value::String(text))
        }
        (PrimitiveType::Boolean, Value::String(text)) => {
            if text.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if text.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                Value::String(text)
            }
        }
        (PrimitiveType::String, Value::String(text)) => Value::String(text),
        (PrimitiveType::String, Value::Null) => Value::Null,
        (PrimitiveType::String, other) => Value::String(other.to_string()),
        (_, other) => other,
    }
}

/// Parse a finite number, keeping integers integral
fn parse_number(text: &str) -> Option<Value> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::from(int));
    }
    let float = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Number::from_f64(float).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_fenced() {
        assert_eq!(extract_fenced("```json\n{\"a\":1}\n```"), Some("{\"a\":1}\n"));
        assert_eq!(extract_fenced("Sure!\n```\n[1]\n```\nDone."), Some("[1]\n"));
        assert_eq!(extract_fenced("no fences"), None);
    }

    #[test]
    fn test_coerce_primitive() {
        assert_eq!(coerce_primitive(json!(" 30 "), PrimitiveType::Number), json!(30));
        assert_eq!(coerce_primitive(json!("2.5"), PrimitiveType::Number), json!(2.5));
        assert_eq!(coerce_primitive(json!("inf"), PrimitiveType::Number), json!("inf"));
        assert_eq!(coerce_primitive(json!("TRUE"), PrimitiveType::Boolean), json!(true));
        assert_eq!(coerce_primitive(json!("yes"), PrimitiveType::Boolean), json!("yes"));
        assert_eq!(coerce_primitive(json!(42), PrimitiveType::String), json!("42"));
        assert_eq!(coerce_primitive(json!([1]), PrimitiveType::String), json!("[1]"));
        assert_eq!(coerce_primitive(json!(null), PrimitiveType::String), json!(null));
    }

    #[test]
    fn test_options_from_json() {
        let options: DecodeOptions = serde_json::from_str(r#"{"auto_correct": false}"#).unwrap();
        assert!(!options.auto_correct);
        assert!(options.extract_fenced);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }
}
