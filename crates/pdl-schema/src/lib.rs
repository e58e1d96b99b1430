//! PDL Schema
//!
//! Declares the expected shape of structured prompt output, validates JSON
//! values against it, decodes loosely formatted model responses with
//! auto-correction, and projects the shape to a JSON Schema descriptor.
//!
//! ```
//! use pdl_schema::{FieldDef, Schema};
//! use pdl_types::Type;
//!
//! let schema = Schema::new("Person")
//!     .field(FieldDef::new("name", Type::string()))
//!     .field(FieldDef::new("age", Type::number()));
//!
//! let decoded = schema.parse(r#"{"Name": "Ada", "age": "36"}"#);
//! assert!(decoded.success);
//! assert_eq!(decoded.value.unwrap()["age"], 36);
//! ```

pub mod decode;
pub mod error;
pub mod field;
pub mod projection;
pub mod schema;
pub mod validate;

pub use decode::{extract_fenced, DecodeOptions, DecodeResult};
pub use error::{ProjectionError, ValidationError, ValidationErrorKind, ValidationResult};
pub use field::{FieldDef, Predicate};
pub use schema::Schema;
pub use validate::{json_kind, DEFAULT_MAX_DEPTH};
