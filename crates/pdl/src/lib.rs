//! PDL - Prompt Definition Language front end
//!
//! Re-exports the building blocks (types, parser, checker, schema) and adds
//! [`Frontend`], a small driver configured from `pdl.toml`.
//!
//! ```
//! use pdl::{Frontend, FrontendConfig, Param, Type, TypeEnv};
//!
//! let frontend = Frontend::new(FrontendConfig::default());
//! let env = TypeEnv::new().with(
//!     "summarize",
//!     Type::function(vec![Param::new("text", Type::string())], Type::string()),
//! );
//!
//! let program = frontend.check(r#""long article" |> summarize"#, env).unwrap();
//! assert_eq!(program.ty, Type::string());
//! assert!(program.is_well_typed());
//! ```

pub mod config;
pub mod frontend;

pub use config::{ConfigError, FrontendConfig};
pub use frontend::{CheckedProgram, Frontend};

pub use pdl_checker::{CheckError, Diagnostic, TypeChecker, TypeEnv};
pub use pdl_parser::{parse, Expression, ParseError, ParseErrorKind, Parser, ParserConfig, Span};
pub use pdl_schema::{
    DecodeOptions, DecodeResult, FieldDef, ProjectionError, Schema, ValidationError,
    ValidationErrorKind, ValidationResult,
};
pub use pdl_types::{is_subtype, Field, Param, PrimitiveType, Type};

pub use pdl_checker as checker;
pub use pdl_parser as parser;
pub use pdl_schema as schema;
pub use pdl_types as types;
