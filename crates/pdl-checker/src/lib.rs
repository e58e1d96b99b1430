//! PDL Type Checker
//!
//! Infers types for parsed PDL expressions against a scoped environment of
//! host-provided bindings, collects type errors without stopping at the
//! first one, and renders parse and type errors as source diagnostics.
//!
//! ```
//! use pdl_checker::{TypeChecker, TypeEnv};
//! use pdl_parser::parse;
//! use pdl_types::{Param, Type};
//!
//! let env = TypeEnv::new().with(
//!     "upper",
//!     Type::function(vec![Param::new("s", Type::string())], Type::string()),
//! );
//! let expr = parse(r#""hi" |> upper"#).unwrap();
//!
//! let mut checker = TypeChecker::with_env(env);
//! assert_eq!(checker.check(&expr), Type::string());
//! assert!(!checker.has_errors());
//! ```

pub mod checker;
pub mod diagnostic;
pub mod env;
pub mod error;

pub use checker::TypeChecker;
pub use diagnostic::{create_files, error_code, Diagnostic, ErrorCode, JsonDiagnostic, JsonLabel};
pub use env::{Scope, ScopeId, TypeEnv};
pub use error::CheckError;
