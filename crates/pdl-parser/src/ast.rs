//! Abstract Syntax Tree (AST) for the PDL prompt language.
//!
//! A PDL program is a single expression. Every AST node includes a `Span`
//! for precise source location tracking; type annotations are stored directly
//! as [`pdl_types::Type`] values.

pub mod expression;

pub use expression::*;
