//! PDL parser crate - Lexer and parser for the PDL prompt language.
//!
//! This crate provides lexical analysis (tokenization) and syntactic analysis
//! (parsing) for PDL source code. A program is a single expression.
//!
//! # Example
//!
//! ```
//! use pdl_parser::{parse, Expression};
//!
//! let expr = parse(r#""raw text" |> sanitize |> validate"#).unwrap();
//! match expr {
//!     Expression::Pipeline(pipeline) => assert_eq!(pipeline.stages.len(), 3),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

pub mod ast;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod token;

// Re-exports for convenience
pub use ast::*;
pub use config::ParserConfig;
pub use lexer::{LexError, Lexer, LexerState};
pub use parser::{parse, Checkpoint, ParseError, ParseErrorKind, Parser};
pub use token::{Span, Token};
