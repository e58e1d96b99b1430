//! Error types for type checking
//!
//! Type errors never abort checking. They are collected in source order and
//! handed back to the caller once the whole expression has been visited.

use pdl_parser::Span;
use pdl_types::Type;
use thiserror::Error;

/// Errors that can occur during type checking
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckError {
    /// Identifier not bound in any enclosing scope
    #[error("Undefined identifier '{name}'")]
    UndefinedIdentifier {
        /// Identifier name
        name: String,
        /// Location of the reference
        span: Span,
    },

    /// Application of a value that is not a function
    #[error("Type '{ty}' is not callable")]
    NotCallable {
        /// Type of the callee
        ty: Type,
        /// Location of the callee
        span: Span,
    },

    /// Fewer arguments than required parameters
    #[error("Expected at least {expected} argument(s), got {actual}")]
    TooFewArguments {
        /// Number of required parameters
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
        /// Location of the application
        span: Span,
    },

    /// More arguments than declared parameters
    #[error("Expected at most {expected} argument(s), got {actual}")]
    TooManyArguments {
        /// Total number of parameters
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
        /// Location of the application
        span: Span,
    },

    /// Argument not assignable to its parameter
    #[error("Argument {} ('{param}'): expected {expected}, got {actual}", index + 1)]
    ArgumentMismatch {
        /// Zero-based argument position
        index: usize,
        /// Parameter name (may be empty for unnamed function type params)
        param: String,
        /// Parameter type
        expected: Type,
        /// Argument type
        actual: Type,
        /// Location of the argument
        span: Span,
    },

    /// Pipeline stage that cannot accept the flowing value
    #[error("Pipeline stage of type '{ty}' is not a function taking at least one parameter")]
    InvalidPipelineStage {
        /// Type of the stage
        ty: Type,
        /// Location of the stage
        span: Span,
    },

    /// Value flowing into a stage does not match its first parameter
    #[error("Pipeline stage expects {expected}, got {actual}")]
    PipelineStageMismatch {
        /// Type of the stage's first parameter
        expected: Type,
        /// Type of the value flowing in
        actual: Type,
        /// Location of the stage
        span: Span,
    },

    /// Expression does not satisfy its `::` annotation
    #[error("Expression of type {actual} does not satisfy annotation {expected}")]
    AnnotationMismatch {
        /// Annotated type
        expected: Type,
        /// Inferred type
        actual: Type,
        /// Location of the annotated expression
        span: Span,
    },

    /// Let binding value does not match its declared type
    #[error("Binding '{name}': expected {expected}, got {actual}")]
    BindingMismatch {
        /// Binding name
        name: String,
        /// Declared type
        expected: Type,
        /// Inferred type of the value
        actual: Type,
        /// Location of the binding
        span: Span,
    },

    /// Lambda body does not match the declared return type
    #[error("Return type mismatch: expected {expected}, got {actual}")]
    ReturnTypeMismatch {
        /// Declared return type
        expected: Type,
        /// Inferred body type
        actual: Type,
        /// Location of the lambda body
        span: Span,
    },
}

impl CheckError {
    /// Get the source location of this error
    pub fn span(&self) -> &Span {
        match self {
            CheckError::UndefinedIdentifier { span, .. } => span,
            CheckError::NotCallable { span, .. } => span,
            CheckError::TooFewArguments { span, .. } => span,
            CheckError::TooManyArguments { span, .. } => span,
            CheckError::ArgumentMismatch { span, .. } => span,
            CheckError::InvalidPipelineStage { span, .. } => span,
            CheckError::PipelineStageMismatch { span, .. } => span,
            CheckError::AnnotationMismatch { span, .. } => span,
            CheckError::BindingMismatch { span, .. } => span,
            CheckError::ReturnTypeMismatch { span, .. } => span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let span = Span::new(0, 3, 1, 1);
        let err = CheckError::UndefinedIdentifier {
            name: "foo".to_string(),
            span,
        };
        assert_eq!(err.to_string(), "Undefined identifier 'foo'");

        let err = CheckError::ArgumentMismatch {
            index: 0,
            param: "text".to_string(),
            expected: Type::string(),
            actual: Type::number(),
            span,
        };
        assert_eq!(err.to_string(), "Argument 1 ('text'): expected string, got number");
        assert_eq!(*err.span(), span);
    }
}
