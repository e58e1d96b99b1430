//! Parse error types and error reporting

use crate::lexer::LexError;
use crate::token::{Span, Token};
use std::fmt;

/// A parse error with location and contextual information.
///
/// Parsing stops at the first error; no partial tree is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Source location of the error
    pub span: Span,

    /// Human-readable error message
    pub message: String,

    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token found
    UnexpectedToken { expected: String, found: Token },

    /// Unexpected end of input
    UnexpectedEof { expected: String },

    /// Malformed `{{ ... }}` interpolation
    InvalidTemplate { reason: String },

    /// Nesting or template depth limit exceeded
    LimitExceeded { limit: usize },

    /// The lexer rejected the input
    Lex(LexError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at {}:{}: {}",
            self.span.line, self.span.column, self.message
        )?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Lex(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        let span = *err.span();
        let message = err.description();
        let suggestion = err.hint();
        Self {
            kind: ParseErrorKind::Lex(err),
            span,
            message,
            suggestion,
        }
    }
}

impl ParseError {
    /// Create an "unexpected token" error, or an "unexpected EOF" error when
    /// `found` is the end of input.
    pub fn unexpected(expected: impl Into<String>, found: Token, span: Span) -> Self {
        let expected = expected.into();
        if found == Token::Eof {
            return Self::unexpected_eof(expected, span);
        }

        let suggestion = if found.is_reserved() {
            Some(format!("'{}' is a reserved keyword", found))
        } else {
            None
        };

        Self {
            message: format!("Expected {}, found '{}'", expected, found),
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
            suggestion,
        }
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        let expected = expected.into();
        Self {
            message: format!("Unexpected end of file, expected {}", expected),
            kind: ParseErrorKind::UnexpectedEof { expected },
            span,
            suggestion: None,
        }
    }

    /// Create an "invalid template" error.
    pub fn invalid_template(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        Self {
            message: format!("Invalid template: {}", reason),
            kind: ParseErrorKind::InvalidTemplate { reason },
            span,
            suggestion: None,
        }
    }

    /// Create a "limit exceeded" error.
    pub fn limit_exceeded(what: &str, limit: usize, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::LimitExceeded { limit },
            span,
            message: format!("Maximum {} ({}) exceeded", what, limit),
            suggestion: None,
        }
    }

    /// Add a suggestion to this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Line of the offending token
    pub fn line(&self) -> u32 {
        self.span.line
    }

    /// Column of the offending token
    pub fn column(&self) -> u32 {
        self.span.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let err = ParseError::unexpected("')'", Token::In, Span::new(5, 7, 2, 3));
        assert_eq!(err.to_string(), "Parse error at 2:3: Expected ')', found 'in'");
    }

    #[test]
    fn test_eof_becomes_unexpected_eof() {
        let err = ParseError::unexpected("expression", Token::Eof, Span::default());
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn test_reserved_keyword_suggestion() {
        let err = ParseError::unexpected("expression", Token::Case, Span::default());
        assert!(err.suggestion.unwrap().contains("reserved"));
    }

    #[test]
    fn test_from_lex_error() {
        let lex = LexError::UnterminatedString {
            span: Span::new(0, 3, 1, 1),
        };
        let err = ParseError::from(lex.clone());
        assert_eq!(err.kind, ParseErrorKind::Lex(lex));
        assert_eq!(err.line(), 1);
        assert!(err.suggestion.is_some());
    }
}
