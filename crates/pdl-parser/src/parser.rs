//! Parser for the PDL prompt language
//!
//! This module implements a recursive descent parser that pulls tokens from
//! the lexer on demand and builds an [`Expression`] tree. The only backtracking
//! is the bounded lambda-vs-group lookahead, which rewinds through an explicit
//! [`Checkpoint`].

pub mod error;
pub mod expr;
pub mod guards;
pub mod template;
pub mod types;

use crate::ast::Expression;
use crate::config::ParserConfig;
use crate::lexer::{Lexer, LexerState};
use crate::token::{Span, Token};
use guards::{DepthCounter, DepthGuard};

pub use error::{ParseError, ParseErrorKind};

/// Parser state for the PDL language.
///
/// Holds one token of lookahead; longer lookahead is done speculatively with
/// [`Parser::checkpoint`] and [`Parser::rewind`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,

    /// Current (not yet consumed) token
    current: Token,
    current_span: Span,

    /// Span of the most recently consumed token
    previous_span: Span,

    config: ParserConfig,

    /// Nesting depth of groups, lambdas and lets
    depth: DepthCounter,

    /// How many templates enclose this parser
    template_depth: usize,
}

/// Exact parser position: lexer cursor plus the buffered token.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    lexer: LexerState,
    current: Token,
    current_span: Span,
    previous_span: Span,
}

impl<'a> Parser<'a> {
    /// Create a new parser from source code.
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    /// Create a parser with custom limits.
    pub fn with_config(source: &'a str, config: ParserConfig) -> Self {
        Self::from_lexer(Lexer::new(source), config, 0)
    }

    /// Parser for an interpolation nested `template_depth` templates deep.
    pub(crate) fn from_lexer(lexer: Lexer<'a>, config: ParserConfig, template_depth: usize) -> Self {
        Self {
            lexer,
            current: Token::Eof,
            current_span: Span::default(),
            previous_span: Span::default(),
            config,
            depth: DepthCounter::default(),
            template_depth,
        }
    }

    /// Parse the whole input as a single expression.
    ///
    /// The first lexical or syntactic error aborts parsing.
    pub fn parse(mut self) -> Result<Expression, ParseError> {
        self.advance()?;
        let expr = expr::parse_expression(&mut self)?;
        if !self.at_eof() {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.current_span
    }

    /// Get the span of the last consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        self.previous_span
    }

    /// Limits in effect for this parser.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Raw source text under `span`, escapes and quotes included.
    pub fn source_slice(&self, span: Span) -> Option<&'a str> {
        self.lexer.slice(span)
    }

    pub(crate) fn template_depth(&self) -> usize {
        self.template_depth
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Result<Token, ParseError> {
        let (token, span) = self.lexer.next_token()?;
        self.previous_span = self.current_span;
        self.current_span = span;
        Ok(std::mem::replace(&mut self.current, token))
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(&self.current) == std::mem::discriminant(expected)
    }

    /// Check if we've reached EOF.
    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current, Token::Eof)
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, expected: &Token) -> Result<bool, ParseError> {
        if self.check(expected) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume the current token if it matches the expected kind.
    ///
    /// Returns the consumed token's span on match.
    pub fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if self.check(&expected) {
            self.advance()?;
            Ok(self.previous_span)
        } else {
            Err(self.unexpected(format!("'{}'", expected)))
        }
    }

    /// Consume an identifier and return its name and span.
    pub fn expect_identifier(&mut self, what: &str) -> Result<(String, Span), ParseError> {
        match &self.current {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance()?;
                Ok((name, self.previous_span))
            }
            _ => Err(self.unexpected(what)),
        }
    }

    // ========================================================================
    // Backtracking
    // ========================================================================

    /// Capture the exact parser position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            lexer: self.lexer.snapshot(),
            current: self.current.clone(),
            current_span: self.current_span,
            previous_span: self.previous_span,
        }
    }

    /// Return to a captured position.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.lexer.restore(checkpoint.lexer);
        self.current = checkpoint.current;
        self.current_span = checkpoint.current_span;
        self.previous_span = checkpoint.previous_span;
    }

    // ========================================================================
    // Error Handling and Guards
    // ========================================================================

    /// Create an error for the current token.
    pub fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::unexpected(expected, self.current.clone(), self.current_span)
    }

    /// Enter one nesting level; the returned guard leaves it on drop.
    pub fn enter(&self, name: &'static str) -> Result<DepthGuard, ParseError> {
        DepthGuard::new(&self.depth, self.config.max_nesting_depth, name, self.current_span)
    }

    // ========================================================================
    // Utilities
    // ========================================================================

    /// Span from `start` up to the end of the last consumed token.
    pub fn span_from(&self, start: Span) -> Span {
        Span::new(
            start.start,
            self.previous_span.end.max(start.end),
            start.line,
            start.column,
        )
    }
}

/// Parse a source string with the default configuration.
pub fn parse(source: &str) -> Result<Expression, ParseError> {
    Parser::new(source).parse()
}
