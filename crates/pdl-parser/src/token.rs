//! Token definitions for the PDL prompt language.
//!
//! This module defines all tokens that can appear in PDL source code,
//! including keywords, operators, literals, and special tokens.

use std::fmt;

/// A token in the PDL language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Defprompt,
    Let,
    In,
    Case,
    When,
    End,

    // Literals
    NumberLiteral(f64),
    StringLiteral(String),
    /// Triple-quoted text, kept verbatim including `{{ ... }}` markers
    TemplateLiteral(String),
    True,
    False,
    Null,

    // Identifiers
    Identifier(String),

    // Multi-character operators
    PipeGreater, // |>
    Arrow,       // ->
    FatArrow,    // =>
    ColonColon,  // ::
    Ellipsis,    // ...

    // Punctuation
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    Equal,
    Pipe,
    Amp,
    Question,

    // Special
    Eof,
}

/// Source location information for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Defprompt => write!(f, "defprompt"),
            Token::Let => write!(f, "let"),
            Token::In => write!(f, "in"),
            Token::Case => write!(f, "case"),
            Token::When => write!(f, "when"),
            Token::End => write!(f, "end"),
            Token::NumberLiteral(n) => write!(f, "{}", n),
            Token::StringLiteral(s) => write!(f, "\"{}\"", s),
            Token::TemplateLiteral(_) => write!(f, "template literal"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::PipeGreater => write!(f, "|>"),
            Token::Arrow => write!(f, "->"),
            Token::FatArrow => write!(f, "=>"),
            Token::ColonColon => write!(f, "::"),
            Token::Ellipsis => write!(f, "..."),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Equal => write!(f, "="),
            Token::Pipe => write!(f, "|"),
            Token::Amp => write!(f, "&"),
            Token::Question => write!(f, "?"),
            Token::Eof => write!(f, "end of file"),
        }
    }
}

impl Token {

    /// Returns true for keywords that no grammar production accepts yet.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Token::Defprompt | Token::Case | Token::When | Token::End)
    }

    /// Returns true if this token can begin an application argument.
    pub fn starts_argument(&self) -> bool {
        matches!(
            self,
            Token::NumberLiteral(_)
                | Token::StringLiteral(_)
                | Token::TemplateLiteral(_)
                | Token::True
                | Token::False
                | Token::Null
                | Token::Identifier(_)
                | Token::LeftParen
        )
    }
}
