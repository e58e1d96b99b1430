//! Lexer for the PDL prompt language.
//!
//! Single tokens are recognized with the logos library. Whitespace, `#` line
//! comments, string literals and triple-quoted templates are scanned by hand so
//! that the lexer owns its cursor and can be rewound by the parser.
//!
//! The lexer is pull-based: [`Lexer::next_token`] produces one token at a time
//! and keeps returning [`Token::Eof`] once the input is exhausted.

use crate::token::{Span, Token};
use logos::Logos;

/// Logos-based token enum for lexing.
///
/// This enum is used internally by logos for efficient tokenization.
/// It's converted to our main Token enum after lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    // Keywords (must come before identifiers)
    #[token("defprompt")]
    Defprompt,

    #[token("let")]
    Let,

    #[token("in")]
    In,

    #[token("case")]
    Case,

    #[token("when")]
    When,

    #[token("end")]
    End,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    // Identifiers (must come after keywords)
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    // Operators (multi-char before single-char)
    #[token("|>")]
    PipeGreater,

    #[token("->")]
    Arrow,

    #[token("=>")]
    FatArrow,

    #[token("::")]
    ColonColon,

    #[token("...")]
    Ellipsis,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("=")]
    Equal,

    #[token("|")]
    Pipe,

    #[token("&")]
    Amp,

    #[token("?")]
    Question,
}

impl From<LogosToken> for Token {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Defprompt => Token::Defprompt,
            LogosToken::Let => Token::Let,
            LogosToken::In => Token::In,
            LogosToken::Case => Token::Case,
            LogosToken::When => Token::When,
            LogosToken::End => Token::End,
            LogosToken::True => Token::True,
            LogosToken::False => Token::False,
            LogosToken::Null => Token::Null,
            LogosToken::Identifier(name) => Token::Identifier(name),
            LogosToken::Number(n) => Token::NumberLiteral(n),
            LogosToken::PipeGreater => Token::PipeGreater,
            LogosToken::Arrow => Token::Arrow,
            LogosToken::FatArrow => Token::FatArrow,
            LogosToken::ColonColon => Token::ColonColon,
            LogosToken::Ellipsis => Token::Ellipsis,
            LogosToken::LeftParen => Token::LeftParen,
            LogosToken::RightParen => Token::RightParen,
            LogosToken::LeftBracket => Token::LeftBracket,
            LogosToken::RightBracket => Token::RightBracket,
            LogosToken::Comma => Token::Comma,
            LogosToken::Colon => Token::Colon,
            LogosToken::Equal => Token::Equal,
            LogosToken::Pipe => Token::Pipe,
            LogosToken::Amp => Token::Amp,
            LogosToken::Question => Token::Question,
        }
    }
}

const TEMPLATE_QUOTE: &str = "\"\"\"";

/// Exact cursor position of a [`Lexer`], used for speculative parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerState {
    pub pos: usize,
    pub line: u32,
    pub column: u32,
}

/// Main lexer structure.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    /// Byte offset added to every reported span
    base: usize,
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedCharacter { char: char, span: Span },
    UnterminatedString { span: Span },
    UnterminatedTemplate { span: Span },
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            base: 0,
        }
    }

    /// Create a lexer for a fragment of a larger document.
    ///
    /// Spans are reported as if the fragment started at byte `offset`,
    /// `line` and `column` of the enclosing source.
    pub fn with_origin(source: &'a str, offset: usize, line: u32, column: u32) -> Self {
        Self {
            source,
            pos: 0,
            line,
            column,
            base: offset,
        }
    }

    /// The text being tokenized
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Source text covered by an absolute `span`, if it lies in this lexer's input
    pub fn slice(&self, span: Span) -> Option<&'a str> {
        let start = span.start.checked_sub(self.base)?;
        let end = span.end.checked_sub(self.base)?;
        self.source.get(start..end)
    }

    /// Capture the current cursor
    pub fn snapshot(&self) -> LexerState {
        LexerState {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// Rewind (or fast-forward) to a previously captured cursor
    pub fn restore(&mut self, state: LexerState) {
        self.pos = state.pos;
        self.line = state.line;
        self.column = state.column;
    }

    /// Drain the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let (token, span) = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push((token, span));
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Produce the next token.
    ///
    /// Whitespace and comments are skipped. At end of input every call returns
    /// `Eof` with the same span.
    pub fn next_token(&mut self) -> Result<(Token, Span), LexError> {
        self.skip_trivia();

        if self.pos >= self.source.len() {
            return Ok((Token::Eof, self.span_from(self.pos, self.line, self.column)));
        }

        let rest = &self.source[self.pos..];
        if rest.starts_with(TEMPLATE_QUOTE) {
            return self.lex_template();
        }
        if rest.starts_with('"') {
            return self.lex_string();
        }

        let start = self.pos;
        let (line, column) = (self.line, self.column);
        let mut logos_lexer = LogosToken::lexer(rest);

        match logos_lexer.next() {
            Some(Ok(logos_token)) => {
                let end = start + logos_lexer.span().end;
                self.advance_to(end);
                Ok((logos_token.into(), self.span_between(start, end, line, column)))
            }
            Some(Err(_)) | None => {
                let char = rest.chars().next().unwrap_or('\0');
                let end = start + char.len_utf8();
                self.advance_to(end);
                Err(LexError::UnexpectedCharacter {
                    char,
                    span: self.span_between(start, end, line, column),
                })
            }
        }
    }

    fn skip_trivia(&mut self) {
        let bytes = self.source.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b' ' | b'\t' | b'\r' => {
                    self.pos += 1;
                    self.column += 1;
                }
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.column = 1;
                }
                b'#' => {
                    // Line comment: skip to (but not past) the newline
                    let end = self.source[self.pos..]
                        .find('\n')
                        .map_or(self.source.len(), |offset| self.pos + offset);
                    self.advance_to(end);
                }
                _ => break,
            }
        }
    }

    /// Move the cursor to byte `end`, updating line and column.
    fn advance_to(&mut self, end: usize) {
        for c in self.source[self.pos..end].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    fn span_from(&self, start: usize, line: u32, column: u32) -> Span {
        self.span_between(start, self.pos, line, column)
    }

    fn span_between(&self, start: usize, end: usize, line: u32, column: u32) -> Span {
        Span::new(self.base + start, self.base + end, line, column)
    }

    fn lex_string(&mut self) -> Result<(Token, Span), LexError> {
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        let body_start = start + 1;
        let mut value = String::new();
        let mut chars = self.source[body_start..].char_indices();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '"' => {
                    self.advance_to(body_start + offset + 1);
                    return Ok((Token::StringLiteral(value), self.span_from(start, line, column)));
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                _ => value.push(ch),
            }
        }

        self.advance_to(self.source.len());
        Err(LexError::UnterminatedString {
            span: self.span_from(start, line, column),
        })
    }

    fn lex_template(&mut self) -> Result<(Token, Span), LexError> {
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        let body_start = start + TEMPLATE_QUOTE.len();

        match self.source[body_start..].find(TEMPLATE_QUOTE) {
            Some(offset) => {
                let body_end = body_start + offset;
                let text = self.source[body_start..body_end].to_string();
                self.advance_to(body_end + TEMPLATE_QUOTE.len());
                Ok((Token::TemplateLiteral(text), self.span_from(start, line, column)))
            }
            None => {
                self.advance_to(self.source.len());
                Err(LexError::UnterminatedTemplate {
                    span: self.span_from(start, line, column),
                })
            }
        }
    }
}

impl LexError {
    /// Get the span of this error
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedTemplate { span } => span,
        }
    }

    /// Get a description of this error
    pub fn description(&self) -> String {
        match self {
            LexError::UnexpectedCharacter { char, .. } => {
                format!("Unexpected character '{}'", char)
            }
            LexError::UnterminatedString { .. } => "Unterminated string literal".to_string(),
            LexError::UnterminatedTemplate { .. } => "Unterminated template literal".to_string(),
        }
    }

    /// Get a hint for fixing this error
    pub fn hint(&self) -> Option<String> {
        match self {
            LexError::UnterminatedString { .. } => {
                Some("Add a closing quote to terminate the string".to_string())
            }
            LexError::UnterminatedTemplate { .. } => {
                Some("Add a closing \"\"\" to terminate the template literal".to_string())
            }
            LexError::UnexpectedCharacter { char: '-' | '>', .. } => {
                Some("Did you mean '->' or '|>'?".to_string())
            }
            LexError::UnexpectedCharacter { char: '.', .. } => {
                Some("Open records are written with '...'".to_string())
            }
            LexError::UnexpectedCharacter { char: '{' | '}', .. } => {
                Some("Interpolations are only allowed inside string or template literals".to_string())
            }
            _ => None,
        }
    }

    /// Format the error with source context
    pub fn format_with_source(&self, source: &str) -> String {
        let span = self.span();
        let mut result = String::new();

        result.push_str(&format!(
            "Error at {}:{}: {}\n",
            span.line,
            span.column,
            self.description()
        ));

        if let Some(error_line) = source.lines().nth(span.line.saturating_sub(1) as usize) {
            result.push_str("  |\n");
            result.push_str(&format!("{:3} | {}\n", span.line, error_line));
            result.push_str(&format!(
                "  | {}^\n",
                " ".repeat(span.column.saturating_sub(1) as usize)
            ));
        }

        if let Some(hint) = self.hint() {
            result.push_str(&format!("\nHint: {}\n", hint));
        }

        result
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.description(),
            self.span().line,
            self.span().column
        )
    }
}

impl std::error::Error for LexError {}
