//! Template literal parsing
//!
//! String and triple-quoted literals that contain `{{` are split into text and
//! interpolation parts. Each interpolation is parsed by a fresh [`Parser`]
//! one template level deeper, so `{{ name |> upper }}` may hold any expression.

use super::{ParseError, Parser};
use crate::ast::*;
use crate::lexer::Lexer;
use crate::token::{Span, Token};
use tracing::trace;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Raw piece of template text before interpolations are parsed.
#[derive(Debug, Clone, PartialEq)]
enum Segment<'t> {
    Text(&'t str),
    /// Interpolation source and its byte offset within the literal text
    Interpolation(&'t str, usize),
}

/// Parse the current string or template token as a literal or a template.
pub fn parse_text_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let span = parser.current_span();
    let (text, quote_len) = match parser.advance()? {
        Token::StringLiteral(text) => (text, 1),
        Token::TemplateLiteral(text) => (text, 3),
        other => return Err(ParseError::unexpected("string or template", other, span)),
    };

    if !text.contains(OPEN) {
        return Ok(Expression::Literal(LiteralExpression {
            value: LiteralValue::String(text),
            span,
        }));
    }

    // Spans are measured in the raw source, where escapes take more bytes
    let raw = parser
        .source_slice(span)
        .and_then(|quoted| quoted.get(quote_len..quoted.len().saturating_sub(quote_len)))
        .unwrap_or(text.as_str());
    let escaped = quote_len == 1;

    let parts = parse_parts(parser, &text, Source { raw, escaped }, span, quote_len)?;
    Ok(Expression::Template(TemplateExpression { parts, span }))
}

/// Literal body as written in the source.
#[derive(Debug, Clone, Copy)]
struct Source<'r> {
    raw: &'r str,
    /// Whether backslash escapes were decoded to produce the literal text
    escaped: bool,
}

impl Source<'_> {
    /// Raw byte offset of byte `offset` of the decoded text
    fn raw_offset(&self, offset: usize) -> usize {
        if !self.escaped {
            return offset;
        }

        let mut decoded = 0;
        let mut chars = self.raw.char_indices();
        while decoded < offset {
            match chars.next() {
                Some((_, '\\')) => match chars.next() {
                    Some((_, 'n' | 't' | 'r' | '\\' | '"')) => decoded += 1,
                    Some((_, other)) => decoded += 1 + other.len_utf8(),
                    None => return self.raw.len(),
                },
                Some((_, c)) => decoded += c.len_utf8(),
                None => return self.raw.len(),
            }
        }
        chars.next().map_or(self.raw.len(), |(index, _)| index)
    }
}

fn parse_parts(
    parser: &Parser,
    text: &str,
    source: Source<'_>,
    span: Span,
    quote_len: usize,
) -> Result<Vec<TemplatePart>, ParseError> {
    let depth = parser.template_depth() + 1;
    let limit = parser.config().max_template_depth;
    if depth > limit {
        return Err(ParseError::limit_exceeded("template depth", limit, span));
    }

    let mut parts = Vec::new();
    for segment in split_segments(text, span)? {
        match segment {
            Segment::Text(text) => parts.push(TemplatePart::Text(text.to_string())),
            Segment::Interpolation(inner, offset) => {
                let raw_offset = source.raw_offset(offset);
                let (line, column) = locate(source.raw, raw_offset, span, quote_len);
                trace!(depth, line, column, "parsing interpolation");
                let lexer = Lexer::with_origin(inner, span.start + quote_len + raw_offset, line, column);
                let expr = Parser::from_lexer(lexer, *parser.config(), depth).parse()?;
                parts.push(TemplatePart::Interpolation(expr));
            }
        }
    }
    Ok(parts)
}

/// Split literal text into verbatim text and `{{ ... }}` sources.
///
/// Nested `{{`/`}}` pairs are balanced; empty text segments are not produced.
fn split_segments(text: &str, span: Span) -> Result<Vec<Segment<'_>>, ParseError> {
    let mut segments = Vec::new();
    let mut text_start = 0;

    while let Some(relative) = text[text_start..].find(OPEN) {
        let open = text_start + relative;
        let inner_start = open + OPEN.len();
        let close = find_close(text, inner_start)
            .ok_or_else(|| ParseError::invalid_template("unterminated '{{'", span))?;

        if open > text_start {
            segments.push(Segment::Text(&text[text_start..open]));
        }

        let inner = &text[inner_start..close];
        if inner.trim().is_empty() {
            return Err(ParseError::invalid_template("empty interpolation", span));
        }
        segments.push(Segment::Interpolation(inner, inner_start));

        text_start = close + CLOSE.len();
    }

    if text_start < text.len() {
        segments.push(Segment::Text(&text[text_start..]));
    }

    Ok(segments)
}

/// Byte index of the `}}` that closes an interpolation opened before `from`.
fn find_close(text: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = from;
    while pos < text.len() {
        let rest = &text[pos..];
        if rest.starts_with(OPEN) {
            depth += 1;
            pos += OPEN.len();
        } else if rest.starts_with(CLOSE) {
            depth -= 1;
            if depth == 0 {
                return Some(pos);
            }
            pos += CLOSE.len();
        } else {
            pos += rest.chars().next()?.len_utf8();
        }
    }
    None
}

/// Line and column of byte `offset` of the literal text in the enclosing source.
fn locate(text: &str, offset: usize, span: Span, quote_len: usize) -> (u32, u32) {
    let mut line = span.line;
    let mut column = span.column + quote_len as u32;
    for c in text.get(..offset).unwrap_or(text).chars() {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments() {
        let segments = split_segments("Hi {{ name }}!", Span::default()).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Text("Hi "),
                Segment::Interpolation(" name ", 5),
                Segment::Text("!"),
            ]
        );
    }

    #[test]
    fn test_adjacent_interpolations_have_no_empty_text() {
        let segments = split_segments("{{a}}{{b}}", Span::default()).unwrap();
        assert_eq!(
            segments,
            vec![Segment::Interpolation("a", 2), Segment::Interpolation("b", 7)]
        );
    }

    #[test]
    fn test_nested_braces_balance() {
        let segments = split_segments("{{ f \"x {{ y }}\" }} tail", Span::default()).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], Segment::Interpolation(" f \"x {{ y }}\" ", 2));
    }

    #[test]
    fn test_unterminated_interpolation() {
        let err = split_segments("Hi {{ name", Span::default()).unwrap_err();
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_empty_interpolation() {
        let err = split_segments("Hi {{   }}", Span::default()).unwrap_err();
        assert!(err.message.contains("empty interpolation"));
    }

    #[test]
    fn test_raw_offset_skips_escapes() {
        let source = Source {
            raw: r#"a\"b {{ x }}"#,
            escaped: true,
        };
        // decoded: a"b {{ x }}
        assert_eq!(source.raw_offset(0), 0);
        assert_eq!(source.raw_offset(2), 3);
        assert_eq!(source.raw_offset(6), 7);

        let verbatim = Source {
            raw: r"a\nb",
            escaped: false,
        };
        assert_eq!(verbatim.raw_offset(3), 3);
    }

    #[test]
    fn test_locate_across_lines() {
        let span = Span::new(0, 20, 4, 10);
        assert_eq!(locate("ab{{x}}", 4, span, 3), (4, 17));
        assert_eq!(locate("a\nbc{{x}}", 6, span, 3), (5, 5));
    }
}
