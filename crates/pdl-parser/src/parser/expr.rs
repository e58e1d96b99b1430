//! Expression parsing
//!
//! Precedence, tightest to loosest: primary, application (juxtaposition),
//! pipeline (`|>`), then an optional trailing `:: type` annotation.

use super::{template, types, ParseError, Parser};
use crate::ast::*;
use crate::token::Token;
use tracing::trace;

/// Parse an expression.
pub fn parse_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start = parser.current_span();
    let expr = parse_pipeline(parser)?;

    if parser.eat(&Token::ColonColon)? {
        let ty = types::parse_type(parser)?;
        return Ok(Expression::TypeAnnotation(AnnotatedExpression {
            expression: Box::new(expr),
            ty,
            span: parser.span_from(start),
        }));
    }

    Ok(expr)
}

/// Parse `application ("|>" application)*` into one flat pipeline node.
fn parse_pipeline(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start = parser.current_span();
    let first = parse_application(parser)?;

    if !parser.check(&Token::PipeGreater) {
        return Ok(first);
    }

    let mut stages = vec![first];
    while parser.eat(&Token::PipeGreater)? {
        stages.push(parse_application(parser)?);
    }

    Ok(Expression::Pipeline(PipelineExpression {
        stages,
        span: parser.span_from(start),
    }))
}

/// Parse a primary followed by any number of argument primaries.
fn parse_application(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start = parser.current_span();
    let callee = parse_primary(parser)?;

    let mut arguments = Vec::new();
    while parser.current().starts_argument() {
        arguments.push(parse_primary(parser)?);
    }

    if arguments.is_empty() {
        return Ok(callee);
    }

    Ok(Expression::Application(ApplicationExpression {
        callee: Box::new(callee),
        arguments,
        span: parser.span_from(start),
    }))
}

/// Parse a primary expression (literal, identifier, template, group, lambda or let).
pub fn parse_primary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start = parser.current_span();

    let value = match parser.current() {
        Token::NumberLiteral(n) => LiteralValue::Number(*n),
        Token::True => LiteralValue::Boolean(true),
        Token::False => LiteralValue::Boolean(false),
        Token::Null => LiteralValue::Null,
        Token::StringLiteral(_) | Token::TemplateLiteral(_) => {
            return template::parse_text_literal(parser);
        }
        Token::Identifier(_) => {
            let (name, span) = parser.expect_identifier("identifier")?;
            return Ok(Expression::Identifier(Identifier { name, span }));
        }
        Token::LeftParen => return parse_parenthesized(parser),
        Token::Let => return parse_let(parser),
        _ => return Err(parser.unexpected("expression")),
    };

    parser.advance()?;
    Ok(Expression::Literal(LiteralExpression { value, span: start }))
}

/// Parse either a lambda or a grouped expression starting at `(`.
fn parse_parenthesized(parser: &mut Parser) -> Result<Expression, ParseError> {
    if is_lambda_ahead(parser) {
        return parse_lambda(parser);
    }

    let _guard = parser.enter("group")?;
    parser.expect(Token::LeftParen)?;
    let inner = parse_expression(parser)?;
    parser.expect(Token::RightParen)?;
    Ok(inner)
}

/// Speculatively scan to the `)` matching the current `(` and report whether
/// it is followed by `->` or `:`. The parser position is always restored.
fn is_lambda_ahead(parser: &mut Parser) -> bool {
    let checkpoint = parser.checkpoint();
    let start = parser.current_span();
    let result = scan_lambda_head(parser).unwrap_or(false);
    parser.rewind(checkpoint);
    trace!(line = start.line, column = start.column, lambda = result, "lambda lookahead");
    result
}

fn scan_lambda_head(parser: &mut Parser) -> Result<bool, ParseError> {
    let mut depth = 0usize;
    loop {
        match parser.current() {
            Token::LeftParen | Token::LeftBracket => depth += 1,
            Token::RightParen | Token::RightBracket => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    parser.advance()?;
                    return Ok(matches!(parser.current(), Token::Arrow | Token::Colon));
                }
            }
            Token::Eof => return Ok(false),
            _ => {}
        }
        parser.advance()?;
    }
}

/// Parse `(params) (: type)? -> body`.
fn parse_lambda(parser: &mut Parser) -> Result<Expression, ParseError> {
    let _guard = parser.enter("lambda")?;
    let start = parser.expect(Token::LeftParen)?;

    let mut params = Vec::new();
    if !parser.check(&Token::RightParen) {
        loop {
            params.push(parse_parameter(parser)?);
            if !parser.eat(&Token::Comma)? {
                break;
            }
        }
    }
    parser.expect(Token::RightParen)?;

    let return_type = if parser.eat(&Token::Colon)? {
        Some(types::parse_type(parser)?)
    } else {
        None
    };

    parser.expect(Token::Arrow)?;
    let body = parse_expression(parser)?;

    Ok(Expression::Lambda(LambdaExpression {
        params,
        return_type,
        body: Box::new(body),
        span: parser.span_from(start),
    }))
}

fn parse_parameter(parser: &mut Parser) -> Result<Parameter, ParseError> {
    let (name, start) = parser.expect_identifier("parameter name")?;
    let optional = parser.eat(&Token::Question)?;
    let ty = if parser.eat(&Token::Colon)? {
        Some(types::parse_type(parser)?)
    } else {
        None
    };

    Ok(Parameter {
        name,
        ty,
        optional,
        span: parser.span_from(start),
    })
}

/// Parse `let binding ("," binding)* in body`.
fn parse_let(parser: &mut Parser) -> Result<Expression, ParseError> {
    let _guard = parser.enter("let")?;
    let start = parser.expect(Token::Let)?;

    let mut bindings = Vec::new();
    loop {
        bindings.push(parse_binding(parser)?);
        if !parser.eat(&Token::Comma)? {
            break;
        }
    }

    parser.expect(Token::In)?;
    let body = parse_expression(parser)?;

    Ok(Expression::Let(LetExpression {
        bindings,
        body: Box::new(body),
        span: parser.span_from(start),
    }))
}

fn parse_binding(parser: &mut Parser) -> Result<LetBinding, ParseError> {
    let (name, start) = parser.expect_identifier("binding name")?;
    let ty = if parser.eat(&Token::Colon)? {
        Some(types::parse_type(parser)?)
    } else {
        None
    };
    parser.expect(Token::Equal)?;
    let value = parse_expression(parser)?;

    Ok(LetBinding {
        name,
        ty,
        value,
        span: parser.span_from(start),
    })
}
