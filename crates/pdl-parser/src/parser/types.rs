//! Type annotation parsing
//!
//! `|` binds looser than `&`. Bracketed forms cover lists, records, dynamic
//! constraints and prompts; parenthesized forms are function types or groups.
//! Unknown type names degrade to `any`.

use super::{ParseError, Parser};
use crate::token::Token;
use pdl_types::{Field, Param, PrimitiveType, Type};
use tracing::trace;

/// Parse a type annotation.
pub fn parse_type(parser: &mut Parser) -> Result<Type, ParseError> {
    let _guard = parser.enter("type")?;

    let mut members = vec![parse_intersection(parser)?];
    while parser.eat(&Token::Pipe)? {
        members.push(parse_intersection(parser)?);
    }

    Ok(Type::union(members))
}

fn parse_intersection(parser: &mut Parser) -> Result<Type, ParseError> {
    let mut members = vec![parse_atom(parser)?];
    while parser.eat(&Token::Amp)? {
        members.push(parse_atom(parser)?);
    }

    Ok(Type::intersection(members))
}

fn parse_atom(parser: &mut Parser) -> Result<Type, ParseError> {
    match parser.current() {
        Token::Null => {
            parser.advance()?;
            Ok(Type::null())
        }
        Token::Identifier(_) => {
            let (name, _) = parser.expect_identifier("type name")?;
            parse_named_type(parser, &name)
        }
        Token::LeftParen => parse_parenthesized_type(parser),
        _ => Err(parser.unexpected("type")),
    }
}

fn parse_named_type(parser: &mut Parser, name: &str) -> Result<Type, ParseError> {
    let bracketed = parser.check(&Token::LeftBracket);
    match name {
        "list" if bracketed => parse_list_type(parser),
        "record" if bracketed => parse_record_type(parser),
        "dynamic" if bracketed => parse_dynamic_type(parser),
        "prompt" if bracketed => parse_prompt_type(parser),
        "list" => Ok(Type::list(Type::Any)),
        "record" => Ok(Type::open_record(Vec::new())),
        "dynamic" => Ok(Type::dynamic()),
        "prompt" => Ok(Type::prompt(Type::Any, Type::Any, None, None)),
        "any" => Ok(Type::Any),
        "never" => Ok(Type::Never),
        other => Ok(PrimitiveType::from_name(other).map(Type::from).unwrap_or_else(|| {
            trace!(name = other, "unknown type name treated as any");
            Type::Any
        })),
    }
}

/// `list[T]`, `list[T, min]` or `list[T, min, max]`
fn parse_list_type(parser: &mut Parser) -> Result<Type, ParseError> {
    parser.expect(Token::LeftBracket)?;
    let element = parse_type(parser)?;

    let mut min_length = None;
    let mut max_length = None;
    if parser.eat(&Token::Comma)? {
        min_length = Some(parse_length(parser)?);
        if parser.eat(&Token::Comma)? {
            max_length = Some(parse_length(parser)?);
        }
    }

    parser.expect(Token::RightBracket)?;
    Ok(Type::bounded_list(element, min_length, max_length))
}

fn parse_length(parser: &mut Parser) -> Result<usize, ParseError> {
    match parser.current() {
        Token::NumberLiteral(n) if n.fract() == 0.0 && *n >= 0.0 => {
            let length = *n as usize;
            parser.advance()?;
            Ok(length)
        }
        _ => Err(parser.unexpected("non-negative integer length")),
    }
}

/// `record[name: T, age?: U, ...]`
fn parse_record_type(parser: &mut Parser) -> Result<Type, ParseError> {
    parser.expect(Token::LeftBracket)?;

    let mut fields = Vec::new();
    let mut open = false;
    if !parser.check(&Token::RightBracket) {
        loop {
            if parser.eat(&Token::Ellipsis)? {
                open = true;
                break;
            }

            let name = parse_label(parser, "field name")?;
            let optional = parser.eat(&Token::Question)?;
            parser.expect(Token::Colon)?;
            let ty = parse_type(parser)?;
            fields.push(Field { name, ty, optional });

            if !parser.eat(&Token::Comma)? {
                break;
            }
        }
    }

    parser.expect(Token::RightBracket)?;
    Ok(if open {
        Type::open_record(fields)
    } else {
        Type::record(fields)
    })
}

/// `dynamic[constraint]`
fn parse_dynamic_type(parser: &mut Parser) -> Result<Type, ParseError> {
    parser.expect(Token::LeftBracket)?;
    let constraint = parse_label(parser, "constraint name")?;
    parser.expect(Token::RightBracket)?;
    Ok(Type::dynamic_with(constraint))
}

/// `prompt[input, output, model?, temperature?]`
fn parse_prompt_type(parser: &mut Parser) -> Result<Type, ParseError> {
    parser.expect(Token::LeftBracket)?;
    let input = parse_type(parser)?;
    parser.expect(Token::Comma)?;
    let output = parse_type(parser)?;

    let mut model = None;
    let mut temperature = None;
    if parser.eat(&Token::Comma)? {
        model = Some(parse_label(parser, "model name")?);
        if parser.eat(&Token::Comma)? {
            match parser.current() {
                Token::NumberLiteral(n) => {
                    temperature = Some(*n);
                    parser.advance()?;
                }
                _ => return Err(parser.unexpected("temperature")),
            }
        }
    }

    parser.expect(Token::RightBracket)?;
    Ok(Type::prompt(input, output, model, temperature))
}

/// An identifier or a string literal used as a name.
fn parse_label(parser: &mut Parser, what: &str) -> Result<String, ParseError> {
    match parser.current() {
        Token::Identifier(_) | Token::StringLiteral(_) => match parser.advance()? {
            Token::Identifier(label) | Token::StringLiteral(label) => Ok(label),
            _ => Err(parser.unexpected(what)),
        },
        _ => Err(parser.unexpected(what)),
    }
}

/// `(x: T, U) -> R` or a grouped `(T)`
fn parse_parenthesized_type(parser: &mut Parser) -> Result<Type, ParseError> {
    parser.expect(Token::LeftParen)?;

    let mut params = Vec::new();
    if !parser.check(&Token::RightParen) {
        loop {
            params.push(parse_function_param(parser)?);
            if !parser.eat(&Token::Comma)? {
                break;
            }
        }
    }
    parser.expect(Token::RightParen)?;

    if parser.eat(&Token::Arrow)? {
        let return_type = parse_type(parser)?;
        return Ok(Type::function(params, return_type));
    }

    match params.pop() {
        Some(param) if params.is_empty() && param.name.is_empty() => Ok(param.ty),
        _ => Err(parser.unexpected("'->'")),
    }
}

/// `name: T`, `name?: T` or an anonymous `T`
fn parse_function_param(parser: &mut Parser) -> Result<Param, ParseError> {
    if let Token::Identifier(_) = parser.current() {
        let checkpoint = parser.checkpoint();
        let (name, _) = parser.expect_identifier("parameter name")?;
        if parser.check(&Token::Question) || parser.check(&Token::Colon) {
            let optional = parser.eat(&Token::Question)?;
            parser.expect(Token::Colon)?;
            let ty = parse_type(parser)?;
            return Ok(Param { name, ty, optional });
        }
        parser.rewind(checkpoint);
    }

    Ok(Param::new("", parse_type(parser)?))
}
