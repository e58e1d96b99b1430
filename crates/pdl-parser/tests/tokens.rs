//! Tests for the token stream produced by the lexer

use pdl_parser::{LexError, Lexer, Span, Token};

fn kinds(source: &str) -> Vec<Token> {
    Lexer::new(source)
        .tokenize()
        .expect("lexing should succeed")
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

#[test]
fn test_all_keywords() {
    assert_eq!(
        kinds("defprompt let in case when end"),
        vec![
            Token::Defprompt,
            Token::Let,
            Token::In,
            Token::Case,
            Token::When,
            Token::End,
            Token::Eof,
        ]
    );
}

#[test]
fn test_literals() {
    assert_eq!(
        kinds(r#"42 3.5 "hi" true false null"#),
        vec![
            Token::NumberLiteral(42.0),
            Token::NumberLiteral(3.5),
            Token::StringLiteral("hi".to_string()),
            Token::True,
            Token::False,
            Token::Null,
            Token::Eof,
        ]
    );
}

#[test]
fn test_pipeline_source() {
    assert_eq!(
        kinds(r#""raw text" |> sanitize |> validate"#),
        vec![
            Token::StringLiteral("raw text".to_string()),
            Token::PipeGreater,
            Token::Identifier("sanitize".to_string()),
            Token::PipeGreater,
            Token::Identifier("validate".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_lambda_source() {
    assert_eq!(
        kinds("(x?: string) -> x"),
        vec![
            Token::LeftParen,
            Token::Identifier("x".to_string()),
            Token::Question,
            Token::Colon,
            Token::Identifier("string".to_string()),
            Token::RightParen,
            Token::Arrow,
            Token::Identifier("x".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_record_type_source() {
    assert_eq!(
        kinds("record[a: list[number], ...] & b"),
        vec![
            Token::Identifier("record".to_string()),
            Token::LeftBracket,
            Token::Identifier("a".to_string()),
            Token::Colon,
            Token::Identifier("list".to_string()),
            Token::LeftBracket,
            Token::Identifier("number".to_string()),
            Token::RightBracket,
            Token::Comma,
            Token::Ellipsis,
            Token::RightBracket,
            Token::Amp,
            Token::Identifier("b".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_empty_string_then_identifier() {
    assert_eq!(
        kinds(r#""" x"#),
        vec![
            Token::StringLiteral(String::new()),
            Token::Identifier("x".to_string()),
            Token::Eof
        ]
    );
}

#[test]
fn test_template_spans_lines() {
    let source = "\"\"\"line one\nline two\"\"\" next";
    let tokens = Lexer::new(source).tokenize().unwrap();
    assert_eq!(
        tokens[0].0,
        Token::TemplateLiteral("line one\nline two".to_string())
    );
    // `next` sits on line 2 after the closing quotes
    assert_eq!(tokens[1].1.line, 2);
    assert_eq!(tokens[1].1.column, 13);
}

#[test]
fn test_eof_repeats_forever() {
    let mut lexer = Lexer::new("x");
    lexer.next_token().unwrap();
    let eof = lexer.next_token().unwrap();
    for _ in 0..10 {
        assert_eq!(lexer.next_token().unwrap(), eof);
    }
    assert_eq!(eof.1, Span::new(1, 1, 1, 2));
}

#[test]
fn test_recognized_tokens_never_fail() {
    let source = "let a = (x: string | null) -> x |> f :: any, b = [ ] & ? => ... in a # done";
    assert!(Lexer::new(source).tokenize().is_ok());
}

#[test]
fn test_unknown_characters_fail() {
    for source in ["@", "x $ y", "a ; b", "{ }", "1 + 2"] {
        match Lexer::new(source).tokenize() {
            Err(LexError::UnexpectedCharacter { .. }) => {}
            other => panic!("Expected unexpected character for {:?}, got {:?}", source, other),
        }
    }
}

#[test]
fn test_error_display() {
    let err = Lexer::new("\n  %").tokenize().unwrap_err();
    assert_eq!(err.to_string(), "Unexpected character '%' at 2:3");
}
