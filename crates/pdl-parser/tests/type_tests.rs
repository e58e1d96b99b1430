//! Tests for type annotation parsing in parameter, binding and annotation positions

use pdl_parser::ast::*;
use pdl_parser::{parse, ParseErrorKind};
use pdl_types::{Field, Param, Type};

/// Parse `x :: <ty>` and return the annotated type
fn annotation(ty: &str) -> Type {
    match parse(&format!("x :: {}", ty)).unwrap() {
        Expression::TypeAnnotation(annotated) => annotated.ty,
        other => panic!("Expected annotation, got {:?}", other),
    }
}

#[test]
fn test_record_types() {
    assert_eq!(
        annotation("record[name: string, age?: number]"),
        Type::record(vec![
            Field::new("name", Type::string()),
            Field::optional("age", Type::number()),
        ])
    );
    assert_eq!(
        annotation("record[id: number, ...]"),
        Type::open_record(vec![Field::new("id", Type::number())])
    );
    assert_eq!(annotation("record[...]"), Type::open_record(vec![]));
    assert_eq!(annotation("record[]"), Type::record(vec![]));
}

#[test]
fn test_quoted_field_names() {
    assert_eq!(
        annotation(r#"record["first name": string]"#),
        Type::record(vec![Field::new("first name", Type::string())])
    );
}

#[test]
fn test_dynamic_constraint() {
    assert_eq!(annotation("dynamic[email]"), Type::dynamic_with("email"));
    assert_eq!(annotation(r#"dynamic["iso-date"]"#), Type::dynamic_with("iso-date"));
    assert_eq!(annotation("dynamic"), Type::dynamic());
}

#[test]
fn test_nested_function_types() {
    let expected = Type::function(
        vec![Param::new(
            "f",
            Type::function(vec![Param::new("", Type::string())], Type::string()),
        )],
        Type::list(Type::string()),
    );
    assert_eq!(annotation("(f: (string) -> string) -> list[string]"), expected);
}

#[test]
fn test_optional_function_param() {
    assert_eq!(
        annotation("(text: string, limit?: number) -> string"),
        Type::function(
            vec![
                Param::new("text", Type::string()),
                Param::optional("limit", Type::number()),
            ],
            Type::string()
        )
    );
}

#[test]
fn test_prompt_type_forms() {
    assert_eq!(
        annotation("prompt[string, record[answer: string]]"),
        Type::prompt(
            Type::string(),
            Type::record(vec![Field::new("answer", Type::string())]),
            None,
            None
        )
    );
    assert_eq!(
        annotation("prompt[any, string, claude]"),
        Type::prompt(Type::Any, Type::string(), Some("claude".to_string()), None)
    );
}

#[test]
fn test_union_normalization_in_annotations() {
    assert_eq!(annotation("string | never"), Type::string());
    assert_eq!(
        annotation("string | (number | string)"),
        Type::union([Type::string(), Type::number()])
    );
}

#[test]
fn test_parameter_and_binding_annotations() {
    match parse("let f: (s: string) -> string = (s: string) -> s in f").unwrap() {
        Expression::Let(let_expr) => {
            let binding = &let_expr.bindings[0];
            assert!(matches!(binding.ty, Some(Type::Function(_))));
            match &binding.value {
                Expression::Lambda(lambda) => {
                    assert_eq!(lambda.params[0].ty, Some(Type::string()))
                }
                other => panic!("Expected lambda, got {:?}", other),
            }
        }
        other => panic!("Expected let, got {:?}", other),
    }
}

#[test]
fn test_malformed_types() {
    for source in ["x :: list[", "x :: record[a string]", "x :: prompt[string]", "x :: |"] {
        let err = parse(source).unwrap_err();
        assert!(
            matches!(
                err.kind,
                ParseErrorKind::UnexpectedToken { .. } | ParseErrorKind::UnexpectedEof { .. }
            ),
            "{}: {:?}",
            source,
            err
        );
    }
}
