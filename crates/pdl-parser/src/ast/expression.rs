//! Expression AST nodes
//!
//! This module defines all expression types in the PDL language:
//! - Literals (strings, numbers, booleans, null) and identifiers
//! - Lambdas and juxtaposition application
//! - `let ... in` bindings
//! - Templates with `{{ ... }}` interpolation
//! - Pipelines (`a |> f |> g`) and type annotations (`e :: T`)

use crate::token::Span;
use pdl_types::Type;

/// Expression (produces a value)
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal: "text", 42, true, null
    Literal(LiteralExpression),

    /// Identifier
    Identifier(Identifier),

    /// Lambda: (x: string, n?: number) -> body
    Lambda(LambdaExpression),

    /// Application by juxtaposition: f a b
    Application(ApplicationExpression),

    /// Let expression: let a = 1, b = 2 in body
    Let(LetExpression),

    /// Template: "Hello {{ name }}"
    Template(TemplateExpression),

    /// Pipeline: a |> f |> g
    Pipeline(PipelineExpression),

    /// Type annotation: expr :: type
    TypeAnnotation(AnnotatedExpression),
}

impl Expression {
    /// Get the span of this expression
    pub fn span(&self) -> &Span {
        match self {
            Expression::Literal(e) => &e.span,
            Expression::Identifier(e) => &e.span,
            Expression::Lambda(e) => &e.span,
            Expression::Application(e) => &e.span,
            Expression::Let(e) => &e.span,
            Expression::Template(e) => &e.span,
            Expression::Pipeline(e) => &e.span,
            Expression::TypeAnnotation(e) => &e.span,
        }
    }

    /// Short name of the node kind, used in traces and diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "literal",
            Expression::Identifier(_) => "identifier",
            Expression::Lambda(_) => "lambda",
            Expression::Application(_) => "application",
            Expression::Let(_) => "let",
            Expression::Template(_) => "template",
            Expression::Pipeline(_) => "pipeline",
            Expression::TypeAnnotation(_) => "type annotation",
        }
    }
}

/// Literal value
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

impl LiteralValue {
    /// The primitive type of this value
    pub fn ty(&self) -> Type {
        match self {
            LiteralValue::String(_) => Type::string(),
            LiteralValue::Number(_) => Type::number(),
            LiteralValue::Boolean(_) => Type::boolean(),
            LiteralValue::Null => Type::null(),
        }
    }
}

/// Literal expression
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpression {
    pub value: LiteralValue,
    pub span: Span,
}

/// Identifier reference
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// Lambda parameter: `name`, `name: T`, `name?: T`
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// Declared type; unannotated parameters are checked as `dynamic`
    pub ty: Option<Type>,
    pub optional: bool,
    pub span: Span,
}

/// Lambda expression
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpression {
    pub params: Vec<Parameter>,
    pub return_type: Option<Type>,
    pub body: Box<Expression>,
    pub span: Span,
}

/// Application: callee followed by one or more arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

/// A single `name (: T)? = value` binding
#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub name: String,
    pub ty: Option<Type>,
    pub value: Expression,
    pub span: Span,
}

/// Let expression
#[derive(Debug, Clone, PartialEq)]
pub struct LetExpression {
    pub bindings: Vec<LetBinding>,
    pub body: Box<Expression>,
    pub span: Span,
}

/// Part of a template: verbatim text or an interpolated expression
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Interpolation(Expression),
}

/// Template expression
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateExpression {
    pub parts: Vec<TemplatePart>,
    pub span: Span,
}

impl TemplateExpression {
    /// Iterate over the interpolated expressions in order
    pub fn interpolations(&self) -> impl Iterator<Item = &Expression> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Interpolation(expr) => Some(expr),
            TemplatePart::Text(_) => None,
        })
    }
}

/// Pipeline with at least two stages, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineExpression {
    pub stages: Vec<Expression>,
    pub span: Span,
}

/// Expression with a declared type
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedExpression {
    pub expression: Box<Expression>,
    pub ty: Type,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_accessor() {
        let span = Span::new(0, 5, 1, 1);
        let expr = Expression::Literal(LiteralExpression {
            value: LiteralValue::Number(1.0),
            span,
        });
        assert_eq!(expr.span(), &span);
        assert_eq!(expr.kind_name(), "literal");
    }

    #[test]
    fn test_template_interpolations() {
        let span = Span::default();
        let template = TemplateExpression {
            parts: vec![
                TemplatePart::Text("Hi ".to_string()),
                TemplatePart::Interpolation(Expression::Identifier(Identifier {
                    name: "name".to_string(),
                    span,
                })),
            ],
            span,
        };
        let names: Vec<_> = template
            .interpolations()
            .filter_map(|expr| match expr {
                Expression::Identifier(id) => Some(id.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["name"]);
    }

    #[test]
    fn test_literal_types() {
        assert_eq!(LiteralValue::String("a".into()).ty(), Type::string());
        assert_eq!(LiteralValue::Null.ty(), Type::null());
    }
}
