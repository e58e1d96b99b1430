//! Type checker - infers a type for an expression and records type errors
//!
//! Checking is error tolerant. Every rule returns a best-effort type even
//! when it records an error, so one pass surfaces as many problems as
//! possible and a single fault does not poison inference downstream.

use pdl_parser::ast::*;
use pdl_types::{FunctionType, Param, SubtypingContext, Type};
use tracing::debug;

use crate::env::{ScopeId, TypeEnv};
use crate::error::CheckError;

/// Type checker for PDL expressions
#[derive(Debug, Default)]
pub struct TypeChecker {
    env: TypeEnv,
    errors: Vec<CheckError>,
    subtyping: SubtypingContext,
}

impl TypeChecker {
    /// Create a checker with an empty global environment
    pub fn new() -> Self {
        Self::with_env(TypeEnv::new())
    }

    /// Create a checker over a caller-provided environment
    pub fn with_env(env: TypeEnv) -> Self {
        TypeChecker {
            env,
            errors: Vec::new(),
            subtyping: SubtypingContext::new(),
        }
    }

    /// The environment, including every scope allocated so far
    pub fn env(&self) -> &TypeEnv {
        &self.env
    }

    /// Infer the type of `expr` in the global scope
    ///
    /// Errors are appended to the checker's log; calling `check` again keeps
    /// the errors of earlier calls.
    pub fn check(&mut self, expr: &Expression) -> Type {
        let before = self.errors.len();
        let ty = self.check_expr(expr, TypeEnv::GLOBAL);
        debug!(
            kind = expr.kind_name(),
            ty = %ty,
            errors = self.errors.len() - before,
            "checked expression"
        );
        ty
    }

    /// Errors recorded so far, in the order they were found
    pub fn errors(&self) -> &[CheckError] {
        &self.errors
    }

    /// Whether any error has been recorded
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume the checker and return its errors
    pub fn into_errors(self) -> Vec<CheckError> {
        self.errors
    }

    fn is_subtype(&mut self, sub: &Type, sup: &Type) -> bool {
        self.subtyping.is_subtype(sub, sup)
    }

    fn check_expr(&mut self, expr: &Expression, scope: ScopeId) -> Type {
        match expr {
            Expression::Literal(lit) => lit.value.ty(),
            Expression::Identifier(ident) => self.check_identifier(ident, scope),
            Expression::Lambda(lambda) => self.check_lambda(lambda, scope),
            Expression::Application(app) => self.check_application(app, scope),
            Expression::Let(let_expr) => self.check_let(let_expr, scope),
            Expression::Template(template) => {
                for interpolation in template.interpolations() {
                    self.check_expr(interpolation, scope);
                }
                Type::string()
            }
            Expression::Pipeline(pipeline) => self.check_pipeline(pipeline, scope),
            Expression::TypeAnnotation(annotated) => self.check_annotation(annotated, scope),
        }
    }

    fn check_identifier(&mut self, ident: &Identifier, scope: ScopeId) -> Type {
        match self.env.lookup(scope, &ident.name) {
            Some(ty) => ty.clone(),
            None => {
                self.errors.push(CheckError::UndefinedIdentifier {
                    name: ident.name.clone(),
                    span: ident.span,
                });
                Type::any()
            }
        }
    }

    fn check_lambda(&mut self, lambda: &LambdaExpression, scope: ScopeId) -> Type {
        let body_scope = self.env.push_scope(scope);

        let params: Vec<Param> = lambda
            .params
            .iter()
            .map(|param| {
                let ty = param.ty.clone().unwrap_or_else(Type::dynamic);
                self.env.define(body_scope, param.name.clone(), ty.clone());
                Param {
                    name: param.name.clone(),
                    ty,
                    optional: param.optional,
                }
            })
            .collect();

        let body_ty = self.check_expr(&lambda.body, body_scope);

        let return_type = match &lambda.return_type {
            Some(declared) => {
                if !self.is_subtype(&body_ty, declared) {
                    self.errors.push(CheckError::ReturnTypeMismatch {
                        expected: declared.clone(),
                        actual: body_ty,
                        span: *lambda.body.span(),
                    });
                }
                declared.clone()
            }
            None => body_ty,
        };

        Type::function(params, return_type)
    }

    fn check_application(&mut self, app: &ApplicationExpression, scope: ScopeId) -> Type {
        let callee_ty = self.check_expr(&app.callee, scope);
        let arg_types: Vec<Type> = app
            .arguments
            .iter()
            .map(|arg| self.check_expr(arg, scope))
            .collect();

        let func = match callee_ty {
            Type::Function(func) => func,
            other => {
                self.errors.push(CheckError::NotCallable {
                    ty: other,
                    span: *app.callee.span(),
                });
                return Type::any();
            }
        };

        let required = func.required_params();
        if arg_types.len() < required {
            self.errors.push(CheckError::TooFewArguments {
                expected: required,
                actual: arg_types.len(),
                span: app.span,
            });
        }
        if arg_types.len() > func.params.len() {
            self.errors.push(CheckError::TooManyArguments {
                expected: func.params.len(),
                actual: arg_types.len(),
                span: app.span,
            });
        }

        for (index, ((param, arg_ty), arg)) in func
            .params
            .iter()
            .zip(&arg_types)
            .zip(&app.arguments)
            .enumerate()
        {
            if !self.is_subtype(arg_ty, &param.ty) {
                self.errors.push(CheckError::ArgumentMismatch {
                    index,
                    param: param.name.clone(),
                    expected: param.ty.clone(),
                    actual: arg_ty.clone(),
                    span: *arg.span(),
                });
            }
        }

        *func.return_type
    }

    fn check_let(&mut self, let_expr: &LetExpression, scope: ScopeId) -> Type {
        let body_scope = self.env.push_scope(scope);

        // Values see the enclosing scope only, never their siblings
        for binding in &let_expr.bindings {
            let value_ty = self.check_expr(&binding.value, scope);
            let bound = match &binding.ty {
                Some(declared) => {
                    if !self.is_subtype(&value_ty, declared) {
                        self.errors.push(CheckError::BindingMismatch {
                            name: binding.name.clone(),
                            expected: declared.clone(),
                            actual: value_ty,
                            span: binding.span,
                        });
                    }
                    declared.clone()
                }
                None => value_ty,
            };
            self.env.define(body_scope, binding.name.clone(), bound);
        }

        self.check_expr(&let_expr.body, body_scope)
    }

    fn check_pipeline(&mut self, pipeline: &PipelineExpression, scope: ScopeId) -> Type {
        let Some((first, rest)) = pipeline.stages.split_first() else {
            return Type::any();
        };

        let mut current = self.check_expr(first, scope);
        let mut broken = false;

        for stage in rest {
            let stage_ty = self.check_expr(stage, scope);
            if broken {
                continue;
            }

            match stage_ty {
                Type::Function(FunctionType { params, return_type }) if !params.is_empty() => {
                    if !self.is_subtype(&current, &params[0].ty) {
                        self.errors.push(CheckError::PipelineStageMismatch {
                            expected: params[0].ty.clone(),
                            actual: current,
                            span: *stage.span(),
                        });
                    }
                    current = *return_type;
                }
                other => {
                    self.errors.push(CheckError::InvalidPipelineStage {
                        ty: other,
                        span: *stage.span(),
                    });
                    current = Type::any();
                    broken = true;
                }
            }
        }

        current
    }

    fn check_annotation(&mut self, annotated: &AnnotatedExpression, scope: ScopeId) -> Type {
        let actual = self.check_expr(&annotated.expression, scope);
        if !self.is_subtype(&actual, &annotated.ty) {
            self.errors.push(CheckError::AnnotationMismatch {
                expected: annotated.ty.clone(),
                actual,
                span: *annotated.expression.span(),
            });
        }
        annotated.ty.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdl_parser::parse;

    fn check(source: &str) -> (Type, Vec<CheckError>) {
        let expr = parse(source).unwrap();
        let mut checker = TypeChecker::new();
        let ty = checker.check(&expr);
        (ty, checker.into_errors())
    }

    #[test]
    fn test_literals() {
        assert_eq!(check("42").0, Type::number());
        assert_eq!(check(r#""s""#).0, Type::string());
        assert_eq!(check("false").0, Type::boolean());
        assert_eq!(check("null").0, Type::null());
    }

    #[test]
    fn test_undefined_identifier_is_any() {
        let (ty, errors) = check("missing");
        assert_eq!(ty, Type::any());
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], CheckError::UndefinedIdentifier { name, .. } if name == "missing"));
    }

    #[test]
    fn test_untyped_param_is_dynamic() {
        let (ty, errors) = check("(x) -> x");
        assert!(errors.is_empty());
        assert_eq!(
            ty,
            Type::function(vec![Param::new("x", Type::dynamic())], Type::dynamic())
        );
    }

    #[test]
    fn test_dynamic_param_is_not_callable() {
        let (ty, errors) = check("(f) -> f 1");
        assert_eq!(
            ty,
            Type::function(vec![Param::new("f", Type::dynamic())], Type::any())
        );
        assert!(matches!(
            errors.as_slice(),
            [CheckError::NotCallable { ty, .. }] if *ty == Type::dynamic()
        ));
    }

    #[test]
    fn test_scopes_allocated_per_binding_form() {
        let expr = parse("let f = (x) -> x in f").unwrap();
        let mut checker = TypeChecker::new();
        checker.check(&expr);
        // global, let body, lambda body
        assert_eq!(checker.env().scope_count(), 3);
    }
}
