//! One-stop driver over the parser, checker and schema engine

use pdl_checker::{create_files, CheckError, Diagnostic, TypeChecker, TypeEnv};
use pdl_parser::{Expression, ParseError, Parser};
use pdl_schema::{DecodeResult, Schema};
use pdl_types::Type;
use std::path::Path;
use tracing::debug;

use crate::config::FrontendConfig;

/// A parsed expression together with its inferred type and type errors
#[derive(Debug, Clone)]
pub struct CheckedProgram {
    pub expression: Expression,
    pub ty: Type,
    pub errors: Vec<CheckError>,
}

impl CheckedProgram {
    /// Whether checking found no type errors
    pub fn is_well_typed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// PDL front end configured once and reused across sources
#[derive(Debug, Clone, Default)]
pub struct Frontend {
    config: FrontendConfig,
}

impl Frontend {
    pub fn new(config: FrontendConfig) -> Self {
        Frontend { config }
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    /// Parse source text into an expression
    pub fn parse(&self, source: &str) -> Result<Expression, ParseError> {
        Parser::with_config(source, self.config.parser).parse()
    }

    /// Parse and type check source text against `env`
    ///
    /// Syntax errors abort; type errors are returned inside the program.
    pub fn check(&self, source: &str, env: TypeEnv) -> Result<CheckedProgram, ParseError> {
        let expression = self.parse(source)?;
        let mut checker = TypeChecker::with_env(env);
        let ty = checker.check(&expression);
        let errors = checker.into_errors();
        debug!(ty = %ty, errors = errors.len(), "front end check complete");

        Ok(CheckedProgram {
            expression,
            ty,
            errors,
        })
    }

    /// Decode model output against `schema` with the configured options
    pub fn decode(&self, schema: &Schema, text: &str) -> DecodeResult {
        schema.parse_with(text, &self.config.schema)
    }

    /// Render type errors against their source as plain text
    pub fn render_diagnostics(&self, path: &Path, source: &str, errors: &[CheckError]) -> String {
        let diagnostics: Vec<Diagnostic> = errors
            .iter()
            .map(|err| Diagnostic::from_check_error(err, 0))
            .collect();
        render(path, source, &diagnostics)
    }

    /// Render a syntax error against its source as plain text
    pub fn render_parse_error(&self, path: &Path, source: &str, error: &ParseError) -> String {
        render(path, source, &[Diagnostic::from_parse_error(error, 0)])
    }
}

fn render(path: &Path, source: &str, diagnostics: &[Diagnostic]) -> String {
    let files = create_files(path, source);
    let mut out = String::new();
    for diagnostic in diagnostics {
        match diagnostic.render(&files) {
            Ok(text) => out.push_str(&text),
            // Fall back to the headline when a span does not fit the source
            Err(_) => {
                out.push_str(diagnostic.message());
                out.push('\n');
            }
        }
    }
    out
}
