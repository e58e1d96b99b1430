//! Diagnostic infrastructure for error reporting
//!
//! Turns parse and type errors into codespan diagnostics with stable error
//! codes, renders them against the source and exports them as JSON.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{self, Files, SimpleFiles};
use codespan_reporting::term;
use pdl_parser::{LexError, ParseError, ParseErrorKind, Span};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use termcolor::{ColorChoice, NoColor, StandardStream};

use crate::error::CheckError;

/// Error code for a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// A diagnostic message with source code context
#[derive(Debug, Clone)]
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self.inner = self.inner.with_code(code.0);
        self
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        self.inner
            .labels
            .push(Label::primary(file_id, span.start..span.end).with_message(message));
        self
    }

    /// Add a secondary label (related location)
    pub fn with_secondary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        self.inner
            .labels
            .push(Label::secondary(file_id, span.start..span.end).with_message(message));
        self
    }

    /// Add a note (additional context)
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// The error code, if one was set
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// The headline message
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Create diagnostic from a CheckError
    pub fn from_check_error(error: &CheckError, file_id: usize) -> Self {
        use CheckError::*;

        let diag = Diagnostic::error(error.to_string()).with_code(error_code(error));
        match error {
            UndefinedIdentifier { name, span } => {
                let diag = diag.with_primary_label(file_id, *span, "not found in this scope");
                if name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                    diag.with_help("identifiers are case sensitive")
                } else {
                    diag
                }
            }

            NotCallable { span, .. } => diag
                .with_primary_label(file_id, *span, "cannot be called")
                .with_note("only function values can be applied to arguments"),

            TooFewArguments { span, .. } | TooManyArguments { span, .. } => {
                diag.with_primary_label(file_id, *span, "incorrect number of arguments")
            }

            ArgumentMismatch { expected, actual, span, .. } => diag.with_primary_label(
                file_id,
                *span,
                format!("expected '{}', found '{}'", expected, actual),
            ),

            InvalidPipelineStage { span, .. } => diag
                .with_primary_label(file_id, *span, "not a function")
                .with_note("each stage after the first receives the previous value as its first argument"),

            PipelineStageMismatch { expected, actual, span } => diag.with_primary_label(
                file_id,
                *span,
                format!("expects '{}', receives '{}'", expected, actual),
            ),

            AnnotationMismatch { expected, actual, span } => diag
                .with_primary_label(file_id, *span, format!("has type '{}'", actual))
                .with_help(format!("annotate with a supertype of '{}' or change the expression", actual))
                .with_note(format!("the expression is treated as '{}' from here on", expected)),

            BindingMismatch { expected, actual, span, .. } => diag.with_primary_label(
                file_id,
                *span,
                format!("expected '{}', found '{}'", expected, actual),
            ),

            ReturnTypeMismatch { expected, actual, span } => diag.with_primary_label(
                file_id,
                *span,
                format!("expected '{}', found '{}'", expected, actual),
            ),
        }
    }

    /// Create diagnostic from a ParseError
    pub fn from_parse_error(error: &ParseError, file_id: usize) -> Self {
        let (code, label) = match &error.kind {
            ParseErrorKind::Lex(LexError::UnexpectedCharacter { .. }) => {
                (ErrorCode("E1001"), "unexpected character")
            }
            ParseErrorKind::Lex(LexError::UnterminatedString { .. }) => {
                (ErrorCode("E1002"), "string starts here")
            }
            ParseErrorKind::Lex(LexError::UnterminatedTemplate { .. }) => {
                (ErrorCode("E1003"), "template starts here")
            }
            ParseErrorKind::UnexpectedToken { .. } => (ErrorCode("E1004"), "unexpected token"),
            ParseErrorKind::UnexpectedEof { .. } => (ErrorCode("E1005"), "input ends here"),
            ParseErrorKind::InvalidTemplate { .. } => (ErrorCode("E1006"), "invalid interpolation"),
            ParseErrorKind::LimitExceeded { .. } => (ErrorCode("E1007"), "nested too deeply"),
        };

        let diag = Diagnostic::error(error.message.clone())
            .with_code(code)
            .with_primary_label(file_id, error.span, label);

        match &error.suggestion {
            Some(suggestion) => diag.with_help(suggestion.clone()),
            None => diag,
        }
    }

    /// Emit the diagnostic to stderr with colors
    pub fn emit(&self, files: &SimpleFiles<String, String>) -> Result<(), files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        let config = term::Config::default();
        term::emit(&mut writer, &config, files, &self.inner)
    }

    /// Render the diagnostic as plain text
    pub fn render(&self, files: &SimpleFiles<String, String>) -> Result<String, files::Error> {
        let mut writer = NoColor::new(Vec::new());
        let config = term::Config::default();
        term::emit(&mut writer, &config, files, &self.inner)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Convert to JSON representation for IDE integration
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from_diagnostic(self, files))
    }
}

/// JSON representation of a diagnostic for IDE integration
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code (e.g., "E2001")
    pub code: Option<String>,
    /// Severity level
    pub severity: String,
    /// Main error message
    pub message: String,
    /// Source locations with labels
    pub labels: Vec<JsonLabel>,
    /// Additional notes and help
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    /// File path
    pub file: String,
    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    /// Label message
    pub message: Option<String>,
    /// Label style (primary or secondary)
    pub style: String,
}

impl JsonDiagnostic {
    /// Convert a Diagnostic to JSON representation
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        // Labels whose file or range cannot be resolved are dropped
        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Get error code for a CheckError
pub fn error_code(error: &CheckError) -> ErrorCode {
    use CheckError::*;

    match error {
        UndefinedIdentifier { .. } => ErrorCode("E2001"),
        NotCallable { .. } => ErrorCode("E2002"),
        TooFewArguments { .. } => ErrorCode("E2003"),
        TooManyArguments { .. } => ErrorCode("E2004"),
        ArgumentMismatch { .. } => ErrorCode("E2005"),
        InvalidPipelineStage { .. } => ErrorCode("E2006"),
        PipelineStageMismatch { .. } => ErrorCode("E2007"),
        AnnotationMismatch { .. } => ErrorCode("E2008"),
        BindingMismatch { .. } => ErrorCode("E2009"),
        ReturnTypeMismatch { .. } => ErrorCode("E2010"),
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}
