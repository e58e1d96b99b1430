//! End-to-end tests for the front-end driver

use pdl::{
    CheckError, ConfigError, FieldDef, Frontend, FrontendConfig, ParseErrorKind, Param, Schema,
    Type, TypeEnv,
};
use std::io::Write;
use std::path::Path;

fn prompt_env() -> TypeEnv {
    TypeEnv::new()
        .with("article", Type::string())
        .with(
            "summarize",
            Type::function(
                vec![
                    Param::new("text", Type::string()),
                    Param::optional("words", Type::number()),
                ],
                Type::string(),
            ),
        )
        .with(
            "word_count",
            Type::function(vec![Param::new("text", Type::string())], Type::number()),
        )
}

#[test]
fn test_check_well_typed_prompt() {
    let source = r#"
        let body = article |> summarize,
            words = word_count article
        in """Summary ({{ words :: number }} words): {{ body }}"""
    "#;
    let program = Frontend::default().check(source, prompt_env()).unwrap();
    assert_eq!(program.ty, Type::string());
    assert!(program.is_well_typed(), "{:?}", program.errors);
}

#[test]
fn test_type_errors_are_returned_not_raised() {
    let source = "article |> word_count |> summarize";
    let program = Frontend::default().check(source, prompt_env()).unwrap();
    assert_eq!(program.ty, Type::string());
    assert!(matches!(program.errors.as_slice(), [CheckError::PipelineStageMismatch { .. }]));
}

#[test]
fn test_syntax_errors_abort() {
    let err = Frontend::default().check("let x = in x", prompt_env()).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
}

#[test]
fn test_render_diagnostics() {
    let source = "summarize 42";
    let frontend = Frontend::default();
    let program = frontend.check(source, prompt_env()).unwrap();

    let rendered = frontend.render_diagnostics(Path::new("digest.pdl"), source, &program.errors);
    assert!(rendered.contains("error[E2005]"), "{}", rendered);
    assert!(rendered.contains("digest.pdl:1:11"), "{}", rendered);
    assert!(!rendered.contains('\u{1b}'), "output must be plain text");
}

#[test]
fn test_render_parse_error() {
    let source = "(summarize article";
    let frontend = Frontend::default();
    let err = frontend.parse(source).unwrap_err();
    let rendered = frontend.render_parse_error(Path::new("digest.pdl"), source, &err);
    assert!(rendered.contains("error[E1005]"), "{}", rendered);
}

#[test]
fn test_config_limits_apply() {
    let config = FrontendConfig::from_toml_str("[parser]\nmax_nesting_depth = 2\n").unwrap();
    let err = Frontend::new(config).parse("((((x))))").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::LimitExceeded { limit: 2 }));
}

#[test]
fn test_decode_uses_configured_options() {
    let schema = Schema::new("Count").field(FieldDef::new("count", Type::number()));
    let fenced = "```json\n{\"count\": 3}\n```";

    assert!(Frontend::default().decode(&schema, fenced).success);

    let config = FrontendConfig::from_toml_str("[schema]\nextract_fenced = false\n").unwrap();
    assert!(!Frontend::new(config).decode(&schema, fenced).success);
}

#[test]
fn test_load_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[parser]\nmax_template_depth = 3").unwrap();

    let config = FrontendConfig::load(file.path()).unwrap();
    assert_eq!(config.parser.max_template_depth, 3);

    let missing = FrontendConfig::load(Path::new("/nonexistent/pdl.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::IoError(_)));
}
