//! Precedence tests: first source in the list wins, per field.

use std::io::Write;
use std::path::PathBuf;

use crate::loader::Loader;
use crate::provenance::SourceKind;
use crate::schema::{Schema, Shape};
use crate::sources::{CliArgs, ConfigFile, DotenvFile, EnvVars};
use crate::value::Value;

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn settings_schema() -> Schema {
    Schema::builder()
        .field_with_default("debug", Shape::Bool, false)
        .field_with_default("workers", Shape::Int, 4i64)
        .field_with_default("rate", Shape::Float, 1.5)
        .field_with_default("data_dir", Shape::optional(Shape::Path), Value::Null)
        .field_with_default(
            "color",
            Shape::enumeration("Color", [("RED", "red"), ("BLUE", "blue")]),
            "RED",
        )
        .field_with_default("optional_name", Shape::optional(Shape::Str), Value::Null)
        .build()
        .unwrap()
}

#[test]
fn test_cli_wins_over_env_dotenv_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let dotenv = write_file(&dir, ".env", "WORKERS=6\n");
    let toml = write_file(&dir, "config.toml", "workers = 2\n");

    let schema = Schema::builder()
        .field_with_default("workers", Shape::Int, 1i64)
        .build()
        .unwrap();

    let resolved = Loader::new(&schema)
        .with_source(CliArgs::new(["--workers=12"]))
        .with_source(EnvVars::from_snapshot([("WORKERS", "9")]))
        .with_source(DotenvFile::new(dotenv))
        .with_source(ConfigFile::new(toml))
        .load()
        .unwrap();

    assert_eq!(resolved.get_i64("workers"), Some(12));
    assert_eq!(resolved.provenance("workers").unwrap().kind, SourceKind::Cli);
}

#[test]
fn test_env_wins_when_cli_does_not_report_the_field() {
    let dir = tempfile::tempdir().unwrap();
    let dotenv = write_file(&dir, ".env", "APP_WORKERS=7\n");
    let toml = write_file(&dir, "config.toml", "workers = 1\n");
    let schema = settings_schema();

    let resolved = Loader::new(&schema)
        .with_source(EnvVars::from_snapshot([("APP_WORKERS", "9")]).with_prefix("APP_"))
        .with_source(DotenvFile::new(dotenv).with_prefix("APP_"))
        .with_source(ConfigFile::new(toml))
        .load()
        .unwrap();

    assert_eq!(resolved.get_i64("workers"), Some(9));
    let prov = resolved.provenance("workers").unwrap();
    assert_eq!(prov.kind, SourceKind::Env);
    assert_eq!(prov.path.as_deref(), Some("APP_WORKERS"));
}

#[test]
fn test_dotenv_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let dotenv = write_file(&dir, ".env", "WORKERS=6\n# comment\nrate=3.5\n");
    let toml = write_file(&dir, "config.toml", "workers = 2\nrate = 1.0\n");
    let schema = settings_schema();

    let resolved = Loader::new(&schema)
        .with_source(DotenvFile::new(dotenv))
        .with_source(ConfigFile::new(toml))
        .load()
        .unwrap();

    assert_eq!(resolved.get_i64("workers"), Some(6));
    assert_eq!(resolved.get_f64("rate"), Some(3.5));
    assert_eq!(
        resolved.provenance("workers").unwrap().kind,
        SourceKind::Dotenv
    );
}

#[test]
fn test_file_values_then_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let toml = write_file(&dir, "config.toml", "workers = 8\nrate = 2.25\ncolor = \"blue\"\n");
    let schema = settings_schema();

    let resolved = Loader::new(&schema)
        .with_source(ConfigFile::new(toml))
        .load()
        .unwrap();

    assert_eq!(resolved.get_bool("debug"), Some(false));
    assert_eq!(resolved.get_i64("workers"), Some(8));
    assert_eq!(resolved.get_f64("rate"), Some(2.25));
    assert_eq!(resolved.get("color"), Some(&Value::Str("BLUE".to_string())));
    assert_eq!(resolved.get("optional_name"), Some(&Value::Null));
    assert_eq!(
        resolved.provenance("debug").unwrap().kind,
        SourceKind::Default
    );
    assert_eq!(resolved.provenance("workers").unwrap().kind, SourceKind::File);
    assert_eq!(resolved.provenance("color").unwrap().kind, SourceKind::File);
}

#[test]
fn test_missing_dotenv_file_contributes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let toml = write_file(&dir, "config.toml", "workers = 5\n");
    let schema = settings_schema();

    let resolved = Loader::new(&schema)
        .with_source(DotenvFile::new(dir.path().join(".env")))
        .with_source(ConfigFile::new(toml))
        .load()
        .unwrap();

    assert_eq!(resolved.get_i64("workers"), Some(5));
}

#[test]
fn test_missing_toml_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let schema = settings_schema();

    let resolved = Loader::new(&schema)
        .with_source(ConfigFile::new(dir.path().join("missing.toml")))
        .load()
        .unwrap();

    assert_eq!(resolved.get_i64("workers"), Some(4));
}

#[test]
fn test_native_toml_values_are_not_string_round_tripped() {
    let dir = tempfile::tempdir().unwrap();
    let toml = write_file(&dir, "config.toml", "debug = true\n");
    let schema = settings_schema();

    let resolved = Loader::new(&schema)
        .with_source(ConfigFile::new(toml))
        .load()
        .unwrap();

    assert_eq!(resolved.get_bool("debug"), Some(true));
    // Provenance keeps the native raw value too.
    assert_eq!(
        resolved.provenance("debug").unwrap().raw_value,
        Value::Bool(true)
    );
}
