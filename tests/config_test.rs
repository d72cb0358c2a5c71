//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE (global defines the real baseline)
//! - Global → Local: UNION with negation support (project adds its own words)
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use rsoutline::application::ApplicationError;
use rsoutline::config::{local_config_path, InferenceConfig, Settings};

fn write_local_config(dir: &TempDir, content: &str) {
    fs::write(local_config_path(dir.path()), content).unwrap();
}

#[test]
#[serial]
fn given_no_local_config_when_load_then_compiled_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.max_depth, Some(4));
    assert!(!settings.collapse);
    assert_eq!(settings.inference.heading_max_chars, 32);
    assert_eq!(settings.extraction.pdf_page_limit, 40);
    assert_eq!(settings.output_dir, PathBuf::from("outputs"));
}

#[test]
#[serial]
fn given_local_structural_prefixes_when_load_then_unions_with_current() {
    // Arrange
    let dir = TempDir::new().unwrap();
    write_local_config(
        &dir,
        r#"
[inference]
structural_prefixes = ["Kapitel"]
"#,
    );

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    let prefixes = &settings.inference.structural_prefixes;
    assert!(prefixes.contains(&"Kapitel".to_string()), "local addition");
    assert!(prefixes.contains(&"Chapter".to_string()), "inherited default");
    assert_eq!(prefixes.len(), InferenceConfig::default().structural_prefixes.len() + 1);
}

#[test]
#[serial]
fn given_local_negation_when_load_then_removes_inherited_prefix() {
    // Arrange
    let dir = TempDir::new().unwrap();
    write_local_config(
        &dir,
        r#"
[inference]
structural_prefixes = ["!Part", "Teil"]
"#,
    );

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    let prefixes = &settings.inference.structural_prefixes;
    assert!(!prefixes.contains(&"Part".to_string()));
    assert!(prefixes.contains(&"Teil".to_string()));
    let inference = settings.level_inference().unwrap();
    assert_eq!(inference.infer("Part 3"), 2);
    assert_eq!(inference.infer("Teil 3"), 1);
}

#[test]
#[serial]
fn given_local_scalars_when_load_then_override_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    write_local_config(
        &dir,
        r#"
max_depth = 2
collapse = true

[inference]
heading_max_chars = 12

[extraction]
pdf_page_limit = 5
docx_max_heading_level = 3
"#,
    );

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    let options = settings.transform_options();
    assert_eq!(options.max_depth, Some(2));
    assert!(options.collapse);
    assert_eq!(settings.inference.heading_max_chars, 12);
    assert_eq!(settings.extraction.pdf_page_limit, 5);
    assert_eq!(settings.extraction.docx_max_heading_level, 3);
    assert_eq!(settings.extraction.docx_fallback_paragraphs, 50, "unset keeps default");
}

#[test]
#[serial]
fn given_invalid_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    write_local_config(&dir, "max_depth = [not toml");

    let result = Settings::load(Some(dir.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
#[serial]
fn given_invalid_prefix_in_config_when_building_inference_then_error() {
    // Arrange
    let dir = TempDir::new().unwrap();
    write_local_config(
        &dir,
        r#"
[inference]
structural_prefixes = ["Section["]
"#,
    );
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Act
    let result = settings.level_inference();

    // Assert
    assert!(result.is_err());
}

#[test]
fn given_template_when_parsing_then_valid_toml_with_defaults() {
    let template = Settings::template();

    let settings: Settings = toml::from_str(&template).expect("template parses");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_merge_array_when_overlay_has_negations_then_sorted_union_without_negated() {
    let base = vec!["b".to_string(), "a".to_string()];
    let overlay = vec!["!a".to_string(), "c".to_string(), "b".to_string()];

    let merged = InferenceConfig::merge_array(&base, &overlay);

    assert_eq!(merged, vec!["b".to_string(), "c".to_string()]);
}

const ENV_KEYS: &[&str] = &[
    "RSOUTLINE_MAX_DEPTH",
    "RSOUTLINE_COLLAPSE",
    "RSOUTLINE_EXTRACTION__DOCX_MAX_HEADING_LEVEL",
    "RSOUTLINE_EXTRACTION__DOCX_FALLBACK_PARAGRAPHS",
    "RSOUTLINE_EXTRACTION__DOCX_FALLBACK_TITLE_CHARS",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn given_single_underscore_env_vars_when_load_then_override_local_config() {
    // Arrange
    let dir = TempDir::new().unwrap();
    write_local_config(&dir, "max_depth = 3\n");
    std::env::set_var("RSOUTLINE_MAX_DEPTH", "2");
    std::env::set_var("RSOUTLINE_COLLAPSE", "true");

    // Act
    let result = Settings::load(Some(dir.path()));
    clear_env();

    // Assert
    let settings = result.expect("load settings");
    assert_eq!(settings.max_depth, Some(2));
    assert!(settings.collapse);
}

#[test]
#[serial]
fn given_nested_extraction_env_vars_when_load_then_every_field_overridden() {
    // Arrange
    let dir = TempDir::new().unwrap();
    std::env::set_var("RSOUTLINE_EXTRACTION__DOCX_MAX_HEADING_LEVEL", "3");
    std::env::set_var("RSOUTLINE_EXTRACTION__DOCX_FALLBACK_PARAGRAPHS", "10");
    std::env::set_var("RSOUTLINE_EXTRACTION__DOCX_FALLBACK_TITLE_CHARS", "20");

    // Act
    let result = Settings::load(Some(dir.path()));
    clear_env();

    // Assert
    let extraction = result.expect("load settings").extraction;
    assert_eq!(extraction.docx_max_heading_level, 3);
    assert_eq!(extraction.docx_fallback_paragraphs, 10);
    assert_eq!(extraction.docx_fallback_title_chars, 20);
    assert_eq!(extraction.pdf_page_limit, 40, "unset keeps default");
}
