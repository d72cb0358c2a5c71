//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsoutline/rsoutline.toml`
//! 3. Local config: `<project_dir>/.rsoutline.toml`
//! 4. Environment variables: `RSOUTLINE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::level::{DEFAULT_HEADING_MAX_CHARS, DEFAULT_STRUCTURAL_PREFIXES};
use crate::domain::{DomainResult, LevelInference, TransformOptions};

/// Heading detection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InferenceConfig {
    /// Lines up to this many characters count as heading candidates
    pub heading_max_chars: usize,
    /// Regex fragments of chapter/part/section-like words (depth 1)
    pub structural_prefixes: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            heading_max_chars: DEFAULT_HEADING_MAX_CHARS,
            structural_prefixes: DEFAULT_STRUCTURAL_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Limits of the format adapters' fallback strategies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Pages scanned for heading-like text when a PDF has no bookmarks
    pub pdf_page_limit: usize,
    /// Paragraphs taken when a DOCX has no headings
    pub docx_fallback_paragraphs: usize,
    /// Characters kept of each fallback paragraph
    pub docx_fallback_title_chars: usize,
    /// Deepest level a DOCX heading style may produce
    pub docx_max_heading_level: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pdf_page_limit: 40,
            docx_fallback_paragraphs: 50,
            docx_fallback_title_chars: 60,
            docx_max_heading_level: 6,
        }
    }
}

/// Raw inference config for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawInferenceConfig {
    pub heading_max_chars: Option<usize>,
    pub structural_prefixes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawExtractionConfig {
    pub pdf_page_limit: Option<usize>,
    pub docx_fallback_paragraphs: Option<usize>,
    pub docx_fallback_title_chars: Option<usize>,
    pub docx_max_heading_level: Option<u32>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub output_dir: Option<PathBuf>,
    pub max_depth: Option<usize>,
    pub collapse: Option<bool>,
    pub inference: RawInferenceConfig,
    pub extraction: RawExtractionConfig,
}

impl InferenceConfig {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Union-merge overlay onto self; scalars from overlay win if set.
    pub fn merge(&self, overlay: &RawInferenceConfig) -> Self {
        Self {
            heading_max_chars: overlay
                .heading_max_chars
                .unwrap_or(self.heading_max_chars),
            structural_prefixes: overlay
                .structural_prefixes
                .as_ref()
                .map(|o| Self::merge_array(&self.structural_prefixes, o))
                .unwrap_or_else(|| self.structural_prefixes.clone()),
        }
    }

    /// Apply global config onto defaults: arrays REPLACE instead of union.
    pub fn apply_global(&self, global: &RawInferenceConfig) -> Self {
        Self {
            heading_max_chars: global
                .heading_max_chars
                .unwrap_or(self.heading_max_chars),
            structural_prefixes: global
                .structural_prefixes
                .clone()
                .unwrap_or_else(|| self.structural_prefixes.clone()),
        }
    }
}

impl ExtractionConfig {
    pub fn merge(&self, overlay: &RawExtractionConfig) -> Self {
        Self {
            pdf_page_limit: overlay.pdf_page_limit.unwrap_or(self.pdf_page_limit),
            docx_fallback_paragraphs: overlay
                .docx_fallback_paragraphs
                .unwrap_or(self.docx_fallback_paragraphs),
            docx_fallback_title_chars: overlay
                .docx_fallback_title_chars
                .unwrap_or(self.docx_fallback_title_chars),
            docx_max_heading_level: overlay
                .docx_max_heading_level
                .unwrap_or(self.docx_max_heading_level),
        }
    }
}

/// Unified configuration for rsoutline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory receiving batch exports (default: outputs)
    pub output_dir: PathBuf,
    /// Deepest depth that keeps children (root = 0); None keeps everything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Collapse single-child chains
    pub collapse: bool,
    pub inference: InferenceConfig,
    pub extraction: ExtractionConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            max_depth: Some(4),
            collapse: false,
            inference: InferenceConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

/// Get the XDG config directory for rsoutline.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsoutline").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsoutline.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".rsoutline.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Level inference configured from the `[inference]` section.
    pub fn level_inference(&self) -> DomainResult<LevelInference> {
        LevelInference::new(
            &self.inference.structural_prefixes,
            self.inference.heading_max_chars,
        )
    }

    /// Default transform pipeline (CLI flags may override it).
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            max_depth: self.max_depth,
            collapse: self.collapse,
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let raw = self.output_dir.to_string_lossy().into_owned();
        let expanded = shellexpand::full(&raw)
            .map(|s| s.into_owned())
            .unwrap_or(raw);
        self.output_dir = PathBuf::from(expanded);
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            max_depth: overlay.max_depth.or(self.max_depth),
            collapse: overlay.collapse.unwrap_or(self.collapse),
            inference: self.inference.merge(&overlay.inference),
            extraction: self.extraction.merge(&overlay.extraction),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            output_dir: global
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            max_depth: global.max_depth.or(self.max_depth),
            collapse: global.collapse.unwrap_or(self.collapse),
            inference: self.inference.apply_global(&global.inference),
            extraction: self.extraction.merge(&global.extraction),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.rsoutline.toml`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply RSOUTLINE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("RSOUTLINE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("inference.structural_prefixes"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_int("max_depth") {
            settings.max_depth = usize::try_from(val).ok();
        }
        if let Ok(val) = config.get_bool("collapse") {
            settings.collapse = val;
        }
        if let Ok(val) = config.get_int("inference.heading_max_chars") {
            if let Ok(chars) = usize::try_from(val) {
                settings.inference.heading_max_chars = chars;
            }
        }
        if let Ok(val) = config.get::<Vec<String>>("inference.structural_prefixes") {
            settings.inference.structural_prefixes = val;
        }
        if let Ok(val) = config.get_int("extraction.pdf_page_limit") {
            if let Ok(limit) = usize::try_from(val) {
                settings.extraction.pdf_page_limit = limit;
            }
        }
        if let Ok(val) = config.get_int("extraction.docx_fallback_paragraphs") {
            if let Ok(count) = usize::try_from(val) {
                settings.extraction.docx_fallback_paragraphs = count;
            }
        }
        if let Ok(val) = config.get_int("extraction.docx_fallback_title_chars") {
            if let Ok(chars) = usize::try_from(val) {
                settings.extraction.docx_fallback_title_chars = chars;
            }
        }
        if let Ok(val) = config.get_int("extraction.docx_max_heading_level") {
            if let Ok(level) = u32::try_from(val) {
                settings.extraction.docx_max_heading_level = level;
            }
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rsoutline configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rsoutline/rsoutline.toml  (defines your baseline)
#   Local:  <project_dir>/.rsoutline.toml        (project-specific additions)
#   Env:    RSOUTLINE_* environment variables    (explicit overrides)
#           nested keys use "__": RSOUTLINE_MAX_DEPTH=2,
#           RSOUTLINE_EXTRACTION__PDF_PAGE_LIMIT=10
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!item" in local config to REMOVE an inherited item:
#     structural_prefixes = ["Kapitel", "!Part"]

# Directory for batch exports
# output_dir = "outputs"

# Deepest depth that keeps children (root = 0)
# max_depth = 4

# Merge single-child chains into one node ("A / B")
# collapse = false

[inference]
# Lines up to this many characters are heading candidates
# heading_max_chars = 32

# Regex fragments for chapter-like words (depth 1)
# structural_prefixes = ["Chapter", "Section", "Part", "Appendix", "Annex"]

[extraction]
# Pages scanned for headings when a PDF has no bookmarks
# pdf_page_limit = 40

# Paragraphs used when a DOCX has no headings, and their max length
# docx_fallback_paragraphs = 50
# docx_fallback_title_chars = 60

# Deepest level produced by DOCX heading styles
# docx_max_heading_level = 6
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
