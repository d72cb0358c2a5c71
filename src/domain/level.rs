//! Level inference: estimating outline depth from a line of text.
//!
//! Depth is decided by an ordered rule table; the first matching rule wins
//! and lines matching nothing get [`DEFAULT_DEPTH`]. New numbering schemes
//! or locales are added as rules (or as structural-word prefixes through
//! configuration) without touching the matching loop.

use regex::Regex;
use tracing::debug;

use crate::domain::error::{DomainError, DomainResult};

/// Depth assigned when no rule matches.
pub const DEFAULT_DEPTH: u32 = 2;

/// Lines up to this many characters count as heading candidates.
pub const DEFAULT_HEADING_MAX_CHARS: usize = 32;

/// Structural words denoting chapter/part/section-like units.
pub const DEFAULT_STRUCTURAL_PREFIXES: &[&str] = &[
    "第[一二三四五六七八九十百千]+[章部節項]",
    "Annex",
    "Appendix",
    "Chapter",
    "Part",
    "Section",
];

/// How a matching rule turns into a depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DepthRule {
    Fixed(u32),
    /// One level per dot-separated segment of the first capture group
    SegmentCount,
}

#[derive(Debug)]
struct LevelRule {
    name: &'static str,
    pattern: Regex,
    depth: DepthRule,
}

impl LevelRule {
    fn depth_for(&self, line: &str) -> Option<u32> {
        match self.depth {
            DepthRule::Fixed(depth) => self.pattern.is_match(line).then_some(depth),
            DepthRule::SegmentCount => {
                let caps = self.pattern.captures(line)?;
                let segments = caps.get(1)?.as_str().matches('.').count() + 1;
                Some(u32::try_from(segments).unwrap_or(u32::MAX))
            }
        }
    }
}

/// Outcome of inferring a single line, including which rule decided it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inference {
    pub depth: u32,
    /// Name of the matching rule, `None` when the default applied
    pub rule: Option<&'static str>,
    pub heading_candidate: bool,
}

/// Heuristic depth estimator and heading-candidate predicate.
#[derive(Debug)]
pub struct LevelInference {
    rules: Vec<LevelRule>,
    heading_prefix: Regex,
    heading_max_chars: usize,
}

impl LevelInference {
    /// Build the rule table with the given structural-word prefixes.
    ///
    /// Prefixes are regex fragments anchored at the start of the line.
    pub fn new(structural_prefixes: &[String], heading_max_chars: usize) -> DomainResult<Self> {
        for prefix in structural_prefixes {
            compile(prefix)?;
        }
        let words = structural_prefixes
            .iter()
            .map(|prefix| bounded(prefix))
            .collect::<Vec<_>>()
            .join("|");

        let mut rules = vec![
            LevelRule {
                name: "multi_segment_number",
                pattern: compile(r"^(\d+(?:\.\d+)+)")?,
                depth: DepthRule::SegmentCount,
            },
            LevelRule {
                name: "single_number",
                pattern: compile(r"^\d+[.)]")?,
                depth: DepthRule::Fixed(1),
            },
            LevelRule {
                name: "letter",
                pattern: compile(r"^[A-Z]\.")?,
                depth: DepthRule::Fixed(1),
            },
        ];
        if !structural_prefixes.is_empty() {
            rules.push(LevelRule {
                name: "structural_word",
                pattern: compile(&format!("^(?:{words})"))?,
                depth: DepthRule::Fixed(1),
            });
        }
        rules.push(LevelRule {
            name: "bullet",
            pattern: compile(r"^[-*•●■◦]\s+")?,
            depth: DepthRule::Fixed(2),
        });

        let heading_prefix = if structural_prefixes.is_empty() {
            compile(r"^(?:\d+(?:\.\d+){0,3}[).]?\s+|[A-Z]\.)")?
        } else {
            compile(&format!(r"^(?:\d+(?:\.\d+){{0,3}}[).]?\s+|[A-Z]\.|{words})"))?
        };

        debug!(rules = rules.len(), heading_max_chars, "level inference ready");
        Ok(Self {
            rules,
            heading_prefix,
            heading_max_chars,
        })
    }

    /// Rule table with the built-in structural words and length threshold.
    pub fn with_defaults() -> DomainResult<Self> {
        let prefixes: Vec<String> = DEFAULT_STRUCTURAL_PREFIXES
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self::new(&prefixes, DEFAULT_HEADING_MAX_CHARS)
    }

    /// Estimated depth of a line (always ≥ 1).
    ///
    /// Total over all strings; callers drop empty titles before building.
    pub fn infer(&self, line: &str) -> u32 {
        self.classify(line).0
    }

    /// Whether the line starts with a numeric, lettered or structural-word prefix.
    pub fn has_structural_prefix(&self, line: &str) -> bool {
        self.heading_prefix.is_match(line.trim())
    }

    /// Whether a line could be a heading at all: a structural prefix or a short line.
    pub fn is_heading_candidate(&self, line: &str) -> bool {
        let line = line.trim();
        self.heading_prefix.is_match(line) || line.chars().count() <= self.heading_max_chars
    }

    /// Depth, deciding rule and heading-candidate flag for a line.
    pub fn explain(&self, line: &str) -> Inference {
        let (depth, rule) = self.classify(line);
        Inference {
            depth,
            rule,
            heading_candidate: self.is_heading_candidate(line),
        }
    }

    fn classify(&self, line: &str) -> (u32, Option<&'static str>) {
        let line = line.trim();
        self.rules
            .iter()
            .find_map(|rule| rule.depth_for(line).map(|depth| (depth.max(1), Some(rule.name))))
            .unwrap_or((DEFAULT_DEPTH, None))
    }
}

/// Group a structural-word fragment, ending it at a word boundary when it
/// ends in a Latin letter or digit so "Part" does not match "Particularly".
///
/// CJK fragments stay unbounded: `第三章概要` has no boundary after `章`.
fn bounded(prefix: &str) -> String {
    match prefix.chars().last() {
        Some(c) if c.is_ascii_alphanumeric() => format!(r"(?:{prefix})\b"),
        _ => format!("(?:{prefix})"),
    }
}

pub(crate) fn compile(pattern: &str) -> DomainResult<Regex> {
    Regex::new(pattern).map_err(|source| DomainError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
