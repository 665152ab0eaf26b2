//! Crisis lexicon: the keyword and regex tables behind the risk layers.
//!
//! The tables are versioned data. A built-in version ships with the crate
//! and a replacement can be loaded from JSON (`safety.lexicon_path`) without
//! recompiling. [`CrisisLexicon::compile`] validates the data and builds
//! the regexes once, up front.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use intune_types::ConfigError;

/// Lexicon schema version understood by this build.
pub const LEXICON_VERSION: u32 = 1;

/// Keyword sets by severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedTerms {
    pub immediate: Vec<String>,
    pub high: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
}

/// Whitespace-tolerant regexes for spaced-out crisis phrases.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpacedPatterns {
    #[serde(default)]
    pub immediate: Vec<String>,
    #[serde(default)]
    pub high: Vec<String>,
}

/// Raw lexicon data as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisLexicon {
    pub version: u32,
    pub keywords: GradedTerms,
    #[serde(default)]
    pub spaced_patterns: SpacedPatterns,
    #[serde(default)]
    pub isolation_terms: Vec<String>,
    #[serde(default)]
    pub hopelessness_terms: Vec<String>,
    #[serde(default)]
    pub linguistic_patterns: Vec<String>,
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

impl CrisisLexicon {
    /// The lexicon shipped with this crate.
    pub fn builtin() -> Self {
        Self {
            version: LEXICON_VERSION,
            keywords: GradedTerms {
                immediate: owned(&["자살", "죽고싶", "죽을래", "목매", "투신"]),
                high: owned(&["우울", "힘들어", "포기", "무의미", "절망"]),
                medium: owned(&["외로워", "슬퍼", "불안", "걱정", "스트레스"]),
            },
            spaced_patterns: SpacedPatterns {
                immediate: owned(&[r"죽\s*고\s*싶", r"자\s*살"]),
                high: owned(&[r"살\s*기\s*싫", r"사\s*라\s*지\s*고\s*싶"]),
            },
            isolation_terms: owned(&["혼자", "아무도", "관심없", "버림받"]),
            hopelessness_terms: owned(&["의미없", "포기", "끝", "못하겠"]),
            linguistic_patterns: owned(&[
                r"더\s*이상.*(못|안|없)",
                r"죽.*싶|싶.*죽",
                r"끝.*내|내.*끝",
            ]),
        }
    }

    /// Load a lexicon from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate and compile the regexes.
    pub fn compile(&self) -> Result<CompiledLexicon, ConfigError> {
        if self.version != LEXICON_VERSION {
            return Err(ConfigError::InvalidLexicon {
                reason: format!(
                    "unsupported version {} (expected {LEXICON_VERSION})",
                    self.version
                ),
            });
        }
        if self.keywords.immediate.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidLexicon {
                reason: "immediate keyword set is empty".into(),
            });
        }

        Ok(CompiledLexicon {
            version: self.version,
            immediate: clean(&self.keywords.immediate),
            high: clean(&self.keywords.high),
            medium: clean(&self.keywords.medium),
            spaced_immediate: compile_all(&self.spaced_patterns.immediate)?,
            spaced_high: compile_all(&self.spaced_patterns.high)?,
            isolation: clean(&self.isolation_terms),
            hopelessness: clean(&self.hopelessness_terms),
            linguistic: compile_all(&self.linguistic_patterns)?,
        })
    }
}

impl Default for CrisisLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Drop blank terms; an empty needle would match every input.
fn clean(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| ConfigError::InvalidLexicon {
                reason: format!("bad pattern {p:?}: {e}"),
            })
        })
        .collect()
}

/// A validated lexicon with compiled regexes, ready for scoring.
#[derive(Debug, Clone)]
pub struct CompiledLexicon {
    pub version: u32,
    pub immediate: Vec<String>,
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub spaced_immediate: Vec<Regex>,
    pub spaced_high: Vec<Regex>,
    pub isolation: Vec<String>,
    pub hopelessness: Vec<String>,
    pub linguistic: Vec<Regex>,
}
