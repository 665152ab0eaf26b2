//! Error types for the intune pipeline.
//!
//! [`PipelineError`] is what a run returns. [`CollaboratorError`] is what the
//! external transcription, generation and synthesis capabilities report, and
//! [`ConfigError`] covers everything that is rejected before a run starts.

use std::path::PathBuf;

use thiserror::Error;

use crate::timing::Stage;

/// Failure reported by an external collaborator (STT, LLM, TTS).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CollaboratorError {
    /// Speech-to-text failed.
    #[error("transcription failed: {message}")]
    Transcription {
        /// Collaborator-supplied description.
        message: String,
    },

    /// Reply generation failed.
    #[error("generation failed: {message}")]
    Generation {
        /// Collaborator-supplied description.
        message: String,
    },

    /// Voice synthesis failed.
    #[error("synthesis failed: {message}")]
    Synthesis {
        /// Collaborator-supplied description.
        message: String,
    },

    /// The stage ran past its budget while deadlines were enforced.
    #[error("deadline of {budget_ms}ms exceeded")]
    DeadlineExceeded {
        /// The budget that was exceeded.
        budget_ms: u64,
    },
}

impl CollaboratorError {
    /// Shorthand for [`CollaboratorError::Transcription`].
    pub fn transcription(message: impl Into<String>) -> Self {
        Self::Transcription {
            message: message.into(),
        }
    }

    /// Shorthand for [`CollaboratorError::Generation`].
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Shorthand for [`CollaboratorError::Synthesis`].
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis {
            message: message.into(),
        }
    }
}

/// Error returned from a pipeline run.
///
/// A run either produces a complete result or exactly one of these. There
/// is no partial result.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipelineError {
    /// An external collaborator failed; the run was aborted at `stage`.
    #[error("stage '{stage}' failed: {cause}")]
    StageFailed {
        /// The stage whose collaborator failed.
        stage: Stage,
        /// The underlying collaborator error.
        #[source]
        cause: CollaboratorError,
    },
}

impl PipelineError {
    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::StageFailed { stage, .. } => *stage,
        }
    }
}

/// Configuration rejected at construction time.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// A latency budget is zero.
    #[error("budget for '{name}' must be greater than zero")]
    InvalidBudget {
        /// Which budget (a stage name or `total_target`).
        name: String,
    },

    /// The escalation thresholds are out of range or out of order.
    #[error("invalid thresholds: {reason}")]
    InvalidThresholds {
        /// What is wrong.
        reason: String,
    },

    /// The crisis lexicon could not be used.
    #[error("invalid lexicon: {reason}")]
    InvalidLexicon {
        /// What is wrong.
        reason: String,
    },

    /// A credential required by live mode is not set.
    #[error("missing credential: set {var}")]
    MissingCredential {
        /// The environment variable that should hold it.
        var: String,
    },

    /// A config or data file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A config or data file is not valid JSON for its schema.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// The file that was being parsed.
        path: PathBuf,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// A convenience type alias for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;
