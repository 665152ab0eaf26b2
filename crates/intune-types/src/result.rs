//! Aggregated output of a pipeline run.

use serde::Serialize;

use crate::emotion::EmotionSignal;
use crate::risk::RiskAssessment;
use crate::timing::{Stage, StageTiming};

/// Reference to synthesized audio (a URL or file URI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AudioHandle(String);

impl AudioHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AudioHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a front end needs to present one run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub input: String,
    pub transcript: String,
    pub response: String,
    pub emotion: EmotionSignal,
    pub safety: RiskAssessment,
    pub audio: AudioHandle,
    pub timings: StageTiming,
    pub total_ms: u64,
    pub total_target_ms: u64,
    /// Sum of executed stages is strictly below the total target.
    pub within_budget: bool,
    /// Stages that ran past their own budget, in execution order.
    pub budget_overruns: Vec<Stage>,
}
