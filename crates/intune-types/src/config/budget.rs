//! Per-stage latency budgets.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::timing::Stage;

const BUDGET_TRANSCRIBE_ENV: &str = "INTUNE_BUDGET_TRANSCRIBE_MS";
const BUDGET_ASSESS_SAFETY_ENV: &str = "INTUNE_BUDGET_ASSESS_SAFETY_MS";
const BUDGET_GENERATE_REPLY_ENV: &str = "INTUNE_BUDGET_GENERATE_REPLY_MS";
const BUDGET_SANITIZE_ENV: &str = "INTUNE_BUDGET_SANITIZE_MS";
const BUDGET_SYNTHESIZE_VOICE_ENV: &str = "INTUNE_BUDGET_SYNTHESIZE_VOICE_MS";
const BUDGET_TOTAL_ENV: &str = "INTUNE_BUDGET_TOTAL_MS";

/// Target milliseconds per stage plus the end-to-end target.
///
/// Budgets are advisory unless `enforce_stage_deadlines` is set on the
/// pipeline config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyBudget {
    #[serde(default = "default_transcribe_ms", alias = "transcribeMs", alias = "asr")]
    pub transcribe_ms: u64,

    #[serde(default = "default_assess_safety_ms", alias = "assessSafetyMs", alias = "safety")]
    pub assess_safety_ms: u64,

    #[serde(default = "default_generate_reply_ms", alias = "generateReplyMs", alias = "llm")]
    pub generate_reply_ms: u64,

    #[serde(default = "default_sanitize_ms", alias = "sanitizeMs", alias = "postprocess")]
    pub sanitize_ms: u64,

    #[serde(default = "default_synthesize_voice_ms", alias = "synthesizeVoiceMs", alias = "tts")]
    pub synthesize_voice_ms: u64,

    #[serde(default = "default_total_target_ms", alias = "totalTargetMs", alias = "total_target")]
    pub total_target_ms: u64,
}

fn default_transcribe_ms() -> u64 {
    90
}
fn default_assess_safety_ms() -> u64 {
    50
}
fn default_generate_reply_ms() -> u64 {
    280
}
fn default_sanitize_ms() -> u64 {
    30
}
fn default_synthesize_voice_ms() -> u64 {
    180
}
fn default_total_target_ms() -> u64 {
    700
}

impl Default for LatencyBudget {
    fn default() -> Self {
        Self {
            transcribe_ms: default_transcribe_ms(),
            assess_safety_ms: default_assess_safety_ms(),
            generate_reply_ms: default_generate_reply_ms(),
            sanitize_ms: default_sanitize_ms(),
            synthesize_voice_ms: default_synthesize_voice_ms(),
            total_target_ms: default_total_target_ms(),
        }
    }
}

impl LatencyBudget {
    /// Budget for a single stage.
    pub fn for_stage(&self, stage: Stage) -> u64 {
        match stage {
            Stage::Transcribe => self.transcribe_ms,
            Stage::AssessSafety => self.assess_safety_ms,
            Stage::GenerateReply => self.generate_reply_ms,
            Stage::Sanitize => self.sanitize_ms,
            Stage::SynthesizeVoice => self.synthesize_voice_ms,
        }
    }

    /// Reject zero budgets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for stage in Stage::ALL {
            if self.for_stage(stage) == 0 {
                return Err(ConfigError::InvalidBudget {
                    name: stage.as_str().into(),
                });
            }
        }
        if self.total_target_ms == 0 {
            return Err(ConfigError::InvalidBudget {
                name: "total_target".into(),
            });
        }
        Ok(())
    }

    /// Apply `INTUNE_BUDGET_*_MS` overrides read through `source`.
    ///
    /// Missing, unparsable and non-positive values leave the current budget
    /// in place.
    pub fn apply_overrides<F>(&mut self, mut source: F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        self.transcribe_ms = budget_from_source(&mut source, BUDGET_TRANSCRIBE_ENV, self.transcribe_ms);
        self.assess_safety_ms =
            budget_from_source(&mut source, BUDGET_ASSESS_SAFETY_ENV, self.assess_safety_ms);
        self.generate_reply_ms =
            budget_from_source(&mut source, BUDGET_GENERATE_REPLY_ENV, self.generate_reply_ms);
        self.sanitize_ms = budget_from_source(&mut source, BUDGET_SANITIZE_ENV, self.sanitize_ms);
        self.synthesize_voice_ms =
            budget_from_source(&mut source, BUDGET_SYNTHESIZE_VOICE_ENV, self.synthesize_voice_ms);
        self.total_target_ms = budget_from_source(&mut source, BUDGET_TOTAL_ENV, self.total_target_ms);
    }
}

fn budget_from_source<F>(source: &mut F, key: &str, fallback_ms: u64) -> u64
where
    F: FnMut(&str) -> Option<String>,
{
    parse_budget_ms(source(key).as_deref(), fallback_ms)
}

fn parse_budget_ms(raw: Option<&str>, fallback_ms: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(fallback_ms)
}
