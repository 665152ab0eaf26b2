//! Pipeline stages and per-stage elapsed time.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A named pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Transcribe,
    AssessSafety,
    GenerateReply,
    Sanitize,
    SynthesizeVoice,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 5] = [
        Stage::Transcribe,
        Stage::AssessSafety,
        Stage::GenerateReply,
        Stage::Sanitize,
        Stage::SynthesizeVoice,
    ];

    /// Stable snake_case name used in logs, JSON and config keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Transcribe => "transcribe",
            Stage::AssessSafety => "assess_safety",
            Stage::GenerateReply => "generate_reply",
            Stage::Sanitize => "sanitize",
            Stage::SynthesizeVoice => "synthesize_voice",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Elapsed milliseconds for each stage that actually ran.
///
/// Keeps insertion order. Stages that were skipped are absent rather than
/// recorded as zero. Serializes as a JSON object in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageTiming {
    entries: Vec<(Stage, u64)>,
}

impl StageTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stage. A stage recorded twice keeps its first position and
    /// takes the newer value.
    pub fn record(&mut self, stage: Stage, elapsed_ms: u64) {
        match self.entries.iter_mut().find(|(s, _)| *s == stage) {
            Some(entry) => entry.1 = elapsed_ms,
            None => self.entries.push((stage, elapsed_ms)),
        }
    }

    pub fn get(&self, stage: Stage) -> Option<u64> {
        self.entries
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, ms)| *ms)
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.get(stage).is_some()
    }

    /// Sum of all recorded stages.
    pub fn total_ms(&self) -> u64 {
        self.entries.iter().map(|(_, ms)| ms).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Stage names in execution order.
    pub fn stages(&self) -> Vec<Stage> {
        self.entries.iter().map(|(s, _)| *s).collect()
    }
}

impl Serialize for StageTiming {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (stage, ms) in &self.entries {
            map.serialize_entry(stage.as_str(), ms)?;
        }
        map.end()
    }
}
