//! Safety stage configuration: escalation thresholds and lexicon source.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which emotion the voice synthesizer receives on the emergency path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisEmotion {
    /// Replace the detected emotion with the `crisis` label.
    #[default]
    Override,
    /// Keep the detected emotion.
    Detected,
}

/// Thresholds for the escalation ladder and where to load the lexicon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Scores strictly above this are critical.
    #[serde(default = "default_escalation_threshold", alias = "escalationThreshold")]
    pub escalation_threshold: f32,

    /// Scores strictly above this (and not critical) are high.
    #[serde(default = "default_monitoring_threshold", alias = "monitoringThreshold")]
    pub monitoring_threshold: f32,

    /// Scores strictly above this (and not high) are medium.
    #[serde(default = "default_support_threshold", alias = "supportThreshold")]
    pub support_threshold: f32,

    /// Path to a crisis lexicon JSON file. `None` uses the built-in lexicon.
    #[serde(default, alias = "lexiconPath")]
    pub lexicon_path: Option<String>,

    /// Emotion passed to synthesis when the run escalates.
    #[serde(default, alias = "crisisEmotion")]
    pub crisis_emotion: CrisisEmotion,
}

fn default_escalation_threshold() -> f32 {
    0.8
}
fn default_monitoring_threshold() -> f32 {
    0.6
}
fn default_support_threshold() -> f32 {
    0.4
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            escalation_threshold: default_escalation_threshold(),
            monitoring_threshold: default_monitoring_threshold(),
            support_threshold: default_support_threshold(),
            lexicon_path: None,
            crisis_emotion: CrisisEmotion::default(),
        }
    }
}

impl SafetyConfig {
    /// Lexicon file location with `~/` expanded.
    pub fn resolved_lexicon_path(&self) -> Option<PathBuf> {
        self.lexicon_path.as_deref().map(super::expand_home)
    }

    /// Thresholds must lie in `[0, 1]` and be strictly descending.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ladder = [
            ("escalation_threshold", self.escalation_threshold),
            ("monitoring_threshold", self.monitoring_threshold),
            ("support_threshold", self.support_threshold),
        ];
        for (name, value) in ladder {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThresholds {
                    reason: format!("{name} must be within [0, 1], got {value}"),
                });
            }
        }
        if self.escalation_threshold <= self.monitoring_threshold
            || self.monitoring_threshold <= self.support_threshold
        {
            return Err(ConfigError::InvalidThresholds {
                reason: format!(
                    "expected escalation > monitoring > support, got {} / {} / {}",
                    self.escalation_threshold, self.monitoring_threshold, self.support_threshold
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SafetyConfig::default();
        assert!((cfg.escalation_threshold - 0.8).abs() < f32::EPSILON);
        assert!((cfg.monitoring_threshold - 0.6).abs() < f32::EPSILON);
        assert!((cfg.support_threshold - 0.4).abs() < f32::EPSILON);
        assert_eq!(cfg.crisis_emotion, CrisisEmotion::Override);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn out_of_order_rejected() {
        let cfg = SafetyConfig {
            monitoring_threshold: 0.9,
            ..SafetyConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn equal_thresholds_rejected() {
        let cfg = SafetyConfig {
            support_threshold: 0.6,
            ..SafetyConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn out_of_range_rejected() {
        let cfg = SafetyConfig {
            escalation_threshold: 1.5,
            ..SafetyConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("escalation_threshold"));
    }

    #[test]
    fn crisis_emotion_from_json() {
        let cfg: SafetyConfig = serde_json::from_str(r#"{"crisisEmotion": "detected"}"#).unwrap();
        assert_eq!(cfg.crisis_emotion, CrisisEmotion::Detected);
    }
}
