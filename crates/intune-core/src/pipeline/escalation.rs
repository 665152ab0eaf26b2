//! Escalation ladder: maps a combined risk score to a tier and an
//! intervention, and attaches the fixed emergency reply on critical.
//!
//! The emergency reply and crisis resources are static, reviewed text. They
//! are never produced by a language model.

use intune_types::config::SafetyConfig;
use intune_types::{CrisisResource, Intervention, LayerScores, RiskAssessment, RiskTier};

/// Reply used verbatim whenever a run escalates.
pub const EMERGENCY_REPLY: &str = "당신의 마음이 많이 힘드신 것 같아요. \n\
지금 이 순간, 당신은 혼자가 아닙니다. \n\
잠시만 기다려 주세요. 곧 전문 상담사님이 연결될 거예요.\n\
그동안 제가 옆에 있을게요. 함께 깊은 숨을 쉬어볼까요?";

/// Korean crisis lines surfaced alongside the emergency reply.
pub fn crisis_resources() -> Vec<CrisisResource> {
    [
        ("생명의 전화", "109", "hotline"),
        ("정신건강 위기상담전화", "1577-0199", "professional"),
        ("청소년 전화", "1388", "youth"),
    ]
    .into_iter()
    .map(|(name, number, kind)| CrisisResource {
        name: name.into(),
        number: number.into(),
        available: "24/7".into(),
        kind: kind.into(),
    })
    .collect()
}

/// Threshold ladder. All comparisons are strict: a score equal to a
/// threshold falls into the tier below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscalationPolicy {
    escalation: f32,
    monitoring: f32,
    support: f32,
}

impl EscalationPolicy {
    /// Build from already-validated safety config.
    pub fn from_config(config: &SafetyConfig) -> Self {
        Self {
            escalation: config.escalation_threshold,
            monitoring: config.monitoring_threshold,
            support: config.support_threshold,
        }
    }

    pub fn classify(&self, score: f32) -> (RiskTier, Intervention) {
        if score > self.escalation {
            (RiskTier::Critical, Intervention::ImmediateEscalation)
        } else if score > self.monitoring {
            (RiskTier::High, Intervention::EnhancedMonitoring)
        } else if score > self.support {
            (RiskTier::Medium, Intervention::GentleSupport)
        } else {
            (RiskTier::Low, Intervention::None)
        }
    }

    /// Turn layer scores into a full assessment.
    pub fn assess(&self, layers: LayerScores) -> RiskAssessment {
        let overall_score = layers.overall();
        let (tier, intervention) = self.classify(overall_score);
        let critical = tier == RiskTier::Critical;

        RiskAssessment {
            layers,
            overall_score,
            tier,
            intervention,
            emergency_reply: critical.then(|| EMERGENCY_REPLY.to_string()),
            resources: if critical {
                crisis_resources()
            } else {
                Vec::new()
            },
        }
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::from_config(&SafetyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_fall_to_lower_tier() {
        let policy = EscalationPolicy::default();
        assert_eq!(policy.classify(0.8).0, RiskTier::High);
        assert_eq!(policy.classify(0.6).0, RiskTier::Medium);
        assert_eq!(policy.classify(0.4).0, RiskTier::Low);
        assert_eq!(policy.classify(0.0).0, RiskTier::Low);
    }

    #[test]
    fn interventions_follow_tiers() {
        let policy = EscalationPolicy::default();
        assert_eq!(
            policy.classify(0.95),
            (RiskTier::Critical, Intervention::ImmediateEscalation)
        );
        assert_eq!(
            policy.classify(0.7),
            (RiskTier::High, Intervention::EnhancedMonitoring)
        );
        assert_eq!(
            policy.classify(0.5),
            (RiskTier::Medium, Intervention::GentleSupport)
        );
        assert_eq!(policy.classify(0.2), (RiskTier::Low, Intervention::None));
    }

    #[test]
    fn custom_thresholds() {
        let config = SafetyConfig {
            escalation_threshold: 0.5,
            monitoring_threshold: 0.3,
            support_threshold: 0.1,
            ..SafetyConfig::default()
        };
        let policy = EscalationPolicy::from_config(&config);
        assert_eq!(policy.classify(0.6).0, RiskTier::Critical);
        assert_eq!(policy.classify(0.2).0, RiskTier::Medium);
    }

    #[test]
    fn critical_carries_emergency_reply_and_resources() {
        let assessment = EscalationPolicy::default().assess(LayerScores {
            keyword: 0.9,
            contextual: 0.0,
            pattern: 0.3,
        });
        assert!(assessment.is_critical());
        assert_eq!(assessment.emergency_reply.as_deref(), Some(EMERGENCY_REPLY));
        assert_eq!(assessment.resources.len(), 3);
        assert_eq!(assessment.resources[0].number, "109");
        assert!((assessment.overall_score - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn non_critical_has_no_emergency_reply() {
        let assessment = EscalationPolicy::default().assess(LayerScores {
            keyword: 0.7,
            ..LayerScores::default()
        });
        assert_eq!(assessment.tier, RiskTier::High);
        assert!(assessment.emergency_reply.is_none());
        assert!(assessment.resources.is_empty());
    }

    #[test]
    fn emergency_reply_is_multiline() {
        assert_eq!(EMERGENCY_REPLY.lines().count(), 4);
        assert!(EMERGENCY_REPLY.starts_with("당신의 마음이"));
        assert!(EMERGENCY_REPLY.ends_with("쉬어볼까요?"));
    }
}
