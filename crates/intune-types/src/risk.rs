//! Risk tiers, interventions and the per-run assessment record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete risk tier derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The action attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intervention {
    None,
    GentleSupport,
    EnhancedMonitoring,
    ImmediateEscalation,
}

impl Intervention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intervention::None => "none",
            Intervention::GentleSupport => "gentle_support",
            Intervention::EnhancedMonitoring => "enhanced_monitoring",
            Intervention::ImmediateEscalation => "immediate_escalation",
        }
    }
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score from each independent safety layer, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerScores {
    pub keyword: f32,
    pub contextual: f32,
    pub pattern: f32,
}

impl LayerScores {
    /// The reduced score: the maximum of the three layers.
    pub fn overall(&self) -> f32 {
        self.keyword.max(self.contextual).max(self.pattern)
    }
}

/// A crisis line offered alongside the emergency reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisResource {
    pub name: String,
    pub number: String,
    pub available: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Outcome of the safety stage. Built once per run and not changed after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub layers: LayerScores,
    pub overall_score: f32,
    pub tier: RiskTier,
    pub intervention: Intervention,
    /// Fixed emergency message. Present only when `tier` is critical.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_reply: Option<String>,
    /// Crisis lines. Empty unless `tier` is critical.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<CrisisResource>,
}

impl RiskAssessment {
    pub fn is_critical(&self) -> bool {
        self.tier == RiskTier::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_is_max_of_layers() {
        let layers = LayerScores {
            keyword: 0.5,
            contextual: 0.45,
            pattern: 0.6,
        };
        assert!((layers.overall() - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(RiskTier::Critical > RiskTier::High);
        assert!(RiskTier::High > RiskTier::Medium);
        assert!(RiskTier::Medium > RiskTier::Low);
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&Intervention::ImmediateEscalation).unwrap(),
            "\"immediate_escalation\""
        );
        assert_eq!(serde_json::to_string(&RiskTier::Medium).unwrap(), "\"medium\"");
    }

    #[test]
    fn non_critical_assessment_omits_emergency_fields() {
        let assessment = RiskAssessment {
            layers: LayerScores::default(),
            overall_score: 0.0,
            tier: RiskTier::Low,
            intervention: Intervention::None,
            emergency_reply: None,
            resources: Vec::new(),
        };
        let json = serde_json::to_value(&assessment).unwrap();
        assert!(json.get("emergency_reply").is_none());
        assert!(json.get("resources").is_none());
        assert!(!assessment.is_critical());
    }
}
