//! Three-layer crisis risk scorer.
//!
//! Each layer looks at the transcript independently:
//!
//! - **keyword**: graded keyword sets plus whitespace-tolerant regexes.
//!   Returns the highest matched grade.
//! - **contextual**: counts isolation and hopelessness terms.
//! - **pattern**: counts matching linguistic regexes.
//!
//! The layers run concurrently and the overall score is their maximum.
//! Scoring is pure: the same text always yields the same assessment.

use tracing::debug;

use intune_types::{LayerScores, RiskAssessment};

use super::escalation::EscalationPolicy;
use super::lexicon::CompiledLexicon;

const IMMEDIATE_KEYWORD: f32 = 0.9;
const IMMEDIATE_SPACED: f32 = 0.95;
const HIGH_KEYWORD: f32 = 0.7;
const HIGH_SPACED: f32 = 0.75;
const MEDIUM_KEYWORD: f32 = 0.5;

const ISOLATION_WEIGHT: f32 = 0.2;
const HOPELESSNESS_WEIGHT: f32 = 0.25;
const PATTERN_WEIGHT: f32 = 0.3;

/// Scores text against a compiled lexicon and classifies the result.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    lexicon: CompiledLexicon,
    policy: EscalationPolicy,
}

impl RiskScorer {
    pub fn new(lexicon: CompiledLexicon, policy: EscalationPolicy) -> Self {
        Self { lexicon, policy }
    }

    pub fn policy(&self) -> &EscalationPolicy {
        &self.policy
    }

    /// Run the three layers and classify the combined score.
    pub async fn score(&self, text: &str) -> RiskAssessment {
        let (keyword, contextual, pattern) = tokio::join!(
            async { self.keyword_layer(text) },
            async { self.contextual_layer(text) },
            async { self.pattern_layer(text) },
        );

        let layers = LayerScores {
            keyword,
            contextual,
            pattern,
        };
        let assessment = self.policy.assess(layers);
        debug!(
            keyword,
            contextual,
            pattern,
            tier = %assessment.tier,
            "risk scored"
        );
        assessment
    }

    fn keyword_layer(&self, text: &str) -> f32 {
        let lex = &self.lexicon;
        let graded = [
            (contains_any(text, &lex.immediate), IMMEDIATE_KEYWORD),
            (lex.spaced_immediate.iter().any(|re| re.is_match(text)), IMMEDIATE_SPACED),
            (contains_any(text, &lex.high), HIGH_KEYWORD),
            (lex.spaced_high.iter().any(|re| re.is_match(text)), HIGH_SPACED),
            (contains_any(text, &lex.medium), MEDIUM_KEYWORD),
        ];
        graded
            .into_iter()
            .filter(|(hit, _)| *hit)
            .map(|(_, score)| score)
            .fold(0.0, f32::max)
    }

    fn contextual_layer(&self, text: &str) -> f32 {
        let isolation = count_present(text, &self.lexicon.isolation);
        let hopelessness = count_present(text, &self.lexicon.hopelessness);
        let score = isolation as f32 * ISOLATION_WEIGHT + hopelessness as f32 * HOPELESSNESS_WEIGHT;
        score.min(1.0)
    }

    fn pattern_layer(&self, text: &str) -> f32 {
        let matched = self
            .lexicon
            .linguistic
            .iter()
            .filter(|re| re.is_match(text))
            .count();
        (matched as f32 * PATTERN_WEIGHT).min(1.0)
    }
}

fn contains_any(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| text.contains(t.as_str()))
}

/// Number of distinct terms present in `text`.
fn count_present(text: &str, terms: &[String]) -> usize {
    terms.iter().filter(|t| text.contains(t.as_str())).count()
}
