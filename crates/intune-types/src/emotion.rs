//! Emotion vocabulary and the signal produced by emotion detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed emotion vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    #[default]
    Neutral,
    Sadness,
    Anxiety,
    Stress,
    Anger,
    Joy,
    Crisis,
    Depression,
    Loneliness,
}

impl Emotion {
    pub const ALL: [Emotion; 9] = [
        Emotion::Neutral,
        Emotion::Sadness,
        Emotion::Anxiety,
        Emotion::Stress,
        Emotion::Anger,
        Emotion::Joy,
        Emotion::Crisis,
        Emotion::Depression,
        Emotion::Loneliness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Sadness => "sadness",
            Emotion::Anxiety => "anxiety",
            Emotion::Stress => "stress",
            Emotion::Anger => "anger",
            Emotion::Joy => "joy",
            Emotion::Crisis => "crisis",
            Emotion::Depression => "depression",
            Emotion::Loneliness => "loneliness",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("unknown emotion: {s}"))
    }
}

/// Scores for the three cultural-affect concepts, each in `[0, 1]`.
///
/// - `han`: lingering sorrow and regret (한)
/// - `jeong`: attachment and warmth (정)
/// - `nunchi`: social self-consciousness (눈치)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CulturalAffect {
    pub han: f32,
    pub jeong: f32,
    pub nunchi: f32,
}

/// Primary emotion with confidence and cultural affect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSignal {
    pub primary: Emotion,
    pub confidence: f32,
    pub cultural: CulturalAffect,
}

impl EmotionSignal {
    /// Neutral with zero confidence, the result when nothing matches.
    pub fn neutral() -> Self {
        Self {
            primary: Emotion::Neutral,
            confidence: 0.0,
            cultural: CulturalAffect::default(),
        }
    }

    /// The synthetic crisis label used on the emergency path.
    ///
    /// Keeps the detected cultural scores.
    pub fn crisis_override(&self) -> Self {
        Self {
            primary: Emotion::Crisis,
            confidence: 1.0,
            cultural: self.cultural,
        }
    }
}

impl Default for EmotionSignal {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_names() {
        for emotion in Emotion::ALL {
            assert_eq!(emotion.as_str().parse::<Emotion>().unwrap(), emotion);
        }
        assert!("melancholy".parse::<Emotion>().is_err());
    }

    #[test]
    fn neutral_has_zero_confidence() {
        let signal = EmotionSignal::neutral();
        assert_eq!(signal.primary, Emotion::Neutral);
        assert_eq!(signal.confidence, 0.0);
        assert_eq!(signal.cultural, CulturalAffect::default());
    }

    #[test]
    fn crisis_override_keeps_cultural_scores() {
        let detected = EmotionSignal {
            primary: Emotion::Sadness,
            confidence: 0.8,
            cultural: CulturalAffect {
                han: 0.7,
                jeong: 0.0,
                nunchi: 0.6,
            },
        };
        let crisis = detected.crisis_override();
        assert_eq!(crisis.primary, Emotion::Crisis);
        assert!((crisis.cultural.han - 0.7).abs() < f32::EPSILON);
        assert!((crisis.cultural.nunchi - 0.6).abs() < f32::EPSILON);
    }
}
