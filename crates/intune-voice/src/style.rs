//! Voice style and prosody chosen from the caller's emotion.

use std::fmt;

use serde::Serialize;

use intune_types::Emotion;

/// Delivery style for synthesized speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceStyle {
    Calm,
    Empathetic,
    Soothing,
    Supportive,
    Cheerful,
    UrgentCare,
}

impl VoiceStyle {
    /// Style for an emotion. Depression and loneliness share sadness's
    /// style; anything without its own entry is calm.
    pub fn for_emotion(emotion: Emotion) -> Self {
        match emotion {
            Emotion::Sadness | Emotion::Depression | Emotion::Loneliness => VoiceStyle::Empathetic,
            Emotion::Anxiety => VoiceStyle::Soothing,
            Emotion::Stress => VoiceStyle::Supportive,
            Emotion::Joy => VoiceStyle::Cheerful,
            Emotion::Crisis => VoiceStyle::UrgentCare,
            Emotion::Neutral | Emotion::Anger => VoiceStyle::Calm,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceStyle::Calm => "calm",
            VoiceStyle::Empathetic => "empathetic",
            VoiceStyle::Soothing => "soothing",
            VoiceStyle::Supportive => "supportive",
            VoiceStyle::Cheerful => "cheerful",
            VoiceStyle::UrgentCare => "urgent_care",
        }
    }
}

impl fmt::Display for VoiceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative speaking rate, pitch and emphasis. `1.0` rate and pitch is the
/// voice's natural delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prosody {
    pub rate: f32,
    pub pitch: f32,
    pub emphasis: f32,
}

impl Prosody {
    const NEUTRAL: Prosody = Prosody::new(1.0, 1.0, 0.5);

    const fn new(rate: f32, pitch: f32, emphasis: f32) -> Self {
        Self {
            rate,
            pitch,
            emphasis,
        }
    }

    pub fn for_emotion(emotion: Emotion) -> Self {
        match emotion {
            Emotion::Sadness | Emotion::Depression | Emotion::Loneliness => Prosody::new(0.9, 0.95, 0.7),
            Emotion::Anxiety => Prosody::new(0.95, 1.05, 0.6),
            Emotion::Stress => Prosody::new(0.95, 1.0, 0.6),
            Emotion::Joy => Prosody::new(1.05, 1.1, 0.8),
            Emotion::Crisis => Prosody::new(0.9, 0.9, 0.9),
            Emotion::Neutral | Emotion::Anger => Prosody::NEUTRAL,
        }
    }
}

impl Default for Prosody {
    fn default() -> Self {
        Prosody::NEUTRAL
    }
}
