//! Keyword emotion detector (local, no model).
//!
//! Scans the transcript for per-emotion keyword groups. The emotion with the
//! most distinct keyword hits wins; ties go to the earlier table entry. Korean
//! cultural affect markers (han, jeong, nunchi) are scored separately.

use intune_types::{CulturalAffect, Emotion, EmotionSignal};

use super::traits::EmotionDetector;

struct EmotionKeywords {
    keywords: &'static [&'static str],
    emotion: Emotion,
}

/// Checked in order; earlier entries win ties.
const EMOTIONS: &[EmotionKeywords] = &[
    EmotionKeywords {
        keywords: &["우울", "슬프", "힘들", "외로", "눈물"],
        emotion: Emotion::Sadness,
    },
    EmotionKeywords {
        keywords: &["불안", "걱정", "두렵", "무서", "긴장"],
        emotion: Emotion::Anxiety,
    },
    EmotionKeywords {
        keywords: &["스트레스", "압박", "부담", "지치", "피곤"],
        emotion: Emotion::Stress,
    },
    EmotionKeywords {
        keywords: &["화나", "짜증", "분노", "억울", "미워"],
        emotion: Emotion::Anger,
    },
    EmotionKeywords {
        keywords: &["기쁘", "행복", "좋", "즐거", "신나"],
        emotion: Emotion::Joy,
    },
    EmotionKeywords {
        keywords: &["무기력", "공허", "의욕"],
        emotion: Emotion::Depression,
    },
    EmotionKeywords {
        keywords: &["쓸쓸", "외톨이", "고독"],
        emotion: Emotion::Loneliness,
    },
];

const HAN: &[&str] = &["그리움", "서러움", "아쉬움", "후회"];
const JEONG: &[&str] = &["고마워", "보고싶", "사랑", "우리", "정들었"];
const NUNCHI: &[&str] = &["미안", "부담", "실례", "죄송"];

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordEmotionDetector;

impl KeywordEmotionDetector {
    pub fn new() -> Self {
        Self
    }
}

fn hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

fn marker(text: &str, keywords: &[&str], score: f32) -> f32 {
    if keywords.iter().any(|k| text.contains(k)) {
        score
    } else {
        0.0
    }
}

impl EmotionDetector for KeywordEmotionDetector {
    fn detect(&self, text: &str) -> EmotionSignal {
        let cultural = CulturalAffect {
            han: marker(text, HAN, 0.7),
            jeong: marker(text, JEONG, 0.7),
            nunchi: marker(text, NUNCHI, 0.6),
        };

        // Strictly-greater keeps the first entry on ties.
        let mut best: Option<(Emotion, usize)> = None;
        for entry in EMOTIONS {
            let n = hits(text, entry.keywords);
            if n > 0 && best.is_none_or(|(_, top)| n > top) {
                best = Some((entry.emotion, n));
            }
        }

        match best {
            Some((primary, n)) => EmotionSignal {
                primary,
                confidence: (n as f32 * 0.3 + 0.5).min(1.0),
                cultural,
            },
            None => EmotionSignal {
                cultural,
                ..EmotionSignal::neutral()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> EmotionSignal {
        KeywordEmotionDetector::new().detect(text)
    }

    #[test]
    fn no_keywords_is_neutral_zero_confidence() {
        let signal = detect("안녕하세요, 오늘 기분이 어떠세요?");
        assert_eq!(signal.primary, Emotion::Neutral);
        assert_eq!(signal.confidence, 0.0);
    }

    #[test]
    fn single_hit_confidence() {
        let signal = detect("요즘 너무 불안해요");
        assert_eq!(signal.primary, Emotion::Anxiety);
        assert!((signal.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn most_hits_wins() {
        // one sadness hit, two stress hits
        let signal = detect("눈물이 나고 압박감에 너무 피곤해");
        assert_eq!(signal.primary, Emotion::Stress);
        assert!((signal.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tie_goes_to_table_order() {
        let signal = detect("슬프고 걱정돼");
        assert_eq!(signal.primary, Emotion::Sadness);
    }

    #[test]
    fn supplemented_emotions_detected() {
        assert_eq!(detect("아무 의욕이 없어").primary, Emotion::Depression);
        assert_eq!(detect("외톨이가 된 기분").primary, Emotion::Loneliness);
    }

    #[test]
    fn cultural_markers_scored() {
        let signal = detect("엄마가 보고싶고 그리움이 커요");
        assert!((signal.cultural.han - 0.7).abs() < f32::EPSILON);
        assert!((signal.cultural.jeong - 0.7).abs() < f32::EPSILON);
        assert_eq!(signal.cultural.nunchi, 0.0);
    }

    #[test]
    fn cultural_markers_survive_neutral() {
        let signal = detect("죄송합니다");
        assert_eq!(signal.primary, Emotion::Neutral);
        assert!((signal.cultural.nunchi - 0.6).abs() < f32::EPSILON);
    }
}
