//! Offline collaborators for demos and tests.
//!
//! Each can optionally sleep for its stage's nominal latency so the
//! latency ledger shows realistic numbers without any network access.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use intune_types::{AudioHandle, CollaboratorError, Emotion, EmotionSignal, Utterance};
use intune_voice::VoiceStyle;

use crate::pipeline::traits::{ReplyContext, ReplyGenerator, Transcriber, VoiceSynthesizer};

const TRANSCRIBE_LATENCY: Duration = Duration::from_millis(90);
const GENERATE_LATENCY: Duration = Duration::from_millis(280);
const SYNTHESIZE_LATENCY: Duration = Duration::from_millis(180);

async fn emulate(enabled: bool, latency: Duration) {
    if enabled {
        tokio::time::sleep(latency).await;
    }
}

// ── transcription ───────────────────────────────────────────────────────

/// Returns the utterance text as the transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedTranscriber {
    emulate_latency: bool,
}

impl SimulatedTranscriber {
    pub fn new(emulate_latency: bool) -> Self {
        Self { emulate_latency }
    }
}

#[async_trait]
impl Transcriber for SimulatedTranscriber {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn transcribe(&self, utterance: &Utterance) -> Result<String, CollaboratorError> {
        emulate(self.emulate_latency, TRANSCRIBE_LATENCY).await;
        Ok(utterance.text().to_string())
    }
}

// ── replies ─────────────────────────────────────────────────────────────

const SADNESS_REPLIES: &[&str] = &[
    "지금 많이 힘드신 것 같네요. 우울한 기분이 드실 때는 그 감정을 인정하는 것부터 시작하는 게 중요해요. 오늘 어떤 일이 있으셨는지 편하게 이야기해 주실 수 있을까요?",
    "마음이 무거우신가 봐요. 이런 감정을 느끼는 것은 자연스러운 일이에요. 함께 천천히 이야기해보면서 마음의 짐을 조금씩 덜어보면 어떨까요?",
];

const ANXIETY_REPLIES: &[&str] = &[
    "불안한 마음이 크신 것 같아요. 지금 이 순간, 깊게 숨을 들이쉬고 천천히 내쉬어 보세요. 무엇이 가장 걱정되시는지 말씀해 주실 수 있나요?",
    "걱정이 많으신가 봐요. 불안은 우리를 보호하려는 마음의 신호예요. 구체적으로 어떤 부분이 가장 신경 쓰이시는지 함께 살펴볼까요?",
];

const STRESS_REPLIES: &[&str] = &[
    "스트레스가 많이 쌓이셨군요. 일상에서 작은 휴식을 찾는 것도 중요해요. 최근에 가장 부담스러웠던 일은 무엇인가요?",
    "많이 지치셨나 봐요. 스트레스를 받을 때는 잠시 멈추고 자신을 돌아보는 시간이 필요해요. 오늘 하루는 어떠셨나요?",
];

const NEUTRAL_REPLIES: &[&str] = &[
    "안녕하세요! 오늘은 어떤 하루를 보내고 계신가요? 편하게 이야기 나누어요.",
    "만나서 반가워요. 오늘 기분은 어떠신가요? 무엇이든 편하게 말씀해 주세요.",
];

/// The canned reply set used for `emotion`.
pub fn canned_replies(emotion: Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Sadness | Emotion::Depression | Emotion::Loneliness => SADNESS_REPLIES,
        Emotion::Anxiety => ANXIETY_REPLIES,
        Emotion::Stress => STRESS_REPLIES,
        _ => NEUTRAL_REPLIES,
    }
}

/// Picks a random canned reply for the detected emotion.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedReplyGenerator {
    emulate_latency: bool,
}

impl CannedReplyGenerator {
    pub fn new(emulate_latency: bool) -> Self {
        Self { emulate_latency }
    }
}

#[async_trait]
impl ReplyGenerator for CannedReplyGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, context: &ReplyContext<'_>) -> Result<String, CollaboratorError> {
        emulate(self.emulate_latency, GENERATE_LATENCY).await;
        let replies = canned_replies(context.emotion.primary);
        replies
            .choose(&mut rand::thread_rng())
            .map(|reply| reply.to_string())
            .ok_or_else(|| CollaboratorError::generation("no canned replies"))
    }
}

// ── synthesis ───────────────────────────────────────────────────────────

/// Returns a `mock://` handle naming the voice style.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSynthesizer {
    emulate_latency: bool,
}

impl SimulatedSynthesizer {
    pub fn new(emulate_latency: bool) -> Self {
        Self { emulate_latency }
    }
}

#[async_trait]
impl VoiceSynthesizer for SimulatedSynthesizer {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn synthesize(
        &self,
        _text: &str,
        emotion: &EmotionSignal,
    ) -> Result<AudioHandle, CollaboratorError> {
        emulate(self.emulate_latency, SYNTHESIZE_LATENCY).await;
        let style = VoiceStyle::for_emotion(emotion.primary);
        Ok(AudioHandle::new(format!(
            "mock://audio/{}/response.wav",
            style.as_str()
        )))
    }
}
