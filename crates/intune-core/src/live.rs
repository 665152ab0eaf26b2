//! Adapters from the cloud clients in `intune-llm` and `intune-voice` to the
//! pipeline's collaborator traits.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use intune_llm::{ChatMessage, ChatProvider, ChatRequest};
use intune_types::{AudioHandle, CollaboratorError, EmotionSignal, Utterance};
use intune_voice::{Prosody, SpeechToText, TextToSpeech, VoiceRequest, VoiceStyle};

use crate::pipeline::traits::{ReplyContext, ReplyGenerator, Transcriber, VoiceSynthesizer};

/// Base system prompt for reply generation.
pub const SYSTEM_PROMPT: &str = "You are a compassionate AI therapist specializing in CBT. \
You understand Korean culture deeply, including concepts like 한(han), 정(jeong), and 눈치(nunchi). \
Respond with empathy, validation, and gentle guidance. \
Keep responses concise (2-3 sentences) for natural conversation flow.";

// ── transcription ───────────────────────────────────────────────────────

/// Language hint sent with every transcription request.
const STT_LANGUAGE: &str = "ko";

/// Sends attached audio to a speech-to-text service. Text-only utterances
/// pass through untouched.
pub struct SpeechTranscriber {
    stt: Arc<dyn SpeechToText>,
}

impl SpeechTranscriber {
    pub fn new(stt: Arc<dyn SpeechToText>) -> Self {
        Self { stt }
    }
}

#[async_trait]
impl Transcriber for SpeechTranscriber {
    fn name(&self) -> &str {
        self.stt.name()
    }

    async fn transcribe(&self, utterance: &Utterance) -> Result<String, CollaboratorError> {
        let Some(audio) = utterance.audio() else {
            debug!("no audio attached, using text as transcript");
            return Ok(utterance.text().to_string());
        };
        let result = self
            .stt
            .transcribe(audio, "audio/wav", Some(STT_LANGUAGE))
            .await
            .map_err(|e| CollaboratorError::transcription(e.to_string()))?;
        if result.text.is_empty() {
            return Err(CollaboratorError::transcription("empty transcript"));
        }
        Ok(result.text)
    }
}

// ── generation ──────────────────────────────────────────────────────────

/// Generates replies through a chat completion provider.
pub struct LlmReplyGenerator {
    provider: Arc<dyn ChatProvider>,
    model: String,
    max_tokens: i32,
    temperature: f64,
}

impl LlmReplyGenerator {
    pub fn new(provider: Arc<dyn ChatProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build the chat request for one turn.
    pub fn build_request(&self, context: &ReplyContext<'_>) -> ChatRequest {
        let system = format!(
            "{SYSTEM_PROMPT}\n\nDetected emotion: {} (confidence {:.2}).\n\
             Risk level: {}, recommended intervention: {}.",
            context.emotion.primary,
            context.emotion.confidence,
            context.risk.tier,
            context.risk.intervention,
        );

        let mut messages = vec![ChatMessage::system(system)];
        for exchange in context.history {
            messages.push(ChatMessage::user(exchange.user.clone()));
            messages.push(ChatMessage::assistant(exchange.assistant.clone()));
        }
        messages.push(ChatMessage::user(context.transcript));

        ChatRequest::new(self.model.clone(), messages)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }
}

#[async_trait]
impl ReplyGenerator for LlmReplyGenerator {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn generate(&self, context: &ReplyContext<'_>) -> Result<String, CollaboratorError> {
        let request = self.build_request(context);
        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| CollaboratorError::generation(e.to_string()))?;
        if let Some(usage) = &response.usage {
            debug!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "reply generated"
            );
        }
        response
            .first_text()
            .map(String::from)
            .ok_or_else(|| CollaboratorError::generation("response contained no text"))
    }
}

// ── synthesis ───────────────────────────────────────────────────────────

/// Synthesizes speech and writes it under `output_dir`, returning a
/// `file://` handle.
pub struct FileVoiceSynthesizer {
    tts: Arc<dyn TextToSpeech>,
    output_dir: PathBuf,
    voice_id: Option<String>,
}

impl FileVoiceSynthesizer {
    pub fn new(tts: Arc<dyn TextToSpeech>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            tts,
            output_dir: output_dir.into(),
            voice_id: None,
        }
    }

    pub fn with_voice_id(mut self, voice_id: Option<String>) -> Self {
        self.voice_id = voice_id;
        self
    }
}

#[async_trait]
impl VoiceSynthesizer for FileVoiceSynthesizer {
    fn name(&self) -> &str {
        self.tts.name()
    }

    async fn synthesize(
        &self,
        text: &str,
        emotion: &EmotionSignal,
    ) -> Result<AudioHandle, CollaboratorError> {
        let request = VoiceRequest {
            voice_id: self.voice_id.clone(),
            style: VoiceStyle::for_emotion(emotion.primary),
            prosody: Prosody::for_emotion(emotion.primary),
        };
        let audio = self
            .tts
            .synthesize(text, &request)
            .await
            .map_err(|e| CollaboratorError::synthesis(e.to_string()))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| CollaboratorError::synthesis(format!("create output dir: {e}")))?;
        let path = self
            .output_dir
            .join(format!("{}.{}", uuid::Uuid::new_v4(), audio.extension()));
        tokio::fs::write(&path, &audio.bytes)
            .await
            .map_err(|e| CollaboratorError::synthesis(format!("write {}: {e}", path.display())))?;

        debug!(path = %path.display(), bytes = audio.bytes.len(), "audio written");
        Ok(AudioHandle::new(format!("file://{}", path.display())))
    }
}
