//! Text-to-speech.
//!
//! [`TextToSpeech`] takes the reply text plus a [`VoiceRequest`] carrying
//! the style and prosody derived from the caller's emotion. Each provider
//! maps prosody onto whatever knobs its API exposes.

use async_trait::async_trait;
use tracing::debug;

use crate::error::VoiceError;
use crate::style::{Prosody, VoiceStyle};

/// Voice parameters for one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceRequest {
    /// Provider-specific voice. `None` uses the provider default.
    pub voice_id: Option<String>,
    pub style: VoiceStyle,
    pub prosody: Prosody,
}

#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl SynthesizedAudio {
    /// File extension matching `mime_type`.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "audio/wav" | "audio/x-wav" => "wav",
            "audio/ogg" => "ogg",
            _ => "mp3",
        }
    }
}

#[async_trait]
pub trait TextToSpeech: Send + Sync {
    fn name(&self) -> &str;

    async fn synthesize(&self, text: &str, voice: &VoiceRequest) -> Result<SynthesizedAudio, VoiceError>;
}

async fn read_audio(
    provider: &'static str,
    resp: reqwest::Response,
    mime_type: &str,
) -> Result<SynthesizedAudio, VoiceError> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(VoiceError::Status {
            provider,
            status,
            body,
        });
    }
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| VoiceError::InvalidResponse {
            provider,
            reason: e.to_string(),
        })?
        .to_vec();
    if bytes.is_empty() {
        return Err(VoiceError::InvalidResponse {
            provider,
            reason: "empty audio body".into(),
        });
    }
    Ok(SynthesizedAudio {
        bytes,
        mime_type: mime_type.to_string(),
    })
}

// ── ElevenLabs ──────────────────────────────────────────────────────────

const ELEVENLABS: &str = "elevenlabs";

/// ElevenLabs `text-to-speech/{voice_id}` with `xi-api-key` auth.
///
/// Prosody maps onto `voice_settings`: rate becomes `speed`, emphasis
/// lowers `stability` and raises `style`.
pub struct ElevenLabsTtsProvider {
    api_key: String,
    model: String,
    default_voice: String,
    base_url: String,
    client: reqwest::Client,
}

impl ElevenLabsTtsProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "eleven_multilingual_v2".into(),
            default_voice: "21m00Tcm4TlvDq8ikWAM".into(),
            base_url: "https://api.elevenlabs.io/v1".into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_default_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.default_voice = voice_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_body(&self, text: &str, prosody: &Prosody) -> serde_json::Value {
        serde_json::json!({
            "text": text,
            "model_id": self.model,
            "voice_settings": {
                "stability": (1.0 - prosody.emphasis * 0.5).clamp(0.0, 1.0),
                "similarity_boost": 0.75,
                "style": prosody.emphasis.clamp(0.0, 1.0),
                "speed": prosody.rate,
            },
        })
    }
}

#[async_trait]
impl TextToSpeech for ElevenLabsTtsProvider {
    fn name(&self) -> &str {
        ELEVENLABS
    }

    async fn synthesize(&self, text: &str, voice: &VoiceRequest) -> Result<SynthesizedAudio, VoiceError> {
        let voice_id = voice.voice_id.as_deref().unwrap_or(&self.default_voice);
        let url = format!(
            "{}/text-to-speech/{voice_id}",
            self.base_url.trim_end_matches('/')
        );
        debug!(voice_id, style = %voice.style, "sending elevenlabs synthesis request");

        let resp = self
            .client
            .post(url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&self.request_body(text, &voice.prosody))
            .send()
            .await
            .map_err(|source| VoiceError::Request {
                provider: ELEVENLABS,
                source,
            })?;

        read_audio(ELEVENLABS, resp, "audio/mpeg").await
    }
}

// ── OpenAI ──────────────────────────────────────────────────────────────

const OPENAI_TTS: &str = "openai-tts";

/// OpenAI `audio/speech`. Only the speaking rate is adjustable.
pub struct OpenAiTtsProvider {
    api_key: String,
    model: String,
    default_voice: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiTtsProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "tts-1".into(),
            default_voice: "nova".into(),
            base_url: "https://api.openai.com/v1".into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_default_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.default_voice = voice_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TextToSpeech for OpenAiTtsProvider {
    fn name(&self) -> &str {
        OPENAI_TTS
    }

    async fn synthesize(&self, text: &str, voice: &VoiceRequest) -> Result<SynthesizedAudio, VoiceError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": voice.voice_id.as_deref().unwrap_or(&self.default_voice),
            "response_format": "mp3",
            // API accepts 0.25..=4.0
            "speed": voice.prosody.rate.clamp(0.25, 4.0),
        });
        let url = format!("{}/audio/speech", self.base_url.trim_end_matches('/'));

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| VoiceError::Request {
                provider: OPENAI_TTS,
                source,
            })?;

        read_audio(OPENAI_TTS, resp, "audio/mpeg").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intune_types::Emotion;

    #[test]
    fn elevenlabs_body_reflects_prosody() {
        let provider = ElevenLabsTtsProvider::new("k".into());
        let body = provider.request_body("안녕하세요", &Prosody::for_emotion(Emotion::Crisis));

        assert_eq!(body["model_id"], "eleven_multilingual_v2");
        let settings = &body["voice_settings"];
        let stability = settings["stability"].as_f64().unwrap();
        assert!((stability - 0.55).abs() < 1e-6);
        let speed = settings["speed"].as_f64().unwrap();
        assert!((speed - 0.9).abs() < 1e-6);
    }

    #[test]
    fn provider_names() {
        assert_eq!(ElevenLabsTtsProvider::new("k".into()).name(), "elevenlabs");
        assert_eq!(OpenAiTtsProvider::new("k".into()).name(), "openai-tts");
    }

    #[test]
    fn extension_from_mime() {
        let audio = SynthesizedAudio {
            bytes: vec![1],
            mime_type: "audio/mpeg".into(),
        };
        assert_eq!(audio.extension(), "mp3");
    }
}
