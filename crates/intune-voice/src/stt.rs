//! Speech-to-text.

use async_trait::async_trait;
use tracing::debug;

use crate::error::VoiceError;

const PROVIDER: &str = "whisper";

/// A transcription returned by a speech-to-text service.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    pub language: Option<String>,
    pub duration_ms: u64,
}

#[async_trait]
pub trait SpeechToText: Send + Sync {
    fn name(&self) -> &str;

    /// Transcribe `audio` encoded as `mime_type`, with an optional
    /// language hint such as `"ko"`.
    async fn transcribe(
        &self,
        audio: &[u8],
        mime_type: &str,
        language: Option<&str>,
    ) -> Result<Transcription, VoiceError>;
}

/// OpenAI Whisper over multipart upload to `{base_url}/audio/transcriptions`.
pub struct WhisperSttProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl WhisperSttProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "whisper-1".into(),
            base_url: "https://api.openai.com/v1".into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn extension_for(mime_type: &str) -> &'static str {
        match mime_type.split(';').next().unwrap_or_default() {
            "audio/webm" => "webm",
            "audio/mp3" | "audio/mpeg" => "mp3",
            "audio/ogg" => "ogg",
            "audio/mp4" | "audio/m4a" => "m4a",
            _ => "wav",
        }
    }
}

#[async_trait]
impl SpeechToText for WhisperSttProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn transcribe(
        &self,
        audio: &[u8],
        mime_type: &str,
        language: Option<&str>,
    ) -> Result<Transcription, VoiceError> {
        let file_part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(format!("audio.{}", Self::extension_for(mime_type)))
            .mime_str(mime_type)
            .map_err(|e| VoiceError::InvalidResponse {
                provider: PROVIDER,
                reason: format!("bad mime type {mime_type}: {e}"),
            })?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");
        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        debug!(bytes = audio.len(), model = %self.model, "sending transcription request");

        let url = format!("{}/audio/transcriptions", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|source| VoiceError::Request {
                provider: PROVIDER,
                source,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(VoiceError::Status {
                provider: PROVIDER,
                status,
                body,
            });
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| VoiceError::InvalidResponse {
            provider: PROVIDER,
            reason: e.to_string(),
        })?;
        let text = body["text"]
            .as_str()
            .ok_or_else(|| VoiceError::InvalidResponse {
                provider: PROVIDER,
                reason: "missing text field".into(),
            })?
            .trim()
            .to_string();

        Ok(Transcription {
            text,
            language: body["language"].as_str().map(String::from),
            duration_ms: (body["duration"].as_f64().unwrap_or(0.0) * 1000.0) as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_defaults() {
        let provider = WhisperSttProvider::new("k".into());
        assert_eq!(provider.name(), "whisper");
        assert_eq!(provider.model, "whisper-1");
        assert_eq!(provider.with_model("whisper-2").model, "whisper-2");
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(WhisperSttProvider::extension_for("audio/wav"), "wav");
        assert_eq!(WhisperSttProvider::extension_for("audio/webm;codecs=opus"), "webm");
        assert_eq!(WhisperSttProvider::extension_for("audio/mpeg"), "mp3");
        assert_eq!(WhisperSttProvider::extension_for("audio/ogg;codecs=opus"), "ogg");
        assert_eq!(WhisperSttProvider::extension_for("application/octet-stream"), "wav");
    }
}
