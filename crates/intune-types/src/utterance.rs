//! Caller input for a single pipeline run.

use serde::{Deserialize, Serialize};

/// Maximum number of prior exchanges kept as conversation context.
pub const MAX_HISTORY: usize = 5;

/// One prior user/assistant exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Input text plus a rolling window of prior exchanges.
///
/// The window is capped at [`MAX_HISTORY`] on construction; older
/// exchanges are dropped from the front, including when deserializing.
/// Once built an utterance is not mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUtterance")]
pub struct Utterance {
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    history: Vec<Exchange>,
    #[serde(default, skip_serializing)]
    audio: Option<Vec<u8>>,
}

/// Wire shape of an [`Utterance`] before the history cap is applied.
#[derive(Deserialize)]
struct RawUtterance {
    text: String,
    #[serde(default)]
    history: Vec<Exchange>,
    #[serde(default)]
    audio: Option<Vec<u8>>,
}

impl From<RawUtterance> for Utterance {
    fn from(raw: RawUtterance) -> Self {
        let utterance = Utterance::new(raw.text).with_history(raw.history);
        match raw.audio {
            Some(audio) => utterance.with_audio(audio),
            None => utterance,
        }
    }
}

impl Utterance {
    /// Text-only utterance with no history.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            history: Vec::new(),
            audio: None,
        }
    }

    /// Attach prior exchanges, keeping only the most recent [`MAX_HISTORY`].
    pub fn with_history(mut self, history: impl IntoIterator<Item = Exchange>) -> Self {
        let mut history: Vec<Exchange> = history.into_iter().collect();
        if history.len() > MAX_HISTORY {
            history.drain(..history.len() - MAX_HISTORY);
        }
        self.history = history;
        self
    }

    /// Attach a recorded audio clip for the transcriber.
    pub fn with_audio(mut self, audio: Vec<u8>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    pub fn audio(&self) -> Option<&[u8]> {
        self.audio.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_capped_to_most_recent() {
        let exchanges = (0..8).map(|i| Exchange::new(format!("u{i}"), format!("a{i}")));
        let utterance = Utterance::new("hi").with_history(exchanges);

        assert_eq!(utterance.history().len(), MAX_HISTORY);
        assert_eq!(utterance.history()[0].user, "u3");
        assert_eq!(utterance.history()[4].assistant, "a7");
    }

    #[test]
    fn deserialized_history_is_capped() {
        let history: Vec<serde_json::Value> = (0..8)
            .map(|i| serde_json::json!({"user": format!("u{i}"), "assistant": format!("a{i}")}))
            .collect();
        let json = serde_json::json!({"text": "hi", "history": history}).to_string();

        let utterance: Utterance = serde_json::from_str(&json).unwrap();
        assert_eq!(utterance.text(), "hi");
        assert_eq!(utterance.history().len(), MAX_HISTORY);
        assert_eq!(utterance.history()[0].user, "u3");
        assert_eq!(utterance.history()[4].assistant, "a7");
    }

    #[test]
    fn deserialize_without_history() {
        let utterance: Utterance = serde_json::from_str(r#"{"text": "안녕"}"#).unwrap();
        assert!(utterance.history().is_empty());
        assert!(utterance.audio().is_none());
    }

    #[test]
    fn short_history_kept_whole() {
        let utterance = Utterance::new("hi").with_history(vec![Exchange::new("a", "b")]);
        assert_eq!(utterance.history().len(), 1);
    }

    #[test]
    fn audio_is_optional() {
        let plain = Utterance::new("hi");
        assert!(plain.audio().is_none());

        let voiced = Utterance::new("hi").with_audio(vec![0, 1, 2]);
        assert_eq!(voiced.audio(), Some(&[0u8, 1, 2][..]));
    }
}
