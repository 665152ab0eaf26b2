//! Cloud speech clients for intune.
//!
//! - [`stt`]: [`SpeechToText`] and the Whisper implementation
//! - [`tts`]: [`TextToSpeech`] with ElevenLabs and OpenAI implementations
//! - [`style`]: emotion to voice style and prosody tables

pub mod error;
pub mod stt;
pub mod style;
pub mod tts;

pub use error::{Result, VoiceError};
pub use stt::{SpeechToText, Transcription, WhisperSttProvider};
pub use style::{Prosody, VoiceStyle};
pub use tts::{ElevenLabsTtsProvider, OpenAiTtsProvider, SynthesizedAudio, TextToSpeech, VoiceRequest};
