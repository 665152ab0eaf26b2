//! Stage trait definitions for the voice care pipeline.
//!
//! Three traits front external collaborators and are async:
//!
//! | Stage | Trait | Fails with |
//! |-------|-------|------------|
//! | transcribe | [`Transcriber`] | `CollaboratorError::Transcription` |
//! | generate_reply | [`ReplyGenerator`] | `CollaboratorError::Generation` |
//! | synthesize_voice | [`VoiceSynthesizer`] | `CollaboratorError::Synthesis` |
//!
//! [`EmotionDetector`] and [`Sanitizer`] are local and total. The safety
//! stage has no trait at all; it is always the built-in
//! [`RiskScorer`](super::risk::RiskScorer).

use async_trait::async_trait;

use intune_types::{
    AudioHandle, CollaboratorError, EmotionSignal, Exchange, RiskAssessment, Utterance,
};

/// Speech (or passthrough text) to transcript.
#[async_trait]
pub trait Transcriber: Send + Sync {
    fn name(&self) -> &str;

    async fn transcribe(&self, utterance: &Utterance) -> Result<String, CollaboratorError>;
}

/// What a reply generator gets to work with.
#[derive(Debug, Clone, Copy)]
pub struct ReplyContext<'a> {
    pub transcript: &'a str,
    pub emotion: &'a EmotionSignal,
    pub risk: &'a RiskAssessment,
    pub history: &'a [Exchange],
}

/// Produces a candidate reply.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, context: &ReplyContext<'_>) -> Result<String, CollaboratorError>;
}

/// Voices the final reply.
#[async_trait]
pub trait VoiceSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    async fn synthesize(
        &self,
        text: &str,
        emotion: &EmotionSignal,
    ) -> Result<AudioHandle, CollaboratorError>;
}

/// Local emotion detection. Never fails; returns neutral with zero
/// confidence when nothing matches.
pub trait EmotionDetector: Send + Sync {
    fn detect(&self, text: &str) -> EmotionSignal;
}

/// Post-processing of a generated reply. Pure and total.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, text: &str) -> String;
}
