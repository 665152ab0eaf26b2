//! Five-stage voice care pipeline.
//!
//! Stages: Transcribe -> AssessSafety -> GenerateReply -> Sanitize -> SynthesizeVoice
//!
//! A critical risk assessment skips GenerateReply and Sanitize and voices
//! the fixed emergency reply instead.

pub mod traits;
pub mod lexicon;
pub mod risk;
pub mod escalation;
pub mod emotion;
pub mod selector;
pub mod sanitizer;
pub mod budget;
pub mod orchestrator;

pub use orchestrator::{Collaborators, Pipeline};
