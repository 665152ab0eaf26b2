//! # intune-types
//!
//! Core type definitions for the intune voice care pipeline.
//!
//! Every other intune crate depends on this one. It contains:
//!
//! - **[`error`]** -- [`PipelineError`], [`CollaboratorError`] and [`ConfigError`]
//! - **[`config`]** -- [`PipelineConfig`] and its sections
//! - **[`config_loader`]** -- config file discovery and key normalization
//! - **[`utterance`]** -- the caller's input and conversation window
//! - **[`risk`]** -- risk tiers, interventions and the assessment record
//! - **[`emotion`]** -- the emotion vocabulary and cultural affect scores
//! - **[`timing`]** -- pipeline stages and per-stage elapsed time
//! - **[`result`]** -- the aggregated [`PipelineResult`]

pub mod config;
pub mod config_loader;
pub mod emotion;
pub mod error;
pub mod result;
pub mod risk;
pub mod timing;
pub mod utterance;

pub use config::{PipelineConfig, PipelineMode};
pub use emotion::{CulturalAffect, Emotion, EmotionSignal};
pub use error::{CollaboratorError, ConfigError, PipelineError, Result};
pub use result::{AudioHandle, PipelineResult};
pub use risk::{CrisisResource, Intervention, LayerScores, RiskAssessment, RiskTier};
pub use timing::{Stage, StageTiming};
pub use utterance::{Exchange, Utterance};
