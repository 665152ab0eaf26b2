//! Pipeline construction from a [`PipelineConfig`].
//!
//! The collaborator mode is decided here, once. Simulation mode wires the
//! offline adapters from [`crate::simulated`]; live mode wires the cloud
//! clients from [`crate::live`] after checking that every credential the
//! config names is present.
//!
//! ```rust,ignore
//! use intune_core::build_pipeline;
//! use intune_types::{PipelineConfig, Utterance};
//!
//! let pipeline = build_pipeline(&PipelineConfig::default())?;
//! let result = pipeline.run(&Utterance::new("요즘 잠을 못 자요")).await?;
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use intune_llm::{LlmProviderConfig, OpenAiCompatProvider, RetryConfig, RetryPolicy};
use intune_types::config::TtsProvider;
use intune_types::{ConfigError, PipelineConfig, PipelineMode};
use intune_voice::{ElevenLabsTtsProvider, OpenAiTtsProvider, TextToSpeech, WhisperSttProvider};

use crate::live::{FileVoiceSynthesizer, LlmReplyGenerator, SpeechTranscriber};
use crate::pipeline::{Collaborators, Pipeline};
use crate::simulated::{CannedReplyGenerator, SimulatedSynthesizer, SimulatedTranscriber};

/// Build a pipeline, reading credentials from the process environment.
pub fn build_pipeline(config: &PipelineConfig) -> Result<Pipeline, ConfigError> {
    build_pipeline_with_env(config, |key| std::env::var(key).ok())
}

/// Build a pipeline, reading credentials through `env`.
pub fn build_pipeline_with_env<F>(
    config: &PipelineConfig,
    mut env: F,
) -> Result<Pipeline, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
{
    let collaborators = match config.mode {
        PipelineMode::Simulation => simulated_collaborators(config),
        PipelineMode::Live => live_collaborators(config, &mut env)?,
    };
    info!(
        mode = %config.mode,
        transcriber = collaborators.transcriber.name(),
        generator = collaborators.generator.name(),
        synthesizer = collaborators.synthesizer.name(),
        "pipeline ready"
    );
    Pipeline::new(collaborators, config)
}

fn simulated_collaborators(config: &PipelineConfig) -> Collaborators {
    let emulate = config.simulation.emulate_latency;
    debug!(emulate_latency = emulate, "using simulated collaborators");
    Collaborators {
        transcriber: Arc::new(SimulatedTranscriber::new(emulate)),
        generator: Arc::new(CannedReplyGenerator::new(emulate)),
        synthesizer: Arc::new(SimulatedSynthesizer::new(emulate)),
    }
}

fn live_collaborators<F>(config: &PipelineConfig, env: &mut F) -> Result<Collaborators, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
{
    let models = &config.models;
    let mut credential = |var: &str| {
        env(var)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredential { var: var.into() })
    };

    // Check every required key before building anything.
    for var in config.required_credentials() {
        credential(var)?;
    }
    let openai_key = credential(&models.openai_api_key_env)?;

    let stt = WhisperSttProvider::new(openai_key.clone())
        .with_model(models.stt_model.clone())
        .with_base_url(models.llm_base_url.clone());

    let llm_config = LlmProviderConfig::custom(
        "openai",
        models.llm_base_url.clone(),
        models.openai_api_key_env.clone(),
    );
    let chat = RetryPolicy::new(
        OpenAiCompatProvider::with_api_key(llm_config, openai_key.clone()),
        RetryConfig::default().with_max_retries(models.max_retries),
    );
    let generator = LlmReplyGenerator::new(Arc::new(chat), models.llm_model.clone())
        .with_max_tokens(models.max_tokens)
        .with_temperature(models.temperature);

    let tts: Arc<dyn TextToSpeech> = match models.tts_provider {
        TtsProvider::ElevenLabs => {
            let key = credential(&models.elevenlabs_api_key_env)?;
            let mut provider = ElevenLabsTtsProvider::new(key);
            if let Some(model) = &models.tts_model {
                provider = provider.with_model(model.clone());
            }
            Arc::new(provider)
        }
        TtsProvider::OpenAi => {
            let mut provider =
                OpenAiTtsProvider::new(openai_key).with_base_url(models.llm_base_url.clone());
            if let Some(model) = &models.tts_model {
                provider = provider.with_model(model.clone());
            }
            Arc::new(provider)
        }
    };
    let synthesizer = FileVoiceSynthesizer::new(tts, config.output_dir())
        .with_voice_id(models.tts_voice_id.clone());

    debug!(
        llm_model = %models.llm_model,
        tts_provider = ?models.tts_provider,
        "using live collaborators"
    );
    Ok(Collaborators {
        transcriber: Arc::new(SpeechTranscriber::new(Arc::new(stt))),
        generator: Arc::new(generator),
        synthesizer: Arc::new(synthesizer),
    })
}
