//! Configuration schema for the intune pipeline.
//!
//! Every section uses `#[serde(default)]` so an empty JSON object yields a
//! fully populated, valid config. camelCase keys are accepted through
//! aliases in addition to the normalization done by
//! [`config_loader`](crate::config_loader).

mod budget;
mod safety;

pub use budget::LatencyBudget;
pub use safety::{CrisisEmotion, SafetyConfig};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable selecting the collaborator mode.
pub const MODE_ENV: &str = "INTUNE_MODE";

fn default_true() -> bool {
    true
}

/// Whether collaborators are simulated locally or call real services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    #[default]
    #[serde(alias = "mock")]
    Simulation,
    Live,
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineMode::Simulation => f.write_str("simulation"),
            PipelineMode::Live => f.write_str("live"),
        }
    }
}

impl FromStr for PipelineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulation" | "sim" | "mock" => Ok(PipelineMode::Simulation),
            "live" => Ok(PipelineMode::Live),
            other => Err(format!("unknown mode '{other}' (expected simulation or live)")),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub mode: PipelineMode,

    #[serde(default)]
    pub budgets: LatencyBudget,

    /// Turn collaborator stage budgets into hard deadlines.
    #[serde(default, alias = "enforceStageDeadlines")]
    pub enforce_stage_deadlines: bool,

    #[serde(default)]
    pub safety: SafetyConfig,

    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Directory for synthesized audio in live mode.
    /// Defaults to `~/.intune/audio`.
    #[serde(default, alias = "outputDir")]
    pub output_dir: Option<String>,
}

impl PipelineConfig {
    /// Validate budgets and thresholds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.budgets.validate()?;
        self.safety.validate()?;
        Ok(())
    }

    /// Apply `INTUNE_MODE` and `INTUNE_BUDGET_*_MS` from the process
    /// environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply environment-style overrides read through `source`.
    ///
    /// An unrecognized mode is logged and ignored.
    pub fn apply_overrides<F>(&mut self, mut source: F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = source(MODE_ENV) {
            match raw.parse::<PipelineMode>() {
                Ok(mode) => self.mode = mode,
                Err(e) => tracing::warn!(var = MODE_ENV, error = %e, "ignoring mode override"),
            }
        }
        self.budgets.apply_overrides(source);
    }

    /// Environment variables that must be set before a live run.
    pub fn required_credentials(&self) -> Vec<&str> {
        match self.mode {
            PipelineMode::Simulation => Vec::new(),
            PipelineMode::Live => {
                let mut vars = vec![self.models.openai_api_key_env.as_str()];
                if self.models.tts_provider == TtsProvider::ElevenLabs {
                    vars.push(self.models.elevenlabs_api_key_env.as_str());
                }
                vars
            }
        }
    }

    /// Resolved directory for synthesized audio files.
    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(raw) => expand_home(raw),
            None => home_dir()
                .map(|h| h.join(".intune").join("audio"))
                .unwrap_or_else(|| PathBuf::from(".intune/audio")),
        }
    }
}

/// Text-to-speech backend for live mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    #[default]
    ElevenLabs,
    OpenAi,
}

/// Model identifiers and generation settings for live collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_stt_model", alias = "sttModel")]
    pub stt_model: String,

    #[serde(default = "default_llm_model", alias = "llmModel")]
    pub llm_model: String,

    /// Base URL of the OpenAI-compatible chat and audio API.
    #[serde(default = "default_llm_base_url", alias = "llmBaseUrl")]
    pub llm_base_url: String,

    #[serde(default = "default_max_tokens", alias = "maxTokens")]
    pub max_tokens: i32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Retries for transient LLM failures.
    #[serde(default = "default_max_retries", alias = "maxRetries")]
    pub max_retries: u32,

    #[serde(default, alias = "ttsProvider")]
    pub tts_provider: TtsProvider,

    /// TTS model. `None` uses the provider's default.
    #[serde(default, alias = "ttsModel")]
    pub tts_model: Option<String>,

    /// TTS voice. `None` uses the provider's default.
    #[serde(default, alias = "ttsVoiceId")]
    pub tts_voice_id: Option<String>,

    #[serde(default = "default_openai_key_env", alias = "openaiApiKeyEnv")]
    pub openai_api_key_env: String,

    #[serde(default = "default_elevenlabs_key_env", alias = "elevenlabsApiKeyEnv")]
    pub elevenlabs_api_key_env: String,
}

fn default_stt_model() -> String {
    "whisper-1".into()
}
fn default_llm_model() -> String {
    "gpt-4o".into()
}
fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_max_tokens() -> i32 {
    500
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_retries() -> u32 {
    2
}
fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_elevenlabs_key_env() -> String {
    "ELEVENLABS_API_KEY".into()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            stt_model: default_stt_model(),
            llm_model: default_llm_model(),
            llm_base_url: default_llm_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_retries: default_max_retries(),
            tts_provider: TtsProvider::default(),
            tts_model: None,
            tts_voice_id: None,
            openai_api_key_env: default_openai_key_env(),
            elevenlabs_api_key_env: default_elevenlabs_key_env(),
        }
    }
}

/// Behaviour of the simulated collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Sleep for each collaborator's nominal latency.
    #[serde(default = "default_true", alias = "emulateLatency")]
    pub emulate_latency: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            emulate_latency: true,
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(feature = "native")]
    {
        dirs::home_dir()
    }
    #[cfg(not(feature = "native"))]
    {
        None
    }
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, PipelineConfig::default());
        assert_eq!(cfg.mode, PipelineMode::Simulation);
        assert!(!cfg.enforce_stage_deadlines);
        assert!(cfg.simulation.emulate_latency);
        assert_eq!(cfg.models.llm_model, "gpt-4o");
        assert_eq!(cfg.models.max_tokens, 500);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn mode_parses_mock_alias() {
        assert_eq!("mock".parse::<PipelineMode>().unwrap(), PipelineMode::Simulation);
        assert_eq!("LIVE".parse::<PipelineMode>().unwrap(), PipelineMode::Live);
        assert!("turbo".parse::<PipelineMode>().is_err());

        let cfg: PipelineConfig = serde_json::from_str(r#"{"mode": "mock"}"#).unwrap();
        assert_eq!(cfg.mode, PipelineMode::Simulation);
    }

    #[test]
    fn overrides_set_mode_and_budgets() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("INTUNE_MODE", "live"),
            ("INTUNE_BUDGET_SYNTHESIZE_VOICE_MS", "250"),
        ]);
        let mut cfg = PipelineConfig::default();
        cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.mode, PipelineMode::Live);
        assert_eq!(cfg.budgets.synthesize_voice_ms, 250);
    }

    #[test]
    fn bad_mode_override_ignored() {
        let mut cfg = PipelineConfig::default();
        cfg.apply_overrides(|key| (key == MODE_ENV).then(|| "warp".to_string()));
        assert_eq!(cfg.mode, PipelineMode::Simulation);
    }

    #[test]
    fn live_mode_credentials() {
        let mut cfg = PipelineConfig::default();
        assert!(cfg.required_credentials().is_empty());

        cfg.mode = PipelineMode::Live;
        assert_eq!(
            cfg.required_credentials(),
            vec!["OPENAI_API_KEY", "ELEVENLABS_API_KEY"]
        );

        cfg.models.tts_provider = TtsProvider::OpenAi;
        assert_eq!(cfg.required_credentials(), vec!["OPENAI_API_KEY"]);
    }

    #[test]
    fn validate_surfaces_section_errors() {
        let mut cfg = PipelineConfig::default();
        cfg.budgets.transcribe_ms = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidBudget { .. })
        ));
    }

    #[test]
    fn explicit_output_dir_kept() {
        let cfg = PipelineConfig {
            output_dir: Some("/var/tmp/intune".into()),
            ..PipelineConfig::default()
        };
        assert_eq!(cfg.output_dir(), PathBuf::from("/var/tmp/intune"));
    }
}
