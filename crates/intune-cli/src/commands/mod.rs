//! CLI command implementations for `intune`.
//!
//! - [`run`] -- Run one utterance and print the result.
//! - [`bench`] -- Repeat runs and report latency percentiles.
//! - [`config_cmd`] -- Show the resolved configuration.

pub mod bench;
pub mod config_cmd;
pub mod run;

use std::path::Path;

use intune_types::{PipelineConfig, PipelineMode};

/// Load configuration from the given path override or via auto-discovery.
///
/// Without an override the loader checks `INTUNE_CONFIG`, then
/// `~/.intune/config.json`, then falls back to defaults. Environment
/// overrides are applied and the result is validated.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<PipelineConfig> {
    let config = intune_types::config_loader::load_config(config_override.map(Path::new))?;
    Ok(config)
}

/// Load configuration, then apply the `--mode` and `--no-latency` flags.
pub fn load_run_config(
    config_override: Option<&str>,
    mode: Option<PipelineMode>,
    no_latency: bool,
) -> anyhow::Result<PipelineConfig> {
    let mut config = load_config(config_override)?;
    if let Some(mode) = mode {
        config.mode = mode;
    }
    if no_latency {
        config.simulation.emulate_latency = false;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_override_is_an_error() {
        let err = load_config(Some("/tmp/.intune-test-definitely-missing.json")).unwrap_err();
        assert!(err.to_string().contains("definitely-missing"));
    }

    #[test]
    fn override_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"budgets": {{"totalTargetMs": 900}}}}"#).unwrap();
        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.budgets.total_target_ms, 900);
    }

    #[test]
    fn run_flags_override_config() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"mode": "live"}"#).unwrap();
        let config =
            load_run_config(file.path().to_str(), Some(PipelineMode::Simulation), true).unwrap();
        assert_eq!(config.mode, PipelineMode::Simulation);
        assert!(!config.simulation.emulate_latency);
    }
}
