//! Configuration file discovery and loading.
//!
//! The discovery order is:
//! 1. An explicit path (the CLI `--config` flag).
//! 2. `INTUNE_CONFIG` environment variable.
//! 3. `~/.intune/config.json`
//! 4. If none found, an empty JSON object (all defaults).
//!
//! JSON keys are normalized from camelCase to snake_case before
//! deserializing. Environment overrides are applied after the file and the
//! result is validated before it is returned.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::PipelineConfig;
use crate::error::ConfigError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "INTUNE_CONFIG";

/// Discover the config file path.
///
/// `CONFIG_ENV` wins outright, even if the file does not exist; the loader
/// then falls back to defaults. Otherwise `~/.intune/config.json` is used
/// when present.
pub fn discover_config_path<F>(mut env: F, home_dir: Option<PathBuf>) -> Option<PathBuf>
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(env_path) = env(CONFIG_ENV) {
        return Some(PathBuf::from(env_path));
    }

    let candidate = home_dir?.join(".intune").join("config.json");
    candidate.exists().then_some(candidate)
}

/// Read a config file into normalized JSON.
///
/// A discovered path that does not exist yields an empty object.
pub fn load_config_raw(path: Option<&Path>) -> Result<Value, ConfigError> {
    let Some(path) = path else {
        tracing::info!("no config file found, using defaults");
        return Ok(Value::Object(serde_json::Map::new()));
    };

    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "config path does not exist, using defaults"
        );
        return Ok(Value::Object(serde_json::Map::new()));
    }

    tracing::debug!(path = %path.display(), "loading config file");
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(normalize_keys(value))
}

/// Resolve, parse, override and validate the pipeline config.
///
/// An explicit `path_override` must exist.
pub fn load_config(path_override: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    let path = match path_override {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::Io {
                    path: p.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
                });
            }
            Some(p.to_path_buf())
        }
        None => discover_config_path(|key| std::env::var(key).ok(), home_dir()),
    };

    let raw = load_config_raw(path.as_deref())?;
    let mut config = config_from_value(raw, path.as_deref())?;
    config.apply_env();
    config.validate()?;
    Ok(config)
}

/// Deserialize normalized JSON into a [`PipelineConfig`].
pub fn config_from_value(raw: Value, origin: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    serde_json::from_value(raw).map_err(|source| ConfigError::Parse {
        path: origin.map(Path::to_path_buf).unwrap_or_default(),
        source,
    })
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

/// Convert camelCase JSON keys to snake_case recursively.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (camel_to_snake(&key), normalize_keys(val)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Convert a single camelCase string to snake_case.
///
/// Acronym runs stay together: `"HTMLParser"` becomes `"html_parser"`.
///
/// # Examples
/// ```
/// # use intune_types::config_loader::camel_to_snake;
/// assert_eq!(camel_to_snake("totalTargetMs"), "total_target_ms");
/// assert_eq!(camel_to_snake("already_snake"), "already_snake");
/// assert_eq!(camel_to_snake("ttsVoiceID"), "tts_voice_id");
/// ```
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next.is_some_and(|c| c.is_lowercase()))
            {
                result.push('_');
            }
        }
        result.push(ch.to_ascii_lowercase());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn camel_to_snake_cases() {
        assert_eq!(camel_to_snake("escalationThreshold"), "escalation_threshold");
        assert_eq!(camel_to_snake("model"), "model");
        assert_eq!(camel_to_snake("HTMLParser"), "html_parser");
        assert_eq!(camel_to_snake("emulateLatency"), "emulate_latency");
    }

    #[test]
    fn normalize_nested_objects() {
        let input = json!({
            "budgets": { "totalTargetMs": 800 },
            "safety": { "crisisEmotion": "detected", "escalationThreshold": 0.85 }
        });
        let out = normalize_keys(input);
        assert_eq!(out["budgets"]["total_target_ms"], 800);
        assert_eq!(out["safety"]["crisis_emotion"], "detected");
    }

    #[test]
    fn env_var_wins_discovery() {
        let found = discover_config_path(
            |key| (key == CONFIG_ENV).then(|| "/etc/intune.json".to_string()),
            Some(PathBuf::from("/home/nobody")),
        );
        assert_eq!(found, Some(PathBuf::from("/etc/intune.json")));
    }

    #[test]
    fn home_fallback_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config_path(|_| None, Some(dir.path().to_path_buf())).is_none());

        std::fs::create_dir_all(dir.path().join(".intune")).unwrap();
        std::fs::write(dir.path().join(".intune/config.json"), "{}").unwrap();
        assert_eq!(
            discover_config_path(|_| None, Some(dir.path().to_path_buf())),
            Some(dir.path().join(".intune/config.json"))
        );
    }

    #[test]
    fn missing_discovered_path_yields_empty_object() {
        let raw = load_config_raw(Some(Path::new("/tmp/.intune-nonexistent-config.json"))).unwrap();
        assert_eq!(raw, json!({}));
        assert_eq!(load_config_raw(None).unwrap(), json!({}));
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"budgets": {{"generateReplyMs": 320}}, "simulation": {{"emulateLatency": false}}}}"#
        )
        .unwrap();

        let cfg = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.budgets.generate_reply_ms, 320);
        assert!(!cfg.simulation.emulate_latency);
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let err = load_config(Some(Path::new("/tmp/.intune-does-not-exist.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_config_raw(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn invalid_thresholds_fail_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"safety": {{"escalationThreshold": 0.5}}}}"#).unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThresholds { .. }));
    }
}
