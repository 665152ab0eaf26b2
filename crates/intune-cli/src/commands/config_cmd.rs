//! `intune config` -- display resolved configuration.
//!
//! ```text
//! intune config show
//! intune config section budgets
//! intune config section safety -c ./intune.json
//! ```

use anyhow::bail;
use intune_types::PipelineConfig;

/// Display the resolved configuration as formatted JSON.
pub fn config_show(config: &PipelineConfig) {
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: failed to serialize config: {e}"),
    }
}

/// Display one configuration section. Unknown names list the valid ones.
pub fn config_section(config: &PipelineConfig, section: &str) -> anyhow::Result<()> {
    let value = serde_json::to_value(config)?;
    match value.get(section) {
        Some(v) => {
            println!("{}", serde_json::to_string_pretty(v)?);
            Ok(())
        }
        None => {
            let available: Vec<&str> = value
                .as_object()
                .map(|m| m.keys().map(|k| k.as_str()).collect())
                .unwrap_or_default();
            bail!(
                "unknown section '{section}' (available sections: {})",
                available.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_show_does_not_panic() {
        config_show(&PipelineConfig::default());
    }

    #[test]
    fn config_section_valid() {
        assert!(config_section(&PipelineConfig::default(), "budgets").is_ok());
    }

    #[test]
    fn config_section_invalid_lists_sections() {
        let err = config_section(&PipelineConfig::default(), "nonexistent").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nonexistent"));
        assert!(msg.contains("budgets"));
    }
}
