use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BallotsConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let substituted = substitution::substitute_env_vars(&content)?;

    // An empty document means "all defaults"
    let mut config: BallotsConfig = if substituted.content.trim().is_empty() {
        BallotsConfig::default()
    } else {
        serde_yaml::from_str(&substituted.content)
            .with_context(|| "Failed to parse YAML configuration")?
    };
    config.unresolved_env_vars = substituted.missing;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Load `path`, or fall back to defaults when the file does not exist.
///
/// A file that exists but cannot be parsed is still an error.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<BallotsConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("Config file {:?} not found, using defaults", path);
        return Ok(BallotsConfig::default());
    }
    load_config(path)
}

#[instrument]
pub fn generate_default_config() -> BallotsConfig {
    BallotsConfig {
        auth: AuthConfig {
            api_key: "${BALLOTS_API_KEY}".to_string(),
        },
        ..BallotsConfig::default()
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &BallotsConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}
