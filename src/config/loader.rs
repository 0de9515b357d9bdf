// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading from files.
//!
//! Handles loading configuration from JSON and YAML files in various locations.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::AgentFileConfig;

/// Config file names to search for (in order).
pub const CONFIG_FILES: &[&str] = &[
    ".warehouse-agent.json",
    ".warehouse-agent/config.json",
    "warehouse-agent.yaml",
];

/// Local config file name (for per-directory overrides).
pub const LOCAL_CONFIG_FILE: &str = ".warehouse-agent.local.json";

/// Global config directory name.
pub const GLOBAL_CONFIG_DIR: &str = ".warehouse-agent";

/// Global config file name.
pub const GLOBAL_CONFIG_FILE: &str = "config.json";

/// Get the global config directory path.
pub fn get_global_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(GLOBAL_CONFIG_DIR))
}

/// Get the global config file path.
pub fn get_global_config_path() -> Option<PathBuf> {
    get_global_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILE))
}

/// Load global configuration from ~/.warehouse-agent/config.json.
pub fn load_global_config() -> Result<Option<AgentFileConfig>, ConfigError> {
    let path = match get_global_config_path() {
        Some(p) => p,
        None => return Ok(None),
    };

    if !path.exists() {
        return Ok(None);
    }

    load_config_file(&path).map(Some)
}

/// Load workspace configuration from the working directory.
///
/// Searches for config files in the following order:
/// 1. .warehouse-agent.json
/// 2. .warehouse-agent/config.json
/// 3. warehouse-agent.yaml
pub fn load_workspace_config(workspace_root: &Path) -> Result<Option<AgentFileConfig>, ConfigError> {
    for filename in CONFIG_FILES {
        let path = workspace_root.join(filename);
        if path.exists() {
            return load_config_file(&path).map(Some);
        }
    }
    Ok(None)
}

/// Load local configuration from .warehouse-agent.local.json.
pub fn load_local_config(workspace_root: &Path) -> Result<Option<AgentFileConfig>, ConfigError> {
    let path = workspace_root.join(LOCAL_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Load a configuration file (JSON or YAML).
pub fn load_config_file(path: &Path) -> Result<AgentFileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::from),
        "json" => serde_json::from_str(&content).map_err(ConfigError::from),
        other => Err(ConfigError::InvalidFormat(format!(
            "{}: unsupported extension '{}'",
            path.display(),
            other
        ))),
    }
}

/// Save configuration to a file in the workspace.
pub fn save_workspace_config(
    workspace_root: &Path,
    config: &AgentFileConfig,
    filename: Option<&str>,
) -> Result<PathBuf, ConfigError> {
    let filename = filename.unwrap_or(CONFIG_FILES[0]);
    let path = workspace_root.join(filename);

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, content)?;

    Ok(path)
}

/// Initialize a new config file spelling out every default.
pub fn init_config(workspace_root: &Path) -> Result<PathBuf, ConfigError> {
    save_workspace_config(workspace_root, &get_default_file_config(), None)
}

/// File config with every field set to its default value.
pub fn get_default_file_config() -> AgentFileConfig {
    let defaults = super::types::ResolvedConfig::default();
    AgentFileConfig {
        min_battery: Some(defaults.min_battery),
        wait_estimate_secs: Some(defaults.wait_estimate_secs),
        zone_bonus: Some(super::types::ZoneBonusConfig {
            hot: Some(defaults.zone_bonus.hot),
            warm: Some(defaults.zone_bonus.warm),
            cold: Some(defaults.zone_bonus.cold),
            other: Some(defaults.zone_bonus.other),
        }),
        log_messages: Some(defaults.log_messages),
        socket_path: None,
    }
}
