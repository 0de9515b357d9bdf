// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration module for the warehouse agent.
//!
//! Handles loading, merging, and validation of configuration from multiple sources:
//! - Global config: ~/.warehouse-agent/config.json
//! - Workspace config: .warehouse-agent.json, .warehouse-agent/config.json, or
//!   warehouse-agent.yaml (replaced by `--config PATH` when given)
//! - Local config: .warehouse-agent.local.json (for personal overrides)
//! - CLI options: command-line arguments
//!
//! Configuration is merged with precedence (CLI > local > workspace > global > defaults).

mod loader;
mod merger;
mod types;

pub use loader::{
    get_default_file_config, get_global_config_dir, get_global_config_path, init_config,
    load_config_file, load_global_config, load_local_config, load_workspace_config,
    save_workspace_config, CONFIG_FILES, GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILE, LOCAL_CONFIG_FILE,
};

pub use merger::{default_config, merge_config, CliOptions};

pub use types::{AgentFileConfig, ResolvedConfig, ZoneBonusConfig};

use crate::error::ConfigError;
use std::path::Path;

/// Load, merge, and validate all configuration sources for a workspace.
///
/// An explicit `config_path` must exist and takes the workspace slot.
pub fn load_config(
    workspace_root: &Path,
    config_path: Option<&Path>,
    cli_options: CliOptions,
) -> Result<ResolvedConfig, ConfigError> {
    let global = load_global_config()?;
    let workspace = match config_path {
        Some(path) => Some(load_config_file(path)?),
        None => load_workspace_config(workspace_root)?,
    };
    let local = load_local_config(workspace_root)?;

    let config = merge_config(global, workspace, local, cli_options);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_with_no_files() {
        let temp = TempDir::new().unwrap();
        let result = load_config(temp.path(), None, CliOptions::default());
        // Global config may exist on the host; it only has to validate.
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_config_with_workspace_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".warehouse-agent.json"),
            r#"{"minBattery": 42, "waitEstimateSecs": 7.5}"#,
        )
        .unwrap();

        let config = load_config(temp.path(), None, CliOptions::default()).unwrap();
        assert_eq!(config.min_battery, 42.0);
        assert_eq!(config.wait_estimate_secs, 7.5);
    }

    #[test]
    fn test_explicit_config_path_replaces_workspace() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".warehouse-agent.json"), r#"{"minBattery": 42}"#).unwrap();
        let explicit = temp.path().join("custom.yaml");
        std::fs::write(&explicit, "minBattery: 65\n").unwrap();

        let config = load_config(temp.path(), Some(&explicit), CliOptions::default()).unwrap();
        assert_eq!(config.min_battery, 65.0);
    }

    #[test]
    fn test_explicit_config_path_missing() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.json");
        let result = load_config(temp.path(), Some(&missing), CliOptions::default());
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_config_cli_override() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".warehouse-agent.json"), r#"{"minBattery": 42}"#).unwrap();

        let cli = CliOptions {
            min_battery: Some(10.0),
            ..Default::default()
        };

        let config = load_config(temp.path(), None, cli).unwrap();
        assert_eq!(config.min_battery, 10.0);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".warehouse-agent.local.json"), r#"{"minBattery": 150}"#)
            .unwrap();

        let result = load_config(temp.path(), None, CliOptions::default());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
