// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging.
//!
//! Handles merging configurations from different sources with proper precedence.

use std::path::PathBuf;

use super::types::{AgentFileConfig, ResolvedConfig};

/// CLI options that can override configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub min_battery: Option<f64>,
    pub wait_estimate_secs: Option<f64>,
    pub log_messages: Option<bool>,
    pub socket_path: Option<PathBuf>,
}

/// Default configuration values.
pub fn default_config() -> ResolvedConfig {
    ResolvedConfig::default()
}

/// Merge multiple configurations with precedence.
///
/// Precedence (highest to lowest):
/// 1. CLI options
/// 2. Local config (.warehouse-agent.local.json)
/// 3. Workspace config (.warehouse-agent.json or `--config`)
/// 4. Global config (~/.warehouse-agent/config.json)
/// 5. Default values
pub fn merge_config(
    global: Option<AgentFileConfig>,
    workspace: Option<AgentFileConfig>,
    local: Option<AgentFileConfig>,
    cli: CliOptions,
) -> ResolvedConfig {
    let mut result = default_config();

    for config in [global, workspace, local].iter().flatten() {
        apply_file_config(&mut result, config);
    }

    // CLI has the final say
    apply_cli_options(&mut result, &cli);

    result
}

fn apply_file_config(result: &mut ResolvedConfig, config: &AgentFileConfig) {
    if let Some(min_battery) = config.min_battery {
        result.min_battery = min_battery;
    }

    if let Some(wait) = config.wait_estimate_secs {
        result.wait_estimate_secs = wait;
    }

    if let Some(ref bonus) = config.zone_bonus {
        bonus.apply_to(&mut result.zone_bonus);
    }

    if let Some(log_messages) = config.log_messages {
        result.log_messages = log_messages;
    }

    if config.socket_path.is_some() {
        result.socket_path = config.socket_path.clone();
    }
}

fn apply_cli_options(result: &mut ResolvedConfig, cli: &CliOptions) {
    if let Some(min_battery) = cli.min_battery {
        result.min_battery = min_battery;
    }

    if let Some(wait) = cli.wait_estimate_secs {
        result.wait_estimate_secs = wait;
    }

    if let Some(log_messages) = cli.log_messages {
        result.log_messages = log_messages;
    }

    if cli.socket_path.is_some() {
        result.socket_path = cli.socket_path.clone();
    }
}
