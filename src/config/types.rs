// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Defines the structure of file-level and resolved configuration,
//! supporting JSON and YAML formats.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::{EngineConfig, ZoneBonus, DEFAULT_MIN_BATTERY, DEFAULT_WAIT_ESTIMATE_SECS};
use crate::error::ConfigError;

/// Agent configuration as written in a config file.
/// Every field is optional; unset fields fall through to lower layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFileConfig {
    /// Minimum battery percentage for assignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_battery: Option<f64>,

    /// Seconds reported in wait decisions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_estimate_secs: Option<f64>,

    /// Per-zone restock penalties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_bonus: Option<ZoneBonusConfig>,

    /// Log every protocol line at trace level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_messages: Option<bool>,

    /// Unix socket to connect to instead of stdio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_path: Option<PathBuf>,
}

/// Partial zone bonus table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBonusConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hot: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<f64>,
}

impl ZoneBonusConfig {
    /// Overlay the set fields onto `base`.
    pub fn apply_to(&self, base: &mut ZoneBonus) {
        if let Some(v) = self.hot {
            base.hot = v;
        }
        if let Some(v) = self.warm {
            base.warm = v;
        }
        if let Some(v) = self.cold {
            base.cold = v;
        }
        if let Some(v) = self.other {
            base.other = v;
        }
    }
}

/// Fully resolved configuration after merging all layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub min_battery: f64,
    pub wait_estimate_secs: f64,
    pub zone_bonus: ZoneBonus,
    pub log_messages: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_path: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            min_battery: DEFAULT_MIN_BATTERY,
            wait_estimate_secs: DEFAULT_WAIT_ESTIMATE_SECS,
            zone_bonus: ZoneBonus::default(),
            log_messages: false,
            socket_path: None,
        }
    }
}

impl ResolvedConfig {
    /// Engine tunables derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            min_battery: self.min_battery,
            wait_estimate_secs: self.wait_estimate_secs,
            zone_bonus: self.zone_bonus,
        }
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.min_battery) {
            return Err(ConfigError::invalid_value(
                "minBattery",
                format!("{} is not between 0 and 100", self.min_battery),
            ));
        }

        if !self.wait_estimate_secs.is_finite() || self.wait_estimate_secs < 0.0 {
            return Err(ConfigError::invalid_value(
                "waitEstimateSecs",
                format!("{} is not a non-negative number", self.wait_estimate_secs),
            ));
        }

        let bonus = &self.zone_bonus;
        for (zone, value) in [
            ("hot", bonus.hot),
            ("warm", bonus.warm),
            ("cold", bonus.cold),
            ("other", bonus.other),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid_value(
                    format!("zoneBonus.{}", zone),
                    format!("{} is not a non-negative number", value),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine() {
        let config = ResolvedConfig::default();
        assert_eq!(config.engine_config(), EngineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_config_camel_case() {
        let config: AgentFileConfig = serde_json::from_str(
            r#"{"minBattery": 40, "zoneBonus": {"cold": 0.5}, "logMessages": true}"#,
        )
        .unwrap();
        assert_eq!(config.min_battery, Some(40.0));
        assert_eq!(config.zone_bonus.as_ref().and_then(|z| z.cold), Some(0.5));
        assert_eq!(config.log_messages, Some(true));
        assert!(config.wait_estimate_secs.is_none());
    }

    #[test]
    fn test_zone_bonus_partial_overlay() {
        let mut bonus = ZoneBonus::default();
        ZoneBonusConfig {
            warm: Some(0.05),
            ..Default::default()
        }
        .apply_to(&mut bonus);
        assert_eq!(bonus.warm, 0.05);
        assert_eq!(bonus.hot, 0.0);
        assert_eq!(bonus.other, 0.3);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = ResolvedConfig {
            min_battery: 120.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "minBattery"
        ));

        let config = ResolvedConfig {
            wait_estimate_secs: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = ResolvedConfig::default();
        config.zone_bonus.other = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "zoneBonus.other"
        ));
    }
}
