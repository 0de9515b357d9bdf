// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry initialization and configuration.
//!
//! Diagnostics always go to stderr; stdout may be the protocol channel.

use std::io;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crate target used in filter directives.
const CRATE_TARGET: &str = "warehouse_agent";

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Level for this crate's events if RUST_LOG is not set.
    pub default_level: Level,

    /// Whether to include file/line information.
    pub include_file_line: bool,

    /// Whether to include target module path.
    pub include_target: bool,

    /// Whether to use compact log format.
    pub compact: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            include_file_line: false,
            include_target: true,
            compact: true,
        }
    }
}

impl TelemetryConfig {
    /// Full-format output with source locations, for debugging against a
    /// local simulator.
    pub fn development() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_file_line: true,
            include_target: true,
            compact: false,
        }
    }

    /// Pick a configuration from the CLI verbosity flags. `trace` wins over
    /// `debug`, which wins over `verbose`.
    pub fn from_flags(verbose: bool, debug: bool, trace: bool) -> Self {
        if trace {
            Self::development().with_level(Level::TRACE)
        } else if debug {
            Self::development()
        } else if verbose {
            Self::default().with_level(Level::DEBUG)
        } else {
            Self::default()
        }
    }

    /// Set the default log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Filter directive used when RUST_LOG is absent.
    pub fn directive(&self) -> String {
        format!(
            "warn,{}={}",
            CRATE_TARGET,
            self.default_level.as_str().to_lowercase()
        )
    }
}

/// Handle returned by [`init_telemetry`].
///
/// Keep this guard alive for the duration of the program.
#[derive(Debug)]
pub struct TelemetryGuard {
    directive: String,
}

impl TelemetryGuard {
    /// The filter that was installed.
    pub fn directive(&self) -> &str {
        &self.directive
    }
}

/// Initialize telemetry with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> io::Result<TelemetryGuard> {
    let fallback = config.directive();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.as_str()));
    let directive = filter.to_string();

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line);

    if config.compact {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.compact())
            .try_init()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    }

    Ok(TelemetryGuard { directive })
}
