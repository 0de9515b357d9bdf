// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Logging and metrics.
//!
//! - **Tracing**: structured diagnostics on stderr, filtered by `RUST_LOG`
//!   or the CLI verbosity flags
//! - **Metrics**: per-session counters and decision latency, logged as a
//!   summary at each episode end and at shutdown
//!
//! # Usage
//!
//! ```rust,ignore
//! use warehouse_agent::telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::from_flags(verbose, debug, trace))?;
//! ```

mod init;
pub mod metrics;

pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard};
pub use metrics::{Histogram, Metrics, MetricsSnapshot, OperationMetrics};
