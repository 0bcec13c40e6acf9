// SPDX-FileCopyrightText: Copyright (c) 2025 the devproxy-hosting authors
// SPDX-License-Identifier: Apache-2.0

//! Logging setup shared by the Dev Proxy hosting crates.
//!
//! Consumers call [`init`] once at process start. Output format and
//! filtering are controlled through the environment; see [`config`] for
//! the recognized variables.

pub mod config;

use tracing_subscriber::EnvFilter;

/// Initialize the process-wide tracing subscriber.
///
/// The filter comes from `DEVPROXY_LOG` when set, otherwise from the
/// standard `RUST_LOG` variable, and defaults to `warn`. JSONL output and
/// ANSI escape codes are toggled by the environment variables documented
/// in [`config`].
///
/// Panics if a global subscriber has already been installed.
pub fn init() {
    let filter = match std::env::var(config::ENV_LOG_FILTER) {
        Ok(spec) => EnvFilter::new(spec),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!config::disable_ansi_logging());

    if config::jsonl_logging_enabled() {
        builder.json().init();
    } else {
        builder.init();
    }
}
