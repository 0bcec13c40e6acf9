// SPDX-FileCopyrightText: Copyright (c) 2025 the devproxy-hosting authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration functions for the logging module.

/// Filter specification read ahead of `RUST_LOG`, e.g. `devproxy_hosting=debug`.
pub const ENV_LOG_FILTER: &str = "DEVPROXY_LOG";

/// Truthy value enables JSONL log output.
pub const ENV_LOGGING_JSONL: &str = "DEVPROXY_LOGGING_JSONL";

/// Truthy value disables ANSI terminal escape codes and colors.
pub const ENV_DISABLE_ANSI: &str = "DEVPROXY_SDK_DISABLE_ANSI_LOGGING";

/// Check if an environment variable is truthy
pub fn env_is_truthy(env: &str) -> bool {
    match std::env::var(env) {
        Ok(val) => is_truthy(val.as_str()),
        Err(_) => false,
    }
}

/// Check if a string is truthy
/// This will be used to evaluate environment variables or any other subjective
/// configuration parameters that can be set by the user that should be evaluated
/// as a boolean value.
pub fn is_truthy(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

/// Check whether JSONL logging is enabled.
/// Set the [`ENV_LOGGING_JSONL`] environment variable to a [`is_truthy`] value
pub fn jsonl_logging_enabled() -> bool {
    env_is_truthy(ENV_LOGGING_JSONL)
}

/// Check whether logging with ANSI terminal escape codes and colors is disabled.
/// Set the [`ENV_DISABLE_ANSI`] environment variable to a [`is_truthy`] value
pub fn disable_ansi_logging() -> bool {
    env_is_truthy(ENV_DISABLE_ANSI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("on"));
        assert!(is_truthy("yes"));

        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy("no"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_env_is_truthy_unset() {
        assert!(!env_is_truthy("DEVPROXY_LOGGING_TEST_UNSET_VAR"));
    }
}
