// SPDX-FileCopyrightText: Copyright (c) 2025 the devproxy-hosting authors
// SPDX-License-Identifier: Apache-2.0

//! Process-level configuration of the hosting integration.

use derive_getters::Getters;
use serde::Serialize;

use crate::devproxy;

/// Overrides the container image registry.
pub const ENV_IMAGE_REGISTRY: &str = "DEVPROXY_IMAGE_REGISTRY";

/// Overrides the container image name.
pub const ENV_IMAGE_NAME: &str = "DEVPROXY_IMAGE_NAME";

/// Overrides the container image tag.
pub const ENV_IMAGE_TAG: &str = "DEVPROXY_IMAGE_TAG";

/// Container image coordinates used for newly registered Dev Proxy
/// container resources.
///
/// Defaults are the published coordinates from [`crate::devproxy`];
/// [`from_settings`](Self::from_settings) layers environment overrides on
/// top. The configuration is read once at topology-builder construction
/// and is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct HostingConfig {
    image_registry: String,
    image_name: String,
    image_tag: String,
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            image_registry: devproxy::IMAGE_REGISTRY.to_string(),
            image_name: devproxy::IMAGE_NAME.to_string(),
            image_tag: devproxy::IMAGE_TAG.to_string(),
        }
    }
}

impl HostingConfig {
    /// Explicit coordinates, bypassing the environment.
    pub fn new(
        image_registry: impl Into<String>,
        image_name: impl Into<String>,
        image_tag: impl Into<String>,
    ) -> Self {
        Self {
            image_registry: image_registry.into(),
            image_name: image_name.into(),
            image_tag: image_tag.into(),
        }
    }

    /// Read configuration from the process environment, falling back to
    /// the published defaults.
    pub fn from_settings() -> Self {
        Self {
            image_registry: env_or(ENV_IMAGE_REGISTRY, devproxy::IMAGE_REGISTRY),
            image_name: env_or(ENV_IMAGE_NAME, devproxy::IMAGE_NAME),
            image_tag: env_or(ENV_IMAGE_TAG, devproxy::IMAGE_TAG),
        }
    }
}

fn env_or(env: &str, default: &str) -> String {
    std::env::var(env)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation and the default-value assertions live in one
    // test so parallel test threads never observe each other's overrides.
    #[test]
    fn test_from_settings_env_overrides() {
        assert_eq!(HostingConfig::from_settings(), HostingConfig::default());

        std::env::set_var(ENV_IMAGE_REGISTRY, "registry.example.com");
        std::env::set_var(ENV_IMAGE_TAG, "0.29.2");

        let config = HostingConfig::from_settings();
        assert_eq!(config.image_registry(), "registry.example.com");
        assert_eq!(config.image_name(), "dotnet/dev-proxy");
        assert_eq!(config.image_tag(), "0.29.2");

        std::env::remove_var(ENV_IMAGE_REGISTRY);
        std::env::remove_var(ENV_IMAGE_TAG);
    }

    #[test]
    fn test_empty_env_value_falls_back_to_default() {
        assert_eq!(env_or("DEVPROXY_CONFIG_TEST_UNSET_VAR", "fallback"), "fallback");
    }
}
