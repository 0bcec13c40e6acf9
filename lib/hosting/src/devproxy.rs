// SPDX-FileCopyrightText: Copyright (c) 2025 the devproxy-hosting authors
// SPDX-License-Identifier: Apache-2.0

//! Dev Proxy resource registration and configuration.
//!
//! The entry points in [`DevProxyHostingExt`] add a Dev Proxy resource to
//! a [`DistributedAppBuilder`], either as the locally installed `devproxy`
//! binary or as the published container image. Both attach the tool's two
//! well-known endpoints and hand back a typed builder handle for further
//! configuration.
//!
//! Dev Proxy's fixed coordinates live here as named constants; nothing
//! else in the crate spells them out.

use std::path::Path;

use crate::builder::{Container, Executable, ResourceBuilder};
use crate::resource::{
    BindMount, ContainerSpecBuilder, ExecutableSpecBuilder, ResourceDescriptor, ResourceSpec,
};
use crate::topology::DistributedAppBuilder;
use crate::utils;
use crate::Result;

/// The name of the Dev Proxy proxy endpoint.
pub const PROXY_ENDPOINT_NAME: &str = "proxy";

/// The name of the Dev Proxy API endpoint.
pub const API_ENDPOINT_NAME: &str = "api";

/// Target port of the proxy endpoint.
pub const PROXY_ENDPOINT_PORT: u16 = 8000;

/// Target port of the Dev Proxy control API.
pub const API_ENDPOINT_PORT: u16 = 8897;

/// Binary name of the locally installed Dev Proxy.
pub const EXECUTABLE_COMMAND: &str = "devproxy";

/// Registry the published Dev Proxy image lives in.
pub const IMAGE_REGISTRY: &str = "ghcr.io";

/// Published Dev Proxy image name.
pub const IMAGE_NAME: &str = "dotnet/dev-proxy";

/// Default image tag.
pub const IMAGE_TAG: &str = "latest";

/// In-container directory Dev Proxy reads its root certificate from.
pub const CONTAINER_CERT_DIR: &str = "/home/devproxy/.config/dev-proxy/rootCert";

/// In-container directory Dev Proxy reads its configuration from.
pub const CONTAINER_CONFIG_DIR: &str = "/config";

/// Registration entry points for Dev Proxy resources.
pub trait DevProxyHostingExt {
    /// Add Dev Proxy through its locally installed executable.
    ///
    /// The resource starts with `--as-system-proxy false` so the tool does
    /// not register itself as the machine-wide system proxy, plus the
    /// `proxy` and `api` endpoints.
    fn add_devproxy_executable(&mut self, name: &str) -> Result<ResourceBuilder<'_, Executable>>;

    /// Add Dev Proxy as a container resource.
    ///
    /// Image coordinates come from the builder's [`HostingConfig`]
    /// (environment overrides over the published defaults); the `proxy`
    /// and `api` endpoints are attached.
    ///
    /// [`HostingConfig`]: crate::config::HostingConfig
    fn add_devproxy_container(&mut self, name: &str) -> Result<ResourceBuilder<'_, Container>>;
}

impl DevProxyHostingExt for DistributedAppBuilder {
    fn add_devproxy_executable(&mut self, name: &str) -> Result<ResourceBuilder<'_, Executable>> {
        let spec = ExecutableSpecBuilder::default().build()?;
        let descriptor = ResourceDescriptor::new(name, ResourceSpec::Executable(spec));
        let index = self.register(descriptor)?;

        tracing::debug!(resource = name, "added Dev Proxy executable resource");

        Ok(ResourceBuilder::bind(self, index)
            .with_args(["--as-system-proxy", "false"])
            .with_http_endpoint(PROXY_ENDPOINT_NAME, PROXY_ENDPOINT_PORT)?
            .with_http_endpoint(API_ENDPOINT_NAME, API_ENDPOINT_PORT)?)
    }

    fn add_devproxy_container(&mut self, name: &str) -> Result<ResourceBuilder<'_, Container>> {
        let spec = ContainerSpecBuilder::default()
            .registry(self.config().image_registry().to_string())
            .image(self.config().image_name().to_string())
            .tag(self.config().image_tag().to_string())
            .build()?;
        let descriptor = ResourceDescriptor::new(name, ResourceSpec::Container(spec));
        let index = self.register(descriptor)?;

        tracing::debug!(resource = name, "added Dev Proxy container resource");

        Ok(ResourceBuilder::bind(self, index)
            .with_http_endpoint(PROXY_ENDPOINT_NAME, PROXY_ENDPOINT_PORT)?
            .with_http_endpoint(API_ENDPOINT_NAME, API_ENDPOINT_PORT)?)
    }
}

impl<'a, V> ResourceBuilder<'a, V> {
    /// Watch the given URLs.
    ///
    /// `produce` is deferred: it runs when launch arguments are
    /// materialized, immediately before launch, so the emitted list
    /// reflects endpoints that are only resolved after this call. Each
    /// materialization re-invokes it.
    pub fn with_urls_to_watch<F>(self, produce: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + 'static,
    {
        self.with_deferred_args(move || vec!["-u".to_string(), produce().join(" ")])
    }
}

impl<'a> ResourceBuilder<'a, Executable> {
    /// Point Dev Proxy at a configuration file on the host.
    ///
    /// Relative paths are resolved against the topology base directory
    /// before being stored.
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Self {
        let resolved = utils::resolve_base(self.base_dir(), path.as_ref());
        self.with_args(["-c".to_string(), resolved.to_string_lossy().into_owned()])
    }
}

impl<'a> ResourceBuilder<'a, Container> {
    /// Point Dev Proxy at a configuration file.
    ///
    /// The path is passed through untouched: it names a location inside
    /// the container's filesystem, not on the host.
    pub fn with_config_file(self, path: impl Into<String>) -> Self {
        self.with_args(["-c".to_string(), path.into()])
    }

    /// Mount a host folder holding the root certificate at Dev Proxy's
    /// fixed in-container certificate directory.
    ///
    /// Mounts are append-only; calling this twice yields two mounts.
    pub fn with_cert_folder(mut self, host_path: impl AsRef<Path>) -> Self {
        let source = utils::resolve_base(self.base_dir(), host_path.as_ref());
        tracing::debug!(
            resource = self.descriptor().name(),
            host = %source.display(),
            container = CONTAINER_CERT_DIR,
            "adding certificate bind mount"
        );
        self.descriptor_mut()
            .container_mut()
            .push_mount(BindMount::new(source, CONTAINER_CERT_DIR));
        self
    }

    /// Mount a host configuration folder at `/config` inside the
    /// container.
    pub fn with_config_folder(mut self, host_path: impl AsRef<Path>) -> Self {
        let source = utils::resolve_base(self.base_dir(), host_path.as_ref());
        tracing::debug!(
            resource = self.descriptor().name(),
            host = %source.display(),
            container = CONTAINER_CONFIG_DIR,
            "adding configuration bind mount"
        );
        self.descriptor_mut()
            .container_mut()
            .push_mount(BindMount::new(source, CONTAINER_CONFIG_DIR));
        self
    }
}
