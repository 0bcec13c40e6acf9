// SPDX-FileCopyrightText: Copyright (c) 2025 the devproxy-hosting authors
// SPDX-License-Identifier: Apache-2.0

//! Topology assembly.
//!
//! [`DistributedAppBuilder`] collects the named resources of one
//! application, owns their descriptors for the duration of assembly and
//! freezes into a [`DistributedApp`] for the orchestration engine. All
//! assembly happens sequentially on one thread; exclusive descriptor
//! access during configuration is a borrow, not a lock.

use std::path::{Path, PathBuf};

use thiserror::Error;
use validator::Validate;

use crate::config::HostingConfig;
use crate::resource::{LaunchPlan, ResourceDescriptor};

/// Errors raised while assembling a topology.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("resource '{0}' is already registered")]
    DuplicateResource(String),
    #[error("endpoint '{endpoint}' is already declared on resource '{resource}'")]
    DuplicateEndpoint { resource: String, endpoint: String },
    #[error("invalid resource name '{0}' - only [a-z0-9-_] allowed")]
    InvalidName(String),
}

/// Assembles an application topology.
///
/// Resources are registered by unique name; relative host paths supplied
/// to configurators are resolved against `base_dir` before they are
/// stored. Once every resource is configured, [`build`](Self::build)
/// freezes the topology.
pub struct DistributedAppBuilder {
    base_dir: PathBuf,
    config: HostingConfig,
    resources: Vec<ResourceDescriptor>,
}

impl DistributedAppBuilder {
    /// Create a builder with configuration read from the process
    /// environment.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_config(base_dir, HostingConfig::from_settings())
    }

    /// Create a builder with explicit configuration.
    pub fn with_config(base_dir: impl Into<PathBuf>, config: HostingConfig) -> Self {
        Self {
            base_dir: base_dir.into(),
            config,
            resources: Vec::new(),
        }
    }

    /// Base directory relative host paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config(&self) -> &HostingConfig {
        &self.config
    }

    /// Resources registered so far, in registration order.
    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    /// Register a descriptor under its unique name.
    ///
    /// Rejects invalid names and name collisions; on success the topology
    /// owns the descriptor and hands back exclusive access to it.
    pub fn add_resource(
        &mut self,
        descriptor: ResourceDescriptor,
    ) -> Result<&mut ResourceDescriptor, TopologyError> {
        let index = self.register(descriptor)?;
        Ok(&mut self.resources[index])
    }

    pub(crate) fn register(
        &mut self,
        descriptor: ResourceDescriptor,
    ) -> Result<usize, TopologyError> {
        descriptor
            .validate()
            .map_err(|_| TopologyError::InvalidName(descriptor.name().to_string()))?;

        if self.resources.iter().any(|r| r.name() == descriptor.name()) {
            return Err(TopologyError::DuplicateResource(
                descriptor.name().to_string(),
            ));
        }

        tracing::debug!(
            resource = descriptor.name(),
            kind = ?descriptor.kind(),
            "registering resource"
        );

        self.resources.push(descriptor);
        Ok(self.resources.len() - 1)
    }

    pub(crate) fn descriptor_at(&self, index: usize) -> &ResourceDescriptor {
        &self.resources[index]
    }

    pub(crate) fn descriptor_at_mut(&mut self, index: usize) -> &mut ResourceDescriptor {
        &mut self.resources[index]
    }

    /// Freeze the topology.
    ///
    /// The frozen application exposes no mutation surface; from here on
    /// descriptors can only be read or materialized.
    pub fn build(self) -> DistributedApp {
        DistributedApp {
            resources: self.resources,
        }
    }
}

/// A frozen application topology, ready for the orchestration engine.
pub struct DistributedApp {
    resources: Vec<ResourceDescriptor>,
}

impl DistributedApp {
    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.resources.iter().find(|r| r.name() == name)
    }

    /// Materialize a launch plan per resource, in registration order.
    pub fn launch_plans(&self) -> Vec<LaunchPlan> {
        self.resources.iter().map(|r| r.launch_plan()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ContainerSpecBuilder, ResourceSpec};

    fn container_descriptor(name: &str) -> ResourceDescriptor {
        let spec = ContainerSpecBuilder::default().build().unwrap();
        ResourceDescriptor::new(name, ResourceSpec::Container(spec))
    }

    #[test]
    fn test_duplicate_resource_name_is_rejected() {
        let mut app = DistributedAppBuilder::new("/app");
        app.add_resource(container_descriptor("proxy")).unwrap();

        let err = app.add_resource(container_descriptor("proxy")).unwrap_err();
        assert_eq!(err, TopologyError::DuplicateResource("proxy".to_string()));
    }

    #[test]
    fn test_invalid_resource_name_is_rejected() {
        let mut app = DistributedAppBuilder::new("/app");

        let err = app
            .add_resource(container_descriptor("Dev Proxy"))
            .unwrap_err();
        assert_eq!(err, TopologyError::InvalidName("Dev Proxy".to_string()));
    }

    #[test]
    fn test_frozen_app_keeps_registration_order() {
        let mut app = DistributedAppBuilder::new("/app");
        app.add_resource(container_descriptor("first")).unwrap();
        app.add_resource(container_descriptor("second")).unwrap();

        let app = app.build();
        let names: Vec<_> = app.resources().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["first", "second"]);
        assert!(app.resource("second").is_some());
        assert!(app.resource("third").is_none());
    }
}
