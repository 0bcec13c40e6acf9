// SPDX-FileCopyrightText: Copyright (c) 2025 the devproxy-hosting authors
// SPDX-License-Identifier: Apache-2.0

//! Pure data descriptors for topology resources.
//!
//! A [`ResourceDescriptor`] is the source of truth for one dependency in an
//! application topology: its identity, its variant payload (executable or
//! container), its ordered launch-argument list and its endpoint
//! declarations. Descriptors carry no launch behavior of their own; the
//! orchestration engine consumes them after the topology is frozen.
//!
//! Argument entries are either fixed tokens stored at configuration time or
//! deferred producers evaluated when [`ResourceDescriptor::launch_arguments`]
//! materializes the final list.

use std::path::PathBuf;

use derive_builder::Builder;
use derive_getters::Getters;
use educe::Educe;
use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::topology::TopologyError;

/// Discriminator for the two resource shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Executable,
    Container,
}

/// A named network listen point on a resource.
///
/// The logical name is mapped to a concrete address by the orchestration
/// engine at deploy time; this declaration only fixes the target port the
/// resource listens on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct EndpointDecl {
    name: String,
    target_port: u16,
}

impl EndpointDecl {
    pub fn new(name: impl Into<String>, target_port: u16) -> Self {
        Self {
            name: name.into(),
            target_port,
        }
    }
}

/// A host-filesystem path exposed at a fixed path inside a container.
///
/// `source` is an absolute host path (resolution against the topology base
/// directory happens at configuration time, before construction); `target`
/// names a location in the container's filesystem and is never resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct BindMount {
    source: PathBuf,
    target: String,
}

impl BindMount {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Launch parameters for a resource backed by a locally installed binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder, Getters)]
#[builder(pattern = "owned")]
pub struct ExecutableSpec {
    /// Name of the binary the launcher invokes.
    #[builder(setter(into), default = "crate::devproxy::EXECUTABLE_COMMAND.to_string()")]
    command: String,

    /// Working directory for the launched process; empty means the
    /// launcher's own current directory.
    #[builder(setter(into), default)]
    working_dir: PathBuf,
}

/// Launch parameters for a resource backed by a container image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder, Getters)]
#[builder(pattern = "owned")]
pub struct ContainerSpec {
    #[builder(setter(into), default = "crate::devproxy::IMAGE_REGISTRY.to_string()")]
    registry: String,

    #[builder(setter(into), default = "crate::devproxy::IMAGE_NAME.to_string()")]
    image: String,

    #[builder(setter(into), default = "crate::devproxy::IMAGE_TAG.to_string()")]
    tag: String,

    /// Bind mounts in declaration order. Append-only; duplicates are kept.
    #[builder(default)]
    mounts: Vec<BindMount>,
}

impl ContainerSpec {
    /// Full image reference, e.g. `ghcr.io/dotnet/dev-proxy:latest`.
    pub fn image_reference(&self) -> String {
        format!("{}/{}:{}", self.registry, self.image, self.tag)
    }

    pub(crate) fn push_mount(&mut self, mount: BindMount) {
        self.mounts.push(mount);
    }
}

/// Variant payload of a descriptor.
///
/// The enum makes the variant exclusivity invariant structural: a
/// descriptor cannot carry executable and container fields at once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceSpec {
    Executable(ExecutableSpec),
    Container(ContainerSpec),
}

impl ResourceSpec {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceSpec::Executable(_) => ResourceKind::Executable,
            ResourceSpec::Container(_) => ResourceKind::Container,
        }
    }
}

/// A deferred argument producer.
///
/// The closure is stored unevaluated and invoked on the materializing
/// thread, once per materialization, so the produced tokens reflect state
/// that is only known after the whole topology has been assembled.
#[derive(Educe)]
#[educe(Debug)]
pub struct DeferredArgs {
    #[educe(Debug(ignore))]
    produce: Box<dyn Fn() -> Vec<String> + Send>,
}

impl DeferredArgs {
    pub fn new<F>(produce: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + 'static,
    {
        Self {
            produce: Box::new(produce),
        }
    }

    pub fn call(&self) -> Vec<String> {
        (self.produce)()
    }
}

/// One entry in a descriptor's ordered argument list.
#[derive(Debug)]
pub enum LaunchArg {
    /// A fixed token stored at configuration time.
    Token(String),
    /// Tokens produced at materialization time.
    Deferred(DeferredArgs),
}

/// Passive description of one dependency in an application topology.
///
/// Created exactly once by a registration entry point, mutated through a
/// builder handle during topology assembly, then frozen together with the
/// topology. The argument list is append-only and order-significant; later
/// duplicate flags are not deduplicated here, since last-argument-wins is
/// the consuming launcher's concern.
#[derive(Debug, Validate)]
pub struct ResourceDescriptor {
    #[validate(custom = "validate_resource_name")]
    name: String,
    spec: ResourceSpec,
    args: Vec<LaunchArg>,
    endpoints: Vec<EndpointDecl>,
}

impl ResourceDescriptor {
    pub fn new(name: impl Into<String>, spec: ResourceSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            args: Vec::new(),
            endpoints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }

    pub fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    /// Executable payload, if this is an executable resource.
    pub fn executable(&self) -> Option<&ExecutableSpec> {
        match &self.spec {
            ResourceSpec::Executable(spec) => Some(spec),
            ResourceSpec::Container(_) => None,
        }
    }

    /// Container payload, if this is a container resource.
    pub fn container(&self) -> Option<&ContainerSpec> {
        match &self.spec {
            ResourceSpec::Container(spec) => Some(spec),
            ResourceSpec::Executable(_) => None,
        }
    }

    /// Endpoint declarations in declaration order.
    pub fn endpoints(&self) -> &[EndpointDecl] {
        &self.endpoints
    }

    pub fn endpoint(&self, name: &str) -> Option<&EndpointDecl> {
        self.endpoints.iter().find(|e| e.name() == name)
    }

    pub(crate) fn push_args<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.args.extend(tokens.into_iter().map(LaunchArg::Token));
    }

    pub(crate) fn push_deferred(&mut self, deferred: DeferredArgs) {
        self.args.push(LaunchArg::Deferred(deferred));
    }

    pub(crate) fn add_endpoint(&mut self, decl: EndpointDecl) -> Result<(), TopologyError> {
        if self.endpoints.iter().any(|e| e.name() == decl.name()) {
            return Err(TopologyError::DuplicateEndpoint {
                resource: self.name.clone(),
                endpoint: decl.name().clone(),
            });
        }
        self.endpoints.push(decl);
        Ok(())
    }

    pub(crate) fn container_mut(&mut self) -> &mut ContainerSpec {
        match &mut self.spec {
            ResourceSpec::Container(spec) => spec,
            // Handles are typed per variant; a container handle never
            // refers to an executable descriptor.
            ResourceSpec::Executable(_) => {
                unreachable!("container handle bound to executable resource")
            }
        }
    }

    /// Materialize the final launcher argument list.
    ///
    /// Fixed tokens are emitted as stored. Deferred producers are invoked
    /// here, once per call and in declaration order, on the calling
    /// thread. Results are never cached, so each materialization reflects
    /// the latest state. Callers materialize immediately before launch.
    pub fn launch_arguments(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            match arg {
                LaunchArg::Token(token) => tokens.push(token.clone()),
                LaunchArg::Deferred(deferred) => tokens.extend(deferred.call()),
            }
        }
        tokens
    }

    /// Frozen, serializable launch description for the orchestration
    /// engine. Deferred arguments are materialized in the process.
    pub fn launch_plan(&self) -> LaunchPlan {
        LaunchPlan {
            name: self.name.clone(),
            kind: self.kind(),
            args: self.launch_arguments(),
            endpoints: self.endpoints.clone(),
            spec: self.spec.clone(),
        }
    }
}

/// Launch description handed to the orchestration engine.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchPlan {
    pub name: String,
    pub kind: ResourceKind,
    pub args: Vec<String>,
    pub endpoints: Vec<EndpointDecl>,
    pub spec: ResourceSpec,
}

/// Resource names are restricted to `[a-z0-9-_]`.
pub(crate) fn validate_resource_name(input: &str) -> Result<(), ValidationError> {
    let regex = regex::Regex::new(r"^[a-z0-9-_]+$").unwrap();

    if regex.is_match(input) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_characters"))
    }
}
