// SPDX-FileCopyrightText: Copyright (c) 2025 the devproxy-hosting authors
// SPDX-License-Identifier: Apache-2.0

//! Chainable configuration handles.
//!
//! A [`ResourceBuilder`] is handed out by a registration entry point and
//! refers to one descriptor registered in the topology. Every configurator
//! consumes the handle, mutates the bound descriptor in place and returns
//! the same handle, so independent mutations compose in any call order
//! without re-specifying the target.
//!
//! The variant parameter is a zero-sized marker: container-only
//! configurators are inherent methods on `ResourceBuilder<'_, Container>`,
//! which keeps them off executable handles at the type level instead of
//! checking at runtime.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use crate::resource::{DeferredArgs, EndpointDecl, ResourceDescriptor};
use crate::topology::{DistributedAppBuilder, TopologyError};

/// Marker for handles bound to executable resources.
#[derive(Debug, Clone, Copy)]
pub struct Executable;

/// Marker for handles bound to container resources.
#[derive(Debug, Clone, Copy)]
pub struct Container;

/// Handle bound to one registered resource.
///
/// Holds exclusive access to the topology for its lifetime, which makes
/// the single-owner configuration model a compile-time fact.
pub struct ResourceBuilder<'a, V> {
    app: &'a mut DistributedAppBuilder,
    index: usize,
    _variant: PhantomData<V>,
}

impl<V> fmt::Debug for ResourceBuilder<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceBuilder {{ resource: {} }}", self.descriptor().name())
    }
}

impl<'a, V> ResourceBuilder<'a, V> {
    pub(crate) fn bind(app: &'a mut DistributedAppBuilder, index: usize) -> Self {
        Self {
            app,
            index,
            _variant: PhantomData,
        }
    }

    /// The descriptor this handle is bound to.
    pub fn descriptor(&self) -> &ResourceDescriptor {
        self.app.descriptor_at(self.index)
    }

    pub(crate) fn descriptor_mut(&mut self) -> &mut ResourceDescriptor {
        self.app.descriptor_at_mut(self.index)
    }

    pub(crate) fn base_dir(&self) -> &Path {
        self.app.base_dir()
    }

    /// Append fixed argument tokens, in order, without interpretation.
    ///
    /// Nothing is deduplicated: a flag passed twice is stored twice, and
    /// the consuming launcher decides which occurrence wins.
    pub fn with_args<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptor_mut()
            .push_args(tokens.into_iter().map(Into::into));
        self
    }

    /// Append arguments produced at materialization time.
    ///
    /// The producer does not run now. It runs once per
    /// [`launch_arguments`](ResourceDescriptor::launch_arguments) call,
    /// after the topology is fully assembled.
    pub fn with_deferred_args<F>(mut self, produce: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + 'static,
    {
        self.descriptor_mut().push_deferred(DeferredArgs::new(produce));
        self
    }

    /// Declare an additional HTTP endpoint on the resource.
    ///
    /// Endpoint names are unique per resource; redeclaring one is an
    /// error, not an update.
    pub fn with_http_endpoint(
        mut self,
        name: impl Into<String>,
        target_port: u16,
    ) -> Result<Self, TopologyError> {
        self.descriptor_mut()
            .add_endpoint(EndpointDecl::new(name, target_port))?;
        Ok(self)
    }
}
