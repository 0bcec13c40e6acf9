// SPDX-FileCopyrightText: Copyright (c) 2025 the devproxy-hosting authors
// SPDX-License-Identifier: Apache-2.0

//! Declarative hosting integration for [Dev Proxy].
//!
//! A distributed application is assembled from a set of named resources
//! (processes and containers carrying endpoints). This crate adds a
//! resource kind for
//! the Dev Proxy developer tool: it describes how to launch and wire the
//! tool, either through its locally installed executable or through the
//! published container image, without ever talking to it.
//!
//! Registration goes through [`DevProxyHostingExt`] on a
//! [`DistributedAppBuilder`]; the returned [`ResourceBuilder`] handle is
//! typed by variant, so container-only configuration (bind mounts) is not
//! callable on an executable resource. Once assembly is done the builder
//! freezes into a [`DistributedApp`] for the orchestration engine.
//!
//! ```
//! use devproxy_hosting::{DevProxyHostingExt, DistributedAppBuilder};
//!
//! # fn main() -> devproxy_hosting::Result<()> {
//! let mut app = DistributedAppBuilder::new("/app");
//! app.add_devproxy_container("proxy")?
//!     .with_config_folder("./config")
//!     .with_urls_to_watch(|| vec!["https://jsonplaceholder.typicode.com/*".to_string()]);
//!
//! let app = app.build();
//! let plans = app.launch_plans();
//! assert_eq!(plans[0].name, "proxy");
//! # Ok(())
//! # }
//! ```
//!
//! [Dev Proxy]: https://aka.ms/devproxy

pub use anyhow::{anyhow as error, bail as raise, Context as ErrorContext, Error, Result};

pub mod builder;
pub mod config;
pub mod devproxy;
pub mod resource;
pub mod topology;
mod utils;

pub use builder::{Container, Executable, ResourceBuilder};
pub use config::HostingConfig;
pub use devproxy::DevProxyHostingExt;
pub use topology::{DistributedApp, DistributedAppBuilder, TopologyError};

pub use devproxy_logging as logging;
