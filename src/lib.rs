// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Poll-based reconciling builders for Kubernetes objects, meant to provision
//! and tear down cluster state from test code.

pub mod config;
pub mod constants;
pub mod error;
pub mod kubernetes;
pub mod logging;
pub mod reconciler;
pub mod resources;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::Config;
pub use error::{ClientError, ConvergentError, ErrorKind, Result};
pub use kubernetes::{DynamicClient, ResourceClient};
pub use reconciler::{Builder, Readiness, ReplicaCounts, ResourceKind};
pub use resources::{
    NamespaceBuilder, NetworkPolicyBuilder, ReplicaSetBuilder, ResourceQuotaBuilder,
    ServiceBuilder, StatefulSetBuilder,
};
