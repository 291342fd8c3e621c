// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Capabilities a resource kind supplies to the generic builder.

use kube::{core::GroupVersionResource, Api, Client, Resource};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// A cluster object kind the generic [`Builder`](super::Builder) can manage.
pub trait ResourceKind:
    Resource<DynamicType = ()>
    + Clone
    + Debug
    + Default
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Whether objects of this kind live inside a namespace.
    const NAMESPACED: bool;

    /// Api handle scoped to `namespace` for namespaced kinds, cluster wide otherwise.
    fn api(client: Client, namespace: Option<&str>) -> Api<Self>;

    /// Group, version and plural resource name of this kind.
    fn gvr() -> GroupVersionResource {
        GroupVersionResource::gvr(&Self::group(&()), &Self::version(&()), &Self::plural(&()))
    }
}

/// Scalar counts compared to decide whether an object has converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaCounts {
    pub ready: i32,
    pub desired: i32,
    pub min_ready: i32,
}

impl ReplicaCounts {
    pub fn new(ready: i32, desired: i32) -> Self {
        ReplicaCounts {
            ready,
            desired,
            min_ready: 0,
        }
    }

    /// Require at least `min_ready` ready units in addition to equality.
    pub fn with_min_ready(mut self, min_ready: i32) -> Self {
        self.min_ready = min_ready;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.ready == self.desired && self.ready >= self.min_ready
    }
}

/// Kinds with a readiness predicate, used by the blocking waits.
pub trait Readiness: ResourceKind {
    fn replica_counts(&self) -> ReplicaCounts;

    fn is_ready(&self) -> bool {
        self.replica_counts().is_ready()
    }
}
