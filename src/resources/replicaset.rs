// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use super::pod_template;
use crate::error::{ConvergentError, Result};
use crate::kubernetes::ResourceClient;
use crate::reconciler::{self, Builder, Readiness, ReplicaCounts, ResourceKind};
use k8s_openapi::api::apps::v1::{ReplicaSet, ReplicaSetSpec};
use k8s_openapi::api::core::v1::Container;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::{
    api::{ListParams, ObjectMeta},
    Api, Client,
};
use std::collections::BTreeMap;

impl ResourceKind for ReplicaSet {
    const NAMESPACED: bool = true;

    fn api(client: Client, namespace: Option<&str>) -> Api<Self> {
        match namespace {
            Some(ns) => Api::namespaced(client, ns),
            None => Api::all(client),
        }
    }
}

impl Readiness for ReplicaSet {
    fn replica_counts(&self) -> ReplicaCounts {
        let desired = self
            .spec
            .as_ref()
            .and_then(|spec| spec.replicas)
            .unwrap_or(1);
        let ready = self
            .status
            .as_ref()
            .and_then(|status| status.ready_replicas)
            .unwrap_or(0);

        ReplicaCounts::new(ready, desired)
    }
}

pub type ReplicaSetBuilder<'c, C> = Builder<'c, ReplicaSet, C>;

impl<'c, C> Builder<'c, ReplicaSet, C>
where
    C: ResourceClient<ReplicaSet> + ?Sized,
{
    /// A replica set selecting its pods by `labels`, which are stamped on the pod template.
    pub fn new(
        client: &'c C,
        name: &str,
        namespace: &str,
        labels: BTreeMap<String, String>,
    ) -> Self {
        let definition = ReplicaSet {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: Some(ReplicaSetSpec {
                selector: LabelSelector {
                    match_labels: Some(labels.clone()),
                    ..Default::default()
                },
                template: Some(pod_template(&labels)),
                ..Default::default()
            }),
            status: None,
        };

        let mut builder = Self::from_definition(client, definition);
        if labels.is_empty() {
            builder.record_error("ReplicaSet 'labels' cannot be empty");
        }
        builder
    }

    pub fn with_replicas(mut self, replicas: i32) -> Self {
        if replicas < 0 {
            self.record_error(format!("replicas must not be negative, got {}", replicas));
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|rs| rs.spec.as_mut()) {
            spec.replicas = Some(replicas);
        }
        self
    }

    pub fn with_container(mut self, container: Container) -> Self {
        if container.name.is_empty() {
            self.record_error("container 'name' cannot be empty");
            return self;
        }
        if let Some(pod) = self
            .definition_mut()
            .and_then(|rs| rs.spec.as_mut())
            .and_then(|spec| spec.template.as_mut())
            .and_then(|template| template.spec.as_mut())
        {
            pod.containers.push(container);
        }
        self
    }

    /// Seconds a new pod must be ready before it counts as available.
    pub fn with_min_ready_seconds(mut self, seconds: i32) -> Self {
        if seconds < 0 {
            let msg = format!("minReadySeconds must not be negative, got {}", seconds);
            self.record_error(msg);
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|rs| rs.spec.as_mut()) {
            spec.min_ready_seconds = Some(seconds);
        }
        self
    }
}

/// List the replica sets in `namespace`.
pub async fn list<'c, C>(
    client: &'c C,
    namespace: &str,
    options: &[ListParams],
) -> Result<Vec<ReplicaSetBuilder<'c, C>>>
where
    C: ResourceClient<ReplicaSet> + ?Sized,
{
    if namespace.is_empty() {
        return Err(ConvergentError::InvalidArgument(
            "ReplicaSet 'namespace' cannot be empty".to_string(),
        ));
    }
    reconciler::list(client, Some(namespace), options).await
}
