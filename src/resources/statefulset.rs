// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use super::pod_template;
use crate::error::{ConvergentError, Result};
use crate::kubernetes::ResourceClient;
use crate::reconciler::{self, Builder, Readiness, ReplicaCounts, ResourceKind};
use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::api::core::v1::{Container, PersistentVolumeClaim};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::{
    api::{ListParams, ObjectMeta},
    Api, Client,
};
use std::collections::BTreeMap;

impl ResourceKind for StatefulSet {
    const NAMESPACED: bool = true;

    fn api(client: Client, namespace: Option<&str>) -> Api<Self> {
        match namespace {
            Some(ns) => Api::namespaced(client, ns),
            None => Api::all(client),
        }
    }
}

impl Readiness for StatefulSet {
    /// A stateful set only counts as ready once at least one replica serves.
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

        ReplicaCounts::new(ready, desired).with_min_ready(1)
    }
}

pub type StatefulSetBuilder<'c, C> = Builder<'c, StatefulSet, C>;

impl<'c, C> Builder<'c, StatefulSet, C>
where
    C: ResourceClient<StatefulSet> + ?Sized,
{
    pub fn new(
        client: &'c C,
        name: &str,
        namespace: &str,
        labels: BTreeMap<String, String>,
    ) -> Self {
        let definition = StatefulSet {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: Some(StatefulSetSpec {
                selector: LabelSelector {
                    match_labels: Some(labels.clone()),
                    ..Default::default()
                },
                template: pod_template(&labels),
                ..Default::default()
            }),
            status: None,
        };

        let mut builder = Self::from_definition(client, definition);
        if labels.is_empty() {
            builder.record_error("StatefulSet 'labels' cannot be empty");
        }
        builder
    }

    pub fn with_replicas(mut self, replicas: i32) -> Self {
        if replicas < 0 {
            self.record_error(format!("replicas must not be negative, got {}", replicas));
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|sts| sts.spec.as_mut()) {
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
            .and_then(|sts| sts.spec.as_mut())
            .and_then(|spec| spec.template.spec.as_mut())
        {
            pod.containers.push(container);
        }
        self
    }

    /// Add a claim template; every replica gets its own volume from it.
    pub fn with_volume_claim_template(mut self, claim: PersistentVolumeClaim) -> Self {
        let name = claim.metadata.name.as_deref().unwrap_or_default();
        if name.is_empty() {
            self.record_error("volume claim template 'name' cannot be empty");
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|sts| sts.spec.as_mut()) {
            spec.volume_claim_templates
                .get_or_insert_with(Vec::new)
                .push(claim);
        }
        self
    }
}

/// List the stateful sets in `namespace`.
pub async fn list<'c, C>(
    client: &'c C,
    namespace: &str,
    options: &[ListParams],
) -> Result<Vec<StatefulSetBuilder<'c, C>>>
where
    C: ResourceClient<StatefulSet> + ?Sized,
{
    if namespace.is_empty() {
        return Err(ConvergentError::InvalidArgument(
            "StatefulSet 'namespace' cannot be empty".to_string(),
        ));
    }
    reconciler::list(client, Some(namespace), options).await
}
