// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::error::{ConvergentError, Result};
use crate::kubernetes::ResourceClient;
use crate::reconciler::{self, Builder, ResourceKind};
use k8s_openapi::api::networking::v1::{
    NetworkPolicy, NetworkPolicyEgressRule, NetworkPolicyIngressRule, NetworkPolicySpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::{
    api::{ListParams, ObjectMeta},
    Api, Client,
};
use std::collections::BTreeMap;

const POLICY_TYPES: [&str; 2] = ["Ingress", "Egress"];

impl ResourceKind for NetworkPolicy {
    const NAMESPACED: bool = true;

    fn api(client: Client, namespace: Option<&str>) -> Api<Self> {
        match namespace {
            Some(ns) => Api::namespaced(client, ns),
            None => Api::all(client),
        }
    }
}

pub type NetworkPolicyBuilder<'c, C> = Builder<'c, NetworkPolicy, C>;

impl<'c, C> Builder<'c, NetworkPolicy, C>
where
    C: ResourceClient<NetworkPolicy> + ?Sized,
{
    /// A policy applying to every pod in `namespace` until narrowed by
    /// [`with_pod_selector`](Self::with_pod_selector).
    pub fn new(client: &'c C, name: &str, namespace: &str) -> Self {
        let definition = NetworkPolicy {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: Some(NetworkPolicySpec::default()),
            ..Default::default()
        };

        Self::from_definition(client, definition)
    }

    pub fn with_pod_selector(mut self, labels: BTreeMap<String, String>) -> Self {
        if labels.is_empty() {
            self.record_error("NetworkPolicy 'podSelector' cannot be empty");
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|np| np.spec.as_mut()) {
            spec.pod_selector = LabelSelector {
                match_labels: Some(labels),
                ..Default::default()
            };
        }
        self
    }

    /// Declare which directions the policy governs, `Ingress` and/or `Egress`.
    pub fn with_policy_types(mut self, types: &[&str]) -> Self {
        if let Some(unknown) = types.iter().find(|t| !POLICY_TYPES.contains(*t)) {
            self.record_error(format!("unsupported policy type {}", unknown));
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|np| np.spec.as_mut()) {
            let policy_types = spec.policy_types.get_or_insert_with(Vec::new);
            for t in types {
                if !policy_types.iter().any(|existing| existing == t) {
                    policy_types.push(t.to_string());
                }
            }
        }
        self
    }

    pub fn with_ingress_rule(mut self, rule: NetworkPolicyIngressRule) -> Self {
        if let Some(spec) = self.definition_mut().and_then(|np| np.spec.as_mut()) {
            spec.ingress.get_or_insert_with(Vec::new).push(rule);
        }
        self.with_policy_types(&["Ingress"])
    }

    pub fn with_egress_rule(mut self, rule: NetworkPolicyEgressRule) -> Self {
        if let Some(spec) = self.definition_mut().and_then(|np| np.spec.as_mut()) {
            spec.egress.get_or_insert_with(Vec::new).push(rule);
        }
        self.with_policy_types(&["Egress"])
    }

    /// Govern both directions without any allow rule, isolating the selected pods.
    pub fn deny_all(self) -> Self {
        self.with_policy_types(&POLICY_TYPES)
    }
}

/// List the network policies in `namespace`.
pub async fn list<'c, C>(
    client: &'c C,
    namespace: &str,
    options: &[ListParams],
) -> Result<Vec<NetworkPolicyBuilder<'c, C>>>
where
    C: ResourceClient<NetworkPolicy> + ?Sized,
{
    if namespace.is_empty() {
        return Err(ConvergentError::InvalidArgument(
            "NetworkPolicy 'namespace' cannot be empty".to_string(),
        ));
    }
    reconciler::list(client, Some(namespace), options).await
}
