// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed builders for the kinds tests usually provision.

pub mod namespace;
pub mod networkpolicy;
pub mod replicaset;
pub mod resourcequota;
pub mod service;
pub mod statefulset;

pub use namespace::NamespaceBuilder;
pub use networkpolicy::NetworkPolicyBuilder;
pub use replicaset::ReplicaSetBuilder;
pub use resourcequota::ResourceQuotaBuilder;
pub use service::{tcp_port, ServiceBuilder};
pub use statefulset::StatefulSetBuilder;

use k8s_openapi::api::core::v1::{PodSpec, PodTemplateSpec};
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

/// Pod template carrying `labels` and no containers yet.
pub(crate) fn pod_template(labels: &BTreeMap<String, String>) -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(labels.clone()),
            ..Default::default()
        }),
        spec: Some(PodSpec::default()),
    }
}
