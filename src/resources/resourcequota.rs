// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::error::{ConvergentError, Result};
use crate::kubernetes::ResourceClient;
use crate::reconciler::{self, Builder, ResourceKind};
use k8s_openapi::api::core::v1::{ResourceQuota, ResourceQuotaSpec};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::{
    api::{ListParams, ObjectMeta},
    Api, Client,
};
use std::collections::BTreeMap;

impl ResourceKind for ResourceQuota {
    const NAMESPACED: bool = true;

    fn api(client: Client, namespace: Option<&str>) -> Api<Self> {
        match namespace {
            Some(ns) => Api::namespaced(client, ns),
            None => Api::all(client),
        }
    }
}

pub type ResourceQuotaBuilder<'c, C> = Builder<'c, ResourceQuota, C>;

impl<'c, C> Builder<'c, ResourceQuota, C>
where
    C: ResourceClient<ResourceQuota> + ?Sized,
{
    pub fn new(client: &'c C, name: &str, namespace: &str) -> Self {
        let definition = ResourceQuota {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: Some(ResourceQuotaSpec::default()),
            status: None,
        };

        Self::from_definition(client, definition)
    }

    /// Cap a single resource, for example `pods` or `requests.cpu`.
    pub fn with_hard_limit(mut self, resource: &str, quantity: &str) -> Self {
        if resource.is_empty() {
            self.record_error("ResourceQuota resource name cannot be empty");
            return self;
        }
        if quantity.is_empty() {
            let msg = format!("ResourceQuota quantity for {} cannot be empty", resource);
            self.record_error(msg);
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|quota| quota.spec.as_mut()) {
            spec.hard
                .get_or_insert_with(BTreeMap::new)
                .insert(resource.to_string(), Quantity(quantity.to_string()));
        }
        self
    }

    pub fn with_hard_limits(mut self, limits: BTreeMap<String, Quantity>) -> Self {
        if limits.is_empty() {
            self.record_error("ResourceQuota hard limits cannot be empty");
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|quota| quota.spec.as_mut()) {
            spec.hard.get_or_insert_with(BTreeMap::new).extend(limits);
        }
        self
    }

    /// Restrict the quota to objects matching every scope, e.g. `BestEffort`.
    pub fn with_scopes(mut self, scopes: &[&str]) -> Self {
        if scopes.is_empty() {
            self.record_error("ResourceQuota scopes cannot be empty");
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|quota| quota.spec.as_mut()) {
            spec.scopes
                .get_or_insert_with(Vec::new)
                .extend(scopes.iter().map(|scope| scope.to_string()));
        }
        self
    }
}

/// List the resource quotas in `namespace`.
pub async fn list<'c, C>(
    client: &'c C,
    namespace: &str,
    options: &[ListParams],
) -> Result<Vec<ResourceQuotaBuilder<'c, C>>>
where
    C: ResourceClient<ResourceQuota> + ?Sized,
{
    if namespace.is_empty() {
        return Err(ConvergentError::InvalidArgument(
            "ResourceQuota 'namespace' cannot be empty".to_string(),
        ));
    }
    reconciler::list(client, Some(namespace), options).await
}
