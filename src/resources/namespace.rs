// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace builder, including bulk cleanup of the objects a test left behind.

use crate::error::{ConvergentError, Result};
use crate::kubernetes::{DynamicClient, ResourceClient};
use crate::reconciler::{self, Builder, ResourceKind};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ListParams, ObjectMeta},
    core::{DynamicObject, GroupVersionResource},
    Api, Client,
};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, instrument};

impl ResourceKind for Namespace {
    const NAMESPACED: bool = false;

    fn api(client: Client, _namespace: Option<&str>) -> Api<Self> {
        Api::all(client)
    }
}

pub type NamespaceBuilder<'c, C> = Builder<'c, Namespace, C>;

impl<'c, C> Builder<'c, Namespace, C>
where
    C: ResourceClient<Namespace> + ?Sized,
{
    pub fn new(client: &'c C, name: &str) -> Self {
        let definition = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        Self::from_definition(client, definition)
    }

    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        if key.is_empty() {
            self.record_error("label key cannot be empty");
            return self;
        }
        if let Some(definition) = self.definition_mut() {
            definition
                .metadata
                .labels
                .get_or_insert_with(BTreeMap::new)
                .insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn with_multiple_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        if labels.is_empty() {
            self.record_error("labels cannot be empty");
            return self;
        }
        if labels.contains_key("") {
            self.record_error("label key cannot be empty");
            return self;
        }
        if let Some(definition) = self.definition_mut() {
            definition
                .metadata
                .labels
                .get_or_insert_with(BTreeMap::new)
                .extend(labels);
        }
        self
    }

    pub fn remove_label(mut self, key: &str) -> Self {
        if let Some(labels) = self
            .definition_mut()
            .and_then(|definition| definition.metadata.labels.as_mut())
        {
            labels.remove(key);
        }
        self
    }
}

impl<'c, C> Builder<'c, Namespace, C>
where
    C: ResourceClient<Namespace> + DynamicClient + ?Sized,
{
    /// Remove every object of the given collections from this namespace,
    /// leaving the config maps the platform provisions on its own.
    pub async fn clean_objects(
        &mut self,
        timeout: Duration,
        gvrs: &[GroupVersionResource],
    ) -> Result<()> {
        self.clean_objects_with(timeout, gvrs, reconciler::system_objects)
            .await
    }

    /// Like [`clean_objects`](Self::clean_objects), keeping the objects accepted by `tolerate`.
    #[instrument(skip(self, gvrs, tolerate), fields(name = %self.name))]
    pub async fn clean_objects_with<F>(
        &mut self,
        timeout: Duration,
        gvrs: &[GroupVersionResource],
        tolerate: F,
    ) -> Result<()>
    where
        F: Fn(&GroupVersionResource, &DynamicObject) -> bool,
    {
        self.validate()?;

        if !self.exists().await {
            return Err(ConvergentError::NotFound {
                kind: "Namespace".to_string(),
                name: self.name.clone(),
            });
        }

        info!(
            "Cleaning {} collections in namespace {}",
            gvrs.len(),
            self.name
        );
        reconciler::clean_objects(
            self.client,
            &self.name,
            gvrs,
            self.poll_interval,
            timeout,
            tolerate,
        )
        .await
    }
}

/// List namespaces, optionally filtered by a single set of list options.
pub async fn list<'c, C>(
    client: &'c C,
    options: &[ListParams],
) -> Result<Vec<NamespaceBuilder<'c, C>>>
where
    C: ResourceClient<Namespace> + ?Sized,
{
    reconciler::list(client, None, options).await
}
