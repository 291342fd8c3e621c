// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed per-kind access to the cluster.

use crate::error::ClientError;
use crate::reconciler::ResourceKind;
use async_trait::async_trait;
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    Client, ResourceExt,
};
use tracing::{debug, instrument};

/// The five primitive calls a builder issues against the cluster for one kind.
#[async_trait]
pub trait ResourceClient<K: ResourceKind>: Send + Sync {
    async fn get(&self, namespace: Option<&str>, name: &str) -> Result<K, ClientError>;

    async fn list(
        &self,
        namespace: Option<&str>,
        params: &ListParams,
    ) -> Result<Vec<K>, ClientError>;

    async fn create(&self, object: &K) -> Result<K, ClientError>;

    async fn update(&self, object: &K) -> Result<K, ClientError>;

    async fn delete(&self, namespace: Option<&str>, name: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl<K: ResourceKind> ResourceClient<K> for Client {
    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    async fn get(&self, namespace: Option<&str>, name: &str) -> Result<K, ClientError> {
        let object = K::api(self.clone(), namespace).get(name).await?;
        Ok(object)
    }

    #[instrument(skip(self, params), fields(kind = %K::kind(&())))]
    async fn list(
        &self,
        namespace: Option<&str>,
        params: &ListParams,
    ) -> Result<Vec<K>, ClientError> {
        let list = K::api(self.clone(), namespace).list(params).await?;
        debug!("Listed {} objects", list.items.len());
        Ok(list.items)
    }

    #[instrument(skip(self, object), fields(kind = %K::kind(&()), name = %object.name_any()))]
    async fn create(&self, object: &K) -> Result<K, ClientError> {
        let api = K::api(self.clone(), object.namespace().as_deref());
        let created = api.create(&PostParams::default(), object).await?;
        Ok(created)
    }

    #[instrument(skip(self, object), fields(kind = %K::kind(&()), name = %object.name_any()))]
    async fn update(&self, object: &K) -> Result<K, ClientError> {
        let api = K::api(self.clone(), object.namespace().as_deref());
        let updated = api
            .replace(&object.name_any(), &PostParams::default(), object)
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    async fn delete(&self, namespace: Option<&str>, name: &str) -> Result<(), ClientError> {
        K::api(self.clone(), namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }
}
