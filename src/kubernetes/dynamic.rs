// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Untyped access to arbitrary resource collections, addressed by GVR.

use crate::error::ClientError;
use async_trait::async_trait;
use kube::{
    api::{DeleteParams, ListParams},
    core::{ApiResource, DynamicObject, GroupVersionResource},
    Api, Client,
};
use tracing::instrument;

/// Listing and deletion of objects whose kind is only known by its GVR.
#[async_trait]
pub trait DynamicClient: Send + Sync {
    async fn list_dynamic(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
    ) -> Result<Vec<DynamicObject>, ClientError>;

    async fn delete_dynamic(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
        name: &str,
    ) -> Result<(), ClientError>;
}

/// Build the [`ApiResource`] needed to address a collection by GVR. The kind is
/// not part of a GVR and is not needed to build request URLs.
pub fn api_resource(gvr: &GroupVersionResource) -> ApiResource {
    ApiResource {
        group: gvr.group.clone(),
        version: gvr.version.clone(),
        api_version: if gvr.group.is_empty() {
            gvr.version.clone()
        } else {
            format!("{}/{}", gvr.group, gvr.version)
        },
        kind: String::new(),
        plural: gvr.resource.clone(),
    }
}

#[async_trait]
impl DynamicClient for Client {
    #[instrument(skip(self), fields(resource = %gvr.resource))]
    async fn list_dynamic(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
    ) -> Result<Vec<DynamicObject>, ClientError> {
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.clone(), namespace, &api_resource(gvr));
        Ok(api.list(&ListParams::default()).await?.items)
    }

    #[instrument(skip(self), fields(resource = %gvr.resource))]
    async fn delete_dynamic(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
        name: &str,
    ) -> Result<(), ClientError> {
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.clone(), namespace, &api_resource(gvr));
        api.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}
