// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bulk listing and bulk cleanup of many objects at once.

use super::{poll_until, Builder, ResourceKind};
use crate::constants::system_objects as provisioned;
use crate::error::{ClientError, ConvergentError, Result};
use crate::kubernetes::{DynamicClient, ResourceClient};
use futures::future::try_join_all;
use kube::{
    api::ListParams,
    core::{DynamicObject, GroupVersionResource},
    ResourceExt,
};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// List objects of one kind and wrap each in a builder whose definition is its
/// current state.
///
/// At most one options value may be given.
#[instrument(skip(client, options), fields(kind = %K::kind(&())))]
pub async fn list<'c, K, C>(
    client: &'c C,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<Builder<'c, K, C>>>
where
    K: ResourceKind,
    C: ResourceClient<K> + ?Sized,
{
    if options.len() > 1 {
        return Err(ConvergentError::Usage(format!(
            "more than one ListParams was passed, got {}",
            options.len()
        )));
    }
    let params = options.first().cloned().unwrap_or_default();

    let items = client.list(namespace, &params).await?;
    debug!("Found {} {} objects", items.len(), K::kind(&()));

    Ok(items
        .into_iter()
        .map(|object| Builder::from_object(client, object))
        .collect())
}

/// Accepts the config maps every namespace receives from the platform.
pub fn system_objects(gvr: &GroupVersionResource, object: &DynamicObject) -> bool {
    gvr.resource == provisioned::CONFIG_MAPS
        && provisioned::CONFIG_MAP_NAMES.contains(&object.name_any().as_str())
}

/// Delete every object of the given collections in `namespace`, then wait until
/// each collection only holds objects accepted by `tolerate`.
#[instrument(skip(client, gvrs, tolerate))]
pub async fn clean_objects<D, F>(
    client: &D,
    namespace: &str,
    gvrs: &[GroupVersionResource],
    interval: Duration,
    timeout: Duration,
    tolerate: F,
) -> Result<()>
where
    D: DynamicClient + ?Sized,
    F: Fn(&GroupVersionResource, &DynamicObject) -> bool,
{
    if namespace.is_empty() {
        return Err(ConvergentError::InvalidArgument(
            "namespace cannot be empty".to_string(),
        ));
    }

    for gvr in gvrs {
        let targets: Vec<DynamicObject> = client
            .list_dynamic(gvr, namespace)
            .await?
            .into_iter()
            .filter(|object| !tolerate(gvr, object))
            .collect();

        info!(
            "Removing {} {} from namespace {}",
            targets.len(),
            gvr.resource,
            namespace
        );
        try_join_all(targets.iter().map(|object| async move {
            let name = object.name_any();
            match client.delete_dynamic(gvr, namespace, &name).await {
                Err(e) if !e.is_not_found() => Err(e),
                _ => Ok(()),
            }
        }))
        .await?;

        let tolerate_ref = &tolerate;
        poll_until(interval, timeout, true, move || async move {
            let remaining = client
                .list_dynamic(gvr, namespace)
                .await?
                .iter()
                .filter(|object| !tolerate_ref(gvr, *object))
                .count();
            debug!(
                "{} {} left in namespace {}",
                remaining, gvr.resource, namespace
            );
            Ok::<_, ClientError>(remaining == 0)
        })
        .await?;
    }

    Ok(())
}
