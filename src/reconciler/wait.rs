// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Blocking waits built on [`poll_until`].

use super::{poll_until, Builder, Readiness, ResourceKind};
use crate::error::{ClientError, Result};
use crate::kubernetes::ResourceClient;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

impl<'c, K, C> Builder<'c, K, C>
where
    K: ResourceKind,
    C: ResourceClient<K> + ?Sized,
{
    /// Delete the object and wait until the cluster no longer returns it.
    #[instrument(skip(self), fields(kind = %Self::kind_name(), name = %self.describe()))]
    pub async fn delete_and_wait(&mut self, timeout: Duration) -> Result<()> {
        self.delete().await?;
        self.wait_until_deleted(timeout).await
    }

    /// Wait until a read of the object reports not-found.
    pub async fn wait_until_deleted(&self, timeout: Duration) -> Result<()> {
        self.validate()?;

        let client = self.client;
        let namespace = self.namespace.as_deref();
        let name = self.name.as_str();

        poll_until(self.poll_interval, timeout, true, move || async move {
            match client.get(namespace, name).await {
                Ok(_) => Ok(false),
                Err(e) if e.is_not_found() => Ok(true),
                Err(e) => Err(e),
            }
        })
        .await?;

        debug!("{} {} is gone", Self::kind_name(), self.describe());
        Ok(())
    }
}

impl<'c, K, C> Builder<'c, K, C>
where
    K: Readiness,
    C: ResourceClient<K> + ?Sized,
{
    /// Create the object and wait until its readiness predicate holds.
    #[instrument(skip(self), fields(kind = %Self::kind_name(), name = %self.describe()))]
    pub async fn create_and_wait(&mut self, timeout: Duration) -> Result<&mut Self> {
        self.create().await?;
        self.wait_until_ready(timeout).await?;
        Ok(self)
    }

    /// Poll the object until its readiness predicate holds, without creating it.
    pub async fn wait_until_ready(&mut self, timeout: Duration) -> Result<()> {
        self.validate()?;

        let client = self.client;
        let namespace = self.namespace.as_deref();
        let name = self.name.as_str();
        let latest: Mutex<Option<K>> = Mutex::new(None);
        let latest_ref = &latest;

        let outcome = poll_until(self.poll_interval, timeout, true, move || async move {
            let object = client.get(namespace, name).await?;
            let counts = object.replica_counts();
            debug!(
                "{} {}: {} of {} ready",
                K::kind(&()),
                name,
                counts.ready,
                counts.desired
            );
            *latest_ref.lock().await = Some(object);
            Ok::<_, ClientError>(counts.is_ready())
        })
        .await;

        if let Some(object) = latest.into_inner() {
            self.object = Some(object);
        }
        outcome?;

        info!("{} {} is ready", Self::kind_name(), self.describe());
        Ok(())
    }

    /// Whether the readiness predicate holds within `timeout`.
    pub async fn is_ready(&mut self, timeout: Duration) -> bool {
        match self.wait_until_ready(timeout).await {
            Ok(()) => true,
            Err(e) => {
                debug!(
                    "{} {} is not ready: {}",
                    Self::kind_name(),
                    self.describe(),
                    e
                );
                false
            }
        }
    }
}
