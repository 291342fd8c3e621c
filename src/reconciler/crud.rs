// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Idempotent create, read, update and delete of the object behind a builder.

use super::{Builder, ResourceKind};
use crate::error::{ConvergentError, ErrorKind, Result};
use crate::kubernetes::ResourceClient;
use kube::Resource;
use tracing::{debug, info, instrument, warn};

impl<'c, K, C> Builder<'c, K, C>
where
    K: ResourceKind,
    C: ResourceClient<K> + ?Sized,
{
    /// Read the object by identity and cache it.
    ///
    /// Any error other than not-found counts as "exists", so that a flaky read
    /// never leads to a duplicate create.
    #[instrument(skip(self), fields(kind = %Self::kind_name(), name = %self.describe()))]
    pub async fn exists(&mut self) -> bool {
        if let Err(e) = self.validate() {
            debug!("Skipping existence check: {}", e);
            return false;
        }

        let namespace = self.namespace.as_deref();
        match self.client.get(namespace, &self.name).await {
            Ok(object) => {
                self.object = Some(object);
                true
            }
            Err(e) if e.is_not_found() => {
                debug!("{} {} does not exist", Self::kind_name(), self.describe());
                self.object = None;
                false
            }
            Err(e) => {
                warn!(
                    "Failed to read {} {}, assuming it exists: {}",
                    Self::kind_name(),
                    self.describe(),
                    e
                );
                true
            }
        }
    }

    /// Fetch the current object, surfacing any error.
    #[instrument(skip(self), fields(kind = %Self::kind_name(), name = %self.describe()))]
    pub async fn get(&mut self) -> Result<&K> {
        self.validate()?;

        let object = self
            .client
            .get(self.namespace.as_deref(), &self.name)
            .await?;

        Ok(&*self.object.insert(object))
    }

    /// Create the object unless it already exists.
    #[instrument(skip(self), fields(kind = %Self::kind_name(), name = %self.describe()))]
    pub async fn create(&mut self) -> Result<&mut Self> {
        self.validate()?;

        if self.exists().await {
            debug!("{} {} already exists", Self::kind_name(), self.describe());
            return Ok(self);
        }

        let Some(definition) = self.definition.as_ref() else {
            return Err(ConvergentError::UndefinedDefinition {
                kind: Self::kind_name(),
            });
        };

        info!("Creating {} {}", Self::kind_name(), self.describe());
        match self.client.create(definition).await {
            Ok(created) => self.object = Some(created),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(
                    "{} {} was created concurrently, reading it back",
                    Self::kind_name(),
                    self.describe()
                );
                let object = self
                    .client
                    .get(self.namespace.as_deref(), &self.name)
                    .await?;
                self.object = Some(object);
            }
            Err(e) => return Err(e.into()),
        }

        Ok(self)
    }

    /// Push the definition to the cluster.
    ///
    /// With `force`, a rejected update is followed by deleting the object and
    /// creating it again from the definition.
    #[instrument(skip(self), fields(kind = %Self::kind_name(), name = %self.describe()))]
    pub async fn update(&mut self, force: bool) -> Result<&mut Self> {
        self.validate()?;

        let Some(definition) = self.definition.as_ref() else {
            return Err(ConvergentError::UndefinedDefinition {
                kind: Self::kind_name(),
            });
        };

        let mut desired = definition.clone();
        if let Some(observed) = &self.object {
            desired.meta_mut().resource_version = observed.meta().resource_version.clone();
        }

        info!("Updating {} {}", Self::kind_name(), self.describe());
        match self.client.update(&desired).await {
            Ok(updated) => {
                self.object = Some(updated);
                Ok(self)
            }
            Err(e) if force => {
                warn!(
                    "Failed to update {} {}, recreating it: {}",
                    Self::kind_name(),
                    self.describe(),
                    e
                );
                self.recreate().await?;
                Ok(self)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn recreate(&mut self) -> Result<()> {
        self.delete().await?;

        let Some(definition) = self.definition.as_ref() else {
            return Err(ConvergentError::UndefinedDefinition {
                kind: Self::kind_name(),
            });
        };
        let mut fresh = definition.clone();
        fresh.meta_mut().resource_version = None;

        info!("Recreating {} {}", Self::kind_name(), self.describe());
        let created = self.client.create(&fresh).await?;
        self.object = Some(created);

        Ok(())
    }

    /// Delete the object if it exists.
    #[instrument(skip(self), fields(kind = %Self::kind_name(), name = %self.describe()))]
    pub async fn delete(&mut self) -> Result<()> {
        self.validate()?;

        if !self.exists().await {
            debug!(
                "{} {} does not exist, nothing to delete",
                Self::kind_name(),
                self.describe()
            );
            self.object = None;
            return Ok(());
        }

        info!("Deleting {} {}", Self::kind_name(), self.describe());
        match self
            .client
            .delete(self.namespace.as_deref(), &self.name)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!("{} {} was already gone", Self::kind_name(), self.describe());
            }
            Err(e) => return Err(e.into()),
        }
        self.object = None;

        Ok(())
    }
}
