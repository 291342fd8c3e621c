// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The dual-state handle shared by every resource kind.

use super::ResourceKind;
use crate::config::Config;
use crate::constants::DEFAULT_POLL_INTERVAL;
use crate::error::{ConvergentError, Result};
use crate::kubernetes::ResourceClient;
use kube::{Resource, ResourceExt};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Desired definition and last observed object of a single cluster object.
///
/// Mutators record the first failed precondition in the handle instead of
/// returning it. Once recorded, every later mutator is a no-op and every
/// operation short-circuits with that error.
pub struct Builder<'c, K, C: ?Sized> {
    pub(crate) definition: Option<K>,
    pub(crate) object: Option<K>,
    pub(crate) error_msg: Option<String>,
    pub(crate) client: &'c C,
    pub(crate) name: String,
    pub(crate) namespace: Option<String>,
    pub(crate) poll_interval: Duration,
}

impl<'c, K, C> Builder<'c, K, C>
where
    K: ResourceKind,
    C: ResourceClient<K> + ?Sized,
{
    /// Wrap a desired definition. Name and namespace are taken from its metadata
    /// and fixed for the lifetime of the handle.
    ///
    /// Cluster scoped kinds never carry a namespace in their identity.
    pub fn from_definition(client: &'c C, definition: K) -> Self {
        let name = definition.name_any();
        let namespace = definition
            .namespace()
            .filter(|ns| K::NAMESPACED && !ns.is_empty());

        let mut builder = Builder {
            definition: Some(definition),
            object: None,
            error_msg: None,
            client,
            name,
            namespace,
            poll_interval: DEFAULT_POLL_INTERVAL,
        };

        if builder.name.is_empty() {
            builder.record_error(Self::empty_field("name"));
        } else if K::NAMESPACED && builder.namespace.is_none() {
            builder.record_error(Self::empty_field("namespace"));
        }

        builder
    }

    /// Build a handle from a YAML manifest describing the desired object.
    pub fn from_manifest(client: &'c C, manifest: &str) -> Result<Self> {
        let definition: K = serde_yaml::from_str(manifest)?;
        Ok(Self::from_definition(client, definition))
    }

    /// Load an existing object from the cluster. Its current state becomes the
    /// desired definition.
    ///
    /// Unlike [`exists`](Self::exists), any failed read is an error here. The
    /// namespace is ignored for cluster scoped kinds.
    #[instrument(skip(client), fields(kind = %Self::kind_name()))]
    pub async fn pull(client: &'c C, name: &str, namespace: Option<&str>) -> Result<Self> {
        debug!("Pulling existing {} {}", Self::kind_name(), name);

        if name.is_empty() {
            let msg = Self::empty_field("name");
            return Err(ConvergentError::InvalidArgument(msg));
        }
        let namespace = if K::NAMESPACED {
            namespace.filter(|ns| !ns.is_empty())
        } else {
            None
        };
        if K::NAMESPACED && namespace.is_none() {
            let msg = Self::empty_field("namespace");
            return Err(ConvergentError::InvalidArgument(msg));
        }

        let mut definition = K::default();
        definition.meta_mut().name = Some(name.to_string());
        definition.meta_mut().namespace = namespace.map(str::to_string);
        let mut builder = Self::from_definition(client, definition);

        let object = match client.get(namespace, name).await {
            Ok(object) => object,
            Err(e) if e.is_not_found() => {
                return Err(ConvergentError::NotFound {
                    kind: Self::kind_name(),
                    name: builder.describe(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        builder.definition = Some(object.clone());
        builder.object = Some(object);

        Ok(builder)
    }

    /// Wrap an object returned by the cluster, whose state is both desired and observed.
    pub(crate) fn from_object(client: &'c C, object: K) -> Self {
        let mut builder = Self::from_definition(client, object.clone());
        builder.object = Some(object);
        builder
    }

    /// Check that the handle can be used, in a fixed order: a definition must
    /// be present before the pending error is consulted.
    pub fn validate(&self) -> Result<()> {
        if self.definition.is_none() {
            return Err(ConvergentError::UndefinedDefinition {
                kind: Self::kind_name(),
            });
        }

        if let Some(msg) = &self.error_msg {
            return Err(ConvergentError::InvalidArgument(msg.clone()));
        }

        Ok(())
    }

    /// Interval between two checks of the blocking waits.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        if self.validate().is_err() {
            return self;
        }
        if interval.is_zero() {
            self.record_error("poll interval must be greater than zero");
            return self;
        }
        self.poll_interval = interval;
        self
    }

    pub fn with_config(self, config: &Config) -> Self {
        self.with_poll_interval(config.poll_interval)
    }

    /// Mutable access to the definition for `with_*` mutators, `None` when the
    /// handle is already poisoned.
    pub fn definition_mut(&mut self) -> Option<&mut K> {
        if self.validate().is_err() {
            return None;
        }
        self.definition.as_mut()
    }

    /// Record a failed precondition. Only the first one is kept.
    pub fn record_error(&mut self, msg: impl Into<String>) {
        if self.error_msg.is_none() {
            let msg = msg.into();
            debug!("{} {}: {}", Self::kind_name(), self.describe(), msg);
            self.error_msg = Some(msg);
        }
    }

    pub fn definition(&self) -> Option<&K> {
        self.definition.as_ref()
    }

    /// Last state fetched from the cluster, if any.
    pub fn object(&self) -> Option<&K> {
        self.object.as_ref()
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub(crate) fn kind_name() -> String {
        K::kind(&()).to_string()
    }

    fn empty_field(field: &str) -> String {
        format!("{} '{}' cannot be empty", Self::kind_name(), field)
    }

    /// `namespace/name` for namespaced objects, `name` otherwise.
    pub(crate) fn describe(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

impl<K: fmt::Debug, C: ?Sized> fmt::Debug for Builder<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("definition", &self.definition)
            .field("object", &self.object)
            .field("error_msg", &self.error_msg)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
