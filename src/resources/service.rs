// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::error::{ConvergentError, Result};
use crate::kubernetes::ResourceClient;
use crate::reconciler::{self, Builder, ResourceKind};
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::{
    api::{ListParams, ObjectMeta},
    Api, Client,
};
use std::collections::BTreeMap;

const SERVICE_TYPES: [&str; 4] = ["ClusterIP", "NodePort", "LoadBalancer", "ExternalName"];

impl ResourceKind for Service {
    const NAMESPACED: bool = true;

    fn api(client: Client, namespace: Option<&str>) -> Api<Self> {
        match namespace {
            Some(ns) => Api::namespaced(client, ns),
            None => Api::all(client),
        }
    }
}

pub type ServiceBuilder<'c, C> = Builder<'c, Service, C>;

impl<'c, C> Builder<'c, Service, C>
where
    C: ResourceClient<Service> + ?Sized,
{
    /// A service routing to the pods matched by `selector` through one initial port.
    pub fn new(
        client: &'c C,
        name: &str,
        namespace: &str,
        selector: BTreeMap<String, String>,
        port: ServicePort,
    ) -> Self {
        let definition = Service {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: Some(ServiceSpec {
                selector: Some(selector.clone()),
                ports: Some(vec![port.clone()]),
                ..Default::default()
            }),
            status: None,
        };

        let mut builder = Self::from_definition(client, definition);
        if selector.is_empty() {
            builder.record_error("Service 'selector' cannot be empty");
        } else if let Err(msg) = check_port(&port) {
            builder.record_error(msg);
        }
        builder
    }

    pub fn with_port(mut self, port: ServicePort) -> Self {
        if let Err(msg) = check_port(&port) {
            self.record_error(msg);
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|svc| svc.spec.as_mut()) {
            spec.ports.get_or_insert_with(Vec::new).push(port);
        }
        self
    }

    /// One of `ClusterIP`, `NodePort`, `LoadBalancer` or `ExternalName`.
    pub fn with_type(mut self, service_type: &str) -> Self {
        if !SERVICE_TYPES.contains(&service_type) {
            self.record_error(format!("unsupported service type {}", service_type));
            return self;
        }
        if let Some(spec) = self.definition_mut().and_then(|svc| svc.spec.as_mut()) {
            spec.type_ = Some(service_type.to_string());
        }
        self
    }

    /// Make the service headless, as stateful sets expect for their pod DNS names.
    pub fn headless(mut self) -> Self {
        if let Some(spec) = self.definition_mut().and_then(|svc| svc.spec.as_mut()) {
            spec.cluster_ip = Some("None".to_string());
        }
        self
    }
}

/// A TCP port forwarding to `target_port` on the selected pods.
pub fn tcp_port(name: &str, port: i32, target_port: i32) -> ServicePort {
    ServicePort {
        name: Some(name.to_string()),
        port,
        target_port: Some(IntOrString::Int(target_port)),
        protocol: Some("TCP".to_string()),
        ..Default::default()
    }
}

fn check_port(port: &ServicePort) -> std::result::Result<(), String> {
    if !(1..=65535).contains(&port.port) {
        return Err(format!("service port {} is out of range", port.port));
    }
    Ok(())
}

/// List the services in `namespace`.
pub async fn list<'c, C>(
    client: &'c C,
    namespace: &str,
    options: &[ListParams],
) -> Result<Vec<ServiceBuilder<'c, C>>>
where
    C: ResourceClient<Service> + ?Sized,
{
    if namespace.is_empty() {
        return Err(ConvergentError::InvalidArgument(
            "Service 'namespace' cannot be empty".to_string(),
        ));
    }
    reconciler::list(client, Some(namespace), options).await
}
