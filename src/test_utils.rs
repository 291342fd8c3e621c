// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: an in-memory counting client and a mock HTTP service for
//! exercising a real `kube::Client`.

use crate::error::ClientError;
use crate::kubernetes::{DynamicClient, ResourceClient};
use crate::reconciler::ResourceKind;
use async_trait::async_trait;
use futures::future::BoxFuture;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::api::{ListParams, ObjectMeta};
use kube::client::Body;
use kube::core::{DynamicObject, GroupVersionResource};
use kube::{Client, Resource, ResourceExt};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;
use tracing::subscriber::DefaultGuard;
use tracing::Level;

type Key = (String, String);
type GetHook<K> = Box<dyn FnMut(&mut K) + Send>;

fn key(namespace: Option<&str>, name: &str) -> Key {
    (namespace.unwrap_or_default().to_string(), name.to_string())
}

/// In-memory stand-in for the cluster that records every call it receives.
pub struct FakeClient<K> {
    objects: Mutex<BTreeMap<Key, K>>,
    terminating: Mutex<BTreeMap<Key, usize>>,
    delete_delay: usize,
    get_errors: Mutex<VecDeque<ClientError>>,
    list_errors: Mutex<VecDeque<ClientError>>,
    create_errors: Mutex<VecDeque<ClientError>>,
    update_errors: Mutex<VecDeque<ClientError>>,
    get_hook: Mutex<Option<GetHook<K>>>,
    dynamic: Mutex<BTreeMap<String, Vec<DynamicObject>>>,
    stuck_dynamic: BTreeSet<String>,
    calls: Mutex<Vec<&'static str>>,
    last_updated_version: Mutex<Option<String>>,
    resource_version: AtomicU64,
}

impl<K: ResourceKind> FakeClient<K> {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            terminating: Mutex::new(BTreeMap::new()),
            delete_delay: 0,
            get_errors: Mutex::new(VecDeque::new()),
            list_errors: Mutex::new(VecDeque::new()),
            create_errors: Mutex::new(VecDeque::new()),
            update_errors: Mutex::new(VecDeque::new()),
            get_hook: Mutex::new(None),
            dynamic: Mutex::new(BTreeMap::new()),
            stuck_dynamic: BTreeSet::new(),
            calls: Mutex::new(Vec::new()),
            last_updated_version: Mutex::new(None),
            resource_version: AtomicU64::new(1),
        }
    }

    /// Seed an object that already exists.
    pub fn with_object(self, mut object: K) -> Self {
        object.meta_mut().resource_version = Some(self.next_version());
        let k = key(object.namespace().as_deref(), &object.name_any());
        self.objects.lock().unwrap().insert(k, object);
        self
    }

    /// Keep deleted objects readable for `reads` more gets.
    pub fn with_delete_delay(mut self, reads: usize) -> Self {
        self.delete_delay = reads;
        self
    }

    /// Seed untyped objects for a resource collection such as `configmaps`.
    pub fn with_dynamic(self, resource: &str, objects: Vec<DynamicObject>) -> Self {
        self.dynamic
            .lock()
            .unwrap()
            .insert(resource.to_string(), objects);
        self
    }

    /// Deletes of this untyped object succeed without removing it.
    pub fn with_stuck_dynamic(mut self, name: &str) -> Self {
        self.stuck_dynamic.insert(name.to_string());
        self
    }

    /// Apply `hook` to the stored object on every successful get.
    pub fn on_get<F>(&self, hook: F)
    where
        F: FnMut(&mut K) + Send + 'static,
    {
        *self.get_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn fail_next_get(&self, err: ClientError) {
        self.get_errors.lock().unwrap().push_back(err);
    }

    pub fn fail_next_list(&self, err: ClientError) {
        self.list_errors.lock().unwrap().push_back(err);
    }

    pub fn fail_next_create(&self, err: ClientError) {
        self.create_errors.lock().unwrap().push_back(err);
    }

    pub fn fail_next_update(&self, err: ClientError) {
        self.update_errors.lock().unwrap().push_back(err);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn count_of(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == op)
            .count()
    }

    pub fn stored(&self, namespace: Option<&str>, name: &str) -> Option<K> {
        self.objects
            .lock()
            .unwrap()
            .get(&key(namespace, name))
            .cloned()
    }

    /// Resource version carried by the object passed to the last update.
    pub fn last_updated_version(&self) -> Option<String> {
        self.last_updated_version.lock().unwrap().clone()
    }

    pub fn dynamic_names(&self, resource: &str) -> Vec<String> {
        self.dynamic
            .lock()
            .unwrap()
            .get(resource)
            .map(|objects| objects.iter().map(|o| o.name_any()).collect())
            .unwrap_or_default()
    }

    fn record(&self, op: &'static str) {
        self.calls.lock().unwrap().push(op);
    }

    fn next_version(&self) -> String {
        self.resource_version
            .fetch_add(1, Ordering::SeqCst)
            .to_string()
    }

    fn not_found(name: &str) -> ClientError {
        ClientError::NotFound(format!("{} \"{}\" not found", K::kind(&()), name))
    }
}

#[async_trait]
impl<K: ResourceKind> ResourceClient<K> for FakeClient<K> {
    async fn get(&self, namespace: Option<&str>, name: &str) -> Result<K, ClientError> {
        self.record("get");
        if let Some(err) = self.get_errors.lock().unwrap().pop_front() {
            return Err(err);
        }

        let k = key(namespace, name);
        let mut objects = self.objects.lock().unwrap();
        let mut terminating = self.terminating.lock().unwrap();
        if let Some(remaining) = terminating.get_mut(&k) {
            if *remaining == 0 {
                terminating.remove(&k);
                objects.remove(&k);
                return Err(Self::not_found(name));
            }
            *remaining -= 1;
        }

        let object = objects.get_mut(&k).ok_or_else(|| Self::not_found(name))?;
        if let Some(hook) = self.get_hook.lock().unwrap().as_mut() {
            hook(object);
        }
        Ok(object.clone())
    }

    async fn list(
        &self,
        namespace: Option<&str>,
        _params: &ListParams,
    ) -> Result<Vec<K>, ClientError> {
        self.record("list");
        if let Some(err) = self.list_errors.lock().unwrap().pop_front() {
            return Err(err);
        }

        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|((ns, _), _)| namespace.map_or(true, |wanted| wanted == ns.as_str()))
            .map(|(_, object)| object.clone())
            .collect())
    }

    async fn create(&self, object: &K) -> Result<K, ClientError> {
        self.record("create");
        if let Some(err) = self.create_errors.lock().unwrap().pop_front() {
            return Err(err);
        }

        let k = key(object.namespace().as_deref(), &object.name_any());
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(&k) {
            return Err(ClientError::AlreadyExists(object.name_any()));
        }
        let mut created = object.clone();
        created.meta_mut().resource_version = Some(self.next_version());
        objects.insert(k, created.clone());
        Ok(created)
    }

    async fn update(&self, object: &K) -> Result<K, ClientError> {
        self.record("update");
        *self.last_updated_version.lock().unwrap() = object.resource_version();
        if let Some(err) = self.update_errors.lock().unwrap().pop_front() {
            return Err(err);
        }

        let k = key(object.namespace().as_deref(), &object.name_any());
        let mut objects = self.objects.lock().unwrap();
        if !objects.contains_key(&k) {
            return Err(Self::not_found(&object.name_any()));
        }
        let mut updated = object.clone();
        updated.meta_mut().resource_version = Some(self.next_version());
        objects.insert(k, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, namespace: Option<&str>, name: &str) -> Result<(), ClientError> {
        self.record("delete");

        let k = key(namespace, name);
        let mut objects = self.objects.lock().unwrap();
        if !objects.contains_key(&k) {
            return Err(Self::not_found(name));
        }
        if self.delete_delay == 0 {
            objects.remove(&k);
        } else {
            self.terminating
                .lock()
                .unwrap()
                .entry(k)
                .or_insert(self.delete_delay);
        }
        Ok(())
    }
}

#[async_trait]
impl<K: ResourceKind> DynamicClient for FakeClient<K> {
    async fn list_dynamic(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
    ) -> Result<Vec<DynamicObject>, ClientError> {
        self.record("list_dynamic");
        Ok(self
            .dynamic
            .lock()
            .unwrap()
            .get(&gvr.resource)
            .map(|objects| {
                objects
                    .iter()
                    .filter(|o| o.namespace().as_deref() == Some(namespace))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_dynamic(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
        name: &str,
    ) -> Result<(), ClientError> {
        self.record("delete_dynamic");
        if self.stuck_dynamic.contains(name) {
            return Ok(());
        }

        let mut dynamic = self.dynamic.lock().unwrap();
        let objects = dynamic.entry(gvr.resource.clone()).or_default();
        let before = objects.len();
        objects.retain(|o| !(o.name_any() == name && o.namespace().as_deref() == Some(namespace)));
        if objects.len() == before {
            return Err(ClientError::NotFound(name.to_string()));
        }
        Ok(())
    }
}

/// Untyped object with only a name and namespace.
pub fn dynamic_object(namespace: &str, name: &str) -> DynamicObject {
    DynamicObject {
        types: None,
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: serde_json::Value::Null,
    }
}

/// Formatted output of a subscriber installed for the current thread only.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Capture events at `level` and above until the guard is dropped.
    pub fn install(&self, level: Level) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(level)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

type Routes = HashMap<(String, String), (u16, String)>;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
    bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            bodies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Method and path of every request received so far
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// JSON bodies of every POST and PUT received so far
    pub fn bodies(&self) -> Vec<serde_json::Value> {
        self.bodies.lock().unwrap().clone()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));

        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&(method, path))
            .cloned();
        let bodies = self.bodies.clone();

        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            if let Ok(json) = serde_json::from_slice::<serde_json::Value>(&bytes) {
                bodies.lock().unwrap().push(json);
            }

            let (status, body) = response.unwrap_or_else(|| {
                // Default 404 for unmatched requests
                (404, not_found_json("resource", "unknown"))
            });
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid",
            "resourceVersion": "1"
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}
