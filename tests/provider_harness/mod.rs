//! Shared test harness for data provider testing
//!
//! Provides a sample export (deployment, beans, observers, contexts, fired
//! events, invocation trees), writes it as a zip archive and builds
//! providers over it.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod provider_harness;
//! use provider_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod provider_tests;

use async_trait::async_trait;
use serde_json::{Value, json};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use probe::core::{DataProvider, ProbeError, ProbeResult};
use probe::server::ProbeServer;
use probe::storage::SnapshotProvider;

// ---------------------------------------------------------------------------
// Sample export
// ---------------------------------------------------------------------------

pub const CONTEXT_PATH: &str = "/probe-client-adapter";

pub fn deployment() -> Value {
    json!({
        "contextId": "STATIC_INSTANCE",
        "bdas": [
            {"id": "bda-web", "bdaId": "shop.war", "beans": 3},
            {"id": "bda-extra", "bdaId": "shop.war.additionalClasses", "beans": 1}
        ],
        "configuration": [{"name": "CONCURRENT_DEPLOYMENT", "value": true}]
    })
}

/// Five beans: MANAGED, MANAGED, SESSION, PRODUCER_METHOD, BUILT_IN
pub fn beans() -> Vec<Value> {
    vec![
        json!({
            "id": "b1",
            "kind": "MANAGED",
            "beanClass": "com.acme.ShoppingCart",
            "scope": "@SessionScoped",
            "bdaId": "bda-web",
            "types": ["com.acme.ShoppingCart", "java.lang.Object"],
            "qualifiers": ["@Default", "@Any"],
            "dependencies": [
                {"id": "b2", "beanClass": "com.acme.PriceCalculator", "dependencies": [{"id": "b3"}]}
            ],
            "dependents": [
                {"id": "b4", "beanClass": "com.acme.Resources", "dependents": [{"id": "b5"}]}
            ]
        }),
        json!({
            "id": "b2",
            "kind": "MANAGED",
            "beanClass": "com.acme.PriceCalculator",
            "scope": "@Dependent",
            "bdaId": "bda-web",
            "isAlternative": true,
            "types": ["com.acme.PriceCalculator"],
            "qualifiers": ["@Default"]
        }),
        json!({
            "id": "b3",
            "kind": "SESSION",
            "beanClass": "com.acme.OrderRepository",
            "scope": "@Stateless",
            "bdaId": "bda-web",
            "types": ["com.acme.OrderRepository"],
            "stereotypes": ["@Model"]
        }),
        json!({
            "id": "b4",
            "kind": "PRODUCER_METHOD",
            "beanClass": "com.acme.Resources",
            "bdaId": "bda-extra",
            "unused": true,
            "types": ["javax.persistence.EntityManager"]
        }),
        json!({
            "id": "b5",
            "kind": "BUILT_IN",
            "beanClass": "org.jboss.weld.bean.builtin.InstanceImpl",
            "types": ["javax.enterprise.inject.Instance"]
        }),
    ]
}

pub fn observers() -> Vec<Value> {
    vec![
        json!({
            "id": "o1",
            "beanClass": "com.acme.AuditObserver",
            "observedType": "com.acme.OrderPlaced",
            "qualifiers": ["@Any"],
            "reception": "ALWAYS",
            "txPhase": "AFTER_SUCCESS",
            "declaringBean": {"id": "b2", "kind": "MANAGED", "bdaId": "bda-web"}
        }),
        json!({
            "id": "o2",
            "beanClass": "org.jboss.weld.probe.ProbeExtension",
            "observedType": "javax.enterprise.inject.spi.AfterBeanDiscovery",
            "reception": "ALWAYS",
            "txPhase": "IN_PROGRESS",
            "declaringBean": {"kind": "EXTENSION", "bdaId": "bda-extra"}
        }),
    ]
}

pub fn contexts() -> Value {
    json!([
        {"id": "request", "scope": "javax.enterprise.context.RequestScoped"},
        {"id": "application", "scope": "javax.enterprise.context.ApplicationScoped"}
    ])
}

pub fn request_context() -> Value {
    json!({
        "scope": "javax.enterprise.context.RequestScoped",
        "instances": [{"bean": "b1", "beanClass": "com.acme.ShoppingCart"}]
    })
}

pub fn events() -> Vec<Value> {
    vec![
        json!({
            "id": "e1",
            "kind": "CONTAINER",
            "type": "javax.enterprise.inject.spi.AfterBeanDiscovery",
            "eventInfo": "AfterBeanDiscoveryImpl",
            "qualifiers": ["@Any"]
        }),
        json!({
            "id": "e2",
            "kind": "APPLICATION",
            "type": "com.acme.OrderPlaced",
            "eventInfo": "Order 42 placed",
            "qualifiers": ["@Any", "@Default"]
        }),
        json!({
            "id": "e3",
            "kind": "APPLICATION",
            "type": "com.acme.OrderShipped",
            "eventInfo": "Order 42 shipped",
            "qualifiers": ["@Any"]
        }),
    ]
}

/// One invocation tree, three levels deep
pub fn invocations() -> Vec<Value> {
    vec![json!({
        "id": "i1",
        "beanClass": "com.acme.OrderResource",
        "declaringClass": "com.acme.OrderResource",
        "methodName": "placeOrder",
        "description": "POST /orders",
        "children": [{
            "beanClass": "com.acme.OrderService",
            "methodName": "create",
            "children": [{
                "beanClass": "com.acme.OrderRepository",
                "methodName": "flushDeeplyNested",
                "children": []
            }]
        }]
    })]
}

/// All entries of the sample export, keyed by archive entry name
pub fn sample_documents() -> Vec<(String, String)> {
    vec![
        ("deployment.json".to_string(), deployment().to_string()),
        ("beans.json".to_string(), json!({"data": beans()}).to_string()),
        ("observers.json".to_string(), json!({"data": observers()}).to_string()),
        ("contexts.json".to_string(), contexts().to_string()),
        ("context-request.json".to_string(), request_context().to_string()),
        ("fired-events.json".to_string(), json!({"data": events()}).to_string()),
        (
            "invocation-trees.json".to_string(),
            json!({"data": invocations()}).to_string(),
        ),
    ]
}

/// Write `documents` as a zip archive at `path`
pub fn write_zip_archive(path: &Path, documents: &[(String, String)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in documents {
        writer
            .start_file(name.as_str(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

/// Sample export written to a fresh temporary directory
pub fn sample_archive() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weld-probe-export.zip");
    write_zip_archive(&path, &sample_documents());
    (dir, path)
}

pub fn sample_snapshot() -> SnapshotProvider {
    SnapshotProvider::from_documents(sample_documents()).unwrap()
}

pub fn parse(json: &str) -> Value {
    serde_json::from_str(json)
        .unwrap_or_else(|e| panic!("Provider returned invalid JSON ({}): {}", e, json))
}

/// Ids of the `data` items of a page envelope
pub fn page_ids(page: &Value) -> Vec<String> {
    page["data"]
        .as_array()
        .expect("page envelope without data")
        .iter()
        .map(|item| item["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Provider fixtures
// ---------------------------------------------------------------------------

/// Delegates to the sample snapshot, except that the deployment fails, the
/// bean listing panics and both histories can be cleared
pub struct ScriptedProvider(pub SnapshotProvider);

#[async_trait]
impl DataProvider for ScriptedProvider {
    async fn receive_deployment(&self) -> ProbeResult<String> {
        Err(ProbeError::Internal("deployment unavailable".to_string()))
    }

    async fn receive_beans(
        &self,
        _page_index: usize,
        _page_size: usize,
        _filters: &str,
        _representation: Option<&str>,
    ) -> ProbeResult<String> {
        panic!("bean listing exploded");
    }

    async fn receive_bean(&self, id: &str, deps: bool, dependents: bool) -> ProbeResult<String> {
        self.0.receive_bean(id, deps, dependents).await
    }

    async fn receive_bean_instance(&self, id: &str) -> ProbeResult<String> {
        self.0.receive_bean_instance(id).await
    }

    async fn receive_observers(
        &self,
        page: usize,
        size: usize,
        filters: &str,
    ) -> ProbeResult<String> {
        self.0.receive_observers(page, size, filters).await
    }

    async fn receive_observer(&self, id: &str) -> ProbeResult<String> {
        self.0.receive_observer(id).await
    }

    async fn receive_contexts(&self) -> ProbeResult<String> {
        self.0.receive_contexts().await
    }

    async fn receive_context(&self, id: &str) -> ProbeResult<String> {
        self.0.receive_context(id).await
    }

    async fn receive_invocations(
        &self,
        page: usize,
        size: usize,
        filters: &str,
    ) -> ProbeResult<String> {
        self.0.receive_invocations(page, size, filters).await
    }

    async fn receive_invocation(&self, id: &str) -> ProbeResult<String> {
        self.0.receive_invocation(id).await
    }

    async fn clear_invocations(&self) -> ProbeResult<String> {
        Ok(json!({"cleared": invocations().len()}).to_string())
    }

    async fn receive_events(
        &self,
        page: usize,
        size: usize,
        filters: &str,
    ) -> ProbeResult<String> {
        self.0.receive_events(page, size, filters).await
    }

    async fn receive_event(&self, id: &str) -> ProbeResult<String> {
        self.0.receive_event(id).await
    }

    async fn clear_events(&self) -> ProbeResult<String> {
        Ok(json!({"cleared": events().len()}).to_string())
    }

    async fn receive_monitoring_stats(&self) -> ProbeResult<String> {
        self.0.receive_monitoring_stats().await
    }

    async fn receive_available_beans(
        &self,
        page: usize,
        size: usize,
        filters: &str,
        representation: Option<&str>,
    ) -> ProbeResult<String> {
        self.0
            .receive_available_beans(page, size, filters, representation)
            .await
    }
}


/// A provider plus whatever must stay alive while it is used
pub struct ProviderFixture {
    pub provider: Arc<dyn DataProvider>,
    _archive: Option<TempDir>,
    _server: Option<ProbeServer>,
}

/// Snapshot provider over the sample export, read back from a zip file
pub async fn snapshot_fixture() -> ProviderFixture {
    let (dir, path) = sample_archive();
    ProviderFixture {
        provider: Arc::new(SnapshotProvider::open(&path).unwrap()),
        _archive: Some(dir),
        _server: None,
    }
}

/// Remote provider talking to a local server that serves the sample snapshot
#[cfg(feature = "remote")]
pub async fn remote_fixture() -> ProviderFixture {
    let server = probe::server::ServerBuilder::new()
        .with_provider(sample_snapshot())
        .with_context_path(CONTEXT_PATH)
        .start("127.0.0.1:0")
        .await
        .unwrap();
    let base_url = format!("http://{}{}/weld-probe", server.local_addr(), CONTEXT_PATH);
    ProviderFixture {
        provider: Arc::new(probe::storage::RemoteProvider::new(&base_url).unwrap()),
        _archive: None,
        _server: Some(server),
    }
}
