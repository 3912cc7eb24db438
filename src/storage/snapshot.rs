//! Snapshot backend serving an exported probe archive
//!
//! The archive is parsed once when the provider is built. After that the
//! provider is read-only and can be shared freely between requests.

use crate::core::error::{ProbeError, ProbeResult};
use crate::core::filter::{
    BeanFilters, DeploymentModules, EventFilters, Filters, InvocationFilters, ObserverFilters,
    init_filters,
};
use crate::core::provider::DataProvider;
use crate::core::query::paginate;
use crate::core::record::{fields, find_by_id, record_id};
use crate::storage::archive::{ArchiveReader, open_archive};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub const DEPLOYMENT_ENTRY: &str = "deployment.json";
pub const CONTEXTS_ENTRY: &str = "contexts.json";
pub const BEANS_ENTRY: &str = "beans.json";
pub const OBSERVERS_ENTRY: &str = "observers.json";
pub const EVENTS_ENTRY: &str = "fired-events.json";
pub const INVOCATIONS_ENTRY: &str = "invocation-trees.json";

/// Entry name of a context detail document
pub fn context_entry(id: &str) -> String {
    format!("context-{}.json", id)
}

/// Read-only provider over an exported archive
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    source_name: String,
    deployment: String,
    modules: Arc<DeploymentModules>,
    contexts: Vec<Value>,
    context_details: HashMap<String, Value>,
    beans: Vec<Value>,
    observers: Vec<Value>,
    events: Vec<Value>,
    invocations: Vec<Value>,
}

impl SnapshotProvider {
    /// Load a zip archive or an unpacked export directory
    pub fn open(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let mut reader = open_archive(path.as_ref())?;
        Self::load(reader.as_mut())
    }

    /// Build a snapshot from in-memory documents keyed by entry name
    pub fn from_documents<I, K, V>(documents: I) -> ProbeResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut documents: HashMap<String, String> = documents
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(&mut documents)
    }

    /// Parse every document of an export
    pub fn load(reader: &mut dyn ArchiveReader) -> ProbeResult<Self> {
        let source_name = reader.name().to_string();

        let deployment = reader.read_entry(DEPLOYMENT_ENTRY)?.ok_or_else(|| {
            ProbeError::LoadFailure {
                source_name: source_name.clone(),
                message: format!("{} is missing", DEPLOYMENT_ENTRY),
            }
        })?;
        let deployment_doc = parse_document(&source_name, DEPLOYMENT_ENTRY, &deployment)?;
        let modules = Arc::new(DeploymentModules::from_deployment(&deployment_doc));

        let contexts = match read_optional(reader, CONTEXTS_ENTRY)? {
            Some(Value::Array(contexts)) => contexts,
            Some(_) => {
                return Err(ProbeError::LoadFailure {
                    source_name,
                    message: format!("{} is not an array", CONTEXTS_ENTRY),
                });
            }
            None => Vec::new(),
        };

        let mut context_details = HashMap::new();
        for id in contexts.iter().filter_map(record_id) {
            if let Some(detail) = read_optional(reader, &context_entry(&id))? {
                context_details.insert(id, detail);
            }
        }

        let snapshot = Self {
            beans: read_collection(reader, BEANS_ENTRY)?,
            observers: read_collection(reader, OBSERVERS_ENTRY)?,
            events: read_collection(reader, EVENTS_ENTRY)?,
            invocations: read_collection(reader, INVOCATIONS_ENTRY)?,
            source_name,
            deployment,
            modules,
            contexts,
            context_details,
        };

        tracing::info!(
            source = %snapshot.source_name,
            beans = snapshot.beans.len(),
            observers = snapshot.observers.len(),
            events = snapshot.events.len(),
            invocations = snapshot.invocations.len(),
            "Probe snapshot loaded"
        );

        Ok(snapshot)
    }

    /// Name of the archive the snapshot was read from
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Bean deployment archive identifiers known to the snapshot
    pub fn modules(&self) -> &Arc<DeploymentModules> {
        &self.modules
    }

    fn page<F: Filters>(
        items: &[Value],
        filters: Option<F>,
        page_index: usize,
        page_size: usize,
    ) -> ProbeResult<String> {
        Ok(paginate(items, filters.as_ref(), page_index, page_size).to_json()?)
    }

    fn detail(items: &[Value], kind: &str, id: &str) -> ProbeResult<String> {
        let record = find_by_id(items, id).ok_or_else(|| ProbeError::not_found(kind, id))?;
        Ok(serde_json::to_string(record)?)
    }
}

fn parse_document(source_name: &str, entry: &str, content: &str) -> ProbeResult<Value> {
    serde_json::from_str(content).map_err(|e| ProbeError::LoadFailure {
        source_name: source_name.to_string(),
        message: format!("{}: {}", entry, e),
    })
}

fn read_optional(reader: &mut dyn ArchiveReader, entry: &str) -> ProbeResult<Option<Value>> {
    match reader.read_entry(entry)? {
        Some(content) => parse_document(reader.name(), entry, &content).map(Some),
        None => {
            tracing::warn!(source = %reader.name(), entry, "Entry not found in probe archive");
            Ok(None)
        }
    }
}

/// Read a `{ "data": [...] }` document, empty when the entry is missing
fn read_collection(reader: &mut dyn ArchiveReader, entry: &str) -> ProbeResult<Vec<Value>> {
    let Some(mut document) = read_optional(reader, entry)? else {
        return Ok(Vec::new());
    };
    match document.get_mut(fields::DATA).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(ProbeError::LoadFailure {
            source_name: reader.name().to_string(),
            message: format!("{} has no '{}' array", entry, fields::DATA),
        }),
    }
}

/// Drop the nested `field` array of every direct entry of `bean[field]`
fn strip_nested(bean: &mut Value, field: &str) {
    if let Some(entries) = bean.get_mut(field).and_then(Value::as_array_mut) {
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            entry.shift_remove(field);
        }
    }
}

#[async_trait]
impl DataProvider for SnapshotProvider {
    async fn receive_deployment(&self) -> ProbeResult<String> {
        Ok(self.deployment.clone())
    }

    async fn receive_beans(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
        _representation: Option<&str>,
    ) -> ProbeResult<String> {
        let filters = init_filters(filters, BeanFilters::new(self.modules.clone()));
        Self::page(&self.beans, filters, page_index, page_size)
    }

    async fn receive_bean(
        &self,
        id: &str,
        transient_dependencies: bool,
        transient_dependents: bool,
    ) -> ProbeResult<String> {
        let mut bean = find_by_id(&self.beans, id)
            .cloned()
            .ok_or_else(|| ProbeError::not_found("bean", id))?;
        if !transient_dependencies {
            strip_nested(&mut bean, fields::DEPENDENCIES);
        }
        if !transient_dependents {
            strip_nested(&mut bean, fields::DEPENDENTS);
        }
        Ok(serde_json::to_string(&bean)?)
    }

    async fn receive_bean_instance(&self, _id: &str) -> ProbeResult<String> {
        Err(ProbeError::unsupported("receive_bean_instance"))
    }

    async fn receive_observers(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
    ) -> ProbeResult<String> {
        let filters = init_filters(filters, ObserverFilters::new(self.modules.clone()));
        Self::page(&self.observers, filters, page_index, page_size)
    }

    async fn receive_observer(&self, id: &str) -> ProbeResult<String> {
        Self::detail(&self.observers, "observer", id)
    }

    async fn receive_contexts(&self) -> ProbeResult<String> {
        Ok(serde_json::to_string(&self.contexts)?)
    }

    async fn receive_context(&self, id: &str) -> ProbeResult<String> {
        match self.context_details.get(id) {
            Some(detail) => Ok(serde_json::to_string(detail)?),
            None => Ok("{}".to_string()),
        }
    }

    async fn receive_invocations(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
    ) -> ProbeResult<String> {
        let filters = init_filters(filters, InvocationFilters::default());
        Self::page(&self.invocations, filters, page_index, page_size)
    }

    async fn receive_invocation(&self, id: &str) -> ProbeResult<String> {
        Self::detail(&self.invocations, "invocation", id)
    }

    async fn clear_invocations(&self) -> ProbeResult<String> {
        Err(ProbeError::unsupported("clear_invocations"))
    }

    async fn receive_events(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
    ) -> ProbeResult<String> {
        let filters = init_filters(filters, EventFilters::default());
        Self::page(&self.events, filters, page_index, page_size)
    }

    async fn receive_event(&self, id: &str) -> ProbeResult<String> {
        Self::detail(&self.events, "event", id)
    }

    async fn clear_events(&self) -> ProbeResult<String> {
        Err(ProbeError::unsupported("clear_events"))
    }

    async fn receive_monitoring_stats(&self) -> ProbeResult<String> {
        let mut stats = Map::new();
        stats.insert(fields::FIRED_EVENT_COUNT.to_string(), self.events.len().into());
        stats.insert(fields::INVOCATION_COUNT.to_string(), self.invocations.len().into());
        Ok(Value::Object(stats).to_string())
    }

    async fn receive_available_beans(
        &self,
        _page_index: usize,
        _page_size: usize,
        _filters: &str,
        _representation: Option<&str>,
    ) -> ProbeResult<String> {
        Err(ProbeError::unsupported("receive_available_beans"))
    }
}
