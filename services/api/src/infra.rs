use metrics_exporter_prometheus::PrometheusHandle;
use psyroom::attempts::{AttemptId, AttemptRecord, AttemptRepository, RepositoryError};
use psyroom::catalog::{CatalogError, StaticCatalog};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Attempts kept for the lifetime of the process, with insertion order for `recent`.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAttemptRepository {
    records: Arc<Mutex<HashMap<AttemptId, AttemptRecord>>>,
    order: Arc<Mutex<Vec<AttemptId>>>,
}

impl InMemoryAttemptRepository {
    fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
        mutex
            .lock()
            .map_err(|_| RepositoryError::Unavailable("attempt store lock poisoned".to_string()))
    }
}

impl AttemptRepository for InMemoryAttemptRepository {
    fn insert(&self, record: AttemptRecord) -> Result<AttemptRecord, RepositoryError> {
        let mut records = Self::lock(&self.records)?;
        if records.contains_key(&record.attempt_id) {
            return Err(RepositoryError::Conflict);
        }
        records.insert(record.attempt_id.clone(), record.clone());
        Self::lock(&self.order)?.push(record.attempt_id.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AttemptId) -> Result<Option<AttemptRecord>, RepositoryError> {
        Ok(Self::lock(&self.records)?.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<AttemptRecord>, RepositoryError> {
        let records = Self::lock(&self.records)?;
        let order = Self::lock(&self.order)?;
        Ok(order
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| records.get(id).cloned())
            .collect())
    }
}

/// Load definitions from `path`, or the built-in set when no path is configured.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<StaticCatalog, CatalogError> {
    let catalog = match path {
        Some(path) => StaticCatalog::from_path(path)?,
        None => StaticCatalog::builtin()?,
    };
    info!(
        tests = catalog.len(),
        source = %path.map_or_else(|| "builtin".to_string(), |path| path.display().to_string()),
        "test catalog loaded"
    );
    Ok(catalog)
}
