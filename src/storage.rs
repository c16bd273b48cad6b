//! Snapshot storage: the narrow save/load-tabular-snapshot seam between
//! pipeline stages.
//!
//! A stage either commits its full output table or leaves the previous
//! snapshot untouched; there is no incremental upsert.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Whole-table snapshot storage.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn write_table(&self, name: &str, rows: &[Value]) -> Result<()>;
    async fn read_table(&self, name: &str) -> Result<Vec<Value>>;
}

/// Serializes typed rows and writes the full table.
pub async fn save_table<T: Serialize>(
    store: &dyn SnapshotStore,
    name: &str,
    rows: &[T],
) -> Result<()> {
    let values = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    store.write_table(name, &values).await
}

/// Reads the full table back into typed rows.
pub async fn load_table<T: DeserializeOwned>(
    store: &dyn SnapshotStore,
    name: &str,
) -> Result<Vec<T>> {
    let values = store.read_table(name).await?;
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(PipelineError::from))
        .collect()
}

/// File-backed store: one JSON array per table under a snapshot directory.
///
/// Writes go to a temp file first and are renamed into place, so an aborted
/// stage never clobbers the previous snapshot.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn write_table(&self, name: &str, rows: &[Value]) -> Result<()> {
        let path = self.table_path(name);
        let tmp_path = self.dir.join(format!("{}.json.tmp", name));
        let content = serde_json::to_string_pretty(rows)?;
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        debug!("Wrote {} rows to table '{}'", rows.len(), name);
        Ok(())
    }

    async fn read_table(&self, name: &str) -> Result<Vec<Value>> {
        let path = self.table_path(name);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            PipelineError::Storage(format!(
                "Failed to read table '{}' from {}: {}",
                name,
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// In-memory store for tests and dry runs.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemoryStore {
    async fn write_table(&self, name: &str, rows: &[Value]) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.insert(name.to_string(), rows.to_vec());
        Ok(())
    }

    async fn read_table(&self, name: &str) -> Result<Vec<Value>> {
        let tables = self.tables.lock().unwrap();
        tables
            .get(name)
            .cloned()
            .ok_or_else(|| PipelineError::Storage(format!("No such table: '{}'", name)))
    }
}
