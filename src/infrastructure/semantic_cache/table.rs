//! Cache record table adapter
//!
//! Owns the connection and table handles of one cache instance. Both are
//! resolved lazily; an absent table is only created by the first write,
//! because the store infers the schema from the records it is seeded with.
//!
//! Another instance may drop the table at any time. A table operation that
//! reports `TableNotFound` clears the cached handle and is retried once
//! against a freshly opened table.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::semantic_cache::{
    CacheRecord, RecordFilter, VectorConnection, VectorStore, VectorTable,
};
use crate::domain::DomainError;

#[derive(Default)]
struct TableState {
    connection: Option<Arc<dyn VectorConnection>>,
    table: Option<Arc<dyn VectorTable>>,
}

/// Lazily connected table of cache records
pub struct CacheTable {
    store: Arc<dyn VectorStore>,
    uri: String,
    storage_options: Vec<(String, String)>,
    table_name: String,
    state: Mutex<TableState>,
}

impl std::fmt::Debug for CacheTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheTable")
            .field("uri", &self.uri)
            .field("table_name", &self.table_name)
            .finish_non_exhaustive()
    }
}

impl CacheTable {
    pub fn new(
        store: Arc<dyn VectorStore>,
        uri: impl Into<String>,
        storage_options: Vec<(String, String)>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            uri: uri.into(),
            storage_options,
            table_name: table_name.into(),
            state: Mutex::new(TableState::default()),
        }
    }

    /// Physical table name, namespace suffix included
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn connection(
        &self,
        state: &mut TableState,
    ) -> Result<Arc<dyn VectorConnection>, DomainError> {
        if let Some(connection) = &state.connection {
            return Ok(connection.clone());
        }

        let connection = self
            .store
            .connect(&self.uri, self.storage_options.clone())
            .await?;
        debug!(uri = %self.uri, "Connected to vector store");

        state.connection = Some(connection.clone());
        Ok(connection)
    }

    /// Resolve the table handle; `None` when the table does not exist yet
    async fn open(
        &self,
        state: &mut TableState,
    ) -> Result<Option<Arc<dyn VectorTable>>, DomainError> {
        if let Some(table) = &state.table {
            return Ok(Some(table.clone()));
        }

        let connection = self.connection(state).await?;

        match connection.open_table(&self.table_name).await {
            Ok(table) => {
                debug!(table = %self.table_name, "Opened cache table");
                state.table = Some(table.clone());
                Ok(Some(table))
            }
            Err(e) if e.is_table_not_found() => {
                debug!(table = %self.table_name, "Cache table not created yet");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn handle(&self) -> Result<Option<Arc<dyn VectorTable>>, DomainError> {
        let mut state = self.state.lock().await;
        self.open(&mut state).await
    }

    fn forget_table(&self, state: &mut TableState) {
        if state.table.take().is_some() {
            debug!(table = %self.table_name, "Cache table was dropped elsewhere, reopening");
        }
    }

    /// Run `op` on the table; `None` when the table does not exist
    async fn with_table<T, F, Fut>(&self, op: F) -> Result<Option<T>, DomainError>
    where
        F: Fn(Arc<dyn VectorTable>) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let Some(table) = self.handle().await? else {
            return Ok(None);
        };

        match op(table).await {
            Err(e) if e.is_table_not_found() => {
                self.forget_table(&mut *self.state.lock().await);

                match self.handle().await? {
                    Some(table) => op(table).await.map(Some),
                    None => Ok(None),
                }
            }
            result => result.map(Some),
        }
    }

    /// Connect and open the table if it exists. Safe to call repeatedly.
    ///
    /// Returns whether the table exists.
    pub async fn initialize(&self) -> Result<bool, DomainError> {
        Ok(self.handle().await?.is_some())
    }

    /// Write records, replacing any stored rows with the same ids.
    ///
    /// Within one batch the last record for an id wins. Creates the table
    /// from the batch when it does not exist yet. A failed write leaves the
    /// stored rows untouched.
    pub async fn upsert(&self, records: Vec<CacheRecord>) -> Result<(), DomainError> {
        let records = dedupe_last_wins(records);

        if records.is_empty() {
            return Ok(());
        }

        let mut state = self.state.lock().await;

        if let Some(table) = self.open(&mut state).await? {
            match table.upsert(records.clone()).await {
                Err(e) if e.is_table_not_found() => self.forget_table(&mut state),
                result => return result,
            }
        }

        match self.open(&mut state).await? {
            Some(table) => table.upsert(records).await,
            None => {
                let connection = self.connection(&mut state).await?;
                let count = records.len();
                let table = connection.create_table(&self.table_name, records).await?;

                info!(table = %self.table_name, records = count, "Created cache table");
                state.table = Some(table);
                Ok(())
            }
        }
    }

    /// Nearest records by the store's own metric; empty when the table is absent
    pub async fn nearest(
        &self,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<CacheRecord>, DomainError> {
        let rows = self
            .with_table(|table| async move { table.nearest(vector, limit).await })
            .await?;

        Ok(rows.unwrap_or_default())
    }

    /// Delete matching records; zero when the table is absent
    pub async fn delete(&self, filter: &RecordFilter) -> Result<usize, DomainError> {
        let deleted = self
            .with_table(|table| async move { table.delete(filter).await })
            .await?;

        Ok(deleted.unwrap_or(0))
    }

    /// Drop the table. An already absent table counts as dropped.
    pub async fn drop_table(&self) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        let connection = self.connection(&mut state).await?;

        match connection.drop_table(&self.table_name).await {
            Ok(()) => info!(table = %self.table_name, "Dropped cache table"),
            Err(e) if e.is_table_not_found() => {
                debug!(table = %self.table_name, "Cache table already absent")
            }
            Err(e) => return Err(e),
        }

        state.table = None;
        Ok(())
    }

    /// Forget the connection and table handles; the next call reconnects
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        *state = TableState::default();
        debug!(table = %self.table_name, "Released vector store handles");
    }
}

fn dedupe_last_wins(records: Vec<CacheRecord>) -> Vec<CacheRecord> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<CacheRecord> = Vec::with_capacity(records.len());

    for record in records {
        match positions.get(record.id()) {
            Some(&index) => unique[index] = record,
            None => {
                positions.insert(record.id().to_string(), unique.len());
                unique.push(record);
            }
        }
    }

    unique
}
