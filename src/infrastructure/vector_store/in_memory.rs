//! In-process vector store
//!
//! Suitable for development, tests and short-lived processes. Tables live
//! as long as the store value; every connection to the same URI shares them.
//! Nearest-neighbour search is a linear scan ranked by squared L2 distance.
//! Dropping a table invalidates every handle to it, as a database would.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::semantic_cache::{
    CacheRecord, RecordFilter, VectorConnection, VectorStore, VectorTable,
};
use crate::domain::DomainError;

type Tables = Arc<RwLock<HashMap<String, Arc<InMemoryVectorTable>>>>;

/// In-memory vector store keyed by URI
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    databases: Arc<RwLock<HashMap<String, Tables>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn connect(
        &self,
        uri: &str,
        _options: Vec<(String, String)>,
    ) -> Result<Arc<dyn VectorConnection>, DomainError> {
        let mut databases = self.databases.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let tables = databases.entry(uri.to_string()).or_default().clone();

        Ok(Arc::new(InMemoryConnection { tables }) as Arc<dyn VectorConnection>)
    }
}

/// Connection to one in-memory database
#[derive(Debug)]
pub struct InMemoryConnection {
    tables: Tables,
}

#[async_trait]
impl VectorConnection for InMemoryConnection {
    async fn open_table(&self, name: &str) -> Result<Arc<dyn VectorTable>, DomainError> {
        let tables = self.tables.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        tables
            .get(name)
            .cloned()
            .map(|table| table as Arc<dyn VectorTable>)
            .ok_or_else(|| DomainError::table_not_found(name))
    }

    async fn create_table(
        &self,
        name: &str,
        seed: Vec<CacheRecord>,
    ) -> Result<Arc<dyn VectorTable>, DomainError> {
        let dimensions = seed.first().map(CacheRecord::dimensions).ok_or_else(|| {
            DomainError::validation("Cannot infer a table schema without a seed record")
        })?;

        let mut tables = self.tables.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        if tables.contains_key(name) {
            return Err(DomainError::storage(format!("Table '{}' already exists", name)));
        }

        let table = Arc::new(InMemoryVectorTable::new(name, dimensions));
        table.append(seed)?;
        tables.insert(name.to_string(), table.clone());

        Ok(table as Arc<dyn VectorTable>)
    }

    async fn drop_table(&self, name: &str) -> Result<(), DomainError> {
        let mut tables = self.tables.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let table = tables
            .remove(name)
            .ok_or_else(|| DomainError::table_not_found(name))?;

        table.dropped.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Table with a fixed vector dimension
#[derive(Debug)]
pub struct InMemoryVectorTable {
    name: String,
    dimensions: usize,
    dropped: AtomicBool,
    rows: RwLock<Vec<CacheRecord>>,
}

impl InMemoryVectorTable {
    fn new(name: &str, dimensions: usize) -> Self {
        Self {
            name: name.to_string(),
            dimensions,
            dropped: AtomicBool::new(false),
            rows: RwLock::new(Vec::new()),
        }
    }

    fn ensure_live(&self) -> Result<(), DomainError> {
        if self.dropped.load(Ordering::SeqCst) {
            return Err(DomainError::table_not_found(&self.name));
        }
        Ok(())
    }

    fn check_dimensions(&self, records: &[CacheRecord]) -> Result<(), DomainError> {
        match records.iter().find(|r| r.dimensions() != self.dimensions) {
            Some(bad) => Err(DomainError::dimension_mismatch(bad.dimensions(), self.dimensions)),
            None => Ok(()),
        }
    }

    fn write_rows(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<CacheRecord>>, DomainError> {
        self.rows.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })
    }

    fn append(&self, records: Vec<CacheRecord>) -> Result<(), DomainError> {
        self.ensure_live()?;
        self.check_dimensions(&records)?;

        self.write_rows()?.extend(records);
        Ok(())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[async_trait]
impl VectorTable for InMemoryVectorTable {
    async fn add(&self, records: Vec<CacheRecord>) -> Result<(), DomainError> {
        self.append(records)
    }

    async fn upsert(&self, records: Vec<CacheRecord>) -> Result<(), DomainError> {
        self.ensure_live()?;
        self.check_dimensions(&records)?;

        let mut rows = self.write_rows()?;
        {
            let ids: HashSet<&str> = records.iter().map(CacheRecord::id).collect();
            rows.retain(|record| !ids.contains(record.id()));
        }
        rows.extend(records);
        Ok(())
    }

    async fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<CacheRecord>, DomainError> {
        self.ensure_live()?;

        if vector.len() != self.dimensions {
            return Err(DomainError::dimension_mismatch(vector.len(), self.dimensions));
        }

        let rows = self.rows.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut scored: Vec<(f32, &CacheRecord)> = rows
            .iter()
            .map(|record| (squared_l2(vector, record.vector()), record))
            .collect();

        // stable sort: equal distances keep insertion order
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn delete(&self, filter: &RecordFilter) -> Result<usize, DomainError> {
        self.ensure_live()?;
        let mut rows = self.write_rows()?;

        let before = rows.len();
        rows.retain(|record| !filter.matches(record));

        Ok(before - rows.len())
    }
}
