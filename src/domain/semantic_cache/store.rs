//! Vector store interface consumed by the cache
//!
//! Mirrors the external store's connection/table model: a store connects
//! to a URI, a connection opens, creates and drops tables, and a table
//! appends or upserts records, answers nearest-neighbour queries and deletes
//! by filter. Table operations on a table dropped elsewhere fail with
//! `TableNotFound`.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use super::CacheRecord;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Structured delete predicate.
///
/// Keys are arbitrary caller text, so filters carry values rather than
/// query-language fragments. Adapters that need a textual predicate must
/// escape the values themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    /// `id` equals the given key
    IdEquals(String),
    /// `id` is one of the given keys
    IdIn(Vec<String>),
}

impl RecordFilter {
    /// Check a record against the filter
    pub fn matches(&self, record: &CacheRecord) -> bool {
        match self {
            RecordFilter::IdEquals(id) => record.id() == id,
            RecordFilter::IdIn(ids) => ids.iter().any(|id| record.id() == id),
        }
    }
}

/// Entry point of a vector database
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Connect to `uri`; `options` are passed through to the store untouched
    async fn connect(
        &self,
        uri: &str,
        options: Vec<(String, String)>,
    ) -> Result<Arc<dyn VectorConnection>, DomainError>;
}

/// An open connection to a vector database
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorConnection: Send + Sync + Debug {
    /// Open an existing table, failing with `TableNotFound` if it is absent
    async fn open_table(&self, name: &str) -> Result<Arc<dyn VectorTable>, DomainError>;

    /// Create a table whose schema is inferred from the seed records
    async fn create_table(
        &self,
        name: &str,
        seed: Vec<CacheRecord>,
    ) -> Result<Arc<dyn VectorTable>, DomainError>;

    /// Drop a table, failing with `TableNotFound` if it is absent
    async fn drop_table(&self, name: &str) -> Result<(), DomainError>;
}

/// A table of cache records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorTable: Send + Sync + Debug {
    /// Append records
    async fn add(&self, records: Vec<CacheRecord>) -> Result<(), DomainError>;

    /// Insert records, replacing stored rows with the same id.
    ///
    /// Either the whole batch is written or the table is left unchanged.
    async fn upsert(&self, records: Vec<CacheRecord>) -> Result<(), DomainError>;

    /// Nearest neighbours of `vector` by the store's own metric, nearest first
    async fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<CacheRecord>, DomainError>;

    /// Delete matching records, returning how many were removed
    async fn delete(&self, filter: &RecordFilter) -> Result<usize, DomainError>;
}
