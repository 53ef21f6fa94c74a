//! Semantic cache service
//!
//! Key/value cache whose lookups match by embedding similarity. Every key is
//! embedded with the configured provider; lookups ask the vector store for
//! its nearest neighbours, re-score them locally with cosine similarity and
//! gate hits on the configured minimum proximity.
//!
//! Writes propagate their errors. Reads, deletes and flushes degrade to an
//! empty result and log the underlying error instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{join_all, try_join_all};
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::domain::embedding::{cosine_similarity, EmbeddingProvider};
use crate::domain::semantic_cache::{
    CacheRecord, RecordFilter, SearchResult, SemanticCacheStats, VectorStore,
};
use crate::domain::DomainError;
use crate::infrastructure::embedding::create_embedding_provider;
use crate::infrastructure::semantic_cache::CacheTable;
use crate::infrastructure::vector_store::connect_vector_store;

/// Number of neighbours returned by `search` when the caller has no preference
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Float slack granted only at a proximity of 1.0, where rounding would
/// otherwise turn an exact self-match into a miss
const SELF_MATCH_TOLERANCE: f32 = 1e-6;

/// Semantic cache over an embedding provider and a vector store
#[derive(Debug)]
pub struct SemanticCacheService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    table: CacheTable,
    min_proximity: f32,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SemanticCacheService {
    /// Create a service from resolved configuration and explicit collaborators
    pub fn new(
        config: &CacheConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        let table = CacheTable::new(
            store,
            config.uri(),
            config.storage().to_pairs(),
            config.table_name(),
        );

        Self {
            embedding_provider,
            table,
            min_proximity: config.min_proximity(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Create a service with the provider and store selected by `config`.
    ///
    /// Fails fast when the selected provider has no API key.
    pub fn from_config(config: &CacheConfig) -> Result<Self, DomainError> {
        let embedding_provider = create_embedding_provider(config)?;
        let store = connect_vector_store(config.uri())?;

        Ok(Self::new(config, embedding_provider, store))
    }

    /// Create a service configured entirely from environment variables
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_config(&CacheConfig::from_env()?)
    }

    pub fn min_proximity(&self) -> f32 {
        self.min_proximity
    }

    /// Physical table backing this cache
    pub fn table_name(&self) -> &str {
        self.table.table_name()
    }

    /// Connect eagerly and open the table if it exists; repeat calls are no-ops.
    ///
    /// Returns whether the table exists yet.
    pub async fn initialize(&self) -> Result<bool, DomainError> {
        self.table.initialize().await
    }

    /// Store `value` under `key`, replacing an existing entry for the same key
    pub async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let vector = self.embedding_provider.embed(key).await?;

        self.table
            .upsert(vec![CacheRecord::new(key, value, vector)])
            .await?;

        debug!(key = %key, "Cached value");
        Ok(())
    }

    /// Store several key/value pairs with a single write.
    ///
    /// Keys are embedded concurrently. For a key repeated within the batch
    /// the last value wins.
    pub async fn set_many<K, V>(&self, keys: &[K], values: &[V]) -> Result<(), DomainError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if keys.len() != values.len() {
            return Err(DomainError::validation(format!(
                "keys and values must have the same length ({} keys, {} values)",
                keys.len(),
                values.len()
            )));
        }

        if keys.is_empty() {
            return Ok(());
        }

        let vectors = try_join_all(
            keys.iter()
                .map(|key| self.embedding_provider.embed(key.as_ref())),
        )
        .await?;

        let records: Vec<CacheRecord> = keys
            .iter()
            .zip(values.iter())
            .zip(vectors)
            .map(|((key, value), vector)| CacheRecord::new(key.as_ref(), value.as_ref(), vector))
            .collect();

        let count = records.len();
        self.table.upsert(records).await?;

        debug!(count, "Cached batch of values");
        Ok(())
    }

    /// Look up the value whose key is closest in meaning to `key`.
    ///
    /// Returns `None` when the best match is below the minimum proximity or
    /// when the embedding provider or store fails.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.lookup(key).await {
            Ok(Some(result)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(
                    key = %key,
                    matched = %result.id,
                    similarity = result.similarity,
                    "Semantic cache hit"
                );
                Some(result.value)
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Semantic cache miss");
                None
            }
            Err(e) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                warn!(key = %key, error = %e, "Semantic cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Look up several keys concurrently; results keep the input order
    pub async fn get_many<K: AsRef<str>>(&self, keys: &[K]) -> Vec<Option<String>> {
        join_all(keys.iter().map(|key| self.get(key.as_ref()))).await
    }

    async fn lookup(&self, key: &str) -> Result<Option<SearchResult>, DomainError> {
        let vector = self.embedding_provider.embed(key).await?;
        let candidates = self.table.nearest(&vector, 1).await?;

        Ok(score_candidates(&vector, candidates)
            .into_iter()
            .next()
            .filter(|result| meets_threshold(result.similarity, self.min_proximity)))
    }

    /// Up to `limit` nearest entries with their similarity, most similar first.
    ///
    /// Not gated by the minimum proximity. Failures yield an empty list.
    pub async fn search(&self, key: &str, limit: usize) -> Vec<SearchResult> {
        if limit == 0 {
            return Vec::new();
        }

        match self.try_search(key, limit).await {
            Ok(results) => results,
            Err(e) => {
                warn!(key = %key, error = %e, "Semantic cache search failed");
                Vec::new()
            }
        }
    }

    async fn try_search(&self, key: &str, limit: usize) -> Result<Vec<SearchResult>, DomainError> {
        let vector = self.embedding_provider.embed(key).await?;
        let candidates = self.table.nearest(&vector, limit).await?;

        let mut results = score_candidates(&vector, candidates);
        // the store ranks by its own metric; re-rank by cosine similarity
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        Ok(results)
    }

    /// Delete the entry stored under exactly `key`; returns the number removed
    pub async fn delete(&self, key: &str) -> usize {
        match self.table.delete(&RecordFilter::IdEquals(key.to_string())).await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!(key = %key, error = %e, "Semantic cache delete failed");
                0
            }
        }
    }

    /// Delete entries one key at a time.
    ///
    /// Stops at the first failure and returns how many were removed before it.
    pub async fn bulk_delete<K: AsRef<str>>(&self, keys: &[K]) -> usize {
        let mut deleted = 0;

        for key in keys {
            let key = key.as_ref();

            match self.table.delete(&RecordFilter::IdEquals(key.to_string())).await {
                Ok(count) => deleted += count,
                Err(e) => {
                    warn!(
                        key = %key,
                        deleted,
                        error = %e,
                        "Semantic cache bulk delete aborted"
                    );
                    break;
                }
            }
        }

        deleted
    }

    /// Drop every entry in this cache's table. Other namespaces are untouched.
    ///
    /// The table is recreated by the next write. Returns `false` on failure.
    pub async fn flush(&self) -> bool {
        match self.table.drop_table().await {
            Ok(()) => true,
            Err(e) => {
                warn!(table = %self.table.table_name(), error = %e, "Semantic cache flush failed");
                false
            }
        }
    }

    /// Release store handles. The service stays usable and reconnects on demand.
    pub async fn close(&self) {
        self.table.close().await;
    }

    /// Hit and miss counters of `get`
    pub fn stats(&self) -> SemanticCacheStats {
        SemanticCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn meets_threshold(similarity: f32, min_proximity: f32) -> bool {
    if min_proximity >= 1.0 {
        return similarity >= 1.0 - SELF_MATCH_TOLERANCE;
    }
    similarity >= min_proximity
}

/// Score candidates against the query, skipping any with a foreign dimension
fn score_candidates(query: &[f32], candidates: Vec<CacheRecord>) -> Vec<SearchResult> {
    candidates
        .into_iter()
        .filter_map(|record| match cosine_similarity(query, record.vector()) {
            Ok(similarity) => Some(record.into_search_result(similarity)),
            Err(e) => {
                warn!(id = %record.id(), error = %e, "Skipping cache candidate");
                None
            }
        })
        .collect()
}
