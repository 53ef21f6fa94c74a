//! Cache record and lookup result types

use serde::{Deserialize, Serialize};

/// A stored cache entry.
///
/// The id is the original key text; no separate key hashing is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    id: String,
    text: String,
    value: String,
    vector: Vec<f32>,
}

impl CacheRecord {
    /// Create a record for `key`, using the key itself as id
    pub fn new(key: impl Into<String>, value: impl Into<String>, vector: Vec<f32>) -> Self {
        let text = key.into();

        Self {
            id: text.clone(),
            text,
            value: value.into(),
            vector,
        }
    }

    /// Rebuild a record read back from a store
    pub fn from_parts(
        id: impl Into<String>,
        text: impl Into<String>,
        value: impl Into<String>,
        vector: Vec<f32>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            value: value.into(),
            vector,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }

    /// Convert into a search result with a locally computed similarity
    pub fn into_search_result(self, similarity: f32) -> SearchResult {
        SearchResult {
            id: self.id,
            text: self.text,
            value: self.value,
            similarity,
        }
    }
}

/// Result of a semantic cache search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub text: String,
    pub value: String,
    /// Cosine similarity against the query, recomputed locally
    pub similarity: f32,
}

/// Lookup counters for a cache instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticCacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl SemanticCacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;

        if total == 0 {
            return 0.0;
        }

        self.hits as f32 / total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_is_key_text() {
        let record = CacheRecord::new("Capital of France", "Paris", vec![0.1, 0.2, 0.3]);

        assert_eq!(record.id(), "Capital of France");
        assert_eq!(record.text(), "Capital of France");
        assert_eq!(record.value(), "Paris");
        assert_eq!(record.dimensions(), 3);
    }

    #[test]
    fn test_into_search_result() {
        let record = CacheRecord::new("key", "value", vec![1.0]);

        let result = record.into_search_result(0.93);

        assert_eq!(result.id, "key");
        assert_eq!(result.text, "key");
        assert_eq!(result.value, "value");
        assert!((result.similarity - 0.93).abs() < f32::EPSILON);
    }

    #[test]
    fn test_stats_hit_rate() {
        let stats = SemanticCacheStats { hits: 80, misses: 20 };

        assert!((stats.hit_rate() - 0.8).abs() < 0.01);
    }

    #[test]
    fn test_stats_no_requests() {
        assert_eq!(SemanticCacheStats::default().hit_rate(), 0.0);
    }
}
