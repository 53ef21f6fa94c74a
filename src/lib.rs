//! Semantic cache
//!
//! A key/value cache whose lookups match by meaning rather than exact text:
//! - Keys are embedded with OpenAI, Gemini or Voyage embedding models
//! - Records live in a vector store (LanceDB, or in-process for tests)
//! - Hits are gated on a locally computed cosine similarity
//! - Namespaces map to separate tables

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{CacheConfig, CacheOptions, EmbeddingProviderKind, StorageOptions};
pub use domain::semantic_cache::{SearchResult, SemanticCacheStats};
pub use domain::DomainError;
pub use infrastructure::services::{SemanticCacheService, DEFAULT_SEARCH_LIMIT};
