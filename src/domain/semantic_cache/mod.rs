//! Semantic cache domain models and traits
//!
//! Records are matched by embedding similarity rather than exact key
//! equality. Storage and nearest-neighbour search are delegated to a
//! vector store behind the traits in [`store`].

mod record;
mod store;

pub use record::{CacheRecord, SearchResult, SemanticCacheStats};
pub use store::{RecordFilter, VectorConnection, VectorStore, VectorTable};

#[cfg(test)]
pub use store::{MockVectorConnection, MockVectorStore, MockVectorTable};
