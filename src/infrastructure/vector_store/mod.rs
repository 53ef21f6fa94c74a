//! Vector store implementations

mod in_memory;
#[cfg(feature = "lancedb")]
mod lance;

use std::sync::Arc;

pub use in_memory::{InMemoryConnection, InMemoryVectorStore, InMemoryVectorTable};
#[cfg(feature = "lancedb")]
pub use lance::{LanceConnection, LanceTable, LanceVectorStore};

use crate::domain::semantic_cache::VectorStore;
use crate::domain::DomainError;

/// URI scheme served by [`InMemoryVectorStore`]
pub const MEMORY_SCHEME: &str = "memory://";

/// Pick a vector store implementation for `uri`
pub fn connect_vector_store(uri: &str) -> Result<Arc<dyn VectorStore>, DomainError> {
    if uri.starts_with(MEMORY_SCHEME) {
        return Ok(Arc::new(InMemoryVectorStore::new()));
    }

    #[cfg(feature = "lancedb")]
    {
        Ok(Arc::new(LanceVectorStore::new()))
    }

    #[cfg(not(feature = "lancedb"))]
    {
        Err(DomainError::configuration(format!(
            "Vector store URI '{}' requires the `lancedb` feature; use a {} URI otherwise",
            uri, MEMORY_SCHEME
        )))
    }
}
