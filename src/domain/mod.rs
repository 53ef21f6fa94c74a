//! Domain layer: cache records, the embedding and vector-store seams,
//! and the error type shared by every layer.

pub mod embedding;
pub mod error;
pub mod semantic_cache;

pub use error::DomainError;
