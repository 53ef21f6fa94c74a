//! Semantic cache storage adapter

mod table;

pub use table::CacheTable;
