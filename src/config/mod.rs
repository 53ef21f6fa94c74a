//! Configuration: cache settings resolved from arguments, environment and
//! defaults, plus the front end's logging settings.

mod app_config;
mod cache_config;

pub use app_config::{AppConfig, LogFormat, LoggingConfig};
pub use cache_config::{
    default_uri, CacheConfig, CacheOptions, EmbeddingProviderKind, ProviderSettings,
    StorageOptions, DEFAULT_GEMINI_MODEL, DEFAULT_MIN_PROXIMITY, DEFAULT_OPENAI_MODEL,
    DEFAULT_PROVIDER, DEFAULT_TABLE_NAME, DEFAULT_VOYAGE_MODEL,
};
