//! Embedding provider implementations

mod factory;
mod gemini;
mod openai;
mod voyage;

pub use factory::create_embedding_provider;
pub use gemini::GeminiEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
pub use voyage::VoyageEmbeddingProvider;

pub use super::http_client::{HttpClient, HttpClientTrait};
