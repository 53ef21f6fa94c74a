//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for text embedding backends (OpenAI, Gemini, Voyage)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Embed a single text into a vector, one upstream request per call
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the configured model
    fn model(&self) -> &str;
}
