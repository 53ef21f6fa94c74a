//! Embedding provider selection

use std::sync::Arc;

use tracing::debug;

use super::{GeminiEmbeddingProvider, HttpClient, OpenAiEmbeddingProvider, VoyageEmbeddingProvider};
use crate::config::{CacheConfig, EmbeddingProviderKind};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;

/// Build the provider selected by `config`.
///
/// Fails with a configuration error when the selected provider has no API
/// key, so a missing secret surfaces at construction rather than first use.
pub fn create_embedding_provider(
    config: &CacheConfig,
) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
    let kind = config.provider();
    let settings = config.provider_settings(kind);

    let api_key = settings.api_key.clone().ok_or_else(|| {
        DomainError::configuration(format!(
            "No API key configured for embedding provider '{}' (set {})",
            kind,
            api_key_var(kind)
        ))
    })?;

    let client = match config.embedding_timeout() {
        Some(timeout) => HttpClient::with_timeout(timeout)?,
        None => HttpClient::new(),
    };

    debug!(provider = %kind, model = %settings.model, "Creating embedding provider");

    let provider: Arc<dyn EmbeddingProvider> = match kind {
        EmbeddingProviderKind::OpenAi => Arc::new(OpenAiEmbeddingProvider::with_base_url(
            client,
            api_key,
            settings.model.clone(),
            super::openai::DEFAULT_OPENAI_BASE_URL,
        )?),
        EmbeddingProviderKind::Gemini => Arc::new(GeminiEmbeddingProvider::with_base_url(
            client,
            api_key,
            settings.model.clone(),
            super::gemini::DEFAULT_GEMINI_BASE_URL,
        )?),
        EmbeddingProviderKind::Voyage => Arc::new(VoyageEmbeddingProvider::with_base_url(
            client,
            api_key,
            settings.model.clone(),
            super::voyage::DEFAULT_VOYAGE_BASE_URL,
        )?),
    };

    Ok(provider)
}

fn api_key_var(kind: EmbeddingProviderKind) -> &'static str {
    match kind {
        EmbeddingProviderKind::OpenAi => "OPENAI_API_KEY",
        EmbeddingProviderKind::Gemini => "GEMINI_API_KEY",
        EmbeddingProviderKind::Voyage => "VOYAGE_API_KEY",
    }
}
