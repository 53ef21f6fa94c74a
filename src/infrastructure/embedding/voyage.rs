//! Voyage AI embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::config::DEFAULT_VOYAGE_MODEL;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;

pub(super) const DEFAULT_VOYAGE_BASE_URL: &str = "https://api.voyageai.com";
const PROVIDER_NAME: &str = "voyage";

/// Voyage embedding provider
pub struct VoyageEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> std::fmt::Debug for VoyageEmbeddingProvider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoyageEmbeddingProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl<C: HttpClientTrait> VoyageEmbeddingProvider<C> {
    /// Create a new Voyage embedding provider
    pub fn new(client: C, api_key: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_base_url(client, api_key, DEFAULT_VOYAGE_MODEL, DEFAULT_VOYAGE_BASE_URL)
    }

    /// Create a new provider with custom model and base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let api_key = api_key.into();

        if api_key.trim().is_empty() {
            return Err(DomainError::configuration(
                "Voyage API key is required (set VOYAGE_API_KEY)",
            ));
        }

        Ok(Self {
            client,
            auth_header: format!("Bearer {}", api_key),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for VoyageEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": [text],
        });
        let headers = vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self
            .client
            .post_json(&self.embeddings_url(), headers, &body)
            .await?;

        if !response.is_success() {
            return Err(DomainError::upstream_status(
                PROVIDER_NAME,
                response.status,
                response.body,
            ));
        }

        let parsed: VoyageEmbeddingResponse = response.json().map_err(|e| {
            DomainError::embedding_provider(
                PROVIDER_NAME,
                format!("Failed to parse embedding response: {}", e),
            )
        })?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DomainError::no_embedding(PROVIDER_NAME))
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct VoyageEmbeddingResponse {
    #[serde(default)]
    data: Vec<VoyageEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct VoyageEmbeddingData {
    #[serde(default)]
    embedding: Vec<f32>,
}
