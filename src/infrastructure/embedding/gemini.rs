//! Google Gemini embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::config::DEFAULT_GEMINI_MODEL;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;

pub(super) const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const PROVIDER_NAME: &str = "gemini";

/// Gemini embedding provider; authenticates with an API-key query parameter
pub struct GeminiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> std::fmt::Debug for GeminiEmbeddingProvider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEmbeddingProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl<C: HttpClientTrait> GeminiEmbeddingProvider<C> {
    /// Create a new Gemini embedding provider
    pub fn new(client: C, api_key: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_base_url(client, api_key, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_BASE_URL)
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
                "Gemini API key is required (set GEMINI_API_KEY)",
            ));
        }

        // accept both "text-embedding-004" and "models/text-embedding-004"
        let model = model.into();
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model,
        })
    }

    fn embed_url(&self) -> Result<String, DomainError> {
        let url = format!("{}/v1beta/models/{}:embedContent", self.base_url, self.model);

        reqwest::Url::parse_with_params(&url, &[("key", self.api_key.as_str())])
            .map(String::from)
            .map_err(|e| {
                DomainError::configuration(format!("Invalid Gemini endpoint '{}': {}", url, e))
            })
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for GeminiEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let body = serde_json::json!({
            "model": format!("models/{}", self.model),
            "content": {
                "parts": [{ "text": text }]
            }
        });

        let response = self
            .client
            .post_json(
                &self.embed_url()?,
                vec![("Content-Type", "application/json")],
                &body,
            )
            .await?;

        if !response.is_success() {
            return Err(DomainError::upstream_status(
                PROVIDER_NAME,
                response.status,
                response.body,
            ));
        }

        let parsed: GeminiEmbedResponse = response.json().map_err(|e| {
            DomainError::embedding_provider(
                PROVIDER_NAME,
                format!("Failed to parse embedding response: {}", e),
            )
        })?;

        parsed
            .embedding
            .map(|e| e.values)
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
struct GeminiEmbedResponse {
    embedding: Option<GeminiContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}
