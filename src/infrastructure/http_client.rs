use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::DomainError;

/// Raw upstream response; status interpretation is left to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// POST a JSON body; only transport failures are errors
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, DomainError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::embedding_provider("http", format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            DomainError::embedding_provider("http", format!("Failed to read response: {}", e))
        })?;

        Ok(HttpResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_json_sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_json(serde_json::json!({ "input": "hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let response = client
            .post_json(
                &format!("{}/v1/embeddings", server.uri()),
                vec![("Authorization", "Bearer test-key")],
                &serde_json::json!({ "input": "hello" }),
            )
            .await
            .unwrap();

        assert!(response.is_success());
        let json: serde_json::Value = response.json().unwrap();
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        let response = client
            .post_json(&server.uri(), vec![], &serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(response, HttpResponse::new(401, "invalid api key"));
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = HttpClient::new();

        // port 9 (discard) is not expected to accept HTTP
        let result = client
            .post_json("http://127.0.0.1:9/", vec![], &serde_json::json!({}))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::EmbeddingProvider { status: None, .. })
        ));
    }
}
