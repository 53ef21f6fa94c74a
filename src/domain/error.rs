use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Embedding provider error: {provider}{} - {message}", status_suffix(.status))]
    EmbeddingProvider {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Dimension mismatch: {left} != {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Table not found: {name}")]
    TableNotFound { name: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (HTTP {})", code)).unwrap_or_default()
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn embedding_provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingProvider {
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Upstream answered with a non-success status; the body is kept verbatim
    pub fn upstream_status(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::EmbeddingProvider {
            provider: provider.into(),
            status: Some(status),
            message: body.into(),
        }
    }

    pub fn no_embedding(provider: impl Into<String>) -> Self {
        Self::embedding_provider(provider, "no embedding returned")
    }

    pub fn dimension_mismatch(left: usize, right: usize) -> Self {
        Self::DimensionMismatch { left, right }
    }

    pub fn table_not_found(name: impl Into<String>) -> Self {
        Self::TableNotFound { name: name.into() }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound { .. })
    }
}

impl From<config::ConfigError> for DomainError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("OPENAI_API_KEY is not set");
        assert_eq!(
            error.to_string(),
            "Configuration error: OPENAI_API_KEY is not set"
        );
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_upstream_status_error_carries_status_and_body() {
        let error = DomainError::upstream_status("voyage", 429, "rate limited");

        assert_eq!(
            error.to_string(),
            "Embedding provider error: voyage (HTTP 429) - rate limited"
        );
        assert!(matches!(
            error,
            DomainError::EmbeddingProvider {
                status: Some(429),
                ..
            }
        ));
    }

    #[test]
    fn test_no_embedding_error() {
        let error = DomainError::no_embedding("gemini");
        assert_eq!(
            error.to_string(),
            "Embedding provider error: gemini - no embedding returned"
        );
    }

    #[test]
    fn test_table_not_found() {
        assert!(DomainError::table_not_found("cache").is_table_not_found());
        assert!(!DomainError::storage("disk full").is_table_not_found());
    }
}
