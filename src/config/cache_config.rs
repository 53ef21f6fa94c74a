//! Semantic cache configuration
//!
//! Every setting can be given explicitly through [`CacheOptions`], through an
//! environment variable, or left to its default, in that order of precedence.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Similarity a lookup must reach to count as a hit
pub const DEFAULT_MIN_PROXIMITY: f32 = 0.9;

/// Default backing table name
pub const DEFAULT_TABLE_NAME: &str = "semantic_cache";

/// Default embedding provider.
///
/// Voyage stays the default so existing deployments that only set
/// `VOYAGE_API_KEY` keep working.
pub const DEFAULT_PROVIDER: EmbeddingProviderKind = EmbeddingProviderKind::Voyage;

pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_GEMINI_MODEL: &str = "text-embedding-004";
pub const DEFAULT_VOYAGE_MODEL: &str = "voyage-3";

/// Default store location: on-disk LanceDB when available, else in-process
pub fn default_uri() -> &'static str {
    if cfg!(feature = "lancedb") {
        "data/semantic-cache"
    } else {
        "memory://semantic-cache"
    }
}

/// Setting key and the environment variable that overrides it
const ENV_VARS: &[(&str, &str)] = &[
    ("min_proximity", "SEMANTIC_CACHE_MIN_PROXIMITY"),
    ("provider", "SEMANTIC_CACHE_PROVIDER"),
    ("uri", "SEMANTIC_CACHE_URI"),
    ("table_name", "SEMANTIC_CACHE_TABLE"),
    ("namespace", "SEMANTIC_CACHE_NAMESPACE"),
    ("openai_api_key", "OPENAI_API_KEY"),
    ("openai_model", "OPENAI_EMBEDDING_MODEL"),
    ("gemini_api_key", "GEMINI_API_KEY"),
    ("gemini_model", "GEMINI_EMBEDDING_MODEL"),
    ("voyage_api_key", "VOYAGE_API_KEY"),
    ("voyage_model", "VOYAGE_EMBEDDING_MODEL"),
    ("embedding_timeout_secs", "EMBEDDING_TIMEOUT_SECS"),
    ("storage_access_key_id", "AWS_ACCESS_KEY_ID"),
    ("storage_secret_access_key", "AWS_SECRET_ACCESS_KEY"),
    ("storage_session_token", "AWS_SESSION_TOKEN"),
    ("storage_region", "AWS_REGION"),
    ("storage_endpoint", "AWS_ENDPOINT"),
    ("storage_allow_http", "AWS_ALLOW_HTTP"),
    ("storage_timeout", "SEMANTIC_CACHE_STORAGE_TIMEOUT"),
    ("storage_connect_timeout", "SEMANTIC_CACHE_STORAGE_CONNECT_TIMEOUT"),
];

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    OpenAi,
    Gemini,
    Voyage,
}

impl Default for EmbeddingProviderKind {
    fn default() -> Self {
        DEFAULT_PROVIDER
    }
}

impl fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingProviderKind::OpenAi => write!(f, "openai"),
            EmbeddingProviderKind::Gemini => write!(f, "gemini"),
            EmbeddingProviderKind::Voyage => write!(f, "voyage"),
        }
    }
}

impl std::str::FromStr for EmbeddingProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(EmbeddingProviderKind::OpenAi),
            "gemini" | "google" => Ok(EmbeddingProviderKind::Gemini),
            "voyage" | "voyageai" => Ok(EmbeddingProviderKind::Voyage),
            other => Err(DomainError::configuration(format!(
                "Unknown embedding provider: {}. Valid providers: openai, gemini, voyage",
                other
            ))),
        }
    }
}

/// Object-storage settings handed to the vector store verbatim
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StorageOptions {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub allow_http: Option<String>,
    pub timeout: Option<String>,
    pub connect_timeout: Option<String>,
}

impl StorageOptions {
    /// Set options only, keyed by the store's option names.
    ///
    /// An empty result lets the store fall back to local/default behaviour.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        [
            ("aws_access_key_id", &self.access_key_id),
            ("aws_secret_access_key", &self.secret_access_key),
            ("aws_session_token", &self.session_token),
            ("aws_region", &self.region),
            ("aws_endpoint", &self.endpoint),
            ("allow_http", &self.allow_http),
            ("timeout", &self.timeout),
            ("connect_timeout", &self.connect_timeout),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key.to_string(), v)))
        .collect()
    }

    fn overrides(&self) -> Vec<(&'static str, String)> {
        [
            ("storage_access_key_id", &self.access_key_id),
            ("storage_secret_access_key", &self.secret_access_key),
            ("storage_session_token", &self.session_token),
            ("storage_region", &self.region),
            ("storage_endpoint", &self.endpoint),
            ("storage_allow_http", &self.allow_http),
            ("storage_timeout", &self.timeout),
            ("storage_connect_timeout", &self.connect_timeout),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
    }
}

impl fmt::Debug for StorageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageOptions")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redact(&self.secret_access_key))
            .field("session_token", &redact(&self.session_token))
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("allow_http", &self.allow_http)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "***")
}

/// Explicit constructor arguments; `None` defers to environment or default
#[derive(Clone, Default)]
pub struct CacheOptions {
    pub min_proximity: Option<f32>,
    pub provider: Option<EmbeddingProviderKind>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub voyage_api_key: Option<String>,
    pub voyage_model: Option<String>,
    pub embedding_timeout: Option<Duration>,
    pub uri: Option<String>,
    pub table_name: Option<String>,
    pub namespace: Option<String>,
    pub storage: StorageOptions,
}

impl fmt::Debug for CacheOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOptions")
            .field("min_proximity", &self.min_proximity)
            .field("provider", &self.provider)
            .field("uri", &self.uri)
            .field("table_name", &self.table_name)
            .field("namespace", &self.namespace)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_proximity(mut self, min_proximity: f32) -> Self {
        self.min_proximity = Some(min_proximity);
        self
    }

    pub fn with_provider(mut self, provider: EmbeddingProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key of the given provider
    pub fn with_api_key(mut self, provider: EmbeddingProviderKind, key: impl Into<String>) -> Self {
        let key = Some(key.into());

        match provider {
            EmbeddingProviderKind::OpenAi => self.openai_api_key = key,
            EmbeddingProviderKind::Gemini => self.gemini_api_key = key,
            EmbeddingProviderKind::Voyage => self.voyage_api_key = key,
        }

        self
    }

    /// Set the embedding model of the given provider
    pub fn with_model(mut self, provider: EmbeddingProviderKind, model: impl Into<String>) -> Self {
        let model = Some(model.into());

        match provider {
            EmbeddingProviderKind::OpenAi => self.openai_model = model,
            EmbeddingProviderKind::Gemini => self.gemini_model = model,
            EmbeddingProviderKind::Voyage => self.voyage_model = model,
        }

        self
    }

    pub fn with_embedding_timeout(mut self, timeout: Duration) -> Self {
        self.embedding_timeout = Some(timeout);
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_storage(mut self, storage: StorageOptions) -> Self {
        self.storage = storage;
        self
    }

    fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut values: Vec<(&'static str, String)> = [
            ("min_proximity", self.min_proximity.map(|p| p.to_string())),
            ("provider", self.provider.map(|p| p.to_string())),
            ("openai_api_key", self.openai_api_key.clone()),
            ("openai_model", self.openai_model.clone()),
            ("gemini_api_key", self.gemini_api_key.clone()),
            ("gemini_model", self.gemini_model.clone()),
            ("voyage_api_key", self.voyage_api_key.clone()),
            ("voyage_model", self.voyage_model.clone()),
            (
                "embedding_timeout_secs",
                self.embedding_timeout.map(|t| t.as_secs().to_string()),
            ),
            ("uri", self.uri.clone()),
            ("table_name", self.table_name.clone()),
            ("namespace", self.namespace.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();

        values.extend(self.storage.overrides());
        values
    }
}

/// API key and model of one embedding provider
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: String,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

/// Resolved, immutable cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    min_proximity: f32,
    provider: EmbeddingProviderKind,
    openai: ProviderSettings,
    gemini: ProviderSettings,
    voyage: ProviderSettings,
    embedding_timeout: Option<Duration>,
    uri: String,
    base_table_name: String,
    namespace: Option<String>,
    storage: StorageOptions,
}

/// Flat view of all settings after layering
#[derive(Debug, Deserialize)]
struct RawCacheConfig {
    min_proximity: String,
    provider: String,
    openai_api_key: Option<String>,
    openai_model: String,
    gemini_api_key: Option<String>,
    gemini_model: String,
    voyage_api_key: Option<String>,
    voyage_model: String,
    embedding_timeout_secs: Option<String>,
    uri: String,
    table_name: String,
    namespace: Option<String>,
    storage_access_key_id: Option<String>,
    storage_secret_access_key: Option<String>,
    storage_session_token: Option<String>,
    storage_region: Option<String>,
    storage_endpoint: Option<String>,
    storage_allow_http: Option<String>,
    storage_timeout: Option<String>,
    storage_connect_timeout: Option<String>,
}

impl CacheConfig {
    /// Resolve from the process environment with no explicit arguments
    pub fn from_env() -> Result<Self, DomainError> {
        Self::resolve(CacheOptions::default())
    }

    /// Resolve explicit options against the process environment
    pub fn resolve(options: CacheOptions) -> Result<Self, DomainError> {
        Self::resolve_with(options, |name| std::env::var(name).ok())
    }

    /// Resolve explicit options against an arbitrary environment lookup
    pub fn resolve_with<F>(options: CacheOptions, lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .set_default("min_proximity", DEFAULT_MIN_PROXIMITY.to_string())?
            .set_default("provider", DEFAULT_PROVIDER.to_string())?
            .set_default("openai_model", DEFAULT_OPENAI_MODEL)?
            .set_default("gemini_model", DEFAULT_GEMINI_MODEL)?
            .set_default("voyage_model", DEFAULT_VOYAGE_MODEL)?
            .set_default("uri", default_uri())?
            .set_default("table_name", DEFAULT_TABLE_NAME)?;

        for (key, var) in ENV_VARS {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                builder = builder.set_override(*key, value)?;
            }
        }

        for (key, value) in options.overrides() {
            builder = builder.set_override(key, value)?;
        }

        let raw: RawCacheConfig = builder.build()?.try_deserialize()?;
        Self::validate(raw)
    }

    fn validate(raw: RawCacheConfig) -> Result<Self, DomainError> {
        let min_proximity: f32 = raw.min_proximity.trim().parse().map_err(|_| {
            DomainError::configuration(format!(
                "min proximity must be a number, got '{}'",
                raw.min_proximity
            ))
        })?;

        if !(0.0..=1.0).contains(&min_proximity) {
            return Err(DomainError::configuration(format!(
                "min proximity must be within [0, 1], got {}",
                min_proximity
            )));
        }

        let provider = raw.provider.parse()?;

        let embedding_timeout = raw
            .embedding_timeout_secs
            .map(|secs| {
                secs.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    DomainError::configuration(format!(
                        "embedding timeout must be whole seconds, got '{}'",
                        secs
                    ))
                })
            })
            .transpose()?;

        if raw.table_name.trim().is_empty() {
            return Err(DomainError::configuration("table name must not be empty"));
        }
        validate_identifier("table name", &raw.table_name)?;

        let namespace = non_empty(raw.namespace);
        if let Some(ref namespace) = namespace {
            validate_identifier("namespace", namespace)?;
        }

        if raw.uri.trim().is_empty() {
            return Err(DomainError::configuration("store URI must not be empty"));
        }

        Ok(Self {
            min_proximity,
            provider,
            openai: ProviderSettings {
                api_key: non_empty(raw.openai_api_key),
                model: raw.openai_model,
            },
            gemini: ProviderSettings {
                api_key: non_empty(raw.gemini_api_key),
                model: raw.gemini_model,
            },
            voyage: ProviderSettings {
                api_key: non_empty(raw.voyage_api_key),
                model: raw.voyage_model,
            },
            embedding_timeout,
            uri: raw.uri,
            base_table_name: raw.table_name,
            namespace,
            storage: StorageOptions {
                access_key_id: non_empty(raw.storage_access_key_id),
                secret_access_key: non_empty(raw.storage_secret_access_key),
                session_token: non_empty(raw.storage_session_token),
                region: non_empty(raw.storage_region),
                endpoint: non_empty(raw.storage_endpoint),
                allow_http: non_empty(raw.storage_allow_http),
                timeout: non_empty(raw.storage_timeout),
                connect_timeout: non_empty(raw.storage_connect_timeout),
            },
        })
    }

    pub fn min_proximity(&self) -> f32 {
        self.min_proximity
    }

    pub fn provider(&self) -> EmbeddingProviderKind {
        self.provider
    }

    /// Settings of the given provider
    pub fn provider_settings(&self, provider: EmbeddingProviderKind) -> &ProviderSettings {
        match provider {
            EmbeddingProviderKind::OpenAi => &self.openai,
            EmbeddingProviderKind::Gemini => &self.gemini,
            EmbeddingProviderKind::Voyage => &self.voyage,
        }
    }

    pub fn embedding_timeout(&self) -> Option<Duration> {
        self.embedding_timeout
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Physical table name; a namespace selects a distinct table
    pub fn table_name(&self) -> String {
        match self.namespace {
            Some(ref namespace) => format!("{}_{}", self.base_table_name, namespace),
            None => self.base_table_name.clone(),
        }
    }

    pub fn storage(&self) -> &StorageOptions {
        &self.storage
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_identifier(what: &str, value: &str) -> Result<(), DomainError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(DomainError::configuration(format!(
            "{} '{}' may only contain ASCII letters, digits, '_' and '-'",
            what, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CacheConfig::resolve_with(CacheOptions::default(), env(&[])).unwrap();

        assert!((config.min_proximity() - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.provider(), EmbeddingProviderKind::Voyage);
        assert_eq!(config.provider_settings(EmbeddingProviderKind::OpenAi).model, "text-embedding-3-small");
        assert_eq!(config.provider_settings(EmbeddingProviderKind::Voyage).model, "voyage-3");
        assert_eq!(config.provider_settings(EmbeddingProviderKind::Voyage).api_key, None);
        assert_eq!(config.uri(), default_uri());
        assert_eq!(config.table_name(), "semantic_cache");
        assert_eq!(config.namespace(), None);
        assert!(config.storage().to_pairs().is_empty());
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let config = CacheConfig::resolve_with(
            CacheOptions::default(),
            env(&[
                ("SEMANTIC_CACHE_MIN_PROXIMITY", "0.75"),
                ("SEMANTIC_CACHE_PROVIDER", "openai"),
                ("OPENAI_API_KEY", "sk-env"),
                ("SEMANTIC_CACHE_NAMESPACE", "tenant-a"),
                ("AWS_REGION", "eu-west-1"),
            ]),
        )
        .unwrap();

        assert!((config.min_proximity() - 0.75).abs() < f32::EPSILON);
        assert_eq!(config.provider(), EmbeddingProviderKind::OpenAi);
        assert_eq!(
            config.provider_settings(EmbeddingProviderKind::OpenAi).api_key.as_deref(),
            Some("sk-env")
        );
        assert_eq!(config.table_name(), "semantic_cache_tenant-a");
        assert_eq!(
            config.storage().to_pairs(),
            vec![("aws_region".to_string(), "eu-west-1".to_string())]
        );
    }

    #[test]
    fn test_explicit_overrides_environment() {
        let options = CacheOptions::new()
            .with_min_proximity(0.5)
            .with_provider(EmbeddingProviderKind::Gemini)
            .with_api_key(EmbeddingProviderKind::Gemini, "explicit-key")
            .with_model(EmbeddingProviderKind::Gemini, "gemini-embedding-001")
            .with_table_name("answers");

        let config = CacheConfig::resolve_with(
            options,
            env(&[
                ("SEMANTIC_CACHE_MIN_PROXIMITY", "0.75"),
                ("SEMANTIC_CACHE_PROVIDER", "openai"),
                ("GEMINI_API_KEY", "env-key"),
                ("SEMANTIC_CACHE_TABLE", "ignored"),
            ]),
        )
        .unwrap();

        let gemini = config.provider_settings(EmbeddingProviderKind::Gemini);
        assert!((config.min_proximity() - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.provider(), EmbeddingProviderKind::Gemini);
        assert_eq!(gemini.api_key.as_deref(), Some("explicit-key"));
        assert_eq!(gemini.model, "gemini-embedding-001");
        assert_eq!(config.table_name(), "answers");
    }

    #[test]
    fn test_empty_environment_values_are_unset() {
        let config = CacheConfig::resolve_with(
            CacheOptions::default(),
            env(&[("VOYAGE_API_KEY", ""), ("SEMANTIC_CACHE_NAMESPACE", "  ")]),
        )
        .unwrap();

        assert_eq!(config.provider_settings(EmbeddingProviderKind::Voyage).api_key, None);
        assert_eq!(config.namespace(), None);
    }

    #[test]
    fn test_min_proximity_out_of_range() {
        let result = CacheConfig::resolve_with(CacheOptions::new().with_min_proximity(1.5), env(&[]));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));

        let result = CacheConfig::resolve_with(
            CacheOptions::default(),
            env(&[("SEMANTIC_CACHE_MIN_PROXIMITY", "-0.1")]),
        );
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_min_proximity_not_a_number() {
        let result = CacheConfig::resolve_with(
            CacheOptions::default(),
            env(&[("SEMANTIC_CACHE_MIN_PROXIMITY", "high")]),
        );

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result = CacheConfig::resolve_with(
            CacheOptions::default(),
            env(&[("SEMANTIC_CACHE_PROVIDER", "cohere")]),
        );

        let error = result.unwrap_err();
        assert!(error.to_string().contains("Unknown embedding provider: cohere"));
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let result =
            CacheConfig::resolve_with(CacheOptions::new().with_namespace("a'; drop"), env(&[]));

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_embedding_timeout() {
        let config = CacheConfig::resolve_with(
            CacheOptions::default(),
            env(&[("EMBEDDING_TIMEOUT_SECS", "30")]),
        )
        .unwrap();
        assert_eq!(config.embedding_timeout(), Some(Duration::from_secs(30)));

        let result = CacheConfig::resolve_with(
            CacheOptions::default(),
            env(&[("EMBEDDING_TIMEOUT_SECS", "soon")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("OpenAI".parse::<EmbeddingProviderKind>().unwrap(), EmbeddingProviderKind::OpenAi);
        assert_eq!("google".parse::<EmbeddingProviderKind>().unwrap(), EmbeddingProviderKind::Gemini);
        assert_eq!("voyage".parse::<EmbeddingProviderKind>().unwrap(), EmbeddingProviderKind::Voyage);
        assert!("".parse::<EmbeddingProviderKind>().is_err());
    }

    #[test]
    fn test_storage_options_strip_unset_fields() {
        let storage = StorageOptions {
            access_key_id: Some("AKIA".into()),
            secret_access_key: Some("secret".into()),
            endpoint: Some("http://localhost:9000".into()),
            allow_http: Some("true".into()),
            ..Default::default()
        };

        let pairs = storage.to_pairs();

        assert_eq!(pairs.len(), 4);
        assert!(pairs.contains(&("aws_endpoint".to_string(), "http://localhost:9000".to_string())));
        assert!(pairs.contains(&("allow_http".to_string(), "true".to_string())));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let options = CacheOptions::new()
            .with_api_key(EmbeddingProviderKind::Voyage, "pa-secret")
            .with_storage(StorageOptions {
                secret_access_key: Some("aws-secret".into()),
                ..Default::default()
            });
        let config = CacheConfig::resolve_with(options, env(&[])).unwrap();

        let debug = format!("{:?}", config);

        assert!(!debug.contains("pa-secret"));
        assert!(!debug.contains("aws-secret"));
    }
}
