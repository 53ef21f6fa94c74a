use std::io::Write;

use serde::Serialize;

use super::Command;
use crate::infrastructure::services::SemanticCacheService;

#[derive(Serialize)]
struct GetOutput<'a> {
    key: &'a str,
    value: Option<String>,
}

#[derive(Serialize)]
struct DeleteOutput {
    deleted: usize,
}

/// Execute one command, writing its result to `out`
pub async fn execute<W: Write>(
    service: &SemanticCacheService,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::Set { key, value } => {
            service.set(&key, &value).await?;
        }
        Command::Get { keys } => {
            let values = service.get_many(&keys).await;

            for (key, value) in keys.iter().zip(values) {
                serde_json::to_writer(&mut *out, &GetOutput { key, value })?;
                writeln!(out)?;
            }
        }
        Command::Search { key, limit } => {
            let results = service.search(&key, limit).await;

            serde_json::to_writer_pretty(&mut *out, &results)?;
            writeln!(out)?;
        }
        Command::Delete { keys } => {
            let deleted = match keys.as_slice() {
                [key] => service.delete(key).await,
                _ => service.bulk_delete(&keys).await,
            };

            serde_json::to_writer(&mut *out, &DeleteOutput { deleted })?;
            writeln!(out)?;
        }
        Command::Flush => {
            if !service.flush().await {
                anyhow::bail!("Failed to flush table '{}'", service.table_name());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{CacheConfig, CacheOptions};
    use crate::domain::embedding::KeyedEmbeddingProvider;
    use crate::domain::semantic_cache::MockVectorStore;
    use crate::domain::DomainError;
    use crate::infrastructure::vector_store::InMemoryVectorStore;

    fn create_service() -> SemanticCacheService {
        let config = CacheConfig::resolve_with(
            CacheOptions::new().with_uri("memory://cli"),
            |_| None,
        )
        .unwrap();

        SemanticCacheService::new(
            &config,
            Arc::new(KeyedEmbeddingProvider::new(4)),
            Arc::new(InMemoryVectorStore::new()),
        )
    }

    async fn run(service: &SemanticCacheService, command: Command) -> String {
        let mut out = Vec::new();
        execute(service, command, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let service = create_service();
        run(
            &service,
            Command::Set {
                key: "Capital of France".to_string(),
                value: "Paris".to_string(),
            },
        )
        .await;

        let output = run(
            &service,
            Command::Get {
                keys: vec!["Capital of France".to_string()],
            },
        )
        .await;

        assert_eq!(output, "{\"key\":\"Capital of France\",\"value\":\"Paris\"}\n");
    }

    #[tokio::test]
    async fn test_get_miss_prints_null() {
        let service = create_service();

        let output = run(
            &service,
            Command::Get {
                keys: vec!["a".to_string(), "b".to_string()],
            },
        )
        .await;

        assert_eq!(
            output,
            "{\"key\":\"a\",\"value\":null}\n{\"key\":\"b\",\"value\":null}\n"
        );
    }

    #[tokio::test]
    async fn test_search_prints_json_array() {
        let service = create_service();
        service.set("Capital of France", "Paris").await.unwrap();

        let output = run(
            &service,
            Command::Search {
                key: "Capital of France".to_string(),
                limit: 5,
            },
        )
        .await;

        let results: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(results[0]["value"], "Paris");
        assert_eq!(results.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_count() {
        let service = create_service();
        service
            .set_many(&["a", "b"], &["1", "2"])
            .await
            .unwrap();

        let output = run(
            &service,
            Command::Delete {
                keys: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            },
        )
        .await;

        assert_eq!(output, "{\"deleted\":2}\n");
    }

    #[tokio::test]
    async fn test_flush_failure_is_an_error() {
        let mut store = MockVectorStore::new();
        store
            .expect_connect()
            .returning(|_, _| Err(DomainError::storage("unreachable")));
        let config = CacheConfig::resolve_with(CacheOptions::new(), |_| None).unwrap();
        let service = SemanticCacheService::new(
            &config,
            Arc::new(KeyedEmbeddingProvider::new(4)),
            Arc::new(store),
        );

        let mut out = Vec::new();
        let result = execute(&service, Command::Flush, &mut out).await;

        assert!(result.is_err());
    }
}
