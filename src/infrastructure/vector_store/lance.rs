//! LanceDB-backed vector store
//!
//! Records are stored as Arrow batches with the columns `id`, `text`,
//! `value` (Utf8) and `vector` (FixedSizeList<Float32>). The list width is
//! fixed by the first batch written to a table.

use std::sync::Arc;

use arrow_array::types::Float32Type;
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field, Schema};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};

use crate::domain::semantic_cache::{
    CacheRecord, RecordFilter, VectorConnection, VectorStore, VectorTable,
};
use crate::domain::DomainError;

const ID_COLUMN: &str = "id";
const TEXT_COLUMN: &str = "text";
const VALUE_COLUMN: &str = "value";
const VECTOR_COLUMN: &str = "vector";

fn map_lance_error(error: lancedb::Error) -> DomainError {
    match error {
        lancedb::Error::TableNotFound { name } => DomainError::table_not_found(name),
        other => DomainError::storage(other.to_string()),
    }
}

/// Vector store that opens LanceDB databases (local paths or object storage URIs)
#[derive(Debug, Clone, Default)]
pub struct LanceVectorStore;

impl LanceVectorStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VectorStore for LanceVectorStore {
    async fn connect(
        &self,
        uri: &str,
        options: Vec<(String, String)>,
    ) -> Result<Arc<dyn VectorConnection>, DomainError> {
        let connection = lancedb::connect(uri)
            .storage_options(options)
            .execute()
            .await
            .map_err(map_lance_error)?;

        Ok(Arc::new(LanceConnection { connection }) as Arc<dyn VectorConnection>)
    }
}

pub struct LanceConnection {
    connection: lancedb::Connection,
}

impl std::fmt::Debug for LanceConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanceConnection")
            .field("uri", &self.connection.uri())
            .finish()
    }
}

#[async_trait]
impl VectorConnection for LanceConnection {
    async fn open_table(&self, name: &str) -> Result<Arc<dyn VectorTable>, DomainError> {
        let table = self
            .connection
            .open_table(name)
            .execute()
            .await
            .map_err(map_lance_error)?;

        Ok(Arc::new(LanceTable { table }) as Arc<dyn VectorTable>)
    }

    async fn create_table(
        &self,
        name: &str,
        seed: Vec<CacheRecord>,
    ) -> Result<Arc<dyn VectorTable>, DomainError> {
        let batch = records_to_batch(&seed)?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);

        let table = self
            .connection
            .create_table(name, Box::new(reader))
            .execute()
            .await
            .map_err(map_lance_error)?;

        Ok(Arc::new(LanceTable { table }) as Arc<dyn VectorTable>)
    }

    async fn drop_table(&self, name: &str) -> Result<(), DomainError> {
        self.connection
            .drop_table(name)
            .await
            .map_err(map_lance_error)
    }
}

pub struct LanceTable {
    table: lancedb::Table,
}

impl std::fmt::Debug for LanceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanceTable")
            .field("name", &self.table.name())
            .finish()
    }
}

#[async_trait]
impl VectorTable for LanceTable {
    async fn add(&self, records: Vec<CacheRecord>) -> Result<(), DomainError> {
        if records.is_empty() {
            return Ok(());
        }

        let batch = records_to_batch(&records)?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);

        self.table
            .add(Box::new(reader))
            .execute()
            .await
            .map_err(map_lance_error)?;

        Ok(())
    }

    async fn upsert(&self, records: Vec<CacheRecord>) -> Result<(), DomainError> {
        if records.is_empty() {
            return Ok(());
        }

        let batch = records_to_batch(&records)?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);

        // a single merge commit: a failed write leaves the previous version in place
        let mut merge = self.table.merge_insert(&[ID_COLUMN]);
        merge
            .when_matched_update_all(None)
            .when_not_matched_insert_all();
        merge
            .execute(Box::new(reader))
            .await
            .map_err(map_lance_error)?;

        Ok(())
    }

    async fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<CacheRecord>, DomainError> {
        let batches: Vec<RecordBatch> = self
            .table
            .query()
            .nearest_to(vector)
            .map_err(map_lance_error)?
            .limit(limit)
            .execute()
            .await
            .map_err(map_lance_error)?
            .try_collect()
            .await
            .map_err(map_lance_error)?;

        let mut records = Vec::new();
        for batch in &batches {
            records.extend(batch_to_records(batch)?);
        }

        Ok(records)
    }

    async fn delete(&self, filter: &RecordFilter) -> Result<usize, DomainError> {
        let predicate = filter_to_predicate(filter);

        let matching = self
            .table
            .count_rows(Some(predicate.clone()))
            .await
            .map_err(map_lance_error)?;

        if matching == 0 {
            return Ok(0);
        }

        self.table
            .delete(&predicate)
            .await
            .map_err(map_lance_error)?;

        Ok(matching)
    }
}

/// Quote a value as a SQL string literal
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn filter_to_predicate(filter: &RecordFilter) -> String {
    match filter {
        RecordFilter::IdEquals(id) => format!("{} = {}", ID_COLUMN, quote(id)),
        // an empty IN list is not valid SQL
        RecordFilter::IdIn(ids) if ids.is_empty() => "false".to_string(),
        RecordFilter::IdIn(ids) => {
            let values: Vec<String> = ids.iter().map(|id| quote(id)).collect();
            format!("{} IN ({})", ID_COLUMN, values.join(", "))
        }
    }
}

fn record_schema(dimensions: usize) -> Result<Arc<Schema>, DomainError> {
    let width = i32::try_from(dimensions)
        .map_err(|_| DomainError::validation(format!("Vector too wide: {}", dimensions)))?;

    Ok(Arc::new(Schema::new(vec![
        Field::new(ID_COLUMN, DataType::Utf8, false),
        Field::new(TEXT_COLUMN, DataType::Utf8, false),
        Field::new(VALUE_COLUMN, DataType::Utf8, false),
        Field::new(
            VECTOR_COLUMN,
            DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), width),
            true,
        ),
    ])))
}

fn records_to_batch(records: &[CacheRecord]) -> Result<RecordBatch, DomainError> {
    let dimensions = records.first().map(CacheRecord::dimensions).ok_or_else(|| {
        DomainError::validation("Cannot infer a table schema without a seed record")
    })?;

    if let Some(bad) = records.iter().find(|r| r.dimensions() != dimensions) {
        return Err(DomainError::dimension_mismatch(bad.dimensions(), dimensions));
    }

    let schema = record_schema(dimensions)?;
    let ids = StringArray::from_iter_values(records.iter().map(CacheRecord::id));
    let texts = StringArray::from_iter_values(records.iter().map(CacheRecord::text));
    let values = StringArray::from_iter_values(records.iter().map(CacheRecord::value));
    let vectors = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
        records
            .iter()
            .map(|r| Some(r.vector().iter().copied().map(Some).collect::<Vec<_>>())),
        dimensions as i32,
    );

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(ids),
            Arc::new(texts),
            Arc::new(values),
            Arc::new(vectors),
        ],
    )
    .map_err(|e| DomainError::storage(format!("Failed to build record batch: {}", e)))
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, DomainError> {
    batch
        .column_by_name(name)
        .and_then(|column| column.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| DomainError::storage(format!("Missing or invalid column '{}'", name)))
}

fn batch_to_records(batch: &RecordBatch) -> Result<Vec<CacheRecord>, DomainError> {
    let ids = string_column(batch, ID_COLUMN)?;
    let texts = string_column(batch, TEXT_COLUMN)?;
    let values = string_column(batch, VALUE_COLUMN)?;
    let vectors = batch
        .column_by_name(VECTOR_COLUMN)
        .and_then(|column| column.as_any().downcast_ref::<FixedSizeListArray>())
        .ok_or_else(|| {
            DomainError::storage(format!("Missing or invalid column '{}'", VECTOR_COLUMN))
        })?;

    (0..batch.num_rows())
        .map(|row| {
            let list = vectors.value(row);
            let vector = list
                .as_any()
                .downcast_ref::<Float32Array>()
                .map(|floats| floats.values().to_vec())
                .ok_or_else(|| DomainError::storage("Vector column is not Float32"))?;

            Ok(CacheRecord::from_parts(
                ids.value(row),
                texts.value(row),
                values.value(row),
                vector,
            ))
        })
        .collect()
}
