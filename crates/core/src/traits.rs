use crate::error::{IndexingError, QueryError, SummarizationError};
use crate::models::{FullTextRecord, StoreDoc, VectorRecord};
use async_trait::async_trait;

/// Keyword store: one full-text record per document on the write path, a
/// normalized document list on the query path.
#[async_trait]
pub trait FullTextIndex {
    async fn index_document(&self, record: &FullTextRecord) -> Result<(), IndexingError>;

    async fn query(&self, query: &str) -> Result<Vec<StoreDoc>, QueryError>;
}

/// Vector store: a bulk write of embedded chunk records.
#[async_trait]
pub trait VectorIndex {
    async fn index_chunks(&self, records: &[VectorRecord]) -> Result<(), IndexingError>;
}

/// Opaque generation service used by the summarization trigger.
#[async_trait]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, SummarizationError>;
}
