pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod snippet;
pub mod stores;
pub mod traits;

pub use chunking::{chunk_text, sanitize_text, ChunkingConfig, Chunks, DEFAULT_MAX_CHUNK_TOKENS};
pub use embeddings::{
    embed_chunks, CharacterNgramEmbedder, Embedder, DEFAULT_EMBEDDING_DIMENSIONS, MIN_CHUNK_TOKENS,
};
pub use error::{ConversionError, IndexingError, IngestError, QueryError, SummarizationError};
pub use extractor::{DocumentConverter, LopdfExtractor, TextExtractor};
pub use ingest::{eligible_files, process_target, IngestionReport, SkippedFile};
pub use llm::LlmClient;
pub use models::{
    ConvertedDocument, FullTextRecord, SearchHit, SearchOutcome, StoreDoc, VectorRecord,
};
pub use orchestrator::{summarize, SearchDispatcher, EMPTY_QUERY_ERROR};
pub use snippet::{build_snippet, filter_query_terms, format_hit, format_timestamp, highlight_terms};
pub use stores::{OpenSearchStore, SolrStore};
pub use traits::{FullTextIndex, TextGenerator, VectorIndex};
