use serde::Serialize;

/// A processed source document: normalized text plus the identity fields both
/// stores key on. Immutable once built, scoped to one ingestion run.
#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    /// Sha-256 hex digest of the file bytes.
    pub content_hash: String,
    pub source_path: String,
    /// File modification time, epoch seconds.
    pub modified_ts: i64,
    pub full_text: String,
}

/// The single full-text record written per document. Its id is the content
/// hash, so re-running over an unchanged file overwrites the same record.
#[derive(Debug, Clone, Serialize)]
pub struct FullTextRecord {
    pub id: String,
    pub docts: i64,
    pub docpath: String,
    pub doctext: String,
}

impl FullTextRecord {
    pub fn from_document(document: &ConvertedDocument) -> Self {
        Self {
            id: document.content_hash.clone(),
            docts: document.modified_ts,
            docpath: document.source_path.clone(),
            doctext: document.full_text.clone(),
        }
    }
}

/// One embedded chunk bound for the vector store's bulk endpoint. The id goes
/// into the bulk action header, never the record body.
#[derive(Debug, Clone, Serialize)]
pub struct VectorRecord {
    #[serde(skip)]
    pub id: String,
    pub chunkvec: Vec<f32>,
    pub docchunk: String,
    pub docpath: String,
}

/// A matched document as decoded from the full-text store, flattened into
/// fixed fields immediately after decoding. Downstream logic never sees the
/// raw transport shape.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreDoc {
    pub doctext: String,
    pub docpath: String,
    pub docts: i64,
}

/// A formatted result row: path, local timestamp, highlighted snippet markup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub docpath: String,
    pub modified: String,
    pub snippet: String,
}

/// What the query entry point hands back to the hosting layer.
#[derive(Debug, Default, Serialize)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub error: Option<String>,
}
