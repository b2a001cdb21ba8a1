use crate::chunking::{chunk_text, sanitize_text, ChunkingConfig, Chunks};
use crate::error::ConversionError;
use crate::models::ConvertedDocument;
use lopdf::Document;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Seam for the external parsing library: a file in, raw text out.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ConversionError>;
}

#[derive(Default)]
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, ConversionError> {
        let document = Document::load(path).map_err(|error| ConversionError::Parse {
            path: path.display().to_string(),
            reason: error.to_string(),
        })?;

        let mut text = String::new();
        for (page_no, _page_id) in document.get_pages() {
            let page_text =
                document
                    .extract_text(&[page_no])
                    .map_err(|error| ConversionError::Parse {
                        path: path.display().to_string(),
                        reason: error.to_string(),
                    })?;

            if !page_text.trim().is_empty() {
                text.push_str(&page_text);
                text.push('\n');
            }
        }

        Ok(text)
    }
}

/// Turns a file into a [`ConvertedDocument`] and its chunk sequence. Built
/// once at process start and reused across files.
pub struct DocumentConverter<X> {
    extractor: X,
    chunking: ChunkingConfig,
}

impl<X: TextExtractor> DocumentConverter<X> {
    pub fn new(extractor: X, chunking: ChunkingConfig) -> Self {
        Self {
            extractor,
            chunking,
        }
    }

    pub fn convert(&self, path: &Path) -> Result<ConvertedDocument, ConversionError> {
        let bytes = fs::read(path).map_err(|source| ConversionError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let modified_ts = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|source| ConversionError::Read {
                path: path.display().to_string(),
                source,
            })?
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or(0);

        let full_text = sanitize_text(&self.extractor.extract(path)?);
        if full_text.is_empty() {
            return Err(ConversionError::EmptyText {
                path: path.display().to_string(),
            });
        }

        let mut hasher = Sha256::new();
        hasher.update(&bytes);

        Ok(ConvertedDocument {
            content_hash: format!("{:x}", hasher.finalize()),
            source_path: path.to_string_lossy().to_string(),
            modified_ts,
            full_text,
        })
    }

    /// The document's lazy chunk sequence, bounded by the configured token
    /// budget.
    pub fn chunk<'a>(&self, document: &'a ConvertedDocument) -> Chunks<'a> {
        chunk_text(&document.full_text, self.chunking)
    }
}
