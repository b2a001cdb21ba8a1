use crate::embeddings::{embed_chunks, Embedder};
use crate::error::{ConversionError, IndexingError, IngestError};
use crate::extractor::{DocumentConverter, TextExtractor};
use crate::models::FullTextRecord;
use crate::traits::{FullTextIndex, VectorIndex};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug)]
pub struct IngestionReport {
    pub indexed: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

/// Immediate entries of `folder` eligible for this run: plain files only,
/// symlinks excluded, and when a cursor is supplied, modified strictly after
/// it.
pub fn eligible_files(folder: &Path, previous_run: Option<i64>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if entry.path_is_symlink() || !entry.file_type().is_file() {
            continue;
        }

        if let Some(cursor) = previous_run {
            let modified = entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok())
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map(|elapsed| elapsed.as_secs() as i64);

            if !modified.is_some_and(|ts| ts > cursor) {
                continue;
            }
        }

        files.push(entry.path().to_path_buf());
    }

    files.sort_unstable();
    files
}

/// Drives convert -> index full text -> index embeddings for every eligible
/// file under `target`. A conversion failure skips that file and the batch
/// continues; an indexing failure ends the run.
pub async fn process_target<X, E, F, V>(
    converter: &DocumentConverter<X>,
    embedder: &E,
    fulltext: &F,
    vectors: &V,
    target: &Path,
    previous_run: Option<i64>,
) -> Result<IngestionReport, IngestError>
where
    X: TextExtractor + Send + Sync,
    E: Embedder + Send + Sync,
    F: FullTextIndex + Send + Sync,
    V: VectorIndex + Send + Sync,
{
    let files = if target.is_dir() {
        eligible_files(target, previous_run)
    } else if target.is_file() {
        vec![target.to_path_buf()]
    } else {
        return Err(IngestError::InvalidTarget(target.display().to_string()));
    };

    let mut report = IngestionReport {
        indexed: Vec::new(),
        skipped: Vec::new(),
    };

    for path in files {
        match process_file(converter, embedder, fulltext, vectors, &path).await {
            Ok(()) => report.indexed.push(path),
            Err(FileError::Conversion(error)) => {
                report.skipped.push(SkippedFile {
                    path,
                    reason: error.to_string(),
                });
            }
            Err(FileError::Indexing(error)) => return Err(error.into()),
        }
    }

    Ok(report)
}

enum FileError {
    Conversion(ConversionError),
    Indexing(IndexingError),
}

async fn process_file<X, E, F, V>(
    converter: &DocumentConverter<X>,
    embedder: &E,
    fulltext: &F,
    vectors: &V,
    path: &Path,
) -> Result<(), FileError>
where
    X: TextExtractor + Send + Sync,
    E: Embedder + Send + Sync,
    F: FullTextIndex + Send + Sync,
    V: VectorIndex + Send + Sync,
{
    let document = converter.convert(path).map_err(FileError::Conversion)?;
    debug!(path = %path.display(), hash = %document.content_hash, "converted document");

    fulltext
        .index_document(&FullTextRecord::from_document(&document))
        .await
        .map_err(FileError::Indexing)?;

    let records = embed_chunks(embedder, &document, converter.chunk(&document));
    vectors
        .index_chunks(&records)
        .await
        .map_err(FileError::Indexing)?;

    info!(path = %path.display(), chunks = records.len(), "indexed document");
    Ok(())
}
