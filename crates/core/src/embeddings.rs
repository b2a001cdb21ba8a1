use crate::models::{ConvertedDocument, VectorRecord};

const DEFAULT: usize = 128;

pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = DEFAULT;

/// Chunks with this many whitespace tokens or fewer are never embedded.
pub const MIN_CHUNK_TOKENS: usize = 5;

/// Opaque scoring service: chunk text in, vector out. Must be a pure function
/// of the text so re-ingestion of unchanged chunks is reproducible.
pub trait Embedder {
    fn dimensions(&self) -> usize;
    fn embed(&self, text: &str) -> Vec<f32>;
}

#[derive(Debug, Clone, Copy)]
pub struct CharacterNgramEmbedder {
    pub dimensions: usize,
}

impl Default for CharacterNgramEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }
}

impl Embedder for CharacterNgramEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions.max(1)];
        let lowered = text.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();

        if chars.is_empty() {
            return vector;
        }

        for window in chars.windows(3) {
            let token = window.iter().collect::<String>();
            let mut hash = 1469598103934665603u64;
            for byte in token.bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(1099511628211);
            }
            let bucket = (hash % vector.len() as u64) as usize;
            vector[bucket] += 1.0;
        }

        let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        vector
    }
}

/// Consumes the chunk sequence once and embeds every chunk that clears the
/// token filter. Text is case-folded before embedding and before storage;
/// record ids are `<content_hash><ordinal>` with ordinals counting surviving
/// chunks in order.
pub fn embed_chunks<E, I>(embedder: &E, document: &ConvertedDocument, chunks: I) -> Vec<VectorRecord>
where
    E: Embedder,
    I: IntoIterator<Item = String>,
{
    let mut records = Vec::new();

    for chunk in chunks {
        if chunk.split_whitespace().count() <= MIN_CHUNK_TOKENS {
            continue;
        }

        let lowered = chunk.to_lowercase();
        let chunkvec = embedder.embed(&lowered);

        records.push(VectorRecord {
            id: format!("{}{}", document.content_hash, records.len()),
            chunkvec,
            docchunk: lowered,
            docpath: document.source_path.clone(),
        });
    }

    records
}
