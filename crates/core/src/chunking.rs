use std::str::SplitWhitespace;

pub const DEFAULT_MAX_CHUNK_TOKENS: usize = 512;

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    /// Upper bound on whitespace-delimited tokens per chunk.
    pub max_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_CHUNK_TOKENS,
        }
    }
}

/// Collapses runs of whitespace to single spaces and drops control characters
/// that would corrupt the JSON payloads sent to the stores.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lazily splits `text` into chunks of at most `max_tokens` whitespace
/// tokens. The iterator is single-pass and finite; the embedder is its only
/// consumer.
pub fn chunk_text(text: &str, config: ChunkingConfig) -> Chunks<'_> {
    Chunks {
        tokens: text.split_whitespace(),
        max_tokens: config.max_tokens.max(1),
    }
}

#[derive(Debug)]
pub struct Chunks<'a> {
    tokens: SplitWhitespace<'a>,
    max_tokens: usize,
}

impl Iterator for Chunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut chunk = String::new();
        let mut count = 0;

        while count < self.max_tokens {
            match self.tokens.next() {
                Some(token) => {
                    if !chunk.is_empty() {
                        chunk.push(' ');
                    }
                    chunk.push_str(token);
                    count += 1;
                }
                None => break,
            }
        }

        if chunk.is_empty() {
            None
        } else {
            Some(chunk)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{chunk_text, sanitize_text, ChunkingConfig};

    #[test]
    fn whitespace_is_collapsed() {
        let input = "A  \t  lot\nof   spacing";
        assert_eq!(sanitize_text(input), "A lot of spacing");
    }

    #[test]
    fn control_characters_are_dropped() {
        let input = "safe\u{0}text\u{7}here";
        assert_eq!(sanitize_text(input), "safe text here");
    }

    #[test]
    fn chunks_respect_the_token_budget() {
        let text = "one two three four five six seven";
        let config = ChunkingConfig { max_tokens: 3 };

        let chunks: Vec<String> = chunk_text(text, config).collect();
        assert_eq!(chunks, vec!["one two three", "four five six", "seven"]);
    }

    #[test]
    fn short_text_yields_a_single_chunk() {
        let chunks: Vec<String> = chunk_text("just two", ChunkingConfig::default()).collect();
        assert_eq!(chunks, vec!["just two"]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let mut chunks = chunk_text("   ", ChunkingConfig::default());
        assert!(chunks.next().is_none());
    }
}
