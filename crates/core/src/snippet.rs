use crate::models::{SearchHit, StoreDoc};
use chrono::{Local, TimeZone};

const WINDOW_RADIUS: usize = 5;
const MAX_WINDOWS: usize = 10;
const FALLBACK_CHARS: usize = 500;
const WINDOW_SEPARATOR: &str = "&emsp;";
const ELLIPSIS: &str = "...";

/// Punctuation stripped from document text before tokenizing.
const DOC_PUNCTUATION: [char; 3] = ['?', ',', '.'];

/// Punctuation stripped from the query before the term set is built.
const QUERY_PUNCTUATION: [char; 4] = ['?', ',', '.', '"'];

/// `AND`, `OR` and `NOT` carry operator meaning in the full-text store's
/// query syntax and never count as terms.
fn is_boolean_operator(token: &str) -> bool {
    matches!(token, "AND" | "OR" | "NOT")
}

/// The filtered term set used for matching and highlighting: operator tokens
/// dropped, punctuation stripped, case folded, fuzzy suffix (`~...`)
/// truncated.
pub fn filter_query_terms(query: &str) -> Vec<String> {
    let without_operators = query
        .split_whitespace()
        .filter(|token| !is_boolean_operator(token))
        .collect::<Vec<_>>()
        .join(" ");

    let stripped: String = without_operators
        .chars()
        .filter(|ch| !QUERY_PUNCTUATION.contains(ch))
        .collect();

    let lowered = stripped.to_lowercase();
    let before_fuzzy = lowered.split('~').next().unwrap_or_default();

    before_fuzzy.split_whitespace().map(str::to_string).collect()
}

fn doc_tokens(text: &str) -> Vec<String> {
    text.chars()
        .filter(|ch| !DOC_PUNCTUATION.contains(ch))
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Builds the preview text: a five-token-radius window around each matched
/// term position in document order, at most ten windows, falling back to the
/// first 500 characters when nothing matches.
pub fn build_snippet(doc_text: &str, terms: &[String]) -> String {
    let tokens = doc_tokens(doc_text);
    let positions: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| terms.contains(&token.to_lowercase()))
        .map(|(position, _)| position)
        .collect();

    if positions.is_empty() {
        return doc_text.chars().take(FALLBACK_CHARS).collect();
    }

    let last = tokens.len() - 1;
    let mut windows = Vec::new();
    for &position in positions.iter().take(MAX_WINDOWS) {
        let left = position.saturating_sub(WINDOW_RADIUS);
        let right = (position + WINDOW_RADIUS).min(last);
        windows.push(tokens[left..=right].join(" "));
    }

    let separator = format!(" {WINDOW_SEPARATOR} ");
    let mut snippet = windows.join(separator.as_str());
    if positions.len() > MAX_WINDOWS {
        snippet.push(' ');
        snippet.push_str(ELLIPSIS);
    }

    snippet
}

/// Wraps tokens matching a filtered term in the highlight marker. Matching
/// folds case and ignores a leading `+` or `-` on the token.
pub fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    snippet
        .split_whitespace()
        .map(|token| {
            let folded = token.to_lowercase();
            let bare = folded.trim_start_matches(['+', '-']);
            if terms.iter().any(|term| term == bare) {
                format!("<span class=\"srchterm\">{token}</span>")
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Local rendering of the epoch timestamp stored with the document.
pub fn format_timestamp(epoch_seconds: i64) -> String {
    Local
        .timestamp_opt(epoch_seconds, 0)
        .earliest()
        .map(|stamp| stamp.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

pub fn format_hit(doc: &StoreDoc, terms: &[String]) -> SearchHit {
    let snippet = highlight_terms(&build_snippet(&doc.doctext, terms), terms);

    SearchHit {
        docpath: doc.docpath.clone(),
        modified: format_timestamp(doc.docts),
        snippet,
    }
}
