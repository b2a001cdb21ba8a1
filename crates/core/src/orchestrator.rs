use crate::error::QueryError;
use crate::models::{SearchHit, SearchOutcome};
use crate::snippet::{filter_query_terms, format_hit};
use crate::traits::{FullTextIndex, TextGenerator};
use pulldown_cmark::{html, Parser};
use tracing::{info, warn};

pub const EMPTY_QUERY_ERROR: &str = "Enter valid search terms";

/// The query entry point: sanitizes input, asks the full-text store,
/// formats snippets, and decides whether to ask for a summary.
pub struct SearchDispatcher<F, G> {
    fulltext: F,
    generator: G,
}

impl<F, G> SearchDispatcher<F, G>
where
    F: FullTextIndex + Send + Sync,
    G: TextGenerator + Send + Sync,
{
    pub fn new(fulltext: F, generator: G) -> Self {
        Self {
            fulltext,
            generator,
        }
    }

    pub async fn search(&self, raw_input: &str) -> SearchOutcome {
        let input = raw_input.trim();
        if input.is_empty() {
            return SearchOutcome {
                error: Some(EMPTY_QUERY_ERROR.to_string()),
                ..Default::default()
            };
        }

        // Decided on the trimmed input, before whitespace collapsing.
        let is_question = input.ends_with('?');
        let query = input.split_whitespace().collect::<Vec<_>>().join(" ");

        let docs = match self.fulltext.query(&query).await {
            Ok(docs) => docs,
            Err(error) => {
                warn!(%error, "full-text query failed");
                return SearchOutcome {
                    error: Some(user_message(&error)),
                    ..Default::default()
                };
            }
        };

        if docs.is_empty() {
            return SearchOutcome {
                description: Some("No document found".to_string()),
                ..Default::default()
            };
        }

        let terms = filter_query_terms(&query);
        let hits: Vec<SearchHit> = docs.iter().map(|doc| format_hit(doc, &terms)).collect();
        let description = format!("Documents found: {}", hits.len());
        info!(count = hits.len(), "query matched documents");

        let summary = if is_question {
            summarize(&self.generator, &query, &hits).await
        } else {
            None
        };

        SearchOutcome {
            hits,
            summary,
            description: Some(description),
            error: None,
        }
    }
}

fn user_message(error: &QueryError) -> String {
    match error {
        QueryError::Transport { backend, .. } => format!("Unable to query {backend}."),
        QueryError::Status { backend, status } => {
            format!("{backend} Error: {}", status.as_u16())
        }
        QueryError::UnexpectedFormat { backend } => {
            format!("{backend} returned an unexpected format.")
        }
    }
}

/// Summarizes the matched snippets through the generation service. Always a
/// soft failure: errors are logged and the summary is simply omitted.
pub async fn summarize<G>(generator: &G, query: &str, hits: &[SearchHit]) -> Option<String>
where
    G: TextGenerator + Send + Sync,
{
    if hits.is_empty() {
        return None;
    }

    let context = hits
        .iter()
        .map(|hit| hit.snippet.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let prompt = format!("Summarize: {query}. Context: {context}");

    match generator.generate(&prompt).await {
        Ok(text) => Some(render_markdown(&text)),
        Err(error) => {
            warn!(%error, "summary generation failed");
            None
        }
    }
}

fn render_markdown(text: &str) -> String {
    let mut rendered = String::new();
    html::push_html(&mut rendered, Parser::new(text));
    rendered
}

#[cfg(test)]
mod tests {
    use super::{SearchDispatcher, EMPTY_QUERY_ERROR};
    use crate::error::{QueryError, SummarizationError};
    use crate::models::StoreDoc;
    use crate::traits::{FullTextIndex, TextGenerator};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum CannedResponse {
        Docs(Vec<StoreDoc>),
        Transport,
        Status(StatusCode),
        BadFormat,
    }

    struct FakeFullText {
        response: CannedResponse,
        calls: AtomicUsize,
    }

    impl FakeFullText {
        fn new(response: CannedResponse) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FullTextIndex for FakeFullText {
        async fn index_document(
            &self,
            _record: &crate::models::FullTextRecord,
        ) -> Result<(), crate::error::IndexingError> {
            Ok(())
        }

        async fn query(&self, _query: &str) -> Result<Vec<StoreDoc>, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                CannedResponse::Docs(docs) => Ok(docs.clone()),
                CannedResponse::Transport => Err(QueryError::Transport {
                    backend: "Solr".to_string(),
                    details: "connection refused".to_string(),
                }),
                CannedResponse::Status(status) => Err(QueryError::Status {
                    backend: "Solr".to_string(),
                    status: *status,
                }),
                CannedResponse::BadFormat => Err(QueryError::UnexpectedFormat {
                    backend: "Solr".to_string(),
                }),
            }
        }
    }

    struct FakeGenerator {
        reply: Result<&'static str, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        fn answering(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompt_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, SummarizationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(SummarizationError::Backend {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                }),
            }
        }
    }

    fn pump_doc() -> StoreDoc {
        StoreDoc {
            doctext: "inspect the pump impeller for wear".to_string(),
            docpath: "/docs/pump.pdf".to_string(),
            docts: 1_700_000_000,
        }
    }

    #[tokio::test]
    async fn blank_input_is_rejected_without_any_network_call() {
        let fulltext = FakeFullText::new(CannedResponse::Docs(vec![pump_doc()]));
        let generator = FakeGenerator::answering("summary");
        let dispatcher = SearchDispatcher::new(fulltext, generator);

        let outcome = dispatcher.search("   \t ").await;
        assert_eq!(outcome.error.as_deref(), Some(EMPTY_QUERY_ERROR));
        assert!(outcome.hits.is_empty());
        assert_eq!(dispatcher.fulltext.call_count(), 0);
        assert_eq!(dispatcher.generator.prompt_count(), 0);
    }

    #[tokio::test]
    async fn zero_documents_yield_a_description_not_an_error() {
        let fulltext = FakeFullText::new(CannedResponse::Docs(Vec::new()));
        let generator = FakeGenerator::answering("summary");
        let dispatcher = SearchDispatcher::new(fulltext, generator);

        let outcome = dispatcher.search("pump?").await;
        assert_eq!(outcome.description.as_deref(), Some("No document found"));
        assert!(outcome.error.is_none());
        assert!(outcome.hits.is_empty());
        // A question with no hits never reaches the generation service.
        assert_eq!(dispatcher.generator.prompt_count(), 0);
    }

    #[tokio::test]
    async fn matched_documents_become_highlighted_hits() {
        let fulltext = FakeFullText::new(CannedResponse::Docs(vec![pump_doc(), pump_doc()]));
        let generator = FakeGenerator::answering("summary");
        let dispatcher = SearchDispatcher::new(fulltext, generator);

        let outcome = dispatcher.search("pump impeller").await;
        assert_eq!(outcome.description.as_deref(), Some("Documents found: 2"));
        assert_eq!(outcome.hits.len(), 2);
        assert!(outcome.hits[0]
            .snippet
            .contains("<span class=\"srchterm\">pump</span>"));
        assert!(outcome.summary.is_none());
    }

    #[tokio::test]
    async fn a_question_with_hits_gets_a_rendered_summary() {
        let fulltext = FakeFullText::new(CannedResponse::Docs(vec![pump_doc()]));
        let generator = FakeGenerator::answering("**worn impellers**");
        let dispatcher = SearchDispatcher::new(fulltext, generator);

        let outcome = dispatcher.search("what wears the pump?").await;
        let summary = outcome.summary.expect("summary expected");
        assert!(summary.contains("<strong>worn impellers</strong>"));

        let prompts = dispatcher.generator.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("Summarize: what wears the pump?. Context: "));
    }

    #[tokio::test]
    async fn a_statement_never_triggers_the_generator() {
        let fulltext = FakeFullText::new(CannedResponse::Docs(vec![pump_doc()]));
        let generator = FakeGenerator::answering("summary");
        let dispatcher = SearchDispatcher::new(fulltext, generator);

        let outcome = dispatcher.search("show me the pump").await;
        assert!(outcome.summary.is_none());
        assert_eq!(dispatcher.generator.prompt_count(), 0);
    }

    #[tokio::test]
    async fn a_failed_summary_is_silently_omitted() {
        let fulltext = FakeFullText::new(CannedResponse::Docs(vec![pump_doc()]));
        let generator = FakeGenerator::failing();
        let dispatcher = SearchDispatcher::new(fulltext, generator);

        let outcome = dispatcher.search("what wears the pump?").await;
        assert!(outcome.summary.is_none());
        assert!(outcome.error.is_none());
        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(dispatcher.generator.prompt_count(), 1);
    }

    #[tokio::test]
    async fn transport_failures_map_to_the_unreachable_message() {
        let fulltext = FakeFullText::new(CannedResponse::Transport);
        let generator = FakeGenerator::answering("summary");
        let dispatcher = SearchDispatcher::new(fulltext, generator);

        let outcome = dispatcher.search("pump").await;
        assert_eq!(outcome.error.as_deref(), Some("Unable to query Solr."));
        assert!(outcome.description.is_none());
    }

    #[tokio::test]
    async fn status_failures_carry_the_code() {
        let fulltext = FakeFullText::new(CannedResponse::Status(StatusCode::SERVICE_UNAVAILABLE));
        let generator = FakeGenerator::answering("summary");
        let dispatcher = SearchDispatcher::new(fulltext, generator);

        let outcome = dispatcher.search("pump").await;
        assert_eq!(outcome.error.as_deref(), Some("Solr Error: 503"));
    }

    #[tokio::test]
    async fn malformed_responses_map_to_the_format_message() {
        let fulltext = FakeFullText::new(CannedResponse::BadFormat);
        let generator = FakeGenerator::answering("summary");
        let dispatcher = SearchDispatcher::new(fulltext, generator);

        let outcome = dispatcher.search("pump").await;
        assert_eq!(
            outcome.error.as_deref(),
            Some("Solr returned an unexpected format.")
        );
    }
}
