use crate::error::{IndexingError, QueryError};
use crate::models::{FullTextRecord, StoreDoc};
use crate::traits::FullTextIndex;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const BACKEND: &str = "Solr";

/// Hard ceiling on the select call; writes use the configured store timeout.
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SolrStore {
    client: Client,
    endpoint: String,
    index_name: String,
}

impl SolrStore {
    pub fn new(
        endpoint: &str,
        index_name: impl Into<String>,
        verify_tls: bool,
        timeout: Duration,
    ) -> Result<Self, IndexingError> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!verify_tls)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.as_str().trim_end_matches('/').to_string(),
            index_name: index_name.into(),
        })
    }

    fn update_url(&self) -> String {
        format!("{}/{}/update/json/docs", self.endpoint, self.index_name)
    }

    fn select_url(&self) -> String {
        format!("{}/{}/select", self.endpoint, self.index_name)
    }
}

#[async_trait]
impl FullTextIndex for SolrStore {
    async fn index_document(&self, record: &FullTextRecord) -> Result<(), IndexingError> {
        let response = self
            .client
            .post(self.update_url())
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IndexingError::Backend {
                backend: BACKEND.to_string(),
                status: response.status(),
            });
        }

        debug!(id = %record.id, path = %record.docpath, "indexed full text");
        Ok(())
    }

    async fn query(&self, query: &str) -> Result<Vec<StoreDoc>, QueryError> {
        let response = self
            .client
            .get(self.select_url())
            .query(&[
                ("q", query),
                ("df", "doctext"),
                ("fl", "doctext,docpath,docts"),
            ])
            .timeout(QUERY_TIMEOUT)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status {
                backend: BACKEND.to_string(),
                status,
            });
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(_) => {
                return Err(QueryError::UnexpectedFormat {
                    backend: BACKEND.to_string(),
                })
            }
        };

        parse_select_response(&body)
    }
}

fn transport(source: reqwest::Error) -> QueryError {
    QueryError::Transport {
        backend: BACKEND.to_string(),
        details: source.to_string(),
    }
}

/// Flattens the loosely-shaped select response into fixed records. Fields
/// arrive sometimes as scalars and sometimes as single-element or fragment
/// lists; nothing downstream branches on the raw shape.
pub(crate) fn parse_select_response(body: &Value) -> Result<Vec<StoreDoc>, QueryError> {
    let docs = body
        .pointer("/response/docs")
        .and_then(Value::as_array)
        .ok_or_else(|| QueryError::UnexpectedFormat {
            backend: BACKEND.to_string(),
        })?;

    Ok(docs.iter().map(normalize_doc).collect())
}

fn normalize_doc(doc: &Value) -> StoreDoc {
    StoreDoc {
        doctext: joined_text(&doc["doctext"]),
        docpath: first_string(&doc["docpath"]),
        docts: first_number(&doc["docts"]),
    }
}

fn joined_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

fn first_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn first_number(value: &Value) -> i64 {
    let number = match value {
        Value::Array(parts) => parts.first().and_then(Value::as_f64),
        other => other.as_f64(),
    };
    number.unwrap_or(0.0) as i64
}

#[cfg(test)]
mod tests {
    use super::parse_select_response;
    use crate::error::QueryError;
    use serde_json::json;

    #[test]
    fn list_wrapped_fields_are_flattened() {
        let body = json!({
            "response": {
                "docs": [{
                    "doctext": ["pump manual ", "section two"],
                    "docpath": ["/docs/pump.pdf"],
                    "docts": [1700000000.25]
                }]
            }
        });

        let docs = parse_select_response(&body).expect("valid shape");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].doctext, "pump manual  section two");
        assert_eq!(docs[0].docpath, "/docs/pump.pdf");
        assert_eq!(docs[0].docts, 1_700_000_000);
    }

    #[test]
    fn scalar_fields_pass_through() {
        let body = json!({
            "response": {
                "docs": [{
                    "doctext": "pump manual",
                    "docpath": "/docs/pump.pdf",
                    "docts": 1700000000
                }]
            }
        });

        let docs = parse_select_response(&body).expect("valid shape");
        assert_eq!(docs[0].doctext, "pump manual");
        assert_eq!(docs[0].docts, 1_700_000_000);
    }

    #[test]
    fn missing_docs_shape_is_classified_not_a_crash() {
        let body = json!({"responseHeader": {"status": 0}});
        let error = parse_select_response(&body).expect_err("shape is wrong");
        assert!(matches!(error, QueryError::UnexpectedFormat { .. }));
    }

    #[test]
    fn empty_docs_list_is_a_valid_empty_result() {
        let body = json!({"response": {"docs": []}});
        let docs = parse_select_response(&body).expect("valid shape");
        assert!(docs.is_empty());
    }

    #[test]
    fn malformed_doc_entries_default_instead_of_failing() {
        let body = json!({"response": {"docs": [{}]}});
        let docs = parse_select_response(&body).expect("valid shape");
        assert_eq!(docs[0].doctext, "");
        assert_eq!(docs[0].docts, 0);
    }
}
