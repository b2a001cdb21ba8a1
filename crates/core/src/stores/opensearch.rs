use crate::error::IndexingError;
use crate::models::VectorRecord;
use crate::traits::VectorIndex;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

const BACKEND: &str = "OpenSearch";

pub struct OpenSearchStore {
    client: Client,
    endpoint: String,
    index_name: String,
}

impl OpenSearchStore {
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

    fn bulk_url(&self) -> String {
        format!("{}/{}/_bulk", self.endpoint, self.index_name)
    }
}

/// One action-header line plus one record line per entry, newline terminated.
pub(crate) fn bulk_payload(
    index_name: &str,
    records: &[VectorRecord],
) -> Result<String, serde_json::Error> {
    let mut lines = Vec::with_capacity(records.len() * 2);

    for record in records {
        lines.push(serde_json::to_string(&json!({
            "index": {"_index": index_name, "_id": record.id}
        }))?);
        lines.push(serde_json::to_string(record)?);
    }

    Ok(lines.join("\n") + "\n")
}

#[async_trait]
impl VectorIndex for OpenSearchStore {
    async fn index_chunks(&self, records: &[VectorRecord]) -> Result<(), IndexingError> {
        if records.is_empty() {
            return Ok(());
        }

        let payload = bulk_payload(&self.index_name, records)?;
        let response = self
            .client
            .post(self.bulk_url())
            .header("Content-Type", "application/x-ndjson")
            .body(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IndexingError::Backend {
                backend: BACKEND.to_string(),
                status: response.status(),
            });
        }

        debug!(count = records.len(), "indexed chunk embeddings");
        Ok(())
    }
}
