//! Qdrant collection searched over HTTP

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;
use tracing::debug;

use crate::embeddings::Embedder;
use crate::errors::AskRagError;
use crate::errors::Result;
use crate::models::Document;
use crate::vector_store::VectorStore;

/// Payload keys holding the document text, in lookup order
const CONTENT_KEYS: [&str; 3] = ["page_content", "content", "text"];

#[derive(Clone)]
pub struct QdrantStore {
    client: Client,
    base_url: String,
    collection: String,
    embedder: Arc<dyn Embedder>,
}

impl QdrantStore {
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AskRagError::VectorStore(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            embedder,
        })
    }

    async fn search_vector(&self, vector: &[f32], limit: usize) -> Result<Vec<Document>> {
        let url = format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        );

        let body = json!({
            "vector": vector,
            "limit": limit,
            "with_payload": true,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AskRagError::VectorStore(format!("failed to contact qdrant: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AskRagError::VectorStore(format!(
                "qdrant search returned {status}: {error_text}"
            )));
        }

        let response = response
            .json::<QdrantSearchResponse>()
            .await
            .map_err(|e| {
                AskRagError::VectorStore(format!("failed to decode qdrant search response: {e}"))
            })?;

        Ok(response
            .result
            .into_iter()
            .filter_map(QdrantResultPoint::into_document)
            .collect())
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    #[tracing::instrument(name = "vector_store.search", skip_all, fields(k = k, backend = "qdrant"))]
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let vector = self.embedder.embed(query).await?;
        let docs = self.search_vector(&vector, k).await?;
        debug!("Qdrant search returned {} documents", docs.len());
        Ok(docs)
    }
}

#[derive(Debug, Deserialize)]
struct QdrantSearchResponse {
    result: Vec<QdrantResultPoint>,
}

#[derive(Debug, Deserialize)]
struct QdrantResultPoint {
    id: Value,
    score: f32,
    #[serde(default)]
    payload: Option<HashMap<String, Value>>,
}

impl QdrantResultPoint {
    /// Points without a text payload cannot serve as context and are dropped
    fn into_document(self) -> Option<Document> {
        let mut payload = self.payload?;
        let content = CONTENT_KEYS
            .iter()
            .find_map(|key| payload.remove(*key))
            .and_then(|v| v.as_str().map(str::to_string))?;

        let id = match self.id {
            Value::String(s) => s,
            other => other.to_string(),
        };

        let metadata = match payload.remove("metadata") {
            Some(Value::Object(map)) => map.into_iter().collect(),
            _ => payload,
        };

        Some(Document {
            id,
            content,
            metadata,
            score: self.score,
        })
    }
}
