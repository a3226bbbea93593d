//! On-disk collection searched in memory

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::embeddings::cosine_similarity;
use crate::embeddings::Embedder;
use crate::errors::AskRagError;
use crate::errors::Result;
use crate::models::Document;
use crate::vector_store::VectorStore;

/// File layout of `<dir>/<collection>.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionFile {
    #[serde(default)]
    pub embedding_model: Option<String>,
    #[serde(default)]
    pub records: Vec<StoredRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: std::collections::HashMap<String, serde_json::Value>,
    pub embedding: Vec<f32>,
}

/// A persisted collection held in memory. Opened read-only.
pub struct LocalCollection {
    source: PathBuf,
    records: Vec<StoredRecord>,
    embedder: Arc<dyn Embedder>,
}

impl LocalCollection {
    /// Load `<dir>/<collection>.json`
    ///
    /// # Errors
    /// - `dir` does not exist or is not a directory
    /// - The collection file exists but cannot be read or parsed
    pub async fn open(dir: &Path, collection: &str, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let metadata = tokio::fs::metadata(dir).await.map_err(|e| {
            AskRagError::VectorStore(format!(
                "vector store directory {} unavailable: {e}",
                dir.display()
            ))
        })?;
        if !metadata.is_dir() {
            return Err(AskRagError::VectorStore(format!(
                "vector store path {} is not a directory",
                dir.display()
            )));
        }

        let source = dir.join(format!("{collection}.json"));
        let file = match tokio::fs::read(&source).await {
            Ok(bytes) => serde_json::from_slice::<CollectionFile>(&bytes).map_err(|e| {
                AskRagError::VectorStore(format!("corrupt collection {}: {e}", source.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Collection {} not found, serving an empty store",
                    source.display()
                );
                CollectionFile::default()
            }
            Err(e) => {
                return Err(AskRagError::VectorStore(format!(
                    "failed to read {}: {e}",
                    source.display()
                )))
            }
        };

        if let Some(model) = &file.embedding_model {
            if model != embedder.model() {
                warn!(
                    "Collection {} was built with embedding model {model}, queries use {}",
                    source.display(),
                    embedder.model()
                );
            }
        }

        info!(
            "Loaded collection {} with {} documents",
            source.display(),
            file.records.len()
        );

        Ok(Self {
            source,
            records: file.records,
            embedder,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl VectorStore for LocalCollection {
    #[tracing::instrument(name = "vector_store.search", skip_all, fields(k = k, backend = "local"))]
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        if self.records.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;

        let mut scored = Vec::with_capacity(self.records.len());
        for record in &self.records {
            if record.embedding.len() != query_embedding.len() {
                return Err(AskRagError::VectorStore(format!(
                    "record {} in {} has dimension {}, query has {}",
                    record.id,
                    self.source.display(),
                    record.embedding.len(),
                    query_embedding.len()
                )));
            }
            scored.push((cosine_similarity(&record.embedding, &query_embedding), record));
        }

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(k);
        debug!("Local search returned {} documents", scored.len());

        Ok(scored
            .into_iter()
            .map(|(score, record)| Document {
                id: record.id.clone(),
                content: record.content.clone(),
                metadata: record.metadata.clone(),
                score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;

    /// Embeds by keyword presence so similarity is predictable
    struct KeywordEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = text.to_lowercase();
            Ok(vec![
                f32::from(u8::from(text.contains("france"))),
                f32::from(u8::from(text.contains("rust"))),
                1.0,
            ])
        }

        fn model(&self) -> &str {
            "keyword"
        }
    }

    fn embedder() -> Arc<KeywordEmbedder> {
        Arc::new(KeywordEmbedder {
            calls: AtomicUsize::new(0),
        })
    }

    fn record(id: &str, content: &str, embedding: Vec<f32>) -> StoredRecord {
        StoredRecord {
            id: id.to_string(),
            content: content.to_string(),
            metadata: Default::default(),
            embedding,
        }
    }

    fn write_collection(dir: &Path, file: &CollectionFile) {
        std::fs::write(
            dir.join("langchain.json"),
            serde_json::to_vec(file).unwrap(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let result =
            LocalCollection::open(Path::new("/no/such/embeddings"), "langchain", embedder()).await;
        assert!(matches!(result, Err(AskRagError::VectorStore(_))));
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = embedder();
        let store = LocalCollection::open(dir.path(), "langchain", embedder.clone())
            .await
            .unwrap();

        assert!(store.is_empty());
        let docs = store.similarity_search("anything", 4).await.unwrap();
        assert!(docs.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_results_ordered_and_bounded() {
        let dir = tempfile::tempdir().unwrap();
        write_collection(
            dir.path(),
            &CollectionFile {
                embedding_model: Some("keyword".to_string()),
                records: vec![
                    record("rust", "Rust has ownership.", vec![0.0, 1.0, 1.0]),
                    record("paris", "Paris is the capital of France.", vec![1.0, 0.0, 1.0]),
                    record("misc", "Bread is baked.", vec![0.0, 0.0, 1.0]),
                ],
            },
        );
        let store = LocalCollection::open(dir.path(), "langchain", embedder())
            .await
            .unwrap();

        let docs = store
            .similarity_search("What is the capital of France?", 2)
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "paris");
        assert!(docs[0].score >= docs[1].score);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write_collection(
            dir.path(),
            &CollectionFile {
                embedding_model: None,
                records: vec![record("short", "x", vec![1.0])],
            },
        );
        let store = LocalCollection::open(dir.path(), "langchain", embedder())
            .await
            .unwrap();

        let err = store.similarity_search("france", 4).await.unwrap_err();
        assert_eq!(err.code(), "vector_store_error");
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("langchain.json"), b"{not json").unwrap();

        let result = LocalCollection::open(dir.path(), "langchain", embedder()).await;
        assert!(matches!(result, Err(AskRagError::VectorStore(_))));
    }
}
