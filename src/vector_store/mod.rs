//! Read-only document retrieval
//!
//! Two backends are available:
//! - [`LocalCollection`]: a collection persisted as JSON on local disk, loaded
//!   once at startup and searched in memory
//! - [`QdrantStore`]: a remote Qdrant collection searched over HTTP
//!
//! Both embed the query with the same [`Embedder`] that populated the
//! collection. Ingestion happens elsewhere; nothing here writes to a store.

pub mod local;
pub mod qdrant;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

pub use local::LocalCollection;
pub use qdrant::QdrantStore;

use crate::config::VectorBackend;
use crate::config::VectorStoreConfig;
use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::models::Document;

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return at most `k` documents, most similar first. An empty store
    /// yields an empty vector rather than an error.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>>;
}

/// Open the configured backend
pub async fn open_store(
    config: &VectorStoreConfig,
    embedder: Arc<dyn Embedder>,
) -> Result<Arc<dyn VectorStore>> {
    match config.backend {
        VectorBackend::Local => {
            let store =
                LocalCollection::open(Path::new(&config.path), &config.collection, embedder)
                    .await?;
            Ok(Arc::new(store))
        }
        VectorBackend::Qdrant => {
            let store = QdrantStore::new(&config.qdrant_url, &config.collection, embedder)?;
            Ok(Arc::new(store))
        }
    }
}
