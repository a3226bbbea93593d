//! Complete question pipeline: Retrieve -> Build messages -> Generate with history

use std::sync::Arc;

use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::embeddings::EmbeddingClient;
use crate::errors::AskRagError;
use crate::errors::Result;
use crate::llm::ChatClient;
use crate::llm::ChatModel;
use crate::models::SessionId;
use crate::rag::build_turn_messages;
use crate::rag::HistoryChat;
use crate::rag::SessionStore;
use crate::vector_store::open_store;
use crate::vector_store::VectorStore;

/// Answers questions from retrieved context, remembering each session's turns
#[derive(Clone)]
pub struct QuestionService {
    store: Arc<dyn VectorStore>,
    chat: HistoryChat,
    top_k: usize,
}

impl QuestionService {
    /// Build the service and its backend clients from configuration
    ///
    /// # Errors
    /// - HTTP client build errors
    /// - Vector store unavailable (missing directory, corrupt collection)
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let embedder = Arc::new(EmbeddingClient::from_config(&config.embeddings)?);
        let store = open_store(&config.vector_store, embedder).await?;
        let model = Arc::new(ChatClient::from_config(&config.llm)?);
        let sessions = Arc::new(SessionStore::new(config.session.max_history_messages));

        info!(
            "Question service ready: chat model {}, embeddings {}, top_k {}",
            config.llm.model,
            config.embeddings.model,
            config.top_k()
        );

        Ok(Self::from_parts(store, model, sessions, config.top_k()))
    }

    /// Assemble from existing components
    #[must_use]
    pub fn from_parts(
        store: Arc<dyn VectorStore>,
        model: Arc<dyn ChatModel>,
        sessions: Arc<SessionStore>,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            chat: HistoryChat::new(model, sessions),
            top_k,
        }
    }

    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionStore> {
        self.chat.store()
    }

    /// Answer `question` within `session`
    ///
    /// # Errors
    /// - Blank question (`InvalidRequest`), checked before any backend call
    /// - Retrieval errors (embedding backend, vector store)
    /// - Chat backend errors; the session history is left untouched
    #[tracing::instrument(name = "rag.ask", skip_all, fields(session = %session))]
    pub async fn ask(&self, session: &SessionId, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(AskRagError::InvalidRequest(
                "question must not be empty".to_string(),
            ));
        }

        debug!("Step 1: Retrieving documents");
        let documents = self.store.similarity_search(question, self.top_k).await?;
        debug!("Retrieved {} documents", documents.len());

        debug!("Step 2: Generating answer");
        let messages = build_turn_messages(&documents, question);
        let reply = self.chat.invoke(session, messages).await?;

        info!("Question answered for session {}", session);
        Ok(reply.into_content())
    }
}
