//! Shared fakes for driving the service without real backends

#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use askrag::api::api_routes;
use askrag::api::AppState;
use askrag::config::SessionConfig;
use askrag::errors::AskRagError;
use askrag::llm::ChatModel;
use askrag::models::Document;
use askrag::models::Message;
use askrag::models::Role;
use askrag::rag::QuestionService;
use askrag::rag::SessionStore;
use askrag::vector_store::VectorStore;
use askrag::Result;
use async_trait::async_trait;
use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::Router;

/// Vector store returning fixed documents
#[derive(Default)]
pub struct StaticStore {
    pub documents: Vec<Document>,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
    pub fail: bool,
}

impl StaticStore {
    pub fn with_documents(contents: &[&str]) -> Self {
        Self {
            documents: contents
                .iter()
                .enumerate()
                .map(|(i, c)| Document::new(i.to_string(), *c))
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl VectorStore for StaticStore {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(AskRagError::VectorStore("collection unavailable".to_string()));
        }
        Ok(self.documents.iter().take(k).cloned().collect())
    }
}

/// Chat model that answers from the context it was given and records every prompt
#[derive(Default)]
pub struct ContextModel {
    pub prompts: Mutex<Vec<Vec<Message>>>,
    pub delay: Option<Duration>,
    pub fail: bool,
}

impl ContextModel {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Vec<Message> {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for ContextModel {
    async fn invoke(&self, messages: &[Message]) -> Result<Message> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(AskRagError::Llm("connection refused".to_string()));
        }

        let context = messages
            .iter()
            .rev()
            .find(|m| m.role() == Role::System)
            .map(Message::content)
            .unwrap_or_default();
        let question = messages
            .iter()
            .rev()
            .find(|m| m.role() == Role::Human)
            .map(Message::content)
            .unwrap_or_default();

        if context.contains("Paris") {
            Ok(Message::assistant("The capital of France is Paris."))
        } else {
            Ok(Message::assistant(format!("answer to: {question}")))
        }
    }
}

pub fn service(
    store: Arc<dyn VectorStore>,
    model: Arc<dyn ChatModel>,
    max_history: Option<usize>,
) -> QuestionService {
    QuestionService::from_parts(store, model, Arc::new(SessionStore::new(max_history)), 4)
}

pub fn router(service: QuestionService) -> Router {
    let state = AppState::new(service, &SessionConfig::default()).unwrap();
    api_routes(state)
}

pub fn ask_request(body: &str) -> Request<Body> {
    Request::post("/askquestion")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
