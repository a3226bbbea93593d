//! API request handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::Json;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::api::types::ApiError;
use crate::api::types::AskQuestionRequest;
use crate::config::SessionConfig;
use crate::errors::AskRagError;
use crate::models::SessionId;
use crate::rag::QuestionService;
use crate::Result;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: QuestionService,
    pub session_header: HeaderName,
    pub default_session: SessionId,
}

impl AppState {
    pub fn new(service: QuestionService, session: &SessionConfig) -> Result<Self> {
        let session_header = HeaderName::from_bytes(session.header.as_bytes()).map_err(|e| {
            AskRagError::Config(format!("invalid session header {:?}: {e}", session.header))
        })?;

        Ok(Self {
            service,
            session_header,
            default_session: SessionId::new(session.default_session_id.clone()),
        })
    }

    /// Session key for a request: body field, then header, then the default
    fn resolve_session(&self, body: Option<&str>, headers: &HeaderMap) -> SessionId {
        body.map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                headers
                    .get(&self.session_header)
                    .and_then(|v| v.to_str().ok())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
            .map_or_else(|| self.default_session.clone(), SessionId::from)
    }
}

/// Answer a question (POST /askquestion)
#[tracing::instrument(name = "http.askquestion", skip_all)]
pub async fn ask_question(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<AskQuestionRequest>, JsonRejection>,
) -> std::result::Result<String, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Rejected /askquestion body: {}", rejection.body_text());
        ApiError::bad_request(rejection.body_text())
    })?;

    // Blank check only; the question is forwarded exactly as sent
    let question = req
        .question
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| {
            warn!("Rejected /askquestion: missing question");
            ApiError::bad_request("field `question` is required")
        })?;

    let session = state.resolve_session(req.session_id.as_deref(), &headers);
    info!("POST /askquestion (session {}): {}", session, question.trim());

    state.service.ask(&session, question).await.map_err(|e| {
        error!("Error answering question: {}", e);
        ApiError::from(e)
    })
}
