//! Per-session conversation history
//!
//! [`SessionStore`] maps session keys to ordered message logs. Each log sits
//! behind its own async mutex: [`HistoryChat`] holds it for a whole turn, so
//! turns on one session run one at a time while other sessions proceed
//! independently.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::Result;
use crate::llm::ChatModel;
use crate::models::Message;
use crate::models::Role;
use crate::models::SessionId;

type SessionLog = Arc<Mutex<Vec<Message>>>;

/// Session logs owned by the service. Sessions are created on first use and
/// live until the process exits.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, SessionLog>,
    max_messages: Option<usize>,
}

impl SessionStore {
    /// Store with an optional cap on messages kept per session
    #[must_use]
    pub fn new(max_messages: Option<usize>) -> Self {
        Self {
            sessions: DashMap::new(),
            max_messages,
        }
    }

    /// Log for `id`, created empty when unseen
    fn log(&self, id: &SessionId) -> SessionLog {
        self.sessions.entry(id.clone()).or_default().value().clone()
    }

    /// Snapshot of a session's messages, oldest first
    pub async fn messages(&self, id: &SessionId) -> Vec<Message> {
        match self.sessions.get(id).map(|entry| Arc::clone(entry.value())) {
            Some(log) => log.lock().await.clone(),
            None => Vec::new(),
        }
    }

    pub async fn len(&self, id: &SessionId) -> usize {
        match self.sessions.get(id).map(|entry| Arc::clone(entry.value())) {
            Some(log) => log.lock().await.len(),
            None => 0,
        }
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Forget a session's history; the session is recreated on next use
    pub fn clear(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drop `id` when `handle` is its log and nobody else holds it. Callers
    /// check the log is empty; the shard lock keeps new clones out meanwhile.
    fn discard_unused(&self, id: &SessionId, handle: &SessionLog) {
        let removed = self
            .sessions
            .remove_if(id, |_, log| {
                Arc::ptr_eq(log, handle) && Arc::strong_count(handle) == 2
            })
            .is_some();
        if removed {
            debug!("Discarded empty session {}", id);
        }
    }

    /// Append a completed turn and enforce the history cap, dropping the
    /// oldest messages two at a time so question/answer pairs stay together.
    /// The turn just appended is never dropped.
    fn append_turn(&self, log: &mut Vec<Message>, inputs: Vec<Message>, reply: Message) {
        let turn_len = inputs.len() + 1;
        log.extend(inputs);
        log.push(reply);

        if let Some(max) = self.max_messages {
            if log.len() > max {
                let excess = log.len() - max;
                let drop = (excess + excess % 2).min(log.len() - turn_len);
                log.drain(..drop);
            }
        }
    }
}

/// Chat model wrapped with session history: prior turns are prepended to
/// every call and each new turn is recorded once the model answers.
#[derive(Clone)]
pub struct HistoryChat {
    model: Arc<dyn ChatModel>,
    store: Arc<SessionStore>,
}

impl HistoryChat {
    pub fn new(model: Arc<dyn ChatModel>, store: Arc<SessionStore>) -> Self {
        Self { model, store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Invoke the model for `session` with `messages` appended to its history.
    ///
    /// System messages are sent but not recorded; the retrieved context they
    /// carry belongs to a single turn. Nothing is recorded when the model
    /// call fails, and a session that was new for this turn is removed.
    #[tracing::instrument(name = "history.invoke", skip_all, fields(session = %session))]
    pub async fn invoke(&self, session: &SessionId, messages: Vec<Message>) -> Result<Message> {
        let handle = self.store.log(session);
        let mut log = handle.lock().await;

        let mut prompt = Vec::with_capacity(log.len() + messages.len());
        prompt.extend(log.iter().cloned());
        prompt.extend(messages.iter().cloned());
        debug!(
            "Invoking model with {} history + {} new messages",
            log.len(),
            messages.len()
        );

        let reply = match self.model.invoke(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                if log.is_empty() {
                    self.store.discard_unused(session, &handle);
                }
                return Err(e);
            }
        };

        let recorded = messages
            .into_iter()
            .filter(|m| m.role() != Role::System)
            .collect();
        self.store.append_turn(&mut log, recorded, reply.clone());

        Ok(reply)
    }
}
