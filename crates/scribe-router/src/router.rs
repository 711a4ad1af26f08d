//! Router façade: sanitizes input, serializes per session, runs the dialogue.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use scribe_core::{BackendId, ScribeConfig};
use scribe_gateway::{BackendGateway, BackendReply};
use scribe_retrieval::{join_context, ContextRetriever, RetrievalError};

use crate::classifier::{Classification, IntentClassifier};
use crate::dialogue::{self, DialogueActions};
use crate::error::RouterError;
use crate::keywords::KeywordMatcher;
use crate::replies::{ResetAck, RouterReply};
use crate::session::{SessionSnapshot, SessionStore};

/// Tunables for [`IntentRouter`].
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub max_message_chars: usize,
    pub forbidden_chars: Vec<char>,
    pub default_session: String,
    pub top_n: usize,
    pub retrieval_timeout: Duration,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self::from_config(&ScribeConfig::default())
    }
}

impl RouterSettings {
    pub fn from_config(config: &ScribeConfig) -> Self {
        Self {
            max_message_chars: config.router.max_message_chars,
            forbidden_chars: config.router.forbidden_chars.chars().collect(),
            default_session: config.router.default_session.clone(),
            top_n: config.retrieval.top_n,
            retrieval_timeout: Duration::from_secs(config.retrieval.timeout_secs),
        }
    }
}

/// Entry point for every user message.
pub struct IntentRouter {
    classifier: IntentClassifier,
    gateway: Arc<dyn BackendGateway>,
    retriever: Arc<dyn ContextRetriever>,
    sessions: SessionStore,
    settings: RouterSettings,
}

impl IntentRouter {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        retriever: Arc<dyn ContextRetriever>,
        keywords: KeywordMatcher,
        settings: RouterSettings,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(gateway.clone(), keywords),
            gateway,
            retriever,
            sessions: SessionStore::new(),
            settings,
        }
    }

    pub fn default_session(&self) -> &str {
        &self.settings.default_session
    }

    /// Strip forbidden characters and enforce the length limits.
    pub fn sanitize(&self, raw: &str) -> Result<String, RouterError> {
        let text: String = raw
            .chars()
            .filter(|c| !self.settings.forbidden_chars.contains(c))
            .collect();

        if text.trim().is_empty() {
            return Err(RouterError::EmptyMessage);
        }
        if text.chars().count() > self.settings.max_message_chars {
            return Err(RouterError::MessageTooLong(self.settings.max_message_chars));
        }
        Ok(text)
    }

    /// Process one message for `session_id` and return the reply.
    ///
    /// Messages for the same session are handled one at a time. The session
    /// only changes if this returns `Ok`: a failed dispatch after a "ja" or a
    /// manual choice leaves the query pending, so the next message is read as
    /// another answer to the same prompt. Repeating the answer retries the
    /// dispatch; [`IntentRouter::reset`] discards the pending query.
    pub async fn process(&self, session_id: &str, raw: &str) -> Result<RouterReply, RouterError> {
        let text = self.sanitize(raw)?;

        let entry = self.sessions.get_or_create(session_id);
        let mut session = entry.lock().await;
        let stage = session.dialogue.stage();
        debug!(session_id, ?stage, "Processing message");

        match dialogue::step(&session.dialogue, &text, self).await {
            Ok(step) => {
                if step.next.stage() != stage {
                    debug!(session_id, from = ?stage, to = ?step.next.stage(), "Dialogue transition");
                }
                if step.reply.text().is_none() {
                    warn!(session_id, "Reply has no response text");
                }
                session.commit(step.next);
                Ok(step.reply)
            }
            Err(e) => {
                warn!(session_id, ?stage, error = %e, "Message failed, session unchanged");
                Err(e)
            }
        }
    }

    /// Force the session back to AwaitingRequest. Creates it if unknown.
    pub async fn reset(&self, session_id: &str) -> ResetAck {
        let entry = self.sessions.get_or_create(session_id);
        entry.lock().await.reset();
        info!(session_id, "Session reset");
        ResetAck::default()
    }

    pub async fn snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        let entry = self.sessions.get(session_id)?;
        let session = entry.lock().await;
        Some(session.snapshot())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    async fn retrieve_context(&self, query: &str) -> Result<String, RouterError> {
        let passages = tokio::time::timeout(
            self.settings.retrieval_timeout,
            self.retriever.retrieve(query, self.settings.top_n),
        )
        .await
        .map_err(|_| RetrievalError::Timeout(self.settings.retrieval_timeout.as_secs()))??;

        debug!(passages = passages.len(), "Retrieved context");
        Ok(join_context(&passages))
    }
}

#[async_trait]
impl DialogueActions for IntentRouter {
    async fn classify(&self, text: &str) -> Result<Classification, RouterError> {
        Ok(self.classifier.classify(text).await?)
    }

    async fn dispatch(&self, backend: BackendId, query: &str) -> Result<BackendReply, RouterError> {
        let context = self.retrieve_context(query).await?;
        let context = Some(context.as_str()).filter(|c| !c.is_empty());
        let reply = self.gateway.call(backend, query, context).await?;
        Ok(reply)
    }
}
