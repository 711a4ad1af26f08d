//! Session store with one exclusive lock per conversation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error};

use scribe_core::Intent;

use crate::dialogue::{Dialogue, Stage};

/// One conversation participant's state.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub dialogue: Dialogue,
    pub created_at: DateTime<Utc>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub message_count: u64,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dialogue: Dialogue::AwaitingRequest,
            created_at: Utc::now(),
            last_message_at: None,
            message_count: 0,
        }
    }

    /// Commit the outcome of one processed message.
    pub fn commit(&mut self, next: Dialogue) {
        self.dialogue = next;
        self.last_message_at = Some(Utc::now());
        self.message_count += 1;
    }

    pub fn reset(&mut self) {
        self.dialogue = Dialogue::AwaitingRequest;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            stage: self.dialogue.stage(),
            pending_query: self.dialogue.pending_query().map(str::to_string),
            pending_intent: self.dialogue.pending_intent(),
            created_at: self.created_at,
            last_message_at: self.last_message_at,
            message_count: self.message_count,
        }
    }
}

/// Read-only view of a session for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub stage: Stage,
    pub pending_query: Option<String>,
    pub pending_intent: Option<Intent>,
    pub created_at: DateTime<Utc>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub message_count: u64,
}

/// Sessions keyed by id.
///
/// The outer lock is held only to look up or insert an entry. Each entry has
/// its own async lock, held for the whole of one message.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<tokio::sync::Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<tokio::sync::Mutex<Session>>>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // Entries are only ever inserted whole, so the map is still valid.
                error!("Session store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// The session for `id`, created in AwaitingRequest if unknown.
    pub fn get_or_create(&self, id: &str) -> Arc<tokio::sync::Mutex<Session>> {
        let mut sessions = self.entries();
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(session_id = id, "Creating session");
                Arc::new(tokio::sync::Mutex::new(Session::new(id)))
            })
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<Arc<tokio::sync::Mutex<Session>>> {
        self.entries().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
