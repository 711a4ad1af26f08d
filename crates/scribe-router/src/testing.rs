//! In-process collaborators for router tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use scribe_core::BackendId;
use scribe_gateway::{BackendGateway, BackendReply, UpstreamCause, UpstreamError};
use scribe_retrieval::{ContextRetriever, RetrievalError};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub backend: BackendId,
    pub text: String,
    pub context: Option<String>,
}

/// Gateway that records every call and answers from canned replies.
///
/// The classifier answers from `queued` first, then with `classifier_reply`;
/// every other backend answers
/// `{"response": "<backend> reply", "backend": "<backend>"}`.
pub struct RecordingGateway {
    classifier_reply: Value,
    queued: Mutex<VecDeque<Value>>,
    failing: HashSet<BackendId>,
    timing_out: HashSet<BackendId>,
    hanging: HashSet<BackendId>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingGateway {
    pub fn classifying(token: &str) -> Self {
        Self::with_classifier_reply(json!({ "response": token }))
    }

    pub fn with_classifier_reply(reply: Value) -> Self {
        Self {
            classifier_reply: reply,
            queued: Mutex::new(VecDeque::new()),
            failing: HashSet::new(),
            timing_out: HashSet::new(),
            hanging: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Classifier answers `tokens` in order, repeating the last one.
    pub fn classifying_in_turn(tokens: &[&str]) -> Self {
        let (last, first) = tokens.split_last().expect("at least one token");
        let gateway = Self::classifying(last);
        gateway
            .queued
            .lock()
            .unwrap()
            .extend(first.iter().map(|t| json!({ "response": t })));
        gateway
    }

    pub fn timing_out(mut self, backend: BackendId) -> Self {
        self.timing_out.insert(backend);
        self
    }

    pub fn failing(mut self, backend: BackendId) -> Self {
        self.failing.insert(backend);
        self
    }

    pub fn hanging(mut self, backend: BackendId) -> Self {
        self.hanging.insert(backend);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, backend: BackendId) -> usize {
        self.calls().iter().filter(|c| c.backend == backend).count()
    }

    /// Calls to anything but the classifier.
    pub fn dispatches(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.backend != BackendId::Classifier)
            .collect()
    }

    pub fn backend_reply(backend: BackendId) -> Value {
        json!({ "response": format!("{} reply", backend), "backend": backend.as_str() })
    }
}

#[async_trait]
impl BackendGateway for RecordingGateway {
    async fn call(
        &self,
        backend: BackendId,
        text: &str,
        context: Option<&str>,
    ) -> Result<BackendReply, UpstreamError> {
        self.calls.lock().unwrap().push(RecordedCall {
            backend,
            text: text.to_string(),
            context: context.map(str::to_string),
        });

        if self.hanging.contains(&backend) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.timing_out.contains(&backend) {
            return Err(UpstreamError::new(
                backend,
                backend.as_str(),
                UpstreamCause::Timeout,
            ));
        }
        if self.failing.contains(&backend) {
            return Err(UpstreamError::new(
                backend,
                backend.as_str(),
                UpstreamCause::Status(503),
            ));
        }

        let reply = match backend {
            BackendId::Classifier => self
                .queued
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.classifier_reply.clone()),
            other => Self::backend_reply(other),
        };
        Ok(BackendReply::try_from(reply).unwrap())
    }
}

/// Retriever returning a fixed passage list and recording queries.
pub struct StaticRetriever {
    passages: Vec<String>,
    fail: bool,
    queries: Mutex<Vec<(String, usize)>>,
}

impl StaticRetriever {
    pub fn new(passages: &[&str]) -> Self {
        Self {
            passages: passages.iter().map(|p| p.to_string()).collect(),
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[])
        }
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContextRetriever for StaticRetriever {
    async fn retrieve(&self, query: &str, top_n: usize) -> Result<Vec<String>, RetrievalError> {
        self.queries.lock().unwrap().push((query.to_string(), top_n));
        if self.fail {
            return Err(RetrievalError::Store("collection unavailable".to_string()));
        }
        Ok(self.passages.iter().take(top_n).cloned().collect())
    }
}
