//! Two-stage intent classification.
//!
//! The primary stage asks the classification backend; only when it answers
//! `none` (or something unusable) does the keyword fallback run.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use scribe_core::{BackendId, Intent};
use scribe_gateway::{BackendGateway, UpstreamError};

use crate::keywords::KeywordMatcher;
use crate::prompt::classification_prompt;

/// Outcome of classifying one message, tagged with the stage that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "intent", rename_all = "snake_case")]
pub enum Classification {
    /// The classification backend named a routable intent.
    Primary(Intent),
    /// The backend said none, but a keyword set matched.
    Fallback(Intent),
    /// Neither stage found an intent.
    Unclassified,
}

/// Characters stripped from either end of the classifier's answer.
fn is_wrapping(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '„' | '“' | '”' | '‚' | '‘' | '’')
}

/// Map the classifier's raw answer to an intent token.
///
/// Trims whitespace, surrounding quotes and trailing punctuation, then
/// lowercases and matches exactly. Returns `None` for anything else.
pub fn parse_intent_token(raw: &str) -> Option<Intent> {
    let token = raw
        .trim_start_matches(is_wrapping)
        .trim_end_matches(|c: char| is_wrapping(c) || c.is_ascii_punctuation())
        .to_lowercase();
    token.parse().ok()
}

pub struct IntentClassifier {
    gateway: Arc<dyn BackendGateway>,
    keywords: KeywordMatcher,
}

impl IntentClassifier {
    pub fn new(gateway: Arc<dyn BackendGateway>, keywords: KeywordMatcher) -> Self {
        Self { gateway, keywords }
    }

    /// Ask the classification backend. Unusable answers degrade to
    /// [`Intent::None`]; only an unreachable backend is an error.
    pub async fn primary(&self, text: &str) -> Result<Intent, UpstreamError> {
        let prompt = classification_prompt(text);
        let reply = self.gateway.call(BackendId::Classifier, &prompt, None).await?;

        let Some(raw) = reply.response_text() else {
            warn!("ClassificationDegraded: classifier reply has no response field");
            return Ok(Intent::None);
        };

        match parse_intent_token(raw) {
            Some(intent) => {
                debug!(intent = %intent, "Primary classification");
                Ok(intent)
            }
            None => {
                warn!(raw, "ClassificationDegraded: unrecognized classifier answer");
                Ok(Intent::None)
            }
        }
    }

    /// Keyword matching over the full message. No network calls.
    pub fn fallback(&self, text: &str) -> Option<Intent> {
        self.keywords.classify(text)
    }

    pub async fn classify(&self, text: &str) -> Result<Classification, UpstreamError> {
        let intent = self.primary(text).await?;
        if intent.is_routable() {
            return Ok(Classification::Primary(intent));
        }

        let classification = match self.fallback(text).filter(Intent::is_routable) {
            Some(intent) => Classification::Fallback(intent),
            None => {
                debug!("NoMatchingIntent: both classifier stages returned none");
                Classification::Unclassified
            }
        };
        Ok(classification)
    }
}
