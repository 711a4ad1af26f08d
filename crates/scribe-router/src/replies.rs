//! Replies returned to the user, and the fixed German prompt texts.

use serde::{Deserialize, Serialize};

use scribe_core::Intent;
use scribe_gateway::BackendReply;

pub const NO_MODEL_FOUND: &str = "Kein passendes Modell gefunden";

pub const MANUAL_PROMPT: &str = "Bitte gib die Art deiner Anfrage manuell ein (1 = zitat, 2 = gliederung, 3 = formulierung, 4 = nichts davon)";

pub const YES_NO_REPROMPT: &str = "Bitte gib eine sinnvolle Antwort ein. Möglich sind ja oder nein";

pub const MANUAL_REPROMPT: &str = "Bitte gib eine sinnvolle Antwort ein. Möglich sind 1 = zitat, 2 = gliederung, 3 = formulierung, 4 = nichts davon";

pub const UNSUPPORTED: &str =
    "Es sieht so aus als wäre unser KI-Assistent nicht auf deine Anfrage ausgelegt.";

pub const RESET_ACK: &str = "Input state has been reset to REQUEST.";

/// How the confirmation prompt names an intent.
pub fn subject(intent: Intent) -> Option<&'static str> {
    match intent {
        Intent::Citation => Some("Zitat"),
        Intent::Structure => Some("Gliederung"),
        Intent::Grammar => Some("Formulierung und Grammatik"),
        Intent::None => None,
    }
}

/// Prompt asking the user to confirm a keyword guess.
pub fn confirmation_prompt(subject: &str) -> String {
    format!(
        "{}\nGeht es in deiner Anfrage um folgendes: {} (Bestätige mit ja oder nein)",
        NO_MODEL_FOUND, subject
    )
}

/// Prompt shown when neither classifier stage found an intent.
pub fn no_match_prompt() -> String {
    format!("{}\n{}", NO_MODEL_FOUND, MANUAL_PROMPT)
}

/// What the router hands back for one message.
///
/// Serializes to the backend's own JSON object, or to `{"response": text}`
/// for locally generated prompts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouterReply {
    Backend(BackendReply),
    Local { response: String },
}

impl RouterReply {
    pub fn local(text: impl Into<String>) -> Self {
        RouterReply::Local {
            response: text.into(),
        }
    }

    /// The `response` text, for either variant.
    pub fn text(&self) -> Option<&str> {
        match self {
            RouterReply::Backend(reply) => reply.response_text(),
            RouterReply::Local { response } => Some(response),
        }
    }
}

/// Acknowledgement of a session reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetAck {
    pub response: String,
}

impl Default for ResetAck {
    fn default() -> Self {
        Self {
            response: RESET_ACK.to_string(),
        }
    }
}
