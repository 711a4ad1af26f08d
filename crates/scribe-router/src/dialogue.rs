//! Per-session disambiguation dialogue.
//!
//! States and transitions:
//! - AwaitingRequest: classify; primary hit dispatches, fallback hit asks for
//!   confirmation, no hit asks for a manual choice.
//! - AwaitingConfirmation: yes dispatches the guess, no asks for a manual
//!   choice, anything else re-prompts.
//! - AwaitingManualChoice: a choice dispatches, "nichts davon" ends the
//!   dialogue, anything else re-prompts.
//!
//! [`step`] computes the reply and the next state without touching the
//! session; the caller commits the next state once the step succeeded.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use scribe_core::{BackendId, Intent};
use scribe_gateway::BackendReply;

use crate::classifier::Classification;
use crate::error::RouterError;
use crate::replies::{self, RouterReply};

/// Where a session's conversation stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialogue {
    #[default]
    AwaitingRequest,
    AwaitingConfirmation {
        pending_query: String,
        pending_intent: Intent,
    },
    AwaitingManualChoice {
        pending_query: String,
    },
}

/// Payload-free view of [`Dialogue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AwaitingRequest,
    AwaitingConfirmation,
    AwaitingManualChoice,
}

impl Dialogue {
    pub fn stage(&self) -> Stage {
        match self {
            Dialogue::AwaitingRequest => Stage::AwaitingRequest,
            Dialogue::AwaitingConfirmation { .. } => Stage::AwaitingConfirmation,
            Dialogue::AwaitingManualChoice { .. } => Stage::AwaitingManualChoice,
        }
    }

    pub fn pending_query(&self) -> Option<&str> {
        match self {
            Dialogue::AwaitingRequest => None,
            Dialogue::AwaitingConfirmation { pending_query, .. }
            | Dialogue::AwaitingManualChoice { pending_query } => Some(pending_query),
        }
    }

    pub fn pending_intent(&self) -> Option<Intent> {
        match self {
            Dialogue::AwaitingConfirmation { pending_intent, .. } => Some(*pending_intent),
            _ => None,
        }
    }
}

/// Answer to the yes/no confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    Unrecognized,
}

pub fn parse_confirmation(text: &str) -> Confirmation {
    match text.trim().to_lowercase().as_str() {
        "ja" | "yes" | "j" | "y" => Confirmation::Yes,
        "nein" | "no" | "n" => Confirmation::No,
        _ => Confirmation::Unrecognized,
    }
}

/// Answer to the manual-selection prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualChoice {
    Chosen(Intent),
    NoneOfThese,
    Unrecognized,
}

pub fn parse_manual_choice(text: &str) -> ManualChoice {
    match text.trim().to_lowercase().as_str() {
        "zitat" | "z" | "1" => ManualChoice::Chosen(Intent::Citation),
        "gliederung" | "g" | "2" => ManualChoice::Chosen(Intent::Structure),
        "formulierung" | "f" | "3" => ManualChoice::Chosen(Intent::Grammar),
        "nichts davon" | "n" | "4" => ManualChoice::NoneOfThese,
        _ => ManualChoice::Unrecognized,
    }
}

/// The side effects a step may need.
#[async_trait]
pub trait DialogueActions: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, RouterError>;

    /// Retrieve context for `query` and send both to `backend`.
    async fn dispatch(&self, backend: BackendId, query: &str) -> Result<BackendReply, RouterError>;
}

/// Reply for the current message plus the state to commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub reply: RouterReply,
    pub next: Dialogue,
}

impl Step {
    fn stay(dialogue: &Dialogue, reply: RouterReply) -> Self {
        Self {
            reply,
            next: dialogue.clone(),
        }
    }

    fn to(next: Dialogue, reply: RouterReply) -> Self {
        Self { reply, next }
    }
}

/// Dispatch a routable intent and return to AwaitingRequest.
async fn dispatch_intent<A: DialogueActions + ?Sized>(
    actions: &A,
    intent: Intent,
    query: &str,
) -> Result<Step, RouterError> {
    let Some(backend) = intent.backend() else {
        return Ok(Step::to(
            Dialogue::AwaitingRequest,
            RouterReply::local(replies::UNSUPPORTED),
        ));
    };
    let reply = actions.dispatch(backend, query).await?;
    Ok(Step::to(Dialogue::AwaitingRequest, RouterReply::Backend(reply)))
}

fn ask_manual_choice(text: &str) -> Step {
    debug!("Asking for manual choice");
    Step::to(
        Dialogue::AwaitingManualChoice {
            pending_query: text.to_string(),
        },
        RouterReply::local(replies::no_match_prompt()),
    )
}

/// Advance the dialogue by one sanitized message.
pub async fn step<A: DialogueActions + ?Sized>(
    dialogue: &Dialogue,
    text: &str,
    actions: &A,
) -> Result<Step, RouterError> {
    match dialogue {
        Dialogue::AwaitingRequest => match actions.classify(text).await? {
            Classification::Primary(intent) => {
                info!(intent = %intent, source = "primary", "Routing request");
                dispatch_intent(actions, intent, text).await
            }
            Classification::Fallback(intent) => match replies::subject(intent) {
                Some(subject) => {
                    debug!(intent = %intent, "Asking for confirmation of keyword match");
                    Ok(Step::to(
                        Dialogue::AwaitingConfirmation {
                            pending_query: text.to_string(),
                            pending_intent: intent,
                        },
                        RouterReply::local(replies::confirmation_prompt(subject)),
                    ))
                }
                None => Ok(ask_manual_choice(text)),
            },
            Classification::Unclassified => Ok(ask_manual_choice(text)),
        },

        Dialogue::AwaitingConfirmation {
            pending_query,
            pending_intent,
        } => match parse_confirmation(text) {
            Confirmation::Yes => {
                info!(intent = %pending_intent, source = "confirmed", "Routing request");
                dispatch_intent(actions, *pending_intent, pending_query).await
            }
            Confirmation::No => Ok(Step::to(
                Dialogue::AwaitingManualChoice {
                    pending_query: pending_query.clone(),
                },
                RouterReply::local(replies::MANUAL_PROMPT),
            )),
            Confirmation::Unrecognized => Ok(Step::stay(
                dialogue,
                RouterReply::local(replies::YES_NO_REPROMPT),
            )),
        },

        Dialogue::AwaitingManualChoice { pending_query } => match parse_manual_choice(text) {
            ManualChoice::Chosen(intent) => {
                info!(intent = %intent, source = "manual", "Routing request");
                dispatch_intent(actions, intent, pending_query).await
            }
            ManualChoice::NoneOfThese => Ok(Step::to(
                Dialogue::AwaitingRequest,
                RouterReply::local(replies::UNSUPPORTED),
            )),
            ManualChoice::Unrecognized => Ok(Step::stay(
                dialogue,
                RouterReply::local(replies::MANUAL_REPROMPT),
            )),
        },
    }
}
