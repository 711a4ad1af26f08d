//! Scribe router: classifies requests, runs the per-session disambiguation
//! dialogue and dispatches to the backend serving the resolved intent.

pub mod classifier;
pub mod dialogue;
pub mod error;
pub mod keywords;
pub mod prompt;
pub mod replies;
pub mod router;
pub mod session;

#[cfg(test)]
mod testing;

pub use classifier::{Classification, IntentClassifier};
pub use dialogue::{Dialogue, DialogueActions, Stage, Step};
pub use error::RouterError;
pub use keywords::KeywordMatcher;
pub use replies::{ResetAck, RouterReply};
pub use router::{IntentRouter, RouterSettings};
pub use session::{Session, SessionSnapshot, SessionStore};
