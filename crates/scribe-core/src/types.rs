//! Domain types shared across the Scribe crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScribeError;

/// The category a user request is classified into.
///
/// Every intent except [`Intent::None`] is served by exactly one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Produce a citation for the supplied material.
    Citation,
    /// Produce an outline for a topic or thesis.
    Structure,
    /// Improve grammar and wording of a text.
    Grammar,
    /// Nothing the assistant is built for.
    None,
}

impl Intent {
    /// Wire token used by the classification backend.
    pub fn token(&self) -> &'static str {
        match self {
            Intent::Citation => "citation",
            Intent::Structure => "structure",
            Intent::Grammar => "grammar",
            Intent::None => "none",
        }
    }

    /// The backend serving this intent, or `None` for [`Intent::None`].
    pub fn backend(&self) -> Option<BackendId> {
        match self {
            Intent::Citation => Some(BackendId::Citation),
            Intent::Structure => Some(BackendId::Structure),
            Intent::Grammar => Some(BackendId::Grammar),
            Intent::None => None,
        }
    }

    pub fn is_routable(&self) -> bool {
        !matches!(self, Intent::None)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Intent {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citation" => Ok(Intent::Citation),
            "structure" => Ok(Intent::Structure),
            "grammar" => Ok(Intent::Grammar),
            "none" => Ok(Intent::None),
            other => Err(ScribeError::UnknownIntent(other.to_string())),
        }
    }
}

/// Identifier of one configured backend service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    /// The backend that answers the intent classification prompt.
    Classifier,
    Citation,
    Structure,
    Grammar,
}

impl BackendId {
    pub const ALL: [BackendId; 4] = [
        BackendId::Classifier,
        BackendId::Citation,
        BackendId::Structure,
        BackendId::Grammar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Classifier => "classifier",
            BackendId::Citation => "citation",
            BackendId::Structure => "structure",
            BackendId::Grammar => "grammar",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_tokens_round_trip_through_from_str() {
        for intent in [Intent::Citation, Intent::Structure, Intent::Grammar, Intent::None] {
            assert_eq!(intent.token().parse::<Intent>().unwrap(), intent);
        }
    }

    #[test]
    fn test_intent_from_str_rejects_unknown() {
        let err = "poetry".parse::<Intent>().unwrap_err();
        assert!(matches!(err, ScribeError::UnknownIntent(ref t) if t == "poetry"));
        // Parsing is exact; normalization is the caller's job.
        assert!("Citation".parse::<Intent>().is_err());
    }

    #[test]
    fn test_intent_backend_mapping() {
        assert_eq!(Intent::Citation.backend(), Some(BackendId::Citation));
        assert_eq!(Intent::Structure.backend(), Some(BackendId::Structure));
        assert_eq!(Intent::Grammar.backend(), Some(BackendId::Grammar));
        assert_eq!(Intent::None.backend(), None);
    }

    #[test]
    fn test_no_intent_maps_to_classifier() {
        for intent in [Intent::Citation, Intent::Structure, Intent::Grammar] {
            assert_ne!(intent.backend(), Some(BackendId::Classifier));
            assert!(intent.is_routable());
        }
        assert!(!Intent::None.is_routable());
    }

    #[test]
    fn test_intent_serde_lowercase() {
        let json = serde_json::to_string(&Intent::Structure).unwrap();
        assert_eq!(json, "\"structure\"");
        let back: Intent = serde_json::from_str("\"grammar\"").unwrap();
        assert_eq!(back, Intent::Grammar);
    }

    #[test]
    fn test_backend_id_display() {
        assert_eq!(BackendId::Classifier.to_string(), "classifier");
        assert_eq!(BackendId::Grammar.to_string(), "grammar");
        assert_eq!(BackendId::ALL.len(), 4);
    }
}
