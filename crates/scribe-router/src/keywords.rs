//! Keyword fallback matching.
//!
//! Each intent's keywords are compiled once into a single case-insensitive
//! regex of escaped alternatives. Sets are tried in priority order
//! (citation, structure, grammar) and the first hit wins.

use regex::Regex;
use tracing::debug;

use scribe_core::config::KeywordConfig;
use scribe_core::Intent;

/// Compiled keyword sets, one per routable intent.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    sets: Vec<(Intent, Option<Regex>)>,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(&KeywordConfig::default()).expect("Invalid default keyword regex")
    }
}

impl KeywordMatcher {
    pub fn new(config: &KeywordConfig) -> Result<Self, regex::Error> {
        let sets = [
            (Intent::Citation, &config.citation),
            (Intent::Structure, &config.structure),
            (Intent::Grammar, &config.grammar),
        ]
        .into_iter()
        .map(|(intent, words)| Ok((intent, compile_set(words)?)))
        .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { sets })
    }

    /// The first intent whose keywords occur in `text`, if any.
    pub fn classify(&self, text: &str) -> Option<Intent> {
        let hit = self.sets.iter().find_map(|(intent, regex)| {
            regex
                .as_ref()
                .and_then(|re| re.find(text))
                .map(|m| (*intent, m.as_str()))
        });

        match hit {
            Some((intent, keyword)) => {
                debug!(intent = %intent, keyword, "Keyword fallback matched");
                Some(intent)
            }
            None => {
                debug!("Keyword fallback found no match");
                None
            }
        }
    }
}

/// Compile one set. An empty set never matches.
fn compile_set(words: &[String]) -> Result<Option<Regex>, regex::Error> {
    let alternatives: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).map(Some)
}
