//! Hint questions for one location, as supplied by the engine.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One hint question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintQuestion {
    /// The question as listed.
    pub question: String,
    /// Answers, weakest first.
    #[serde(default)]
    pub answers: Vec<String>,
    /// Location (section) the question belongs to.
    #[serde(default)]
    pub section: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A question together with its engine-side index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Index the engine uses to look up answers.
    pub index: usize,
    /// The question.
    pub question: HintQuestion,
}

/// The questions available at one location, in engine order.
#[derive(Debug, Clone, Default)]
pub struct HintCatalog {
    location: String,
    entries: Vec<CatalogEntry>,
}

impl HintCatalog {
    /// Parse the engine's catalog JSON.
    ///
    /// Malformed input yields an empty catalog and a warning, never an error.
    pub fn parse(location: &str, json: &str) -> Self {
        let entries = match serde_json::from_str::<Option<Vec<(usize, HintQuestion)>>>(json) {
            Ok(pairs) => pairs
                .unwrap_or_default()
                .into_iter()
                .map(|(index, question)| CatalogEntry { index, question })
                .collect(),
            Err(e) => {
                warn!(location, error = %e, "failed to parse hint catalog");
                Vec::new()
            }
        };
        Self {
            location: location.to_string(),
            entries,
        }
    }

    /// Location this catalog was loaded for.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Entry at a listing position.
    pub fn get(&self, position: usize) -> Option<&CatalogEntry> {
        self.entries.get(position)
    }

    /// All entries in listing order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no questions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
