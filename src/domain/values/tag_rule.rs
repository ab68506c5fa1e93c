use serde::{Deserialize, Serialize};

/// One row of the caller-supplied trigger-word ontology: if any trigger
/// phrase appears in a record's text, the record gets `tag` under `category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRule {
    pub category: String,
    pub tag: String,
    /// Lowercase phrases matched via substring containment.
    pub triggers: Vec<String>,
}

impl TagRule {
    pub fn new(
        category: impl Into<String>,
        tag: impl Into<String>,
        triggers: Vec<String>,
    ) -> Self {
        Self {
            category: category.into(),
            tag: tag.into(),
            triggers,
        }
    }

    /// Build a rule from raw trigger text as it appears in ontology
    /// spreadsheets: phrases separated by `|` or `,`, whitespace-padded.
    pub fn parse(category: impl Into<String>, tag: impl Into<String>, raw_triggers: &str) -> Self {
        let triggers = raw_triggers
            .split(['|', ','])
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self::new(category, tag, triggers)
    }

    /// Triggers with blanks removed, lowercased. A rule whose usable trigger
    /// list is empty never fires.
    pub fn usable_triggers(&self) -> Vec<String> {
        self.triggers
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// A rule is malformed when it has no category, no tag name, or no
    /// usable trigger. Malformed rules are skipped, never fatal.
    pub fn is_malformed(&self) -> bool {
        self.category.trim().is_empty()
            || self.tag.trim().is_empty()
            || self.usable_triggers().is_empty()
    }
}
