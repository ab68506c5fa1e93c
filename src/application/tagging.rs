//! Tag ontology matcher.
//!
//! Evaluates a caller-supplied trigger-word ontology against free text.
//! Pure function of its inputs — the ontology is an explicit parameter,
//! never process-wide state.

use std::collections::BTreeMap;

use crate::domain::values::tag_rule::TagRule;

/// Match `text` against `rules`, returning category → tag names.
///
/// The text is lowercased once; a rule fires when any of its trigger phrases
/// is a substring. Within a category a tag is added at most once, and
/// categories with no matched tags are omitted entirely. Malformed rules
/// (empty category, tag, or trigger list) are skipped with a warning.
pub fn apply_tags(text: &str, rules: &[TagRule]) -> BTreeMap<String, Vec<String>> {
    let lowered = text.to_lowercase();
    let mut result: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for rule in rules {
        if rule.is_malformed() {
            eprintln!(
                "WARNING: Skipping malformed tag rule '{}:{}' (missing category, tag, or triggers)",
                rule.category, rule.tag
            );
            continue;
        }

        let fired = rule
            .usable_triggers()
            .iter()
            .any(|trigger| lowered.contains(trigger.as_str()));
        if !fired {
            continue;
        }

        let tags = result.entry(rule.category.clone()).or_default();
        if !tags.contains(&rule.tag) {
            tags.push(rule.tag.clone());
        }
    }

    result
}
