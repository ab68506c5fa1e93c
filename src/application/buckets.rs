//! Keyword-pattern bucketing: the deterministic fallback when density
//! clustering yields nothing usable, and the secondary regrouping for its
//! noise points.

use crate::domain::entities::search_term::SearchTermRecord;

/// Descriptive patterns checked in order; a record joins the first bucket
/// whose any pattern appears in its lowercased term.
const BUCKET_PATTERNS: &[(&str, &[&str])] = &[
    ("Gummies", &["gummy", "gummies", "chew"]),
    ("Capsules", &["capsule", "softgel", "tablet", "pill"]),
    ("Powders", &["powder", "drink mix"]),
    ("Liquids", &["liquid", "drops", "syrup", "spray"]),
    ("Kids", &["kids", "children", "toddler", "baby"]),
    ("Sugar Free", &["sugar free", "sugar-free", "zero sugar"]),
    ("Organic & Natural", &["organic", "natural", "vegan", "plant based"]),
];

/// Label for records matching no pattern.
const MISC_BUCKET: &str = "Miscellaneous";

/// Bucket records by descriptive keyword patterns. Every record lands in
/// exactly one bucket; empty buckets are not emitted. Bucket order follows
/// the pattern table, with the catch-all last. There is no minimum-size
/// floor here — singleton buckets are legitimate output.
pub fn bucket_by_keywords(records: &[SearchTermRecord]) -> Vec<(String, Vec<SearchTermRecord>)> {
    let mut buckets: Vec<(String, Vec<SearchTermRecord>)> = BUCKET_PATTERNS
        .iter()
        .map(|(label, _)| (label.to_string(), Vec::new()))
        .collect();
    let mut misc: Vec<SearchTermRecord> = Vec::new();

    for record in records {
        let lowered = record.term.to_lowercase();
        let slot = BUCKET_PATTERNS
            .iter()
            .position(|(_, patterns)| patterns.iter().any(|p| lowered.contains(p)));
        match slot {
            Some(i) => buckets[i].1.push(record.clone()),
            None => misc.push(record.clone()),
        }
    }

    if !misc.is_empty() {
        buckets.push((MISC_BUCKET.to_string(), misc));
    }
    buckets.retain(|(_, members)| !members.is_empty());
    buckets
}
