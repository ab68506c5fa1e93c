//! Pairwise similarity functions used by the rule-based clusterer.

use crate::domain::entities::product::ProductRecord;

/// Normalized edit-distance similarity between two search terms.
///
/// Both terms are first canonicalized — lowercased, split on whitespace, and
/// their words sorted — and the Levenshtein distance is computed over the
/// rejoined canonical strings: `1 - levenshtein(a', b') / max(len(a'),
/// len(b'))`. This is NOT raw-string Levenshtein: sorting the words makes
/// the comparison word-order-insensitive, so "sleep gummies" and "gummy
/// sleep aid" score well above what their raw character distance suggests.
/// Two empty strings are identical (1.0).
pub fn term_similarity(a: &str, b: &str) -> f64 {
    let a = canonicalize(a);
    let b = canonicalize(b);
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let dist = strsim::levenshtein(&a, &b);
    1.0 - dist as f64 / max_len as f64
}

/// Lowercase and sort words so word order doesn't dominate the distance.
fn canonicalize(term: &str) -> String {
    let lowered = term.to_lowercase();
    let mut words: Vec<&str> = lowered.split_whitespace().collect();
    words.sort_unstable();
    words.join(" ")
}

/// Product similarity: unweighted mean of the sub-scores whose fields are
/// present on both records — category exact match, price closeness, rating
/// closeness, BSR closeness. No comparable fields at all scores 0.
pub fn product_similarity(a: &ProductRecord, b: &ProductRecord) -> f64 {
    let mut scores: Vec<f64> = Vec::with_capacity(4);

    if let (Some(ca), Some(cb)) = (&a.category, &b.category) {
        scores.push(if ca.eq_ignore_ascii_case(cb) { 1.0 } else { 0.0 });
    }
    if let (Some(pa), Some(pb)) = (a.price, b.price) {
        scores.push(closeness(pa, pb));
    }
    if let (Some(ra), Some(rb)) = (a.rating, b.rating) {
        scores.push(1.0 - (ra - rb).abs() / 5.0);
    }
    if let (Some(ba), Some(bb)) = (a.bsr, b.bsr) {
        scores.push(closeness(ba as f64, bb as f64));
    }

    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// `1 - |x - y| / max(x, y)`, guarded so a pair of zeros is a perfect match.
fn closeness(x: f64, y: f64) -> f64 {
    let max = x.max(y);
    if max == 0.0 {
        return 1.0;
    }
    1.0 - (x - y).abs() / max
}
