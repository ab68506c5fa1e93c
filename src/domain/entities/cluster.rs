use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::product::ProductRecord;
use crate::domain::entities::search_term::SearchTermRecord;
use crate::domain::values::scoring;

/// A product-attribute annotation attached to a cluster, e.g.
/// `{ category: "Format", value: "Gummies" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterTag {
    pub category: String,
    pub value: String,
}

impl ClusterTag {
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
        }
    }
}

/// Aggregate metrics computed over a cluster's members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterMetrics {
    pub total_volume: f64,
    /// Volume-weighted mean click share, in [0,1]. Defined as 0 when the
    /// cluster has no volume.
    pub weighted_click_share: f64,
    /// Heuristic market-potential score in [0,100].
    pub opportunity_score: u8,
    /// Mean over members that carry a rating; `None` when no member does.
    pub avg_rating: Option<f64>,
    pub avg_price: Option<f64>,
}

/// A non-empty group of search terms considered mutually related.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermCluster {
    /// Stable slug derived from the name.
    pub id: String,
    pub name: String,
    pub description: String,
    pub terms: Vec<SearchTermRecord>,
    pub metrics: ClusterMetrics,
    pub tags: Vec<ClusterTag>,
}

impl TermCluster {
    /// Assemble a cluster from its members, computing metrics and tags.
    /// Members must be non-empty — empty candidate clusters are discarded
    /// before this point.
    pub fn build(name: String, description: String, terms: Vec<SearchTermRecord>) -> Self {
        let total_volume: f64 = terms.iter().map(|t| t.volume).sum();
        let shares: Vec<(f64, f64)> = terms
            .iter()
            .map(|t| (t.click_share.unwrap_or(0.0), t.volume))
            .collect();
        let weighted_click_share = scoring::weighted_click_share(&shares);
        let mean_growth = scoring::mean_present(terms.iter().map(|t| t.growth_180d))
            .unwrap_or(0.0);
        // competition proxy: click share as a percentage, floored at 1 so
        // zero-click-share clusters don't zero out the score
        let competition = (weighted_click_share * 100.0).max(1.0);
        let opportunity_score =
            scoring::opportunity_score(total_volume, mean_growth, competition);

        let mut tags = Vec::new();
        for term in &terms {
            if let Some(format) = &term.format_tag {
                tags.push(ClusterTag::new("Format", format.clone()));
            }
            if let Some(function) = &term.function_tag {
                tags.push(ClusterTag::new("Function", function.clone()));
            }
        }

        Self {
            id: slugify(&name),
            name,
            description,
            metrics: ClusterMetrics {
                total_volume,
                weighted_click_share,
                opportunity_score,
                avg_rating: None,
                avg_price: None,
            },
            tags: dedup_tags(tags),
            terms,
        }
    }

    /// Member search terms, lowercased, for keyword matching.
    pub fn keywords(&self) -> Vec<String> {
        self.terms.iter().map(|t| t.term.to_lowercase()).collect()
    }
}

/// A non-empty group of products considered mutually related.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCluster {
    pub id: String,
    pub name: String,
    pub description: String,
    pub products: Vec<ProductRecord>,
    pub metrics: ClusterMetrics,
    pub tags: Vec<ClusterTag>,
}

impl ProductCluster {
    /// Assemble a product cluster from its members. Review counts stand in
    /// for search volume as the demand proxy, weighting market share the
    /// same way click share is weighted for term clusters.
    pub fn build(name: String, description: String, products: Vec<ProductRecord>) -> Self {
        let total_volume: f64 = products
            .iter()
            .map(|p| p.review_count.unwrap_or(0) as f64)
            .sum();
        let shares: Vec<(f64, f64)> = products
            .iter()
            .map(|p| {
                (
                    p.market_share.unwrap_or(0.0),
                    p.review_count.unwrap_or(0) as f64,
                )
            })
            .collect();
        let weighted_click_share = scoring::weighted_click_share(&shares);
        let avg_rating = scoring::mean_present(products.iter().map(|p| p.rating));
        let avg_price = scoring::mean_present(products.iter().map(|p| p.price));
        let opportunity_score =
            scoring::niche_opportunity_score(total_volume, 0.0, products.len());

        let mut tags = Vec::new();
        for product in &products {
            if let Some(category) = &product.category {
                tags.push(ClusterTag::new("Category", category.clone()));
            }
        }

        Self {
            id: slugify(&name),
            name,
            description,
            metrics: ClusterMetrics {
                total_volume,
                weighted_click_share,
                opportunity_score,
                avg_rating,
                avg_price,
            },
            tags: dedup_tags(tags),
            products,
        }
    }
}

/// Name a term cluster from the words shared by every member keyword
/// (lowercased token intersection, in first-keyword order). `None` when the
/// intersection is empty — callers fall back to the first keyword verbatim.
pub fn shared_word_name(keywords: &[String]) -> Option<String> {
    let first = keywords.first()?;
    let mut common: Vec<String> = first
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    for keyword in &keywords[1..] {
        let words: std::collections::HashSet<String> = keyword
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        common.retain(|w| words.contains(w));
    }
    if common.is_empty() {
        None
    } else {
        Some(common.join(" "))
    }
}

/// Name a product cluster by its most frequent member category, breaking
/// ties alphabetically. `None` when no member carries a category.
pub fn dominant_category(products: &[ProductRecord]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for product in products {
        if let Some(category) = &product.category {
            *counts.entry(category.as_str()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(category, _)| category.to_string())
}

/// Lowercase the name and collapse runs of non-alphanumerics into single
/// hyphens to get a stable cluster id.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "cluster".to_string()
    } else {
        slug
    }
}

/// Deduplicate tags preserving first-seen order.
pub fn dedup_tags(tags: Vec<ClusterTag>) -> Vec<ClusterTag> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|t| seen.insert((t.category.clone(), t.value.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Sleep Gummies"), "sleep-gummies");
        assert_eq!(slugify("  Vitamin C (1000mg)! "), "vitamin-c-1000mg");
    }

    #[test]
    fn test_slugify_never_empty() {
        assert_eq!(slugify("???"), "cluster");
        assert_eq!(slugify(""), "cluster");
    }

    #[test]
    fn test_shared_word_name_intersection() {
        let keywords = vec![
            "sleep gummies for adults".to_string(),
            "melatonin sleep gummies".to_string(),
        ];
        assert_eq!(shared_word_name(&keywords), Some("sleep gummies".to_string()));
    }

    #[test]
    fn test_shared_word_name_empty_intersection() {
        let keywords = vec!["vitamin c".to_string(), "zinc tablets".to_string()];
        assert_eq!(shared_word_name(&keywords), None);
    }

    #[test]
    fn test_dominant_category_ties_break_alphabetically() {
        let mut a = ProductRecord::new("A");
        a.category = Some("Vitamins".to_string());
        let mut b = ProductRecord::new("B");
        b.category = Some("Minerals".to_string());
        assert_eq!(dominant_category(&[a, b]), Some("Minerals".to_string()));
    }

    #[test]
    fn test_term_cluster_build_metrics() {
        let terms = vec![
            SearchTermRecord::new("sleep gummies", 1000.0).with_click_share(0.2),
            SearchTermRecord::new("gummy sleep aid", 3000.0).with_click_share(0.8),
        ];
        let cluster = TermCluster::build("sleep".to_string(), "desc".to_string(), terms);
        assert_eq!(cluster.id, "sleep");
        assert_eq!(cluster.metrics.total_volume, 4000.0);
        assert!((cluster.metrics.weighted_click_share - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_dedup_tags_keeps_first_occurrence() {
        let tags = vec![
            ClusterTag::new("Format", "Gummies"),
            ClusterTag::new("Function", "Sleep"),
            ClusterTag::new("Format", "Gummies"),
        ];
        let deduped = dedup_tags(tags);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].value, "Gummies");
    }
}
