//! Rule-based clusterer: greedy single-pass seeded expansion.
//!
//! Deterministic given input order — no randomness anywhere. Each pass
//! assigns a record to at most one cluster; candidate clusters below the
//! minimum size are discarded outright and their members do not return to
//! the unassigned pool (behavior kept from the original exports pipeline,
//! see DESIGN.md).

use serde::{Deserialize, Serialize};

use crate::domain::entities::cluster::{
    dominant_category, shared_word_name, ProductCluster, TermCluster,
};
use crate::domain::entities::product::ProductRecord;
use crate::domain::entities::search_term::SearchTermRecord;
use crate::domain::error::DomainError;
use crate::domain::values::similarity::{product_similarity, term_similarity};

/// Knobs for a clustering pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSettings {
    pub max_clusters: usize,
    pub min_cluster_size: usize,
    pub similarity_threshold: f64,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            max_clusters: 8,
            min_cluster_size: 2,
            similarity_threshold: 0.5,
        }
    }
}

impl ClusterSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(DomainError::InvalidInput(format!(
                "similarity_threshold must be within [0,1], got {}",
                self.similarity_threshold
            )));
        }
        if self.min_cluster_size == 0 {
            return Err(DomainError::InvalidInput(
                "min_cluster_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Greedy seeded grouping. Pops the first unassigned record as a seed, then
/// pulls in every remaining record within `similarity_threshold` of the
/// seed. Groups smaller than `min_cluster_size` are dropped with their
/// members; leftovers after `max_clusters` groups produce nothing.
pub fn greedy_group<T: Clone>(
    records: &[T],
    similarity: impl Fn(&T, &T) -> f64,
    settings: &ClusterSettings,
) -> Vec<Vec<T>> {
    let mut unassigned: Vec<T> = records.to_vec();
    let mut groups: Vec<Vec<T>> = Vec::new();

    while !unassigned.is_empty() && groups.len() < settings.max_clusters {
        let seed = unassigned.remove(0);
        let mut group = vec![seed];

        // reverse index order so swap-free removal stays sound
        for i in (0..unassigned.len()).rev() {
            if similarity(&group[0], &unassigned[i]) >= settings.similarity_threshold {
                group.push(unassigned.remove(i));
            }
        }

        if group.len() >= settings.min_cluster_size {
            groups.push(group);
        }
        // undersized groups are discarded permanently, members included
    }

    groups
}

/// Cluster search terms by normalized edit-distance similarity.
pub fn cluster_terms_by_rules(
    records: &[SearchTermRecord],
    settings: &ClusterSettings,
) -> Vec<TermCluster> {
    let groups = greedy_group(
        records,
        |a, b| term_similarity(&a.term, &b.term),
        settings,
    );

    groups
        .into_iter()
        .map(|terms| {
            let keywords: Vec<String> = terms.iter().map(|t| t.term.clone()).collect();
            let name = shared_word_name(&keywords).unwrap_or_else(|| keywords[0].clone());
            let total_volume: f64 = terms.iter().map(|t| t.volume).sum();
            let description = format!(
                "{} related search terms around \"{}\" totaling {:.0} monthly searches",
                terms.len(),
                name,
                total_volume
            );
            TermCluster::build(name, description, terms)
        })
        .collect()
}

/// Cluster products by category/price/rating/BSR similarity.
pub fn cluster_products_by_rules(
    records: &[ProductRecord],
    settings: &ClusterSettings,
) -> Vec<ProductCluster> {
    let groups = greedy_group(records, product_similarity, settings);

    groups
        .into_iter()
        .map(|products| {
            let name =
                dominant_category(&products).unwrap_or_else(|| "Products".to_string());
            let description = format!(
                "{} comparable products in the \"{}\" segment",
                products.len(),
                name
            );
            ProductCluster::build(name, description, products)
        })
        .collect()
}
