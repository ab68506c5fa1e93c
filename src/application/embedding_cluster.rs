//! Embedding-based clusterer.
//!
//! Embeds each search term through the injected provider, runs density
//! clustering with an adaptive epsilon grid search, regroups noise points by
//! keyword bucketing, and degrades to pure bucketing when embeddings are
//! unavailable. The function never returns an empty set for non-empty input.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::buckets::bucket_by_keywords;
use crate::application::dbscan::{cluster_vectors, DensityResult};
use crate::domain::entities::cluster::{shared_word_name, ClusterTag, TermCluster};
use crate::domain::entities::search_term::SearchTermRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::ports::embedding_port::EmbeddingProvider;

/// Neighborhood radii tried in ascending order (cosine distance).
const EPSILON_GRID: &[f64] = &[0.05, 0.1, 0.15, 0.2, 0.25, 0.3, 0.4, 0.5];

/// Theme patterns matched against a cluster's combined keyword text,
/// first match wins.
const THEMES: &[(&str, &str, &str, &str)] = &[
    // (pattern, name, tag category, tag value)
    ("sleep", "Sleep Support", "Function", "Sleep"),
    ("energy", "Energy & Focus", "Function", "Energy"),
    ("immune", "Immune Support", "Function", "Immunity"),
    ("stress", "Stress & Mood", "Function", "Stress Relief"),
    ("hair", "Hair, Skin & Nails", "Function", "Beauty"),
    ("protein", "Protein & Fitness", "Function", "Fitness"),
    ("gummy", "Gummy Formats", "Format", "Gummies"),
    ("gummies", "Gummy Formats", "Format", "Gummies"),
    ("powder", "Powder Formats", "Format", "Powders"),
    ("kids", "Kids & Family", "Audience", "Kids"),
];

pub struct EmbeddingClusterUseCase {
    embedder: Arc<dyn EmbeddingProvider>,
    completer: Option<Arc<dyn CompletionProvider>>,
}

impl EmbeddingClusterUseCase {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Option<Arc<dyn CompletionProvider>>,
    ) -> Self {
        Self {
            embedder,
            completer,
        }
    }

    /// Cluster search terms over vector embeddings.
    ///
    /// Embedding calls go out one record at a time; a failed call drops that
    /// record from the embedding pool and processing continues. A provider
    /// that fails every call lands on the keyword-bucket fallback.
    pub async fn execute(
        &self,
        records: &[SearchTermRecord],
    ) -> Result<Vec<TermCluster>, DomainError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut embedded: Vec<(SearchTermRecord, Vec<f32>)> = Vec::with_capacity(records.len());
        for record in records {
            match self.embedder.embed(&record.term).await {
                Ok(vector) if !vector.is_empty() => embedded.push((record.clone(), vector)),
                Ok(_) => {
                    eprintln!("WARNING: Empty embedding for '{}', skipping", record.term);
                }
                Err(e) => {
                    eprintln!("WARNING: Embedding failed for '{}': {}", record.term, e);
                }
            }
        }

        // not enough vectors to cluster on density; degrade to bucketing
        // over the full input so non-empty input never yields nothing
        if embedded.len() < 2 {
            return Ok(self.bucket_fallback(records).await);
        }

        let vectors: Vec<Vec<f32>> = embedded.iter().map(|(_, v)| v.clone()).collect();
        let min_points = ((embedded.len() as f64 / 3.0).sqrt().floor() as usize).max(2);

        let mut best: Option<(DensityResult, i64)> = None;
        for &eps in EPSILON_GRID {
            let result = cluster_vectors(&vectors, eps, min_points);
            let noise = result.labels.iter().filter(|l| l.is_none()).count();
            let score = result.n_clusters as i64 * 10 - noise as i64;
            let improved = match &best {
                Some((_, best_score)) => score > *best_score,
                None => true,
            };
            if improved {
                best = Some((result, score));
            }
        }

        let (winner, _) = best.unwrap_or((
            DensityResult {
                labels: vec![None; embedded.len()],
                n_clusters: 0,
            },
            i64::MIN,
        ));

        if winner.n_clusters == 0 {
            return Ok(self.bucket_fallback(records).await);
        }

        let mut grouped: BTreeMap<usize, Vec<SearchTermRecord>> = BTreeMap::new();
        let mut noise: Vec<SearchTermRecord> = Vec::new();
        for ((record, _), label) in embedded.into_iter().zip(&winner.labels) {
            match label {
                Some(cluster) => grouped.entry(*cluster).or_default().push(record),
                None => noise.push(record),
            }
        }

        let mut clusters: Vec<TermCluster> = Vec::new();
        for (_, members) in grouped {
            clusters.push(self.theme_cluster(None, members).await);
        }
        for (label, members) in bucket_by_keywords(&noise) {
            clusters.push(self.theme_cluster(Some(label), members).await);
        }

        Ok(clusters)
    }

    /// Full-input keyword bucketing, used when embeddings are unavailable
    /// or density clustering finds no structure.
    async fn bucket_fallback(&self, records: &[SearchTermRecord]) -> Vec<TermCluster> {
        let mut clusters = Vec::new();
        for (label, members) in bucket_by_keywords(records) {
            clusters.push(self.theme_cluster(Some(label), members).await);
        }
        clusters
    }

    /// Name, describe, and tag a cluster from its combined keyword text,
    /// then build metrics. `bucket_label` seeds the fallback name for
    /// clusters that came out of keyword bucketing.
    async fn theme_cluster(
        &self,
        bucket_label: Option<String>,
        members: Vec<SearchTermRecord>,
    ) -> TermCluster {
        let keywords: Vec<String> = members.iter().map(|t| t.term.clone()).collect();
        let combined = keywords.join(" ").to_lowercase();

        let theme = THEMES
            .iter()
            .find(|(pattern, _, _, _)| combined.contains(pattern));

        let (name, theme_tags) = match theme {
            Some((_, name, tag_category, tag_value)) => (
                name.to_string(),
                vec![ClusterTag::new(*tag_category, *tag_value)],
            ),
            None => {
                let fallback = bucket_label
                    .or_else(|| shared_word_name(&keywords))
                    .unwrap_or_else(|| keywords[0].clone());
                (fallback, Vec::new())
            }
        };

        let mut description = format!(
            "{} search terms grouped under \"{}\", led by \"{}\"",
            members.len(),
            name,
            members[0].term
        );
        if let Some(completer) = &self.completer {
            let prompt = format!(
                "Write one sentence describing a marketplace search niche named \"{}\" \
                 covering these search terms: {}",
                name,
                keywords.join(", ")
            );
            match completer.complete(&prompt).await {
                Ok(text) if !text.trim().is_empty() => description = text.trim().to_string(),
                Ok(_) => {}
                Err(e) => {
                    eprintln!("WARNING: Description completion failed for '{name}': {e}");
                }
            }
        }

        let mut cluster = TermCluster::build(name, description, members);
        for tag in theme_tags {
            if !cluster.tags.contains(&tag) {
                cluster.tags.push(tag);
            }
        }
        cluster
    }
}
