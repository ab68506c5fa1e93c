pub mod application;
pub mod domain;
pub mod infrastructure;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::embedding_cluster::EmbeddingClusterUseCase;
use crate::application::insights::{generate_insights, InsightBundle};
use crate::application::rule_cluster::{
    cluster_products_by_rules, cluster_terms_by_rules, ClusterSettings,
};
use crate::application::tagging::apply_tags;
use crate::domain::entities::cluster::{ProductCluster, TermCluster};
use crate::domain::entities::product::ProductRecord;
use crate::domain::entities::search_term::SearchTermRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::tag_rule::TagRule;
use crate::infrastructure::completions::openai::OpenAiCompleter;
use crate::infrastructure::embeddings::noop::NoopEmbedder;
use crate::infrastructure::embeddings::openai::OpenAiEmbedder;

/// How search terms should be grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterMode {
    Rules,
    Embedding,
}

/// Facade over the clustering and scoring engine. Holds no state beyond the
/// injected providers — every call computes fresh from caller-supplied rows,
/// and persistence of results is the caller's responsibility.
pub struct NicheLens {
    embed_cluster_uc: EmbeddingClusterUseCase,
}

impl NicheLens {
    /// Build from environment configuration:
    /// `NICHELENS_EMBEDDING_PROVIDER` (`openai` | `noop`, default `noop`),
    /// `NICHELENS_API_KEY`, `NICHELENS_EMBEDDING_MODEL`,
    /// `NICHELENS_COMPLETION_MODEL` (completion polish only when `openai`).
    pub fn new() -> Self {
        let provider =
            std::env::var("NICHELENS_EMBEDDING_PROVIDER").unwrap_or_else(|_| "noop".into());
        let api_key = std::env::var("NICHELENS_API_KEY").unwrap_or_default();
        let embed_model = std::env::var("NICHELENS_EMBEDDING_MODEL").ok();
        let completion_model = std::env::var("NICHELENS_COMPLETION_MODEL").ok();

        let (embedder, completer): (
            Arc<dyn EmbeddingProvider>,
            Option<Arc<dyn CompletionProvider>>,
        ) = match provider.as_str() {
            "openai" => {
                let completer: Arc<dyn CompletionProvider> =
                    Arc::new(OpenAiCompleter::new(api_key.clone(), completion_model));
                (
                    Arc::new(OpenAiEmbedder::new(api_key, embed_model)),
                    Some(completer),
                )
            }
            _ => (Arc::new(NoopEmbedder), None),
        };

        Self::with_providers(embedder, completer)
    }

    pub fn with_providers(
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Option<Arc<dyn CompletionProvider>>,
    ) -> Self {
        Self {
            embed_cluster_uc: EmbeddingClusterUseCase::new(embedder, completer),
        }
    }

    /// Tag free text against a caller-supplied trigger-word ontology.
    pub fn tag_record(&self, text: &str, rules: &[TagRule]) -> BTreeMap<String, Vec<String>> {
        apply_tags(text, rules)
    }

    /// Group search terms into clusters. Rules mode is fully synchronous
    /// and deterministic; embedding mode calls the injected provider and
    /// degrades to keyword bucketing when embeddings are unavailable.
    pub async fn cluster_search_terms(
        &self,
        records: &[SearchTermRecord],
        mode: ClusterMode,
        settings: &ClusterSettings,
    ) -> Result<Vec<TermCluster>, DomainError> {
        settings.validate()?;
        match mode {
            ClusterMode::Rules => Ok(cluster_terms_by_rules(records, settings)),
            ClusterMode::Embedding => self.embed_cluster_uc.execute(records).await,
        }
    }

    /// Group products into clusters by attribute similarity.
    pub fn cluster_products(
        &self,
        records: &[ProductRecord],
        settings: &ClusterSettings,
    ) -> Result<Vec<ProductCluster>, DomainError> {
        settings.validate()?;
        Ok(cluster_products_by_rules(records, settings))
    }

    /// Correlate search-term clusters against product clusters into
    /// opportunity, competition, and trend reports.
    pub fn generate_insights(
        &self,
        term_clusters: &[TermCluster],
        product_clusters: &[ProductCluster],
    ) -> InsightBundle {
        generate_insights(term_clusters, product_clusters)
    }
}

impl Default for NicheLens {
    fn default() -> Self {
        Self::new()
    }
}
