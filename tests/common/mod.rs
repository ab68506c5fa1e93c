//! Shared test helpers and mock providers.

#![allow(dead_code)]

use std::collections::HashMap;

use nichelens::domain::entities::product::ProductRecord;
use nichelens::domain::entities::search_term::SearchTermRecord;
use nichelens::domain::ports::completion_port::CompletionProvider;
use nichelens::domain::ports::embedding_port::EmbeddingProvider;

pub fn make_term(term: &str, volume: f64) -> SearchTermRecord {
    SearchTermRecord::new(term, volume)
}

pub fn make_product(
    name: &str,
    brand: Option<&str>,
    price: Option<f64>,
    rating: Option<f64>,
    market_share: Option<f64>,
    category: Option<&str>,
) -> ProductRecord {
    let mut p = ProductRecord::new(name);
    p.brand = brand.map(str::to_string);
    p.price = price;
    p.rating = rating;
    p.market_share = market_share;
    p.category = category.map(str::to_string);
    p
}

/// Returns a fixed vector per known term, errors on unknown terms.
pub struct StubEmbedder {
    pub vectors: HashMap<String, Vec<f32>>,
}

impl StubEmbedder {
    pub fn new(entries: Vec<(&str, Vec<f32>)>) -> Self {
        Self {
            vectors: entries
                .into_iter()
                .map(|(t, v)| (t.to_string(), v))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, String> {
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| format!("no stub vector for '{text}'"))
    }

    fn dimension(&self) -> usize {
        2
    }
}

/// Fails every call — models a total provider outage.
pub struct FailingEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, String> {
        Err("provider unreachable".to_string())
    }

    fn dimension(&self) -> usize {
        0
    }
}

/// Always returns the same completion text.
pub struct StaticCompleter(pub String);

#[async_trait::async_trait]
impl CompletionProvider for StaticCompleter {
    async fn complete(&self, _prompt: &str) -> Result<String, String> {
        Ok(self.0.clone())
    }
}

/// Fails every completion call.
pub struct FailingCompleter;

#[async_trait::async_trait]
impl CompletionProvider for FailingCompleter {
    async fn complete(&self, _prompt: &str) -> Result<String, String> {
        Err("completion unavailable".to_string())
    }
}
