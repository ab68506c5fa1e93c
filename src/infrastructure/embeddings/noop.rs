use crate::domain::ports::embedding_port::EmbeddingProvider;

/// Provider used when no embedding backend is configured. Every call fails,
/// which pushes the embedding clusterer onto its keyword-bucket fallback.
pub struct NoopEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for NoopEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, String> {
        Err("no embedding provider configured".to_string())
    }

    fn dimension(&self) -> usize {
        0
    }
}
