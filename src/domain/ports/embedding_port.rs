/// Capability interface for turning text into a vector. Concrete vendors
/// live in `infrastructure::embeddings`; the core never sees an SDK.
///
/// Errors are per-call strings — a failed call means "this text has no
/// embedding", which callers treat as recoverable, never batch-fatal.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, String>;
    fn dimension(&self) -> usize;
}
