/// Optional capability interface for text completion, used to polish cluster
/// descriptions. A failure falls back to the templated description.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, String>;
}
