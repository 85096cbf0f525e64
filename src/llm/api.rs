use anyhow::Result;
use async_trait::async_trait;

/// Text-generation capability. May fail or return malformed text; callers
/// own the fallback policy.
#[async_trait]
pub trait CompletionInterface: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
