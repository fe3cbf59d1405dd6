//! Completion provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ModelInfo;

/// Trait for text-generation providers
///
/// The service only ever needs "prompt in, text out" plus a model listing, so
/// handlers can run against a deterministic stub in tests.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Model identifier used for generation
    fn model(&self) -> &str;

    /// Generate text for a fully composed prompt
    ///
    /// An empty string is a valid return; callers decide what it means.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Models that support content generation
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}
