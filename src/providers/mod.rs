/*!
 * Provider implementations for translation services.
 *
 * This module contains client implementations for LLM providers:
 * - DashScope: Alibaba Cloud text-generation API
 * - Mock: in-process provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a single system + user exchange
    ///
    /// # Arguments
    /// * `system_prompt` - Instruction describing the translation task
    /// * `text` - The full document text to translate
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The generated text or an error
    async fn complete(&self, system_prompt: &str, text: &str) -> Result<String, ProviderError>;
}

pub mod dashscope;
pub mod mock;
