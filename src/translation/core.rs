/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which sends a whole
 * document to a provider under a fixed system instruction and validates
 * the answer. Failures are final; nothing is retried.
 */

use log::debug;
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::dashscope::DashScope;

/// Translates documents through a provider
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Provider performing the completion
    provider: Arc<dyn Provider>,

    /// Instruction sent with every document
    system_prompt: String,
}

impl TranslationService {
    /// Create a service from an explicit provider and instruction
    pub fn new(provider: Arc<dyn Provider>, system_prompt: impl Into<String>) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
        }
    }

    /// Create a DashScope-backed service from the application configuration
    pub fn from_config(config: &Config) -> Self {
        let provider = DashScope::new(
            config.translation.api_key.clone(),
            config.translation.endpoint.clone(),
            config.translation.model.clone(),
            config.translation.timeout_secs,
        );
        Self::new(Arc::new(provider), config.system_prompt())
    }

    /// The instruction sent with every request
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Translate a full document
    pub async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let start = Instant::now();
        let translated = self.provider.complete(&self.system_prompt, text).await?;

        debug!(
            "Translated {} chars into {} chars in {:.1}s",
            text.chars().count(),
            translated.chars().count(),
            start.elapsed().as_secs_f64()
        );

        if translated.trim().is_empty() && !text.trim().is_empty() {
            return Err(TranslationError::EmptyTranslation);
        }

        Ok(translated)
    }
}
