/*!
 * Mock provider implementation for testing.
 *
 * - `MockProvider::working()` - Always succeeds, tagging the input text
 * - `MockProvider::failing()` - Always fails with a connection error
 * - `MockProvider::malformed()` - Answers without an output field
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[TRANSLATED] <text>`
    Working,
    /// Always returns the given text
    Fixed(String),
    /// Always fails with a transport error
    Failing,
    /// Returns a body without `output.text`
    Malformed,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of completed calls
    request_count: Arc<AtomicUsize>,
    /// Texts received, in call order
    received: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that answers every request with the same text
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fixed(text.into()))
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock whose responses lack the output field
    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    /// Number of calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts sent for translation so far
    pub fn received(&self) -> Vec<String> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, _system_prompt: &str, text: &str) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.push(text.to_string());
        }

        match &self.behavior {
            MockBehavior::Working => Ok(format!("[TRANSLATED] {}", text)),
            MockBehavior::Fixed(answer) => Ok(answer.clone()),
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Mock connection failure".to_string(),
            )),
            MockBehavior::Malformed => Err(ProviderError::MalformedResponse(
                "missing output.text".to_string(),
            )),
        }
    }
}
