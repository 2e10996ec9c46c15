use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// DashScope client for interacting with the text-generation API
#[derive(Debug)]
pub struct DashScope {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Full generation endpoint URL
    endpoint: String,
    /// Model identifier
    model: String,
}

/// Generation request body
#[derive(Debug, Serialize)]
pub struct GenerationRequest {
    /// The model to use
    model: String,

    /// Conversation input
    input: GenerationInput,

    /// Generation parameters
    parameters: GenerationParameters,
}

/// Conversation input wrapper
#[derive(Debug, Serialize)]
pub struct GenerationInput {
    /// The messages for the conversation
    messages: Vec<DashScopeMessage>,
}

/// Generation parameters
#[derive(Debug, Serialize)]
pub struct GenerationParameters {
    /// Return the whole output at once rather than deltas
    incremental_output: bool,
}

/// DashScope message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashScopeMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Generation response.
///
/// Fields are optional so that a well-formed JSON body lacking
/// `output.text` is reported as a protocol error rather than a parse error.
#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    /// Generated output
    #[serde(default)]
    pub output: Option<GenerationOutput>,
    /// Request identifier assigned by the service
    #[serde(default)]
    pub request_id: Option<String>,
    /// Token usage information
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// Output block of a generation response
#[derive(Debug, Deserialize)]
pub struct GenerationOutput {
    /// The generated text
    #[serde(default)]
    pub text: Option<String>,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens
    #[serde(default)]
    pub input_tokens: u32,
    /// Number of output tokens
    #[serde(default)]
    pub output_tokens: u32,
}

impl GenerationRequest {
    /// Create a new request for a model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: GenerationInput { messages: Vec::new() },
            parameters: GenerationParameters {
                incremental_output: false,
            },
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.input.messages.push(DashScopeMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Messages added so far
    pub fn messages(&self) -> &[DashScopeMessage] {
        &self.input.messages
    }
}

impl DashScope {
    /// Create a new DashScope client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Send a generation request
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("X-DashScope-SSE", "disable")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DashScope API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        serde_json::from_str::<GenerationResponse>(&body)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", e, body)))
    }

    /// Extract text from a generation response
    pub fn extract_text(response: &GenerationResponse) -> Result<String, ProviderError> {
        response
            .output
            .as_ref()
            .and_then(|output| output.text.clone())
            .ok_or_else(|| {
                ProviderError::MalformedResponse(format!(
                    "missing output.text (request id: {})",
                    response.request_id.as_deref().unwrap_or("unknown")
                ))
            })
    }
}

#[async_trait]
impl Provider for DashScope {
    async fn complete(&self, system_prompt: &str, text: &str) -> Result<String, ProviderError> {
        let request = GenerationRequest::new(&self.model)
            .add_message("system", system_prompt)
            .add_message("user", text);

        let response = self.generate(&request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                "DashScope usage: {} input tokens, {} output tokens",
                usage.input_tokens, usage.output_tokens
            );
        }

        Self::extract_text(&response)
    }
}
