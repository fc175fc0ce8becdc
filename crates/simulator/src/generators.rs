//! Text generators for the command-line driver.
//!
//! [`OllamaGenerator`] calls a local Ollama server's `/api/generate`
//! endpoint with the bot persona as the system prompt. [`OfflineGenerator`]
//! produces canned lines for dry runs without a model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use townsim_simulation::{ProviderError, TextGenerator};
use tracing::{debug, warn};

/// Where to reach Ollama and which model to ask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "gemma3:1b".to_string(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Non-streaming completions from an Ollama server.
pub struct OllamaGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaGenerator {
    /// Build a generator whose HTTP requests give up after `timeout`.
    pub fn new(config: &OllamaConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::Generation(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/generate", config.url.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn request_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Generation(error.to_string())
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, persona: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            system: persona,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, model = %self.model, "Ollama request rejected");
            return Err(ProviderError::Generation(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(request_error)?;
        debug!(model = %self.model, chars = body.response.len(), "Generated response");
        Ok(body.response)
    }
}

const REACTIONS: &[&str] = &[
    "Okay, everyone stay calm. Does anyone know where the nearest shelter is?",
    "I need to call my family first, then we should figure out a plan together.",
    "I've been through one of these before. Grab water and anything you can't replace.",
    "Is this for real? The sky looked fine an hour ago.",
    "My car is outside. I can take a few people if we leave soon.",
];

const REPLIES: &[&str] = &[
    "That's a good point. Let's stick together instead of splitting up.",
    "I hear you, but the roads will be jammed. We should move now.",
    "Has anyone checked on the older folks down the street?",
    "I'll stay and help board up the windows, then I'm heading inland.",
    "We need a meeting point in case phones go down.",
];

/// Canned responses, cycled in call order.
///
/// Alert prompts draw from one set of lines and round prompts from another,
/// so transcripts read plausibly without a model.
#[derive(Debug, Default)]
pub struct OfflineGenerator {
    calls: AtomicUsize,
}

impl OfflineGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, prompt: &str, _persona: &str) -> Result<String, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let lines = if prompt.contains("emergency alert") {
            REACTIONS
        } else {
            REPLIES
        };
        Ok(lines[call % lines.len()].to_string())
    }
}
