//! Gemini backend implementation
//!
//! HTTP client for the Gemini generateContent API. Streams responses over
//! SSE (`streamGenerateContent?alt=sse`) so partial content reaches the
//! session as it is produced.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{ChatMessage, ChatRole};

use super::{ChatBackend, ChatStream, STREAM_BUFFER};

const DEFAULT_HOST: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini streaming backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let host = std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        Some(Self::new(&host, &api_key, &model))
    }
}

/// Request to the generateContent API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: SystemInstruction,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}

/// One SSE payload from the streaming endpoint
#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl StreamChunk {
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn to_contents(history: &[ChatMessage]) -> Vec<Content> {
    history
        .iter()
        .map(|m| Content {
            role: match m.role {
                ChatRole::User => "user".to_string(),
                ChatRole::Assistant => "model".to_string(),
            },
            parts: vec![Part {
                text: m.content.clone(),
            }],
        })
        .collect()
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    async fn generate(&self, system: &str, history: &[ChatMessage]) -> Result<ChatStream> {
        let request = GenerateRequest {
            contents: to_contents(history),
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system.to_string(),
                }],
            },
            generation_config: GenerationConfig::default(),
        };

        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, self.api_key
        );

        let mut response = self.http_client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Quota exhaustion and malformed payloads are not retryable;
            // server-side trouble is
            return Err(if status.is_client_error() {
                Error::ServiceTerminal(format!("gemini returned {}: {}", status, body))
            } else {
                Error::Service(format!("gemini returned {}: {}", status, body))
            });
        }

        debug!(model = %self.model, "Gemini stream opened");

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(async move {
            let mut buf = String::new();
            loop {
                match response.chunk().await {
                    Ok(Some(bytes)) => {
                        buf.push_str(&String::from_utf8_lossy(&bytes));
                        while let Some(pos) = buf.find('\n') {
                            let line = buf[..pos].trim().to_string();
                            buf.drain(..=pos);
                            let Some(payload) = line.strip_prefix("data:") else {
                                continue;
                            };
                            let payload = payload.trim();
                            if payload.is_empty() {
                                continue;
                            }
                            match serde_json::from_str::<StreamChunk>(payload) {
                                Ok(chunk) => {
                                    if let Some(text) = chunk.text() {
                                        if tx.send(Ok(text)).await.is_err() {
                                            // Receiver gone: the turn was
                                            // cancelled or abandoned
                                            return;
                                        }
                                    }
                                }
                                Err(e) => {
                                    warn!(error = %e, "Malformed Gemini stream payload");
                                    let _ = tx
                                        .send(Err(Error::ServiceTerminal(format!(
                                            "malformed stream payload: {}",
                                            e
                                        ))))
                                        .await;
                                    return;
                                }
                            }
                        }
                    }
                    Ok(None) => return,
                    Err(e) => {
                        let _ = tx
                            .send(Err(Error::Service(format!("stream read failed: {}", e))))
                            .await;
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1beta/models?key={}", self.base_url, self.api_key);
        match self.http_client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
