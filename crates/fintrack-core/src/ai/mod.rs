//! Pluggable language-generation backend abstraction
//!
//! This module provides a backend-agnostic interface for the chat
//! assistant's language generation.
//!
//! # Architecture
//!
//! - `ChatBackend` trait: defines the streaming generation interface
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-2.0-flash)
//! - `GEMINI_HOST`: API host override (default: Google's endpoint)

mod gemini;
mod mock;

pub use gemini::GeminiBackend;
pub use mock::{MockBackend, MockFailure};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::models::ChatMessage;

/// Incremental content deltas from a generation call.
///
/// The channel is bounded: a slow consumer exerts backpressure on the
/// producer instead of growing a buffer.
pub type ChatStream = mpsc::Receiver<Result<String>>;

/// Bound on in-flight deltas between backend and session
pub(crate) const STREAM_BUFFER: usize = 32;

/// Trait defining the interface for language-generation backends
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Start a generation call for the grounding prompt and message history,
    /// returning a stream of content deltas
    async fn generate(&self, system: &str, history: &[ChatMessage]) -> Result<ChatStream>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Gemini backend (HTTP SSE streaming)
    Gemini(GeminiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `gemini` (default): Uses GEMINI_API_KEY, GEMINI_MODEL, GEMINI_HOST
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" => GeminiBackend::from_env().map(AIClient::Gemini),
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(AIClient::Gemini)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::Gemini(b) => AIClient::Gemini(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }
}

#[async_trait]
impl ChatBackend for AIClient {
    async fn generate(&self, system: &str, history: &[ChatMessage]) -> Result<ChatStream> {
        match self {
            AIClient::Gemini(b) => b.generate(system, history).await,
            AIClient::Mock(b) => b.generate(system, history).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
