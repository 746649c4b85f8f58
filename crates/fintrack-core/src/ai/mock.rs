//! Mock backend for testing
//!
//! Streams scripted chunks with configurable pacing and failure modes.
//! Useful for unit tests and development without an API key.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::models::ChatMessage;

use super::{ChatBackend, ChatStream, STREAM_BUFFER};

/// Where a scripted failure happens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// The generate call itself fails (transient)
    BeforeStream,
    /// The generate call fails terminally (quota, malformed payload)
    Terminal,
    /// One chunk arrives, then the stream errors (transient)
    MidStream,
}

/// Mock language-generation backend
#[derive(Clone)]
pub struct MockBackend {
    chunks: Vec<String>,
    chunk_delay: Option<Duration>,
    failure: Option<MockFailure>,
    healthy: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a mock that streams a short canned reply
    pub fn new() -> Self {
        Self {
            chunks: vec![
                "Based on your spending, ".to_string(),
                "you're in decent shape. ".to_string(),
                "Consider topping up your goal this week.".to_string(),
            ],
            chunk_delay: None,
            failure: None,
            healthy: true,
        }
    }

    /// Replace the scripted chunks
    pub fn with_chunks(mut self, chunks: Vec<&str>) -> Self {
        self.chunks = chunks.into_iter().map(String::from).collect();
        self
    }

    /// Pause between chunks so tests can act mid-stream
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    /// Fail with the given mode
    pub fn failing(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn generate(&self, _system: &str, _history: &[ChatMessage]) -> Result<ChatStream> {
        match self.failure {
            Some(MockFailure::BeforeStream) => {
                return Err(Error::Service("mock transport failure".into()));
            }
            Some(MockFailure::Terminal) => {
                return Err(Error::ServiceTerminal("mock quota exhausted".into()));
            }
            _ => {}
        }

        let chunks = self.chunks.clone();
        let delay = self.chunk_delay;
        let mid_stream_failure = self.failure == Some(MockFailure::MidStream);

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(async move {
            for (i, chunk) in chunks.into_iter().enumerate() {
                if mid_stream_failure && i == 1 {
                    let _ = tx
                        .send(Err(Error::Service("mock stream dropped".into())))
                        .await;
                    return;
                }
                if tx.send(Ok(chunk)).await.is_err() {
                    return;
                }
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
            }
        });

        Ok(rx)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_streams_scripted_chunks() {
        let mock = MockBackend::new().with_chunks(vec!["a", "b", "c"]);
        let mut stream = mock.generate("", &[]).await.unwrap();

        let mut collected = String::new();
        while let Some(chunk) = stream.recv().await {
            collected.push_str(&chunk.unwrap());
        }
        assert_eq!(collected, "abc");
    }

    #[tokio::test]
    async fn test_mock_before_stream_failure() {
        let mock = MockBackend::new().failing(MockFailure::BeforeStream);
        let err = mock.generate("", &[]).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_mock_terminal_failure() {
        let mock = MockBackend::new().failing(MockFailure::Terminal);
        let err = mock.generate("", &[]).await.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_mock_mid_stream_failure() {
        let mock = MockBackend::new().failing(MockFailure::MidStream);
        let mut stream = mock.generate("", &[]).await.unwrap();

        assert!(stream.recv().await.unwrap().is_ok());
        assert!(stream.recv().await.unwrap().is_err());
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_mock_health() {
        assert!(MockBackend::new().health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
