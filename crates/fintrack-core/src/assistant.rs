//! Insight assistant
//!
//! Orchestrates grounded chat conversations and on-demand insight
//! synthesis. Each conversation session is a small explicit state machine:
//!
//! ```text
//! Idle → AwaitingResponse → (Streaming → Idle) | (Error → Idle)
//! ```
//!
//! A session is single-writer: at most one turn is in flight, and a second
//! message submitted while a turn is running is rejected. Streamed content
//! reaches the caller through a bounded channel, so a consumer that stalls
//! exerts backpressure instead of growing a buffer, and one that disappears
//! aborts the turn. Cancellation is cooperative: it is observed at the next
//! streaming step, discards the partial assistant message, and returns the
//! session to `Idle`. A failed turn surfaces the error, leaves no trace in
//! the history, and is never retried internally.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ai::{AIClient, ChatBackend, ChatStream};
use crate::clock::Clock;
use crate::engine::AnalyticsEngine;
use crate::error::{Error, Result};
use crate::insights::InsightEngine;
use crate::models::{AIInsight, ChatMessage, ChatRole};

/// Bound on undelivered events between a turn task and the caller
const EVENT_BUFFER: usize = 32;

/// Conversation session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready to accept a user message
    Idle,
    /// Turn accepted, waiting for the first generated content
    AwaitingResponse,
    /// Partial content is flowing to the caller
    Streaming,
    /// A turn failed; transient, auto-resets to Idle
    Error,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingResponse => "awaiting_response",
            Self::Streaming => "streaming",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events delivered to the caller over the course of one turn
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A piece of partial assistant content
    Delta(String),
    /// The turn finished; the message is now in the history
    Completed(ChatMessage),
    /// The turn was cancelled; partial content was discarded
    Cancelled,
    /// The turn failed; nothing was appended to the history
    Failed { message: String, retryable: bool },
}

/// The insight assistant: chat orchestration plus insight synthesis
pub struct InsightAssistant {
    engine: Arc<AnalyticsEngine>,
    ai: Arc<AIClient>,
    insights: InsightEngine,
}

impl InsightAssistant {
    pub fn new(engine: Arc<AnalyticsEngine>, ai: AIClient) -> Self {
        Self {
            engine,
            ai: Arc::new(ai),
            insights: InsightEngine::new(),
        }
    }

    /// Open a conversation session for one owner
    pub fn session(&self, owner: Uuid) -> ChatSession {
        ChatSession {
            id: Uuid::new_v4(),
            owner,
            engine: self.engine.clone(),
            ai: self.ai.clone(),
            shared: Arc::new(Mutex::new(SessionShared {
                state: SessionState::Idle,
                history: Vec::new(),
                cancel: None,
            })),
        }
    }

    /// Synthesize ranked insights from the grounding snapshot alone.
    ///
    /// Independent of any chat session or history.
    pub fn generate_insights(&self, owner: Uuid) -> Result<Vec<AIInsight>> {
        let ctx = self.engine.grounding_context(owner)?;
        Ok(self.insights.generate(&ctx, self.engine.clock().now()))
    }

    /// Check whether the language-generation backend is reachable
    pub async fn health_check(&self) -> bool {
        self.ai.health_check().await
    }
}

struct SessionShared {
    state: SessionState,
    history: Vec<ChatMessage>,
    /// Cancellation flag for the in-flight turn, if any
    cancel: Option<watch::Sender<bool>>,
}

/// One conversation, owned by a single user and client context
pub struct ChatSession {
    id: Uuid,
    owner: Uuid,
    engine: Arc<AnalyticsEngine>,
    ai: Arc<AIClient>,
    shared: Arc<Mutex<SessionShared>>,
}

impl ChatSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Snapshot of the append-only message history
    pub fn history(&self) -> Vec<ChatMessage> {
        self.lock().history.clone()
    }

    /// Submit a user message and stream the assistant's response.
    ///
    /// Accepted only in `Idle`; a second message while a turn is in flight
    /// is rejected with `Error::SessionBusy`. On acceptance the message is
    /// appended to the history and the grounding snapshot is assembled from
    /// the latest records.
    pub async fn submit(&self, text: &str) -> Result<mpsc::Receiver<ChatEvent>> {
        let now = self.engine.clock().now();
        {
            let mut shared = self.lock();
            if shared.state != SessionState::Idle {
                return Err(Error::SessionBusy(format!(
                    "session {} is {}",
                    self.id, shared.state
                )));
            }
            shared.state = SessionState::AwaitingResponse;
            shared.history.push(ChatMessage::user(text, now));
        }
        debug!(session = %self.id, "Chat turn accepted");

        // Ground the turn and open the upstream stream; any failure here
        // rolls the whole turn back before the caller sees a stream
        let upstream = match self.open_stream().await {
            Ok(stream) => stream,
            Err(e) => {
                fail_turn(&self.shared, self.id, &e);
                return Err(e);
            }
        };

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        self.lock().cancel = Some(cancel_tx);

        let turn = TurnTask {
            session_id: self.id,
            shared: self.shared.clone(),
            clock: self.engine.clock().clone(),
        };
        tokio::spawn(turn.run(upstream, cancel_rx, events_tx));

        Ok(events_rx)
    }

    /// Request cancellation of the in-flight turn, if any.
    ///
    /// Cooperative: observed at the next streaming step. The upstream call
    /// is released, but the service itself may keep generating.
    pub fn cancel(&self) {
        let shared = self.lock();
        if let Some(cancel) = &shared.cancel {
            info!(session = %self.id, state = %shared.state, "Cancellation requested");
            let _ = cancel.send(true);
        }
    }

    async fn open_stream(&self) -> Result<ChatStream> {
        let ctx = self.engine.grounding_context(self.owner)?;
        let system = ctx.render_system_prompt();
        let history = self.lock().history.clone();
        self.ai.generate(&system, &history).await
    }

    fn lock(&self) -> MutexGuard<'_, SessionShared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Roll a failed turn back: pass through `Error`, drop the turn's user
/// message so a caller retry doesn't duplicate it, and reset to `Idle`
fn fail_turn(shared: &Arc<Mutex<SessionShared>>, session_id: Uuid, error: &Error) {
    let mut shared = shared.lock().unwrap_or_else(|e| e.into_inner());
    shared.state = SessionState::Error;
    warn!(session = %session_id, error = %error, "Chat turn failed");
    if matches!(shared.history.last(), Some(m) if m.role == ChatRole::User) {
        shared.history.pop();
    }
    shared.cancel = None;
    shared.state = SessionState::Idle;
}

struct TurnTask {
    session_id: Uuid,
    shared: Arc<Mutex<SessionShared>>,
    clock: Arc<dyn Clock>,
}

impl TurnTask {
    async fn run(
        self,
        mut upstream: ChatStream,
        mut cancel: watch::Receiver<bool>,
        events: mpsc::Sender<ChatEvent>,
    ) {
        let mut content = String::new();

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_ok() && *cancel.borrow() {
                        self.finish_cancelled();
                        let _ = events.send(ChatEvent::Cancelled).await;
                        return;
                    }
                }
                chunk = upstream.recv() => match chunk {
                    Some(Ok(delta)) => {
                        self.mark_streaming();
                        content.push_str(&delta);
                        if events.send(ChatEvent::Delta(delta)).await.is_err() {
                            // The caller stopped consuming; abandon the turn
                            // rather than buffer unbounded output
                            warn!(session = %self.session_id, "Event receiver dropped, abandoning turn");
                            self.finish_cancelled();
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        fail_turn(&self.shared, self.session_id, &e);
                        let _ = events
                            .send(ChatEvent::Failed {
                                message: e.to_string(),
                                retryable: e.is_retryable(),
                            })
                            .await;
                        return;
                    }
                    None => {
                        let message = self.finish_completed(content);
                        let _ = events.send(ChatEvent::Completed(message)).await;
                        return;
                    }
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionShared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn mark_streaming(&self) {
        let mut shared = self.lock();
        if shared.state == SessionState::AwaitingResponse {
            shared.state = SessionState::Streaming;
            debug!(session = %self.session_id, "Streaming started");
        }
    }

    /// Discard partial content and return to Idle; the user message stays
    fn finish_cancelled(&self) {
        let mut shared = self.lock();
        shared.cancel = None;
        shared.state = SessionState::Idle;
        info!(session = %self.session_id, "Turn cancelled, partial content discarded");
    }

    fn finish_completed(&self, content: String) -> ChatMessage {
        let message = ChatMessage::assistant(content, self.clock.now());
        let mut shared = self.lock();
        shared.history.push(message.clone());
        shared.cancel = None;
        shared.state = SessionState::Idle;
        debug!(session = %self.session_id, "Turn completed");
        message
    }
}
