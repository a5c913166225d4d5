//! GenerationSession: one cover letter generation, from submission to a
//! terminal state.
//!
//! ```text
//! Idle ──run──▶ Submitting ──headers──▶ Streaming ──end──▶ Completed
//!   │               │                       │
//!   └─validation────┴──────transport────────┴────────────▶ Failed
//! ```
//!
//! Completed and Failed are terminal. A new submission needs a new session.

use futures::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::client::decoder::decode_chunks;
use crate::client::history::HistoryStore;
use crate::client::transport::GenerationTransport;
use crate::models::application::Application;
use crate::models::generation::{FitScore, GenerateRequest, MISSING_INPUTS_MESSAGE};

/// User-facing session failures. Causes are logged, never carried here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{}", MISSING_INPUTS_MESSAGE)]
    Validation,

    #[error("Error generating cover letter. Please try again.")]
    Generation,

    #[error("This generation has already run")]
    AlreadyStarted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Submitting,
    Streaming { fit_score: FitScore },
    /// `application` is `None` when the stream ended without any text.
    Completed { application: Option<Application> },
    Failed(SessionError),
}

/// Notifications published to subscribers, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    State(SessionState),
    /// A non-empty fragment of cover letter text, in stream order.
    Delta(String),
}

pub struct GenerationSession {
    request: GenerateRequest,
    state: SessionState,
    text: String,
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl GenerationSession {
    pub fn new(request: GenerateRequest) -> Self {
        Self {
            request,
            state: SessionState::Idle,
            text: String::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Text accumulated so far. Cleared if the stream fails.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Registers an observer. The channel closes when the session is dropped.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Drives the session to a terminal state.
    ///
    /// Returns the recorded application, `None` for an empty generation, or
    /// the user-facing error. Only a successful, non-empty generation touches
    /// `history`.
    pub async fn run(
        &mut self,
        transport: &dyn GenerationTransport,
        history: &mut HistoryStore,
    ) -> Result<Option<Application>, SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyStarted);
        }

        if !self.request.has_required_inputs() {
            return Err(self.fail(SessionError::Validation));
        }

        self.transition(SessionState::Submitting);
        let response = match transport.submit(&self.request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Generation request failed: {e}");
                return Err(self.fail(SessionError::Generation));
            }
        };

        let fit_score = FitScore::from_header(response.fit_score_header.as_deref());
        self.transition(SessionState::Streaming { fit_score });

        let mut events = Box::pin(decode_chunks(response.body));
        while let Some(event) = events.next().await {
            match event {
                Ok(chunk) if chunk.delta_text.is_empty() => {}
                Ok(chunk) => {
                    self.text.push_str(&chunk.delta_text);
                    self.publish(SessionEvent::Delta(chunk.delta_text));
                }
                Err(e) => {
                    error!(
                        "Generation stream failed after {} chars, discarding: {e}",
                        self.text.len()
                    );
                    self.text.clear();
                    return Err(self.fail(SessionError::Generation));
                }
            }
        }

        if self.text.is_empty() {
            info!("Generation finished with no text; nothing recorded");
            self.transition(SessionState::Completed { application: None });
            return Ok(None);
        }

        let application = Application::new(&self.request, self.text.clone(), fit_score);
        if let Err(e) = history.append(application.clone()) {
            warn!("Could not persist history, keeping it in memory: {e}");
        }

        self.transition(SessionState::Completed {
            application: Some(application.clone()),
        });
        Ok(Some(application))
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        self.transition(SessionState::Failed(err.clone()));
        err
    }

    fn transition(&mut self, state: SessionState) {
        self.state = state.clone();
        self.publish(SessionEvent::State(state));
    }

    fn publish(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
