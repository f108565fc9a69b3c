//! Chat session state machine.
//!
//! A session owns the conversation log and is the only thing that appends
//! to it. It is `Idle` or `Sending`; while `Sending`, new submissions are
//! refused rather than queued, so at most one request is ever in flight and
//! the log reads in submission order.
//!
//! A submission is split in two steps so the user's turn is visible before
//! any network traffic: [`ChatSession::begin_submit`] validates, flips to
//! `Sending` and appends the user message; [`PendingSend::complete`] performs
//! the request, appends the reply (or a failure notice) and returns to
//! `Idle`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::core::agents::AgentRegistry;
use crate::core::backend::{Backend, BackendError};
use crate::core::constants::{
    BACKEND_DIAGNOSTIC_MESSAGE, DIAGNOSTIC_MESSAGE_ID, ORCHESTRATOR_AGENT_ID,
    SEND_FAILURE_MESSAGE, WELCOME_MESSAGE, WELCOME_MESSAGE_ID,
};
use crate::core::message::{next_message_id, Message, MessageLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
}

/// Why a submission was refused. Refusals leave the log untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    Blank,
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Rejected(SubmitRejection),
    Replied(Message),
    /// The request failed; `notice` is the message appended in its place.
    Failed {
        error: BackendError,
        notice: Message,
    },
}

struct SessionInner {
    log: MessageLog,
    state: SessionState,
    input: String,
}

/// Cheap to clone; clones share the same conversation.
#[derive(Clone)]
pub struct ChatSession {
    backend: Arc<dyn Backend>,
    agents: Arc<AgentRegistry>,
    user_id: Arc<str>,
    inner: Arc<Mutex<SessionInner>>,
}

impl ChatSession {
    /// Probe the backend, load the agent registry and open the conversation.
    ///
    /// The probe and the registry load run concurrently. The log always
    /// starts with exactly one message: the orchestrator's welcome, or a
    /// setup diagnostic when the registry could not be loaded.
    pub async fn initialize(backend: Arc<dyn Backend>, user_id: impl Into<String>) -> Self {
        let (connected, loaded) =
            tokio::join!(backend.probe(), AgentRegistry::load(backend.as_ref()));
        debug!(connected, "Initial connectivity probe finished");

        let (agents, opening) = match loaded {
            Ok(agents) => (
                agents,
                Message::local_agent(
                    WELCOME_MESSAGE_ID,
                    Some(ORCHESTRATOR_AGENT_ID),
                    WELCOME_MESSAGE,
                ),
            ),
            Err(err) => {
                warn!(error = %err, "Failed to initialize chat; showing backend diagnostic");
                (
                    AgentRegistry::empty(),
                    Message::local_agent(
                        DIAGNOSTIC_MESSAGE_ID,
                        Some(ORCHESTRATOR_AGENT_ID),
                        BACKEND_DIAGNOSTIC_MESSAGE,
                    ),
                )
            }
        };

        let mut log = MessageLog::new();
        log.push(opening);

        Self {
            backend,
            agents: Arc::new(agents),
            user_id: Arc::from(user_id.into()),
            inner: Arc::new(Mutex::new(SessionInner {
                log,
                state: SessionState::Idle,
                input: String::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn is_sending(&self) -> bool {
        self.state() == SessionState::Sending
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().log.as_slice().to_vec()
    }

    /// Messages appended after the first `offset`.
    pub fn messages_since(&self, offset: usize) -> Vec<Message> {
        self.lock().log.since(offset).to_vec()
    }

    pub fn message_count(&self) -> usize {
        self.lock().log.len()
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Last known backend reachability.
    pub fn is_connected(&self) -> bool {
        self.backend.is_available()
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    /// Submit whatever is in the pending input buffer.
    pub fn begin_submit_input(&self) -> Result<PendingSend, SubmitRejection> {
        let text = self.input();
        self.begin_submit(&text)
    }

    /// Validate `text`, enter `Sending`, append the user's turn and clear the
    /// input buffer. No request is issued until the returned
    /// [`PendingSend`] is completed.
    pub fn begin_submit(&self, text: &str) -> Result<PendingSend, SubmitRejection> {
        let mut inner = self.lock();
        if text.trim().is_empty() {
            return Err(SubmitRejection::Blank);
        }
        if inner.state == SessionState::Sending {
            debug!("Submission refused while a reply is outstanding");
            return Err(SubmitRejection::Busy);
        }

        inner.state = SessionState::Sending;
        let user_message = Message::user(text);
        inner.log.push(user_message.clone());
        inner.input.clear();
        drop(inner);

        Ok(PendingSend {
            session: self.clone(),
            text: text.to_string(),
            user_message,
            finished: false,
        })
    }

    /// [`begin_submit`](Self::begin_submit) followed by
    /// [`PendingSend::complete`].
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        match self.begin_submit(text) {
            Ok(pending) => pending.complete().await,
            Err(rejection) => SubmitOutcome::Rejected(rejection),
        }
    }
}

fn failure_notice() -> Message {
    Message::local_agent(next_message_id("error"), None, SEND_FAILURE_MESSAGE)
}

/// A submission whose user turn is already in the log.
///
/// Only dropped uncompleted at shutdown, when the send task is aborted. The
/// user turn still gets the failure notice so it never goes unanswered, and
/// the session returns to `Idle`.
#[must_use = "the request is only sent when the pending send is completed"]
pub struct PendingSend {
    session: ChatSession,
    text: String,
    user_message: Message,
    finished: bool,
}

impl PendingSend {
    pub fn user_message(&self) -> &Message {
        &self.user_message
    }

    pub async fn complete(mut self) -> SubmitOutcome {
        let result = self
            .session
            .backend
            .send_message(&self.text, &self.session.user_id)
            .await;

        let outcome = {
            let mut inner = self.session.lock();
            let outcome = match result {
                Ok(reply) => {
                    inner.log.push(reply.clone());
                    SubmitOutcome::Replied(reply)
                }
                Err(error) => {
                    warn!(error = %error, "Chat send failed; appending failure notice");
                    let notice = failure_notice();
                    inner.log.push(notice.clone());
                    SubmitOutcome::Failed { error, notice }
                }
            };
            inner.state = SessionState::Idle;
            outcome
        };

        self.finished = true;
        outcome
    }
}

impl Drop for PendingSend {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        debug!(id = %self.user_message.id, "Pending send dropped before completing");
        let mut inner = self.session.lock();
        inner.log.push(failure_notice());
        inner.state = SessionState::Idle;
    }
}
