//! Session state types

use crate::transcript::{Message, Transcript};
use serde::Serialize;

/// Whether the chat panel is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    #[default]
    Closed,
    Open,
}

/// The one remote call a session may have outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOp {
    /// Fetching the opening greeting
    Start,
    /// Waiting for the reply to the last user message
    Send,
    /// Asking the service to forget the conversation
    Clear,
    /// Fetching a fresh greeting after a successful clear
    Restart,
}

/// Complete mutable state of one chat session.
///
/// Only the session runtime holds one of these; everyone else sees
/// [`SessionSnapshot`]s.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub status: ChatStatus,
    pub pending: Option<PendingOp>,
    pub transcript: Transcript,
    pub draft: String,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == ChatStatus::Open
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            pending: self.is_pending(),
            pending_op: self.pending,
            transcript: self.transcript.snapshot(),
            draft: self.draft.clone(),
        }
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionSnapshot {
    pub status: ChatStatus,
    pub pending: bool,
    pub pending_op: Option<PendingOp>,
    pub transcript: Vec<Message>,
    pub draft: String,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == ChatStatus::Open
    }
}
