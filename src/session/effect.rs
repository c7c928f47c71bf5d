//! Effects produced by state transitions

use super::state::PendingOp;
use crate::assistant::{AssistantError, AssistantErrorKind};
use crate::transcript::MessageText;
use serde::Serialize;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the assistant for a greeting
    RequestStart,

    /// Send a user message to the assistant
    RequestSend { text: MessageText },

    /// Ask the assistant to drop its memory
    RequestClear,

    /// Emit a transient notice to the presentation layer
    Notify(SessionNotice),

    /// Wake snapshot subscribers
    PublishSnapshot,
}

impl Effect {
    #[must_use]
    pub fn request_failed(operation: PendingOp, error: AssistantError) -> Self {
        Effect::Notify(SessionNotice::RequestFailed {
            operation,
            kind: error.kind,
            message: error.message,
        })
    }

    #[must_use]
    pub fn is_remote_request(&self) -> bool {
        matches!(
            self,
            Effect::RequestStart | Effect::RequestSend { .. } | Effect::RequestClear
        )
    }
}

/// One-off notifications; not part of the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionNotice {
    RequestFailed {
        operation: PendingOp,
        kind: AssistantErrorKind,
        message: String,
    },
}
