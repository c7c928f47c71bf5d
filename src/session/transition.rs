//! Pure state transition function
//!
//! Given the same state and event this always yields the same new state and
//! effects. Remote calls are requested as effects and their outcomes come
//! back as events, so at most one call can be outstanding.

use super::{ChatStatus, Effect, Event, PendingOp, SessionState};
use crate::assistant::AssistantError;
use crate::transcript::{MessageText, Sender};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Wake subscribers only while the panel is showing
    #[must_use]
    fn publish_if_open(self) -> Self {
        if self.new_state.is_open() {
            self.with_effect(Effect::PublishSnapshot)
        } else {
            self
        }
    }
}

/// Events that leave the state untouched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A {0:?} request is still outstanding")]
    Busy(PendingOp),
    #[error("Nothing to send")]
    EmptyDraft,
    #[error("Chat is already open")]
    AlreadyOpen,
    #[error("Chat is already closed")]
    AlreadyClosed,
    #[error("Unexpected {event} while pending is {pending:?}")]
    UnexpectedResult {
        event: &'static str,
        pending: Option<PendingOp>,
    },
}

/// Compute the state that follows `event` and the effects to run.
///
/// # Errors
///
/// Returns a [`TransitionError`] when the event does not apply to `state`;
/// the caller keeps the old state in that case.
pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    let mut next = state.clone();
    let event_name = event.name();

    match event {
        // ============================================================
        // Panel visibility
        // ============================================================
        Event::OpenChat => {
            if state.is_open() {
                return Err(TransitionError::AlreadyOpen);
            }
            next.status = ChatStatus::Open;

            if next.transcript.is_empty() && next.pending.is_none() {
                next.pending = Some(PendingOp::Start);
                return Ok(TransitionResult::new(next)
                    .with_effect(Effect::RequestStart)
                    .with_effect(Effect::PublishSnapshot));
            }
            Ok(TransitionResult::new(next).with_effect(Effect::PublishSnapshot))
        }

        // Closing never cancels the outstanding call
        Event::CloseChat => {
            if !state.is_open() {
                return Err(TransitionError::AlreadyClosed);
            }
            next.status = ChatStatus::Closed;
            Ok(TransitionResult::new(next).with_effect(Effect::PublishSnapshot))
        }

        // ============================================================
        // User input
        // ============================================================
        Event::UpdateDraft { text } => {
            next.draft = text;
            Ok(TransitionResult::new(next).publish_if_open())
        }

        Event::Submit => {
            if let Some(op) = state.pending {
                return Err(TransitionError::Busy(op));
            }
            let text = MessageText::new(state.draft.clone()).ok_or(TransitionError::EmptyDraft)?;

            next.transcript.append(Sender::User, text.clone());
            next.draft.clear();
            next.pending = Some(PendingOp::Send);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::RequestSend { text })
                .publish_if_open())
        }

        Event::ClearConversation => {
            if let Some(op) = state.pending {
                return Err(TransitionError::Busy(op));
            }
            next.pending = Some(PendingOp::Clear);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::RequestClear)
                .publish_if_open())
        }

        // ============================================================
        // Remote results
        // ============================================================
        Event::StartCompleted { result } => match state.pending {
            Some(PendingOp::Start) => {
                next.pending = None;
                Ok(apply_reply(next, PendingOp::Start, result))
            }
            // The old transcript is only dropped once the new greeting exists
            Some(PendingOp::Restart) => {
                next.pending = None;
                if result.is_ok() {
                    next.transcript.reset();
                }
                Ok(apply_reply(next, PendingOp::Restart, result))
            }
            pending => Err(TransitionError::UnexpectedResult {
                event: event_name,
                pending,
            }),
        },

        Event::SendCompleted { result } => match state.pending {
            Some(PendingOp::Send) => {
                next.pending = None;
                Ok(apply_reply(next, PendingOp::Send, result))
            }
            pending => Err(TransitionError::UnexpectedResult {
                event: event_name,
                pending,
            }),
        },

        Event::ClearCompleted { result } => match (state.pending, result) {
            (Some(PendingOp::Clear), Ok(())) => {
                next.pending = Some(PendingOp::Restart);
                Ok(TransitionResult::new(next)
                    .with_effect(Effect::RequestStart)
                    .publish_if_open())
            }
            (Some(PendingOp::Clear), Err(error)) => {
                next.pending = None;
                Ok(TransitionResult::new(next)
                    .with_effect(Effect::request_failed(PendingOp::Clear, error))
                    .publish_if_open())
            }
            (pending, _) => Err(TransitionError::UnexpectedResult {
                event: event_name,
                pending,
            }),
        },
    }
}

/// Append an assistant reply, or report why there is none
fn apply_reply(
    mut next: SessionState,
    operation: PendingOp,
    result: Result<MessageText, AssistantError>,
) -> TransitionResult {
    match result {
        Ok(text) => {
            next.transcript.append(Sender::Assistant, text);
            TransitionResult::new(next).publish_if_open()
        }
        Err(error) => TransitionResult::new(next)
            .with_effect(Effect::request_failed(operation, error))
            .publish_if_open(),
    }
}
