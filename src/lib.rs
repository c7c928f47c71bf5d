//! Session controller for an embedded assistant chat widget
//!
//! Owns the chat state (panel visibility, transcript, draft, pending request),
//! sequences the start/send/clear calls against the assistant service, and
//! publishes snapshots for whatever renders the widget.

pub mod assistant;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod transcript;

pub use assistant::{
    AssistantClient, AssistantConfig, AssistantError, AssistantErrorKind, HttpAssistantClient,
    LoggingClient,
};
pub use runtime::{new_session, spawn_session, SessionError, SessionHandle, SessionId, SessionRuntime};
pub use session::{ChatStatus, PendingOp, SessionNotice, SessionSnapshot};
pub use transcript::{Message, MessageId, MessageText, Sender};
