//! Runtime for a chat session
//!
//! One background task per session owns the [`SessionState`]. Commands from
//! the presentation layer and results of remote calls are fed to it as
//! events; everything it changes is published as snapshots.

mod executor;



pub use executor::SessionRuntime;

use crate::assistant::AssistantClient;
use crate::session::{Event, SessionNotice, SessionSnapshot, SessionState};
use std::fmt;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tokio_util::sync::CancellationToken;

const COMMAND_CHANNEL_SIZE: usize = 32;
const NOTICE_CHANNEL_SIZE: usize = 16;

/// Identifies one widget lifetime in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session has been shut down")]
    Closed,
}

/// Cloneable handle the presentation layer uses to drive a session.
///
/// Command methods only enqueue. A command the session ignores still
/// returns `Ok`.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    command_tx: mpsc::Sender<Event>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
    notice_tx: broadcast::Sender<SessionNotice>,
    shutdown: CancellationToken,
}

impl SessionHandle {
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// # Errors
    ///
    /// [`SessionError::Closed`] after shutdown.
    pub async fn open_chat(&self) -> Result<(), SessionError> {
        self.send(Event::OpenChat).await
    }

    /// # Errors
    ///
    /// [`SessionError::Closed`] after shutdown.
    pub async fn close_chat(&self) -> Result<(), SessionError> {
        self.send(Event::CloseChat).await
    }

    /// # Errors
    ///
    /// [`SessionError::Closed`] after shutdown.
    pub async fn update_draft(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Event::UpdateDraft { text: text.into() }).await
    }

    /// # Errors
    ///
    /// [`SessionError::Closed`] after shutdown.
    pub async fn submit(&self) -> Result<(), SessionError> {
        self.send(Event::Submit).await
    }

    /// # Errors
    ///
    /// [`SessionError::Closed`] after shutdown.
    pub async fn clear_conversation(&self) -> Result<(), SessionError> {
        self.send(Event::ClearConversation).await
    }

    /// Latest state, including changes made while the chat was closed
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver woken whenever the visible state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    #[must_use]
    pub fn snapshots(&self) -> WatchStream<SessionSnapshot> {
        WatchStream::new(self.snapshot_rx.clone())
    }

    /// Transient notices such as failed requests. Only notices sent after
    /// this call are received.
    #[must_use]
    pub fn notifications(&self) -> broadcast::Receiver<SessionNotice> {
        self.notice_tx.subscribe()
    }

    #[must_use]
    pub fn notification_stream(&self) -> BroadcastStream<SessionNotice> {
        BroadcastStream::new(self.notice_tx.subscribe())
    }

    /// Tear the session down. An outstanding remote call is abandoned.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled() || self.command_tx.is_closed()
    }

    async fn send(&self, event: Event) -> Result<(), SessionError> {
        if self.shutdown.is_cancelled() {
            return Err(SessionError::Closed);
        }
        self.command_tx
            .send(event)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

/// Create a session runtime and the handle that controls it.
///
/// The runtime does nothing until [`SessionRuntime::run`] is awaited; use
/// [`spawn_session`] to run it on the current tokio runtime.
#[must_use]
pub fn new_session<C: AssistantClient + 'static>(client: C) -> (SessionRuntime<C>, SessionHandle) {
    let id = SessionId::new();
    let state = SessionState::new();
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
    let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());
    let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_SIZE);
    let shutdown = CancellationToken::new();

    let runtime = SessionRuntime::new(
        id,
        state,
        client,
        command_rx,
        snapshot_tx,
        notice_tx.clone(),
        shutdown.clone(),
    );
    let handle = SessionHandle {
        id,
        command_tx,
        snapshot_rx,
        notice_tx,
        shutdown,
    };
    (runtime, handle)
}

/// Start a session in the background and return its handle
#[must_use]
pub fn spawn_session<C: AssistantClient + 'static>(client: C) -> SessionHandle {
    let (runtime, handle) = new_session(client);
    tokio::spawn(runtime.run());
    handle
}
