//! Session runtime executor

use super::SessionId;
use crate::assistant::AssistantClient;
use crate::session::{transition, Effect, Event, SessionNotice, SessionSnapshot, SessionState};
use crate::transcript::MessageText;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Remote call spawned on behalf of an effect
enum RemoteRequest {
    Start,
    Send(MessageText),
    Clear,
}

impl RemoteRequest {
    fn from_effect(effect: &Effect) -> Option<Self> {
        match effect {
            Effect::RequestStart => Some(Self::Start),
            Effect::RequestSend { text } => Some(Self::Send(text.clone())),
            Effect::RequestClear => Some(Self::Clear),
            Effect::Notify(_) | Effect::PublishSnapshot => None,
        }
    }

    async fn execute<C: AssistantClient + ?Sized>(self, client: &C) -> Event {
        match self {
            Self::Start => Event::StartCompleted {
                result: client.start().await,
            },
            Self::Send(text) => Event::SendCompleted {
                result: client.send(&text).await,
            },
            Self::Clear => Event::ClearCompleted {
                result: client.clear().await,
            },
        }
    }
}

/// Owns one session's state and applies every event to it in order
pub struct SessionRuntime<C>
where
    C: AssistantClient + 'static,
{
    id: SessionId,
    state: SessionState,
    client: Arc<C>,
    command_rx: mpsc::Receiver<Event>,
    /// Completion events from spawned remote calls
    result_tx: mpsc::Sender<Event>,
    result_rx: mpsc::Receiver<Event>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    notice_tx: broadcast::Sender<SessionNotice>,
    /// Cancelled on teardown; aborts the outstanding remote call
    shutdown: CancellationToken,
}

impl<C> SessionRuntime<C>
where
    C: AssistantClient + 'static,
{
    pub(super) fn new(
        id: SessionId,
        state: SessionState,
        client: C,
        command_rx: mpsc::Receiver<Event>,
        snapshot_tx: watch::Sender<SessionSnapshot>,
        notice_tx: broadcast::Sender<SessionNotice>,
        shutdown: CancellationToken,
    ) -> Self {
        // One call in flight at most, so one slot is enough
        let (result_tx, result_rx) = mpsc::channel(1);
        Self {
            id,
            state,
            client: Arc::new(client),
            command_rx,
            result_tx,
            result_rx,
            snapshot_tx,
            notice_tx,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.id, "Starting session runtime");

        loop {
            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => break,

                Some(event) = self.result_rx.recv() => self.process_event(event),

                command = self.command_rx.recv() => match command {
                    Some(event) => self.process_event(event),
                    // Every handle is gone: the widget was unmounted
                    None => break,
                },
            }
        }

        self.shutdown.cancel();
        tracing::info!(
            session_id = %self.id,
            messages = self.state.transcript.len(),
            "Session runtime stopped"
        );
    }

    fn process_event(&mut self, event: Event) {
        let event_name = event.name();

        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(session_id = %self.id, event = event_name, reason = %e, "Event ignored");
                return;
            }
        };

        self.state = result.new_state;

        let mut publish = false;
        for effect in result.effects {
            match effect {
                Effect::PublishSnapshot => publish = true,
                Effect::Notify(notice) => self.notify(notice),
                request => {
                    if let Some(request) = RemoteRequest::from_effect(&request) {
                        self.spawn_request(request);
                    }
                }
            }
        }

        // The stored snapshot is always current; subscribers are only woken
        // when the transition asked for it
        let snapshot = self.state.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            *current = snapshot;
            publish
        });
    }

    fn notify(&self, notice: SessionNotice) {
        let SessionNotice::RequestFailed {
            operation,
            kind,
            message,
        } = &notice;
        tracing::warn!(
            session_id = %self.id,
            operation = ?operation,
            kind = kind.as_str(),
            error = %message,
            "Assistant request failed"
        );
        // No subscribers is fine; notices are transient
        let _ = self.notice_tx.send(notice);
    }

    fn spawn_request(&self, request: RemoteRequest) {
        let client = self.client.clone();
        let result_tx = self.result_tx.clone();
        let shutdown = self.shutdown.clone();
        let session_id = self.id;

        tokio::spawn(async move {
            tokio::select! {
                biased;

                () = shutdown.cancelled() => {
                    tracing::debug!(session_id = %session_id, "Remote call abandoned on shutdown");
                }

                event = request.execute(client.as_ref()) => {
                    let _ = result_tx.send(event).await;
                }
            }
        });
    }
}
