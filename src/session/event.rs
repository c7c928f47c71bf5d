//! Events that drive a session

use crate::assistant::AssistantError;
use crate::transcript::MessageText;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User commands
    OpenChat,
    CloseChat,
    UpdateDraft { text: String },
    Submit,
    ClearConversation,

    // Remote results
    StartCompleted {
        result: Result<MessageText, AssistantError>,
    },
    SendCompleted {
        result: Result<MessageText, AssistantError>,
    },
    ClearCompleted {
        result: Result<(), AssistantError>,
    },
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Event::OpenChat => "open_chat",
            Event::CloseChat => "close_chat",
            Event::UpdateDraft { .. } => "update_draft",
            Event::Submit => "submit",
            Event::ClearConversation => "clear_conversation",
            Event::StartCompleted { .. } => "start_completed",
            Event::SendCompleted { .. } => "send_completed",
            Event::ClearCompleted { .. } => "clear_completed",
        }
    }
}
