//! Property-based tests for the session state machine
//!
//! Random command sequences are interleaved with random remote outcomes, and
//! the ordering and pending invariants are checked after every step.

use super::*;
use crate::assistant::{AssistantError, AssistantErrorKind};
use crate::transcript::{MessageText, Sender};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

// ============================================================================
// Arbitrary Generators
// ============================================================================

#[derive(Debug, Clone)]
enum Action {
    Open,
    Close,
    Draft(String),
    Submit,
    Clear,
    Resolve {
        success: bool,
        kind: AssistantErrorKind,
        reply: String,
    },
}

fn arb_error_kind() -> impl Strategy<Value = AssistantErrorKind> {
    prop_oneof![
        Just(AssistantErrorKind::Network),
        Just(AssistantErrorKind::Protocol),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        1 => Just(Action::Open),
        1 => Just(Action::Close),
        3 => "[a-zA-Z ?]{0,12}".prop_map(Action::Draft),
        3 => Just(Action::Submit),
        1 => Just(Action::Clear),
        4 => (any::<bool>(), arb_error_kind(), "[a-zA-Z]{1,10}").prop_map(
            |(success, kind, reply)| Action::Resolve {
                success,
                kind,
                reply,
            }
        ),
    ]
}

// ============================================================================
// Harness
// ============================================================================

/// Plays the role of the runtime: tracks the one outstanding remote call
#[derive(Default)]
struct Harness {
    state: SessionState,
    outstanding: Option<Effect>,
}

fn error(kind: AssistantErrorKind) -> AssistantError {
    AssistantError::new(kind, "simulated failure")
}

fn reply_result(success: bool, kind: AssistantErrorKind, reply: &str) -> Result<MessageText, AssistantError> {
    if success {
        Ok(MessageText::new(reply).expect("generator yields non-blank replies"))
    } else {
        Err(error(kind))
    }
}

impl Harness {
    fn event_for(&self, action: &Action) -> Option<Event> {
        match action {
            Action::Open => Some(Event::OpenChat),
            Action::Close => Some(Event::CloseChat),
            Action::Draft(text) => Some(Event::UpdateDraft { text: text.clone() }),
            Action::Submit => Some(Event::Submit),
            Action::Clear => Some(Event::ClearConversation),
            Action::Resolve {
                success,
                kind,
                reply,
            } => match self.outstanding.as_ref()? {
                Effect::RequestStart => Some(Event::StartCompleted {
                    result: reply_result(*success, *kind, reply),
                }),
                Effect::RequestSend { .. } => Some(Event::SendCompleted {
                    result: reply_result(*success, *kind, reply),
                }),
                Effect::RequestClear => Some(Event::ClearCompleted {
                    result: if *success { Ok(()) } else { Err(error(*kind)) },
                }),
                _ => None,
            },
        }
    }

    fn step(&mut self, action: &Action) -> Result<(), TestCaseError> {
        let Some(event) = self.event_for(action) else {
            return Ok(());
        };
        let before = self.state.clone();
        let resolving = matches!(action, Action::Resolve { .. });

        let result = match transition(&self.state, event) {
            Ok(result) => result,
            Err(err) => {
                prop_assert!(!resolving, "completion rejected: {}", err);
                return Ok(());
            }
        };

        let sent = if resolving { self.outstanding.take() } else { None };

        let requests: Vec<_> = result
            .effects
            .iter()
            .filter(|e| e.is_remote_request())
            .cloned()
            .collect();
        prop_assert!(requests.len() <= 1);
        if let Some(request) = requests.into_iter().next() {
            prop_assert!(self.outstanding.is_none(), "second request while one is in flight");
            self.outstanding = Some(request);
        }

        let notices = result
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Notify(_)))
            .count();

        if let Action::Resolve { success, .. } = action {
            prop_assert_eq!(notices, usize::from(!*success));

            if let (true, Some(Effect::RequestSend { text })) = (*success, &sent) {
                let messages = result.new_state.transcript.snapshot();
                let n = messages.len();
                prop_assert!(n >= 2);
                prop_assert_eq!(messages[n - 1].sender, Sender::Assistant);
                prop_assert_eq!(messages[n - 2].sender, Sender::User);
                prop_assert_eq!(&messages[n - 2].text, text);
            }

            if !*success {
                prop_assert_eq!(
                    result.new_state.transcript.snapshot(),
                    before.transcript.snapshot(),
                    "failure must not touch the transcript"
                );
            }
        } else {
            prop_assert_eq!(notices, 0);
        }

        self.state = result.new_state;
        Ok(())
    }

    fn check_invariants(&self) -> Result<(), TestCaseError> {
        prop_assert_eq!(self.state.is_pending(), self.outstanding.is_some());

        let ids: Vec<_> = self.state.transcript.iter().map(|m| m.id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids out of order: {:?}", ids);
        Ok(())
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_one_request_in_flight_and_replies_follow_questions(
        actions in proptest::collection::vec(arb_action(), 1..60)
    ) {
        let mut harness = Harness::default();
        for action in &actions {
            harness.step(action)?;
            harness.check_invariants()?;
        }
    }

    #[test]
    fn prop_blank_draft_never_submits(draft in "[ \t\n]{0,8}", open in any::<bool>()) {
        let mut state = SessionState::new();
        if open {
            state.status = ChatStatus::Open;
        }
        state.draft = draft;

        let err = transition(&state, Event::Submit).unwrap_err();
        prop_assert_eq!(err, TransitionError::EmptyDraft);
    }

    #[test]
    fn prop_submit_while_pending_is_rejected(
        draft in "[a-zA-Z]{1,12}",
        op in prop_oneof![
            Just(PendingOp::Start),
            Just(PendingOp::Send),
            Just(PendingOp::Clear),
            Just(PendingOp::Restart),
        ]
    ) {
        let mut state = SessionState::new();
        state.status = ChatStatus::Open;
        state.pending = Some(op);
        state.draft = draft;

        prop_assert_eq!(transition(&state, Event::Submit).unwrap_err(), TransitionError::Busy(op));
        prop_assert_eq!(
            transition(&state, Event::ClearConversation).unwrap_err(),
            TransitionError::Busy(op)
        );
    }

    #[test]
    fn prop_successful_clear_leaves_only_greeting(
        questions in proptest::collection::vec("[a-zA-Z]{1,10}", 0..5),
        greeting in "[a-zA-Z]{1,10}",
    ) {
        let mut state = transition(&SessionState::new(), Event::OpenChat).unwrap().new_state;
        state = transition(&state, Event::StartCompleted {
            result: Ok(MessageText::new("Welkom").unwrap()),
        }).unwrap().new_state;

        for question in questions {
            state = transition(&state, Event::UpdateDraft { text: question.clone() }).unwrap().new_state;
            state = transition(&state, Event::Submit).unwrap().new_state;
            state = transition(&state, Event::SendCompleted {
                result: Ok(MessageText::new(format!("re: {question}")).unwrap()),
            }).unwrap().new_state;
        }

        state = transition(&state, Event::ClearConversation).unwrap().new_state;
        state = transition(&state, Event::ClearCompleted { result: Ok(()) }).unwrap().new_state;
        state = transition(&state, Event::StartCompleted {
            result: Ok(MessageText::new(greeting.clone()).unwrap()),
        }).unwrap().new_state;

        let messages = state.transcript.snapshot();
        prop_assert_eq!(messages.len(), 1);
        prop_assert_eq!(messages[0].sender, Sender::Assistant);
        prop_assert_eq!(messages[0].text.as_str(), greeting.as_str());
        prop_assert!(!state.is_pending());
    }
}
