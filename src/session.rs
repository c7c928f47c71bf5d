//! Chat session state machine
//!
//! Elm-style core: a pure transition function maps the current state and an
//! event to a new state plus effects for the runtime to carry out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, SessionNotice};
pub use event::Event;
pub use state::{ChatStatus, PendingOp, SessionSnapshot, SessionState};
pub use transition::{transition, TransitionError, TransitionResult};
