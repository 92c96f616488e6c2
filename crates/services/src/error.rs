//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by session building and the session state machine.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions requested for session")]
    Empty,

    #[error("requested {requested} questions but only {available} are available without repeats")]
    CountExceedsBank { requested: usize, available: usize },

    #[error("question index {index} out of range (session has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("session already finished")]
    Finished,

    #[error("session not finished yet")]
    NotFinished,

    #[error("option {option:?} is not one of this question's options")]
    UnknownOption { option: String },

    #[error("answer checking is only available in practice mode")]
    CheckUnavailable,

    #[error("no break available")]
    BreakUnavailable,
}
