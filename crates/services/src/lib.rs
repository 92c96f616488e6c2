#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod version_check;

pub use quiz_core::Clock;

pub use error::SessionError;
pub use sessions::{
    BREAK_SECONDS, QuestionCount, QuizMode, QuizSession, Review, ReviewRow, SessionBuilder,
    SessionOptions, SessionQuestion, TimerState, parse_score_line,
};
pub use version_check::VersionCheck;
