//! Quiz sessions: options, building, the live state machine, and review.

mod builder;
mod options;
mod question;
mod review;
mod session;

pub use builder::SessionBuilder;
pub use options::{QuestionCount, QuizMode, SessionOptions};
pub use question::SessionQuestion;
pub use review::{Review, ReviewRow, parse_score_line};
pub use session::{BREAK_SECONDS, QuizSession, TimerState};
