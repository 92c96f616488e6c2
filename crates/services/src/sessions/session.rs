//! The quiz session state machine.
//!
//! A session is `Active` until the single terminal transition to finished,
//! reached either by an explicit [`QuizSession::finish`] or by the countdown
//! hitting zero inside [`QuizSession::tick`]. Both paths funnel through the
//! same internal transition so the terminal snapshot happens exactly once.

use chrono::{DateTime, Utc};
use tracing::info;

use quiz_core::Clock;

use super::SessionQuestion;
use super::options::QuizMode;
use crate::error::SessionError;

/// Fixed length of the one-time mid-session break.
pub const BREAK_SECONDS: u32 = 15 * 60;

/// Countdown state for a timed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    remaining_seconds: u32,
    running: bool,
    break_available: bool,
    break_used: bool,
    break_remaining: u32,
}

impl TimerState {
    pub(crate) fn new(minutes: u32) -> Self {
        Self {
            remaining_seconds: minutes * 60,
            running: true,
            break_available: true,
            break_used: false,
            break_remaining: 0,
        }
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn break_available(&self) -> bool {
        self.break_available
    }

    #[must_use]
    pub fn break_used(&self) -> bool {
        self.break_used
    }

    /// Seconds of break left; zero when not on break.
    #[must_use]
    pub fn break_remaining(&self) -> u32 {
        self.break_remaining
    }

    #[must_use]
    pub fn on_break(&self) -> bool {
        self.break_remaining > 0
    }
}

/// One run of the quiz over a sampled, shuffled slice of the bank.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<SessionQuestion>,
    current: usize,
    mode: QuizMode,
    timer: Option<TimerState>,
    finished: bool,
    elapsed_seconds: u64,
    clock: Clock,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    pub(crate) fn new(
        questions: Vec<SessionQuestion>,
        mode: QuizMode,
        timer: Option<TimerState>,
        clock: Clock,
    ) -> Self {
        Self {
            questions,
            current: 0,
            mode,
            timer,
            finished: false,
            elapsed_seconds: 0,
            clock,
            started_at: clock.now(),
            finished_at: None,
        }
    }

    // ─── MUTATING OPERATIONS ───

    /// Record a selection on the question at `index`.
    ///
    /// # Errors
    ///
    /// `Finished` after the terminal transition, `IndexOutOfRange`, or
    /// `UnknownOption` from the question itself.
    pub fn select_answer(&mut self, index: usize, option: &str) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.question_mut(index)?.select(option)
    }

    /// Move the current-question pointer by `delta`, clamped to the session
    /// bounds. Pure pointer move; nothing is reshuffled or resampled.
    ///
    /// # Errors
    ///
    /// `Finished` after the terminal transition.
    pub fn navigate(&mut self, delta: isize) -> Result<usize, SessionError> {
        self.ensure_active()?;
        let last = self.questions.len() as isize - 1;
        let target = (self.current as isize).saturating_add(delta).clamp(0, last);
        self.current = target as usize;
        Ok(self.current)
    }

    /// Jump straight to the question at `index`.
    ///
    /// # Errors
    ///
    /// `Finished` or `IndexOutOfRange`.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.check_index(index)?;
        self.current = index;
        Ok(())
    }

    /// Flip the flag on the question at `index`.
    ///
    /// # Errors
    ///
    /// `Finished` or `IndexOutOfRange`.
    pub fn toggle_flag(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.question_mut(index)?.toggle_flag();
        Ok(())
    }

    /// Advance the clock by one second. Driven externally at a steady
    /// cadence; calling it after finish is a safe no-op.
    ///
    /// Returns true when this tick performed the timeout auto-finish.
    pub fn tick(&mut self) -> bool {
        if self.finished {
            return false;
        }

        let Some(timer) = self.timer.as_mut() else {
            self.elapsed_seconds += 1;
            return false;
        };

        if timer.break_remaining > 0 {
            timer.break_remaining -= 1;
            if timer.break_remaining == 0 {
                timer.running = true;
                info!("break over, timer resumed");
            }
            return false;
        }

        if !timer.running {
            return false;
        }

        self.elapsed_seconds += 1;
        timer.remaining_seconds -= 1;
        if timer.remaining_seconds == 0 {
            info!("time is up, submitting automatically");
            self.finish_internal();
            return true;
        }
        false
    }

    /// Start the one-time 15-minute break: the countdown pauses and resumes
    /// automatically. The entitlement is consumed immediately, even if the
    /// session finishes before the break runs out.
    ///
    /// # Errors
    ///
    /// `Finished`, or `BreakUnavailable` for untimed sessions and for any
    /// call after the first.
    pub fn take_break(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        let timer = self
            .timer
            .as_mut()
            .filter(|t| t.break_available && !t.break_used)
            .ok_or(SessionError::BreakUnavailable)?;

        timer.running = false;
        timer.break_available = false;
        timer.break_used = true;
        timer.break_remaining = BREAK_SECONDS;
        info!("break started");
        Ok(())
    }

    /// Finish the session. Always allowed while active, regardless of
    /// unanswered questions; callers wanting to warn first should consult
    /// [`QuizSession::unanswered_count`].
    ///
    /// # Errors
    ///
    /// `Finished` when the terminal transition already happened.
    pub fn finish(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.finish_internal();
        Ok(())
    }

    /// The single terminal transition; answers, flags, and elapsed time are
    /// frozen from here on.
    fn finish_internal(&mut self) {
        debug_assert!(!self.finished);
        self.finished = true;
        self.finished_at = Some(self.clock.now());
        if let Some(timer) = self.timer.as_mut() {
            timer.running = false;
            timer.break_remaining = 0;
        }
    }

    // ─── READ-ONLY QUERIES (valid after finish) ───

    /// Check the current selection against the correct answers without
    /// mutating anything.
    ///
    /// # Errors
    ///
    /// `CheckUnavailable` in test mode, or `IndexOutOfRange`.
    pub fn check_answer(&self, index: usize) -> Result<bool, SessionError> {
        if self.mode != QuizMode::Practice {
            return Err(SessionError::CheckUnavailable);
        }
        Ok(self.question(index)?.is_correct())
    }

    /// The question at `index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange`.
    pub fn question(&self, index: usize) -> Result<&SessionQuestion, SessionError> {
        self.check_index(index)?;
        Ok(&self.questions[index])
    }

    #[must_use]
    pub fn questions(&self) -> &[SessionQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> &SessionQuestion {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn timer(&self) -> Option<&TimerState> {
        self.timer.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.len() - self.answered_count()
    }

    #[must_use]
    pub fn flagged_count(&self) -> usize {
        self.questions.iter().filter(|q| q.flagged()).count()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    // ─── INTERNAL ───

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.finished {
            return Err(SessionError::Finished);
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index >= self.questions.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        Ok(())
    }

    fn question_mut(&mut self, index: usize) -> Result<&mut SessionQuestion, SessionError> {
        self.check_index(index)?;
        Ok(&mut self.questions[index])
    }
}
