//! Session construction: sampling, ordering, and option shuffling.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use quiz_core::Clock;
use quiz_core::model::QuestionBank;

use super::options::{QuestionCount, SessionOptions};
use super::question::SessionQuestion;
use super::session::{QuizSession, TimerState};
use crate::error::SessionError;

/// Builds a [`QuizSession`] from a bank and the user-chosen options.
///
/// All randomness flows through the caller-supplied `Rng`, so a seeded rng
/// reproduces the same sample, order, and per-question option order.
pub struct SessionBuilder<'a> {
    bank: &'a QuestionBank,
    options: SessionOptions,
    clock: Clock,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank, options: SessionOptions) -> Self {
        Self {
            bank,
            options,
            clock: Clock::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Build with a thread-local rng.
    ///
    /// # Errors
    ///
    /// See [`SessionBuilder::build_with_rng`].
    pub fn build(self) -> Result<QuizSession, SessionError> {
        self.build_with_rng(&mut rand::rng())
    }

    /// Build with the given rng.
    ///
    /// # Errors
    ///
    /// `Empty` for a zero count, `CountExceedsBank` when more questions are
    /// requested than the bank holds and repeats are disallowed.
    pub fn build_with_rng(self, rng: &mut impl Rng) -> Result<QuizSession, SessionError> {
        let indices = self.sample_indices(rng)?;

        let questions: Vec<SessionQuestion> = indices
            .into_iter()
            .filter_map(|i| self.bank.get(i).cloned())
            .map(|question| SessionQuestion::new(question, rng))
            .collect();

        let timer = (self.options.timer_minutes > 0)
            .then(|| TimerState::new(self.options.timer_minutes));

        info!(
            source = self.bank.source(),
            count = questions.len(),
            mode = ?self.options.mode,
            timed = timer.is_some(),
            "session built"
        );

        Ok(QuizSession::new(
            questions,
            self.options.mode,
            timer,
            self.clock,
        ))
    }

    fn sample_indices(&self, rng: &mut impl Rng) -> Result<Vec<usize>, SessionError> {
        let available = self.bank.len();
        let requested = match self.options.count {
            QuestionCount::All => available,
            QuestionCount::Exactly(0) => return Err(SessionError::Empty),
            QuestionCount::Exactly(n) => n,
        };

        let indices = if requested == available {
            // every question exactly once, in a fresh order
            let mut all: Vec<usize> = (0..available).collect();
            all.shuffle(rng);
            all
        } else if requested < available {
            rand::seq::index::sample(rng, available, requested).into_vec()
        } else if self.options.allow_repeats {
            (0..requested).map(|_| rng.random_range(0..available)).collect()
        } else {
            return Err(SessionError::CountExceedsBank {
                requested,
                available,
            });
        };

        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::options::QuizMode;
    use quiz_core::model::{ImageStore, Question, QuestionId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    fn bank(size: u32) -> QuestionBank {
        let questions = (0..size)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("question {id}?"),
                    vec!["yes".into(), "no".into(), "maybe".into()],
                    vec!["yes".into()],
                    None,
                    None,
                )
                .unwrap()
            })
            .collect();
        QuestionBank::new("bank.txt", questions, ImageStore::new()).unwrap()
    }

    fn options(count: QuestionCount, allow_repeats: bool) -> SessionOptions {
        SessionOptions {
            count,
            allow_repeats,
            mode: QuizMode::Practice,
            timer_minutes: 0,
        }
    }

    fn ids(session: &QuizSession) -> Vec<u32> {
        session
            .questions()
            .iter()
            .map(|q| q.question().id().value())
            .collect()
    }

    #[test]
    fn all_selects_every_question_once() {
        let bank = bank(5);
        let mut rng = StdRng::seed_from_u64(1);
        let session = SessionBuilder::new(&bank, options(QuestionCount::All, false))
            .build_with_rng(&mut rng)
            .unwrap();

        let unique: BTreeSet<u32> = ids(&session).into_iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn count_equal_to_bank_size_includes_every_question() {
        let bank = bank(4);
        let mut rng = StdRng::seed_from_u64(2);
        let session = SessionBuilder::new(&bank, options(QuestionCount::Exactly(4), false))
            .build_with_rng(&mut rng)
            .unwrap();
        let unique: BTreeSet<u32> = ids(&session).into_iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn small_count_samples_distinct_questions() {
        let bank = bank(10);
        let mut rng = StdRng::seed_from_u64(3);
        let session = SessionBuilder::new(&bank, options(QuestionCount::Exactly(4), false))
            .build_with_rng(&mut rng)
            .unwrap();

        let picked = ids(&session);
        assert_eq!(picked.len(), 4);
        let unique: BTreeSet<u32> = picked.into_iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn oversized_count_needs_repeats() {
        let bank = bank(3);
        let mut rng = StdRng::seed_from_u64(4);
        let err = SessionBuilder::new(&bank, options(QuestionCount::Exactly(4), false))
            .build_with_rng(&mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::CountExceedsBank {
                requested: 4,
                available: 3
            }
        );

        let mut rng = StdRng::seed_from_u64(4);
        let session = SessionBuilder::new(&bank, options(QuestionCount::Exactly(7), true))
            .build_with_rng(&mut rng)
            .unwrap();
        assert_eq!(session.len(), 7);
    }

    #[test]
    fn zero_count_is_empty() {
        let bank = bank(3);
        let mut rng = StdRng::seed_from_u64(5);
        let err = SessionBuilder::new(&bank, options(QuestionCount::Exactly(0), false))
            .build_with_rng(&mut rng)
            .unwrap_err();
        assert_eq!(err, SessionError::Empty);
    }

    #[test]
    fn seeded_builds_are_deterministic() {
        let bank = bank(8);
        let opts = options(QuestionCount::Exactly(5), false);

        let a = SessionBuilder::new(&bank, opts)
            .build_with_rng(&mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = SessionBuilder::new(&bank, opts)
            .build_with_rng(&mut StdRng::seed_from_u64(42))
            .unwrap();

        assert_eq!(ids(&a), ids(&b));
        for (qa, qb) in a.questions().iter().zip(b.questions()) {
            assert_eq!(qa.display_options(), qb.display_options());
        }
    }

    #[test]
    fn timer_minutes_zero_disables_the_timer() {
        let bank = bank(2);
        let mut rng = StdRng::seed_from_u64(6);
        let session = SessionBuilder::new(&bank, options(QuestionCount::All, false))
            .build_with_rng(&mut rng)
            .unwrap();
        assert!(session.timer().is_none());

        let mut opts = options(QuestionCount::All, false);
        opts.timer_minutes = 30;
        let mut rng = StdRng::seed_from_u64(6);
        let timed = SessionBuilder::new(&bank, opts)
            .build_with_rng(&mut rng)
            .unwrap();
        let timer = timed.timer().unwrap();
        assert_eq!(timer.remaining_seconds(), 30 * 60);
        assert!(timer.running());
        assert!(timer.break_available());
    }
}
