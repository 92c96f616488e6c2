//! Per-session wrapper around one bank question.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::Question;

use crate::error::SessionError;

/// One question as presented in a session: the underlying bank question plus
/// a frozen display permutation of its options and the live answer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    question: Question,
    display_options: Vec<String>,
    selected: BTreeSet<String>,
    flagged: bool,
}

impl SessionQuestion {
    /// Wrap a bank question, shuffling its options once. The permutation is
    /// never recomputed afterwards.
    pub(crate) fn new(question: Question, rng: &mut impl Rng) -> Self {
        let mut display_options = question.options().to_vec();
        display_options.shuffle(rng);
        Self {
            question,
            display_options,
            selected: BTreeSet::new(),
            flagged: false,
        }
    }

    /// Record a selection. Radio semantics for single-correct questions,
    /// checkbox toggle for multi-correct.
    ///
    /// # Errors
    ///
    /// `UnknownOption` when the text is not one of this question's options.
    pub(crate) fn select(&mut self, option: &str) -> Result<(), SessionError> {
        if !self.display_options.iter().any(|o| o == option) {
            return Err(SessionError::UnknownOption {
                option: option.to_string(),
            });
        }

        if self.question.is_multi() {
            if !self.selected.remove(option) {
                self.selected.insert(option.to_string());
            }
        } else {
            self.selected.clear();
            self.selected.insert(option.to_string());
        }
        Ok(())
    }

    pub(crate) fn toggle_flag(&mut self) {
        self.flagged = !self.flagged;
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// The frozen presentation order of this question's options.
    #[must_use]
    pub fn display_options(&self) -> &[String] {
        &self.display_options
    }

    #[must_use]
    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    #[must_use]
    pub fn flagged(&self) -> bool {
        self.flagged
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Exact-set correctness; no partial credit.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.selected == *self.question.correct_answers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn single_correct() -> Question {
        Question::new(
            QuestionId::new(0),
            "Capital of France?",
            vec!["Paris".into(), "Rome".into(), "Berlin".into()],
            vec!["Paris".into()],
            None,
            None,
        )
        .unwrap()
    }

    fn multi_correct() -> Question {
        Question::new(
            QuestionId::new(1),
            "Which are primes?",
            vec!["2".into(), "4".into(), "5".into()],
            vec!["2".into(), "5".into()],
            None,
            None,
        )
        .unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn display_options_are_a_permutation() {
        let sq = SessionQuestion::new(single_correct(), &mut rng());
        let mut sorted = sq.display_options().to_vec();
        sorted.sort();
        assert_eq!(sorted, vec!["Berlin", "Paris", "Rome"]);
    }

    #[test]
    fn single_correct_select_replaces() {
        let mut sq = SessionQuestion::new(single_correct(), &mut rng());
        sq.select("Rome").unwrap();
        sq.select("Paris").unwrap();
        assert_eq!(sq.selected().len(), 1);
        assert!(sq.selected().contains("Paris"));
        assert!(sq.is_correct());
    }

    #[test]
    fn reselecting_the_same_single_option_is_idempotent() {
        let mut sq = SessionQuestion::new(single_correct(), &mut rng());
        sq.select("Paris").unwrap();
        sq.select("Paris").unwrap();
        assert_eq!(sq.selected().len(), 1);
    }

    #[test]
    fn multi_correct_select_toggles() {
        let mut sq = SessionQuestion::new(multi_correct(), &mut rng());
        sq.select("2").unwrap();
        sq.select("5").unwrap();
        assert!(sq.is_correct());
        sq.select("5").unwrap();
        assert!(!sq.is_correct());
        assert_eq!(sq.selected().len(), 1);
    }

    #[test]
    fn partial_multi_selection_is_incorrect() {
        let mut sq = SessionQuestion::new(multi_correct(), &mut rng());
        sq.select("2").unwrap();
        assert!(!sq.is_correct());
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut sq = SessionQuestion::new(single_correct(), &mut rng());
        let err = sq.select("Madrid").unwrap_err();
        assert_eq!(
            err,
            SessionError::UnknownOption {
                option: "Madrid".to_string()
            }
        );
        assert!(sq.selected().is_empty());
    }
}
