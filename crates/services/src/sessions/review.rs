//! Scored review and plain-text export of a finished session.

use std::fmt::Write as _;

use super::QuizSession;
use crate::error::SessionError;

/// One question's outcome in session order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub index: usize,
    pub prompt: String,
    pub correct_display: String,
    pub user_display: String,
    pub explanation: Option<String>,
    pub correct: bool,
    pub flagged: bool,
}

/// Deterministic scoring of a finished session. Correctness is exact-set
/// equality of selected vs correct answers; no partial credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    rows: Vec<ReviewRow>,
    correct: usize,
    total: usize,
}

impl Review {
    /// Score a finished session.
    ///
    /// # Errors
    ///
    /// `NotFinished` while the session is still active.
    pub fn from_session(session: &QuizSession) -> Result<Self, SessionError> {
        if !session.is_finished() {
            return Err(SessionError::NotFinished);
        }

        let rows: Vec<ReviewRow> = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, sq)| {
                let question = sq.question();
                ReviewRow {
                    index,
                    prompt: question.prompt().to_string(),
                    correct_display: join(question.correct_answers().iter()),
                    user_display: if sq.is_answered() {
                        join(sq.selected().iter())
                    } else {
                        "(no answer)".to_string()
                    },
                    explanation: question.explanation().map(str::to_string),
                    correct: sq.is_correct(),
                    flagged: sq.flagged(),
                }
            })
            .collect();

        let correct = rows.iter().filter(|r| r.correct).count();
        let total = rows.len();
        Ok(Self {
            rows,
            correct,
            total,
        })
    }

    #[must_use]
    pub fn rows(&self) -> &[ReviewRow] {
        &self.rows
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Percentage score, round-half-up.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        // integer round-half-up of 100*correct/total
        ((200 * self.correct + self.total) / (2 * self.total)) as u32
    }

    #[must_use]
    pub fn score_line(&self) -> String {
        format!("Score: {}/{} ({}%)", self.correct, self.total, self.percent())
    }

    /// Render the plain-text export: one ✓/✗ block per question in session
    /// order, then the summary score line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let mark = if row.correct { '✓' } else { '✗' };
            let flag = if row.flagged { " [FLAGGED]" } else { "" };
            let _ = writeln!(out, "{mark} {}. {}{flag}", row.index + 1, row.prompt);
            let _ = writeln!(out, "    Correct: {}", row.correct_display);
            let _ = writeln!(out, "    Your answer: {}", row.user_display);
            if let Some(reason) = &row.explanation {
                let _ = writeln!(out, "    Reason: {reason}");
            }
            out.push('\n');
        }
        out.push_str(&self.score_line());
        out.push('\n');
        out
    }
}

fn join<'a>(parts: impl Iterator<Item = &'a String>) -> String {
    parts.map(String::as_str).collect::<Vec<_>>().join(" | ")
}

/// Recover `(correct, total, percent)` from an export's summary line.
#[must_use]
pub fn parse_score_line(text: &str) -> Option<(usize, usize, u32)> {
    let line = text
        .lines()
        .rev()
        .find(|l| l.trim_start().starts_with("Score: "))?;
    let rest = line.trim_start().strip_prefix("Score: ")?;
    let (fraction, tail) = rest.split_once(" (")?;
    let (correct, total) = fraction.split_once('/')?;
    let percent = tail.strip_suffix("%)")?;
    Some((correct.parse().ok()?, total.parse().ok()?, percent.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::SessionBuilder;
    use super::super::options::{QuestionCount, QuizMode, SessionOptions};
    use quiz_core::model::{ImageStore, Question, QuestionBank, QuestionId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bank() -> QuestionBank {
        let q1 = Question::new(
            QuestionId::new(0),
            "Capital of France?",
            vec!["Paris".into(), "Rome".into()],
            vec!["Paris".into()],
            Some("Capital since 508.".into()),
            None,
        )
        .unwrap();
        let q2 = Question::new(
            QuestionId::new(1),
            "Which are primes?",
            vec!["2".into(), "4".into(), "5".into()],
            vec!["2".into(), "5".into()],
            None,
            None,
        )
        .unwrap();
        QuestionBank::new("bank.txt", vec![q1, q2], ImageStore::new()).unwrap()
    }

    fn in_bank_order(timer_minutes: u32) -> super::super::QuizSession {
        // All + a fixed seed keeps the test independent of shuffle order by
        // looking questions up through their prompts instead of positions.
        let options = SessionOptions {
            count: QuestionCount::All,
            allow_repeats: false,
            mode: QuizMode::Practice,
            timer_minutes,
        };
        let bank = bank();
        SessionBuilder::new(&bank, options)
            .build_with_rng(&mut StdRng::seed_from_u64(9))
            .unwrap()
    }

    fn index_of(session: &super::super::QuizSession, prompt: &str) -> usize {
        session
            .questions()
            .iter()
            .position(|q| q.question().prompt() == prompt)
            .unwrap()
    }

    #[test]
    fn unfinished_session_cannot_be_reviewed() {
        let session = in_bank_order(0);
        assert_eq!(
            Review::from_session(&session).unwrap_err(),
            SessionError::NotFinished
        );
    }

    #[test]
    fn full_marks_review() {
        let mut session = in_bank_order(0);
        let single = index_of(&session, "Capital of France?");
        let multi = index_of(&session, "Which are primes?");
        session.select_answer(single, "Paris").unwrap();
        session.select_answer(multi, "2").unwrap();
        session.select_answer(multi, "5").unwrap();
        session.finish().unwrap();

        let review = Review::from_session(&session).unwrap();
        assert_eq!(review.correct(), 2);
        assert_eq!(review.percent(), 100);
        assert_eq!(review.score_line(), "Score: 2/2 (100%)");
    }

    #[test]
    fn partial_multi_answer_scores_wrong() {
        let mut session = in_bank_order(0);
        let multi = index_of(&session, "Which are primes?");
        session.select_answer(multi, "2").unwrap();
        session.finish().unwrap();

        let review = Review::from_session(&session).unwrap();
        assert_eq!(review.correct(), 0);
        let row = &review.rows()[multi];
        assert!(!row.correct);
        assert_eq!(row.correct_display, "2 | 5");
        assert_eq!(row.user_display, "2");
    }

    #[test]
    fn unanswered_rows_say_so() {
        let mut session = in_bank_order(0);
        session.finish().unwrap();
        let review = Review::from_session(&session).unwrap();
        assert!(review.rows().iter().all(|r| r.user_display == "(no answer)"));
        assert_eq!(review.score_line(), "Score: 0/2 (0%)");
    }

    #[test]
    fn export_carries_marks_flags_and_reasons() {
        let mut session = in_bank_order(0);
        let single = index_of(&session, "Capital of France?");
        session.select_answer(single, "Paris").unwrap();
        session.toggle_flag(single).unwrap();
        session.finish().unwrap();

        let text = Review::from_session(&session).unwrap().to_text();
        assert!(text.contains("✓"));
        assert!(text.contains("✗"));
        assert!(text.contains("[FLAGGED]"));
        assert!(text.contains("Reason: Capital since 508."));
        assert!(text.ends_with("Score: 1/2 (50%)\n"));
    }

    #[test]
    fn score_line_round_trips() {
        let mut session = in_bank_order(0);
        let single = index_of(&session, "Capital of France?");
        session.select_answer(single, "Paris").unwrap();
        session.finish().unwrap();

        let review = Review::from_session(&session).unwrap();
        let parsed = parse_score_line(&review.to_text()).unwrap();
        assert_eq!(parsed, (review.correct(), review.total(), review.percent()));
    }

    #[test]
    fn percent_rounds_half_up() {
        // 1/3 = 33.33 → 33; 2/3 = 66.67 → 67; 1/2 = 50
        let cases = [(1usize, 3usize, 33u32), (2, 3, 67), (1, 2, 50), (5, 8, 63)];
        for (correct, total, expected) in cases {
            let review = Review {
                rows: Vec::new(),
                correct,
                total,
            };
            assert_eq!(review.percent(), expected, "{correct}/{total}");
        }
    }

    #[test]
    fn malformed_score_lines_do_not_parse() {
        assert_eq!(parse_score_line("no score here"), None);
        assert_eq!(parse_score_line("Score: nonsense"), None);
        assert_eq!(parse_score_line("Score: 3/4 (75%)"), Some((3, 4, 75)));
    }
}
