use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::{ImageKey, QuestionId};

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("question has no options")]
    NoOptions,

    #[error("duplicate option text: {0:?}")]
    DuplicateOption(String),

    #[error("question has no correct answers")]
    NoCorrectAnswers,

    #[error("correct answer {0:?} is not one of the options")]
    UnknownCorrectAnswer(String),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single normalized quiz question, immutable once built.
///
/// Invariants enforced by [`Question::new`]:
/// - prompt is non-blank;
/// - options are non-empty and pairwise distinct (case-sensitive);
/// - correct answers are non-empty and each one appears verbatim in the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct: BTreeSet<String>,
    explanation: Option<String>,
    image: Option<ImageKey>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns a `QuestionError` if any of the structural invariants above
    /// does not hold.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: impl IntoIterator<Item = String>,
        explanation: Option<String>,
        image: Option<ImageKey>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        let mut seen = BTreeSet::new();
        for option in &options {
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }

        let correct: BTreeSet<String> = correct.into_iter().collect();
        if correct.is_empty() {
            return Err(QuestionError::NoCorrectAnswers);
        }
        for answer in &correct {
            if !options.iter().any(|option| option == answer) {
                return Err(QuestionError::UnknownCorrectAnswer(answer.clone()));
            }
        }

        let explanation = explanation
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(Self {
            id,
            prompt,
            options,
            correct,
            explanation,
            image,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Options in their original document order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The canonical correct answer set; every element is one of [`Self::options`].
    #[must_use]
    pub fn correct_answers(&self) -> &BTreeSet<String> {
        &self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageKey> {
        self.image.as_ref()
    }

    /// True when more than one option is correct (checkbox semantics).
    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.correct.len() > 1
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
