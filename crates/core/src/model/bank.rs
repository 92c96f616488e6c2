use std::fmt;

use crate::model::ids::ImageKey;
use crate::model::images::ImageStore;
use crate::model::question::Question;

// Manual Display/Error impls: thiserror's derive treats any field named
// `source` as the error cause, but here `source` is the document name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    Empty { source: String },
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { source } => write!(f, "no valid questions in {source}"),
        }
    }
}

impl std::error::Error for BankError {}

/// The full normalized set of questions from one source document.
///
/// Immutable after load; a new bank replaces the old one when a new document
/// is opened. Sessions sample from a bank but never mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    source: String,
    questions: Vec<Question>,
    images: ImageStore,
}

impl QuestionBank {
    /// Build a bank from normalized questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` when `questions` is empty; an empty bank is
    /// a document-level failure, not a valid state.
    pub fn new(
        source: impl Into<String>,
        questions: Vec<Question>,
        images: ImageStore,
    ) -> Result<Self, BankError> {
        let source = source.into();
        if questions.is_empty() {
            return Err(BankError::Empty { source });
        }
        Ok(Self {
            source,
            questions,
            images,
        })
    }

    /// Name of the document this bank was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
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
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Raw bytes for an extracted image, if present.
    #[must_use]
    pub fn image(&self, key: &ImageKey) -> Option<&[u8]> {
        self.images.get(key)
    }

    #[must_use]
    pub fn images(&self) -> &ImageStore {
        &self.images
    }
}
