//! Error and diagnostic types for document parsing.

use std::fmt;
use thiserror::Error;

use quiz_core::model::QuestionError;

/// Document-level parse failures. Per-block problems are not errors; they
/// become [`Diagnostic`]s and the block is skipped.
///
/// Manual Display/Error impls: thiserror's derive treats any field named
/// `source` as the error cause, but in `BankEmpty` it is the document name.
#[derive(Debug)]
#[non_exhaustive]
pub enum ReadError {
    UnsupportedFormat {
        path: String,
    },

    BankEmpty {
        source: String,
    },

    Io(std::io::Error),

    Archive(zip::result::ZipError),

    Xml {
        part: String,
        source: quick_xml::Error,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { path } => {
                write!(f, "unsupported document format: {path}")
            }
            Self::BankEmpty { source } => write!(f, "no valid questions in {source}"),
            Self::Io(err) => fmt::Display::fmt(err, f),
            Self::Archive(err) => fmt::Display::fmt(err, f),
            Self::Xml { part, .. } => write!(f, "malformed xml in {part}"),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => err.source(),
            Self::Archive(err) => err.source(),
            Self::Xml { source, .. } => Some(source),
            Self::UnsupportedFormat { .. } | Self::BankEmpty { .. } => None,
        }
    }
}

impl From<std::io::Error> for ReadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<zip::result::ZipError> for ReadError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err)
    }
}

/// Why a raw block was dropped during normalization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiagnosticReason {
    #[error("block has no prompt text")]
    NoPrompt,

    #[error("block has no options")]
    NoOptions,

    #[error("block has no answer line")]
    NoAnswerLine,

    #[error("answer line has no tokens")]
    EmptyAnswer,

    #[error("answer line mixes '|' and ';' delimiters")]
    MixedAnswerDelimiters,

    #[error("answer token {token:?} matches no option")]
    UnmatchedAnswerToken { token: String },

    #[error(transparent)]
    Invalid(#[from] QuestionError),
}

/// One skipped block: which file, which block, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source: String,
    pub block_index: usize,
    pub reason: DiagnosticReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: block {}: {}",
            self.source, self.block_index, self.reason
        )
    }
}
