//! Question-bank document readers.
//!
//! Each supported format extracts raw question blocks its own way; a shared
//! normalization pass then turns blocks into canonical [`quiz_core`]
//! questions, collecting per-block diagnostics instead of failing the whole
//! file.

#![forbid(unsafe_code)]

mod answer_line;
mod block;
mod docx;
mod error;
mod markdown;
mod normalize;
mod ooxml;
mod plain;
mod pptx;

use std::path::Path;

use tracing::debug;

use quiz_core::model::QuestionBank;

pub use crate::block::{RawBlock, RawImage};
pub use crate::error::{Diagnostic, DiagnosticReason, ReadError};

/// Supported question-bank document formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    SlideDeck,
    PlainText,
    Markdown,
    WordDocument,
}

impl DocumentFormat {
    /// Detect the format from the file extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pptx" => Some(Self::SlideDeck),
            "txt" => Some(Self::PlainText),
            "md" | "markdown" => Some(Self::Markdown),
            "docx" => Some(Self::WordDocument),
            _ => None,
        }
    }
}

/// A parsed bank together with the blocks that had to be skipped.
#[derive(Debug)]
pub struct BankLoad {
    pub bank: QuestionBank,
    pub diagnostics: Vec<Diagnostic>,
}

/// Load a question bank from a document on disk.
///
/// # Errors
///
/// `UnsupportedFormat` for unknown extensions, `Io` when the file cannot be
/// read, plus any format-level parse error from [`parse_bytes`].
pub fn load_bank(path: &Path) -> Result<BankLoad, ReadError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| ReadError::UnsupportedFormat {
        path: path.display().to_string(),
    })?;
    let bytes = std::fs::read(path)?;
    let source = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    debug!(source, ?format, len = bytes.len(), "loading question bank");
    parse_bytes(format, &source, &bytes)
}

/// Parse in-memory document bytes as the given format.
///
/// `source` is a display name carried into questions and diagnostics.
///
/// # Errors
///
/// Format-level failures only (broken archive, malformed xml, no valid
/// questions at all); malformed individual blocks become diagnostics.
pub fn parse_bytes(
    format: DocumentFormat,
    source: &str,
    bytes: &[u8],
) -> Result<BankLoad, ReadError> {
    let blocks = match format {
        DocumentFormat::SlideDeck => pptx::read_blocks(bytes)?,
        DocumentFormat::PlainText => plain::read_blocks(&String::from_utf8_lossy(bytes)),
        DocumentFormat::Markdown => markdown::read_blocks(&String::from_utf8_lossy(bytes)),
        DocumentFormat::WordDocument => docx::read_blocks(bytes)?,
    };
    normalize::normalize(source, blocks)
}
