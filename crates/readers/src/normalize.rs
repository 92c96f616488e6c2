//! Raw block → canonical [`Question`] normalization.

use tracing::warn;

use quiz_core::model::{ImageKey, ImageStore, Question, QuestionBank, QuestionId};

use crate::answer_line::{TokenSplit, split_tokens};
use crate::block::RawBlock;
use crate::error::{Diagnostic, DiagnosticReason, ReadError};
use crate::BankLoad;

/// Normalize one document's raw blocks into a bank.
///
/// Per-block problems are recovered locally: the block is dropped and a
/// [`Diagnostic`] recorded, so one malformed question never blocks the rest.
///
/// # Errors
///
/// Returns `ReadError::BankEmpty` when no block survives normalization.
pub(crate) fn normalize(source: &str, blocks: Vec<RawBlock>) -> Result<BankLoad, ReadError> {
    let mut questions = Vec::new();
    let mut images = ImageStore::new();
    let mut diagnostics = Vec::new();

    for (index, block) in blocks.into_iter().enumerate() {
        match normalize_block(index, block, &mut images) {
            Ok(question) => questions.push(question),
            Err(reason) => {
                let diagnostic = Diagnostic {
                    source: source.to_string(),
                    block_index: index,
                    reason,
                };
                warn!(%diagnostic, "skipping malformed question block");
                diagnostics.push(diagnostic);
            }
        }
    }

    if questions.is_empty() {
        return Err(ReadError::BankEmpty {
            source: source.to_string(),
        });
    }

    // Cannot fail past the emptiness check above, but keep the mapping
    // explicit rather than unwrapping.
    let bank = QuestionBank::new(source, questions, images).map_err(|_| ReadError::BankEmpty {
        source: source.to_string(),
    })?;

    Ok(BankLoad { bank, diagnostics })
}

fn normalize_block(
    index: usize,
    block: RawBlock,
    images: &mut ImageStore,
) -> Result<Question, DiagnosticReason> {
    if block.prompt.trim().is_empty() {
        return Err(DiagnosticReason::NoPrompt);
    }

    let options = dedup_options(block.option_lines);
    if options.is_empty() {
        return Err(DiagnosticReason::NoOptions);
    }

    let answer_line = block.answer_line.ok_or(DiagnosticReason::NoAnswerLine)?;
    let tokens = match split_tokens(&answer_line) {
        TokenSplit::Mixed => return Err(DiagnosticReason::MixedAnswerDelimiters),
        TokenSplit::Tokens(tokens) if tokens.is_empty() => {
            return Err(DiagnosticReason::EmptyAnswer);
        }
        TokenSplit::Tokens(tokens) => tokens,
    };

    let mut correct = Vec::new();
    for token in tokens {
        let option = resolve_token(&token, &options)
            .ok_or(DiagnosticReason::UnmatchedAnswerToken { token })?;
        correct.push(option.to_string());
    }

    let image_key = block.image.map(|image| {
        let block_no = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
        images.insert(ImageKey::for_block(block_no, 1, &image.ext), image.bytes)
    });

    let id = QuestionId::new(u32::try_from(index).unwrap_or(u32::MAX));
    let question = Question::new(id, block.prompt, options, correct, block.reason_line, image_key)?;
    Ok(question)
}

/// Drop duplicate option text (case-sensitive exact) while preserving
/// first-seen order.
fn dedup_options(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if !out.contains(&line) {
            out.push(line);
        }
    }
    out
}

/// Map one answer token to the canonical option text it names.
///
/// Order matters: exact case-insensitive text match first; only when that
/// fails is the token tried as a letter label (`A` = first option) or a
/// 1-indexed number.
fn resolve_token<'a>(token: &str, options: &'a [String]) -> Option<&'a str> {
    let lowered = token.to_lowercase();
    if let Some(option) = options.iter().find(|o| o.to_lowercase() == lowered) {
        return Some(option);
    }

    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            let index = (c.to_ascii_uppercase() as u8 - b'A') as usize;
            return options.get(index).map(String::as_str);
        }
    }

    if token.chars().all(|c| c.is_ascii_digit()) {
        let position: usize = token.parse().ok()?;
        return position
            .checked_sub(1)
            .and_then(|i| options.get(i))
            .map(String::as_str);
    }

    None
}
