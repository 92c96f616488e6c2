//! Plain-text reader: blocks are delimited by `Q:` marker lines.

use crate::answer_line::{match_answer, match_reason};
use crate::block::{RawBlock, is_bullet_line};

/// Extract raw blocks from a `Q:`-delimited text document.
///
/// Lines between the prompt marker and the first bullet continue the prompt;
/// bullet lines are options; `Answer:` / `Reason:` lines close the block out.
/// Anything else is ignored. This format carries no images.
pub(crate) fn read_blocks(text: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<RawBlock> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = strip_prompt_marker(line) {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(RawBlock::with_prompt(rest.trim()));
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };

        if let Some(payload) = match_answer(line) {
            block.answer_line = Some(payload);
        } else if let Some(payload) = match_reason(line) {
            block.reason_line = Some(payload);
        } else if is_bullet_line(line) {
            block.push_option(line);
        } else if block.option_lines.is_empty() && block.answer_line.is_none() {
            // Prompt wraps onto following lines until options start.
            block.prompt.push(' ');
            block.prompt.push_str(line);
        }
    }

    if let Some(block) = current.take() {
        blocks.push(block);
    }
    blocks
}

fn strip_prompt_marker(line: &str) -> Option<&str> {
    let (marker, rest) = line.split_at_checked(2)?;
    marker.eq_ignore_ascii_case("q:").then_some(rest)
}
