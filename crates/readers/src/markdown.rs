//! Markdown reader built on pulldown-cmark events.
//!
//! A heading (any level) or a `Q:` paragraph starts a block; list items
//! under it are options; `**Answer:**` / `**Reason:**` paragraphs close it.
//! Bold markers never reach us: collecting text events across a `Strong`
//! span yields the plain `Answer: …` line.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::answer_line::{match_answer, match_reason};
use crate::block::RawBlock;

pub(crate) fn read_blocks(text: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<RawBlock> = None;
    let mut buffer: Option<String> = None;
    let mut capture = Capture::None;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                buffer = Some(String::new());
                capture = Capture::Heading;
            }
            Event::Start(Tag::Item) => {
                buffer = Some(String::new());
                capture = Capture::Item;
            }
            Event::Start(Tag::Paragraph) if capture == Capture::None => {
                buffer = Some(String::new());
                capture = Capture::Paragraph;
            }
            Event::End(TagEnd::Heading(_)) => {
                let heading = buffer.take().unwrap_or_default();
                capture = Capture::None;
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(RawBlock::with_prompt(heading.trim()));
            }
            Event::End(TagEnd::Item) => {
                let item = buffer.take().unwrap_or_default();
                capture = Capture::None;
                if let Some(block) = current.as_mut() {
                    block.push_option(&item);
                }
            }
            Event::End(TagEnd::Paragraph) if capture == Capture::Paragraph => {
                let paragraph = buffer.take().unwrap_or_default();
                capture = Capture::None;
                handle_paragraph(&paragraph, &mut blocks, &mut current);
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(buf) = buffer.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(buf) = buffer.as_mut() {
                    buf.push('\n');
                }
            }
            _ => {}
        }
    }

    if let Some(block) = current.take() {
        blocks.push(block);
    }
    blocks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Heading,
    Item,
    Paragraph,
}

fn handle_paragraph(paragraph: &str, blocks: &mut Vec<RawBlock>, current: &mut Option<RawBlock>) {
    // A paragraph may hold several source lines joined by soft breaks;
    // classify each line on its own so `Answer:`/`Reason:` pairs survive.
    for line in paragraph.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line
            .split_at_checked(2)
            .filter(|(marker, _)| marker.eq_ignore_ascii_case("q:"))
            .map(|(_, rest)| rest)
        {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            *current = Some(RawBlock::with_prompt(rest.trim()));
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };
        if let Some(payload) = match_answer(line) {
            block.answer_line = Some(payload);
        } else if let Some(payload) = match_reason(line) {
            block.reason_line = Some(payload);
        }
    }
}
