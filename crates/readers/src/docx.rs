//! Word-document (.docx) reader.
//!
//! A heading-styled paragraph starts a block; list/numbered paragraphs after
//! it are options; plain paragraphs beginning with `Answer:` / `Reason:`
//! (case-insensitive) supply the answer and explanation.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::answer_line::{match_answer, match_reason};
use crate::block::RawBlock;
use crate::error::ReadError;
use crate::ooxml;

const DOCUMENT_PART: &str = "word/document.xml";

pub(crate) fn read_blocks(bytes: &[u8]) -> Result<Vec<RawBlock>, ReadError> {
    let mut archive = ooxml::open_archive(bytes)?;
    let xml = ooxml::read_part(&mut archive, DOCUMENT_PART)?
        .ok_or(zip::result::ZipError::FileNotFound)?;
    let paragraphs = parse_paragraphs(&xml)?;
    Ok(blocks_from_paragraphs(paragraphs))
}

fn blocks_from_paragraphs(paragraphs: Vec<Paragraph>) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<RawBlock> = None;

    for para in paragraphs {
        if para.is_heading() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(RawBlock::with_prompt(para.text.trim()));
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };

        if para.is_list_item() {
            block.push_option(&para.text);
        } else if let Some(payload) = match_answer(&para.text) {
            block.answer_line = Some(payload);
        } else if let Some(payload) = match_reason(&para.text) {
            block.reason_line = Some(payload);
        }
    }

    if let Some(block) = current.take() {
        blocks.push(block);
    }
    blocks
}

#[derive(Debug, Default)]
struct Paragraph {
    style: Option<String>,
    numbered: bool,
    text: String,
}

impl Paragraph {
    fn is_heading(&self) -> bool {
        self.style
            .as_deref()
            .is_some_and(|s| s.to_ascii_lowercase().starts_with("heading"))
    }

    fn is_list_item(&self) -> bool {
        self.numbered
            || self
                .style
                .as_deref()
                .is_some_and(|s| s.to_ascii_lowercase().contains("list"))
    }
}

fn parse_paragraphs(xml: &str) -> Result<Vec<Paragraph>, ReadError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<Paragraph> = None;
    let mut in_run_text = false;

    loop {
        match reader
            .read_event()
            .map_err(|err| ooxml::xml_err(DOCUMENT_PART, err))?
        {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => current = Some(Paragraph::default()),
                b"w:t" => in_run_text = true,
                b"w:pStyle" => {
                    if let Some(para) = current.as_mut() {
                        para.style = ooxml::attr_value(&e, b"w:val");
                    }
                }
                b"w:numPr" => {
                    if let Some(para) = current.as_mut() {
                        para.numbered = true;
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if in_run_text {
                    if let Some(para) = current.as_mut() {
                        para.text.push_str(
                            &t.unescape()
                                .map_err(|err| ooxml::xml_err(DOCUMENT_PART, err))?,
                        );
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => {
                    if let Some(para) = current.take() {
                        paragraphs.push(para);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str) -> String {
        format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
        )
    }

    fn bullet(text: &str) -> String {
        format!(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/></w:numPr></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
        )
    }

    fn plain(text: &str) -> String {
        format!(r#"<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"#)
    }

    fn document(body: &str) -> String {
        format!(r#"<w:document xmlns:w="x"><w:body>{body}</w:body></w:document>"#)
    }

    fn blocks_from(xml: &str) -> Vec<RawBlock> {
        blocks_from_paragraphs(parse_paragraphs(xml).unwrap())
    }

    #[test]
    fn heading_bullets_and_markers_form_a_block() {
        let xml = document(&format!(
            "{}{}{}{}{}",
            heading("Capital of France?"),
            bullet("Paris"),
            bullet("Rome"),
            plain("Answer: Paris"),
            plain("Reason: capital since 508"),
        ));

        let paragraphs = parse_paragraphs(&xml).unwrap();
        assert_eq!(paragraphs.len(), 5);
        assert!(paragraphs[0].is_heading());
        assert!(paragraphs[1].is_list_item());

        let blocks = blocks_from(&xml);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].prompt, "Capital of France?");
        assert_eq!(blocks[0].option_lines, vec!["Paris", "Rome"]);
        assert_eq!(blocks[0].answer_line.as_deref(), Some("Paris"));
        assert_eq!(blocks[0].reason_line.as_deref(), Some("capital since 508"));
    }

    #[test]
    fn list_paragraph_style_counts_as_option() {
        let xml = document(&format!(
            "{}{}{}",
            heading("q?"),
            r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/></w:pPr><w:r><w:t>yes</w:t></w:r></w:p>"#,
            plain("Answer: yes"),
        ));
        let blocks = blocks_from(&xml);
        assert_eq!(blocks[0].option_lines, vec!["yes"]);
    }

    #[test]
    fn paragraphs_before_first_heading_are_ignored() {
        let xml = document(&format!(
            "{}{}{}{}",
            plain("Introduction text"),
            heading("q?"),
            bullet("yes"),
            plain("Answer: yes"),
        ));
        let blocks = blocks_from(&xml);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].prompt, "q?");
    }

    #[test]
    fn split_runs_concatenate() {
        let xml = document(&format!(
            "{}{}{}",
            heading("q?"),
            bullet("yes"),
            r#"<w:p><w:r><w:t>Answer: </w:t></w:r><w:r><w:t>yes</w:t></w:r></w:p>"#,
        ));
        let blocks = blocks_from(&xml);
        assert_eq!(blocks[0].answer_line.as_deref(), Some("yes"));
    }

    #[test]
    fn two_headings_make_two_blocks() {
        let xml = document(&format!(
            "{}{}{}{}{}{}",
            heading("first?"),
            bullet("a"),
            plain("Answer: a"),
            heading("second?"),
            bullet("b"),
            plain("answer is: b"),
        ));
        let blocks = blocks_from(&xml);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].prompt, "second?");
        assert_eq!(blocks[1].answer_line.as_deref(), Some("b"));
    }
}
