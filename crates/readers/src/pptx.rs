//! Slide-deck (.pptx) reader.
//!
//! One slide is one block: the first text shape is the prompt, every later
//! text shape contributes option lines, the notes slide supplies the answer
//! and reason lines, and the first picture on the slide becomes the block
//! image.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::answer_line::{match_answer, match_reason};
use crate::block::{RawBlock, RawImage};
use crate::error::ReadError;
use crate::ooxml::{self, Archive};

pub(crate) fn read_blocks(bytes: &[u8]) -> Result<Vec<RawBlock>, ReadError> {
    let mut archive = ooxml::open_archive(bytes)?;

    let mut slide_parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| Some((slide_number(name)?, name.to_string())))
        .collect();
    slide_parts.sort();

    let mut blocks = Vec::new();
    for (_, part) in slide_parts {
        blocks.push(read_slide(&mut archive, &part)?);
    }
    Ok(blocks)
}

fn slide_number(part: &str) -> Option<u32> {
    part.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

fn read_slide(archive: &mut Archive<'_>, part: &str) -> Result<RawBlock, ReadError> {
    let xml = ooxml::read_part(archive, part)?.unwrap_or_default();
    let content = parse_slide(&xml, part)?;

    let mut block = RawBlock::default();
    let mut shapes = content.shapes.into_iter();
    if let Some(first) = shapes.next() {
        block.prompt = first.join(" ");
    }
    for shape in shapes {
        for line in shape {
            block.push_option(&line);
        }
    }

    let rels_part = rels_part_name(part);
    let rels = match ooxml::read_part(archive, &rels_part)? {
        Some(xml) => ooxml::parse_relationships(&xml, &rels_part)?,
        None => Default::default(),
    };

    if let Some(rel) = rels.values().find(|r| r.rel_type.ends_with("/notesSlide")) {
        let notes_part = resolve_target(&rel.target);
        if let Some(notes_xml) = ooxml::read_part(archive, &notes_part)? {
            let lines = text_lines(&notes_xml, &notes_part)?;
            let (answer, reason) = answer_reason_from_notes(&lines);
            block.answer_line = answer;
            block.reason_line = reason;
        }
    }

    if let Some(rel_id) = content.image_rel {
        if let Some(rel) = rels.get(&rel_id) {
            let media_part = resolve_target(&rel.target);
            if let Some(bytes) = ooxml::read_part_bytes(archive, &media_part)? {
                let ext = media_part
                    .rsplit('.')
                    .next()
                    .unwrap_or("png")
                    .to_ascii_lowercase();
                block.image = Some(RawImage { bytes, ext });
            }
        }
    }

    Ok(block)
}

fn rels_part_name(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a slide-relative relationship target to a package part name.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix("../") {
        Some(rest) => format!("ppt/{rest}"),
        None => format!("ppt/slides/{target}"),
    }
}

struct SlideContent {
    /// Non-empty text lines, grouped per shape in document order.
    shapes: Vec<Vec<String>>,
    /// Relationship id of the first picture on the slide.
    image_rel: Option<String>,
}

fn parse_slide(xml: &str, part: &str) -> Result<SlideContent, ReadError> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut image_rel: Option<String> = None;

    let mut in_shape = false;
    let mut in_pic = false;
    let mut in_para = false;
    let mut in_run_text = false;
    let mut shape_lines: Vec<String> = Vec::new();
    let mut para = String::new();

    loop {
        match reader.read_event().map_err(|err| ooxml::xml_err(part, err))? {
            Event::Start(e) => match e.name().as_ref() {
                b"p:sp" => {
                    in_shape = true;
                    shape_lines.clear();
                }
                b"p:pic" => in_pic = true,
                b"a:p" if in_shape => {
                    in_para = true;
                    para.clear();
                }
                b"a:t" => in_run_text = true,
                b"a:blip" if in_pic && image_rel.is_none() => {
                    image_rel = ooxml::attr_value(&e, b"r:embed");
                }
                _ => {}
            },
            Event::Empty(e) => {
                if e.name().as_ref() == b"a:blip" && in_pic && image_rel.is_none() {
                    image_rel = ooxml::attr_value(&e, b"r:embed");
                }
            }
            Event::Text(t) => {
                if in_para && in_run_text {
                    para.push_str(&t.unescape().map_err(|err| ooxml::xml_err(part, err))?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"a:t" => in_run_text = false,
                b"a:p" if in_shape => {
                    in_para = false;
                    let line = para.trim().to_string();
                    if !line.is_empty() {
                        shape_lines.push(line);
                    }
                }
                b"p:sp" => {
                    in_shape = false;
                    if !shape_lines.is_empty() {
                        shapes.push(std::mem::take(&mut shape_lines));
                    }
                }
                b"p:pic" => in_pic = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(SlideContent { shapes, image_rel })
}

/// Collect the text of every paragraph in a notes slide, one line per `a:p`.
fn text_lines(xml: &str, part: &str) -> Result<Vec<String>, ReadError> {
    let mut reader = Reader::from_str(xml);
    let mut lines = Vec::new();
    let mut in_para = false;
    let mut in_run_text = false;
    let mut para = String::new();

    loop {
        match reader.read_event().map_err(|err| ooxml::xml_err(part, err))? {
            Event::Start(e) => match e.name().as_ref() {
                b"a:p" => {
                    in_para = true;
                    para.clear();
                }
                b"a:t" => in_run_text = true,
                _ => {}
            },
            Event::Text(t) => {
                if in_para && in_run_text {
                    para.push_str(&t.unescape().map_err(|err| ooxml::xml_err(part, err))?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"a:t" => in_run_text = false,
                b"a:p" => {
                    in_para = false;
                    lines.push(para.trim().to_string());
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines)
}

/// The first answer-marker line supplies the answer; the next non-empty line
/// is the reason, unless it is itself a marker line.
fn answer_reason_from_notes(lines: &[String]) -> (Option<String>, Option<String>) {
    for (i, line) in lines.iter().enumerate() {
        let Some(answer) = match_answer(line) else {
            continue;
        };
        let reason = lines[i + 1..]
            .iter()
            .find(|l| !l.trim().is_empty())
            .and_then(|l| {
                if match_answer(l).is_some() {
                    None
                } else if let Some(payload) = match_reason(l) {
                    Some(payload)
                } else {
                    Some(l.trim().to_string())
                }
            });
        return (Some(answer), reason);
    }
    (None, None)
}
