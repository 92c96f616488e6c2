//! Raw question blocks, the uniform output of every format reader.

use regex::Regex;
use std::sync::OnceLock;

/// One question unit as extracted by a format reader, prior to normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBlock {
    pub prompt: String,
    pub option_lines: Vec<String>,
    pub answer_line: Option<String>,
    pub reason_line: Option<String>,
    pub image: Option<RawImage>,
}

impl RawBlock {
    #[must_use]
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub(crate) fn push_option(&mut self, line: &str) {
        let cleaned = clean_option_line(line);
        if !cleaned.is_empty() {
            self.option_lines.push(cleaned);
        }
    }
}

/// Raw bytes of a picture attached to a block, with its original extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub bytes: Vec<u8>,
    pub ext: String,
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\u{2022}\-–•*]\s+").expect("valid bullet regex"))
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[A-Za-z][).]|\d+\.)\s+").expect("valid label regex"))
}

/// Strip bullet markers and `A)` / `A.` / `1.` labels from an option line.
#[must_use]
pub fn clean_option_line(line: &str) -> String {
    let s = line.trim();
    let s = bullet_re().replace(s, "");
    let s = label_re().replace(s.as_ref(), "");
    s.trim().to_string()
}

/// True when the line carries one of the recognized bullet markers.
#[must_use]
pub fn is_bullet_line(line: &str) -> bool {
    bullet_re().is_match(line.trim_start())
}
