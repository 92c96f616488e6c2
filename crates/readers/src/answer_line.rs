//! The answer/reason marker grammar shared by all format readers.
//!
//! A line matching (case-insensitive) `Answer[ is]?:` supplies the correct
//! answer tokens; a `Reason:` line supplies the explanation. Markdown bold
//! markers around the marker are tolerated so raw `**Answer:**` lines match
//! even outside the markdown reader.

use regex::Regex;
use std::sync::OnceLock;

fn answer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:\*\*)?\s*answer(?:\s+is)?\s*:\s*(?:\*\*)?\s*(.*?)\s*$")
            .expect("valid answer regex")
    })
}

fn reason_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:\*\*)?\s*reason\s*:\s*(?:\*\*)?\s*(.*?)\s*$")
            .expect("valid reason regex")
    })
}

/// Returns the payload after the answer marker, if the line is an answer line.
#[must_use]
pub(crate) fn match_answer(line: &str) -> Option<String> {
    answer_re()
        .captures(line)
        .map(|caps| caps[1].trim_end_matches("**").trim().to_string())
}

/// Returns the payload after the reason marker, if the line is a reason line.
#[must_use]
pub(crate) fn match_reason(line: &str) -> Option<String> {
    reason_re()
        .captures(line)
        .map(|caps| caps[1].trim_end_matches("**").trim().to_string())
}

/// Result of splitting an answer payload into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenSplit {
    Tokens(Vec<String>),
    /// The payload contained both `|` and `;`; ambiguous, caller must flag it.
    Mixed,
}

/// Split an answer payload on `|` or `;`, whichever is present.
pub(crate) fn split_tokens(payload: &str) -> TokenSplit {
    let has_pipe = payload.contains('|');
    let has_semi = payload.contains(';');
    if has_pipe && has_semi {
        return TokenSplit::Mixed;
    }
    let delimiter = if has_semi { ';' } else { '|' };
    let tokens: Vec<String> = payload
        .split(delimiter)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    TokenSplit::Tokens(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_plain_answer_marker() {
        assert_eq!(match_answer("Answer: Paris"), Some("Paris".to_string()));
        assert_eq!(match_answer("answer is: Paris"), Some("Paris".to_string()));
        assert_eq!(match_answer("ANSWER IS : A | B"), Some("A | B".to_string()));
    }

    #[test]
    fn matches_bold_markdown_marker() {
        assert_eq!(match_answer("**Answer:** Paris"), Some("Paris".to_string()));
        assert_eq!(
            match_reason("**Reason:** it is the capital"),
            Some("it is the capital".to_string())
        );
    }

    #[test]
    fn non_marker_lines_do_not_match() {
        assert_eq!(match_answer("The answer is obvious"), None);
        assert_eq!(match_reason("no marker here"), None);
    }

    #[test]
    fn splits_on_pipe() {
        assert_eq!(
            split_tokens("A | B |C"),
            TokenSplit::Tokens(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn splits_on_semicolon() {
        assert_eq!(
            split_tokens("A; B"),
            TokenSplit::Tokens(vec!["A".to_string(), "B".to_string()])
        );
    }

    #[test]
    fn single_token_needs_no_delimiter() {
        assert_eq!(
            split_tokens("Paris"),
            TokenSplit::Tokens(vec!["Paris".to_string()])
        );
    }

    #[test]
    fn mixed_delimiters_are_flagged() {
        assert_eq!(split_tokens("A | B; C"), TokenSplit::Mixed);
    }

    #[test]
    fn empty_payload_yields_no_tokens() {
        assert_eq!(split_tokens("  "), TokenSplit::Tokens(Vec::new()));
    }
}
