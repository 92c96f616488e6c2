//! The options surface consumed by the session builder.

use serde::Deserialize;

/// How many questions the session should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CountRepr")]
pub enum QuestionCount {
    /// Every question in the bank, once.
    All,
    /// Exactly this many (positive).
    Exactly(usize),
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self::All
    }
}

/// Wire shape: a positive integer or the string `"all"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CountRepr {
    Number(usize),
    Text(String),
}

impl TryFrom<CountRepr> for QuestionCount {
    type Error = String;

    fn try_from(repr: CountRepr) -> Result<Self, Self::Error> {
        match repr {
            CountRepr::Number(0) => Err("question count must be positive".to_string()),
            CountRepr::Number(n) => Ok(Self::Exactly(n)),
            CountRepr::Text(s) if s.eq_ignore_ascii_case("all") => Ok(Self::All),
            CountRepr::Text(s) => Err(format!("expected \"all\" or a positive integer, got {s:?}")),
        }
    }
}

/// Whether immediate answer checking is available during the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    #[default]
    Practice,
    Test,
}

/// Everything the session builder consumes. Produced by an external
/// settings surface; absent fields fall back to an untimed practice run
/// over the whole bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionOptions {
    #[serde(rename = "questionCount")]
    pub count: QuestionCount,
    pub allow_repeats: bool,
    pub mode: QuizMode,
    pub timer_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_options_deserialize() {
        let options: SessionOptions = serde_json::from_str(
            r#"{"questionCount": 10, "allowRepeats": true, "mode": "test", "timerMinutes": 30}"#,
        )
        .unwrap();
        assert_eq!(options.count, QuestionCount::Exactly(10));
        assert!(options.allow_repeats);
        assert_eq!(options.mode, QuizMode::Test);
        assert_eq!(options.timer_minutes, 30);
    }

    #[test]
    fn count_accepts_the_all_keyword() {
        let options: SessionOptions = serde_json::from_str(r#"{"questionCount": "all"}"#).unwrap();
        assert_eq!(options.count, QuestionCount::All);
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = serde_json::from_str::<SessionOptions>(r#"{"questionCount": 0}"#);
        assert!(err.is_err());
    }

    #[test]
    fn unknown_count_keyword_is_rejected() {
        let err = serde_json::from_str::<SessionOptions>(r#"{"questionCount": "some"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let options: SessionOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.count, QuestionCount::All);
        assert!(!options.allow_repeats);
        assert_eq!(options.mode, QuizMode::Practice);
        assert_eq!(options.timer_minutes, 0);
    }
}
