use std::borrow::Cow;

use icu_normalizer::ComposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};

use crate::exam::catalog::{Question, QuestionKind};

/// Labels the true/false pair is rendered with in the original Arabic interface.
pub const TRUE_LABEL: &str = "صحيح";
pub const FALSE_LABEL: &str = "خطأ";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Choice(String),
    Boolean(bool),
    Essay(String),
}

impl Answer {
    /// Build an essay answer in NFC so visually identical Arabic input compares equal.
    pub fn essay(text: &str) -> Self {
        Answer::Essay(normalize(text).into_owned())
    }

    /// Interpret free-form text the way the question kind expects it.
    pub fn from_text(kind: QuestionKind, text: &str) -> Option<Self> {
        match kind {
            QuestionKind::MultipleChoice => Some(Answer::Choice(text.to_string())),
            QuestionKind::TrueFalse => match text.trim() {
                TRUE_LABEL | "true" => Some(Answer::Boolean(true)),
                FALSE_LABEL | "false" => Some(Answer::Boolean(false)),
                _ => None,
            },
            QuestionKind::Essay => Some(Answer::essay(text)),
        }
    }

    pub fn fits(&self, question: &Question) -> bool {
        match (self, question.kind) {
            (Answer::Choice(choice), QuestionKind::MultipleChoice) => {
                question.options.iter().any(|o| o == choice)
            }
            (Answer::Boolean(_), QuestionKind::TrueFalse) => true,
            (Answer::Essay(_), QuestionKind::Essay) => true,
            _ => false,
        }
    }

    /// A blank essay counts as no answer at all.
    pub fn is_blank(&self) -> bool {
        matches!(self, Answer::Essay(text) if text.trim().is_empty())
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Answer::Choice(s) | Answer::Essay(s) => Cow::Borrowed(s),
            Answer::Boolean(true) => Cow::Borrowed(TRUE_LABEL),
            Answer::Boolean(false) => Cow::Borrowed(FALSE_LABEL),
        }
    }
}

fn normalize(text: &str) -> Cow<'_, str> {
    ComposingNormalizerBorrowed::new_nfc().normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::catalog::{Difficulty, Prompt};

    fn question(kind: QuestionKind, options: &[&str]) -> Question {
        Question {
            id: "q".to_string(),
            prompt: Prompt {
                primary: "?".to_string(),
                secondary: String::new(),
            },
            kind,
            options: options.iter().map(|s| s.to_string()).collect(),
            difficulty: Difficulty::Beginner,
            tags: Vec::new(),
        }
    }

    #[test]
    fn choice_must_be_one_of_the_options() {
        let q = question(QuestionKind::MultipleChoice, &["a", "b"]);
        assert!(Answer::Choice("b".to_string()).fits(&q));
        assert!(!Answer::Choice("c".to_string()).fits(&q));
        assert!(!Answer::Boolean(true).fits(&q));
    }

    #[test]
    fn arabic_true_false_labels_parse() {
        assert_eq!(
            Answer::from_text(QuestionKind::TrueFalse, "صحيح"),
            Some(Answer::Boolean(true))
        );
        assert_eq!(
            Answer::from_text(QuestionKind::TrueFalse, "خطأ"),
            Some(Answer::Boolean(false))
        );
        assert_eq!(Answer::from_text(QuestionKind::TrueFalse, "ربما"), None);
    }

    #[test]
    fn essay_is_nfc_normalized() {
        // "e" + combining acute composes to a single code point.
        let answer = Answer::essay("caf\u{0065}\u{0301}");
        assert_eq!(answer, Answer::Essay("caf\u{00e9}".to_string()));
    }

    #[test]
    fn whitespace_essay_is_blank() {
        assert!(Answer::essay("  \n").is_blank());
        assert!(!Answer::essay("التضخم").is_blank());
        assert!(!Answer::Boolean(false).is_blank());
    }
}
