#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionStatus {
    Current,
    Answered,
    Marked,
    Unanswered,
}

impl QuestionStatus {
    /// Precedence is current, then answered, then marked. A question that is both
    /// answered and marked shows as answered.
    pub fn derive(is_current: bool, is_answered: bool, is_marked: bool) -> Self {
        if is_current {
            QuestionStatus::Current
        } else if is_answered {
            QuestionStatus::Answered
        } else if is_marked {
            QuestionStatus::Marked
        } else {
            QuestionStatus::Unanswered
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            QuestionStatus::Current => "status.current",
            QuestionStatus::Answered => "status.answered",
            QuestionStatus::Marked => "status.marked",
            QuestionStatus::Unanswered => "status.unanswered",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_beats_everything() {
        assert_eq!(QuestionStatus::derive(true, true, true), QuestionStatus::Current);
    }

    #[test]
    fn answered_beats_marked() {
        assert_eq!(QuestionStatus::derive(false, true, true), QuestionStatus::Answered);
        assert_eq!(QuestionStatus::derive(false, false, true), QuestionStatus::Marked);
        assert_eq!(QuestionStatus::derive(false, false, false), QuestionStatus::Unanswered);
    }
}
