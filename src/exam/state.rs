use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::exam::answer::Answer;
use crate::exam::catalog::{Catalog, Question};
use crate::exam::status::QuestionStatus;
use crate::exam::summary::{self, ExamSummary, Pace, SubmitTrigger};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExamError {
    #[error("the exam has no questions")]
    EmptyCatalog,
    #[error("the exam duration must be at least one second")]
    ZeroDuration,
}

impl ExamError {
    pub fn message_key(&self) -> &'static str {
        match self {
            ExamError::EmptyCatalog => "errors.empty_catalog",
            ExamError::ZeroDuration => "errors.zero_duration",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Reviewing,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Raised once when the countdown crosses a warning threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub threshold_secs: u32,
}

pub struct ExamState {
    catalog: Catalog,
    duration_secs: u32,
    warning_thresholds: Vec<u32>,
    phase: Phase,
    current_index: usize,
    answers: BTreeMap<String, Answer>,
    marked: BTreeSet<String>,
    remaining_secs: u32,
    is_calculator_open: bool,
    notices: Vec<Notice>,
    summary: Option<ExamSummary>,
}

impl ExamState {
    pub fn new(catalog: Catalog, duration_secs: u32) -> Self {
        Self {
            catalog,
            duration_secs,
            warning_thresholds: Vec::new(),
            phase: Phase::NotStarted,
            current_index: 0,
            answers: BTreeMap::new(),
            marked: BTreeSet::new(),
            remaining_secs: duration_secs,
            is_calculator_open: false,
            notices: Vec::new(),
            summary: None,
        }
    }

    pub fn with_warnings(mut self, thresholds: &[u32]) -> Self {
        self.warning_thresholds = thresholds.to_vec();
        self.warning_thresholds.sort_unstable_by(|a, b| b.cmp(a));
        self.warning_thresholds.dedup();
        self
    }

    // --- transitions ---

    /// Returns `Ok(true)` when the exam actually started. Unaccepted terms and
    /// repeated starts are silent no-ops.
    pub fn start(&mut self, accepted_terms: bool) -> Result<bool, ExamError> {
        if self.phase != Phase::NotStarted {
            return Ok(false);
        }
        if !accepted_terms {
            debug!("start ignored: terms not accepted");
            return Ok(false);
        }
        if self.catalog.is_empty() {
            warn!(title = %self.catalog.title, "refusing to start exam without questions");
            return Err(ExamError::EmptyCatalog);
        }
        if self.duration_secs == 0 {
            warn!(title = %self.catalog.title, "refusing to start exam with zero duration");
            return Err(ExamError::ZeroDuration);
        }

        self.phase = Phase::InProgress;
        self.current_index = 0;
        self.remaining_secs = self.duration_secs;
        info!(
            title = %self.catalog.title,
            questions = self.catalog.len(),
            duration_secs = self.duration_secs,
            "exam started"
        );
        Ok(true)
    }

    pub fn record_answer(&mut self, question_id: &str, answer: Answer) {
        if !self.is_running() {
            return;
        }
        let Some(question) = self.catalog.question(question_id) else {
            debug!(question_id, "answer for unknown question ignored");
            return;
        };
        if !answer.fits(question) {
            debug!(question_id, ?answer, "answer does not fit question kind");
            return;
        }
        if answer.is_blank() {
            self.answers.remove(question_id);
            return;
        }
        debug!(question_id, "answer recorded");
        self.answers.insert(question_id.to_string(), answer);
    }

    pub fn toggle_mark(&mut self, question_id: &str) {
        if !self.is_running() || self.catalog.index_of(question_id).is_none() {
            return;
        }
        if !self.marked.remove(question_id) {
            self.marked.insert(question_id.to_string());
        }
        debug!(question_id, marked = self.marked.contains(question_id), "mark toggled");
    }

    pub fn navigate(&mut self, direction: Direction) {
        if !self.is_running() {
            return;
        }
        let last = self.catalog.len().saturating_sub(1);
        self.current_index = match direction {
            Direction::Next => (self.current_index + 1).min(last),
            Direction::Prev => self.current_index.saturating_sub(1),
        };
    }

    pub fn navigate_to(&mut self, index: usize) {
        if !self.is_running() || index >= self.catalog.len() {
            return;
        }
        self.current_index = index;
    }

    /// Advance the countdown one second. Returns the summary on the tick that
    /// expires the exam, and only on that tick.
    pub fn tick(&mut self) -> Option<ExamSummary> {
        if !self.is_running() {
            return None;
        }
        let before = self.remaining_secs;
        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        for &threshold in &self.warning_thresholds {
            if before > threshold && self.remaining_secs <= threshold {
                info!(threshold_secs = threshold, "time warning");
                self.notices.push(Notice {
                    threshold_secs: threshold,
                });
            }
        }

        if self.remaining_secs == 0 {
            return Some(self.finish(SubmitTrigger::TimeExpired));
        }
        None
    }

    pub fn toggle_calculator(&mut self) {
        if self.is_running() {
            self.is_calculator_open = !self.is_calculator_open;
        }
    }

    pub fn close_calculator(&mut self) {
        self.is_calculator_open = false;
    }

    pub fn enter_review(&mut self) {
        if self.phase == Phase::InProgress {
            self.phase = Phase::Reviewing;
        }
    }

    pub fn exit_review(&mut self) {
        if self.phase == Phase::Reviewing {
            self.phase = Phase::InProgress;
        }
    }

    /// `None` only before the exam started. After the first call the same frozen
    /// summary is returned.
    pub fn submit(&mut self) -> Option<ExamSummary> {
        match self.phase {
            Phase::NotStarted => None,
            Phase::Finished => self.summary.clone(),
            Phase::InProgress | Phase::Reviewing => Some(self.finish(SubmitTrigger::Manual)),
        }
    }

    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    fn finish(&mut self, trigger: SubmitTrigger) -> ExamSummary {
        self.phase = Phase::Finished;
        self.is_calculator_open = false;

        let total = self.catalog.len();
        let answered_count = self.answers.len();
        let result = ExamSummary {
            total,
            answered_count,
            unanswered_count: total - answered_count,
            marked_count: self.marked.len(),
            elapsed_secs: self.elapsed_secs(),
            remaining_secs: self.remaining_secs,
            trigger,
        };
        info!(
            ?trigger,
            answered = result.answered_count,
            unanswered = result.unanswered_count,
            marked = result.marked_count,
            "exam submitted"
        );
        self.summary = Some(result.clone());
        result
    }

    // --- projections ---

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::InProgress | Phase::Reviewing)
    }

    pub fn is_review_screen_active(&self) -> bool {
        self.phase == Phase::Reviewing
    }

    pub fn is_calculator_open(&self) -> bool {
        self.is_calculator_open
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn question_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        if !self.has_started() {
            return None;
        }
        self.catalog.get(self.current_index)
    }

    pub fn answers(&self) -> &BTreeMap<String, Answer> {
        &self.answers
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn is_marked(&self, question_id: &str) -> bool {
        self.marked.contains(question_id)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.duration_secs.saturating_sub(self.remaining_secs)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn summary(&self) -> Option<&ExamSummary> {
        self.summary.as_ref()
    }

    pub fn progress_percent(&self) -> f64 {
        summary::percent(self.answers.len(), self.catalog.len())
    }

    pub fn pace(&self) -> Pace {
        Pace::assess(
            self.answers.len(),
            self.catalog.len(),
            self.elapsed_secs(),
            self.duration_secs,
        )
    }

    pub fn status_of(&self, index: usize) -> Option<QuestionStatus> {
        let question = self.catalog.get(index)?;
        let is_current = self.has_started() && index == self.current_index;
        Some(QuestionStatus::derive(
            is_current,
            self.answers.contains_key(&question.id),
            self.marked.contains(&question.id),
        ))
    }

    /// Sidebar projection, one status per catalog question.
    pub fn statuses(&self) -> Vec<QuestionStatus> {
        (0..self.catalog.len())
            .filter_map(|i| self.status_of(i))
            .collect()
    }

    /// Review grid projection: same precedence without a current question.
    pub fn review_statuses(&self) -> Vec<QuestionStatus> {
        self.catalog
            .questions
            .iter()
            .map(|q| {
                QuestionStatus::derive(
                    false,
                    self.answers.contains_key(&q.id),
                    self.marked.contains(&q.id),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(duration: u32) -> ExamState {
        let mut state = ExamState::new(Catalog::builtin().unwrap(), duration);
        assert_eq!(state.start(true), Ok(true));
        state
    }

    #[test]
    fn start_requires_accepted_terms() {
        let mut state = ExamState::new(Catalog::builtin().unwrap(), 60);
        assert_eq!(state.start(false), Ok(false));
        assert_eq!(state.phase(), Phase::NotStarted);
        assert!(state.current_question().is_none());
        assert_eq!(state.start(true), Ok(true));
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.remaining_secs(), 60);
        // a second start changes nothing
        assert_eq!(state.start(true), Ok(false));
    }

    #[test]
    fn empty_catalog_refuses_to_start() {
        let catalog = Catalog::from_toml_str("title = \"none\"").unwrap();
        let mut state = ExamState::new(catalog, 60);
        assert_eq!(state.start(true), Err(ExamError::EmptyCatalog));
        assert!(!state.has_started());
    }

    #[test]
    fn zero_duration_refuses_to_start() {
        let mut state = ExamState::new(Catalog::builtin().unwrap(), 0);
        assert_eq!(state.start(true), Err(ExamError::ZeroDuration));
    }

    #[test]
    fn mutations_before_start_are_ignored() {
        let mut state = ExamState::new(Catalog::builtin().unwrap(), 60);
        state.record_answer("2", Answer::Boolean(true));
        state.toggle_mark("1");
        state.navigate(Direction::Next);
        assert!(state.tick().is_none());
        assert!(state.answers().is_empty());
        assert_eq!(state.marked_count(), 0);
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.remaining_secs(), 60);
        assert!(state.submit().is_none());
    }

    #[test]
    fn answer_overwrites_and_blank_essay_clears() {
        let mut state = started(60);
        state.record_answer("1", Answer::Choice("لا يوجد فرق".to_string()));
        state.record_answer("1", Answer::Choice("الإيرادات تشمل التكاليف".to_string()));
        assert_eq!(
            state.answer_for("1"),
            Some(&Answer::Choice("الإيرادات تشمل التكاليف".to_string()))
        );

        state.record_answer("3", Answer::essay("ارتفاع الأسعار"));
        assert!(state.answer_for("3").is_some());
        state.record_answer("3", Answer::essay("   "));
        assert!(state.answer_for("3").is_none());
    }

    #[test]
    fn mismatched_answer_is_ignored() {
        let mut state = started(60);
        state.record_answer("1", Answer::Choice("not an option".to_string()));
        state.record_answer("2", Answer::essay("text"));
        state.record_answer("3", Answer::Boolean(true));
        assert!(state.answers().is_empty());
    }

    #[test]
    fn blank_essay_on_other_kind_keeps_answer() {
        let mut state = started(60);
        state.record_answer("2", Answer::Boolean(true));
        state.record_answer("2", Answer::essay("  "));
        assert_eq!(state.answer_for("2"), Some(&Answer::Boolean(true)));
    }

    #[test]
    fn toggle_mark_adds_and_removes() {
        let mut state = started(60);
        state.toggle_mark("2");
        assert!(state.is_marked("2"));
        state.toggle_mark("2");
        assert!(!state.is_marked("2"));
    }

    #[test]
    fn navigate_to_out_of_range_is_ignored() {
        let mut state = started(60);
        state.navigate_to(2);
        assert_eq!(state.current_index(), 2);
        state.navigate_to(3);
        assert_eq!(state.current_index(), 2);
    }

    #[test]
    fn review_is_reentrant_and_keeps_answers_editable() {
        let mut state = started(60);
        state.enter_review();
        assert!(state.is_review_screen_active());
        state.record_answer("2", Answer::Boolean(false));
        state.exit_review();
        assert_eq!(state.phase(), Phase::InProgress);
        state.enter_review();
        assert_eq!(state.submit().unwrap().answered_count, 1);
        assert!(!state.is_review_screen_active());
    }

    #[test]
    fn calculator_flag_flips_and_closes_on_submit() {
        let mut state = started(60);
        state.toggle_calculator();
        assert!(state.is_calculator_open());
        state.toggle_calculator();
        assert!(!state.is_calculator_open());
        state.toggle_calculator();
        state.submit();
        assert!(!state.is_calculator_open());
        state.toggle_calculator();
        assert!(!state.is_calculator_open());
    }

    #[test]
    fn warnings_fire_once_per_threshold() {
        let mut state = ExamState::new(Catalog::builtin().unwrap(), 10).with_warnings(&[5, 2, 5]);
        state.start(true).unwrap();
        for _ in 0..5 {
            state.tick();
        }
        assert_eq!(state.notices(), &[Notice { threshold_secs: 5 }]);
        for _ in 0..3 {
            state.tick();
        }
        assert_eq!(state.notices().len(), 2);
        state.dismiss_notice(0);
        assert_eq!(state.notices(), &[Notice { threshold_secs: 2 }]);
        state.dismiss_notice(7);
        assert_eq!(state.notices().len(), 1);
    }

    #[test]
    fn sidebar_statuses_follow_precedence() {
        let mut state = started(60);
        state.record_answer("2", Answer::Boolean(true));
        state.toggle_mark("2");
        state.toggle_mark("3");
        assert_eq!(
            state.statuses(),
            vec![
                QuestionStatus::Current,
                QuestionStatus::Answered,
                QuestionStatus::Marked,
            ]
        );
        assert_eq!(
            state.review_statuses(),
            vec![
                QuestionStatus::Unanswered,
                QuestionStatus::Answered,
                QuestionStatus::Marked,
            ]
        );
    }

    #[test]
    fn progress_and_elapsed_track_state() {
        let mut state = started(60);
        state.record_answer("2", Answer::Boolean(true));
        state.tick();
        state.tick();
        assert_eq!(state.elapsed_secs(), 2);
        assert!((state.progress_percent() - 100.0 / 3.0).abs() < 0.01);
    }
}
