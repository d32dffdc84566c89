use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::exam::answer::Answer;
use crate::exam::calculator::Calculator;
use crate::exam::catalog::{Catalog, QuestionKind};
use crate::exam::state::{Direction, ExamError, ExamState};
use crate::exam::summary::ExamSummary;
use crate::exam::timer::ExamTimer;
use crate::store::json_store::JsonStore;
use crate::store::schema::ExamRecord;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Instructions,
    Exam,
    Review,
    Result,
    History,
}

pub struct App {
    pub screen: AppScreen,
    pub exam: ExamState,
    pub timer: ExamTimer,
    pub calculator: Calculator,
    pub config: Config,
    pub theme: &'static Theme,
    pub store: Option<JsonStore>,
    pub history: Vec<ExamRecord>,
    pub accepted_terms: bool,
    pub focus_mode: bool,
    pub option_cursor: usize,
    pub editing_essay: bool,
    /// Raw editor text; leading blanks live here until the answer has content.
    pub essay_draft: String,
    /// Digits typed after `g`, while a go-to is pending.
    pub jump_input: Option<String>,
    pub review_selected: usize,
    pub history_scroll: usize,
    pub start_error: Option<ExamError>,
    pub last_summary: Option<ExamSummary>,
    pub should_quit: bool,
    history_return: AppScreen,
    catalog: Catalog,
}

impl App {
    pub fn new(
        config: Config,
        catalog: Catalog,
        theme: &'static Theme,
        store: Option<JsonStore>,
    ) -> Self {
        let history = store
            .as_ref()
            .map(|s| s.load_history().records)
            .unwrap_or_default();
        let exam = Self::fresh_exam(&config, &catalog);

        Self {
            screen: AppScreen::Instructions,
            exam,
            timer: ExamTimer::new(),
            calculator: Calculator::new(),
            config,
            theme,
            store,
            history,
            accepted_terms: false,
            focus_mode: false,
            option_cursor: 0,
            editing_essay: false,
            essay_draft: String::new(),
            jump_input: None,
            review_selected: 0,
            history_scroll: 0,
            start_error: None,
            last_summary: None,
            should_quit: false,
            history_return: AppScreen::Instructions,
            catalog,
        }
    }

    fn fresh_exam(config: &Config, catalog: &Catalog) -> ExamState {
        ExamState::new(catalog.clone(), config.exam_duration_secs)
            .with_warnings(&config.warning_thresholds_secs)
    }

    // --- instructions ---

    pub fn toggle_terms(&mut self) {
        if !self.exam.has_started() {
            self.accepted_terms = !self.accepted_terms;
        }
    }

    pub fn start_exam(&mut self, now: Instant) {
        match self.exam.start(self.accepted_terms) {
            Ok(true) => {
                self.start_error = None;
                self.timer.start(now);
                self.screen = AppScreen::Exam;
                self.sync_cursor();
            }
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "exam could not start");
                self.start_error = Some(e);
            }
        }
    }

    // --- clock ---

    pub fn on_tick(&mut self, now: Instant) {
        let due = self.timer.due_ticks(now);
        for _ in 0..due {
            if let Some(summary) = self.exam.tick() {
                self.finish(summary);
                break;
            }
        }
    }

    // --- submission ---

    pub fn submit(&mut self) {
        if let Some(summary) = self.exam.submit() {
            self.finish(summary);
        }
    }

    fn finish(&mut self, summary: ExamSummary) {
        self.stop_editing();
        self.jump_input = None;
        // Expiry and manual submit can race within one loop turn; only the first records.
        if self.timer.cancel() {
            self.record_history(&summary);
        }
        self.last_summary = Some(summary);
        self.screen = AppScreen::Result;
    }

    fn record_history(&mut self, summary: &ExamSummary) {
        let record = ExamRecord {
            exam_title: self.exam.catalog().title.clone(),
            finished_at: Utc::now(),
            duration_secs: self.exam.duration_secs(),
            summary: summary.clone(),
        };
        match self.store {
            Some(ref store) => match store.append_record(record) {
                Ok(data) => self.history = data.records,
                Err(e) => error!(error = %e, "failed to save exam history"),
            },
            None => self.history.push(record),
        }
    }

    // --- navigation ---

    pub fn next_question(&mut self) {
        self.exam.navigate(Direction::Next);
        self.sync_cursor();
    }

    pub fn prev_question(&mut self) {
        self.exam.navigate(Direction::Prev);
        self.sync_cursor();
    }

    pub fn jump_to(&mut self, index: usize) {
        self.exam.navigate_to(index);
        self.sync_cursor();
    }

    pub fn begin_jump(&mut self) {
        if self.exam.is_running() {
            self.jump_input = Some(String::new());
        }
    }

    pub fn jump_digit(&mut self, ch: char) {
        if let Some(input) = self.jump_input.as_mut()
            && ch.is_ascii_digit()
            && input.len() < 4
        {
            input.push(ch);
        }
    }

    pub fn jump_backspace(&mut self) {
        if let Some(input) = self.jump_input.as_mut() {
            input.pop();
        }
    }

    /// Go to the typed question number (1-based); out of range stays put.
    pub fn commit_jump(&mut self) {
        let Some(input) = self.jump_input.take() else {
            return;
        };
        if let Ok(number) = input.parse::<usize>()
            && number >= 1
        {
            self.jump_to(number - 1);
        }
    }

    pub fn cancel_jump(&mut self) {
        self.jump_input = None;
    }

    /// Put the option cursor on the recorded answer, or the first option.
    fn sync_cursor(&mut self) {
        self.stop_editing();
        let Some(question) = self.exam.current_question() else {
            self.option_cursor = 0;
            return;
        };
        self.option_cursor = match self.exam.answer_for(&question.id) {
            Some(Answer::Choice(choice)) => question
                .options
                .iter()
                .position(|o| o == choice)
                .unwrap_or(0),
            Some(Answer::Boolean(false)) => 1,
            _ => 0,
        };
    }

    fn option_count(&self) -> usize {
        match self.exam.current_question() {
            Some(q) => match q.kind {
                QuestionKind::MultipleChoice => q.options.len(),
                QuestionKind::TrueFalse => 2,
                QuestionKind::Essay => 0,
            },
            None => 0,
        }
    }

    pub fn move_option(&mut self, down: bool) {
        let count = self.option_count();
        if count == 0 {
            return;
        }
        self.option_cursor = if down {
            (self.option_cursor + 1).min(count - 1)
        } else {
            self.option_cursor.saturating_sub(1)
        };
    }

    /// Record the option under the cursor; on an essay question, open the editor instead.
    pub fn choose_option(&mut self) {
        let Some(question) = self.exam.current_question() else {
            return;
        };
        let answer = match question.kind {
            QuestionKind::MultipleChoice => match question.options.get(self.option_cursor) {
                Some(choice) => Answer::Choice(choice.clone()),
                None => return,
            },
            QuestionKind::TrueFalse => Answer::Boolean(self.option_cursor == 0),
            QuestionKind::Essay => {
                if self.exam.is_running() {
                    self.essay_draft = self
                        .exam
                        .answer_for(&question.id)
                        .map(|a| a.as_text().into_owned())
                        .unwrap_or_default();
                    self.editing_essay = true;
                }
                return;
            }
        };
        let id = question.id.clone();
        self.exam.record_answer(&id, answer);
    }

    pub fn answer_true_false(&mut self, value: bool) {
        let Some(question) = self.exam.current_question() else {
            return;
        };
        if question.kind != QuestionKind::TrueFalse {
            return;
        }
        let id = question.id.clone();
        self.option_cursor = if value { 0 } else { 1 };
        self.exam.record_answer(&id, Answer::Boolean(value));
    }

    // --- essay editor ---

    fn edit_essay(&mut self, edit: impl FnOnce(&mut String)) {
        if !self.editing_essay {
            return;
        }
        let Some(question) = self.exam.current_question() else {
            return;
        };
        if question.kind != QuestionKind::Essay {
            return;
        }
        let id = question.id.clone();
        edit(&mut self.essay_draft);
        self.exam.record_answer(&id, Answer::essay(&self.essay_draft));
    }

    pub fn essay_input(&mut self, ch: char) {
        self.edit_essay(|text| text.push(ch));
    }

    pub fn essay_newline(&mut self) {
        self.edit_essay(|text| text.push('\n'));
    }

    pub fn essay_backspace(&mut self) {
        self.edit_essay(|text| {
            text.pop();
        });
    }

    pub fn stop_editing(&mut self) {
        self.editing_essay = false;
        self.essay_draft.clear();
    }

    // --- marks, tools, notices ---

    pub fn toggle_mark_current(&mut self) {
        if let Some(id) = self.exam.current_question().map(|q| q.id.clone()) {
            self.exam.toggle_mark(&id);
        }
    }

    pub fn toggle_calculator(&mut self) {
        self.exam.toggle_calculator();
    }

    pub fn close_calculator(&mut self) {
        self.exam.close_calculator();
    }

    pub fn calculator_key(&mut self, ch: char) {
        self.calculator.press(ch);
    }

    pub fn toggle_focus(&mut self) {
        self.focus_mode = !self.focus_mode;
    }

    pub fn dismiss_notice(&mut self) {
        self.exam.dismiss_notice(0);
    }

    // --- review ---

    pub fn enter_review(&mut self) {
        self.exam.enter_review();
        if self.exam.is_review_screen_active() {
            self.stop_editing();
            self.review_selected = self.exam.current_index();
            self.screen = AppScreen::Review;
        }
    }

    pub fn back_to_exam(&mut self) {
        self.exam.exit_review();
        if self.exam.is_running() {
            self.screen = AppScreen::Exam;
        }
    }

    pub fn review_move(&mut self, delta: isize) {
        let last = self.exam.question_count().saturating_sub(1);
        self.review_selected = self
            .review_selected
            .saturating_add_signed(delta)
            .min(last);
    }

    /// Leave review straight onto the selected question.
    pub fn review_open_selected(&mut self) {
        self.back_to_exam();
        self.jump_to(self.review_selected);
    }

    // --- history ---

    pub fn go_to_history(&mut self) {
        if self.exam.is_running() {
            return;
        }
        self.history_return = self.screen;
        self.history_scroll = 0;
        self.screen = AppScreen::History;
    }

    pub fn back_from_history(&mut self) {
        self.screen = self.history_return;
    }

    pub fn scroll_history(&mut self, down: bool) {
        let last = self.history.len().saturating_sub(1);
        self.history_scroll = if down {
            (self.history_scroll + 1).min(last)
        } else {
            self.history_scroll.saturating_sub(1)
        };
    }

    /// Discard the finished attempt and return to the instructions.
    pub fn reset_exam(&mut self) {
        self.exam = Self::fresh_exam(&self.config, &self.catalog);
        self.timer = ExamTimer::new();
        self.calculator = Calculator::new();
        self.accepted_terms = false;
        self.option_cursor = 0;
        self.stop_editing();
        self.jump_input = None;
        self.review_selected = 0;
        self.start_error = None;
        self.last_summary = None;
        self.screen = AppScreen::Instructions;
        info!("new attempt prepared");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::exam::summary::SubmitTrigger;

    const CATALOG: &str = r#"
title = "Audit basics"

[[question]]
id = "1"
kind = "multiple_choice"
difficulty = "beginner"
prompt = { primary = "Pick one" }
options = ["a", "b", "c"]

[[question]]
id = "2"
kind = "true_false"
difficulty = "intermediate"
prompt = { primary = "True?" }

[[question]]
id = "3"
kind = "essay"
difficulty = "advanced"
prompt = { primary = "Explain" }
"#;

    fn theme() -> &'static Theme {
        Box::leak(Box::new(Theme::default()))
    }

    fn app_with(duration_secs: u32) -> App {
        let config = Config {
            exam_duration_secs: duration_secs,
            ..Config::default()
        };
        let catalog = Catalog::from_toml_str(CATALOG).unwrap();
        App::new(config, catalog, theme(), None)
    }

    fn started(duration_secs: u32, now: Instant) -> App {
        let mut app = app_with(duration_secs);
        app.toggle_terms();
        app.start_exam(now);
        app
    }

    #[test]
    fn start_requires_terms() {
        let mut app = app_with(60);
        app.start_exam(Instant::now());
        assert_eq!(app.screen, AppScreen::Instructions);
        assert!(!app.exam.has_started());

        app.toggle_terms();
        app.start_exam(Instant::now());
        assert_eq!(app.screen, AppScreen::Exam);
        assert!(app.timer.is_running());
    }

    #[test]
    fn zero_duration_reports_error() {
        let mut app = app_with(0);
        app.toggle_terms();
        app.start_exam(Instant::now());
        assert_eq!(app.start_error, Some(ExamError::ZeroDuration));
        assert_eq!(app.screen, AppScreen::Instructions);
    }

    #[test]
    fn choosing_options_records_answers() {
        let mut app = started(60, Instant::now());
        app.move_option(true);
        app.choose_option();
        assert_eq!(
            app.exam.answer_for("1"),
            Some(&Answer::Choice("b".to_string()))
        );

        app.next_question();
        app.move_option(true);
        app.choose_option();
        assert_eq!(app.exam.answer_for("2"), Some(&Answer::Boolean(false)));

        // cursor follows the recorded answer when coming back
        app.prev_question();
        assert_eq!(app.option_cursor, 1);
    }

    #[test]
    fn essay_editing_round_trip() {
        let mut app = started(60, Instant::now());
        app.jump_to(2);
        app.choose_option();
        assert!(app.editing_essay);

        for ch in "hi".chars() {
            app.essay_input(ch);
        }
        assert_eq!(
            app.exam.answer_for("3"),
            Some(&Answer::Essay("hi".to_string()))
        );

        app.essay_backspace();
        app.essay_backspace();
        assert_eq!(app.exam.answer_for("3"), None);
    }

    #[test]
    fn essay_keeps_leading_whitespace() {
        let mut app = started(60, Instant::now());
        app.jump_to(2);
        app.choose_option();

        app.essay_input(' ');
        app.essay_newline();
        assert_eq!(app.exam.answer_for("3"), None);
        assert_eq!(app.essay_draft, " \n");

        app.essay_input('x');
        assert_eq!(
            app.exam.answer_for("3"),
            Some(&Answer::Essay(" \nx".to_string()))
        );

        // reopening the editor resumes from the stored text
        app.stop_editing();
        app.choose_option();
        assert_eq!(app.essay_draft, " \nx");
    }

    #[test]
    fn go_to_reaches_questions_past_nine() {
        let mut toml = String::from("title = \"long\"\n");
        for i in 1..=12 {
            toml.push_str(&format!(
                "[[question]]\nid = \"{i}\"\nkind = \"essay\"\ndifficulty = \"beginner\"\nprompt = {{ primary = \"Q{i}\" }}\n"
            ));
        }
        let catalog = Catalog::from_toml_str(&toml).unwrap();
        let mut app = App::new(Config::default(), catalog, theme(), None);
        app.toggle_terms();
        app.start_exam(Instant::now());

        app.begin_jump();
        app.jump_digit('1');
        app.jump_digit('x');
        app.jump_digit('2');
        assert_eq!(app.jump_input.as_deref(), Some("12"));
        app.commit_jump();
        assert_eq!(app.exam.current_index(), 11);
        assert!(app.jump_input.is_none());

        app.begin_jump();
        app.jump_digit('4');
        app.jump_digit('0');
        app.commit_jump();
        assert_eq!(app.exam.current_index(), 11);

        app.begin_jump();
        app.jump_digit('9');
        app.jump_backspace();
        app.jump_digit('3');
        app.cancel_jump();
        assert_eq!(app.exam.current_index(), 11);
    }

    #[test]
    fn expiry_moves_to_result_and_records_once() {
        let t0 = Instant::now();
        let mut app = started(3, t0);
        app.on_tick(t0 + Duration::from_millis(1500));
        assert_eq!(app.exam.remaining_secs(), 2);
        assert_eq!(app.screen, AppScreen::Exam);

        app.on_tick(t0 + Duration::from_secs(10));
        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(
            app.last_summary.as_ref().map(|s| s.trigger),
            Some(SubmitTrigger::TimeExpired)
        );
        assert_eq!(app.history.len(), 1);

        app.submit();
        assert_eq!(app.history.len(), 1);
        assert_eq!(
            app.last_summary.as_ref().map(|s| s.trigger),
            Some(SubmitTrigger::TimeExpired)
        );
    }

    #[test]
    fn review_then_submit() {
        let mut app = started(60, Instant::now());
        app.toggle_mark_current();
        app.enter_review();
        assert_eq!(app.screen, AppScreen::Review);

        app.review_move(5);
        assert_eq!(app.review_selected, 2);
        app.review_open_selected();
        assert_eq!(app.screen, AppScreen::Exam);
        assert_eq!(app.exam.current_index(), 2);

        app.enter_review();
        app.submit();
        assert_eq!(app.screen, AppScreen::Result);
        let summary = app.last_summary.clone().unwrap();
        assert_eq!(summary.marked_count, 1);
        assert_eq!(summary.unanswered_count, 3);
        assert_eq!(summary.trigger, SubmitTrigger::Manual);
    }

    #[test]
    fn history_blocked_while_running() {
        let mut app = started(60, Instant::now());
        app.go_to_history();
        assert_eq!(app.screen, AppScreen::Exam);

        app.submit();
        app.go_to_history();
        assert_eq!(app.screen, AppScreen::History);
        app.back_from_history();
        assert_eq!(app.screen, AppScreen::Result);
    }

    #[test]
    fn reset_starts_a_clean_attempt() {
        let mut app = started(60, Instant::now());
        app.choose_option();
        app.submit();
        app.reset_exam();

        assert_eq!(app.screen, AppScreen::Instructions);
        assert!(!app.accepted_terms);
        assert!(!app.exam.has_started());
        assert!(app.exam.answers().is_empty());
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn focus_and_calculator_toggles() {
        let mut app = started(60, Instant::now());
        app.toggle_focus();
        assert!(app.focus_mode);

        app.toggle_calculator();
        assert!(app.exam.is_calculator_open());
        app.calculator_key('7');
        assert_eq!(app.calculator.display(), "7");
        app.submit();
        assert!(!app.exam.is_calculator_open());
    }
}
