use std::time::{Duration, Instant};

use khatwa::exam::answer::{Answer, TRUE_LABEL};
use khatwa::exam::catalog::{Catalog, QuestionKind};
use khatwa::exam::state::{Direction, ExamError, ExamState, Phase};
use khatwa::exam::status::QuestionStatus;
use khatwa::exam::summary::SubmitTrigger;
use khatwa::exam::timer::ExamTimer;

const CATALOG: &str = r#"
title = "Internal audit basics"

[[question]]
id = "1"
kind = "multiple_choice"
difficulty = "beginner"
prompt = { primary = "ما هو الهدف الرئيسي من التدقيق الداخلي؟", secondary = "What is the main goal of internal auditing?" }
options = ["التحقق", "الضمان", "الإدارة", "التسويق"]
tags = ["basics"]

[[question]]
id = "2"
kind = "true_false"
difficulty = "intermediate"
prompt = { primary = "التدقيق الداخلي نشاط مستقل" }

[[question]]
id = "3"
kind = "essay"
difficulty = "advanced"
prompt = { primary = "اشرح دور لجنة التدقيق" }
"#;

fn catalog() -> Catalog {
    Catalog::from_toml_str(CATALOG).unwrap()
}

fn running(duration_secs: u32) -> ExamState {
    let mut exam = ExamState::new(catalog(), duration_secs);
    assert_eq!(exam.start(true), Ok(true));
    exam
}

#[test]
fn answer_navigate_mark_submit() {
    let mut exam = running(60);

    let answer = Answer::from_text(QuestionKind::TrueFalse, TRUE_LABEL).unwrap();
    exam.record_answer("2", answer);
    exam.navigate(Direction::Next);
    exam.navigate(Direction::Next);
    assert_eq!(exam.current_index(), 2);
    exam.toggle_mark("1");

    let summary = exam.submit().unwrap();
    assert_eq!(summary.answered_count, 1);
    assert_eq!(summary.unanswered_count, 2);
    assert_eq!(summary.marked_count, 1);
    assert_eq!(summary.trigger, SubmitTrigger::Manual);
    assert_eq!(exam.phase(), Phase::Finished);
    assert_eq!(exam.summary(), Some(&summary));
}

#[test]
fn countdown_expires_exactly_once() {
    let mut exam = running(60);

    let expirations: Vec<_> = (0..60).filter_map(|_| exam.tick()).collect();
    assert_eq!(expirations.len(), 1);
    let summary = &expirations[0];
    assert_eq!(summary.answered_count, 0);
    assert_eq!(summary.unanswered_count, 3);
    assert_eq!(summary.marked_count, 0);
    assert_eq!(summary.trigger, SubmitTrigger::TimeExpired);
    assert!(exam.has_finished());

    assert_eq!(exam.tick(), None);
    assert_eq!(exam.remaining_secs(), 0);
}

#[test]
fn navigation_stays_in_bounds() {
    let mut exam = running(60);

    exam.navigate(Direction::Prev);
    assert_eq!(exam.current_index(), 0);

    exam.navigate_to(2);
    exam.navigate(Direction::Next);
    assert_eq!(exam.current_index(), 2);

    exam.navigate_to(3);
    assert_eq!(exam.current_index(), 2);
}

#[test]
fn submit_is_idempotent() {
    let mut exam = running(60);
    exam.record_answer("1", Answer::Choice("الضمان".to_string()));

    let first = exam.submit().unwrap();
    let remaining = exam.remaining_secs();
    assert_eq!(exam.tick(), None);
    assert_eq!(exam.remaining_secs(), remaining);
    let second = exam.submit().unwrap();
    assert_eq!(first, second);
}

#[test]
fn finished_exam_is_frozen() {
    let mut exam = running(60);
    exam.record_answer("1", Answer::Choice("الضمان".to_string()));
    exam.navigate(Direction::Next);
    exam.submit().unwrap();

    exam.record_answer("1", Answer::Choice("التحقق".to_string()));
    exam.record_answer("2", Answer::Boolean(true));
    exam.record_answer("3", Answer::essay("late"));
    exam.toggle_mark("1");
    exam.navigate(Direction::Next);
    exam.navigate_to(0);

    assert_eq!(exam.answers().len(), 1);
    assert_eq!(
        exam.answer_for("1"),
        Some(&Answer::Choice("الضمان".to_string()))
    );
    assert_eq!(exam.marked_count(), 0);
    assert_eq!(exam.current_index(), 1);
}

#[test]
fn unknown_ids_change_nothing() {
    let mut exam = running(60);

    exam.record_answer("99", Answer::Boolean(true));
    exam.toggle_mark("99");
    assert!(exam.answers().is_empty());
    assert_eq!(exam.marked_count(), 0);
}

#[test]
fn mismatched_answers_are_rejected() {
    let mut exam = running(60);

    exam.record_answer("1", Answer::Choice("not an option".to_string()));
    exam.record_answer("2", Answer::Essay("text".to_string()));
    assert!(exam.answers().is_empty());
}

#[test]
fn answered_wins_over_marked() {
    let mut exam = running(60);
    exam.record_answer("2", Answer::Boolean(false));
    exam.toggle_mark("2");
    exam.toggle_mark("3");

    assert_eq!(
        exam.statuses(),
        vec![
            QuestionStatus::Current,
            QuestionStatus::Answered,
            QuestionStatus::Marked,
        ]
    );
}

#[test]
fn cannot_start_without_questions() {
    let empty = Catalog::from_toml_str("title = \"empty\"").unwrap();
    let mut exam = ExamState::new(empty, 60);
    assert_eq!(exam.start(true), Err(ExamError::EmptyCatalog));
    assert!(!exam.has_started());
}

#[test]
fn mutations_before_start_are_ignored() {
    let mut exam = ExamState::new(catalog(), 60);
    exam.record_answer("1", Answer::Choice("التحقق".to_string()));
    exam.navigate(Direction::Next);
    assert_eq!(exam.tick(), None);
    assert_eq!(exam.submit(), None);

    assert!(exam.answers().is_empty());
    assert_eq!(exam.current_index(), 0);
}

#[test]
fn timer_drives_the_countdown() {
    let t0 = Instant::now();
    let mut timer = ExamTimer::new();
    let mut exam = running(5);
    timer.start(t0);

    let mut expired = None;
    for step in 1..=30 {
        let now = t0 + Duration::from_millis(step * 250);
        for _ in 0..timer.due_ticks(now) {
            if let Some(summary) = exam.tick() {
                expired = Some(summary);
            }
        }
        if expired.is_some() {
            assert!(timer.cancel());
            break;
        }
    }

    let summary = expired.unwrap();
    assert_eq!(summary.elapsed_secs, 5);
    assert_eq!(summary.remaining_secs, 0);
    assert!(!timer.cancel());
}

#[test]
fn warnings_fire_as_thresholds_pass() {
    let mut exam = ExamState::new(catalog(), 10).with_warnings(&[5, 2]);
    exam.start(true).unwrap();

    for _ in 0..5 {
        exam.tick();
    }
    assert_eq!(exam.notices().len(), 1);
    assert_eq!(exam.notices()[0].threshold_secs, 5);

    for _ in 0..3 {
        exam.tick();
    }
    assert_eq!(exam.notices().len(), 2);

    exam.dismiss_notice(0);
    assert_eq!(exam.notices()[0].threshold_secs, 2);
}
