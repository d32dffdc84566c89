use std::borrow::Cow;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::exam::answer::Answer;
use crate::exam::catalog::{Difficulty, Question, QuestionKind};
use crate::exam::status::QuestionStatus;
use crate::ui::layout::text_alignment;
use crate::ui::theme::Theme;

pub struct QuestionView<'a> {
    question: &'a Question,
    answer: Option<&'a Answer>,
    draft: Option<&'a str>,
    index: usize,
    total: usize,
    is_marked: bool,
    option_cursor: usize,
    editing: bool,
    locale: &'a str,
    theme: &'a Theme,
}

impl<'a> QuestionView<'a> {
    pub fn new(question: &'a Question, index: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            question,
            answer: None,
            draft: None,
            index,
            total,
            is_marked: false,
            option_cursor: 0,
            editing: false,
            locale: "ar",
            theme,
        }
    }

    pub fn answer(mut self, answer: Option<&'a Answer>) -> Self {
        self.answer = answer;
        self
    }

    /// Editor text shown instead of the stored answer while editing.
    pub fn draft(mut self, draft: &'a str) -> Self {
        self.draft = Some(draft);
        self
    }

    pub fn marked(mut self, is_marked: bool) -> Self {
        self.is_marked = is_marked;
        self
    }

    pub fn cursor(mut self, option_cursor: usize, editing: bool) -> Self {
        self.option_cursor = option_cursor;
        self.editing = editing;
        self
    }

    pub fn locale(mut self, locale: &'a str) -> Self {
        self.locale = locale;
        self
    }

    fn choice_lines(&self, labels: &[String], selected: Option<usize>) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let is_cursor = i == self.option_cursor;
                let radio = if selected == Some(i) { "(•)" } else { "( )" };
                let pointer = if is_cursor { ">" } else { " " };
                let style = if selected == Some(i) {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else if is_cursor {
                    Style::default().fg(colors.header_fg())
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(Span::styled(format!(" {pointer} {radio} {label}"), style))
            })
            .collect()
    }

    fn answer_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        match self.question.kind {
            QuestionKind::MultipleChoice => {
                let selected = match self.answer {
                    Some(Answer::Choice(choice)) => {
                        self.question.options.iter().position(|o| o == choice)
                    }
                    _ => None,
                };
                self.choice_lines(&self.question.options, selected)
            }
            QuestionKind::TrueFalse => {
                let labels = [
                    t!("question.true").to_string(),
                    t!("question.false").to_string(),
                ];
                let selected = match self.answer {
                    Some(Answer::Boolean(true)) => Some(0),
                    Some(Answer::Boolean(false)) => Some(1),
                    _ => None,
                };
                self.choice_lines(&labels, selected)
            }
            QuestionKind::Essay => {
                let border = if self.editing {
                    colors.accent()
                } else {
                    colors.border()
                };
                let text = match (self.editing, self.draft) {
                    (true, Some(draft)) => Some(Cow::Borrowed(draft)),
                    _ => self.answer.map(|a| a.as_text()),
                };
                let mut lines = Vec::new();
                match text {
                    Some(text) if !text.is_empty() => {
                        for text_line in text.split('\n') {
                            lines.push(Line::from(Span::styled(
                                format!("  {text_line}"),
                                Style::default().fg(colors.fg()),
                            )));
                        }
                    }
                    _ => lines.push(Line::from(Span::styled(
                        format!("  {}", t!("question.essay_placeholder")),
                        Style::default().fg(colors.text_muted()),
                    ))),
                }
                if self.editing {
                    lines.push(Line::from(Span::styled(
                        format!("  ▏{}", t!("question.essay_editing")),
                        Style::default().fg(border),
                    )));
                }
                lines
            }
        }
    }
}

fn difficulty_color(theme: &Theme, difficulty: Difficulty) -> Color {
    let colors = &theme.colors;
    match difficulty {
        Difficulty::Beginner => colors.success(),
        Difficulty::Intermediate => colors.warning(),
        Difficulty::Advanced => colors.error(),
    }
}

impl Widget for QuestionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(inner);

        // Badge line: difficulty, tags, mark flag.
        let mut badge = vec![Span::styled(
            format!(" {} ", t!(self.question.difficulty.label_key())),
            Style::default()
                .fg(colors.bg())
                .bg(difficulty_color(self.theme, self.question.difficulty)),
        )];
        for tag in &self.question.tags {
            badge.push(Span::raw(" "));
            badge.push(Span::styled(
                format!("#{tag}"),
                Style::default().fg(colors.text_muted()),
            ));
        }
        if self.is_marked {
            badge.push(Span::styled(
                format!("  ⚑ {}", t!("question.marked")),
                Style::default()
                    .fg(colors.status(QuestionStatus::Marked))
                    .add_modifier(Modifier::BOLD),
            ));
        }
        Paragraph::new(Line::from(badge)).render(layout[0], buf);

        let mut prompt = vec![Line::from(Span::styled(
            self.question.prompt.primary.clone(),
            Style::default()
                .fg(colors.header_fg())
                .add_modifier(Modifier::BOLD),
        ))];
        if !self.question.prompt.secondary.is_empty() {
            prompt.push(Line::from(Span::styled(
                self.question.prompt.secondary.clone(),
                Style::default().fg(colors.text_muted()),
            )));
        }
        Paragraph::new(prompt)
            .alignment(text_alignment(self.locale))
            .wrap(Wrap { trim: false })
            .render(layout[1], buf);

        Paragraph::new(self.answer_lines())
            .wrap(Wrap { trim: false })
            .render(layout[2], buf);

        let at_start = self.index == 0;
        let at_end = self.index + 1 >= self.total;
        let nav_style = |disabled: bool| {
            if disabled {
                Style::default().fg(colors.text_muted())
            } else {
                Style::default().fg(colors.accent())
            }
        };
        let footer = Line::from(vec![
            Span::styled(format!(" ← {}", t!("question.prev")), nav_style(at_start)),
            Span::styled(
                format!("   {} / {}   ", self.index + 1, self.total),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(format!("{} →", t!("question.next")), nav_style(at_end)),
        ]);
        Paragraph::new(footer).render(layout[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::catalog::Prompt;

    fn essay_question() -> Question {
        Question {
            id: "3".to_string(),
            prompt: Prompt {
                primary: "Explain".to_string(),
                secondary: String::new(),
            },
            kind: QuestionKind::Essay,
            options: Vec::new(),
            difficulty: Difficulty::Advanced,
            tags: Vec::new(),
        }
    }

    fn rendered(view: QuestionView<'_>) -> String {
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn editor_shows_draft_over_stored_answer() {
        let theme = Theme::default();
        let question = essay_question();
        let stored = Answer::essay("stored text");

        let idle = rendered(
            QuestionView::new(&question, 0, 1, &theme)
                .answer(Some(&stored))
                .draft("draft text"),
        );
        assert!(idle.contains("stored text"));
        assert!(!idle.contains("draft text"));

        let editing = rendered(
            QuestionView::new(&question, 0, 1, &theme)
                .answer(Some(&stored))
                .cursor(0, true)
                .draft("draft text"),
        );
        assert!(editing.contains("draft text"));
        assert!(!editing.contains("stored text"));
    }
}
