use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::exam::state::ExamState;
use crate::exam::status::QuestionStatus;
use crate::ui::components::question_grid::QuestionGrid;
use crate::ui::theme::Theme;

pub struct ReviewPanel<'a> {
    exam: &'a ExamState,
    statuses: &'a [QuestionStatus],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> ReviewPanel<'a> {
    pub fn new(
        exam: &'a ExamState,
        statuses: &'a [QuestionStatus],
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            exam,
            statuses,
            selected,
            theme,
        }
    }
}

fn stat_card(value: usize, label: String, color: Color, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Style::default().fg(color))),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

impl Widget for ReviewPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("review.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(4),
            ])
            .split(inner);

        let total = self.exam.question_count();
        let answered = self.exam.answers().len();
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(layout[0]);
        stat_card(
            answered,
            t!("review.answered").to_string(),
            colors.success(),
            cards[0],
            buf,
        );
        stat_card(
            total - answered,
            t!("review.unanswered").to_string(),
            colors.error(),
            cards[1],
            buf,
        );
        stat_card(
            self.exam.marked_count(),
            t!("review.marked").to_string(),
            colors.warning(),
            cards[2],
            buf,
        );

        let actions = Line::from(vec![
            Span::styled(
                t!("review.back").to_string(),
                Style::default().fg(colors.accent()),
            ),
            Span::raw("    "),
            Span::styled(
                t!("review.submit").to_string(),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(actions)
            .alignment(Alignment::Center)
            .render(layout[1], buf);

        QuestionGrid::new(t!("question.list_title").to_string(), self.statuses, self.theme)
            .selected(self.selected)
            .render(layout[2], buf);
    }
}
