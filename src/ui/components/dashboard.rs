use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::exam::summary::{ExamSummary, SubmitTrigger, format_clock};
use crate::ui::theme::Theme;

/// Final, read-only summary shown once the exam is submitted.
pub struct Dashboard<'a> {
    pub summary: &'a ExamSummary,
    pub title: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(summary: &'a ExamSummary, title: &'a str, theme: &'a Theme) -> Self {
        Self {
            summary,
            title,
            theme,
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("result.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.title.to_string(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let (trigger_text, trigger_color) = match self.summary.trigger {
            SubmitTrigger::TimeExpired => (t!("result.time_expired"), colors.warning()),
            SubmitTrigger::Manual => (t!("result.manual"), colors.success()),
        };
        Paragraph::new(Line::from(Span::styled(
            trigger_text.to_string(),
            Style::default().fg(trigger_color),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        let row = |label: String, value: String, color: Color| {
            Line::from(vec![
                Span::styled(format!("  {label}: "), Style::default().fg(colors.fg())),
                Span::styled(
                    value,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ])
        };

        Paragraph::new(row(
            t!("review.answered").to_string(),
            format!("{} / {}", self.summary.answered_count, self.summary.total),
            colors.success(),
        ))
        .render(layout[2], buf);
        Paragraph::new(row(
            t!("review.unanswered").to_string(),
            self.summary.unanswered_count.to_string(),
            if self.summary.unanswered_count == 0 {
                colors.success()
            } else {
                colors.error()
            },
        ))
        .render(layout[3], buf);
        Paragraph::new(row(
            t!("review.marked").to_string(),
            self.summary.marked_count.to_string(),
            colors.warning(),
        ))
        .render(layout[4], buf);
        Paragraph::new(row(
            t!("result.time_used").to_string(),
            format!(
                "{}  ({} {:.0}%)",
                format_clock(self.summary.elapsed_secs),
                t!("result.completion"),
                self.summary.completion_percent()
            ),
            colors.accent(),
        ))
        .render(layout[5], buf);

        Paragraph::new(Line::from(Span::styled(
            t!("result.hints").to_string(),
            Style::default().fg(colors.accent()),
        )))
        .render(layout[7], buf);
    }
}
