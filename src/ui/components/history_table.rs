use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::exam::summary::{SubmitTrigger, format_clock};
use crate::store::schema::ExamRecord;
use crate::ui::theme::Theme;

/// Past submissions, newest first.
pub struct HistoryTable<'a> {
    records: &'a [ExamRecord],
    scroll: usize,
    theme: &'a Theme,
}

impl<'a> HistoryTable<'a> {
    pub fn new(records: &'a [ExamRecord], scroll: usize, theme: &'a Theme) -> Self {
        Self {
            records,
            scroll,
            theme,
        }
    }
}

impl Widget for HistoryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("history.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.records.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                t!("history.empty").to_string(),
                Style::default().fg(colors.text_muted()),
            )))
            .alignment(Alignment::Center)
            .render(inner, buf);
            return;
        }

        let header = format!(
            " {:<17} {:<24} {:>8} {:>6} {:>7}  {}",
            t!("history.date"),
            t!("history.exam"),
            t!("history.score"),
            t!("history.marked"),
            t!("history.time"),
            ""
        );
        let mut lines = vec![Line::from(Span::styled(
            header,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ))];

        let visible = inner.height.saturating_sub(1) as usize;
        for record in self.records.iter().rev().skip(self.scroll).take(visible) {
            let s = &record.summary;
            let (trigger, color) = match s.trigger {
                SubmitTrigger::Manual => (t!("history.trigger_manual"), colors.fg()),
                SubmitTrigger::TimeExpired => (t!("history.trigger_expired"), colors.warning()),
            };
            let title: String = record.exam_title.chars().take(24).collect();
            lines.push(Line::from(Span::styled(
                format!(
                    " {:<17} {:<24} {:>8} {:>6} {:>7}  {}",
                    record.finished_at.format("%Y-%m-%d %H:%M"),
                    title,
                    format!("{}/{}", s.answered_count, s.total),
                    s.marked_count,
                    format_clock(s.elapsed_secs),
                    trigger
                ),
                Style::default().fg(color),
            )));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
