use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::exam::state::ExamState;
use crate::exam::summary::{Pace, format_clock};
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

/// The countdown turns to the warning color under this many seconds.
const LOW_TIME_SECS: u32 = 300;

pub struct ExamHeader<'a> {
    exam: &'a ExamState,
    focus_mode: bool,
    theme: &'a Theme,
}

impl<'a> ExamHeader<'a> {
    pub fn new(exam: &'a ExamState, focus_mode: bool, theme: &'a Theme) -> Self {
        Self {
            exam,
            focus_mode,
            theme,
        }
    }
}

impl Widget for ExamHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.header_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let remaining = self.exam.remaining_secs();
        let clock_color = if remaining <= LOW_TIME_SECS {
            colors.warning()
        } else {
            colors.accent()
        };
        let clock = format!(" {} ", format_clock(remaining));
        let position = t!(
            "header.question_of",
            current = self.exam.current_index() + 1,
            total = self.exam.question_count()
        );

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.exam.catalog().title),
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("| {position} "),
                Style::default().fg(colors.text_muted()),
            ),
            Span::styled(
                clock,
                Style::default()
                    .fg(colors.bg())
                    .bg(clock_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}  {}", t!("header.calculator"), t!("header.focus")),
                Style::default().fg(colors.text_muted()),
            ),
        ];
        if self.focus_mode {
            spans.push(Span::styled(
                format!("  ({})", t!("header.focus_on")),
                Style::default().fg(colors.warning()),
            ));
        }
        Paragraph::new(Line::from(spans)).render(rows[0], buf);

        // Progress and pace are hidden in focus mode.
        if self.focus_mode {
            return;
        }
        let pace = self.exam.pace();
        let pace_color = match pace {
            Pace::Ahead => colors.success(),
            Pace::OnTrack => colors.accent(),
            Pace::Behind => colors.error(),
        };
        let progress_label = t!("header.progress").to_string();
        ProgressBar::new(&progress_label, self.exam.progress_percent(), self.theme)
            .detail(t!(pace.label_key()).to_string(), pace_color)
            .render(rows[1], buf);
    }
}
