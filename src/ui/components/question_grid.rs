use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::exam::status::QuestionStatus;
use crate::ui::theme::Theme;

const CELL_WIDTH: u16 = 5;

/// Numbered grid of questions colored by status, with a legend underneath.
/// Shared by the exam sidebar and the review screen; `selected` draws a cursor
/// when the grid is navigable.
pub struct QuestionGrid<'a> {
    title: String,
    statuses: &'a [QuestionStatus],
    selected: Option<usize>,
    show_legend: bool,
    theme: &'a Theme,
}

impl<'a> QuestionGrid<'a> {
    pub fn new(title: String, statuses: &'a [QuestionStatus], theme: &'a Theme) -> Self {
        Self {
            title,
            statuses,
            selected: None,
            show_legend: true,
            theme,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    pub fn legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }
}

/// Cells per grid row for a given inner width.
pub fn columns_for(width: u16) -> usize {
    (width / CELL_WIDTH).max(1) as usize
}

impl Widget for QuestionGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < CELL_WIDTH || inner.height == 0 {
            return;
        }

        let cols = columns_for(inner.width);
        let mut y = inner.y;
        for (row_idx, row) in self.statuses.chunks(cols).enumerate() {
            if y >= inner.y + inner.height {
                break;
            }
            for (col_idx, status) in row.iter().enumerate() {
                let index = row_idx * cols + col_idx;
                let x = inner.x + col_idx as u16 * CELL_WIDTH;
                let mut style = Style::default()
                    .fg(colors.bg())
                    .bg(colors.status(*status));
                if *status == QuestionStatus::Current {
                    style = style.add_modifier(Modifier::BOLD);
                }
                let label = format!("{:^4}", index + 1);
                buf.set_string(x, y, &label, style);
                if self.selected == Some(index) {
                    buf.set_string(
                        x,
                        y,
                        "[",
                        style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    );
                    buf.set_string(
                        x + 3,
                        y,
                        "]",
                        style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    );
                }
            }
            y += 2;
        }

        if !self.show_legend {
            return;
        }
        let legend: Vec<Line> = [
            QuestionStatus::Answered,
            QuestionStatus::Marked,
            QuestionStatus::Unanswered,
        ]
        .iter()
        .map(|status| {
            Line::from(vec![
                Span::styled("  ", Style::default().bg(colors.status(*status))),
                Span::styled(
                    format!(" {}", t!(status.label_key())),
                    Style::default().fg(colors.fg()),
                ),
            ])
        })
        .collect();
        let legend_h = legend.len() as u16;
        if y + legend_h <= inner.y + inner.height {
            let legend_area = Rect::new(inner.x, inner.y + inner.height - legend_h, inner.width, legend_h);
            Paragraph::new(legend).render(legend_area, buf);
        }
    }
}

const STRIP_CELL_WIDTH: u16 = 4;

/// One-row variant of the grid for terminals too narrow for the sidebar.
/// Scrolls so the selected question stays in view.
pub struct StatusStrip<'a> {
    statuses: &'a [QuestionStatus],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> StatusStrip<'a> {
    pub fn new(statuses: &'a [QuestionStatus], selected: usize, theme: &'a Theme) -> Self {
        Self {
            statuses,
            selected,
            theme,
        }
    }
}

/// Indices that fit in `visible` cells, centered on `selected` where possible.
pub fn strip_window(len: usize, selected: usize, visible: usize) -> Range<usize> {
    if visible == 0 || len == 0 {
        return 0..0;
    }
    if len <= visible {
        return 0..len;
    }
    let start = selected
        .saturating_sub(visible / 2)
        .min(len - visible);
    start..start + visible
}

impl Widget for StatusStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        if area.height == 0 {
            return;
        }

        let visible = (area.width / STRIP_CELL_WIDTH) as usize;
        let window = strip_window(self.statuses.len(), self.selected, visible);
        for (slot, index) in window.enumerate() {
            let status = self.statuses[index];
            let x = area.x + slot as u16 * STRIP_CELL_WIDTH;
            let mut style = Style::default().fg(colors.bg()).bg(colors.status(status));
            if index == self.selected {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            buf.set_string(x, area.y, format!("{:^3}", index + 1), style);
        }
    }
}
