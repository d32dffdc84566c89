use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// Single-row bar: `label [████░░░░ 45.0%] detail`.
pub struct ProgressBar<'a> {
    label: String,
    ratio: f64,
    detail: Option<(String, Color)>,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, percent: f64, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            ratio: (percent / 100.0).clamp(0.0, 1.0),
            detail: None,
            theme,
        }
    }

    pub fn detail(mut self, text: String, color: Color) -> Self {
        self.detail = Some((text, color));
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        if area.width == 0 || area.height == 0 {
            return;
        }

        let label = format!("{} ", self.label);
        let label_w = label.chars().count() as u16;
        let detail_w = self
            .detail
            .as_ref()
            .map(|(t, _)| t.chars().count() as u16 + 1)
            .unwrap_or(0);
        buf.set_string(area.x, area.y, &label, Style::default().fg(colors.fg()));

        let bar_x = area.x + label_w.min(area.width);
        let bar_w = area.width.saturating_sub(label_w + detail_w);
        let filled = (self.ratio * bar_w as f64).round() as u16;
        for x in bar_x..bar_x + bar_w {
            let style = if x < bar_x + filled {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, area.y)].set_style(style);
        }

        let pct = format!("{:.1}%", self.ratio * 100.0);
        if bar_w as usize > pct.len() {
            let pct_x = bar_x + (bar_w - pct.len() as u16) / 2;
            buf.set_string(pct_x, area.y, &pct, Style::default().fg(colors.fg()));
        }

        if let Some((text, color)) = self.detail
            && detail_w > 0
            && area.width > detail_w
        {
            let x = area.x + area.width - detail_w + 1;
            buf.set_string(x, area.y, &text, Style::default().fg(color));
        }
    }
}
