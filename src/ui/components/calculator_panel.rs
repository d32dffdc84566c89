use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::exam::calculator::Calculator;
use crate::ui::theme::Theme;

pub struct CalculatorPanel<'a> {
    calculator: &'a Calculator,
    theme: &'a Theme,
}

impl<'a> CalculatorPanel<'a> {
    pub fn new(calculator: &'a Calculator, theme: &'a Theme) -> Self {
        Self { calculator, theme }
    }
}

impl Widget for CalculatorPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(format!(" {} ", t!("calculator.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.header_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let display_color = if self.calculator.is_error() {
            colors.error()
        } else {
            colors.header_fg()
        };
        let lines = vec![
            Line::from(Span::styled(
                self.calculator.expression(),
                Style::default().fg(colors.text_muted()),
            ))
            .alignment(Alignment::Right),
            Line::from(Span::styled(
                self.calculator.display(),
                Style::default()
                    .fg(display_color)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Right),
            Line::from(""),
            Line::from(Span::styled(
                t!("calculator.hints").to_string(),
                Style::default().fg(colors.text_muted()),
            )),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
