use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::exam::state::ExamError;
use crate::ui::layout::text_alignment;
use crate::ui::theme::Theme;

/// Pre-exam screen. The start button only lights up once the terms are accepted.
pub struct Instructions<'a> {
    duration_secs: u32,
    accepted_terms: bool,
    error: Option<&'a ExamError>,
    locale: &'a str,
    theme: &'a Theme,
}

impl<'a> Instructions<'a> {
    pub fn new(
        duration_secs: u32,
        accepted_terms: bool,
        error: Option<&'a ExamError>,
        locale: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            duration_secs,
            accepted_terms,
            error,
            locale,
            theme,
        }
    }
}

impl Widget for Instructions<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let align = text_alignment(self.locale);

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(7),
                Constraint::Length(4),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            t!("instructions.welcome").to_string(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let minutes = self.duration_secs.div_ceil(60);
        let bullet = |text: String| {
            Line::from(Span::styled(format!(" • {text}"), Style::default().fg(colors.fg())))
        };
        let rules = vec![
            Line::from(Span::styled(
                t!("instructions.rules_title").to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            bullet(t!("instructions.rule_time", minutes = minutes).to_string()),
            bullet(t!("instructions.rule_navigate").to_string()),
            bullet(t!("instructions.rule_mark").to_string()),
            bullet(t!("instructions.rule_calculator").to_string()),
            bullet(t!("instructions.rule_answer_all").to_string()),
        ];
        Paragraph::new(rules).alignment(align).render(layout[1], buf);

        let terms_block = Block::bordered()
            .title(format!(" {} ", t!("instructions.confidentiality_title")))
            .border_style(Style::default().fg(colors.warning()));
        let terms_inner = terms_block.inner(layout[2]);
        terms_block.render(layout[2], buf);
        Paragraph::new(t!("instructions.confidentiality_body").to_string())
            .style(Style::default().fg(colors.warning()))
            .alignment(align)
            .wrap(Wrap { trim: true })
            .render(terms_inner, buf);

        let checkbox = if self.accepted_terms { "[x]" } else { "[ ]" };
        Paragraph::new(Line::from(Span::styled(
            format!("{checkbox} {}", t!("instructions.accept")),
            Style::default().fg(colors.fg()),
        )))
        .alignment(align)
        .render(layout[3], buf);

        let start_style = if self.accepted_terms {
            Style::default()
                .fg(colors.bg())
                .bg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text_muted()).bg(colors.border())
        };
        Paragraph::new(Line::from(Span::styled(
            format!("  {}  ", t!("instructions.start")),
            start_style,
        )))
        .alignment(Alignment::Center)
        .render(layout[4], buf);

        if let Some(err) = self.error {
            Paragraph::new(Line::from(Span::styled(
                t!(err.message_key()).to_string(),
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[5], buf);
        }
    }
}
