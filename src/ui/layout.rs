use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥90 cols: question sidebar + question view
    Narrow, // <90 cols: one-line status strip above the question view
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 90 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_sidebar(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

pub struct ExamLayout {
    pub header: Rect,
    pub notice: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    /// Compact status row used when there is no room for the sidebar.
    pub strip: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl ExamLayout {
    pub fn new(area: Rect, has_notice: bool) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(if has_notice { 1 } else { 0 }),
                Constraint::Min(8),
                Constraint::Length(2),
            ])
            .split(area);

        if tier.show_sidebar() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(28), Constraint::Min(40)])
                .split(vertical[2]);

            Self {
                header: vertical[0],
                notice: vertical[1],
                main: horizontal[1],
                sidebar: Some(horizontal[0]),
                strip: None,
                footer: vertical[3],
                tier,
            }
        } else {
            let stacked = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(vertical[2]);

            Self {
                header: vertical[0],
                notice: vertical[1],
                main: stacked[1],
                sidebar: None,
                strip: Some(stacked[0]),
                footer: vertical[3],
                tier,
            }
        }
    }
}

/// Arabic reads right to left; align primary text accordingly.
pub fn text_alignment(locale: &str) -> Alignment {
    if locale == "ar" {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

/// Greedily pack key hints into as few lines as fit `width`.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints.iter().flat_map(|h| h.split("  ")) {
        let hint = hint.trim();
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width || !has_hint {
            current = candidate;
            has_hint = true;
        } else {
            out.push(current);
            current = format!("{prefix}{hint}");
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
