mod app;
mod config;
mod event;
mod exam;
mod logging;
mod store;
mod ui;

rust_i18n::i18n!("locales", fallback = "en");

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;
use tracing::{info, warn};

use app::{App, AppScreen};
use config::Config;
use event::{AppEvent, EventHandler};
use exam::catalog::Catalog;
use store::json_store::{self, JsonStore};
use ui::components::calculator_panel::CalculatorPanel;
use ui::components::dashboard::Dashboard;
use ui::components::exam_header::ExamHeader;
use ui::components::history_table::HistoryTable;
use ui::components::instructions::Instructions;
use ui::components::question_grid::{QuestionGrid, StatusStrip};
use ui::components::question_view::QuestionView;
use ui::components::review_panel::ReviewPanel;
use ui::layout::{ExamLayout, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "khatwa", version, about = "Timed assessment in the terminal")]
struct Cli {
    #[arg(short, long, help = "Question catalog (TOML)")]
    catalog: Option<PathBuf>,

    #[arg(short, long, value_name = "SECS", help = "Exam duration in seconds")]
    duration: Option<u32>,

    #[arg(short, long, help = "Interface language (ar, en)")]
    locale: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Do not record results to the history file")]
    no_history: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }
    if let Some(secs) = cli.duration {
        config.exam_duration_secs = secs;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.no_history {
        config.save_history = false;
    }
    config.normalize();
    rust_i18n::set_locale(&config.locale);

    if let Err(e) = logging::init(&json_store::data_dir(), &config.log_level) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    if let Some(e) = config_error {
        warn!(error = %format!("{e:#}"), "config unreadable, using defaults");
    }

    let catalog = match config.catalog_path {
        Some(ref path) => Catalog::from_path(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::builtin().context("loading built-in catalog")?,
    };
    info!(title = %catalog.title, questions = catalog.len(), "catalog loaded");

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            theme = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let store = if config.save_history {
        JsonStore::new()
            .inspect_err(|e| warn!(error = %e, "history store unavailable"))
            .ok()
    } else {
        None
    };

    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut app = App::new(config, catalog, theme, store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick(now) => app.on_tick(now),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            info!("quitting");
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Instructions => handle_instructions_key(app, key),
        AppScreen::Exam => handle_exam_key(app, key),
        AppScreen::Review => handle_review_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
    }
}

fn handle_instructions_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(' ') => app.toggle_terms(),
        KeyCode::Enter => app.start_exam(Instant::now()),
        KeyCode::Char('h') => app.go_to_history(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_exam_key(app: &mut App, key: KeyEvent) {
    if app.exam.is_calculator_open() {
        match key.code {
            KeyCode::Esc | KeyCode::Char('c') => app.close_calculator(),
            KeyCode::Backspace => app.calculator.backspace(),
            KeyCode::Delete => app.calculator.clear(),
            KeyCode::Enter => app.calculator_key('='),
            KeyCode::Char(ch) => app.calculator_key(ch),
            _ => {}
        }
        return;
    }

    if app.editing_essay {
        match key.code {
            KeyCode::Esc => app.stop_editing(),
            KeyCode::Enter => app.essay_newline(),
            KeyCode::Backspace => app.essay_backspace(),
            KeyCode::Char(ch) => app.essay_input(ch),
            _ => {}
        }
        return;
    }

    if app.jump_input.is_some() {
        match key.code {
            KeyCode::Esc => app.cancel_jump(),
            KeyCode::Enter => app.commit_jump(),
            KeyCode::Backspace => app.jump_backspace(),
            KeyCode::Char(ch) => app.jump_digit(ch),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('g') => app.begin_jump(),
        KeyCode::Left | KeyCode::Char('p') => app.prev_question(),
        KeyCode::Right | KeyCode::Char('n') => app.next_question(),
        KeyCode::Up | KeyCode::Char('k') => app.move_option(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_option(true),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_option(),
        KeyCode::Char(ch @ '1'..='9') => {
            if let Some(n) = ch.to_digit(10) {
                app.jump_to(n as usize - 1);
            }
        }
        KeyCode::Char('m') => app.toggle_mark_current(),
        KeyCode::Char('c') => app.toggle_calculator(),
        KeyCode::Char('f') => app.toggle_focus(),
        KeyCode::Char('r') => app.enter_review(),
        KeyCode::Char('x') => app.dismiss_notice(),
        _ => {}
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Up | KeyCode::Char('k') => app.review_move(-1),
        KeyCode::Right | KeyCode::Down | KeyCode::Char('j') => app.review_move(1),
        KeyCode::Enter => app.review_open_selected(),
        KeyCode::Char('b') | KeyCode::Esc => app.back_to_exam(),
        KeyCode::Char('s') => app.submit(),
        KeyCode::Char('x') => app.dismiss_notice(),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') => app.reset_exam(),
        KeyCode::Char('h') => app.go_to_history(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.scroll_history(false),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_history(true),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('b') => app.back_from_history(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Instructions => render_instructions(frame, app),
        AppScreen::Exam => render_exam(frame, app),
        AppScreen::Review => render_review(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::History => render_history(frame, app),
    }
}

fn render_hints(frame: &mut ratatui::Frame, app: &App, hints: &str, area: ratatui::layout::Rect) {
    let lines: Vec<Line> = pack_hint_lines(&[hints], area.width as usize)
        .into_iter()
        .map(|l| {
            Line::from(Span::styled(
                l,
                Style::default().fg(app.theme.colors.text_muted()),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_instructions(frame: &mut ratatui::Frame, app: &App) {
    let area = ui::layout::centered_rect(70, 85, frame.area());
    let instructions = Instructions::new(
        app.exam.duration_secs(),
        app.accepted_terms,
        app.start_error.as_ref(),
        &app.config.locale,
        app.theme,
    );
    frame.render_widget(instructions, area);

    let footer = ratatui::layout::Rect {
        y: frame.area().bottom().saturating_sub(1),
        height: 1,
        ..frame.area()
    };
    render_hints(frame, app, &t!("instructions.hints"), footer);
}

fn notice_line(app: &App) -> Option<Line<'static>> {
    let notice = app.exam.notices().first()?;
    let colors = &app.theme.colors;
    let text = if notice.threshold_secs >= 60 {
        t!("notice.time_left", minutes = notice.threshold_secs / 60)
    } else {
        t!("notice.seconds_left", seconds = notice.threshold_secs)
    };
    Some(
        Line::from(vec![
            Span::styled(
                format!(" {text} "),
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", t!("notice.dismiss")),
                Style::default().fg(colors.text_muted()),
            ),
        ])
        .alignment(Alignment::Center),
    )
}

fn render_exam(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let notice = notice_line(app);
    let layout = ExamLayout::new(area, notice.is_some());

    frame.render_widget(
        ExamHeader::new(&app.exam, app.focus_mode, app.theme),
        layout.header,
    );

    if let Some(line) = notice {
        frame.render_widget(Paragraph::new(line), layout.notice);
    }

    if let Some(sidebar) = layout.sidebar
        && !app.focus_mode
    {
        let statuses = app.exam.statuses();
        let grid = QuestionGrid::new(t!("question.list_title").to_string(), &statuses, app.theme)
            .selected(app.exam.current_index())
            .legend(true);
        frame.render_widget(grid, sidebar);
    }

    if let Some(strip) = layout.strip
        && !app.focus_mode
    {
        let statuses = app.exam.statuses();
        frame.render_widget(
            StatusStrip::new(&statuses, app.exam.current_index(), app.theme),
            strip,
        );
    }

    let main = match (layout.sidebar, layout.strip) {
        (Some(sidebar), _) if app.focus_mode => sidebar.union(layout.main),
        (_, Some(strip)) if app.focus_mode => strip.union(layout.main),
        _ => layout.main,
    };
    if let Some(question) = app.exam.current_question() {
        let view = QuestionView::new(
            question,
            app.exam.current_index(),
            app.exam.question_count(),
            app.theme,
        )
        .answer(app.exam.answer_for(&question.id))
        .marked(app.exam.is_marked(&question.id))
        .cursor(app.option_cursor, app.editing_essay)
        .draft(&app.essay_draft)
        .locale(&app.config.locale);
        frame.render_widget(view, main);
    }

    let hints = if app.exam.is_calculator_open() {
        t!("calculator.hints")
    } else if let Some(ref input) = app.jump_input {
        t!("question.jump", number = input)
    } else {
        t!("question.hints")
    };
    render_hints(frame, app, &hints, layout.footer);

    if app.exam.is_calculator_open() {
        let popup = ui::layout::centered_rect(40, 40, area);
        frame.render_widget(CalculatorPanel::new(&app.calculator, app.theme), popup);
    }
}

fn render_review(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let notice = notice_line(app);
    let layout = ExamLayout::new(area, notice.is_some());

    frame.render_widget(
        ExamHeader::new(&app.exam, app.focus_mode, app.theme),
        layout.header,
    );
    if let Some(line) = notice {
        frame.render_widget(Paragraph::new(line), layout.notice);
    }

    let body = match (layout.sidebar, layout.strip) {
        (Some(side), _) | (None, Some(side)) => side.union(layout.main),
        (None, None) => layout.main,
    };
    let statuses = app.exam.review_statuses();
    frame.render_widget(
        ReviewPanel::new(&app.exam, &statuses, app.review_selected, app.theme),
        body,
    );
    render_hints(frame, app, &t!("review.hints"), layout.footer);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    if let Some(ref summary) = app.last_summary {
        let centered = ui::layout::centered_rect(60, 70, frame.area());
        let dashboard = Dashboard::new(summary, &app.exam.catalog().title, app.theme);
        frame.render_widget(dashboard, centered);
    }
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let body = ratatui::layout::Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    frame.render_widget(
        HistoryTable::new(&app.history, app.history_scroll, app.theme),
        body,
    );
    let footer = ratatui::layout::Rect {
        y: area.bottom().saturating_sub(1),
        height: 1,
        ..area
    };
    render_hints(frame, app, &t!("history.hints"), footer);
}
