use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use wordcard::app::{App, AppScreen, NoticeKind};
use wordcard::config::Config;
use wordcard::event::{AppEvent, EventHandler};
use wordcard::store::history::HistoryStore;
use wordcard::store::kv::{FileKvStore, MemoryKvStore};
use wordcard::ui::components::history_list::HistoryList;
use wordcard::ui::components::word_card::WordCard;
use wordcard::ui::layout::{ScreenLayout, card_rect, centered_rect, pack_hint_lines};
use wordcard::ui::theme::Theme;
use wordcard::word::provider::StaticWordProvider;

#[derive(Parser)]
#[command(name = "wordcard", version, about = "Terminal word-of-the-day cards")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Directory holding history and logs")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Simulated word lookup delay in milliseconds")]
    delay_ms: Option<u64>,

    #[arg(long, help = "Keep history in memory only for this run")]
    ephemeral: bool,

    #[arg(long, help = "Write the effective config file and exit")]
    save_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    if let Some(delay) = cli.delay_ms {
        config.provider_delay_ms = delay;
    }
    let mut themes = Theme::available_themes();
    if Theme::load(&config.theme).is_some() {
        themes.push(config.theme.clone());
    }
    let theme_names: Vec<&str> = themes.iter().map(|s| s.as_str()).collect();
    config.validate(&theme_names);

    if cli.save_config {
        let path = config.save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    init_logging(&config);
    log::info!("starting wordcard, data dir {}", config.data_dir);

    let history = if cli.ephemeral {
        HistoryStore::new(MemoryKvStore::new())
    } else {
        HistoryStore::new(FileKvStore::new(config.data_dir())?)
    };
    let provider = StaticWordProvider::bundled()
        .with_delay(Duration::from_millis(config.provider_delay_ms));
    let theme = Theme::load(&config.theme).unwrap_or_default();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(config.tick_rate_ms));
    let width = terminal.size()?.width;
    let mut app = App::new(
        theme,
        Arc::new(history),
        Arc::new(provider),
        events.sender(),
        width,
    );

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("exiting on error: {err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Log to a file under the data dir; the terminal belongs to the UI.
fn init_logging(config: &Config) {
    let dir = config.data_dir();
    let file = fs::create_dir_all(&dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("wordcard.log"))
    });
    let Ok(file) = file else {
        return;
    };
    let _ = env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .parse_env("RUST_LOG")
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let mut last_frame = Instant::now();
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        let now = Instant::now();
        app.advance(now - last_frame);
        last_frame = now;

        match event {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Resize(width, _) => app.resize(width),
            AppEvent::Fetched(report) => app.on_fetched(report),
            AppEvent::Tick => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Notices are modal.
    if !app.notices.is_empty() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::History => handle_history_key(app, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Enter => {
            app.new_word()
        }
        KeyCode::Left | KeyCode::Char('h') => app.previous_word(),
        KeyCode::Char('H') | KeyCode::Tab => app.open_history(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    if app.history_view.confirm_clear {
        match key.code {
            KeyCode::Char('y') => app.confirm_clear(),
            KeyCode::Char('n') | KeyCode::Esc => app.cancel_clear(),
            _ => {}
        }
        return;
    }

    if app.history_view.searching {
        app.search_key(key);
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Tab => app.close_history(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('x') => app.clear_search(),
        KeyCode::Char('c') => app.request_clear(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if !app.notices.is_empty() || app.history_view.confirm_clear {
        return;
    }
    match (app.screen, mouse.kind) {
        (AppScreen::Home, MouseEventKind::Down(MouseButton::Left)) => app.drag_start(mouse.column),
        (AppScreen::Home, MouseEventKind::Drag(MouseButton::Left)) => app.drag_move(mouse.column),
        (AppScreen::Home, MouseEventKind::Up(MouseButton::Left)) => app.drag_end(mouse.column),
        (AppScreen::History, MouseEventKind::ScrollDown) => app.select_next(),
        (AppScreen::History, MouseEventKind::ScrollUp) => app.select_prev(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()).fg(colors.fg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::History => render_history(frame, app),
    }

    if app.screen == AppScreen::History && app.history_view.confirm_clear {
        render_confirm_clear(frame, app);
    }
    if !app.notices.is_empty() {
        render_notice(frame, app);
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, title: &str, info: &str, area: Rect) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " wordcard ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {title} "),
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
        Span::styled(
            info.to_string(),
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, lines: Vec<String>, area: Rect) {
    let style = Style::default().fg(app.theme.colors.muted());
    let lines: Vec<Line> = lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, style)))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let hints = [
        "[→/n] New word",
        "[←/h] Previous",
        "[Tab] History",
        "[q] Quit",
    ];
    let footer_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = ScreenLayout::new(area, footer_lines.len() as u16);

    let info = if app.session.cursor() > 0 {
        format!("| word {} of this session ", app.session.cursor())
    } else {
        String::new()
    };
    render_header(frame, app, "Word of the Day", &info, layout.header);

    let swipe_hint = Paragraph::new(Line::from(Span::styled(
        "⇆ Drag left for previous, right for new",
        Style::default().fg(colors.accent()),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(
        swipe_hint,
        Rect::new(
            layout.body.x,
            layout.body.y,
            layout.body.width,
            layout.body.height.min(1),
        ),
    );

    let slot = card_rect(layout.body);
    if app.session.is_fetching() {
        let loading = Paragraph::new(Line::from(Span::styled(
            "Discovering your next word...",
            Style::default().fg(colors.accent()),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(loading, centered_rect(slot.width, 1, slot));
    } else if let Some(word) = app.session.current() {
        let card = WordCard::new(word, &app.theme, slot).swipe(&app.swipe);
        frame.render_widget(card, layout.body);
    } else {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "No word available",
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Press n to get started",
                Style::default().fg(colors.muted()),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(empty, centered_rect(slot.width, 2, slot));
    }

    render_footer(frame, app, footer_lines, layout.footer);
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let view = &app.history_view;

    let hints: &[&str] = if view.searching {
        &["[Enter/Esc] Done", "[Ctrl-U] Clear query"]
    } else {
        &[
            "[/] Search",
            "[x] Clear search",
            "[j/k] Scroll",
            "[c] Clear history",
            "[Esc] Back",
        ]
    };
    let footer_lines = pack_hint_lines(hints, area.width as usize);
    let layout = ScreenLayout::new(area, footer_lines.len() as u16);

    let info = format!("| {} words ", view.records.len());
    render_header(frame, app, "Word History", &info, layout.header);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(layout.body);

    let border = if view.searching {
        colors.accent()
    } else {
        colors.card_border()
    };
    let search_block = Block::bordered()
        .title(" Search ")
        .border_style(Style::default().fg(border));
    let (before, at, after) = view.search.split_at_cursor();
    let search_line = if view.search.query().is_empty() && !view.searching {
        Line::from(Span::styled(
            "Search words or definitions...",
            Style::default().fg(colors.muted()),
        ))
    } else if view.searching {
        let cursor = at.map(String::from).unwrap_or_else(|| " ".to_string());
        Line::from(vec![
            Span::raw(before),
            Span::styled(cursor, Style::default().add_modifier(Modifier::REVERSED)),
            Span::raw(after),
        ])
    } else {
        Line::from(view.search.query())
    };
    frame.render_widget(Paragraph::new(search_line).block(search_block), body[0]);

    let filtered = view.filtered();
    if filtered.is_empty() {
        let message = if view.search.query().trim().is_empty() {
            "No history found."
        } else {
            "No matching words found."
        };
        let mut lines = vec![Line::from(Span::styled(
            message,
            Style::default().fg(colors.fg()),
        ))];
        if !view.search.query().trim().is_empty() {
            lines.push(Line::from(Span::styled(
                "[x] Clear search",
                Style::default().fg(colors.accent()),
            )));
        }
        let empty = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(empty, centered_rect(body[1].width, 2, body[1]));
    } else {
        let list = HistoryList::new(&filtered, view.selected, &app.theme);
        frame.render_widget(list, body[1]);
    }

    render_footer(frame, app, footer_lines, layout.footer);
}

fn render_confirm_clear(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let popup = centered_rect(40, 5, frame.area());
    frame.render_widget(Clear, popup);

    let block = Block::bordered()
        .title(" Confirm ")
        .border_style(Style::default().fg(colors.error()))
        .style(Style::default().bg(colors.card_bg()).fg(colors.fg()));
    let text = Paragraph::new(vec![
        Line::from("Clear all history?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes, Clear", Style::default().fg(colors.error())),
            Span::raw("   "),
            Span::styled("[n] Cancel", Style::default().fg(colors.muted())),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(text, popup);
}

fn render_notice(frame: &mut ratatui::Frame, app: &App) {
    let Some(notice) = app.notices.front() else {
        return;
    };
    let colors = &app.theme.colors;
    let accent = match notice.kind {
        NoticeKind::Error => colors.error(),
        NoticeKind::Success => colors.success(),
    };
    let popup = centered_rect(48, 6, frame.area());
    frame.render_widget(Clear, popup);

    let block = Block::bordered()
        .title(format!(" {} ", notice.title))
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(colors.card_bg()).fg(colors.fg()));
    let text = Paragraph::new(vec![
        Line::from(notice.message.as_str()),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Style::default().fg(accent))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(text, popup);
}
