mod app;
mod config;
mod engine;
mod event;
mod session;
mod speech;
mod store;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing_subscriber::EnvFilter;

use app::{App, AppScreen, DashboardTab, Severity};
use config::Config;
use engine::catalog::ALL_CHAPTERS;
use engine::trainer::Trainer;
use event::{AppEvent, EventHandler};
use speech::{CommandRecognizer, CommandSpeaker};
use store::KvStore;
use store::json_store::JsonStore;
use store::memory::MemoryStore;
use store::schema::{ExportData, export_all};
use ui::components::dashboard::Dashboard;
use ui::components::menu::MenuAction;
use ui::components::progress_bar::ProgressBar;
use ui::components::summary::Summary;
use ui::components::word_card::WordCard;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::theme::Theme;

const LOG_ENV: &str = "SIGHTWORDS_LOG";

#[derive(Parser)]
#[command(
    name = "sightwords",
    version,
    about = "Adaptive sight-word reading practice for early readers"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short = 'n', long, help = "Number of words per session")]
    session_size: Option<usize>,

    #[arg(long, help = "Directory holding progress files")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Keep progress in memory only; nothing is written")]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a custom word to the word list
    Add { word: String },
    /// Show mastery progress for every chapter
    Progress,
    /// Show lifetime practice totals
    Stats,
    /// Write all progress to a JSON backup file
    Export { path: PathBuf },
    /// Replace all progress with the contents of a JSON backup file
    Import { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(size) = cli.session_size {
        config.session_size = size;
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    config.validate();

    match cli.command {
        Some(command) => {
            init_logging(&config, None);
            run_command(command, &config, cli.ephemeral)
        }
        None => {
            let log_dir = if cli.ephemeral {
                std::env::temp_dir()
            } else {
                config.data_dir()
            };
            init_logging(&config, Some(&log_dir.join("sightwords.log")));
            run_tui(config, cli.ephemeral)
        }
    }
}

/// Subcommands log to stderr. The TUI logs to a file since it owns the terminal.
fn init_logging(config: &Config, log_file: Option<&Path>) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        None => builder.with_writer(io::stderr).init(),
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
                Err(err) => eprintln!("Logging disabled, cannot open {}: {err}", path.display()),
            }
        }
    }
}

fn open_store(config: &Config, ephemeral: bool) -> Result<Box<dyn KvStore>> {
    if ephemeral {
        return Ok(Box::new(MemoryStore::new()));
    }
    let store = JsonStore::with_base_dir(config.data_dir())
        .with_context(|| format!("cannot use data directory {}", config.data_dir))?;
    Ok(Box::new(store))
}

// --- Headless subcommands ---

fn run_command(command: Command, config: &Config, ephemeral: bool) -> Result<()> {
    match command {
        Command::Add { word } => {
            let mut trainer = Trainer::load(open_store(config, ephemeral)?, config)?;
            let added = trainer.add_word(&word)?;
            match added.chapter_id {
                Some(id) => println!("Added \"{}\" (chapter {id})", added.text),
                None => println!("Added \"{}\" (custom word)", added.text),
            }
        }
        Command::Progress => {
            let trainer = Trainer::load(open_store(config, ephemeral)?, config)?;
            for chapter in ALL_CHAPTERS {
                let p = trainer.chapter_progress(chapter.id);
                let lock = if trainer.chapters().is_unlocked(chapter.id) {
                    "unlocked"
                } else {
                    "locked"
                };
                println!(
                    "{:>2}  {:<22} {:<9} {:>2}/{:<2} mastered  ({} learning, {} new)",
                    chapter.id, chapter.name, lock, p.mastered, p.total, p.learning, p.new
                );
            }
        }
        Command::Stats => {
            let trainer = Trainer::load(open_store(config, ephemeral)?, config)?;
            println!("{}", trainer.stats().report(trainer.deck().len()));
        }
        Command::Export { path } => {
            let store = open_store(config, ephemeral)?;
            let data = export_all(store.as_ref())?;
            let json = serde_json::to_string_pretty(&data)?;
            fs::write(&path, json).with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!(path = %path.display(), words = data.words.len(), "export written");
            println!("Exported {} words to {}", data.words.len(), path.display());
        }
        Command::Import { path } => {
            if ephemeral {
                bail!("import needs a data directory; drop --ephemeral");
            }
            let content = fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let data: ExportData = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a sightwords export", path.display()))?;
            let store = JsonStore::with_base_dir(config.data_dir())?;
            store.import_all(&data)?;
            println!("Imported {} words from {}", data.words.len(), path.display());
        }
    }
    Ok(())
}

// --- Terminal front-end ---

fn run_tui(config: Config, ephemeral: bool) -> Result<()> {
    let trainer = Trainer::load(open_store(&config, ephemeral)?, &config)?;
    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let speaker = CommandSpeaker::new(&config.speech_command, &config.speech_args);
    let recognizer = CommandRecognizer::new(&config.recognizer_command, &config.recognizer_args);
    let mut app = App::new(trainer, config, theme, Box::new(speaker), recognizer);
    tracing::info!(
        speech_out = app.speech_output_available(),
        speech_in = app.speech_input_available(),
        "starting"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "terminal loop failed");
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        let now = Instant::now();
        match event {
            AppEvent::Key(key) => handle_key(app, key, events, now),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
            AppEvent::Transcript {
                alternatives,
                token,
            } => app.on_transcript(&alternatives, &token, now),
            AppEvent::RecognitionFailed { error, token } => {
                app.on_recognition_failed(error, &token, now)
            }
        }
        app.tick(now);

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, events: &EventHandler, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Welcome => handle_welcome_key(app, key, now),
        AppScreen::Learning => handle_learning_key(app, key, events, now),
        AppScreen::Summary => handle_summary_key(app, key, now),
        AppScreen::Dashboard => handle_dashboard_key(app, key, now),
    }
}

fn run_menu_action(app: &mut App, action: MenuAction, now: Instant) {
    match action {
        MenuAction::StartSession => app.start_session(now),
        MenuAction::Dashboard => app.go_to_dashboard(),
        MenuAction::Quit => app.should_quit = true,
    }
}

fn handle_welcome_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('s') => app.start_session(now),
        KeyCode::Char('d') => app.go_to_dashboard(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            run_menu_action(app, action, now);
        }
        _ => {}
    }
}

fn handle_learning_key(app: &mut App, key: KeyEvent, events: &EventHandler, now: Instant) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.leave_session(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('g') => app.answer(true, now),
        KeyCode::Char('h') | KeyCode::Char('n') => app.answer(false, now),
        KeyCode::Char('r') => app.hear_word(),
        KeyCode::Char('m') => app.listen(events.sender()),
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char('s') => app.start_session(now),
        _ => {}
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent, now: Instant) {
    if app.is_adding_word() {
        match key.code {
            KeyCode::Esc => app.cancel_add_word(),
            KeyCode::Enter => app.submit_new_word(now),
            KeyCode::Backspace => app.add_word_backspace(),
            KeyCode::Char(ch) => app.add_word_push(ch),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.dashboard_next_tab(),
        KeyCode::Down | KeyCode::Char('j') => app.dashboard_down(),
        KeyCode::Up | KeyCode::Char('k') => app.dashboard_up(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected(now),
        KeyCode::Char('f') => app.cycle_word_filter(),
        KeyCode::Char('a') => app.begin_add_word(),
        _ => {}
    }
}

// --- Rendering ---

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    let hints: Vec<&str> = match app.screen {
        AppScreen::Welcome => {
            let menu_area = centered_rect(50, 70, layout.main);
            frame.render_widget(&app.menu, menu_area);
            vec!["[s] Start", "[d] Dashboard", "[q] Quit"]
        }
        AppScreen::Learning => {
            render_learning(frame, app, layout.main, layout.roomy());
            learning_hints(app)
        }
        AppScreen::Summary => {
            if let Some(summary) = &app.last_summary {
                let centered = centered_rect(50, 60, layout.main);
                frame.render_widget(Summary::new(summary, app.theme), centered);
            }
            vec!["[Enter] Finish", "[s] Practice again"]
        }
        AppScreen::Dashboard => {
            let dashboard = Dashboard::new(
                &app.trainer,
                &app.dashboard,
                app.visible_words(),
                app.theme,
            );
            frame.render_widget(dashboard, layout.main);
            dashboard_hints(app)
        }
    };

    render_footer(frame, app, layout.footer, &hints);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let info = match (app.screen, app.trainer.session()) {
        (AppScreen::Learning, Some(session)) => format!(
            " Word {} of {} | \u{1f525} Streak: {} | +{} points",
            session.position(),
            session.len(),
            session.streak,
            session.points
        ),
        _ => {
            let stats = app.trainer.stats();
            format!(
                " {} points | {} sessions",
                stats.total_points, stats.total_sessions
            )
        }
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Sight Words ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(info, Style::default().fg(colors.muted()).bg(colors.header_bg())),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_learning(frame: &mut ratatui::Frame, app: &App, area: Rect, roomy: bool) {
    let Some(word) = app.trainer.current_word() else {
        return;
    };
    let now = Instant::now();

    let mut constraints = vec![Constraint::Min(7)];
    if roomy {
        constraints.push(Constraint::Length(3));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(centered_rect(60, 80, area));

    let mut card = WordCard::new(&word.text, app.theme);
    card.feedback = app.feedback.as_ref().map(|f| f.correct);
    card.listening = app.is_listening();
    card.countdown = if app.speech_output_available() {
        app.countdown_secs(now)
    } else {
        None
    };
    frame.render_widget(card, rows[0]);

    if roomy {
        if let Some(session) = app.trainer.session() {
            let bar = ProgressBar::new(session.progress(), app.theme)
                .label("Progress")
                .caption(format!("{} of {}", session.current_index, session.len()));
            frame.render_widget(bar, rows[1]);
        }
    }
}

fn learning_hints(app: &App) -> Vec<&'static str> {
    let mut hints = vec!["[Enter] Got it!", "[h] Need help"];
    if app.speech_output_available() {
        hints.push("[r] Hear it");
    }
    if app.speech_input_available() {
        hints.push(if app.is_listening() {
            "Listening..."
        } else {
            "[m] Say it"
        });
    }
    hints.push("[Esc] Stop");
    hints
}

fn dashboard_hints(app: &App) -> Vec<&'static str> {
    if app.is_adding_word() {
        return vec!["[Enter] Add word", "[Esc] Cancel"];
    }
    let mut hints = vec!["[Tab] Next view", "[j/k] Move"];
    match app.dashboard.tab {
        DashboardTab::Chapters => hints.push("[Space] Lock/Unlock"),
        DashboardTab::Words => {
            hints.push("[Space] Disable/Enable");
            hints.push("[f] Filter");
        }
        DashboardTab::Challenge => {}
    }
    hints.push("[a] Add word");
    hints.push("[q] Back");
    hints
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let colors = &app.theme.colors;
    let mut lines = Vec::new();

    if let Some(toast) = &app.toast {
        let color = match toast.severity {
            Severity::Success => colors.success(),
            Severity::Info => colors.accent(),
            Severity::Error => colors.error(),
        };
        lines.push(Line::from(Span::styled(
            format!(" {}", toast.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }

    let room = (area.height as usize).saturating_sub(lines.len());
    for hint in pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .take(room)
    {
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(colors.muted()),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}
