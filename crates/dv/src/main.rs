//! dv CLI - read-only diff browser TUI

mod app;
mod color;
mod config;
mod options;
mod ui;
mod views;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use config::{apply_config, load_config, ConfigSource, ExplicitFlags};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dv_core::{DiffProvider, GitDiffProvider, StdinDiffProvider};
use options::StartupValues;
use ratatui::prelude::*;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Columns moved per horizontal scroll key press
const SCROLL_X_STEP: isize = 4;

#[derive(Parser, Debug)]
#[command(name = "dv")]
#[command(author, version, about = "A read-only terminal diff browser")]
struct Args {
    /// Start on the staged section
    #[arg(long)]
    staged: bool,

    /// Diff layout: unified or split
    #[arg(long)]
    view: Option<String>,

    /// Show the file sidebar
    #[arg(long, value_name = "BOOL")]
    sidebar: Option<bool>,

    /// Color theme
    #[arg(long)]
    theme: Option<String>,

    /// Intraline highlight: background or underline
    #[arg(long)]
    intraline_style: Option<String>,

    /// Show +/- symbols in the gutter
    #[arg(long, value_name = "BOOL")]
    show_symbols: Option<bool>,

    /// Config file to load (must exist)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip loading any config file
    #[arg(long)]
    no_config: bool,
}

impl Args {
    fn explicit_flags(&self) -> ExplicitFlags {
        ExplicitFlags {
            view: self.view.is_some(),
            sidebar: self.sidebar.is_some(),
            theme: self.theme.is_some(),
            intraline_style: self.intraline_style.is_some(),
            show_symbols: self.show_symbols.is_some(),
        }
    }

    fn startup_values(&self) -> StartupValues {
        let defaults = StartupValues::default();
        StartupValues {
            view: self.view.clone().unwrap_or(defaults.view),
            sidebar: self.sidebar.unwrap_or(defaults.sidebar),
            theme: self.theme.clone().unwrap_or(defaults.theme),
            intraline_style: self
                .intraline_style
                .clone()
                .unwrap_or(defaults.intraline_style),
            show_symbols: self.show_symbols.unwrap_or(defaults.show_symbols),
        }
    }
}

/// Log to the file named by `DV_LOG`; the terminal belongs to the UI
fn init_tracing() -> Result<()> {
    use std::fs::File;
    use std::sync::Mutex;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_path = match std::env::var("DV_LOG") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => return Ok(()),
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing()?;

    let source = ConfigSource::resolve(args.config.as_deref(), args.no_config);
    let file_config = load_config(&source)?;
    let values = apply_config(args.startup_values(), file_config, args.explicit_flags());
    let initial = values.into_initial_state()?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let provider: Box<dyn DiffProvider> = if io::stdin().is_terminal() {
        Box::new(GitDiffProvider::new(cwd))
    } else {
        let mut diff = String::new();
        io::stdin()
            .read_to_string(&mut diff)
            .context("Failed to read diff from stdin")?;
        info!(bytes = diff.len(), "read piped diff");
        Box::new(StdinDiffProvider {
            work_dir: cwd,
            diff,
        })
    };

    let mut app = App::new(provider, args.staged, initial);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if app.menu_visible() {
        match key.code {
            KeyCode::Char('p') if ctrl => app.toggle_menu(),
            KeyCode::Char('c') if ctrl => app.should_quit = true,
            KeyCode::Esc => app.handle_escape(),
            KeyCode::Up => app.menu_move_cursor(-1),
            KeyCode::Down => app.menu_move_cursor(1),
            KeyCode::Enter => app.menu_activate(),
            KeyCode::Backspace if app.menu_query().is_empty() => app.menu_back(),
            KeyCode::Backspace => app.menu_pop_char(),
            KeyCode::Char(c) => app.menu_push_char(c),
            _ => {}
        }
        return;
    }

    if app.divider_focused() {
        match key.code {
            KeyCode::Char('c') if ctrl => app.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => app.resize_sidebar(-1),
            KeyCode::Right | KeyCode::Char('l') => app.resize_sidebar(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('d') => app.exit_divider_focus(),
            _ => {}
        }
        return;
    }

    if app.filter_input_visible() {
        match key.code {
            KeyCode::Char('c') if ctrl => app.should_quit = true,
            KeyCode::Esc => app.handle_escape(),
            KeyCode::Enter => app.close_filter_input(),
            KeyCode::Tab => {
                let mut options = app.filter_options();
                options.mode = options.mode.toggled();
                app.set_filter_options(options);
            }
            KeyCode::Char('s') if ctrl => {
                let mut options = app.filter_options();
                options.case_sensitive = !options.case_sensitive;
                app.set_filter_options(options);
            }
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Up => app.move_cursor(-1),
            KeyCode::Down => app.move_cursor(1),
            KeyCode::Char(c) => app.push_filter_char(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char('p') if ctrl => app.toggle_menu(),
        KeyCode::Char('d') if ctrl => app.scroll_half_page(true),
        KeyCode::Char('u') if ctrl => app.scroll_half_page(false),
        KeyCode::Char('h') if ctrl => app.shift_split(-1),
        KeyCode::Char('l') if ctrl => app.shift_split(1),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => app.handle_escape(),
        KeyCode::Char('n') | KeyCode::Char(']') => app.move_cursor(1),
        KeyCode::Char('p') | KeyCode::Char('[') => app.move_cursor(-1),
        KeyCode::Char('/') => app.open_filter(),
        KeyCode::Char('r') => app.manual_refresh(),
        KeyCode::Char('s') => app.switch_section(),
        KeyCode::Char('w') => app.toggle_line_wrap(),
        KeyCode::Char('v') => app.toggle_layout(),
        KeyCode::Char('i') => app.toggle_intraline_style(),
        KeyCode::Char('b') => app.toggle_sidebar(),
        KeyCode::Char('d') => app.focus_divider(),
        KeyCode::Char('t') => app.open_theme_menu(),
        KeyCode::Up => app.move_tree_cursor(-1),
        KeyCode::Down => app.move_tree_cursor(1),
        KeyCode::Char('j') => app.scroll_by(1),
        KeyCode::Char('k') => app.scroll_by(-1),
        KeyCode::Char('h') | KeyCode::Left => {
            app.scroll_horizontal(-SCROLL_X_STEP);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.scroll_horizontal(SCROLL_X_STEP);
        }
        KeyCode::PageDown => app.scroll_half_page(true),
        KeyCode::PageUp => app.scroll_half_page(false),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),
        _ => {}
    }
}
