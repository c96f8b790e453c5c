//! Application state and TUI event loop for watchlog.
//!
//! [`App`] owns the theme, the [`Dataset`] and the view state (page, open
//! prompt). Key handling is separated from the terminal loop so it can be
//! driven directly in tests.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;

use watchlog_core::models::TitleRule;
use watchlog_core::paths::display_name;
use watchlog_data::ranking::page_count;
use watchlog_runtime::{CsvLoader, Dataset, LoadOutcome};

use crate::components::PathPrompt;
use crate::dashboard::{render_dashboard, DashboardView};
use crate::themes::Theme;

// ── AppAction ─────────────────────────────────────────────────────────────────

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    None,
    Quit,
    /// Start a background parse of this file.
    Load(PathBuf),
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the watchlog TUI.
pub struct App {
    pub theme: Theme,
    pub dataset: Dataset,
    /// Zero-based title page.
    pub page: usize,
    pub page_size: usize,
    /// When set, only the top N titles are shown and paging is off.
    pub top: Option<usize>,
    /// Open path prompt, if any.
    pub prompt: Option<PathPrompt>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, dataset: Dataset, page_size: usize, top: Option<usize>) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            dataset,
            page: 0,
            page_size: page_size.max(1),
            top,
            prompt: None,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until the user quits, loading `initial` first.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so that load
    /// outcomes arriving on the channel are picked up between key presses.
    pub async fn run(mut self, initial: Option<PathBuf>) -> io::Result<()> {
        let (mut loader, mut rx) = CsvLoader::new();
        if let Some(path) = initial {
            self.start_load(&mut loader, path);
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match self.handle_key(key) {
                            AppAction::Quit => break Ok(()),
                            AppAction::Load(path) => self.start_load(&mut loader, path),
                            AppAction::None => {}
                        }
                    }
                }
            }

            // Drain finished loads (non-blocking).
            loop {
                match rx.try_recv() {
                    Ok(outcome) => self.apply_outcome(outcome),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn start_load(&mut self, loader: &mut CsvLoader, path: PathBuf) {
        tracing::info!(path = %path.display(), "loading viewing history");
        let generation = loader.load(path.clone());
        self.dataset.begin_load(generation, path);
    }

    /// Hand a finished load to the dataset; a fresh dataset starts on page 1.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        if self.dataset.apply(outcome) {
            self.page = 0;
        }
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return AppAction::Quit;
        }

        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => AppAction::Quit,
            KeyCode::Left | KeyCode::Char('h') => {
                self.page = self.page.saturating_sub(1);
                AppAction::None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.top.is_none() {
                    let pages = page_count(self.dataset.report().by_title.len(), self.page_size);
                    self.page = (self.page + 1).min(pages - 1);
                }
                AppAction::None
            }
            KeyCode::Char('c') => {
                self.dataset.clear();
                self.page = 0;
                AppAction::None
            }
            KeyCode::Char('r') => match self.current_path() {
                Some(path) => AppAction::Load(path),
                None => AppAction::None,
            },
            KeyCode::Char('o') => {
                let initial = self
                    .current_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.prompt = Some(PathPrompt::with_input(initial));
                AppAction::None
            }
            KeyCode::Char('s') => {
                let rule = match self.dataset.title_rule() {
                    TitleRule::AsIs => TitleRule::SeriesName,
                    TitleRule::SeriesName => TitleRule::AsIs,
                };
                self.dataset.set_title_rule(rule);
                self.page = 0;
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> AppAction {
        let Some(prompt) = self.prompt.as_mut() else {
            return AppAction::None;
        };

        match key.code {
            KeyCode::Enter => {
                let path = prompt.submit();
                self.prompt = None;
                path.map(AppAction::Load).unwrap_or(AppAction::None)
            }
            KeyCode::Esc => {
                self.prompt = None;
                AppAction::None
            }
            KeyCode::Backspace => {
                prompt.backspace();
                AppAction::None
            }
            KeyCode::Char(c) => {
                prompt.push(c);
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    /// The file being loaded, else the file last loaded.
    fn current_path(&self) -> Option<PathBuf> {
        self.dataset
            .pending_path()
            .or_else(|| self.dataset.source())
            .map(|p| p.to_path_buf())
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let source = self.dataset.source().map(display_name);
        let loading = self.dataset.pending_path().map(display_name);
        let error = self.dataset.error().map(str::to_owned);
        let timezone = self.dataset.timezone().to_owned();

        let view = DashboardView {
            report: self.dataset.report(),
            source: source.as_deref(),
            loading: loading.as_deref(),
            error: error.as_deref(),
            timezone: &timezone,
            page: self.page,
            page_size: self.page_size,
            top: self.top,
            prompt: self.prompt.as_ref(),
        };
        render_dashboard(frame, frame.area(), &view, &self.theme);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
