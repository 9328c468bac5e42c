pub mod app_dirs;
pub mod config;
pub mod history;
pub mod pool;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod tracker;
pub mod ui;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    history::{FileHistoryStore, HistoryStore, ScoreRecord},
    pool::SentencePool,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::Session,
};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::warn;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

/// The countdown re-evaluates remaining time once per second.
const TICK_RATE_MS: u64 = 1000;

/// minimal typing speed test tui with timed sessions and score history
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal typing TUI: sample sentences, a fixed-length countdown, live correctness feedback, and a persisted score log with progress charts."
)]
pub struct Cli {
    /// number of seconds per session
    #[clap(short = 's', long)]
    number_of_secs: Option<u64>,

    /// number of sentences drawn into the target text
    #[clap(short = 'f', long)]
    number_of_sentences: Option<usize>,

    /// what the results view reports next to wpm
    #[clap(short = 'p', long, value_enum)]
    profile: Option<Profile>,

    /// override the history log location
    #[clap(long)]
    history_file: Option<PathBuf>,
}

/// The two observed result-reporting behaviors, kept as selectable profiles
/// of one core rather than reconciled into one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Profile {
    /// report character accuracy next to wpm
    Accuracy,
    /// report the persisted high score next to wpm
    HighScore,
}

impl Profile {
    fn from_config_name(name: &str) -> Self {
        match name {
            "highscore" | "high-score" => Profile::HighScore,
            _ => Profile::Accuracy,
        }
    }

    fn config_name(&self) -> String {
        self.to_string().to_lowercase()
    }
}

/// Effective settings for this run: CLI flags override the config file,
/// which overrides the built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub number_of_secs: u64,
    pub number_of_sentences: usize,
    pub profile: Profile,
}

impl RuntimeSettings {
    pub fn resolve(cli: &Cli, cfg: &Config) -> Self {
        Self {
            number_of_secs: cli.number_of_secs.unwrap_or(cfg.number_of_secs),
            number_of_sentences: cli.number_of_sentences.unwrap_or(cfg.number_of_sentences),
            profile: cli
                .profile
                .unwrap_or_else(|| Profile::from_config_name(&cfg.profile)),
        }
    }
}

impl From<&RuntimeSettings> for Config {
    fn from(rs: &RuntimeSettings) -> Self {
        Self {
            number_of_secs: rs.number_of_secs,
            number_of_sentences: rs.number_of_sentences,
            profile: rs.profile.config_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Typing,
    Results,
    History,
}

/// Session controller: owns the current session value, the score history,
/// and the presentation state.
#[derive(Debug)]
pub struct App {
    pub settings: RuntimeSettings,
    pub pool: SentencePool,
    pub session: Session,
    pub state: AppState,
    pub history: FileHistoryStore,
    pub records: Vec<ScoreRecord>,
}

impl App {
    pub fn new(settings: RuntimeSettings, history: FileHistoryStore) -> Self {
        let pool = SentencePool::load();
        let session = Session::new(
            pool.draw_target(settings.number_of_sentences),
            Duration::from_secs(settings.number_of_secs),
        );
        let records = history.read_all();

        Self {
            settings,
            pool,
            session,
            state: AppState::Typing,
            history,
            records,
        }
    }

    /// Restart: discard the current session (and any presented results) and
    /// start a fresh one with a newly drawn target.
    pub fn reset(&mut self) {
        self.session = Session::new(
            self.pool.draw_target(self.settings.number_of_sentences),
            Duration::from_secs(self.settings.number_of_secs),
        );
        self.state = AppState::Typing;
    }

    pub fn on_tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if self.session.tick_at(now) {
            self.complete();
        }
    }

    /// Timer expiry: persist the frozen score and surface the results view.
    /// A failed write is logged and the score still shown.
    fn complete(&mut self) {
        if let Some(result) = &self.session.result {
            let record = ScoreRecord::now(result.wpm);
            if let Err(err) = self.history.append(&record) {
                warn!(
                    "failed to persist score to {}: {err}",
                    self.history.path().display()
                );
            }
            self.records.push(record);
        }
        self.state = AppState::Results;
    }

    pub fn high_score(&self) -> u64 {
        history::high_score(&self.records)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let settings = RuntimeSettings::resolve(&cli, &config_store.load());
    if cli.number_of_secs.is_some() || cli.number_of_sentences.is_some() || cli.profile.is_some() {
        if let Err(err) = config_store.save(&Config::from(&settings)) {
            warn!("failed to persist settings: {err}");
        }
    }

    let history = match &cli.history_file {
        Some(path) => FileHistoryStore::with_path(path),
        None => FileHistoryStore::new(),
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings, history);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    let ticker = FixedTicker::new(Duration::from_millis(TICK_RATE_MS));
    let runner = Runner::new(events, ticker);

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                app.on_tick();
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    return Ok(());
                }

                match app.state {
                    AppState::Typing => match key.code {
                        KeyCode::Esc => return Ok(()),
                        KeyCode::Backspace => app.session.backspace(),
                        KeyCode::Char(c) => app.session.write(c),
                        _ => {}
                    },
                    AppState::Results => match key.code {
                        KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('r') => app.reset(),
                        KeyCode::Char('h') => app.state = AppState::History,
                        _ => {}
                    },
                    AppState::History => match key.code {
                        KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('r') => app.reset(),
                        KeyCode::Char('b') | KeyCode::Backspace => app.state = AppState::Results,
                        _ => {}
                    },
                }
            }
        }

        terminal.draw(|f| ui(app, f))?;
    }
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
