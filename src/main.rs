use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

use typo_rush::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    leaderboard::{Leaderboard, SqliteLeaderboard, DEFAULT_TOP_N},
    logging,
    mode::GameMode,
    results_store::FileResultsStore,
    runtime::{CrosstermEventSource, FixedTicker, Runner, RushEvent},
    ui::{format::format_speed, screen},
    words::{EmbeddedWordSource, FileWordSource, WordSource},
};

/// fast-paced terminal typing game with three modes and a local leaderboard
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the word on screen before the clock runs out. Time Attack is a fixed minute with no penalties. In Survival every wrong word costs five seconds. In Conquest each exact word buys five seconds, and the second wrong word ends the run."
)]
pub struct Cli {
    /// game mode to play
    #[clap(short = 'm', long, value_enum)]
    mode: Option<GameMode>,

    /// player name recorded on the leaderboard
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// word list file (JSON `{"words": [...]}` or one word per line)
    #[clap(short = 'w', long = "word-list")]
    word_list: Option<PathBuf>,

    /// background music on or off
    #[clap(long, value_enum)]
    music: Option<Switch>,

    /// print the top players and exit
    #[clap(long)]
    leaderboard: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Cli {
    /// Layers command line flags over the saved settings
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(name) = &self.name {
            config.player_name = name.clone();
        }
        if let Some(path) = &self.word_list {
            config.word_list = Some(path.clone());
        }
        if let Some(music) = self.music {
            config.music_on = music == Switch::On;
        }
        config
    }
}

fn word_source(config: &Config) -> Box<dyn WordSource> {
    match &config.word_list {
        Some(path) => Box::new(FileWordSource::new(path)),
        None => Box::new(EmbeddedWordSource::default()),
    }
}

fn print_leaderboard() -> Result<(), Box<dyn Error>> {
    let board = SqliteLeaderboard::open_default()?;
    let entries = board.top(DEFAULT_TOP_N)?;
    if entries.is_empty() {
        println!("No players yet");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{:>2}. {:<16} {:>6} LPS  {}",
            i + 1,
            entry.player_name,
            format_speed(entry.letters_per_second),
            entry.mode
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init_file_logger(&path) {
            eprintln!("logging disabled: {e}");
        }
    }

    if cli.leaderboard {
        return print_leaderboard();
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if let Err(e) = store.save(&config) {
        log::warn!("failed to save settings: {e}");
    }
    log::info!(
        "starting {} for {} (music {})",
        config.mode,
        config.player_name,
        if config.music_on { "on" } else { "off" }
    );

    let mut app = App::new(config.clone(), word_source(&config))
        .with_results_store(FileResultsStore::new())
        .with_config_store(Box::new(store));
    match SqliteLeaderboard::open_default() {
        Ok(board) => app = app.with_leaderboard(board),
        Err(e) => log::warn!("running without a leaderboard: {e}"),
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    app.open_menu(Instant::now());

    while !app.should_quit {
        terminal.draw(|f| screen::draw(app, f))?;

        match runner.step() {
            RushEvent::Tick => app.on_tick(Instant::now()),
            RushEvent::Resize => {}
            RushEvent::Key(key) => app.on_key(key, Instant::now()),
        }
    }

    log::info!("exiting");
    Ok(())
}
