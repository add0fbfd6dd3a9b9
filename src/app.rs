use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::audio::MusicController;
use crate::config::{Config, ConfigStore};
use crate::game::Game;
use crate::leaderboard::{Leaderboard, LeaderboardEntry, SqliteLeaderboard, DEFAULT_TOP_N};
use crate::mode::GameMode;
use crate::results_store::{FileResultsStore, ResultsStore};
use crate::session::{FinalResults, GameEvent, Phase, SessionConfig};
use crate::words::WordSource;

const NOTICE_DURATION: Duration = Duration::from_secs(2);
const MAX_NAME_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Menu,
    EditingName,
    Typing,
    Results,
    Leaderboard,
    /// the word list could not be loaded
    LoadFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub until: Instant,
}

pub struct App {
    pub state: AppState,
    pub settings: Config,
    pub game: Game<MusicController>,
    pub last_results: Option<FinalResults>,
    pub leaderboard_entries: Vec<LeaderboardEntry>,
    pub leaderboard_error: Option<String>,
    pub notice: Option<Notice>,
    pub name_draft: String,
    pub should_quit: bool,
    word_source: Box<dyn WordSource>,
    leaderboard: Option<Rc<RefCell<SqliteLeaderboard>>>,
    results_store: Option<FileResultsStore>,
    config_store: Option<Box<dyn ConfigStore>>,
}

impl App {
    pub fn new(settings: Config, word_source: Box<dyn WordSource>) -> Self {
        let music = MusicController::new(settings.music_on);
        Self {
            state: AppState::Menu,
            game: Game::with_hooks(settings.session_config(), music),
            settings,
            last_results: None,
            leaderboard_entries: Vec::new(),
            leaderboard_error: None,
            notice: None,
            name_draft: String::new(),
            should_quit: false,
            word_source,
            leaderboard: None,
            results_store: None,
            config_store: None,
        }
    }

    pub fn with_leaderboard(mut self, leaderboard: SqliteLeaderboard) -> Self {
        self.leaderboard = Some(Rc::new(RefCell::new(leaderboard)));
        self
    }

    pub fn with_results_store(mut self, store: FileResultsStore) -> Self {
        self.last_results = store.load();
        self.results_store = Some(store);
        self
    }

    pub fn with_config_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    pub fn music(&self) -> &MusicController {
        self.game.hooks()
    }

    /// Entry point after the terminal is ready: menu music starts here.
    pub fn open_menu(&mut self, now: Instant) {
        self.state = AppState::Menu;
        self.game.hooks_mut().resume(now);
    }

    /// Builds a fresh session for the selected mode and loads its words.
    pub fn start_session(&mut self, now: Instant) {
        let placeholder = Game::with_hooks(SessionConfig::default(), MusicController::default());
        let mut previous = std::mem::replace(&mut self.game, placeholder);
        if matches!(previous.phase(), Phase::Active | Phase::Ending) {
            previous.abandon(now);
        }
        let music = previous.into_hooks();

        let mut game = Game::with_hooks(self.settings.session_config(), music);
        if let Some(board) = &self.leaderboard {
            game = game.with_leaderboard(Box::new(Rc::clone(board)));
        }
        if let Some(store) = &self.results_store {
            game = game.with_results_store(Box::new(store.clone()));
        }
        self.game = game;
        self.notice = None;

        match self.game.begin_from(self.word_source.as_ref(), now) {
            Ok(()) => self.state = AppState::Typing,
            Err(e) => self.state = AppState::LoadFailed(e.to_string()),
        }
    }

    pub fn refresh_leaderboard(&mut self) {
        let Some(board) = &self.leaderboard else {
            self.leaderboard_entries.clear();
            self.leaderboard_error = Some("Leaderboard unavailable".to_string());
            return;
        };
        match board.top(DEFAULT_TOP_N) {
            Ok(entries) => {
                self.leaderboard_entries = entries;
                self.leaderboard_error = None;
            }
            Err(e) => {
                log::error!("error loading leaderboard: {e}");
                self.leaderboard_entries.clear();
                self.leaderboard_error = Some("Failed to load leaderboard".to_string());
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.game.poll(now);
        self.game.hooks_mut().update(now);
        self.handle_game_events(now);

        if self.notice.as_ref().is_some_and(|n| n.until <= now) {
            self.notice = None;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.game.abandon(now);
            self.should_quit = true;
            return;
        }

        match self.state.clone() {
            AppState::Menu => self.on_menu_key(key, now),
            AppState::EditingName => self.on_name_key(key),
            AppState::Typing => self.on_typing_key(key, now),
            AppState::Results => self.on_results_key(key, now),
            AppState::Leaderboard => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace) {
                    self.game.hooks_mut().play_click();
                    self.state = AppState::Menu;
                }
            }
            AppState::LoadFailed(_) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.state = AppState::Menu;
                }
            }
        }
        self.handle_game_events(now);
    }

    fn on_menu_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('1') => self.select_mode(GameMode::TimeAttack),
            KeyCode::Char('2') => self.select_mode(GameMode::Survival),
            KeyCode::Char('3') => self.select_mode(GameMode::Conquest),
            KeyCode::Char('n') => {
                self.game.hooks_mut().play_click();
                self.name_draft = self.settings.player_name.clone();
                self.state = AppState::EditingName;
            }
            KeyCode::Char('m') => {
                let on = self.game.hooks_mut().toggle(now);
                self.settings.music_on = on;
                self.save_settings();
            }
            KeyCode::Char('l') => {
                self.game.hooks_mut().play_click();
                self.refresh_leaderboard();
                self.state = AppState::Leaderboard;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.game.hooks_mut().play_click();
                self.start_session(now);
            }
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_name_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let session = SessionConfig::new(self.settings.mode, self.name_draft.clone());
                self.settings.player_name = session.player_name;
                self.save_settings();
                self.state = AppState::Menu;
            }
            KeyCode::Esc => self.state = AppState::Menu,
            KeyCode::Backspace => {
                self.name_draft.pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                if self.name_draft.chars().count() < MAX_NAME_LEN {
                    self.name_draft.push(c);
                }
            }
            _ => {}
        }
    }

    fn on_typing_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.game.abandon(now);
                self.state = AppState::Menu;
            }
            KeyCode::Enter => {
                self.game.submit_input(now);
            }
            KeyCode::Backspace => self.game.backspace(),
            KeyCode::Char(c) => {
                if self.game.type_char(c, now) {
                    self.game.submit_input(now);
                }
            }
            _ => {}
        }
    }

    fn on_results_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => {
                self.game.hooks_mut().play_click();
                self.start_session(now);
            }
            KeyCode::Char('l') => {
                self.game.hooks_mut().play_click();
                self.refresh_leaderboard();
                self.state = AppState::Leaderboard;
            }
            KeyCode::Esc | KeyCode::Char('m') => {
                self.game.hooks_mut().play_click();
                self.open_menu(now);
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn select_mode(&mut self, mode: GameMode) {
        self.game.hooks_mut().play_click();
        if self.settings.mode != mode {
            self.settings.mode = mode;
            self.save_settings();
        }
    }

    fn save_settings(&self) {
        if let Some(store) = &self.config_store {
            if let Err(e) = store.save(&self.settings) {
                log::warn!("failed to save settings: {e}");
            }
        }
    }

    fn handle_game_events(&mut self, now: Instant) {
        for event in self.game.drain_events() {
            match event {
                GameEvent::WrongRecovered => {
                    self.notice = Some(Notice {
                        text: "+1 Wrong Recovered!".to_string(),
                        until: now + NOTICE_DURATION,
                    });
                }
                GameEvent::Ended(results) => {
                    self.last_results = Some(results);
                    self.refresh_leaderboard();
                    self.state = AppState::Results;
                }
                GameEvent::WordAdvanced(_)
                | GameEvent::Submitted(_)
                | GameEvent::Ending(_)
                | GameEvent::Abandoned => {}
            }
        }
    }
}
