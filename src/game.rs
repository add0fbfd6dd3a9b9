use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::mode::{
    EndReason, GameMode, CONQUEST_ALLOWANCE, CONQUEST_RECOVERY_STREAK, TIME_STEP_SECS,
};
use crate::render::{render, Letter};
use crate::results_store::ResultsStore;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::scoring::{correct_char_count, is_exact, typing_speed};
use crate::session::{
    FinalResults, GameEvent, Phase, SessionConfig, SessionState, SubmitOutcome,
};
use crate::word_pool::WordPool;
use crate::words::{WordSource, WordSourceError};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("No words found in word list!")]
    NoWords,
    #[error("Error loading words: {0}")]
    WordSource(#[from] WordSourceError),
    #[error("session has already left the loading phase")]
    AlreadyStarted,
}

/// Lifecycle cues for collaborators such as the music controller
pub trait SessionHooks {
    fn on_session_start(&mut self, _mode: GameMode, _now: Instant) {}
    fn on_session_end(&mut self, _now: Instant) {}
    fn on_return_to_menu(&mut self, _now: Instant) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl SessionHooks for NoopHooks {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timings {
    /// pause after a submitted word before the next one appears
    pub feedback_delay: Duration,
    /// pause between the end condition and the final results
    pub ending_delay: Duration,
    pub tick_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            feedback_delay: Duration::from_millis(400),
            ending_delay: Duration::from_millis(450),
            tick_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Deferred {
    AdvanceWord,
    Finish(EndReason),
}

/// The typing session controller.
///
/// All mutation happens through `begin`, the display-update calls
/// (`type_char`, `backspace`), `submit`, `tick` and `poll`. Time is passed in
/// explicitly so the same code runs under the terminal loop and in tests.
pub struct Game<H: SessionHooks = NoopHooks> {
    config: SessionConfig,
    phase: Phase,
    state: SessionState,
    pool: Option<WordPool>,
    timings: Timings,
    scheduler: Scheduler<Deferred>,
    pending_advance: Option<TaskHandle>,
    pending_finish: Option<TaskHandle>,
    next_tick_at: Option<Instant>,
    events: Vec<GameEvent>,
    results: Option<FinalResults>,
    ending_message: Option<&'static str>,
    rng: StdRng,
    hooks: H,
    leaderboard: Option<Box<dyn Leaderboard>>,
    results_store: Option<Box<dyn ResultsStore>>,
}

impl Game<NoopHooks> {
    pub fn new(config: SessionConfig) -> Self {
        Game::with_hooks(config, NoopHooks)
    }
}

impl<H: SessionHooks> Game<H> {
    pub fn with_hooks(config: SessionConfig, hooks: H) -> Self {
        Self {
            state: SessionState::new(config.mode),
            config,
            phase: Phase::Loading,
            pool: None,
            timings: Timings::default(),
            scheduler: Scheduler::new(),
            pending_advance: None,
            pending_finish: None,
            next_tick_at: None,
            events: Vec::new(),
            results: None,
            ending_message: None,
            rng: StdRng::from_entropy(),
            hooks,
            leaderboard: None,
            results_store: None,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_leaderboard(mut self, leaderboard: Box<dyn Leaderboard>) -> Self {
        self.leaderboard = Some(leaderboard);
        self
    }

    pub fn with_results_store(mut self, store: Box<dyn ResultsStore>) -> Self {
        self.results_store = Some(store);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn results(&self) -> Option<&FinalResults> {
        self.results.as_ref()
    }

    /// Why the run is ending, once an end condition has fired
    pub fn ending_message(&self) -> Option<&'static str> {
        self.ending_message
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn into_hooks(self) -> H {
        self.hooks
    }

    pub fn is_countdown_running(&self) -> bool {
        self.next_tick_at.is_some()
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.scheduler.pending() > 0
    }

    /// Per-letter highlight of the current word against the input buffer
    pub fn letters(&self) -> Vec<Letter> {
        render(&self.state.current_word, &self.state.input)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Loads candidate words from `source` and starts the run.
    pub fn begin_from(&mut self, source: &dyn WordSource, now: Instant) -> Result<(), GameError> {
        match source.load() {
            Ok(words) => self.begin(words, now),
            Err(WordSourceError::Empty) => {
                log::error!("word source returned no words");
                Err(GameError::NoWords)
            }
            Err(e) => {
                log::error!("failed to load words: {e}");
                Err(e.into())
            }
        }
    }

    /// Leaves `Loading` with the given candidates. An empty list keeps the
    /// session in `Loading` for good.
    pub fn begin<I, S>(&mut self, words: I, now: Instant) -> Result<(), GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.phase != Phase::Loading {
            return Err(GameError::AlreadyStarted);
        }

        let pool = WordPool::new(words).ok_or(GameError::NoWords)?;
        log::info!(
            "starting {} session for {} with {} words",
            self.config.mode,
            self.config.player_name,
            pool.len()
        );

        self.pool = Some(pool);
        self.phase = Phase::Active;
        self.state.input_enabled = true;
        self.hooks.on_session_start(self.config.mode, now);
        self.advance_word();
        self.ensure_countdown(now);
        Ok(())
    }

    pub fn advance_word(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        let Some(pool) = self.pool.as_mut() else {
            return;
        };

        if let Some(handle) = self.pending_advance.take() {
            self.scheduler.cancel(handle);
        }
        self.state.awaiting_submission = false;
        self.state.current_word = pool.next_word(&mut self.rng);
        self.state.total_words_presented += 1;
        self.state.input.clear();
        self.events
            .push(GameEvent::WordAdvanced(self.state.current_word.clone()));
    }

    /// Display update for a typed character. Returns true once the buffer is
    /// as long as the target word, at which point the caller should submit.
    pub fn type_char(&mut self, c: char, now: Instant) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.state.started_at.get_or_insert(now);
        self.state.input.push(c);
        self.state.input.chars().count() >= self.state.current_word.chars().count()
    }

    pub fn backspace(&mut self) {
        if self.accepts_input() {
            self.state.input.pop();
        }
    }

    /// Submits whatever is in the input buffer.
    pub fn submit_input(&mut self, now: Instant) -> Option<SubmitOutcome> {
        let typed = self.state.input.clone();
        self.submit(&typed, now)
    }

    /// Scores `typed` against the current word and applies the mode rules.
    /// Returns `None` when the word was already submitted or the session is
    /// not accepting input.
    pub fn submit(&mut self, typed: &str, now: Instant) -> Option<SubmitOutcome> {
        if self.phase != Phase::Active || self.state.awaiting_submission {
            return None;
        }
        self.state.awaiting_submission = true;
        self.state.started_at.get_or_insert(now);
        self.state.input = typed.to_string();

        let target = self.state.current_word.clone();
        self.state.total_characters_typed += typed.chars().count();

        let correct_chars = correct_char_count(typed, &target);
        self.state.score += correct_chars as u64;

        let exact = is_exact(typed, &target);
        if !exact {
            self.state.wrongs_count += 1;
        }

        let mut recovered = false;
        let mut ending = None;

        match self.config.mode {
            GameMode::TimeAttack => {}
            GameMode::Survival => {
                if !exact {
                    self.state.remaining_time = (self.state.remaining_time - TIME_STEP_SECS).max(0);
                    if self.state.remaining_time <= 0 {
                        ending = Some(EndReason::OutOfTime);
                    }
                }
            }
            GameMode::Conquest => {
                if exact {
                    self.state.remaining_time += TIME_STEP_SECS;
                    self.state.streak += 1;
                    if self.state.streak >= CONQUEST_RECOVERY_STREAK
                        && self.state.wrongs_allowance < CONQUEST_ALLOWANCE
                    {
                        self.state.wrongs_allowance =
                            (self.state.wrongs_allowance + 1).min(CONQUEST_ALLOWANCE);
                        self.state.streak = 0;
                        recovered = true;
                    }
                    self.ensure_countdown(now);
                } else {
                    self.state.streak = 0;
                    self.state.wrongs_allowance = self.state.wrongs_allowance.saturating_sub(1);
                    if self.state.wrongs_allowance == 0 {
                        ending = Some(EndReason::OutOfWrongs);
                    }
                }
            }
        }

        if recovered {
            log::debug!("conquest streak recovered one wrong");
            self.events.push(GameEvent::WrongRecovered);
        }

        let outcome = SubmitOutcome {
            correct_chars,
            exact,
            recovered,
            ended: ending.is_some(),
        };
        self.events.push(GameEvent::Submitted(outcome.clone()));

        match ending {
            Some(reason) => self.begin_ending(reason, now),
            None => {
                let handle =
                    self.scheduler
                        .schedule(now, self.timings.feedback_delay, Deferred::AdvanceWord);
                self.pending_advance = Some(handle);
            }
        }

        Some(outcome)
    }

    /// One elapsed second of countdown.
    pub fn tick(&mut self, now: Instant) {
        if self.phase != Phase::Active || !self.is_countdown_running() {
            return;
        }
        self.state.remaining_time = (self.state.remaining_time - 1).max(0);
        if self.state.remaining_time <= 0 {
            self.begin_ending(EndReason::TimeUp, now);
        }
    }

    /// Runs every countdown tick and scheduled task due by `now`, in time order.
    pub fn poll(&mut self, now: Instant) {
        loop {
            let tick_due = self.next_tick_at.filter(|t| *t <= now);
            let task_due = self.scheduler.next_due().filter(|t| *t <= now);

            match (tick_due, task_due) {
                (Some(tick_at), Some(task_at)) if task_at < tick_at => self.run_tasks(task_at),
                (Some(tick_at), _) => {
                    self.next_tick_at = Some(tick_at + self.timings.tick_interval);
                    self.tick(tick_at);
                }
                (None, Some(task_at)) => self.run_tasks(task_at),
                (None, None) => break,
            }
        }
    }

    /// Stops the run, computes the final results and hands them off.
    pub fn end_game(&mut self, message: &str, now: Instant) -> Option<FinalResults> {
        if self.phase == Phase::Ended || self.phase == Phase::Loading {
            return None;
        }
        self.stop_all();

        let elapsed_secs = self
            .state
            .started_at
            .map(|s| now.saturating_duration_since(s).as_secs_f64())
            .unwrap_or(0.0);

        let results = FinalResults {
            score: self.state.score,
            wrongs_count: self.state.wrongs_count,
            total_words_presented: self.state.total_words_presented,
            typing_speed: typing_speed(self.state.total_characters_typed, elapsed_secs),
            message: message.to_string(),
            mode: self.config.mode,
            player_name: self.config.player_name.clone(),
        };

        log::info!(
            "session ended: {} score={} wrongs={} lps={:.2}",
            results.message,
            results.score,
            results.wrongs_count,
            results.typing_speed
        );

        if let Some(store) = self.results_store.as_ref() {
            if let Err(e) = store.save(&results) {
                log::warn!("failed to store results locally: {e}");
            }
        }

        if let Some(leaderboard) = self.leaderboard.as_mut() {
            let entry = LeaderboardEntry::from(&results);
            if let Err(e) = leaderboard.submit(&entry) {
                log::warn!("failed to save leaderboard entry: {e}");
            }
        }

        self.hooks.on_session_end(now);
        self.phase = Phase::Ended;
        self.results = Some(results.clone());
        self.events.push(GameEvent::Ended(results.clone()));
        Some(results)
    }

    /// Explicit teardown when the player leaves mid-run. No results are produced.
    pub fn abandon(&mut self, now: Instant) {
        if self.phase == Phase::Ended {
            return;
        }
        log::info!("session abandoned");
        self.stop_all();
        self.hooks.on_return_to_menu(now);
        self.phase = Phase::Ended;
        self.events.push(GameEvent::Abandoned);
    }

    fn accepts_input(&self) -> bool {
        self.phase == Phase::Active && self.state.input_enabled && !self.state.awaiting_submission
    }

    fn ensure_countdown(&mut self, now: Instant) {
        if self.next_tick_at.is_none() && self.phase == Phase::Active {
            self.next_tick_at = Some(now + self.timings.tick_interval);
        }
    }

    fn stop_all(&mut self) {
        self.next_tick_at = None;
        for handle in [self.pending_advance.take(), self.pending_finish.take()]
            .into_iter()
            .flatten()
        {
            if self.scheduler.cancel(handle) {
                log::trace!("cancelled pending task {handle:?}");
            }
        }
        self.state.input_enabled = false;
    }

    fn begin_ending(&mut self, reason: EndReason, now: Instant) {
        if self.phase != Phase::Active {
            return;
        }
        let message = self.config.mode.end_message(reason);
        log::debug!("ending session: {message}");

        self.phase = Phase::Ending;
        self.ending_message = Some(message);
        self.stop_all();
        let handle = self
            .scheduler
            .schedule(now, self.timings.ending_delay, Deferred::Finish(reason));
        self.pending_finish = Some(handle);
        self.events.push(GameEvent::Ending(message.to_string()));
    }

    fn run_tasks(&mut self, at: Instant) {
        for task in self.scheduler.take_due(at) {
            match task {
                Deferred::AdvanceWord => self.advance_word(),
                Deferred::Finish(reason) => {
                    self.pending_finish = None;
                    let message = self.config.mode.end_message(reason);
                    self.end_game(message, at);
                }
            }
        }
    }
}
