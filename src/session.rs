use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::mode::{GameMode, CONQUEST_ALLOWANCE};

pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub player_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::TimeAttack,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn new(mode: GameMode, player_name: impl Into<String>) -> Self {
        let name = player_name.into();
        let player_name = if name.trim().is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name.trim().to_string()
        };
        Self { mode, player_name }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// waiting for the word list
    Loading,
    Active,
    /// end condition hit, waiting out the final feedback delay
    Ending,
    Ended,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub remaining_time: i64,
    pub score: u64,
    pub wrongs_count: u32,
    pub total_words_presented: u32,
    pub total_characters_typed: usize,
    pub current_word: String,
    pub input: String,
    pub input_enabled: bool,
    pub awaiting_submission: bool,
    // Conquest only
    pub wrongs_allowance: u32,
    pub streak: u32,
    pub started_at: Option<Instant>,
}

impl SessionState {
    pub fn new(mode: GameMode) -> Self {
        Self {
            remaining_time: mode.initial_time(),
            score: 0,
            wrongs_count: 0,
            total_words_presented: 0,
            total_characters_typed: 0,
            current_word: String::new(),
            input: String::new(),
            input_enabled: false,
            awaiting_submission: false,
            wrongs_allowance: CONQUEST_ALLOWANCE,
            streak: 0,
            started_at: None,
        }
    }
}

/// Everything the results screen and the leaderboard need from a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResults {
    pub score: u64,
    pub wrongs_count: u32,
    pub total_words_presented: u32,
    /// letters per second
    pub typing_speed: f64,
    pub message: String,
    pub mode: GameMode,
    pub player_name: String,
}

/// What happened to a single submitted word
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub correct_chars: usize,
    pub exact: bool,
    pub recovered: bool,
    pub ended: bool,
}

/// Notifications for the front end, drained with `Game::drain_events`
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    WordAdvanced(String),
    Submitted(SubmitOutcome),
    /// conquest streak bought back one wrong
    WrongRecovered,
    Ending(String),
    Ended(FinalResults),
    Abandoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_defaults() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.mode, GameMode::TimeAttack);
        assert_eq!(cfg.player_name, "Player");
    }

    #[test]
    fn test_session_config_blank_name_falls_back() {
        let cfg = SessionConfig::new(GameMode::Survival, "   ");
        assert_eq!(cfg.player_name, "Player");
        let cfg = SessionConfig::new(GameMode::Survival, " ada ");
        assert_eq!(cfg.player_name, "ada");
    }

    #[test]
    fn test_session_state_starts_with_mode_budget() {
        let state = SessionState::new(GameMode::Conquest);
        assert_eq!(state.remaining_time, 5);
        assert_eq!(state.wrongs_allowance, 2);
        assert_eq!(state.streak, 0);
        assert!(!state.input_enabled);
        assert!(state.started_at.is_none());
    }

    #[test]
    fn test_final_results_serde() {
        let results = FinalResults {
            score: 42,
            wrongs_count: 3,
            total_words_presented: 12,
            typing_speed: 2.5,
            message: "Time's up!".into(),
            mode: GameMode::TimeAttack,
            player_name: "ada".into(),
        };
        let json = serde_json::to_string(&results).unwrap();
        assert!(json.contains("\"mode\":\"time-attack\""));
        let back: FinalResults = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }
}
