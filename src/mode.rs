use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The three ways a run can be played
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// fixed countdown, no penalties
    #[default]
    #[strum(serialize = "Time Attack")]
    TimeAttack,
    /// every wrong word costs five seconds
    Survival,
    /// correct words buy time, two wrong words end the run
    Conquest,
}

/// Seconds gained or lost per word in survival and conquest
pub const TIME_STEP_SECS: i64 = 5;

/// Wrong words a conquest run may absorb
pub const CONQUEST_ALLOWANCE: u32 = 2;

/// Consecutive exact words needed to win back one allowance unit
pub const CONQUEST_RECOVERY_STREAK: u32 = 5;

/// Why a run stopped; each reason maps to the message shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TimeUp,
    OutOfTime,
    OutOfWrongs,
}

impl GameMode {
    pub fn initial_time(&self) -> i64 {
        match self {
            GameMode::TimeAttack => 60,
            GameMode::Survival => 30,
            GameMode::Conquest => 5,
        }
    }

    pub fn end_message(&self, reason: EndReason) -> &'static str {
        match (self, reason) {
            (GameMode::Survival, EndReason::OutOfTime) => "You lost all time in Survival!",
            (GameMode::Conquest, EndReason::OutOfWrongs) => "No more wrongs left in Conquest Mode!",
            (GameMode::Survival, _) => "Time's up in Survival!",
            (GameMode::Conquest, _) => "Time's up in Conquest Mode!",
            (GameMode::TimeAttack, _) => "Time's up!",
        }
    }
}
