use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typo-rush";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/typo-rush`, falling back to the platform data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join(APP_NAME))
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn leaderboard_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("leaderboard.db"))
    }

    pub fn results_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("last_results.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("typo-rush.log"))
    }
}
