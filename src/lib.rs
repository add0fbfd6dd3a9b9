// Library surface for the binary and for headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod audio;
pub mod config;
pub mod game;
pub mod leaderboard;
pub mod logging;
pub mod mode;
pub mod render;
pub mod results_store;
pub mod runtime;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod ui;
pub mod word_pool;
pub mod words;

pub use app::{App, AppState};
pub use mode::GameMode;
