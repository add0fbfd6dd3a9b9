use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::session::FinalResults;

/// Local copy of the last finished run, read back by the results screen
pub trait ResultsStore {
    fn load(&self) -> Option<FinalResults>;
    fn save(&self, results: &FinalResults) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileResultsStore {
    path: PathBuf,
}

impl FileResultsStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::results_path().unwrap_or_else(|| PathBuf::from("last_results.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileResultsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsStore for FileResultsStore {
    fn load(&self) -> Option<FinalResults> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn save(&self, results: &FinalResults) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(results)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::GameMode;
    use tempfile::tempdir;

    fn sample() -> FinalResults {
        FinalResults {
            score: 87,
            wrongs_count: 2,
            total_words_presented: 20,
            typing_speed: 3.45,
            message: "Time's up in Conquest Mode!".into(),
            mode: GameMode::Conquest,
            player_name: "ada".into(),
        }
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempdir().unwrap();
        let store = FileResultsStore::with_path(dir.path().join("none.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = FileResultsStore::with_path(dir.path().join("state").join("last.json"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load(), Some(sample()));
    }

    #[test]
    fn test_later_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = FileResultsStore::with_path(dir.path().join("last.json"));
        store.save(&sample()).unwrap();
        let mut second = sample();
        second.score = 1;
        store.save(&second).unwrap();
        assert_eq!(store.load().unwrap().score, 1);
    }

    #[test]
    fn test_corrupt_file_loads_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last.json");
        fs::write(&path, b"not json").unwrap();
        assert!(FileResultsStore::with_path(&path).load().is_none());
    }
}
