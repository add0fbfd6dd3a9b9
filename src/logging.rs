use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Sends log output to `path`; the terminal belongs to the UI while a game runs.
/// Level comes from `RUST_LOG`, defaulting to `info`.
pub fn init_file_logger(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // a second init in the same process is harmless
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_log_file_and_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("typo-rush.log");
        init_file_logger(&path).unwrap();
        assert!(path.exists());
    }
}
