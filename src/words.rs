use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

static WORDLIST_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/wordlists");

pub const DEFAULT_WORDLIST: &str = "english";

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("word list '{0}' not found")]
    NotFound(String),
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("word list is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no words found in word list")]
    Empty,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub words: Vec<String>,
}

/// Anything that can hand the game its candidate words
pub trait WordSource {
    fn load(&self) -> Result<Vec<String>, WordSourceError>;
}

/// Word lists compiled into the binary
#[derive(Debug, Clone)]
pub struct EmbeddedWordSource {
    name: String,
}

impl EmbeddedWordSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for EmbeddedWordSource {
    fn default() -> Self {
        Self::new(DEFAULT_WORDLIST)
    }
}

impl WordSource for EmbeddedWordSource {
    fn load(&self) -> Result<Vec<String>, WordSourceError> {
        let file_name = format!("{}.json", self.name);
        let contents = WORDLIST_DIR
            .get_file(&file_name)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| WordSourceError::NotFound(self.name.clone()))?;

        parse_word_list(contents)
    }
}

/// A word list on disk, either `{"name", "words"}` JSON or one word per line
#[derive(Debug, Clone)]
pub struct FileWordSource {
    path: PathBuf,
}

impl FileWordSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl WordSource for FileWordSource {
    fn load(&self) -> Result<Vec<String>, WordSourceError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                WordSourceError::NotFound(self.path.display().to_string())
            } else {
                WordSourceError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        if contents.trim_start().starts_with('{') {
            parse_word_list(&contents)
        } else {
            non_empty(contents.lines().map(str::to_string).collect())
        }
    }
}

fn parse_word_list(contents: &str) -> Result<Vec<String>, WordSourceError> {
    let list: WordList = serde_json::from_str(contents)?;
    log::debug!("parsed word list '{}' ({} entries)", list.name, list.words.len());
    non_empty(list.words)
}

fn non_empty(words: Vec<String>) -> Result<Vec<String>, WordSourceError> {
    let words: Vec<String> = words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        Err(WordSourceError::Empty)
    } else {
        Ok(words)
    }
}
