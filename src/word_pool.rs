use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Candidate words plus the set already presented in the current cycle.
///
/// Words are drawn uniformly from the ones not yet used. Once every candidate
/// has been presented the cycle restarts from the full set, except that the
/// word shown last is carried over as used so it cannot come straight back.
#[derive(Debug, Clone)]
pub struct WordPool {
    candidates: Vec<String>,
    used: HashSet<String>,
    last: Option<String>,
}

impl WordPool {
    /// Duplicates and blank entries are dropped. Returns `None` when nothing is left.
    pub fn new<I, S>(words: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let candidates: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|w| !w.trim().is_empty())
            .filter(|w| seen.insert(w.clone()))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        Some(Self {
            candidates,
            used: HashSet::new(),
            last: None,
        })
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn next_word<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        if self.used.len() >= self.candidates.len() {
            self.used.clear();
            if self.candidates.len() > 1 {
                if let Some(last) = &self.last {
                    self.used.insert(last.clone());
                }
            }
        }

        let unused: Vec<&String> = self
            .candidates
            .iter()
            .filter(|w| !self.used.contains(*w))
            .collect();

        // unused is never empty here: the cycle was reset above when exhausted
        let word = match unused.choose(rng) {
            Some(w) => (*w).clone(),
            None => self.candidates[0].clone(),
        };

        self.used.insert(word.clone());
        self.last = Some(word.clone());
        word
    }
}
