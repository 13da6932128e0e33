#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! High-score bookkeeping that records session-end scores into a persistent table.

use bastion_core::{Event, HighScores};
use thiserror::Error;
use tracing::{info, warn};

/// Failure raised by a high-score store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be read or written.
    #[error("high-score storage i/o failed")]
    Io(#[from] std::io::Error),
    /// The stored payload could not be decoded or encoded.
    #[error("high-score payload is malformed: {0}")]
    Malformed(String),
    /// The store refused the operation.
    #[error("high-score storage is unavailable: {0}")]
    Unavailable(String),
}

/// Persistence seam for the high-score table.
pub trait ScoreStore {
    /// Loads the stored table; a store without a table yields an empty one.
    fn load(&self) -> Result<HighScores, StoreError>;

    /// Replaces the stored table.
    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError>;
}

/// Volatile store keeping the table in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    scores: HighScores,
    reject_saves: bool,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `scores`.
    #[must_use]
    pub fn with_scores(scores: HighScores) -> Self {
        Self {
            scores,
            reject_saves: false,
        }
    }

    /// Makes every subsequent save fail, emulating a full or read-only storage.
    pub fn reject_saves(&mut self, reject: bool) {
        self.reject_saves = reject;
    }

    /// Table most recently saved.
    #[must_use]
    pub fn stored(&self) -> &HighScores {
        &self.scores
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScores, StoreError> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        if self.reject_saves {
            return Err(StoreError::Unavailable("saves are rejected".to_owned()));
        }
        self.scores = scores.clone();
        Ok(())
    }
}

/// Scoreboard system that records final scores when a session ends.
#[derive(Debug, Default)]
pub struct Scoreboard {
    scores: HighScores,
}

impl Scoreboard {
    /// Creates a scoreboard seeded from `store`.
    ///
    /// A store that fails to load leaves the scoreboard empty.
    #[must_use]
    pub fn load(store: &dyn ScoreStore) -> Self {
        let scores = store.load().unwrap_or_else(|error| {
            warn!(%error, "failed to load high scores, starting empty");
            HighScores::default()
        });
        Self { scores }
    }

    /// Current high-score table.
    #[must_use]
    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    /// Consumes world events and records every final score.
    ///
    /// A qualifying score is only committed once the store accepted the new
    /// table; a failed save keeps the previous table and is logged.
    pub fn handle(
        &mut self,
        events: &[Event],
        store: &mut dyn ScoreStore,
        out: &mut Vec<Event>,
    ) {
        for event in events {
            let Event::GameOver { final_score } = event else {
                continue;
            };

            let mut candidate = self.scores.clone();
            if !candidate.record(*final_score) {
                info!(score = final_score, "final score did not qualify");
                continue;
            }

            match store.save(&candidate) {
                Ok(()) => {
                    info!(score = final_score, best = ?candidate.best(), "high scores updated");
                    self.scores = candidate;
                    out.push(Event::HighScoresUpdated {
                        scores: self.scores.clone(),
                    });
                }
                Err(error) => {
                    warn!(%error, score = final_score, "failed to persist high scores");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_the_table() {
        let mut store = MemoryStore::new();
        let scores = HighScores::from_scores(vec![30, 10, 20]);
        store.save(&scores).expect("memory store accepts saves");
        assert_eq!(store.load().expect("memory store loads"), scores);
    }

    #[test]
    fn rejected_saves_leave_stored_table_untouched() {
        let mut store = MemoryStore::with_scores(HighScores::from_scores(vec![5]));
        store.reject_saves(true);
        let error = store
            .save(&HighScores::from_scores(vec![50]))
            .expect_err("saves are rejected");
        assert!(matches!(error, StoreError::Unavailable(_)));
        assert_eq!(store.stored().scores(), &[5]);
    }
}
