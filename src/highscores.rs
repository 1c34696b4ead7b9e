//! High score leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 runs.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Enemies destroyed during the run
    pub enemies_destroyed: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "nova_strike_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        self.entries.len() < MAX_HIGH_SCORES
            || self.entries.last().is_some_and(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed), None if it doesn't qualify
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let ahead = self.entries.iter().filter(|e| e.score >= score).count();
        Some(ahead + 1)
    }

    /// Record a run. Returns the rank achieved (1-indexed), None if the score
    /// didn't qualify.
    pub fn add_score(&mut self, score: u64, enemies_destroyed: u32, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(score)?;

        self.entries.push(HighScoreEntry {
            score,
            enemies_destroyed,
            timestamp,
        });
        // Newer entries win ties so the fresh run shows at its rank
        self.entries
            .sort_by(|a, b| b.score.cmp(&a.score).then(b.timestamp.total_cmp(&a.timestamp)));
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_score_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_add_score_ranks_and_sorts() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(100, 5, 1.0), Some(1));
        assert_eq!(scores.add_score(300, 12, 2.0), Some(1));
        assert_eq!(scores.add_score(200, 8, 3.0), Some(2));

        let ranked: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ranked, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_board_truncates_at_capacity() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(i * 10, 0, i as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);

        // Too low to make the board
        assert_eq!(scores.add_score(5, 0, 99.0), None);
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);

        // Bumps the lowest entry off
        assert_eq!(scores.add_score(1000, 0, 100.0), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(1000));
        assert!(scores.entries.iter().all(|e| e.score != 10));
    }
}
