//! High score leaderboard
//!
//! Persisted to a JSON file, tracks the top 10 runs ranked by level reached
//! and then by score.

use std::path::Path;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::persistence::{PersistError, read_json, write_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Name recorded when the player leaves it blank
pub const ANONYMOUS: &str = "Anonymous";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

impl HighScoreEntry {
    fn rank_key(&self) -> (u32, u64) {
        (self.level, self.score)
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<HighScoreEntry>,
    /// Pre-fills the name prompt on the next run
    #[serde(default)]
    pub last_player_name: String,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a run qualifies for the leaderboard
    pub fn qualifies(&self, score: u64, level: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .last()
            .is_none_or(|e| (level, score) > e.rank_key())
    }

    /// Rank a run would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64, level: u32) -> Option<usize> {
        if !self.qualifies(score, level) {
            return None;
        }
        let rank = self.entries.iter().position(|e| (level, score) > e.rank_key());
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a run to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, name: &str, score: u64, level: u32, timestamp: u64) -> Option<usize> {
        let name = match name.trim() {
            "" => ANONYMOUS,
            trimmed => trimmed,
        };
        self.last_player_name = name.to_string();

        let rank = self.potential_rank(score, level)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                name: name.to_string(),
                score,
                level,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best entries first, at most `limit`
    pub fn top(&self, limit: usize) -> &[HighScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// Load from `path`, starting fresh when the file is missing or unreadable
    pub fn load(path: &Path) -> Self {
        match read_json::<Leaderboard>(path) {
            Ok(mut board) => {
                board.normalize();
                log::info!("Loaded {} high scores", board.entries.len());
                board
            }
            Err(e) if e.is_not_found() => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding leaderboard: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        write_json(path, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Restore ordering and size after loading a hand-edited file
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}

/// Format a timestamp relative to `now` (both Unix seconds)
pub fn format_date(timestamp: u64, now: u64) -> String {
    let diff_secs = now.saturating_sub(timestamp);
    let mins = diff_secs / 60;
    let hours = mins / 60;
    let days = hours / 24;

    if days >= 1 {
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            i64::try_from(timestamp)
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "N/A".to_string())
        }
    } else if hours >= 1 {
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if mins >= 1 {
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
