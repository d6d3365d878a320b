//! Running win/draw counters for the session.

use serde::{Deserialize, Serialize};

/// Score counters as reported by the arbiter.
///
/// Wire field names are the arbiter's (`player1`, `player2`, `draws`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    /// Rounds won by player 1.
    #[serde(rename = "player1")]
    pub player1_wins: u32,
    /// Rounds won by player 2.
    #[serde(rename = "player2")]
    pub player2_wins: u32,
    /// Drawn rounds.
    pub draws: u32,
}

/// Mirrors the arbiter's score bookkeeping across rounds.
///
/// The tracker never computes scores itself; it only adopts the
/// authoritative snapshot from replies, so client and arbiter cannot
/// diverge. Counters are non-decreasing for the life of a session and
/// reset only on a full return to setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    scores: Scores,
}

impl ScoreTracker {
    /// Creates a tracker with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters.
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Adopts the arbiter's snapshot.
    pub fn sync(&mut self, snapshot: Scores) {
        self.scores = snapshot;
    }

    /// Zeroes the counters on full session reset.
    pub fn reset(&mut self) {
        self.scores = Scores::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_adopts_snapshot() {
        let mut tracker = ScoreTracker::new();
        tracker.sync(Scores {
            player1_wins: 2,
            player2_wins: 1,
            draws: 3,
        });
        assert_eq!(tracker.scores().player1_wins, 2);
        assert_eq!(tracker.scores().draws, 3);
    }

    #[test]
    fn reset_zeroes() {
        let mut tracker = ScoreTracker::new();
        tracker.sync(Scores {
            player1_wins: 5,
            player2_wins: 0,
            draws: 0,
        });
        tracker.reset();
        assert_eq!(tracker.scores(), Scores::default());
    }
}
