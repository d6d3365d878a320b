//! Append-only move record for the current round.

use crate::board::Mark;
use crate::position::Position;

/// A single recorded move. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// 1-based sequence number within the round.
    pub move_number: u32,
    /// Display name of the player who moved.
    pub player: String,
    /// The mark placed.
    pub mark: Mark,
    /// Where it was placed.
    pub position: Position,
}

/// Error appending to the history log.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum HistoryError {
    /// A record arrived out of sequence.
    #[display("expected move number {expected}, got {got}")]
    NonMonotonic {
        /// The sequence number the log required next.
        expected: u32,
        /// The sequence number actually seen.
        got: u32,
    },
}

impl std::error::Error for HistoryError {}

/// Ordered record of the current round's moves.
///
/// Sequence numbers increase strictly by 1 starting at 1; the log is
/// cleared (scores are not) whenever a new round starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    records: Vec<MoveRecord>,
}

impl HistoryLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, enforcing the monotonic numbering invariant.
    pub fn append(&mut self, record: MoveRecord) -> Result<(), HistoryError> {
        let expected = self.records.len() as u32 + 1;
        if record.move_number != expected {
            return Err(HistoryError::NonMonotonic {
                expected,
                got: record.move_number,
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Rebuilds the log from an arbiter snapshot, validating numbering.
    ///
    /// Replies carry the complete history each time, so the log is
    /// replaced wholesale rather than patched.
    pub fn replace_from(&mut self, records: Vec<MoveRecord>) -> Result<(), HistoryError> {
        let mut fresh = Self::new();
        for record in records {
            fresh.append(record)?;
        }
        *self = fresh;
        Ok(())
    }

    /// Empties the log at round start.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of recorded moves.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Whether no moves are recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The recorded moves, oldest first.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: u32) -> MoveRecord {
        MoveRecord {
            move_number: n,
            player: "Ada".to_string(),
            mark: Mark::X,
            position: Position::Center,
        }
    }

    #[test]
    fn append_in_order() {
        let mut log = HistoryLog::new();
        log.append(record(1)).unwrap();
        log.append(record(2)).unwrap();
        assert_eq!(log.count(), 2);
    }

    #[test]
    fn append_rejects_gap() {
        let mut log = HistoryLog::new();
        log.append(record(1)).unwrap();
        assert_eq!(
            log.append(record(3)),
            Err(HistoryError::NonMonotonic { expected: 2, got: 3 })
        );
        assert_eq!(log.count(), 1);
    }

    #[test]
    fn replace_from_validates_and_replaces() {
        let mut log = HistoryLog::new();
        log.append(record(1)).unwrap();

        log.replace_from(vec![record(1), record(2), record(3)]).unwrap();
        assert_eq!(log.count(), 3);

        // A bad snapshot leaves the log untouched.
        let err = log.replace_from(vec![record(2)]);
        assert!(err.is_err());
        assert_eq!(log.count(), 3);
    }

    #[test]
    fn clear_empties() {
        let mut log = HistoryLog::new();
        log.append(record(1)).unwrap();
        log.clear();
        assert!(log.is_empty());
    }
}
