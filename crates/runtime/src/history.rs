//! Bounded stack of undoable turns.

use std::collections::VecDeque;

use puzzle_core::TurnRecord;

/// Turns that changed the board or won the level, most recent last.
///
/// With a limit set, pushing past it forgets the oldest record, so undo can
/// walk back at most `limit` turns.
#[derive(Clone, Debug, Default)]
pub struct UndoHistory {
    records: VecDeque<TurnRecord>,
    limit: Option<usize>,
}

impl UndoHistory {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            records: VecDeque::new(),
            limit,
        }
    }

    /// Records `turn`. No-op turns are dropped unless they won the level;
    /// undoing one of those only reopens it.
    pub fn push(&mut self, turn: TurnRecord, won: bool) {
        if (turn.is_noop() && !won) || self.limit == Some(0) {
            return;
        }
        if let Some(limit) = self.limit {
            while self.records.len() >= limit {
                self.records.pop_front();
            }
        }
        self.records.push_back(turn);
    }

    pub fn pop(&mut self) -> Option<TurnRecord> {
        self.records.pop_back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
