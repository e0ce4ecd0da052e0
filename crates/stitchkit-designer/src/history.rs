//! Bounded snapshot history over pattern states.
//!
//! Undo/redo works on whole-pattern deep copies rather than command objects:
//! every destructive edit first checkpoints the active snapshot, then mutates
//! the fresh clone in place. The snapshot sequence is a sliding window of at
//! most `max_states` entries; the oldest state is evicted once the window is
//! full.

use stitchkit_core::constants::MAX_HISTORY_STATES;

use crate::model::Pattern;

/// Bounded undo/redo stack of pattern snapshots.
#[derive(Debug, Clone)]
pub struct PatternHistory {
    states: Vec<Pattern>,
    index: usize,
    max_states: usize,
}

impl PatternHistory {
    /// Creates a history seeded with one snapshot holding one default layer.
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_STATES)
    }

    /// Creates a history with a custom snapshot capacity (minimum 1).
    pub fn with_capacity(max_states: usize) -> Self {
        Self {
            states: vec![Pattern::with_default_layer()],
            index: 0,
            max_states: max_states.max(1),
        }
    }

    /// The active pattern snapshot.
    pub fn active(&self) -> &Pattern {
        &self.states[self.index]
    }

    /// The active pattern snapshot, for in-place edits between checkpoints.
    pub fn active_mut(&mut self) -> &mut Pattern {
        &mut self.states[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.states.len() - 1
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Position of the active snapshot within the retained sequence.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Clones the active snapshot into a new slot and makes the clone active,
    /// returning it for the caller to mutate.
    ///
    /// Any redo branch is discarded first; once the window exceeds capacity
    /// the oldest snapshot is evicted, keeping the index on the new clone.
    pub fn checkpoint(&mut self) -> &mut Pattern {
        if self.can_redo() {
            self.states.truncate(self.index + 1);
        }
        let clone = self.states[self.index].clone();
        self.states.push(clone);
        self.index += 1;
        if self.states.len() > self.max_states {
            self.states.remove(0);
            self.index -= 1;
        }
        self.active_mut()
    }

    /// Steps back one snapshot if possible and returns the active pattern.
    pub fn undo(&mut self) -> &Pattern {
        if self.can_undo() {
            self.index -= 1;
        }
        self.active()
    }

    /// Steps forward one snapshot if possible and returns the active pattern.
    pub fn redo(&mut self) -> &Pattern {
        if self.can_redo() {
            self.index += 1;
        }
        self.active()
    }
}

impl Default for PatternHistory {
    fn default() -> Self {
        Self::new()
    }
}
