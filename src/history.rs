//! Bounded undo/redo snapshot stacks.
//!
//! The undo stack's top is always the current committed state; the initial
//! empty state is pushed at construction so the first committed stroke can
//! be undone back to a blank pad. Snapshots are full copies of the stroke
//! list, never references into the live one.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::DEFAULT_MAX_HISTORY;
use crate::stroke::Stroke;

/// Snapshot-based undo/redo history.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<Vec<Stroke>>,
    redo_stack: Vec<Vec<Stroke>>,
    max_size: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl HistoryManager {
    /// Create a history allowing at most `max_size` undo steps (minimum one).
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        let mut undo_stack = VecDeque::new();
        undo_stack.push_back(Vec::new());
        Self { undo_stack, redo_stack: Vec::new(), max_size: max_size.max(1) }
    }

    /// Record `strokes` as the new current state.
    ///
    /// Clears the redo stack and evicts the oldest snapshot once more than
    /// `max_size` steps could be undone.
    pub fn save(&mut self, strokes: &[Stroke]) {
        self.undo_stack.push_back(strokes.to_vec());
        self.redo_stack.clear();
        self.evict();
    }

    /// Step back one snapshot and return the state to display.
    ///
    /// Returns `None` when there is nothing to undo. `Some(vec![])` is a valid
    /// result meaning the pad should be blank.
    pub fn undo(&mut self) -> Option<Vec<Stroke>> {
        if !self.can_undo() {
            return None;
        }
        let current = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        self.undo_stack.back().cloned()
    }

    /// Re-apply the most recently undone snapshot.
    pub fn redo(&mut self) -> Option<Vec<Stroke>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(next.clone());
        self.evict();
        Some(next)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop all snapshots and reseed with the empty state.
    pub fn clear(&mut self) {
        self.reset(&[]);
    }

    /// Drop all snapshots and make `strokes` the new baseline. The baseline
    /// itself cannot be undone.
    pub fn reset(&mut self, strokes: &[Stroke]) {
        self.undo_stack.clear();
        self.undo_stack.push_back(strokes.to_vec());
        self.redo_stack.clear();
    }

    /// Number of snapshots on the undo stack, including the current one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Change the capacity, evicting the oldest snapshots from both stacks.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size.max(1);
        self.evict();
        if self.redo_stack.len() > self.max_size {
            let excess = self.redo_stack.len() - self.max_size;
            self.redo_stack.drain(..excess);
        }
    }

    /// The undo stack keeps the current state on top of `max_size` undoable ones.
    fn evict(&mut self) {
        while self.undo_stack.len() > self.max_size + 1 {
            self.undo_stack.pop_front();
        }
    }
}
