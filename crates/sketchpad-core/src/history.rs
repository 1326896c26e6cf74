//! Bounded undo/redo history of raster snapshots.

use std::collections::VecDeque;

/// Maximum number of states kept on the undo stack.
pub const MAX_HISTORY_DEPTH: usize = 20;

/// Undo/redo stacks over snapshots.
///
/// The undo stack is never empty: it is seeded with the initial canvas and
/// its last entry is always the state on display. The seed can only be
/// evicted by depth overflow, never popped by [`History::undo`].
#[derive(Debug, Clone)]
pub struct History<S> {
    /// Committed states, oldest first.
    undo_stack: VecDeque<S>,
    /// Undone states, most recently undone last.
    redo_stack: Vec<S>,
    limit: usize,
}

#[allow(clippy::len_without_is_empty)]
impl<S> History<S> {
    /// History seeded with the initial state and the default depth.
    pub fn new(seed: S) -> Self {
        Self::with_limit(seed, MAX_HISTORY_DEPTH)
    }

    /// History with a custom depth (at least 1).
    pub fn with_limit(seed: S, limit: usize) -> Self {
        let limit = limit.max(1);
        let mut undo_stack = VecDeque::with_capacity(limit + 1);
        undo_stack.push_back(seed);
        Self {
            undo_stack,
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Record a new state. Evicts the oldest entry beyond the limit and
    /// discards everything that could have been redone.
    pub fn commit(&mut self, state: S) {
        self.undo_stack.push_back(state);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
        if !self.redo_stack.is_empty() {
            log::debug!("Discarding {} redo states", self.redo_stack.len());
            self.redo_stack.clear();
        }
    }

    /// Step back one state. Returns the state now on display, or `None` when
    /// only the floor entry remains.
    pub fn undo(&mut self) -> Option<&S> {
        if self.undo_stack.len() <= 1 {
            return None;
        }
        let undone = self.undo_stack.pop_back()?;
        self.redo_stack.push(undone);
        self.undo_stack.back()
    }

    /// Re-apply the most recently undone state and return it.
    pub fn redo(&mut self) -> Option<&S> {
        let state = self.redo_stack.pop()?;
        self.undo_stack.push_back(state);
        self.undo_stack.back()
    }

    /// The state on display.
    pub fn current(&self) -> &S {
        // Invariant: the undo stack always holds at least one entry.
        &self.undo_stack[self.undo_stack.len() - 1]
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of committed states, including the floor.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
