//! Bounded undo history.
//!
//! [`UndoStack`] keeps full snapshots, newest last. Pushing past capacity
//! silently drops the oldest snapshot. Popping an empty stack is not an
//! error; callers report it as [`UndoOutcome::NothingToUndo`].

use std::collections::VecDeque;

use crate::config::DEFAULT_UNDO_CAPACITY;
use crate::persistence::SaveStatus;

/// Result of an undo request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The previous snapshot was restored and written back to the store.
    Restored {
        /// Outcome of re-writing the restored state.
        save: SaveStatus,
    },
    /// The history was empty; nothing changed.
    NothingToUndo,
}

/// Capacity-bounded LIFO of snapshots.
///
/// # Example
///
/// ```
/// use scorebook_core::undo::UndoStack;
///
/// let mut stack = UndoStack::with_capacity(2);
/// stack.push(1);
/// stack.push(2);
/// stack.push(3);
///
/// assert_eq!(stack.pop(), Some(3));
/// assert_eq!(stack.pop(), Some(2));
/// assert_eq!(stack.pop(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoStack<T> {
    snapshots: VecDeque<T>,
    capacity: usize,
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_UNDO_CAPACITY)
    }
}

impl<T> UndoStack<T> {
    /// Creates a stack holding at most `capacity` snapshots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes a snapshot, dropping the oldest one past capacity.
    pub fn push(&mut self, snapshot: T) {
        if self.capacity == 0 {
            return;
        }
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Removes and returns the newest snapshot.
    pub fn pop(&mut self) -> Option<T> {
        self.snapshots.pop_back()
    }

    /// Number of snapshots held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if there is nothing to undo.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Maximum number of snapshots held.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops all snapshots.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
