//! The persistence gateway.
//!
//! A game in progress lives in a durable slot keyed by club and slot number.
//! The session writes the whole [`PersistedSlot`] through after every
//! committed action and reads it back to resume after an interruption.
//!
//! Failures here never abort scoring. The session turns a
//! [`PersistenceError`] into [`SaveStatus::Failed`], logs a warning and keeps
//! the in-memory game authoritative until the next save attempt.
//!
//! # Backends
//!
//! - [`MemorySlotStore`]: `RwLock`-backed map for tests and embedding
//! - [`FileSlotStore`]: one JSON file per slot under a root directory
//!
//! Two sessions writing the same slot overwrite each other; the last write
//! wins.

mod file;
mod memory;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{Game, GameSetup};
use crate::lineup::{Lineup, SidePair};

pub use file::FileSlotStore;
pub use memory::MemorySlotStore;

/// Number of save slots per club.
pub const SLOT_COUNT: u8 = 20;

/// Errors raised by slot stores.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure.
    #[error("slot i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The slot blob could not be encoded or decoded.
    #[error("slot encoding failed: {0}")]
    Codec(#[from] serde_json::Error),

    /// Slot numbers run from 1 to 20.
    #[error("slot {0} out of range 1..=20")]
    SlotOutOfRange(u8),

    /// Any other backend failure.
    #[error("slot store backend error: {0}")]
    Backend(String),
}

/// Outcome of the write-through after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveStatus {
    /// The slot was written.
    Saved,
    /// The write failed; the in-memory game is still authoritative.
    Failed(String),
    /// Nothing changed, so nothing was written.
    Unchanged,
}

impl SaveStatus {
    /// Returns true if the write failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Club identifier.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClubId(u64);

impl ClubId {
    /// Creates a club id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ClubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClubId({})", self.0)
    }
}

impl fmt::Display for ClubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Save slot number, 1 to [`SLOT_COUNT`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SlotId(u8);

impl SlotId {
    /// Validates a slot number.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::SlotOutOfRange`] outside 1..=20.
    pub fn new(slot: u8) -> Result<Self, PersistenceError> {
        if (1..=SLOT_COUNT).contains(&slot) {
            Ok(Self(slot))
        } else {
            Err(PersistenceError::SlotOutOfRange(slot))
        }
    }

    /// Raw value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SlotId {
    type Error = PersistenceError;

    fn try_from(slot: u8) -> Result<Self, Self::Error> {
        Self::new(slot)
    }
}

impl From<SlotId> for u8 {
    fn from(slot: SlotId) -> Self {
        slot.0
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.0)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of one save slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    /// Owning club.
    pub club: ClubId,
    /// Slot number.
    pub slot: SlotId,
}

impl SlotKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(club: ClubId, slot: SlotId) -> Self {
        Self { club, slot }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "club {} slot {}", self.club, self.slot)
    }
}

/// Everything needed to resume a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSlot {
    /// Owning club.
    pub club_id: ClubId,
    /// Slot number.
    pub slot_id: SlotId,
    /// Pre-game setup.
    pub setup: GameSetup,
    /// Starting batting orders.
    pub lineup: SidePair<Lineup>,
    /// The game in progress.
    pub progress: Game,
}

impl PersistedSlot {
    /// Captures a game for writing.
    #[must_use]
    pub fn capture(key: SlotKey, game: &Game) -> Self {
        Self {
            club_id: key.club,
            slot_id: key.slot,
            setup: game.setup().clone(),
            lineup: game.starting_lineups(),
            progress: game.clone(),
        }
    }

    /// The slot's key.
    #[must_use]
    pub const fn key(&self) -> SlotKey {
        SlotKey::new(self.club_id, self.slot_id)
    }
}

/// Durable storage for save slots.
///
/// Implementations take `&self` and must be safe to share across threads.
pub trait SlotStore: Send + Sync {
    /// Reads a slot; `None` if it was never written or has been deleted.
    ///
    /// # Errors
    ///
    /// Backend or decoding failures.
    fn load_slot(&self, key: SlotKey) -> Result<Option<PersistedSlot>, PersistenceError>;

    /// Writes a slot, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Backend or encoding failures.
    fn save_slot(&self, slot: &PersistedSlot) -> Result<(), PersistenceError>;

    /// Removes a slot. Deleting an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Backend failures.
    fn delete_slot(&self, key: SlotKey) -> Result<(), PersistenceError>;
}

impl<T: SlotStore + ?Sized> SlotStore for Arc<T> {
    fn load_slot(&self, key: SlotKey) -> Result<Option<PersistedSlot>, PersistenceError> {
        (**self).load_slot(key)
    }

    fn save_slot(&self, slot: &PersistedSlot) -> Result<(), PersistenceError> {
        (**self).save_slot(slot)
    }

    fn delete_slot(&self, key: SlotKey) -> Result<(), PersistenceError> {
        (**self).delete_slot(key)
    }
}
