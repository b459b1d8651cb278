//! In-memory slot store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{PersistedSlot, PersistenceError, SlotKey, SlotStore};

fn lock_err(context: &'static str) -> PersistenceError {
    PersistenceError::Backend(format!("poisoned lock: {context}"))
}

/// Thread-safe map of slots, lost when dropped.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RwLock<BTreeMap<SlotKey, PersistedSlot>>,
}

impl MemorySlotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    ///
    /// # Errors
    ///
    /// Fails if the lock is poisoned.
    pub fn len(&self) -> Result<usize, PersistenceError> {
        Ok(self.slots.read().map_err(|_| lock_err("len"))?.len())
    }

    /// Returns true if no slot is occupied.
    ///
    /// # Errors
    ///
    /// Fails if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, PersistenceError> {
        Ok(self.len()? == 0)
    }
}

impl SlotStore for MemorySlotStore {
    fn load_slot(&self, key: SlotKey) -> Result<Option<PersistedSlot>, PersistenceError> {
        let slots = self.slots.read().map_err(|_| lock_err("load_slot"))?;
        Ok(slots.get(&key).cloned())
    }

    fn save_slot(&self, slot: &PersistedSlot) -> Result<(), PersistenceError> {
        let mut slots = self.slots.write().map_err(|_| lock_err("save_slot"))?;
        slots.insert(slot.key(), slot.clone());
        Ok(())
    }

    fn delete_slot(&self, key: SlotKey) -> Result<(), PersistenceError> {
        let mut slots = self.slots.write().map_err(|_| lock_err("delete_slot"))?;
        slots.remove(&key);
        Ok(())
    }
}
