//! JSON file-backed slot store.
//!
//! Layout: `<root>/club-<id>/slot-<NN>.json`. Writes go to a temporary file
//! that is synced and then renamed over the slot file, so a crash mid-write
//! leaves the previous contents intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ClubId, PersistedSlot, PersistenceError, SlotId, SlotKey, SlotStore, SLOT_COUNT};

/// Slot store writing one JSON document per slot.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    root: PathBuf,
}

impl FileSlotStore {
    /// Creates a store rooted at `root`. Directories are created lazily.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn slot_path(&self, key: SlotKey) -> PathBuf {
        self.club_dir(key.club)
            .join(format!("slot-{:02}.json", key.slot.get()))
    }

    /// Occupied slots for a club, in slot order.
    ///
    /// # Errors
    ///
    /// Filesystem failures other than a missing club directory.
    pub fn list_slots(&self, club: ClubId) -> Result<Vec<SlotId>, PersistenceError> {
        let mut slots = Vec::new();
        for n in 1..=SLOT_COUNT {
            let slot = SlotId::new(n)?;
            if self.slot_path(SlotKey::new(club, slot)).is_file() {
                slots.push(slot);
            }
        }
        Ok(slots)
    }

    fn club_dir(&self, club: ClubId) -> PathBuf {
        self.root.join(format!("club-{}", club.as_u64()))
    }
}

impl SlotStore for FileSlotStore {
    fn load_slot(&self, key: SlotKey) -> Result<Option<PersistedSlot>, PersistenceError> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        let slot: PersistedSlot = serde_json::from_str(&text)?;
        if slot.key() != key {
            return Err(PersistenceError::Backend(format!(
                "{} holds {} instead of {key}",
                path.display(),
                slot.key()
            )));
        }
        debug!(path = %path.display(), "slot loaded");
        Ok(Some(slot))
    }

    fn save_slot(&self, slot: &PersistedSlot) -> Result<(), PersistenceError> {
        let path = self.slot_path(slot.key());
        fs::create_dir_all(self.club_dir(slot.club_id))?;

        let bytes = serde_json::to_vec_pretty(slot)?;
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "slot saved");
        Ok(())
    }

    fn delete_slot(&self, key: SlotKey) -> Result<(), PersistenceError> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
