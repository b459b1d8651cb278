//! One open game bound to its save slot.
//!
//! [`GameSession`] is the value every operator action goes through. It owns
//! the [`Game`], the undo history and a handle to the slot store, and wraps
//! each mutating action in the same transaction:
//!
//! 1. Snapshot the game
//! 2. Run the action; on error restore the snapshot and return the error
//! 3. If anything changed, push the snapshot onto the undo stack and write
//!    the slot through to the store
//!
//! A failed write never fails the action. It is reported in the returned
//! [`ActionReport`] as [`SaveStatus::Failed`] and logged; the in-memory game
//! stays authoritative until [`GameSession::save`] is retried.
//!
//! Sessions for different slots share nothing but the store handle.

use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::derive::DecisionOverrides;
use crate::error::ScoreResult;
use crate::event::{Pitch, RunnerAction};
use crate::game::{ConfirmOutcome, Game, GameSetup, PitchReport, PlayCommitted, TeamSheet};
use crate::lineup::{Side, SidePair};
use crate::persistence::{PersistedSlot, PersistenceError, SaveStatus, SlotKey, SlotStore};
use crate::player::{PitcherInfo, PlayerId, PlayerRegistry, Position};
use crate::resolver::{Overrides, RunnerAdjudicator};
use crate::state::{Base, HalfInning};
use crate::undo::{UndoOutcome, UndoStack};

/// The value of a committed action plus the outcome of its write-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport<T> {
    /// What the action returned.
    pub value: T,
    /// Whether the slot was written.
    pub save: SaveStatus,
}

impl<T> ActionReport<T> {
    /// Returns the action value, discarding the save status.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// A game in progress, its undo history and its save slot.
pub struct GameSession<S: SlotStore> {
    key: SlotKey,
    game: Game,
    undo: UndoStack<Game>,
    store: S,
    adjudicator: RunnerAdjudicator,
}

impl<S: SlotStore> GameSession<S> {
    /// Starts a new game in `key`, overwriting whatever the slot held.
    ///
    /// # Errors
    ///
    /// Fails if a lineup is empty or a side has no pitcher. Save failures
    /// are reported in the returned [`ActionReport`].
    pub fn start(
        store: S,
        key: SlotKey,
        config: SessionConfig,
        setup: GameSetup,
        registry: PlayerRegistry,
        sheets: SidePair<TeamSheet>,
    ) -> ScoreResult<ActionReport<Self>> {
        let undo = UndoStack::with_capacity(config.undo_capacity);
        let game = Game::start(config, setup, registry, sheets)?;
        let session = Self {
            key,
            game,
            undo,
            store,
            adjudicator: RunnerAdjudicator::new(),
        };
        let save = session.persist();
        Ok(ActionReport {
            value: session,
            save,
        })
    }

    /// Resumes the game stored in `key`. Undo history does not survive a
    /// reload.
    ///
    /// # Errors
    ///
    /// Backend or decoding failures. An empty slot is `Ok(None)`.
    pub fn load(store: S, key: SlotKey) -> Result<Option<Self>, PersistenceError> {
        let Some(slot) = store.load_slot(key)? else {
            return Ok(None);
        };
        let game = slot.progress;
        info!(%key, events = game.log().len(), "game resumed from slot");
        Ok(Some(Self {
            key,
            undo: UndoStack::with_capacity(game.config().undo_capacity),
            game,
            store,
            adjudicator: RunnerAdjudicator::new(),
        }))
    }

    // ----- Accessors -----

    /// The slot this session writes to.
    #[must_use]
    pub const fn key(&self) -> SlotKey {
        self.key
    }

    /// The game.
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// The slot store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Number of actions that can be undone.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    // ----- Persistence and undo -----

    /// Writes the slot now; used to retry after a failed write-through.
    pub fn save(&self) -> SaveStatus {
        self.persist()
    }

    /// Restores the game as it was before the last action and writes it
    /// back, replacing whatever the intervening actions saved.
    pub fn undo(&mut self) -> UndoOutcome {
        let Some(snapshot) = self.undo.pop() else {
            info!(key = %self.key, "nothing to undo");
            return UndoOutcome::NothingToUndo;
        };
        self.game = snapshot;
        info!(
            key = %self.key,
            events = self.game.log().len(),
            remaining = self.undo.len(),
            "action undone"
        );
        UndoOutcome::Restored {
            save: self.persist(),
        }
    }

    /// Deletes the slot and closes the session.
    ///
    /// # Errors
    ///
    /// Backend failures; the session is consumed either way.
    pub fn discard(self) -> Result<(), PersistenceError> {
        self.store.delete_slot(self.key)?;
        info!(key = %self.key, "slot discarded");
        Ok(())
    }

    fn persist(&self) -> SaveStatus {
        match self.store.save_slot(&PersistedSlot::capture(self.key, &self.game)) {
            Ok(()) => SaveStatus::Saved,
            Err(err) => {
                warn!(key = %self.key, error = %err, "slot write failed; game continues in memory");
                SaveStatus::Failed(err.to_string())
            }
        }
    }

    fn transact<T>(
        &mut self,
        action: impl FnOnce(&mut Game, &RunnerAdjudicator) -> ScoreResult<T>,
    ) -> ScoreResult<ActionReport<T>> {
        let before = self.game.clone();
        match action(&mut self.game, &self.adjudicator) {
            Ok(value) => {
                if self.game == before {
                    return Ok(ActionReport {
                        value,
                        save: SaveStatus::Unchanged,
                    });
                }
                self.undo.push(before);
                Ok(ActionReport {
                    value,
                    save: self.persist(),
                })
            }
            Err(err) => {
                self.game = before;
                Err(err)
            }
        }
    }

    // ----- Actions -----

    /// Records a pitch.
    ///
    /// # Errors
    ///
    /// See [`Game::pitch`].
    pub fn pitch(&mut self, pitch: Pitch) -> ScoreResult<ActionReport<PitchReport>> {
        self.transact(|game, adjudicator| game.pitch(adjudicator, pitch))
    }

    /// Confirms the pending play.
    ///
    /// # Errors
    ///
    /// See [`Game::confirm`].
    pub fn confirm(&mut self, overrides: &Overrides) -> ScoreResult<ActionReport<ConfirmOutcome>> {
        self.transact(|game, adjudicator| game.confirm(adjudicator, overrides))
    }

    /// Skips the batter due up.
    ///
    /// # Errors
    ///
    /// See [`Game::skip_batter`].
    pub fn skip_batter(&mut self) -> ScoreResult<ActionReport<PlayCommitted>> {
        self.transact(|game, _| game.skip_batter())
    }

    /// Records a runner play between pitches.
    ///
    /// # Errors
    ///
    /// See [`Game::runner_action`].
    pub fn runner_action(
        &mut self,
        base: Base,
        action: RunnerAction,
    ) -> ScoreResult<ActionReport<PlayCommitted>> {
        self.transact(|game, _| game.runner_action(base, action))
    }

    /// Sends up a pinch hitter.
    ///
    /// # Errors
    ///
    /// See [`Game::pinch_hit`].
    pub fn pinch_hit(
        &mut self,
        side: Side,
        slot: usize,
        player: PlayerId,
    ) -> ScoreResult<ActionReport<u64>> {
        self.transact(|game, _| game.pinch_hit(side, slot, player))
    }

    /// Makes a defensive substitution.
    ///
    /// # Errors
    ///
    /// See [`Game::substitute_defense`].
    pub fn substitute_defense(
        &mut self,
        side: Side,
        slot: usize,
        player: PlayerId,
        position: Position,
    ) -> ScoreResult<ActionReport<u64>> {
        self.transact(|game, _| game.substitute_defense(side, slot, player, position))
    }

    /// Moves a player to another position.
    ///
    /// # Errors
    ///
    /// See [`Game::change_position`].
    pub fn change_position(
        &mut self,
        side: Side,
        slot: usize,
        position: Position,
    ) -> ScoreResult<ActionReport<u64>> {
        self.transact(|game, _| game.change_position(side, slot, position))
    }

    /// Sends in a pinch runner.
    ///
    /// # Errors
    ///
    /// See [`Game::pinch_run`].
    pub fn pinch_run(&mut self, base: Base, player: PlayerId) -> ScoreResult<ActionReport<u64>> {
        self.transact(|game, _| game.pinch_run(base, player))
    }

    /// Sends in a courtesy runner.
    ///
    /// # Errors
    ///
    /// See [`Game::courtesy_run`].
    pub fn courtesy_run(&mut self, base: Base, player: PlayerId) -> ScoreResult<ActionReport<u64>> {
        self.transact(|game, _| game.courtesy_run(base, player))
    }

    /// Changes a side's pitcher.
    ///
    /// # Errors
    ///
    /// See [`Game::change_pitcher`].
    pub fn change_pitcher(
        &mut self,
        side: Side,
        pitcher: PitcherInfo,
    ) -> ScoreResult<ActionReport<u64>> {
        self.transact(|game, _| game.change_pitcher(side, pitcher))
    }

    /// Registers an opponent or guest player by name.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the other actions.
    pub fn register_guest(
        &mut self,
        name: &str,
        number: Option<String>,
    ) -> ScoreResult<ActionReport<PlayerId>> {
        self.transact(|game, _| Ok(game.registry_mut().register_guest(name, number)))
    }

    /// Ends the half-inning early.
    ///
    /// # Errors
    ///
    /// See [`Game::end_half_inning`].
    pub fn end_half_inning(&mut self) -> ScoreResult<ActionReport<HalfInning>> {
        self.transact(|game, _| game.end_half_inning())
    }

    /// Finishes the game.
    ///
    /// # Errors
    ///
    /// See [`Game::finish`].
    pub fn finish_game(&mut self) -> ScoreResult<ActionReport<SidePair<u32>>> {
        self.transact(|game, _| game.finish())
    }

    /// Rewrites the label and RBI of a past at-bat.
    ///
    /// # Errors
    ///
    /// See [`Game::correct_event`].
    pub fn correct_event(
        &mut self,
        seq: u64,
        label: Option<String>,
        rbi: Option<u32>,
    ) -> ScoreResult<ActionReport<()>> {
        self.transact(|game, _| game.correct_event(seq, label, rbi))
    }

    /// Sets pitcher-decision overrides.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the other actions.
    pub fn set_decision_overrides(
        &mut self,
        overrides: DecisionOverrides,
    ) -> ScoreResult<ActionReport<()>> {
        self.transact(|game, _| {
            game.set_decision_overrides(overrides);
            Ok(())
        })
    }
}

impl<S: SlotStore> std::fmt::Debug for GameSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("key", &self.key)
            .field("inning", &self.game.state().inning())
            .field("half", &self.game.state().half())
            .field("events", &self.game.log().len())
            .field("undo_depth", &self.undo.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::{ScoreError, ValidationError};
    use crate::event::{BattedBall, Contact, Destination};
    use crate::persistence::MemorySlotStore;
    use crate::player::Fielder;
    use crate::resolver::Mover;
    use crate::tests::helpers::{nine_man_sheets, setup, slot_key, start_session, FailingStore};

    mod transaction_tests {
        use super::*;

        #[test]
        fn failed_confirmation_leaves_game_untouched() {
            let mut session = start_session(MemorySlotStore::new());
            session.pitch(Pitch::HitByPitch).unwrap();
            let ball = BattedBall::new(Fielder::CenterField, Contact::Single);
            session.pitch(Pitch::InPlay(ball)).unwrap();
            let before = session.game().clone();
            let depth = session.undo_depth();

            let err = session
                .confirm(
                    &Overrides::new()
                        .set(Mover::Runner(Base::First), Destination::Base(Base::Second))
                        .set(Mover::Batter, Destination::Base(Base::Second)),
                )
                .unwrap_err();
            assert_eq!(
                err,
                ScoreError::Validation(ValidationError::BaseCollision(Base::Second))
            );
            assert_eq!(session.game(), &before);
            assert_eq!(session.undo_depth(), depth);
        }

        #[test]
        fn no_op_confirm_is_not_saved_or_undoable() {
            let mut session = start_session(MemorySlotStore::new());
            let depth = session.undo_depth();
            let report = session.confirm(&Overrides::new()).unwrap();
            assert_eq!(report.value, ConfirmOutcome::NothingPending);
            assert_eq!(report.save, SaveStatus::Unchanged);
            assert_eq!(session.undo_depth(), depth);
        }
    }

    mod undo_tests {
        use super::*;

        #[test]
        fn undo_on_fresh_session_is_a_notification() {
            let mut session = start_session(MemorySlotStore::new());
            assert_eq!(session.undo(), UndoOutcome::NothingToUndo);
        }

        #[test]
        fn undo_rewrites_the_slot() {
            let mut session = start_session(MemorySlotStore::new());
            session.pitch(Pitch::Ball).unwrap();
            session.pitch(Pitch::Ball).unwrap();
            assert_eq!(
                session.undo(),
                UndoOutcome::Restored {
                    save: SaveStatus::Saved
                }
            );
            let stored = session.store().load_slot(session.key()).unwrap().unwrap();
            assert_eq!(stored.progress.state().count().balls(), 1);
        }

        #[test]
        fn history_is_not_carried_into_a_reloaded_session() {
            let store = Arc::new(MemorySlotStore::new());
            let mut session = start_session(Arc::clone(&store));
            session.pitch(Pitch::Ball).unwrap();
            assert_eq!(session.undo_depth(), 1);

            let mut reloaded = GameSession::load(store, session.key()).unwrap().unwrap();
            assert_eq!(reloaded.undo_depth(), 0);
            assert_eq!(reloaded.undo(), UndoOutcome::NothingToUndo);
            assert_eq!(reloaded.game().state().count().balls(), 1);
        }

        #[test]
        fn capacity_bounds_history() {
            let store = MemorySlotStore::new();
            let mut session = GameSession::start(
                store,
                slot_key(1),
                SessionConfig::default().with_undo_capacity(2),
                setup(),
                PlayerRegistry::new(),
                nine_man_sheets(),
            )
            .unwrap()
            .into_value();
            for _ in 0..3 {
                session.pitch(Pitch::Ball).unwrap();
            }
            assert_eq!(session.undo_depth(), 2);
            session.undo();
            session.undo();
            assert_eq!(session.undo(), UndoOutcome::NothingToUndo);
            assert_eq!(session.game().state().count().balls(), 1);
        }
    }

    mod persistence_tests {
        use super::*;

        #[test]
        fn failed_write_does_not_block_scoring() {
            let mut session = start_session(FailingStore);
            let report = session.pitch(Pitch::CalledStrike).unwrap();
            assert!(report.save.is_failed());
            assert_eq!(session.game().state().count().strikes(), 1);
            assert!(session.save().is_failed());
        }

        #[test]
        fn load_of_empty_slot_is_none() {
            let loaded = GameSession::load(MemorySlotStore::new(), slot_key(4)).unwrap();
            assert!(loaded.is_none());
        }
    }
}
