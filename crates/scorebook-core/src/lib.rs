//! # Scorebook Core
//!
//! Live scoring engine for softball games.
//!
//! An operator enters pitches, runner plays and substitutions one at a time;
//! the engine keeps the count, outs, bases and score, writes every change to
//! an append-only play log, and derives box scores, line scores, pitcher
//! lines and decisions from that log alone.
//!
//! ## Architecture
//!
//! - **State store** ([`state`]): the live situation; one mutation path
//! - **Recorder** ([`recorder`]): the append-only play log
//! - **Resolvers** ([`resolver`]): pitch signals to at-bat outcomes, and
//!   outcomes to confirmed runner movement
//! - **Game** ([`game`]): validates actions, records events, commits effects
//! - **Session** ([`session`]): undo history and write-through persistence
//!   for one save slot
//! - **Derive** ([`derive`]): pure folds over the log
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scorebook_core::persistence::{FileSlotStore, SlotKey};
//! use scorebook_core::session::GameSession;
//!
//! let store = FileSlotStore::new("slots");
//! let mut session = GameSession::start(store, key, config, setup, registry, sheets)?.value;
//! session.pitch(Pitch::Ball)?;
//! let line = session.game().line_score();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collab;
pub mod config;
pub mod derive;
pub mod error;
pub mod event;
pub mod game;
pub mod lineup;
pub mod persistence;
pub mod player;
pub mod recorder;
pub mod resolver;
pub mod session;
pub mod state;
pub mod undo;

pub use config::{SessionConfig, TieBreakRule};
pub use error::{InvariantViolation, ScoreError, ScoreResult, ValidationError};
pub use event::{EventKind, Outcome, Pitch, PlayEvent};
pub use game::{Game, GameSetup, TeamSheet};
pub use lineup::{Lineup, LineupSlot, Side, SidePair};
pub use persistence::{PersistenceError, SaveStatus, SlotKey, SlotStore};
pub use player::{PlayerId, PlayerRegistry};
pub use session::{ActionReport, GameSession};

#[cfg(test)]
mod tests;
