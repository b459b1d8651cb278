//! Resolvers turn operator signals into committed plays.
//!
//! Resolution happens in two stages:
//! 1. The [`AtBatResolver`] consumes pitch signals, updating the count after
//!    each one, until a pitch ends the at-bat with an [`Outcome`].
//! 2. The [`RunnerAdjudicator`] proposes where every runner and the batter
//!    end up for that outcome. The operator confirms or overrides the
//!    proposal, and the adjudicated result is what the state store commits.
//!
//! Neither resolver touches the state store; the session applies their
//! results through [`GameState::apply_resolved_play`].
//!
//! # Invariants
//!
//! - Resolvers are deterministic: the same inputs always produce the same
//!   proposal and the same adjudication.
//! - A rejected adjudication leaves nothing behind. No partial runner map is
//!   ever committed.
//!
//! [`Outcome`]: crate::event::Outcome
//! [`GameState::apply_resolved_play`]: crate::state::GameState::apply_resolved_play

mod at_bat;
mod runner;

pub use at_bat::{AtBatPhase, AtBatResolver, PitchEffect};
pub use runner::{
    advance_runner, Adjudication, Mover, Movement, Overrides, Proposal, RunnerAdjudicator,
};
