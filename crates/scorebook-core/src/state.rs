//! The game state store.
//!
//! [`GameState`] is the current situation of a game: inning and half, the
//! ball-strike count, outs, who stands on which base, and the score.
//! Baserunners, runs and outs change only through
//! [`GameState::apply_resolved_play`]. The per-pitch count is the one field a
//! pitch can move on its own, and it goes through the validated
//! [`GameState::set_count`].
//!
//! # Invariants
//!
//! - `balls` is at most 3 and `strikes` at most 2 whenever the state is
//!   observable; the fourth ball or third strike ends the at-bat instead.
//! - `outs` is at most 2; the third out flips the half-inning inside the
//!   same call that recorded it.
//! - A base holds at most one runner (enforced by [`Bases`] having one
//!   field per base).
//!
//! # Example
//!
//! ```
//! use scorebook_core::state::{Bases, Base, GameState, Half, ResolvedPlay};
//! use scorebook_core::player::PlayerId;
//!
//! let mut state = GameState::new();
//! let mut after = Bases::default();
//! after.set(Base::Second, Some(PlayerId::new(4)));
//!
//! let change = state
//!     .apply_resolved_play(&ResolvedPlay::at_bat(after, 0, 0))
//!     .unwrap();
//!
//! assert!(change.is_none());
//! assert_eq!(state.bases().get(Base::Second), Some(PlayerId::new(4)));
//! assert_eq!(state.half(), Half::Top);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::InvariantViolation;
use crate::lineup::{Side, SidePair};
use crate::player::PlayerId;

/// Maximum balls before the next one is ball four.
pub const MAX_BALLS: u8 = 3;

/// Maximum strikes before the next one is strike three.
pub const MAX_STRIKES: u8 = 2;

/// Outs that end a half-inning.
pub const OUTS_PER_HALF: u8 = 3;

// =============================================================================
// Half / Base
// =============================================================================

/// Top or bottom of an inning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Half {
    /// Away team bats.
    Top,
    /// Home team bats.
    Bottom,
}

impl Half {
    /// The other half.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Bottom => f.write_str("bottom"),
        }
    }
}

/// One of the three bases a runner can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Base {
    /// First base.
    First,
    /// Second base.
    Second,
    /// Third base.
    Third,
}

impl Base {
    /// All bases, first to third.
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    /// Base number (1-3).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    /// The base for a number 1-3.
    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    /// The next base toward home; `None` from third.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::First => Some(Self::Second),
            Self::Second => Some(Self::Third),
            Self::Third => None,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first base"),
            Self::Second => f.write_str("second base"),
            Self::Third => f.write_str("third base"),
        }
    }
}

// =============================================================================
// Count / Bases
// =============================================================================

/// Ball-strike count of the current at-bat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Count {
    balls: u8,
    strikes: u8,
}

impl Count {
    /// A fresh 0-0 count.
    pub const ZERO: Self = Self {
        balls: 0,
        strikes: 0,
    };

    /// Creates a count, rejecting values outside 0..=3 balls and 0..=2 strikes.
    ///
    /// # Errors
    ///
    /// Returns the violated range.
    pub const fn new(balls: u8, strikes: u8) -> Result<Self, InvariantViolation> {
        if balls > MAX_BALLS {
            return Err(InvariantViolation::BallsOutOfRange(balls));
        }
        if strikes > MAX_STRIKES {
            return Err(InvariantViolation::StrikesOutOfRange(strikes));
        }
        Ok(Self { balls, strikes })
    }

    /// Balls in the count.
    #[must_use]
    pub const fn balls(self) -> u8 {
        self.balls
    }

    /// Strikes in the count.
    #[must_use]
    pub const fn strikes(self) -> u8 {
        self.strikes
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.balls, self.strikes)
    }
}

/// Occupants of first, second and third base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bases {
    first: Option<PlayerId>,
    second: Option<PlayerId>,
    third: Option<PlayerId>,
}

impl Bases {
    /// Empty bases.
    pub const EMPTY: Self = Self {
        first: None,
        second: None,
        third: None,
    };

    /// The runner on `base`.
    #[must_use]
    pub const fn get(&self, base: Base) -> Option<PlayerId> {
        match base {
            Base::First => self.first,
            Base::Second => self.second,
            Base::Third => self.third,
        }
    }

    /// Puts `runner` on `base`, replacing whoever was there.
    pub fn set(&mut self, base: Base, runner: Option<PlayerId>) {
        match base {
            Base::First => self.first = runner,
            Base::Second => self.second = runner,
            Base::Third => self.third = runner,
        }
    }

    /// Returns true if someone stands on `base`.
    #[must_use]
    pub const fn is_occupied(&self, base: Base) -> bool {
        self.get(base).is_some()
    }

    /// Returns true if no base is occupied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none() && self.third.is_none()
    }

    /// Number of runners on base.
    #[must_use]
    pub fn count(&self) -> usize {
        self.occupied().count()
    }

    /// Occupied bases with their runners, first to third.
    pub fn occupied(&self) -> impl Iterator<Item = (Base, PlayerId)> + '_ {
        Base::ALL
            .into_iter()
            .filter_map(|base| self.get(base).map(|runner| (base, runner)))
    }

    /// The base `runner` stands on, if any.
    #[must_use]
    pub fn base_of(&self, runner: PlayerId) -> Option<Base> {
        self.occupied()
            .find(|(_, id)| *id == runner)
            .map(|(base, _)| base)
    }
}

// =============================================================================
// Resolved plays
// =============================================================================

/// The committed effect of one play on the state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPlay {
    /// Base occupancy after the play.
    pub bases: Bases,
    /// Runs scored on the play.
    pub runs: u32,
    /// Outs recorded on the play.
    pub outs: u8,
    /// The play ended the current at-bat, resetting the count.
    pub ends_at_bat: bool,
}

impl ResolvedPlay {
    /// A play that ends the current at-bat.
    #[must_use]
    pub const fn at_bat(bases: Bases, runs: u32, outs: u8) -> Self {
        Self {
            bases,
            runs,
            outs,
            ends_at_bat: true,
        }
    }

    /// A play between pitches; the count carries over.
    #[must_use]
    pub const fn between_pitches(bases: Bases, runs: u32, outs: u8) -> Self {
        Self {
            bases,
            runs,
            outs,
            ends_at_bat: false,
        }
    }
}

/// The half-inning that became current after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfInning {
    /// Inning number.
    pub inning: u32,
    /// Half.
    pub half: Half,
}

// =============================================================================
// GameState
// =============================================================================

/// The live situation of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    inning: u32,
    half: Half,
    count: Count,
    outs: u8,
    bases: Bases,
    score: SidePair<u32>,
    handicap: SidePair<u32>,
    finished: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A game at the top of the first, nobody out.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inning: 1,
            half: Half::Top,
            count: Count::ZERO,
            outs: 0,
            bases: Bases::EMPTY,
            score: SidePair::default(),
            handicap: SidePair::default(),
            finished: false,
        }
    }

    /// A new game with pre-agreed handicap runs.
    #[must_use]
    pub fn with_handicap(handicap: SidePair<u32>) -> Self {
        Self {
            handicap,
            ..Self::new()
        }
    }

    /// Current inning (1-based).
    #[must_use]
    pub const fn inning(&self) -> u32 {
        self.inning
    }

    /// Current half.
    #[must_use]
    pub const fn half(&self) -> Half {
        self.half
    }

    /// Current count.
    #[must_use]
    pub const fn count(&self) -> Count {
        self.count
    }

    /// Outs in the current half-inning.
    #[must_use]
    pub const fn outs(&self) -> u8 {
        self.outs
    }

    /// Current baserunners.
    #[must_use]
    pub const fn bases(&self) -> &Bases {
        &self.bases
    }

    /// Runs scored in play.
    #[must_use]
    pub const fn score(&self) -> SidePair<u32> {
        self.score
    }

    /// Handicap runs.
    #[must_use]
    pub const fn handicap(&self) -> SidePair<u32> {
        self.handicap
    }

    /// Runs in play plus handicap.
    #[must_use]
    pub const fn final_score(&self) -> SidePair<u32> {
        SidePair::new(
            self.score.away + self.handicap.away,
            self.score.home + self.handicap.home,
        )
    }

    /// Returns true once the game has been finished.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// The side currently at bat.
    #[must_use]
    pub const fn batting_side(&self) -> Side {
        Side::batting_in(self.half)
    }

    /// Replaces the count after a non-terminal pitch.
    ///
    /// # Errors
    ///
    /// Fails if the game is finished.
    pub fn set_count(&mut self, count: Count) -> Result<(), InvariantViolation> {
        self.ensure_in_progress()?;
        self.count = count;
        Ok(())
    }

    /// Applies the committed effect of a play.
    ///
    /// Runs go to the side at bat. If the play brings outs to three the
    /// half-inning ends: bases and count clear, the half flips, and the inning
    /// advances on bottom to top. The new half-inning is returned in that case.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if the game is finished or the play
    /// would record more than three outs in the half.
    pub fn apply_resolved_play(
        &mut self,
        play: &ResolvedPlay,
    ) -> Result<Option<HalfInning>, InvariantViolation> {
        self.ensure_in_progress()?;
        let outs = self.outs + play.outs;
        if outs > OUTS_PER_HALF {
            return Err(InvariantViolation::OutsOutOfRange(outs));
        }

        *self.score.get_mut(self.batting_side()) += play.runs;
        self.bases = play.bases;
        self.outs = outs;
        if play.ends_at_bat {
            self.count = Count::ZERO;
        }

        if self.outs == OUTS_PER_HALF {
            return Ok(Some(self.change_half()));
        }
        Ok(None)
    }

    /// Ends the current half-inning regardless of outs (called inning or
    /// mercy rule).
    ///
    /// # Errors
    ///
    /// Fails if the game is finished.
    pub fn force_half_change(&mut self) -> Result<HalfInning, InvariantViolation> {
        self.ensure_in_progress()?;
        Ok(self.change_half())
    }

    /// Places runners at the start of a half-inning (tie-break rule).
    ///
    /// # Errors
    ///
    /// Fails if the game is finished.
    pub fn place_runners(&mut self, bases: Bases) -> Result<(), InvariantViolation> {
        self.ensure_in_progress()?;
        self.bases = bases;
        Ok(())
    }

    /// Marks the game finished; later plays are rejected.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    fn change_half(&mut self) -> HalfInning {
        self.bases = Bases::EMPTY;
        self.count = Count::ZERO;
        self.outs = 0;
        if self.half == Half::Bottom {
            self.inning += 1;
        }
        self.half = self.half.flip();
        info!(inning = self.inning, half = %self.half, "half-inning started");
        HalfInning {
            inning: self.inning,
            half: self.half,
        }
    }

    fn ensure_in_progress(&self) -> Result<(), InvariantViolation> {
        if self.finished {
            return Err(InvariantViolation::GameFinished);
        }
        Ok(())
    }
}
