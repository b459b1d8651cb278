//! Runner-advancement adjudication.
//!
//! For every terminal outcome the adjudicator proposes a destination for
//! each runner and for the batter:
//!
//! - Walks, hit batters and intentional walks put the batter on first. A
//!   runner moves only when forced, i.e. every base behind it down to first
//!   is occupied.
//! - Reaching on an error or fielder's choice also puts the batter on first
//!   and forces runners the same way.
//! - A hit of N bases sends the batter to base N (home on a home run) and
//!   moves every runner exactly N bases.
//! - On an out the runners hold. Advancing on an out is a scoring judgment
//!   the operator makes with an override.
//!
//! The operator confirms the proposal with [`Overrides`]; [`RunnerAdjudicator::adjudicate`]
//! then validates the final runner map and computes runs, outs and RBI.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::event::{Destination, Outcome, RunnerAction};
use crate::player::PlayerId;
use crate::state::{Base, Bases, OUTS_PER_HALF};

/// Who is moving on a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mover {
    /// The batter.
    Batter,
    /// The runner who started the play on this base.
    Runner(Base),
}

/// One mover's destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Who.
    pub mover: Mover,
    /// The player.
    pub player: PlayerId,
    /// Where they end up.
    pub destination: Destination,
}

/// Predicted runner movement awaiting operator confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Outcome being adjudicated.
    pub outcome: Outcome,
    /// Movements: runners from third down to first, then the batter.
    pub movements: Vec<Movement>,
}

impl Proposal {
    /// Predicted destination for a mover.
    #[must_use]
    pub fn destination_of(&self, mover: Mover) -> Option<Destination> {
        self.movements
            .iter()
            .find(|m| m.mover == mover)
            .map(|m| m.destination)
    }
}

/// Operator corrections to a proposal.
///
/// # Example
///
/// ```
/// use scorebook_core::event::Destination;
/// use scorebook_core::resolver::{Mover, Overrides};
/// use scorebook_core::state::Base;
///
/// let overrides = Overrides::new()
///     .set(Mover::Runner(Base::Third), Destination::Home)
///     .set(Mover::Batter, Destination::Out)
///     .rbi(1);
/// assert_eq!(overrides.destination(Mover::Batter), Some(Destination::Out));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    destinations: Vec<(Mover, Destination)>,
    rbi: Option<u32>,
}

impl Overrides {
    /// Accept the proposal as predicted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides one mover's destination.
    #[must_use]
    pub fn set(mut self, mover: Mover, destination: Destination) -> Self {
        self.destinations.retain(|(m, _)| *m != mover);
        self.destinations.push((mover, destination));
        self
    }

    /// Overrides the RBI credited to the batter.
    #[must_use]
    pub fn rbi(mut self, rbi: u32) -> Self {
        self.rbi = Some(rbi);
        self
    }

    /// The overridden destination for a mover.
    #[must_use]
    pub fn destination(&self, mover: Mover) -> Option<Destination> {
        self.destinations
            .iter()
            .find(|(m, _)| *m == mover)
            .map(|(_, d)| *d)
    }
}

/// The validated result of a confirmed play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjudication {
    /// Final outcome; a strikeout becomes reached-on-strikeout when the
    /// batter was confirmed safe.
    pub outcome: Outcome,
    /// Confirmed movements.
    pub movements: Vec<Movement>,
    /// Base occupancy after the play.
    pub bases: Bases,
    /// Players who scored, in confirmation order.
    pub scorers: Vec<PlayerId>,
    /// Outs recorded.
    pub outs: u8,
    /// Runs batted in.
    pub rbi: u32,
    /// Two or more outs on the play.
    pub double_play: bool,
}

/// Proposes and validates runner movement.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerAdjudicator;

impl RunnerAdjudicator {
    /// Creates an adjudicator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Proposes destinations for `outcome`.
    #[must_use]
    pub fn predict(&self, outcome: Outcome, batter: PlayerId, bases: &Bases) -> Proposal {
        let hit_bases = outcome.hit_bases();
        let is_out = outcome.is_out();
        let batter_to_first = !is_out && hit_bases == 0;
        let movements = self.predict_movements(batter, bases, hit_bases, is_out, batter_to_first);
        debug!(%outcome, ?movements, "runner movement predicted");
        Proposal { outcome, movements }
    }

    /// Proposes destinations from the raw play shape.
    ///
    /// `forces` puts the batter on first and moves forced runners one base;
    /// it is ignored when `hit_bases` is non-zero.
    #[must_use]
    pub fn predict_movements(
        &self,
        batter: PlayerId,
        bases: &Bases,
        hit_bases: u8,
        is_out: bool,
        forces: bool,
    ) -> Vec<Movement> {
        let mut movements = Vec::with_capacity(4);
        for base in Base::ALL.into_iter().rev() {
            let Some(player) = bases.get(base) else {
                continue;
            };
            let destination = if hit_bases > 0 {
                advance_by(base, hit_bases)
            } else if forces && is_forced(bases, base) {
                base.next().map_or(Destination::Home, Destination::Base)
            } else {
                Destination::Base(base)
            };
            movements.push(Movement {
                mover: Mover::Runner(base),
                player,
                destination,
            });
        }

        let batter_destination = if is_out {
            Destination::Out
        } else if hit_bases >= 4 {
            Destination::Home
        } else if hit_bases > 0 {
            Base::from_number(hit_bases).map_or(Destination::Home, Destination::Base)
        } else {
            Destination::Base(Base::First)
        };
        movements.push(Movement {
            mover: Mover::Batter,
            player: batter,
            destination: batter_destination,
        });
        movements
    }

    /// Applies overrides to a proposal and validates the result.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NoRunnerOnBase`] if an override names an empty base
    /// - [`ValidationError::BaseCollision`] if two movers end on one base
    /// - [`ValidationError::TooManyOuts`] if the half would exceed three outs
    pub fn adjudicate(
        &self,
        proposal: &Proposal,
        overrides: &Overrides,
        outs_before: u8,
    ) -> Result<Adjudication, ValidationError> {
        for (mover, _) in &overrides.destinations {
            if let Mover::Runner(base) = mover {
                if proposal.destination_of(*mover).is_none() {
                    return Err(ValidationError::NoRunnerOnBase(*base));
                }
            }
        }

        let movements: Vec<Movement> = proposal
            .movements
            .iter()
            .map(|m| Movement {
                destination: overrides.destination(m.mover).unwrap_or(m.destination),
                ..*m
            })
            .collect();

        let mut bases = Bases::EMPTY;
        let mut scorers = Vec::new();
        let mut outs = 0u8;
        for movement in &movements {
            match movement.destination {
                Destination::Base(base) => {
                    if bases.is_occupied(base) {
                        warn!(%base, "confirmation rejected: base collision");
                        return Err(ValidationError::BaseCollision(base));
                    }
                    bases.set(base, Some(movement.player));
                }
                Destination::Home => scorers.push(movement.player),
                Destination::Out => outs += 1,
                Destination::Removed => {}
            }
        }

        if outs_before + outs > OUTS_PER_HALF {
            warn!(outs_before, outs, "confirmation rejected: too many outs");
            return Err(ValidationError::TooManyOuts {
                outs_before,
                recorded: outs,
            });
        }

        let batter_safe = movements
            .iter()
            .any(|m| m.mover == Mover::Batter && m.destination != Destination::Out);
        let outcome = match proposal.outcome {
            Outcome::Strikeout(kind) if batter_safe => Outcome::ReachedOnStrikeout(kind),
            other => other,
        };

        let rbi = overrides
            .rbi
            .unwrap_or_else(|| u32::try_from(scorers.len()).unwrap_or(u32::MAX));

        Ok(Adjudication {
            outcome,
            movements,
            bases,
            scorers,
            outs,
            rbi,
            double_play: outs >= 2,
        })
    }
}

/// Moves the runner on `base` for a between-pitch runner play.
///
/// Advancing actions move the runner one base (scoring from third); out
/// actions remove the runner. Returns the new bases and the runner's
/// destination.
///
/// # Errors
///
/// Fails if `base` is empty or the next base is occupied.
pub fn advance_runner(
    bases: &Bases,
    base: Base,
    action: RunnerAction,
) -> Result<(Bases, Destination), ValidationError> {
    let runner = bases
        .get(base)
        .ok_or(ValidationError::NoRunnerOnBase(base))?;
    let mut after = *bases;
    after.set(base, None);

    let destination = if action.is_out() {
        Destination::Out
    } else {
        match base.next() {
            Some(next) if after.is_occupied(next) => {
                return Err(ValidationError::BaseOccupied(next));
            }
            Some(next) => {
                after.set(next, Some(runner));
                Destination::Base(next)
            }
            None => Destination::Home,
        }
    };
    Ok((after, destination))
}

fn advance_by(base: Base, hit_bases: u8) -> Destination {
    Base::from_number(base.number() + hit_bases).map_or(Destination::Home, Destination::Base)
}

/// A runner is forced when every base from first up to its own is occupied.
fn is_forced(bases: &Bases, base: Base) -> bool {
    Base::ALL
        .into_iter()
        .take_while(|b| *b <= base)
        .all(|b| bases.is_occupied(b))
}
