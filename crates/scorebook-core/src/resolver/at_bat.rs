//! Pitch-by-pitch resolution of a single at-bat.
//!
//! The resolver has two phases. While `AwaitingPitch`, every signal updates
//! the count or ends the at-bat. Once `Terminal`, further pitches are
//! rejected until the session confirms the play and starts the next batter.
//!
//! A third strike does not register an out here. It produces a terminal
//! `Strikeout` outcome that still goes through runner adjudication, because
//! the batter may reach first on an uncaught third strike.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InvariantViolation;
use crate::event::{Outcome, Pitch, StrikeKind};
use crate::state::{Count, MAX_BALLS, MAX_STRIKES};

/// Where the current at-bat stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtBatPhase {
    /// Waiting for the next pitch.
    #[default]
    AwaitingPitch,
    /// A pitch ended the at-bat; runner confirmation is pending.
    Terminal(Outcome),
}

/// Effect of one pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchEffect {
    /// The at-bat continues with this count.
    Count(Count),
    /// The at-bat ended.
    Terminal(Outcome),
}

/// Tracks the pitch sequence and phase of the at-bat in progress.
///
/// # Example
///
/// ```
/// use scorebook_core::event::{Outcome, Pitch};
/// use scorebook_core::resolver::{AtBatResolver, PitchEffect};
/// use scorebook_core::state::Count;
///
/// let mut at_bat = AtBatResolver::new();
/// let mut count = Count::ZERO;
/// for _ in 0..3 {
///     match at_bat.apply(count, Pitch::Ball).unwrap() {
///         PitchEffect::Count(next) => count = next,
///         PitchEffect::Terminal(_) => unreachable!(),
///     }
/// }
/// assert_eq!(
///     at_bat.apply(count, Pitch::Ball).unwrap(),
///     PitchEffect::Terminal(Outcome::Walk)
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtBatResolver {
    phase: AtBatPhase,
    pitches: Vec<Pitch>,
}

impl AtBatResolver {
    /// A fresh at-bat.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> AtBatPhase {
        self.phase
    }

    /// Pitches so far, in order.
    #[must_use]
    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    /// Applies one pitch signal against the current count.
    ///
    /// # Errors
    ///
    /// Fails with [`InvariantViolation::AtBatEnded`] once the at-bat is
    /// terminal, or if `count` is itself out of range.
    pub fn apply(&mut self, count: Count, pitch: Pitch) -> Result<PitchEffect, InvariantViolation> {
        if let AtBatPhase::Terminal(_) = self.phase {
            return Err(InvariantViolation::AtBatEnded);
        }
        let (balls, strikes) = (count.balls(), count.strikes());
        let effect = match pitch {
            Pitch::Ball if balls == MAX_BALLS => PitchEffect::Terminal(Outcome::Walk),
            Pitch::Ball => PitchEffect::Count(Count::new(balls + 1, strikes)?),
            Pitch::CalledStrike | Pitch::SwingingStrike if strikes == MAX_STRIKES => {
                let kind = if pitch == Pitch::CalledStrike {
                    StrikeKind::Called
                } else {
                    StrikeKind::Swinging
                };
                PitchEffect::Terminal(Outcome::Strikeout(kind))
            }
            Pitch::CalledStrike | Pitch::SwingingStrike => {
                PitchEffect::Count(Count::new(balls, strikes + 1)?)
            }
            Pitch::Foul if strikes < MAX_STRIKES => {
                PitchEffect::Count(Count::new(balls, strikes + 1)?)
            }
            Pitch::Foul => PitchEffect::Count(count),
            Pitch::InPlay(ball) => PitchEffect::Terminal(Outcome::InPlay(ball)),
            Pitch::HitByPitch => PitchEffect::Terminal(Outcome::HitByPitch),
            Pitch::IntentionalWalk => PitchEffect::Terminal(Outcome::IntentionalWalk),
        };

        self.pitches.push(pitch);
        if let PitchEffect::Terminal(outcome) = effect {
            self.phase = AtBatPhase::Terminal(outcome);
        }
        debug!(?pitch, ?effect, "pitch applied");
        Ok(effect)
    }

    /// Ends the at-bat with an outcome no pitch produced (skipped batter).
    pub fn end_without_pitch(&mut self, outcome: Outcome) {
        self.phase = AtBatPhase::Terminal(outcome);
    }

    /// Clears the resolver for the next batter, returning the finished
    /// pitch sequence.
    pub fn reset(&mut self) -> Vec<Pitch> {
        self.phase = AtBatPhase::AwaitingPitch;
        std::mem::take(&mut self.pitches)
    }
}
