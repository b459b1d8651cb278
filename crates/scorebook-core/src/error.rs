//! Error types for the scoring engine.
//!
//! Engine actions fail with [`ScoreError`], which splits into operator input
//! problems ([`ValidationError`]) and attempts to break a state invariant
//! ([`InvariantViolation`]). Either way the action is aborted and the game is
//! left exactly as it was before the call.
//!
//! Persistence problems are deliberately not part of [`ScoreError`]: a failed
//! save never aborts scoring. See [`crate::persistence::PersistenceError`].

use thiserror::Error;

use crate::state::Base;

/// Operator input that cannot be applied as given.
///
/// The operator is expected to correct the input and try again; nothing was
/// recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two movers were confirmed onto the same base.
    #[error("two runners confirmed onto {0}")]
    BaseCollision(Base),

    /// A runner was moved onto a base that is still occupied.
    #[error("{0} is already occupied")]
    BaseOccupied(Base),

    /// No runner stands on the named base.
    #[error("no runner on {0}")]
    NoRunnerOnBase(Base),

    /// The confirmation would record more outs than remain in the half-inning.
    #[error("{outs_before} outs plus {recorded} confirmed outs exceeds three")]
    TooManyOuts {
        /// Outs before the play.
        outs_before: u8,
        /// Outs confirmed by the play.
        recorded: u8,
    },

    /// A lineup has no batting slots.
    #[error("lineup for {0} has no batting slots")]
    EmptyLineup(&'static str),

    /// The batting slot does not exist.
    #[error("batting slot {slot} out of range (lineup has {len} slots)")]
    SlotOutOfRange {
        /// Requested slot (zero-based).
        slot: usize,
        /// Number of slots in the lineup.
        len: usize,
    },

    /// The runner on base is not the active player of any batting slot.
    #[error("runner on {0} is not in the batting order")]
    RunnerNotInLineup(Base),

    /// No event carries this sequence number.
    #[error("no play event with sequence number {0}")]
    UnknownEvent(u64),

    /// Only at-bat results may be corrected.
    #[error("event {0} is not an at-bat result and cannot be corrected")]
    NotCorrectable(u64),

    /// The fielding side has no pitcher of record.
    #[error("no pitcher of record for the fielding side")]
    NoPitcher,
}

/// An action would put the game into an impossible state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The ball count left its legal range.
    #[error("ball count {0} out of range 0..=3")]
    BallsOutOfRange(u8),

    /// The strike count left its legal range.
    #[error("strike count {0} out of range 0..=2")]
    StrikesOutOfRange(u8),

    /// The out count left its legal range.
    #[error("out count {0} out of range 0..=2")]
    OutsOutOfRange(u8),

    /// The game has already been finished.
    #[error("game is finished")]
    GameFinished,

    /// A play is awaiting runner confirmation; pitches and other plays wait.
    #[error("a play is awaiting runner confirmation")]
    AwaitingConfirmation,

    /// The current at-bat already reached its terminal outcome.
    #[error("the current at-bat has already ended")]
    AtBatEnded,
}

/// Error returned by engine actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// Operator input rejected; re-prompt.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Action aborted to protect a state invariant.
    #[error("state invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Result alias for engine actions.
pub type ScoreResult<T> = Result<T, ScoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_converts_into_score_error() {
        let err: ScoreError = ValidationError::BaseCollision(Base::Second).into();
        assert!(matches!(
            err,
            ScoreError::Validation(ValidationError::BaseCollision(Base::Second))
        ));
        assert_eq!(
            err.to_string(),
            "validation failed: two runners confirmed onto second base"
        );
    }

    #[test]
    fn invariant_messages_name_the_value() {
        let err: ScoreError = InvariantViolation::BallsOutOfRange(4).into();
        assert_eq!(
            err.to_string(),
            "state invariant violated: ball count 4 out of range 0..=3"
        );
    }
}
