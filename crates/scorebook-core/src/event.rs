//! Play events: the typed payloads of the play log.
//!
//! Every change to a game is written down as a [`PlayEvent`] before anything
//! else happens. The log is the system of record; box scores, line scores
//! and pitcher lines are all folds over it (see [`crate::derive`]).
//!
//! # Event hierarchy
//!
//! [`EventKind`] is a tagged union with one strongly-typed payload per kind:
//! - `GameStart`: starting lineups, pitchers and handicaps
//! - `Pitch`: one pitch signal
//! - `AtBatResult`: the terminal outcome of a plate appearance
//! - `RunnerEvent`: a runner moving or being put out between pitches
//! - `Substitution`: lineup and pitcher changes
//! - `InningStart`: a new half-inning, with any tie-break runners
//! - `GameEnd`: final score
//!
//! Outcomes are enumerated once at resolution time ([`Outcome`]) and never
//! re-parsed from display text.
//!
//! # Example
//!
//! ```
//! use scorebook_core::event::{BattedBall, Contact, Outcome, OutcomeFlags};
//! use scorebook_core::player::Fielder;
//!
//! let outcome = Outcome::InPlay(BattedBall::new(Fielder::LeftField, Contact::Double));
//!
//! assert_eq!(outcome.to_string(), "left field double");
//! assert_eq!(outcome.hit_bases(), 2);
//! assert!(outcome.flags().contains(OutcomeFlags::HIT | OutcomeFlags::OFFICIAL_AT_BAT));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lineup::{Lineup, Side, SidePair};
use crate::player::{Fielder, PitcherInfo, PlayerId, Position};
use crate::state::{Base, Bases, Count, GameState, Half};

// =============================================================================
// Pitches
// =============================================================================

/// A single pitch signal from the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pitch {
    /// Ball.
    Ball,
    /// Called strike.
    CalledStrike,
    /// Swinging strike.
    SwingingStrike,
    /// Foul ball.
    Foul,
    /// Ball put in play.
    InPlay(BattedBall),
    /// Batter hit by the pitch.
    HitByPitch,
    /// Intentional walk awarded without a pitch.
    IntentionalWalk,
}

impl Pitch {
    /// Score-sheet mark used in the pitch-sequence annotation.
    #[must_use]
    pub const fn mark(self) -> &'static str {
        match self {
            Self::Ball => "●",
            Self::CalledStrike => "○",
            Self::SwingingStrike => "◎",
            Self::Foul => "ー",
            Self::InPlay(_) | Self::HitByPitch | Self::IntentionalWalk => "",
        }
    }

    /// Returns false for signals that are not thrown pitches.
    #[must_use]
    pub const fn is_thrown(self) -> bool {
        !matches!(self, Self::IntentionalWalk)
    }
}

/// Concatenated marks for a pitch sequence, e.g. `"●○ー"`.
#[must_use]
pub fn pitch_annotation(pitches: &[Pitch]) -> String {
    pitches.iter().map(|p| p.mark()).collect()
}

/// How a strike was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeKind {
    /// Taken.
    Called,
    /// Swung at and missed.
    Swinging,
}

// =============================================================================
// Batted balls and outcomes
// =============================================================================

/// What kind of play a batted ball produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Contact {
    /// One-base hit.
    Single,
    /// Two-base hit.
    Double,
    /// Three-base hit.
    Triple,
    /// Home run.
    HomeRun,
    /// Ground-ball out.
    Grounder,
    /// Fly-ball out.
    Fly,
    /// Foul fly out.
    FoulFly,
    /// Line-drive out.
    Liner,
    /// Ground-ball double play.
    DoublePlay,
    /// Sacrifice bunt.
    SacrificeBunt,
    /// Sacrifice fly.
    SacrificeFly,
    /// Batter reached on a fielding error.
    Error,
    /// Batter reached on a fielder's choice.
    FieldersChoice,
}

impl Contact {
    /// Bases awarded to the batter by a hit; 0 for non-hits.
    #[must_use]
    pub const fn hit_bases(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::HomeRun => 4,
            _ => 0,
        }
    }

    /// Returns true if the batter is presumed out.
    #[must_use]
    pub const fn is_out(self) -> bool {
        matches!(
            self,
            Self::Grounder
                | Self::Fly
                | Self::FoulFly
                | Self::Liner
                | Self::DoublePlay
                | Self::SacrificeBunt
                | Self::SacrificeFly
        )
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::HomeRun => "home run",
            Self::Grounder => "grounder",
            Self::Fly => "fly out",
            Self::FoulFly => "foul fly",
            Self::Liner => "line drive",
            Self::DoublePlay => "double play",
            Self::SacrificeBunt => "sacrifice bunt",
            Self::SacrificeFly => "sacrifice fly",
            Self::Error => "error",
            Self::FieldersChoice => "fielder's choice",
        };
        f.write_str(text)
    }
}

/// Direction and type of a ball put in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattedBall {
    /// Fielder the ball was hit toward.
    pub direction: Fielder,
    /// Resulting play.
    pub contact: Contact,
}

impl BattedBall {
    /// Creates a batted-ball descriptor.
    #[must_use]
    pub const fn new(direction: Fielder, contact: Contact) -> Self {
        Self { direction, contact }
    }
}

impl fmt::Display for BattedBall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.direction, self.contact)
    }
}

bitflags::bitflags! {
    /// Statistical categories an outcome counts toward.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct OutcomeFlags: u16 {
        /// Base hit.
        const HIT = 1;
        /// Home run.
        const HOME_RUN = 1 << 1;
        /// Batter presumed out.
        const OUT = 1 << 2;
        /// Base on balls, including intentional.
        const WALK = 1 << 3;
        /// Hit by pitch.
        const HIT_BY_PITCH = 1 << 4;
        /// Strikeout, including a batter who reached on one.
        const STRIKEOUT = 1 << 5;
        /// Sacrifice bunt or fly.
        const SACRIFICE = 1 << 6;
        /// Reached on error.
        const ERROR = 1 << 7;
        /// Fielder's choice.
        const FIELDERS_CHOICE = 1 << 8;
        /// Counts as an official at-bat.
        const OFFICIAL_AT_BAT = 1 << 9;
    }
}

/// Terminal outcome of a plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Four balls.
    Walk,
    /// Hit by pitch.
    HitByPitch,
    /// Intentional walk.
    IntentionalWalk,
    /// Third strike, batter out.
    Strikeout(StrikeKind),
    /// Third strike not held; batter reached first.
    ReachedOnStrikeout(StrikeKind),
    /// Ball put in play.
    InPlay(BattedBall),
    /// Batter skipped (absent or injured); no out recorded.
    Skipped,
}

impl Outcome {
    /// Bases awarded to the batter by a hit; 0 otherwise.
    #[must_use]
    pub const fn hit_bases(self) -> u8 {
        match self {
            Self::InPlay(ball) => ball.contact.hit_bases(),
            _ => 0,
        }
    }

    /// Returns true if the batter is presumed out before confirmation.
    #[must_use]
    pub const fn is_out(self) -> bool {
        match self {
            Self::Strikeout(_) => true,
            Self::InPlay(ball) => ball.contact.is_out(),
            _ => false,
        }
    }

    /// Walks, hit batters and intentional walks: the batter is awarded first
    /// and only forced runners move.
    #[must_use]
    pub const fn is_dead_ball(self) -> bool {
        matches!(self, Self::Walk | Self::HitByPitch | Self::IntentionalWalk)
    }

    /// Returns true if the at-bat ended on a third strike.
    #[must_use]
    pub const fn is_strikeout(self) -> bool {
        matches!(self, Self::Strikeout(_) | Self::ReachedOnStrikeout(_))
    }

    /// Batted-ball descriptor for balls in play.
    #[must_use]
    pub const fn batted_ball(self) -> Option<BattedBall> {
        match self {
            Self::InPlay(ball) => Some(ball),
            _ => None,
        }
    }

    /// Statistical categories for this outcome.
    #[must_use]
    pub fn flags(self) -> OutcomeFlags {
        match self {
            Self::Walk | Self::IntentionalWalk => OutcomeFlags::WALK,
            Self::HitByPitch => OutcomeFlags::HIT_BY_PITCH,
            Self::Strikeout(_) => {
                OutcomeFlags::STRIKEOUT | OutcomeFlags::OUT | OutcomeFlags::OFFICIAL_AT_BAT
            }
            Self::ReachedOnStrikeout(_) => {
                OutcomeFlags::STRIKEOUT | OutcomeFlags::OFFICIAL_AT_BAT
            }
            Self::Skipped => OutcomeFlags::empty(),
            Self::InPlay(ball) => match ball.contact {
                Contact::HomeRun => {
                    OutcomeFlags::HIT | OutcomeFlags::HOME_RUN | OutcomeFlags::OFFICIAL_AT_BAT
                }
                Contact::Single | Contact::Double | Contact::Triple => {
                    OutcomeFlags::HIT | OutcomeFlags::OFFICIAL_AT_BAT
                }
                Contact::SacrificeBunt | Contact::SacrificeFly => {
                    OutcomeFlags::SACRIFICE | OutcomeFlags::OUT
                }
                Contact::Error => OutcomeFlags::ERROR | OutcomeFlags::OFFICIAL_AT_BAT,
                Contact::FieldersChoice => {
                    OutcomeFlags::FIELDERS_CHOICE | OutcomeFlags::OFFICIAL_AT_BAT
                }
                Contact::Grounder
                | Contact::Fly
                | Contact::FoulFly
                | Contact::Liner
                | Contact::DoublePlay => OutcomeFlags::OUT | OutcomeFlags::OFFICIAL_AT_BAT,
            },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walk => f.write_str("walk"),
            Self::HitByPitch => f.write_str("hit by pitch"),
            Self::IntentionalWalk => f.write_str("intentional walk"),
            Self::Strikeout(StrikeKind::Called) => f.write_str("strikeout looking"),
            Self::Strikeout(StrikeKind::Swinging) => f.write_str("strikeout swinging"),
            Self::ReachedOnStrikeout(_) => f.write_str("reached on strikeout"),
            Self::InPlay(ball) => write!(f, "{ball}"),
            Self::Skipped => f.write_str("skipped"),
        }
    }
}

// =============================================================================
// Payload records
// =============================================================================

/// Where a runner (or the batter) ended up after a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    /// Safe on a base.
    Base(Base),
    /// Scored.
    Home,
    /// Put out.
    Out,
    /// Left the bases without an out (e.g. replaced by a courtesy runner).
    Removed,
}

/// The game situation immediately before an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Situation {
    /// Ball-strike count.
    pub count: Count,
    /// Outs.
    pub outs: u8,
    /// Baserunners.
    pub bases: Bases,
    /// Runs in play.
    pub score: SidePair<u32>,
}

impl Situation {
    /// Captures the situation from the state store.
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        Self {
            count: state.count(),
            outs: state.outs(),
            bases: *state.bases(),
            score: state.score(),
        }
    }
}

/// The terminal result of one plate appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtBatRecord {
    /// The batter.
    pub batter: PlayerId,
    /// Batting slot (zero-based).
    pub slot: usize,
    /// Index of this at-bat among the slot's plate appearances.
    pub slot_at_bat: u32,
    /// Times this slot has come up in the current half-inning (1-based);
    /// greater than 1 when the order bats around.
    pub cycle: u32,
    /// Outcome, enumerated at resolution time.
    pub outcome: Outcome,
    /// Two or more outs were confirmed on the play.
    pub double_play: bool,
    /// Full pitch sequence of the at-bat.
    pub pitches: Vec<Pitch>,
    /// Players who scored on the play, in the order confirmed.
    pub scorers: Vec<PlayerId>,
    /// Runs batted in.
    pub rbi: u32,
    /// Outs recorded on the play.
    pub outs_recorded: u8,
    /// Fielder charged with the error, for reached-on-error plays.
    pub error_by: Option<PlayerId>,
    /// Pitcher of record.
    pub pitcher: PlayerId,
    /// Operator-corrected display label.
    pub label_override: Option<String>,
}

impl AtBatRecord {
    /// Display label: the correction if present, otherwise the outcome with
    /// a `(DP)` suffix on double plays not already labelled as such.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(label) = &self.label_override {
            return label.clone();
        }
        let already_dp =
            matches!(self.outcome, Outcome::InPlay(ball) if ball.contact == Contact::DoublePlay);
        if self.double_play && !already_dp {
            format!("{} (DP)", self.outcome)
        } else {
            self.outcome.to_string()
        }
    }
}

/// A runner play between pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunnerAction {
    /// Advanced on a wild pitch.
    WildPitch,
    /// Advanced on a passed ball.
    PassedBall,
    /// Advanced on a balk.
    Balk,
    /// Advanced for another reason.
    Advance,
    /// Stolen base.
    StolenBase,
    /// Caught stealing.
    CaughtStealing,
    /// Picked off.
    PickedOff,
    /// Put out on the bases for another reason.
    RunnerOut,
}

impl RunnerAction {
    /// Returns true if the runner is put out.
    #[must_use]
    pub const fn is_out(self) -> bool {
        matches!(self, Self::CaughtStealing | Self::PickedOff | Self::RunnerOut)
    }
}

impl fmt::Display for RunnerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::WildPitch => "wild pitch",
            Self::PassedBall => "passed ball",
            Self::Balk => "balk",
            Self::Advance => "advance",
            Self::StolenBase => "stolen base",
            Self::CaughtStealing => "caught stealing",
            Self::PickedOff => "picked off",
            Self::RunnerOut => "runner out",
        };
        f.write_str(text)
    }
}

/// Payload of a runner event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerRecord {
    /// The runner.
    pub runner: PlayerId,
    /// Base the runner started from.
    pub from: Base,
    /// What happened.
    pub action: RunnerAction,
    /// Where the runner ended up.
    pub destination: Destination,
    /// Pitcher of record.
    pub pitcher: PlayerId,
}

/// A lineup or pitcher change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstitutionKind {
    /// A new player bats in the slot from its next at-bat.
    PinchHitter {
        /// Batting slot.
        slot: usize,
        /// Incoming player.
        player: PlayerId,
        /// First at-bat index of the new segment.
        effective_from: u32,
    },
    /// A new player takes over a slot and a fielding position.
    Defensive {
        /// Batting slot.
        slot: usize,
        /// Incoming player.
        player: PlayerId,
        /// Position taken.
        position: Position,
        /// First at-bat index of the new segment.
        effective_from: u32,
    },
    /// The current occupant of a slot moves to another position.
    PositionChange {
        /// Batting slot.
        slot: usize,
        /// New position.
        position: Position,
    },
    /// A new player replaces a runner and takes over the runner's slot.
    PinchRunner {
        /// Batting slot of the replaced runner.
        slot: usize,
        /// Base the runner stands on.
        base: Base,
        /// Incoming player.
        player: PlayerId,
        /// First at-bat index of the new segment.
        effective_from: u32,
    },
    /// A temporary runner stands in for the occupant; the lineup is unchanged.
    CourtesyRunner {
        /// Base the runner stands on.
        base: Base,
        /// Runner being replaced.
        replaced: PlayerId,
        /// Temporary runner.
        player: PlayerId,
    },
    /// A new pitcher of record.
    PitcherChange {
        /// Outgoing pitcher.
        replaced: PlayerId,
        /// Incoming pitcher.
        pitcher: PitcherInfo,
    },
}

/// Payload of a substitution event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRecord {
    /// Team making the change.
    pub side: Side,
    /// The change.
    pub kind: SubstitutionKind,
}

/// Why a half-inning started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InningStartReason {
    /// First half-inning of the game.
    FirstPitch,
    /// The previous half ended with three outs.
    ThreeOuts,
    /// The previous half was called (mercy rule or time).
    Called,
}

/// Typed payload of a play event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Starting lineups and pitchers.
    GameStart {
        /// Starting batting orders.
        lineups: SidePair<Lineup>,
        /// Starting pitchers.
        pitchers: SidePair<PitcherInfo>,
        /// Handicap runs.
        handicap: SidePair<u32>,
    },
    /// One pitch.
    Pitch {
        /// Batter at the plate.
        batter: PlayerId,
        /// Pitcher of record.
        pitcher: PlayerId,
        /// Signal.
        pitch: Pitch,
    },
    /// Terminal at-bat result.
    AtBatResult(AtBatRecord),
    /// Runner play between pitches.
    RunnerEvent(RunnerRecord),
    /// Lineup or pitcher change.
    Substitution(SubstitutionRecord),
    /// A new half-inning.
    InningStart {
        /// Why the half started.
        reason: InningStartReason,
        /// Runners placed by the tie-break rule.
        placed: Bases,
    },
    /// The game ended.
    GameEnd {
        /// Runs plus handicap.
        final_score: SidePair<u32>,
    },
}

/// One immutable entry in the play log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEvent {
    /// Monotonic sequence number, starting at 1.
    pub seq: u64,
    /// Inning when recorded.
    pub inning: u32,
    /// Half when recorded.
    pub half: Half,
    /// Batting slot of the batter at the plate, if any.
    pub batter_slot: Option<usize>,
    /// Situation immediately before the event.
    pub before: Situation,
    /// Payload.
    pub kind: EventKind,
}

impl PlayEvent {
    /// The side at bat when the event was recorded.
    #[must_use]
    pub const fn batting_side(&self) -> Side {
        Side::batting_in(self.half)
    }

    /// The at-bat payload, if this is an at-bat result.
    #[must_use]
    pub const fn at_bat(&self) -> Option<&AtBatRecord> {
        match &self.kind {
            EventKind::AtBatResult(record) => Some(record),
            _ => None,
        }
    }
}
