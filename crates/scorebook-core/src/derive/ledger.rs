//! Flattened rows for the central ledger.
//!
//! Each at-bat result and runner event becomes one self-contained row.
//! Rows are keyed by `(game_id, seq)`, so uploading the same game twice
//! replaces rows instead of duplicating them.

use serde::{Deserialize, Serialize};

use crate::event::{Contact, Destination, EventKind, Outcome, PlayEvent, RunnerAction};
use crate::lineup::SidePair;
use crate::player::{Fielder, PlayerId};
use crate::state::{Base, Count, Half};

/// What a ledger row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEntry {
    /// A plate appearance.
    AtBat(Outcome),
    /// A runner play.
    Runner(RunnerAction),
}

/// One flattened play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Game identifier supplied by the uploader.
    pub game_id: String,
    /// Event sequence number.
    pub seq: u64,
    /// Inning.
    pub inning: u32,
    /// Half.
    pub half: Half,
    /// Batting slot of the batter at the plate.
    pub batting_slot: Option<usize>,
    /// Batter, or the runner for runner plays.
    pub actor: PlayerId,
    /// Pitcher of record.
    pub pitcher: PlayerId,
    /// Outcome or runner action.
    pub entry: LedgerEntry,
    /// Display label.
    pub result: String,
    /// Batted-ball direction.
    pub direction: Option<Fielder>,
    /// Batted-ball type.
    pub contact: Option<Contact>,
    /// Count before the play.
    pub count_before: Count,
    /// Outs before the play.
    pub outs_before: u8,
    /// Occupants of first, second and third before the play.
    pub runners_before: [Option<PlayerId>; 3],
    /// Runs in play before the play.
    pub score_before: SidePair<u32>,
    /// Players who scored.
    pub scorers: Vec<PlayerId>,
    /// Runs batted in.
    pub rbi: u32,
    /// Fielder charged with an error.
    pub error_by: Option<PlayerId>,
    /// Pitches thrown in the at-bat.
    pub pitch_count: u32,
}

impl LedgerRow {
    /// Idempotency key.
    #[must_use]
    pub fn key(&self) -> (&str, u64) {
        (&self.game_id, self.seq)
    }
}

/// Flattens the log of game `game_id`.
#[must_use]
pub fn flatten_ledger(game_id: &str, events: &[PlayEvent]) -> Vec<LedgerRow> {
    events
        .iter()
        .filter_map(|event| match &event.kind {
            EventKind::AtBatResult(record) => {
                let ball = record.outcome.batted_ball();
                let thrown = record.pitches.iter().filter(|p| p.is_thrown()).count();
                Some(LedgerRow {
                    actor: record.batter,
                    pitcher: record.pitcher,
                    entry: LedgerEntry::AtBat(record.outcome),
                    result: record.label(),
                    direction: ball.map(|b| b.direction),
                    contact: ball.map(|b| b.contact),
                    scorers: record.scorers.clone(),
                    rbi: record.rbi,
                    error_by: record.error_by,
                    pitch_count: u32::try_from(thrown).unwrap_or(u32::MAX),
                    ..situation_row(game_id, event)
                })
            }
            EventKind::RunnerEvent(record) => Some(LedgerRow {
                actor: record.runner,
                pitcher: record.pitcher,
                entry: LedgerEntry::Runner(record.action),
                result: record.action.to_string(),
                scorers: if record.destination == Destination::Home {
                    vec![record.runner]
                } else {
                    Vec::new()
                },
                ..situation_row(game_id, event)
            }),
            _ => None,
        })
        .collect()
}

/// A row carrying only the event's position and before-situation.
fn situation_row(game_id: &str, event: &PlayEvent) -> LedgerRow {
    LedgerRow {
        game_id: game_id.to_owned(),
        seq: event.seq,
        inning: event.inning,
        half: event.half,
        batting_slot: event.batter_slot,
        actor: PlayerId::new(0),
        pitcher: PlayerId::new(0),
        entry: LedgerEntry::Runner(RunnerAction::Advance),
        result: String::new(),
        direction: None,
        contact: None,
        count_before: event.before.count,
        outs_before: event.before.outs,
        runners_before: Base::ALL.map(|base| event.before.bases.get(base)),
        score_before: event.before.score,
        scorers: Vec::new(),
        rbi: 0,
        error_by: None,
        pitch_count: 0,
    }
}
