//! Play-by-play lines.

use serde::{Deserialize, Serialize};

use crate::event::{pitch_annotation, EventKind, PlayEvent};
use crate::lineup::{Side, SidePair};
use crate::player::PlayerId;
use crate::state::Half;

/// One at-bat or runner play, with the situation it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayLine {
    /// Event sequence number.
    pub seq: u64,
    /// Inning.
    pub inning: u32,
    /// Half.
    pub half: Half,
    /// Batter, or the runner for runner plays.
    pub actor: PlayerId,
    /// Outcome label or runner action.
    pub description: String,
    /// Pitch-sequence marks; empty for runner plays.
    pub pitches: String,
    /// Runs batted in.
    pub rbi: u32,
    /// Outs before the play.
    pub outs_before: u8,
    /// Runs in play before the play.
    pub score_before: SidePair<u32>,
}

impl ReplayLine {
    /// The side at bat.
    #[must_use]
    pub const fn side(&self) -> Side {
        Side::batting_in(self.half)
    }
}

/// One line per at-bat result and runner event, in log order.
#[must_use]
pub fn replay(events: &[PlayEvent]) -> Vec<ReplayLine> {
    events
        .iter()
        .filter_map(|event| {
            let (actor, description, pitches, rbi) = match &event.kind {
                EventKind::AtBatResult(record) => (
                    record.batter,
                    record.label(),
                    pitch_annotation(&record.pitches),
                    record.rbi,
                ),
                EventKind::RunnerEvent(record) => (
                    record.runner,
                    format!("{} from {}", record.action, record.from),
                    String::new(),
                    0,
                ),
                _ => return None,
            };
            Some(ReplayLine {
                seq: event.seq,
                inning: event.inning,
                half: event.half,
                actor,
                description,
                pitches,
                rbi,
                outs_before: event.before.outs,
                score_before: event.before.score,
            })
        })
        .collect()
}
