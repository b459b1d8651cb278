//! The per-player batting grid.
//!
//! One row per lineup segment, so a substituted slot shows the starter's row
//! and the substitute's row one above the other. Columns are
//! `(inning, cycle)` pairs: cycle 2 appears only in innings where the order
//! batted around. A cell is [`BoxCell::Inactive`] when another segment of the
//! same slot held the at-bat index that column would have been.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::fold_lineups;
use crate::event::{
    pitch_annotation, AtBatRecord, Destination, EventKind, OutcomeFlags, PlayEvent, RunnerAction,
};
use crate::lineup::Side;
use crate::player::{PlayerId, Position};

/// A grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoxColumn {
    /// Inning.
    pub inning: u32,
    /// Time through the order within the inning (1-based).
    pub cycle: u32,
}

/// A recorded plate appearance in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellResult {
    /// Sequence number of the at-bat event.
    pub seq: u64,
    /// Display label.
    pub label: String,
    /// Runs batted in.
    pub rbi: u32,
    /// Pitch-sequence marks.
    pub annotation: String,
    /// Statistical categories.
    pub flags: OutcomeFlags,
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxCell {
    /// The row's player was not in the slot for this column.
    Inactive,
    /// The row's player was in the slot but did not bat.
    Empty,
    /// The row's player batted.
    Result(CellResult),
}

/// Batting and fielding aggregates for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingTotals {
    /// Plate appearances, skipped turns excluded.
    pub plate_appearances: u32,
    /// Official at-bats.
    pub at_bats: u32,
    /// Hits.
    pub hits: u32,
    /// Home runs.
    pub home_runs: u32,
    /// Runs batted in.
    pub rbi: u32,
    /// Runs scored.
    pub runs: u32,
    /// Stolen bases.
    pub stolen_bases: u32,
    /// Walks, intentional included.
    pub walks: u32,
    /// Hit by pitch.
    pub hit_by_pitch: u32,
    /// Strikeouts, reached-on-strikeout included.
    pub strikeouts: u32,
    /// Errors charged in the field.
    pub errors: u32,
}

/// One lineup segment's row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRow {
    /// Batting slot (zero-based).
    pub slot: usize,
    /// Segment index within the slot.
    pub segment: usize,
    /// The player.
    pub player: PlayerId,
    /// Position while in this segment.
    pub position: Position,
    /// One cell per column.
    pub cells: Vec<BoxCell>,
    /// The player's aggregates.
    pub totals: BattingTotals,
}

/// A side's batting grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScore {
    /// The batting side.
    pub side: Side,
    /// Grid columns in order.
    pub columns: Vec<BoxColumn>,
    /// Rows in batting order, segments in order within a slot.
    pub rows: Vec<BoxRow>,
}

impl BoxScore {
    /// Rows for one batting slot.
    pub fn slot_rows(&self, slot: usize) -> impl Iterator<Item = &BoxRow> {
        self.rows.iter().filter(move |row| row.slot == slot)
    }

    /// Index of a column.
    #[must_use]
    pub fn column_index(&self, inning: u32, cycle: u32) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.inning == inning && c.cycle == cycle)
    }
}

/// Builds the batting grid for `side`, at least `regulation_innings` wide.
#[must_use]
pub fn box_score(events: &[PlayEvent], side: Side, regulation_innings: u32) -> BoxScore {
    let lineups = fold_lineups(events);
    let lineup = lineups.get(side);
    let events = super::played(events);

    let at_bats: Vec<(u64, u32, &AtBatRecord)> = events
        .iter()
        .filter(|event| event.batting_side() == side)
        .filter_map(|event| event.at_bat().map(|record| (event.seq, event.inning, record)))
        .collect();

    let last_inning = events
        .iter()
        .filter(|event| event.batting_side() == side)
        .map(|event| event.inning)
        .max()
        .unwrap_or(1);
    let mut columns: BTreeSet<BoxColumn> = (1..=regulation_innings.max(last_inning))
        .map(|inning| BoxColumn { inning, cycle: 1 })
        .collect();
    columns.extend(at_bats.iter().map(|(_, inning, record)| BoxColumn {
        inning: *inning,
        cycle: record.cycle,
    }));
    let columns: Vec<BoxColumn> = columns.into_iter().collect();

    let mut rows = Vec::new();
    for (slot_index, slot) in lineup.slots().iter().enumerate() {
        let slot_at_bats: Vec<_> = at_bats
            .iter()
            .filter(|(_, _, record)| record.slot == slot_index)
            .collect();

        for (segment, assignment) in slot.segments().iter().enumerate() {
            let cells = columns
                .iter()
                .map(|column| {
                    let here = slot_at_bats.iter().find(|(_, inning, record)| {
                        *inning == column.inning && record.cycle == column.cycle
                    });
                    if let Some((seq, _, record)) = here {
                        if slot.segment_index_at(record.slot_at_bat) != segment {
                            return BoxCell::Inactive;
                        }
                        return BoxCell::Result(CellResult {
                            seq: *seq,
                            label: record.label(),
                            rbi: record.rbi,
                            annotation: pitch_annotation(&record.pitches),
                            flags: record.outcome.flags(),
                        });
                    }
                    let earlier = slot_at_bats
                        .iter()
                        .filter(|(_, inning, record)| {
                            (*inning, record.cycle) < (column.inning, column.cycle)
                        })
                        .count();
                    let index = u32::try_from(earlier).unwrap_or(u32::MAX);
                    if slot.segment_index_at(index) == segment {
                        BoxCell::Empty
                    } else {
                        BoxCell::Inactive
                    }
                })
                .collect();

            rows.push(BoxRow {
                slot: slot_index,
                segment,
                player: assignment.player,
                position: assignment.position,
                cells,
                totals: batting_totals(events, side, assignment.player),
            });
        }
    }

    BoxScore {
        side,
        columns,
        rows,
    }
}

/// Aggregates for `player` batting for `side`, matched by id.
#[must_use]
pub fn batting_totals(events: &[PlayEvent], side: Side, player: PlayerId) -> BattingTotals {
    let mut totals = BattingTotals::default();
    for event in events {
        let batting = event.batting_side() == side;
        match &event.kind {
            EventKind::AtBatResult(record) => {
                if batting {
                    totals.runs += count_of(&record.scorers, player);
                    if record.batter == player {
                        add_at_bat(&mut totals, record);
                    }
                } else if record.error_by == Some(player) {
                    totals.errors += 1;
                }
            }
            EventKind::RunnerEvent(record) if batting && record.runner == player => {
                if record.destination == Destination::Home {
                    totals.runs += 1;
                }
                if record.action == RunnerAction::StolenBase {
                    totals.stolen_bases += 1;
                }
            }
            _ => {}
        }
    }
    totals
}

fn add_at_bat(totals: &mut BattingTotals, record: &AtBatRecord) {
    let flags = record.outcome.flags();
    if flags.is_empty() {
        return;
    }
    totals.plate_appearances += 1;
    totals.rbi += record.rbi;
    if flags.contains(OutcomeFlags::OFFICIAL_AT_BAT) {
        totals.at_bats += 1;
    }
    if flags.contains(OutcomeFlags::HIT) {
        totals.hits += 1;
    }
    if flags.contains(OutcomeFlags::HOME_RUN) {
        totals.home_runs += 1;
    }
    if flags.contains(OutcomeFlags::WALK) {
        totals.walks += 1;
    }
    if flags.contains(OutcomeFlags::HIT_BY_PITCH) {
        totals.hit_by_pitch += 1;
    }
    if flags.contains(OutcomeFlags::STRIKEOUT) {
        totals.strikeouts += 1;
    }
}

fn count_of(players: &[PlayerId], player: PlayerId) -> u32 {
    let n = players.iter().filter(|p| **p == player).count();
    u32::try_from(n).unwrap_or(u32::MAX)
}
