//! Pitcher lines.
//!
//! Everything is attributed to the pitcher of record stamped on each event.
//!
//! # Earned runs
//!
//! The log does not track which runs an official scorer would charge as
//! earned, so earned runs are estimated per half-inning: error plays count
//! as outs toward a virtual out total, and runs are unearned if they score
//! on an error play or after the virtual total reached three.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::pitchers_used;
use crate::event::{Destination, EventKind, OutcomeFlags, PlayEvent, RunnerAction};
use crate::lineup::SidePair;
use crate::player::PlayerId;
use crate::state::{Half, OUTS_PER_HALF};

/// Outs recorded, displayed as innings (`5.2` is five and two-thirds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InningsPitched(pub u32);

impl InningsPitched {
    /// Whole innings.
    #[must_use]
    pub const fn whole(self) -> u32 {
        self.0 / 3
    }

    /// Outs in the partial inning.
    #[must_use]
    pub const fn thirds(self) -> u32 {
        self.0 % 3
    }
}

impl fmt::Display for InningsPitched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.whole(), self.thirds())
    }
}

/// One pitcher's line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitcherLine {
    /// The pitcher.
    pub pitcher: PlayerId,
    /// Outs recorded while pitching.
    pub innings: InningsPitched,
    /// Pitches thrown; intentional walks add none.
    pub pitches: u32,
    /// Batters faced.
    pub batters_faced: u32,
    /// Hits allowed.
    pub hits: u32,
    /// Home runs allowed.
    pub home_runs: u32,
    /// Strikeouts, reached-on-strikeout included.
    pub strikeouts: u32,
    /// Walks, intentional included.
    pub walks: u32,
    /// Hit batters.
    pub hit_batters: u32,
    /// Wild pitches.
    pub wild_pitches: u32,
    /// Runs allowed.
    pub runs: u32,
    /// Estimated earned runs.
    pub earned_runs: u32,
}

impl PitcherLine {
    fn new(pitcher: PlayerId) -> Self {
        Self {
            pitcher,
            innings: InningsPitched::default(),
            pitches: 0,
            batters_faced: 0,
            hits: 0,
            home_runs: 0,
            strikeouts: 0,
            walks: 0,
            hit_batters: 0,
            wild_pitches: 0,
            runs: 0,
            earned_runs: 0,
        }
    }
}

#[derive(Default)]
struct VirtualOuts {
    outs: u8,
}

impl VirtualOuts {
    /// Returns the earned share of `runs`, then counts the play's outs.
    fn charge(&mut self, runs: u32, outs: u8, error_play: bool) -> u32 {
        let earned = if self.outs < OUTS_PER_HALF && !error_play {
            runs
        } else {
            0
        };
        self.outs = self
            .outs
            .saturating_add(outs)
            .saturating_add(u8::from(error_play));
        earned
    }
}

/// Lines for every pitcher, grouped by the side they pitched for, in order
/// of appearance.
#[must_use]
pub fn pitcher_lines(events: &[PlayEvent]) -> SidePair<Vec<PitcherLine>> {
    let used = pitchers_used(events);
    let mut lines: BTreeMap<PlayerId, PitcherLine> = used
        .away
        .iter()
        .chain(&used.home)
        .map(|p| (*p, PitcherLine::new(*p)))
        .collect();
    let mut virtual_outs: BTreeMap<(u32, Half), VirtualOuts> = BTreeMap::new();

    for event in events {
        match &event.kind {
            EventKind::Pitch { pitcher, pitch, .. } => {
                if let Some(line) = lines.get_mut(pitcher) {
                    line.pitches += u32::from(pitch.is_thrown());
                }
            }
            EventKind::AtBatResult(record) => {
                let Some(line) = lines.get_mut(&record.pitcher) else {
                    continue;
                };
                let flags = record.outcome.flags();
                let runs = u32::try_from(record.scorers.len()).unwrap_or(u32::MAX);
                if !flags.is_empty() {
                    line.batters_faced += 1;
                }
                line.hits += u32::from(flags.contains(OutcomeFlags::HIT));
                line.home_runs += u32::from(flags.contains(OutcomeFlags::HOME_RUN));
                line.strikeouts += u32::from(flags.contains(OutcomeFlags::STRIKEOUT));
                line.walks += u32::from(flags.contains(OutcomeFlags::WALK));
                line.hit_batters += u32::from(flags.contains(OutcomeFlags::HIT_BY_PITCH));
                line.innings.0 += u32::from(record.outs_recorded);
                line.runs += runs;
                line.earned_runs += virtual_outs
                    .entry((event.inning, event.half))
                    .or_default()
                    .charge(runs, record.outs_recorded, flags.contains(OutcomeFlags::ERROR));
            }
            EventKind::RunnerEvent(record) => {
                let Some(line) = lines.get_mut(&record.pitcher) else {
                    continue;
                };
                let runs = u32::from(record.destination == Destination::Home);
                let outs = u8::from(record.destination == Destination::Out);
                line.wild_pitches += u32::from(record.action == RunnerAction::WildPitch);
                line.innings.0 += u32::from(outs);
                line.runs += runs;
                line.earned_runs += virtual_outs
                    .entry((event.inning, event.half))
                    .or_default()
                    .charge(runs, outs, false);
            }
            _ => {}
        }
    }

    used.map(|pitchers| {
        pitchers
            .iter()
            .filter_map(|p| lines.get(p).copied())
            .collect()
    })
}
