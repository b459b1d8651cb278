//! Runs by inning, hits and errors.

use serde::{Deserialize, Serialize};

use crate::event::{Destination, EventKind, OutcomeFlags, PlayEvent};
use crate::lineup::{Side, SidePair};

/// The scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineScore {
    /// Runs per inning; `None` for halves not (yet) played.
    pub runs: SidePair<Vec<Option<u32>>>,
    /// Hits.
    pub hits: SidePair<u32>,
    /// Errors committed in the field.
    pub errors: SidePair<u32>,
    /// Handicap runs.
    pub handicap: SidePair<u32>,
}

impl LineScore {
    /// Number of inning columns.
    #[must_use]
    pub fn innings(&self) -> usize {
        self.runs.away.len()
    }

    /// Runs scored in play.
    #[must_use]
    pub fn runs_in_play(&self, side: Side) -> u32 {
        self.runs.get(side).iter().flatten().sum()
    }

    /// Runs in play plus handicap.
    #[must_use]
    pub fn total(&self, side: Side) -> u32 {
        self.runs_in_play(side) + self.handicap.get(side)
    }

    /// Both totals.
    #[must_use]
    pub fn final_score(&self) -> SidePair<u32> {
        SidePair::new(self.total(Side::Away), self.total(Side::Home))
    }
}

/// Folds the log into a line score at least `regulation_innings` wide.
#[must_use]
pub fn line_score(events: &[PlayEvent], regulation_innings: u32) -> LineScore {
    let events = super::played(events);
    let last_inning = events.iter().map(|e| e.inning).max().unwrap_or(1);
    let width = usize::try_from(regulation_innings.max(last_inning)).unwrap_or(usize::MAX);
    let mut score = LineScore {
        runs: SidePair::new(vec![None; width], vec![None; width]),
        hits: SidePair::default(),
        errors: SidePair::default(),
        handicap: SidePair::default(),
    };

    for event in events {
        let side = event.batting_side();
        let Some(index) = usize::try_from(event.inning)
            .ok()
            .and_then(|inning| inning.checked_sub(1))
        else {
            continue;
        };
        let cell = &mut score.runs.get_mut(side)[index];
        match &event.kind {
            EventKind::GameStart { handicap, .. } => score.handicap = *handicap,
            EventKind::InningStart { .. } => {
                cell.get_or_insert(0);
            }
            EventKind::AtBatResult(record) => {
                let runs = u32::try_from(record.scorers.len()).unwrap_or(u32::MAX);
                *cell.get_or_insert(0) += runs;
                let flags = record.outcome.flags();
                if flags.contains(OutcomeFlags::HIT) {
                    *score.hits.get_mut(side) += 1;
                }
                if flags.contains(OutcomeFlags::ERROR) {
                    *score.errors.get_mut(side.opponent()) += 1;
                }
            }
            EventKind::RunnerEvent(record) if record.destination == Destination::Home => {
                *cell.get_or_insert(0) += 1;
            }
            _ => {}
        }
    }
    score
}
