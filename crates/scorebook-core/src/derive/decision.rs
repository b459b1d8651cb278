//! Pitcher wins, losses and saves.
//!
//! The log does not record which pitcher was charged with the go-ahead run,
//! so decisions come from a runs-allowed heuristic rather than the official
//! scoring rules:
//!
//! - One pitcher: the win or loss follows the final score.
//! - Several pitchers, team won: the starter gets the win if the runs they
//!   allowed are fewer than the opponent's final score. Otherwise no win is
//!   assigned.
//! - Several pitchers, team lost: the loss goes to the reliever who allowed
//!   the most runs (earliest on ties) when the starter allowed fewer than
//!   the opponent's final score, to the starter when they allowed more, and
//!   to nobody when the starter allowed exactly that score.
//! - Ties produce no decision. Saves are never inferred.
//!
//! Final scores include handicaps. Operator overrides replace the inferred
//! win, loss or save for the whole game.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{line_score, pitcher_lines, pitchers_used, pitching_side};
use crate::event::PlayEvent;
use crate::lineup::{Side, SidePair};
use crate::player::PlayerId;

/// A pitcher's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Winning pitcher.
    Win,
    /// Losing pitcher.
    Loss,
    /// Save.
    Save,
}

/// Operator-assigned decisions; each replaces the inferred one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOverrides {
    /// Winning pitcher.
    pub win: Option<PlayerId>,
    /// Losing pitcher.
    pub loss: Option<PlayerId>,
    /// Pitcher credited with the save.
    pub save: Option<PlayerId>,
}

/// One side's decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitcherDecisions {
    /// Winning pitcher.
    pub win: Option<PlayerId>,
    /// Losing pitcher.
    pub loss: Option<PlayerId>,
    /// Save.
    pub save: Option<PlayerId>,
}

impl PitcherDecisions {
    /// The decision credited to `pitcher`, if any.
    #[must_use]
    pub fn decision_of(&self, pitcher: PlayerId) -> Option<Decision> {
        if self.win == Some(pitcher) {
            Some(Decision::Win)
        } else if self.loss == Some(pitcher) {
            Some(Decision::Loss)
        } else if self.save == Some(pitcher) {
            Some(Decision::Save)
        } else {
            None
        }
    }
}

/// Assigns decisions for both sides.
#[must_use]
pub fn decisions(events: &[PlayEvent], overrides: &DecisionOverrides) -> SidePair<PitcherDecisions> {
    let final_score = line_score(events, 0).final_score();
    let lines = pitcher_lines(events);
    let used = pitchers_used(events);

    let mut result = SidePair::<PitcherDecisions>::default();
    for side in Side::BOTH {
        let own = *final_score.get(side);
        let against = *final_score.get(side.opponent());
        let runs: Vec<(PlayerId, u32)> = lines
            .get(side)
            .iter()
            .map(|line| (line.pitcher, line.runs))
            .collect();
        let decided = result.get_mut(side);

        match runs.as_slice() {
            [] => {}
            [(only, _)] => {
                if own > against {
                    decided.win = Some(*only);
                } else if own < against {
                    decided.loss = Some(*only);
                }
            }
            [(starter, starter_runs), relievers @ ..] => {
                if own > against && *starter_runs < against {
                    decided.win = Some(*starter);
                } else if own < against {
                    decided.loss = match starter_runs.cmp(&against) {
                        Ordering::Less => worst_reliever(relievers),
                        Ordering::Equal => None,
                        Ordering::Greater => Some(*starter),
                    };
                }
            }
        }
    }

    apply_override(&mut result, &used, overrides.win, |d| &mut d.win);
    apply_override(&mut result, &used, overrides.loss, |d| &mut d.loss);
    apply_override(&mut result, &used, overrides.save, |d| &mut d.save);
    result
}

fn worst_reliever(relievers: &[(PlayerId, u32)]) -> Option<PlayerId> {
    let mut worst: Option<(PlayerId, u32)> = None;
    for &(pitcher, runs) in relievers {
        if worst.map_or(true, |(_, most)| runs > most) {
            worst = Some((pitcher, runs));
        }
    }
    worst.map(|(pitcher, _)| pitcher)
}

fn apply_override(
    result: &mut SidePair<PitcherDecisions>,
    used: &SidePair<Vec<PlayerId>>,
    pitcher: Option<PlayerId>,
    field: impl Fn(&mut PitcherDecisions) -> &mut Option<PlayerId>,
) {
    let Some(pitcher) = pitcher else {
        return;
    };
    *field(&mut result.away) = None;
    *field(&mut result.home) = None;
    if let Some(side) = pitching_side(used, pitcher) {
        *field(result.get_mut(side)) = Some(pitcher);
    }
}
