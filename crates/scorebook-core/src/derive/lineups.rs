//! Lineups and pitchers rebuilt from the log.

use crate::event::{EventKind, PlayEvent, SubstitutionKind};
use crate::lineup::{Lineup, Side, SidePair};
use crate::player::{PlayerId, Position};

/// Replays starting lineups, substitutions and plate appearances.
///
/// The result matches the live lineups of the game that produced the log.
#[must_use]
pub fn fold_lineups(events: &[PlayEvent]) -> SidePair<Lineup> {
    let mut lineups = SidePair::<Lineup>::default();
    for event in events {
        match &event.kind {
            EventKind::GameStart { lineups: start, .. } => lineups = start.clone(),
            EventKind::AtBatResult(record) => {
                lineups
                    .get_mut(event.batting_side())
                    .record_appearance(record.slot);
            }
            EventKind::Substitution(sub) => {
                let lineup = lineups.get_mut(sub.side);
                match sub.kind {
                    SubstitutionKind::PinchHitter {
                        slot,
                        player,
                        effective_from,
                    } => {
                        if let Some(slot) = lineup.slot_mut(slot) {
                            slot.substitute(player, Position::PinchHitter, effective_from);
                        }
                    }
                    SubstitutionKind::Defensive {
                        slot,
                        player,
                        position,
                        effective_from,
                    } => {
                        if let Some(slot) = lineup.slot_mut(slot) {
                            slot.substitute(player, position, effective_from);
                        }
                    }
                    SubstitutionKind::PositionChange { slot, position } => {
                        if let Some(slot) = lineup.slot_mut(slot) {
                            slot.set_current_position(position);
                        }
                    }
                    SubstitutionKind::PinchRunner {
                        slot,
                        player,
                        effective_from,
                        ..
                    } => {
                        if let Some(slot) = lineup.slot_mut(slot) {
                            slot.substitute(player, Position::PinchRunner, effective_from);
                        }
                    }
                    SubstitutionKind::CourtesyRunner { .. }
                    | SubstitutionKind::PitcherChange { .. } => {}
                }
            }
            _ => {}
        }
    }
    lineups
}

/// Pitchers who threw for each side, in order of first appearance.
///
/// A starter replaced before throwing a pitch does not appear.
#[must_use]
pub fn pitchers_used(events: &[PlayEvent]) -> SidePair<Vec<PlayerId>> {
    let mut used = SidePair::<Vec<PlayerId>>::default();
    for event in events {
        let pitcher = match &event.kind {
            EventKind::Pitch { pitcher, .. } => *pitcher,
            EventKind::AtBatResult(record) => record.pitcher,
            EventKind::RunnerEvent(record) => record.pitcher,
            _ => continue,
        };
        let list = used.get_mut(event.batting_side().opponent());
        if !list.contains(&pitcher) {
            list.push(pitcher);
        }
    }
    used
}

/// The side whose pitchers include `player`.
#[must_use]
pub fn pitching_side(used: &SidePair<Vec<PlayerId>>, player: PlayerId) -> Option<Side> {
    Side::BOTH
        .into_iter()
        .find(|side| used.get(*side).contains(&player))
}
