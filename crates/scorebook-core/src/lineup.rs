//! Batting orders with substitution history.
//!
//! A [`LineupSlot`] is one spot in the batting order. It never forgets who
//! used to bat there: each substitution appends a [`PlayerAssignment`]
//! segment that takes effect from a given at-bat index of that slot. The
//! player for at-bat `N` is the last segment whose `effective_from` is at
//! most `N`, so box scores rendered after a substitution still credit earlier
//! at-bats to the player who actually batted.
//!
//! # Example
//!
//! ```
//! use scorebook_core::lineup::LineupSlot;
//! use scorebook_core::player::{Fielder, PlayerId, Position};
//!
//! let mut slot = LineupSlot::new(PlayerId::new(1), Position::Field(Fielder::LeftField));
//! slot.substitute(PlayerId::new(2), Position::PinchHitter, 2);
//!
//! assert_eq!(slot.player_at(1), PlayerId::new(1));
//! assert_eq!(slot.player_at(2), PlayerId::new(2));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::{Fielder, PlayerId, Position};
use crate::state::Half;

/// One of the two teams in a game.
///
/// The away side bats in the top half of every inning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Visiting team, bats first.
    Away,
    /// Home team, bats second.
    Home,
}

impl Side {
    /// Both sides, away first.
    pub const BOTH: [Self; 2] = [Self::Away, Self::Home];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Away => Self::Home,
            Self::Home => Self::Away,
        }
    }

    /// Lowercase name used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Away => "away",
            Self::Home => "home",
        }
    }

    /// The side batting in `half`.
    #[must_use]
    pub const fn batting_in(half: Half) -> Self {
        match half {
            Half::Top => Self::Away,
            Half::Bottom => Self::Home,
        }
    }

    /// The side fielding in `half`.
    #[must_use]
    pub const fn fielding_in(half: Half) -> Self {
        Self::batting_in(half).opponent()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value held for each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SidePair<T> {
    /// Away side value.
    pub away: T,
    /// Home side value.
    pub home: T,
}

impl<T> SidePair<T> {
    /// Creates a pair.
    pub const fn new(away: T, home: T) -> Self {
        Self { away, home }
    }

    /// Returns the value for `side`.
    pub const fn get(&self, side: Side) -> &T {
        match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        }
    }

    /// Returns the value for `side` mutably.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Away => &mut self.away,
            Side::Home => &mut self.home,
        }
    }

    /// Applies `f` to both values.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SidePair<U> {
        SidePair {
            away: f(self.away),
            home: f(self.home),
        }
    }
}

/// One player occupying a batting slot from a given at-bat onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerAssignment {
    /// The player.
    pub player: PlayerId,
    /// Lineup position while in this segment.
    pub position: Position,
    /// Zero-based at-bat index of the slot from which this segment is active.
    pub effective_from: u32,
}

/// One spot in the batting order and everyone who has filled it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupSlot {
    segments: Vec<PlayerAssignment>,
}

impl LineupSlot {
    /// Creates a slot with a starting player.
    #[must_use]
    pub fn new(player: PlayerId, position: Position) -> Self {
        Self {
            segments: vec![PlayerAssignment {
                player,
                position,
                effective_from: 0,
            }],
        }
    }

    /// Appends a substitution effective from at-bat index `effective_from`.
    pub fn substitute(&mut self, player: PlayerId, position: Position, effective_from: u32) {
        self.segments.push(PlayerAssignment {
            player,
            position,
            effective_from,
        });
    }

    /// Changes the position of the current occupant without a new segment.
    pub fn set_current_position(&mut self, position: Position) {
        if let Some(last) = self.segments.last_mut() {
            last.position = position;
        }
    }

    /// The segment active for at-bat index `index`.
    #[must_use]
    pub fn assignment_at(&self, index: u32) -> &PlayerAssignment {
        self.segments
            .iter()
            .rev()
            .find(|seg| seg.effective_from <= index)
            .unwrap_or(&self.segments[0])
    }

    /// The player active for at-bat index `index`.
    #[must_use]
    pub fn player_at(&self, index: u32) -> PlayerId {
        self.assignment_at(index).player
    }

    /// Index into [`Self::segments`] of the segment active for `index`.
    #[must_use]
    pub fn segment_index_at(&self, index: u32) -> usize {
        self.segments
            .iter()
            .rposition(|seg| seg.effective_from <= index)
            .unwrap_or(0)
    }

    /// The current occupant's segment.
    #[must_use]
    pub fn current(&self) -> &PlayerAssignment {
        &self.segments[self.segments.len() - 1]
    }

    /// All segments in order.
    #[must_use]
    pub fn segments(&self) -> &[PlayerAssignment] {
        &self.segments
    }
}

/// A side's batting order plus how many times each slot has batted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineup {
    slots: Vec<LineupSlot>,
    appearances: Vec<u32>,
}

impl Lineup {
    /// Creates a lineup from slots in batting order.
    #[must_use]
    pub fn new(slots: Vec<LineupSlot>) -> Self {
        let appearances = vec![0; slots.len()];
        Self { slots, appearances }
    }

    /// Number of batting slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the lineup has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in batting order.
    #[must_use]
    pub fn slots(&self) -> &[LineupSlot] {
        &self.slots
    }

    /// The slot at `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&LineupSlot> {
        self.slots.get(index)
    }

    /// The slot at `index`, mutably.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut LineupSlot> {
        self.slots.get_mut(index)
    }

    /// Completed plate appearances for the slot; also the index of its next
    /// at-bat.
    #[must_use]
    pub fn appearances(&self, index: usize) -> u32 {
        self.appearances.get(index).copied().unwrap_or(0)
    }

    /// Counts a completed plate appearance for the slot.
    pub fn record_appearance(&mut self, index: usize) {
        if let Some(count) = self.appearances.get_mut(index) {
            *count += 1;
        }
    }

    /// The player due up in the slot's next at-bat.
    #[must_use]
    pub fn due_up(&self, index: usize) -> Option<PlayerId> {
        self.slot(index)
            .map(|slot| slot.player_at(self.appearances(index)))
    }

    /// Finds the slot currently occupied by `player`.
    #[must_use]
    pub fn slot_of(&self, player: PlayerId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.current().player == player)
    }

    /// The current occupant of a fielding position, if any.
    #[must_use]
    pub fn fielder(&self, fielder: Fielder) -> Option<PlayerId> {
        self.slots
            .iter()
            .map(LineupSlot::current)
            .find(|seg| seg.position == Position::Field(fielder))
            .map(|seg| seg.player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineup_of(n: u64) -> Lineup {
        Lineup::new(
            (0..n)
                .map(|i| LineupSlot::new(PlayerId::new(i + 1), Position::Bench))
                .collect(),
        )
    }

    #[test]
    fn segment_lookup_uses_last_effective_segment() {
        let mut slot = LineupSlot::new(PlayerId::new(1), Position::Field(Fielder::Catcher));
        slot.substitute(PlayerId::new(2), Position::PinchHitter, 1);
        slot.substitute(PlayerId::new(3), Position::PinchRunner, 3);

        assert_eq!(slot.player_at(0), PlayerId::new(1));
        assert_eq!(slot.player_at(1), PlayerId::new(2));
        assert_eq!(slot.player_at(2), PlayerId::new(2));
        assert_eq!(slot.player_at(3), PlayerId::new(3));
        assert_eq!(slot.segment_index_at(2), 1);
        assert_eq!(slot.current().player, PlayerId::new(3));
    }

    #[test]
    fn due_up_follows_appearance_count() {
        let mut lineup = lineup_of(3);
        lineup
            .slot_mut(0)
            .unwrap()
            .substitute(PlayerId::new(99), Position::PinchHitter, 1);
        assert_eq!(lineup.due_up(0), Some(PlayerId::new(1)));
        lineup.record_appearance(0);
        assert_eq!(lineup.due_up(0), Some(PlayerId::new(99)));
        assert_eq!(lineup.slot_of(PlayerId::new(99)), Some(0));
    }

    #[test]
    fn fielder_lookup_reads_current_positions() {
        let mut lineup = Lineup::new(vec![
            LineupSlot::new(PlayerId::new(1), Position::Field(Fielder::Shortstop)),
            LineupSlot::new(PlayerId::new(2), Position::Field(Fielder::Pitcher)),
        ]);
        assert_eq!(lineup.fielder(Fielder::Shortstop), Some(PlayerId::new(1)));
        lineup
            .slot_mut(0)
            .unwrap()
            .set_current_position(Position::Field(Fielder::ThirdBase));
        assert_eq!(lineup.fielder(Fielder::Shortstop), None);
        assert_eq!(lineup.fielder(Fielder::ThirdBase), Some(PlayerId::new(1)));
    }

    #[test]
    fn sides_map_to_halves() {
        assert_eq!(Side::batting_in(Half::Top), Side::Away);
        assert_eq!(Side::fielding_in(Half::Top), Side::Home);
        assert_eq!(Side::Home.opponent(), Side::Away);
    }
}
