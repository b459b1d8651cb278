//! Session configuration.
//!
//! [`SessionConfig`] holds the knobs a league or tournament changes between
//! games. It is plain data (serde-serializable) so a front end can keep it in
//! a JSON file next to the slot store.

use serde::{Deserialize, Serialize};

/// Default number of undo snapshots retained.
pub const DEFAULT_UNDO_CAPACITY: usize = 20;

/// Default number of regulation innings.
pub const DEFAULT_REGULATION_INNINGS: u32 = 7;

/// Default first inning in which the tie-break placement applies.
pub const DEFAULT_TIE_BREAK_FROM: u32 = 8;

/// Runner placement at the start of a tie-break half-inning.
///
/// Placed runners are the batters immediately preceding the lead-off batter
/// in the batting order: the previous batter stands on first, the one before
/// on second, and so on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TieBreakRule {
    /// Extra innings start with the bases empty.
    #[default]
    None,
    /// Runners on first and second.
    FirstAndSecond,
    /// Bases loaded.
    BasesLoaded,
}

impl TieBreakRule {
    /// Number of bases filled by the rule.
    #[must_use]
    pub const fn runners(self) -> usize {
        match self {
            Self::None => 0,
            Self::FirstAndSecond => 2,
            Self::BasesLoaded => 3,
        }
    }
}

/// Configuration for one scoring session.
///
/// # Example
///
/// ```
/// use scorebook_core::config::{SessionConfig, TieBreakRule};
///
/// let config = SessionConfig::default()
///     .with_tie_break(TieBreakRule::FirstAndSecond, 8)
///     .with_undo_capacity(5);
///
/// assert!(config.tie_break_applies(8));
/// assert!(!config.tie_break_applies(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum undo snapshots kept; the oldest is dropped past this.
    pub undo_capacity: usize,
    /// Runner placement for extra innings.
    pub tie_break: TieBreakRule,
    /// First inning the tie-break placement applies to.
    pub tie_break_from_inning: u32,
    /// Regulation innings; the box-score grid is at least this wide.
    pub regulation_innings: u32,
    /// Commit walks, hit batters and intentional walks without waiting for
    /// an operator confirmation of the forced runner movement.
    pub auto_confirm_dead_ball: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            tie_break: TieBreakRule::None,
            tie_break_from_inning: DEFAULT_TIE_BREAK_FROM,
            regulation_innings: DEFAULT_REGULATION_INNINGS,
            auto_confirm_dead_ball: true,
        }
    }
}

impl SessionConfig {
    /// Sets the undo capacity.
    #[must_use]
    pub fn with_undo_capacity(mut self, capacity: usize) -> Self {
        self.undo_capacity = capacity;
        self
    }

    /// Sets the tie-break rule and the first inning it applies to.
    #[must_use]
    pub fn with_tie_break(mut self, rule: TieBreakRule, from_inning: u32) -> Self {
        self.tie_break = rule;
        self.tie_break_from_inning = from_inning;
        self
    }

    /// Sets the number of regulation innings.
    #[must_use]
    pub fn with_regulation_innings(mut self, innings: u32) -> Self {
        self.regulation_innings = innings;
        self
    }

    /// Enables or disables automatic confirmation of dead-ball awards.
    #[must_use]
    pub fn with_auto_confirm_dead_ball(mut self, enabled: bool) -> Self {
        self.auto_confirm_dead_ball = enabled;
        self
    }

    /// Returns true if a half-inning of `inning` starts with tie-break runners.
    #[must_use]
    pub fn tie_break_applies(&self, inning: u32) -> bool {
        self.tie_break != TieBreakRule::None && inning >= self.tie_break_from_inning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_league_rules() {
        let config = SessionConfig::default();
        assert_eq!(config.undo_capacity, 20);
        assert_eq!(config.regulation_innings, 7);
        assert!(config.auto_confirm_dead_ball);
        assert!(!config.tie_break_applies(10));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"tie_break":"BasesLoaded"}"#).unwrap();
        assert_eq!(config.tie_break, TieBreakRule::BasesLoaded);
        assert_eq!(config.tie_break_from_inning, DEFAULT_TIE_BREAK_FROM);
        assert_eq!(config.undo_capacity, DEFAULT_UNDO_CAPACITY);
    }
}
