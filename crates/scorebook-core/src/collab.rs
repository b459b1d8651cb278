//! Collaborators the engine talks to but does not own.
//!
//! - [`Roster`]: read-only club players and teams
//! - [`ScoreSheetExporter`]: renders a finished game; the engine does no
//!   formatting of its own
//! - [`LedgerSink`]: receives flattened rows for the central ledger
//!
//! Slot storage is the fourth collaborator, see [`crate::persistence`].

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::derive::{BoxScore, LedgerRow, LineScore, PitcherDecisions, PitcherLine};
use crate::game::{Game, GameSetup};
use crate::lineup::{Side, SidePair};
use crate::persistence::{ClubId, PersistenceError};
use crate::player::{Fielder, PlayerId, PlayerRegistry};

// =============================================================================
// Roster
// =============================================================================

/// A club player as the roster lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPlayer {
    /// Stable id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Uniform number.
    pub number: Option<String>,
    /// Usual position.
    pub position: Option<Fielder>,
}

/// A team the club plays as or against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    /// Team name.
    pub name: String,
    /// Display color, `#rrggbb`.
    pub color_hex: String,
}

/// Read-only club directory.
pub trait Roster: Send + Sync {
    /// Players of a club.
    ///
    /// # Errors
    ///
    /// Backend failures.
    fn list_players(&self, club: ClubId) -> Result<Vec<RosterPlayer>, PersistenceError>;

    /// Teams of a club.
    ///
    /// # Errors
    ///
    /// Backend failures.
    fn list_teams(&self, club: ClubId) -> Result<Vec<TeamInfo>, PersistenceError>;
}

/// Builds a registry from roster players. Guests are added later, mid-game.
#[must_use]
pub fn registry_from_roster(players: &[RosterPlayer]) -> PlayerRegistry {
    let mut registry = PlayerRegistry::new();
    for player in players {
        registry.insert(player.id, player.name.clone(), player.number.clone());
    }
    registry
}

#[derive(Debug, Default)]
struct ClubDirectory {
    players: Vec<RosterPlayer>,
    teams: Vec<TeamInfo>,
}

/// In-memory roster.
#[derive(Debug, Default)]
pub struct MemoryRoster {
    clubs: RwLock<BTreeMap<ClubId, ClubDirectory>>,
}

impl MemoryRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player to a club.
    ///
    /// # Errors
    ///
    /// Fails if the lock is poisoned.
    pub fn add_player(&self, club: ClubId, player: RosterPlayer) -> Result<(), PersistenceError> {
        let mut clubs = self.clubs.write().map_err(|_| poisoned())?;
        clubs.entry(club).or_default().players.push(player);
        Ok(())
    }

    /// Adds a team to a club.
    ///
    /// # Errors
    ///
    /// Fails if the lock is poisoned.
    pub fn add_team(&self, club: ClubId, team: TeamInfo) -> Result<(), PersistenceError> {
        let mut clubs = self.clubs.write().map_err(|_| poisoned())?;
        clubs.entry(club).or_default().teams.push(team);
        Ok(())
    }
}

fn poisoned() -> PersistenceError {
    PersistenceError::Backend("poisoned lock: roster".to_owned())
}

impl Roster for MemoryRoster {
    fn list_players(&self, club: ClubId) -> Result<Vec<RosterPlayer>, PersistenceError> {
        let clubs = self.clubs.read().map_err(|_| poisoned())?;
        Ok(clubs.get(&club).map(|c| c.players.clone()).unwrap_or_default())
    }

    fn list_teams(&self, club: ClubId) -> Result<Vec<TeamInfo>, PersistenceError> {
        let clubs = self.clubs.read().map_err(|_| poisoned())?;
        Ok(clubs.get(&club).map(|c| c.teams.clone()).unwrap_or_default())
    }
}

// =============================================================================
// Export
// =============================================================================

/// Everything a printable score sheet shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    /// Pre-game setup.
    pub setup: GameSetup,
    /// Line score.
    pub line_score: LineScore,
    /// Batting grids.
    pub box_scores: SidePair<BoxScore>,
    /// Pitcher lines.
    pub pitching: SidePair<Vec<PitcherLine>>,
    /// Pitcher decisions.
    pub decisions: SidePair<PitcherDecisions>,
    /// Names for every player id on the sheet.
    pub registry: PlayerRegistry,
}

impl ScoreSheet {
    /// Derives the sheet from a game's log.
    #[must_use]
    pub fn from_game(game: &Game) -> Self {
        Self {
            setup: game.setup().clone(),
            line_score: game.line_score(),
            box_scores: SidePair::new(game.box_score(Side::Away), game.box_score(Side::Home)),
            pitching: game.pitcher_lines(),
            decisions: game.decisions(),
            registry: game.registry().clone(),
        }
    }
}

/// Renders score sheets.
pub trait ScoreSheetExporter {
    /// Rendered form.
    type Output;
    /// Rendering failure.
    type Error: std::error::Error;

    /// Renders one sheet.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn export(&self, sheet: &ScoreSheet) -> Result<Self::Output, Self::Error>;
}

// =============================================================================
// Ledger
// =============================================================================

/// Receives flattened plays for the central ledger.
///
/// Uploads must be idempotent on [`LedgerRow::key`]: sending a game again
/// replaces its rows.
pub trait LedgerSink {
    /// Upload failure.
    type Error: std::error::Error;

    /// Sends rows.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn upload(&mut self, rows: &[LedgerRow]) -> Result<(), Self::Error>;
}

/// In-memory ledger keyed by `(game_id, seq)`.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    rows: BTreeMap<(String, u64), LedgerRow>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no rows are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one game in sequence order.
    pub fn game_rows<'a>(&'a self, game_id: &'a str) -> impl Iterator<Item = &'a LedgerRow> {
        self.rows
            .values()
            .filter(move |row| row.game_id == game_id)
    }
}

impl LedgerSink for MemoryLedger {
    type Error = std::convert::Infallible;

    fn upload(&mut self, rows: &[LedgerRow]) -> Result<(), Self::Error> {
        for row in rows {
            self.rows
                .insert((row.game_id.clone(), row.seq), row.clone());
        }
        Ok(())
    }
}
