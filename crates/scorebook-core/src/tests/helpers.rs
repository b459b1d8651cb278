//! Test helper functions for setting up games and scripting plays.

use crate::config::SessionConfig;
use crate::event::{BattedBall, Contact, Pitch, StrikeKind};
use crate::game::{Game, GameSetup, TeamSheet};
use crate::lineup::{Lineup, LineupSlot, SidePair};
use crate::persistence::{ClubId, PersistedSlot, PersistenceError, SlotId, SlotKey, SlotStore};
use crate::player::{Fielder, PlayerId, PlayerRegistry, Position};
use crate::resolver::{Overrides, RunnerAdjudicator};
use crate::session::GameSession;

/// First player id of the away lineup; the away pitcher bats first.
pub const AWAY_BASE: u64 = 1;

/// First player id of the home lineup; the home pitcher bats first.
pub const HOME_BASE: u64 = 101;

const ADJ: RunnerAdjudicator = RunnerAdjudicator::new();

// =============================================================================
// Game Setup
// =============================================================================

/// Nine players with ids `base..base + 9`, batting in fielder order
/// (pitcher first, right fielder last).
pub fn nine_man_lineup(base: u64) -> Lineup {
    Lineup::new(
        Fielder::ALL
            .iter()
            .zip(base..)
            .map(|(fielder, id)| LineupSlot::new(PlayerId::new(id), Position::Field(*fielder)))
            .collect(),
    )
}

/// Standard sheets for both sides; pitchers come from the lineups.
pub fn nine_man_sheets() -> SidePair<TeamSheet> {
    SidePair::new(
        TeamSheet::new(nine_man_lineup(AWAY_BASE)),
        TeamSheet::new(nine_man_lineup(HOME_BASE)),
    )
}

/// The scoring club bats first, no handicap.
pub fn setup() -> GameSetup {
    GameSetup::new("2026-05-03", "Owls", "Hawks", true)
}

/// Registry naming every player of the standard sheets.
pub fn registry() -> PlayerRegistry {
    let mut registry = PlayerRegistry::new();
    for base in [AWAY_BASE, HOME_BASE] {
        for id in base..base + 9 {
            registry.insert(PlayerId::new(id), format!("Player {id}"), Some(id.to_string()));
        }
    }
    registry
}

/// A started game with the standard sheets.
pub fn start_game(config: SessionConfig) -> Game {
    Game::start(config, setup(), registry(), nine_man_sheets()).unwrap()
}

/// Slot `n` of club 1.
pub fn slot_key(n: u8) -> SlotKey {
    SlotKey::new(ClubId::new(1), SlotId::new(n).unwrap())
}

/// A started session in slot 1 with the default config.
pub fn start_session<S: SlotStore>(store: S) -> GameSession<S> {
    GameSession::start(
        store,
        slot_key(1),
        SessionConfig::default(),
        setup(),
        registry(),
        nine_man_sheets(),
    )
    .unwrap()
    .into_value()
}

// =============================================================================
// Scripted Plays
// =============================================================================

/// Three strikes of `kind`, batter confirmed out.
pub fn strike_out(game: &mut Game, kind: StrikeKind) {
    let pitch = match kind {
        StrikeKind::Called => Pitch::CalledStrike,
        StrikeKind::Swinging => Pitch::SwingingStrike,
    };
    for _ in 0..3 {
        game.pitch(&ADJ, pitch).unwrap();
    }
    game.confirm(&ADJ, &Overrides::new()).unwrap();
}

/// Strikes out the side from the current out count.
pub fn three_outs(game: &mut Game) {
    let half = (game.state().inning(), game.state().half());
    while (game.state().inning(), game.state().half()) == half {
        strike_out(game, StrikeKind::Called);
    }
}

/// A ball in play confirmed as predicted.
pub fn in_play(game: &mut Game, direction: Fielder, contact: Contact) {
    game.pitch(&ADJ, Pitch::InPlay(BattedBall::new(direction, contact)))
        .unwrap();
    game.confirm(&ADJ, &Overrides::new()).unwrap();
}

/// Four balls.
pub fn walk(game: &mut Game) {
    for _ in 0..4 {
        game.pitch(&ADJ, Pitch::Ball).unwrap();
    }
}

// =============================================================================
// Stores
// =============================================================================

/// A store whose writes always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl SlotStore for FailingStore {
    fn load_slot(&self, _key: SlotKey) -> Result<Option<PersistedSlot>, PersistenceError> {
        Ok(None)
    }

    fn save_slot(&self, _slot: &PersistedSlot) -> Result<(), PersistenceError> {
        Err(PersistenceError::Backend("disk unavailable".into()))
    }

    fn delete_slot(&self, _key: SlotKey) -> Result<(), PersistenceError> {
        Err(PersistenceError::Backend("disk unavailable".into()))
    }
}
