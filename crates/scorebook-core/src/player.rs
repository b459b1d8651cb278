//! Player identity and fielding positions.
//!
//! Every player the engine tracks is referred to by a stable [`PlayerId`].
//! Display names live only in the [`PlayerRegistry`] and are looked up when a
//! view is rendered, so renaming a player or typing an opponent's name twice
//! with a different uniform suffix never splits their statistics.
//!
//! # Example
//!
//! ```
//! use scorebook_core::player::{normalize_name, PlayerRegistry};
//!
//! let mut registry = PlayerRegistry::new();
//! let first = registry.register_guest("Suzuki (7)", None);
//! let again = registry.register_guest("Suzuki", None);
//!
//! assert_eq!(first, again);
//! assert_eq!(normalize_name("Suzuki (7)"), "Suzuki");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// First id handed out to guest (non-roster) players.
///
/// Roster ids come from the club's roster service and are expected to stay
/// well below this value.
pub const GUEST_ID_BASE: u64 = 1 << 32;

/// Stable reference to a player.
///
/// # Example
///
/// ```
/// use scorebook_core::player::PlayerId;
///
/// let id = PlayerId::new(12);
/// assert_eq!(id.as_u64(), 12);
/// assert!(PlayerId::new(1) < id);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u64);

impl PlayerId {
    /// Creates a new `PlayerId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns true if the id was assigned by the registry to a guest.
    #[must_use]
    pub const fn is_guest(self) -> bool {
        self.0 >= GUEST_ID_BASE
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PlayerId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Strips bracketed annotations and surrounding whitespace from a name.
///
/// Scorers habitually append uniform numbers or notes, e.g. `"Tanaka (12)"`
/// or `"Sato（代走）"`. Both ASCII and full-width brackets are removed.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for ch in name.chars() {
        match ch {
            '(' | '（' | '[' => depth += 1,
            ')' | '）' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Display data for a registered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Display name.
    pub name: String,
    /// Uniform number, if known.
    pub number: Option<String>,
}

/// Maps player ids to display data.
///
/// Roster players are inserted with the ids the roster service assigned.
/// Opponents and walk-ons are registered as guests; a guest whose normalized
/// name matches an existing guest reuses that guest's id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRegistry {
    players: BTreeMap<PlayerId, PlayerRecord>,
    next_guest: u64,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a player under a known id.
    pub fn insert(&mut self, id: PlayerId, name: impl Into<String>, number: Option<String>) {
        self.players.insert(
            id,
            PlayerRecord {
                name: name.into(),
                number,
            },
        );
    }

    /// Registers a guest player, reusing the id of a guest with the same
    /// normalized name.
    pub fn register_guest(&mut self, name: &str, number: Option<String>) -> PlayerId {
        let wanted = normalize_name(name);
        if let Some(id) = self
            .players
            .iter()
            .find(|(id, rec)| id.is_guest() && normalize_name(&rec.name) == wanted)
            .map(|(id, _)| *id)
        {
            return id;
        }
        let id = PlayerId::new(GUEST_ID_BASE + self.next_guest);
        self.next_guest += 1;
        self.players.insert(id, PlayerRecord { name: wanted, number });
        id
    }

    /// Returns the record for a player.
    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.get(&id)
    }

    /// Returns the display name for a player, or a placeholder for unknown ids.
    #[must_use]
    pub fn display_name(&self, id: PlayerId) -> String {
        self.players
            .get(&id)
            .map_or_else(|| format!("#{id}"), |rec| rec.name.clone())
    }

    /// Finds a player by normalized name, preferring roster players.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<PlayerId> {
        let wanted = normalize_name(name);
        self.players
            .iter()
            .find(|(_, rec)| normalize_name(&rec.name) == wanted)
            .map(|(id, _)| *id)
    }

    /// Number of registered players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if no players are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// The nine defensive positions, also used as batted-ball directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Fielder {
    /// Pitcher (1).
    Pitcher,
    /// Catcher (2).
    Catcher,
    /// First baseman (3).
    FirstBase,
    /// Second baseman (4).
    SecondBase,
    /// Third baseman (5).
    ThirdBase,
    /// Shortstop (6).
    Shortstop,
    /// Left fielder (7).
    LeftField,
    /// Center fielder (8).
    CenterField,
    /// Right fielder (9).
    RightField,
}

impl Fielder {
    /// All positions in scorebook number order.
    pub const ALL: [Self; 9] = [
        Self::Pitcher,
        Self::Catcher,
        Self::FirstBase,
        Self::SecondBase,
        Self::ThirdBase,
        Self::Shortstop,
        Self::LeftField,
        Self::CenterField,
        Self::RightField,
    ];

    /// Scorebook position number (1-9).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Pitcher => 1,
            Self::Catcher => 2,
            Self::FirstBase => 3,
            Self::SecondBase => 4,
            Self::ThirdBase => 5,
            Self::Shortstop => 6,
            Self::LeftField => 7,
            Self::CenterField => 8,
            Self::RightField => 9,
        }
    }

    /// Short scorebook abbreviation.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Pitcher => "P",
            Self::Catcher => "C",
            Self::FirstBase => "1B",
            Self::SecondBase => "2B",
            Self::ThirdBase => "3B",
            Self::Shortstop => "SS",
            Self::LeftField => "LF",
            Self::CenterField => "CF",
            Self::RightField => "RF",
        }
    }
}

impl fmt::Display for Fielder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pitcher => "pitcher",
            Self::Catcher => "catcher",
            Self::FirstBase => "first base",
            Self::SecondBase => "second base",
            Self::ThirdBase => "third base",
            Self::Shortstop => "shortstop",
            Self::LeftField => "left field",
            Self::CenterField => "center field",
            Self::RightField => "right field",
        };
        f.write_str(name)
    }
}

/// A lineup position, including the non-fielding roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// One of the nine fielding positions.
    Field(Fielder),
    /// Designated player (bats for the flex).
    DesignatedPlayer,
    /// Flex player (fields for the designated player).
    Flex,
    /// Pinch hitter awaiting a defensive assignment.
    PinchHitter,
    /// Pinch runner awaiting a defensive assignment.
    PinchRunner,
    /// On the bench.
    Bench,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(fielder) => f.write_str(fielder.abbreviation()),
            Self::DesignatedPlayer => f.write_str("DP"),
            Self::Flex => f.write_str("FLEX"),
            Self::PinchHitter => f.write_str("PH"),
            Self::PinchRunner => f.write_str("PR"),
            Self::Bench => f.write_str("-"),
        }
    }
}

/// Pitcher's throwing hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    /// Right-handed.
    #[default]
    Right,
    /// Left-handed.
    Left,
}

/// Pitching delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delivery {
    /// Windmill (fast pitch).
    #[default]
    Windmill,
    /// Slingshot.
    Slingshot,
    /// Slow pitch.
    Slowpitch,
    /// Overhand.
    Overhand,
}

/// The pitcher of record for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitcherInfo {
    /// The pitcher.
    pub player: PlayerId,
    /// Throwing hand.
    pub hand: Hand,
    /// Delivery style.
    pub delivery: Delivery,
}

impl PitcherInfo {
    /// A right-handed windmill pitcher.
    #[must_use]
    pub const fn new(player: PlayerId) -> Self {
        Self {
            player,
            hand: Hand::Right,
            delivery: Delivery::Windmill,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod normalize_tests {
        use super::*;

        #[test]
        fn strips_ascii_and_full_width_brackets() {
            assert_eq!(normalize_name("Tanaka (12)"), "Tanaka");
            assert_eq!(normalize_name("Sato（PR）"), "Sato");
            assert_eq!(normalize_name("  Ito [c] "), "Ito");
        }

        #[test]
        fn unbalanced_closing_bracket_is_dropped() {
            assert_eq!(normalize_name("Kato)"), "Kato");
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn guests_deduplicate_by_normalized_name() {
            let mut reg = PlayerRegistry::new();
            let a = reg.register_guest("Mori (3)", Some("3".into()));
            let b = reg.register_guest("Mori", None);
            let c = reg.register_guest("Hara", None);
            assert_eq!(a, b);
            assert_ne!(a, c);
            assert!(a.is_guest());
            assert_eq!(reg.len(), 2);
        }

        #[test]
        fn guests_never_merge_with_roster_players() {
            let mut reg = PlayerRegistry::new();
            reg.insert(PlayerId::new(5), "Mori", None);
            let guest = reg.register_guest("Mori", None);
            assert_ne!(guest, PlayerId::new(5));
        }

        #[test]
        fn display_name_falls_back_to_id() {
            let reg = PlayerRegistry::new();
            assert_eq!(reg.display_name(PlayerId::new(9)), "#9");
        }

        #[test]
        fn survives_json_round_trip() {
            let mut reg = PlayerRegistry::new();
            reg.insert(PlayerId::new(1), "Abe", Some("10".into()));
            reg.register_guest("Opp", None);
            let json = serde_json::to_string(&reg).unwrap();
            let back: PlayerRegistry = serde_json::from_str(&json).unwrap();
            assert_eq!(reg, back);
        }
    }

    #[test]
    fn fielder_numbers_follow_scorebook_order() {
        let numbers: Vec<u8> = Fielder::ALL.iter().map(|f| f.number()).collect();
        assert_eq!(numbers, (1..=9).collect::<Vec<u8>>());
        assert_eq!(Position::Field(Fielder::Shortstop).to_string(), "SS");
    }
}
