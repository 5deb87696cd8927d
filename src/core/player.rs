//! Player identity, status, and NPC profiles.
//!
//! ## PlayerId
//!
//! Type-safe player identifier. The human player's id is supplied by the
//! caller at initialization; NPC ids are allocated by role assignment.
//!
//! ## PlayerStatus
//!
//! `Alive` plus one terminal variant per death cause. "Dead" is the
//! predicate `is_dead()`, not a variant of its own: every dead player
//! records how they died, and no transition ever leaves a dead state.

use serde::{Deserialize, Serialize};

use crate::roles::{RoleKind, Team};

/// Player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Character profile for an NPC seat.
///
/// Opaque to the engine: it is produced by an external profile generator
/// (or the built-in fallback roster) and consumed by the external
/// narrative layer. Only `name` is read here, for display names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcProfile {
    pub name: String,
    pub age: u32,
    pub profession: String,
    pub personality: String,
    pub speech_style: String,
    pub catchphrase: Option<String>,
}

/// Player life status.
///
/// Transitions are one-directional: `Alive` to exactly one dead variant,
/// never back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    Alive,
    /// Killed by the werewolf pack during the night.
    KilledByWerewolf,
    /// Eliminated by the day vote.
    Executed,
    /// Killed by the witch's poison. Blocks the death-triggered shot.
    Poisoned,
    /// Killed by a Hunter or Wolf King death shot.
    Shot,
}

impl PlayerStatus {
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, PlayerStatus::Alive)
    }

    #[must_use]
    pub const fn is_dead(self) -> bool {
        !self.is_alive()
    }
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlayerStatus::Alive => "alive",
            PlayerStatus::KilledByWerewolf => "killed by werewolves",
            PlayerStatus::Executed => "executed by vote",
            PlayerStatus::Poisoned => "poisoned",
            PlayerStatus::Shot => "shot",
        };
        write!(f, "{s}")
    }
}

/// A seated player.
///
/// Owned exclusively by `GameState`; the role is assigned once at game
/// start and never changes. Status is mutated only through the state's
/// `kill_player` contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Seat number, 1..=N, unique and stable for the game's lifetime.
    pub seat: u32,
    pub display_name: String,
    pub role: RoleKind,
    /// Exactly one player per game has this set.
    pub is_human: bool,
    pub status: PlayerStatus,
    pub profile: Option<NpcProfile>,
}

impl Player {
    /// Create a new living player.
    ///
    /// The display name comes from the NPC profile when present, else
    /// from the seat number.
    #[must_use]
    pub fn new(
        id: PlayerId,
        seat: u32,
        role: RoleKind,
        is_human: bool,
        profile: Option<NpcProfile>,
    ) -> Self {
        let display_name = profile
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Player {seat}"));

        Self {
            id,
            seat,
            display_name,
            role,
            is_human,
            status: PlayerStatus::Alive,
            profile,
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status.is_alive()
    }

    /// Team affiliation, derived from the role.
    #[must_use]
    pub fn team(&self) -> Team {
        self.role.team()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> NpcProfile {
        NpcProfile {
            name: name.to_string(),
            age: 30,
            profession: "baker".to_string(),
            personality: "quiet".to_string(),
            speech_style: "short sentences".to_string(),
            catchphrase: None,
        }
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(format!("{}", PlayerId::new(3)), "player 3");
    }

    #[test]
    fn test_display_name_from_profile() {
        let p = Player::new(PlayerId::new(1), 2, RoleKind::Villager, false, Some(profile("Mara")));
        assert_eq!(p.display_name, "Mara");
    }

    #[test]
    fn test_display_name_from_seat() {
        let p = Player::new(PlayerId::new(0), 4, RoleKind::Seer, true, None);
        assert_eq!(p.display_name, "Player 4");
    }

    #[test]
    fn test_status_predicates() {
        assert!(PlayerStatus::Alive.is_alive());
        for dead in [
            PlayerStatus::KilledByWerewolf,
            PlayerStatus::Executed,
            PlayerStatus::Poisoned,
            PlayerStatus::Shot,
        ] {
            assert!(dead.is_dead());
            assert!(!dead.is_alive());
        }
    }

    #[test]
    fn test_team_derivation() {
        let wolf = Player::new(PlayerId::new(5), 1, RoleKind::Werewolf, false, None);
        assert_eq!(wolf.team(), Team::Werewolf);
        let seer = Player::new(PlayerId::new(6), 2, RoleKind::Seer, false, None);
        assert_eq!(seer.team(), Team::Village);
    }

    #[test]
    fn test_player_serialization() {
        let p = Player::new(PlayerId::new(1), 3, RoleKind::Witch, false, Some(profile("Iris")));
        let json = serde_json::to_string(&p).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
