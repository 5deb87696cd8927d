//! Role tags and team affiliation.
//!
//! Roles form a closed set of tags. Capabilities (abilities, target
//! eligibility) live in the catalog and are resolved by lookup rather
//! than virtual dispatch.

use serde::{Deserialize, Serialize};

/// Faction partition used for targeting restrictions and win evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Werewolf-aligned players. Win by equalling or outnumbering the village.
    Werewolf,
    /// Village-aligned players. Win by eliminating every werewolf.
    Village,
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::Werewolf => write!(f, "Werewolves"),
            Team::Village => write!(f, "Village"),
        }
    }
}

/// The closed set of role tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleKind {
    /// Kills one player per night with the pack.
    Werewolf,
    /// Pack leader. Kills with the pack at night, shoots on death.
    WolfKing,
    /// No abilities.
    Villager,
    /// Inspects one player's alignment per night.
    Seer,
    /// Carries one antidote and one poison, each single-use.
    Witch,
    /// Shoots one player when eliminated.
    Hunter,
    /// Protects one player per night from the werewolf kill.
    Guard,
}

impl RoleKind {
    /// All role tags, in catalog order.
    pub const ALL: [RoleKind; 7] = [
        RoleKind::Werewolf,
        RoleKind::WolfKing,
        RoleKind::Villager,
        RoleKind::Seer,
        RoleKind::Witch,
        RoleKind::Hunter,
        RoleKind::Guard,
    ];

    /// Team affiliation of this role.
    #[must_use]
    pub const fn team(self) -> Team {
        match self {
            RoleKind::Werewolf | RoleKind::WolfKing => Team::Werewolf,
            _ => Team::Village,
        }
    }

    /// Whether this role counts toward the werewolf faction.
    #[must_use]
    pub const fn is_werewolf_aligned(self) -> bool {
        matches!(self.team(), Team::Werewolf)
    }

    /// Display name used in narration and summaries.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            RoleKind::Werewolf => "Werewolf",
            RoleKind::WolfKing => "Wolf King",
            RoleKind::Villager => "Villager",
            RoleKind::Seer => "Seer",
            RoleKind::Witch => "Witch",
            RoleKind::Hunter => "Hunter",
            RoleKind::Guard => "Guard",
        }
    }

    /// Whether this role takes a turn during the night.
    #[must_use]
    pub const fn can_act_at_night(self) -> bool {
        !matches!(self, RoleKind::Villager | RoleKind::Hunter)
    }

    /// Whether this role carries a death-triggered shot.
    #[must_use]
    pub const fn has_death_shot(self) -> bool {
        matches!(self, RoleKind::Hunter | RoleKind::WolfKing)
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_map() {
        assert_eq!(RoleKind::Werewolf.team(), Team::Werewolf);
        assert_eq!(RoleKind::WolfKing.team(), Team::Werewolf);
        assert_eq!(RoleKind::Villager.team(), Team::Village);
        assert_eq!(RoleKind::Seer.team(), Team::Village);
        assert_eq!(RoleKind::Witch.team(), Team::Village);
        assert_eq!(RoleKind::Hunter.team(), Team::Village);
        assert_eq!(RoleKind::Guard.team(), Team::Village);
    }

    #[test]
    fn test_night_actors() {
        assert!(RoleKind::Werewolf.can_act_at_night());
        assert!(RoleKind::Seer.can_act_at_night());
        assert!(RoleKind::Witch.can_act_at_night());
        assert!(RoleKind::Guard.can_act_at_night());
        assert!(!RoleKind::Villager.can_act_at_night());
        assert!(!RoleKind::Hunter.can_act_at_night());
    }

    #[test]
    fn test_death_shot_holders() {
        assert!(RoleKind::Hunter.has_death_shot());
        assert!(RoleKind::WolfKing.has_death_shot());
        assert!(!RoleKind::Werewolf.has_death_shot());
        assert!(!RoleKind::Seer.has_death_shot());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&RoleKind::WolfKing).unwrap();
        let back: RoleKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RoleKind::WolfKing);
    }
}
