//! Game configuration and validation.
//!
//! A `GameConfig` fixes the player count and the per-role deal before the
//! game starts. Validation runs at `initialize` and fails fast with a
//! `ConfigError`; no state is mutated on a rejected config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roles::RoleKind;

/// Configuration errors. Surfaced from `initialize` before any state
/// mutation; reaching an end user with one of these is a caller bug.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("role counts sum to {total} but the game has {players} players")]
    RoleCountMismatch { total: usize, players: usize },

    #[error("at least one werewolf-aligned role is required")]
    NoWerewolves,

    #[error("{wolves} werewolf-aligned roles is too many for {players} players")]
    TooManyWerewolves { wolves: usize, players: usize },

    #[error("at most one seer is allowed, got {0}")]
    TooManySeers(usize),
}

/// Player count and per-role counts for one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub player_count: usize,
    pub werewolves: usize,
    pub wolf_kings: usize,
    pub villagers: usize,
    pub seers: usize,
    pub witches: usize,
    pub hunters: usize,
    pub guards: usize,
}

impl GameConfig {
    /// The basic six-player board: 2 werewolves, 3 villagers, 1 seer.
    #[must_use]
    pub const fn classic_six() -> Self {
        Self {
            player_count: 6,
            werewolves: 2,
            wolf_kings: 0,
            villagers: 3,
            seers: 1,
            witches: 0,
            hunters: 0,
            guards: 0,
        }
    }

    /// Number of seats the role counts add up to.
    #[must_use]
    pub const fn role_total(&self) -> usize {
        self.werewolves
            + self.wolf_kings
            + self.villagers
            + self.seers
            + self.witches
            + self.hunters
            + self.guards
    }

    /// Number of werewolf-aligned seats.
    #[must_use]
    pub const fn werewolf_aligned(&self) -> usize {
        self.werewolves + self.wolf_kings
    }

    /// Count configured for a single role.
    #[must_use]
    pub const fn count_of(&self, kind: RoleKind) -> usize {
        match kind {
            RoleKind::Werewolf => self.werewolves,
            RoleKind::WolfKing => self.wolf_kings,
            RoleKind::Villager => self.villagers,
            RoleKind::Seer => self.seers,
            RoleKind::Witch => self.witches,
            RoleKind::Hunter => self.hunters,
            RoleKind::Guard => self.guards,
        }
    }

    /// Expand the config into a flat role multiset, catalog order.
    #[must_use]
    pub fn role_multiset(&self) -> Vec<RoleKind> {
        let mut roles = Vec::with_capacity(self.role_total());
        for kind in RoleKind::ALL {
            for _ in 0..self.count_of(kind) {
                roles.push(kind);
            }
        }
        roles
    }

    /// Validate the config.
    ///
    /// Rejects: role counts not summing to the player count, zero
    /// werewolf-aligned roles, werewolf-aligned count reaching half the
    /// table, more than one seer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let total = self.role_total();
        if total != self.player_count {
            return Err(ConfigError::RoleCountMismatch {
                total,
                players: self.player_count,
            });
        }

        let wolves = self.werewolf_aligned();
        if wolves == 0 {
            return Err(ConfigError::NoWerewolves);
        }
        if wolves * 2 >= self.player_count {
            return Err(ConfigError::TooManyWerewolves {
                wolves,
                players: self.player_count,
            });
        }

        if self.seers > 1 {
            return Err(ConfigError::TooManySeers(self.seers));
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic_six()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_six_is_valid() {
        assert_eq!(GameConfig::classic_six().validate(), Ok(()));
    }

    #[test]
    fn test_role_multiset_matches_counts() {
        let config = GameConfig {
            player_count: 9,
            werewolves: 2,
            wolf_kings: 1,
            villagers: 2,
            seers: 1,
            witches: 1,
            hunters: 1,
            guards: 1,
        };
        assert_eq!(config.validate(), Ok(()));

        let roles = config.role_multiset();
        assert_eq!(roles.len(), 9);
        for kind in RoleKind::ALL {
            let count = roles.iter().filter(|&&r| r == kind).count();
            assert_eq!(count, config.count_of(kind), "{kind}");
        }
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let mut config = GameConfig::classic_six();
        config.villagers = 4;
        assert_eq!(
            config.validate(),
            Err(ConfigError::RoleCountMismatch { total: 7, players: 6 })
        );
    }

    #[test]
    fn test_zero_werewolves_rejected() {
        let config = GameConfig {
            player_count: 6,
            werewolves: 0,
            wolf_kings: 0,
            villagers: 5,
            seers: 1,
            witches: 0,
            hunters: 0,
            guards: 0,
        };
        assert_eq!(config.validate(), Err(ConfigError::NoWerewolves));
    }

    #[test]
    fn test_half_werewolves_rejected() {
        let config = GameConfig {
            player_count: 6,
            werewolves: 3,
            wolf_kings: 0,
            villagers: 2,
            seers: 1,
            witches: 0,
            hunters: 0,
            guards: 0,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyWerewolves { wolves: 3, players: 6 })
        );
    }

    #[test]
    fn test_wolf_king_counts_as_werewolf() {
        let config = GameConfig {
            player_count: 6,
            werewolves: 2,
            wolf_kings: 1,
            villagers: 2,
            seers: 1,
            witches: 0,
            hunters: 0,
            guards: 0,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyWerewolves { wolves: 3, players: 6 })
        );
    }

    #[test]
    fn test_two_seers_rejected() {
        let config = GameConfig {
            player_count: 8,
            werewolves: 2,
            wolf_kings: 0,
            villagers: 4,
            seers: 2,
            witches: 0,
            hunters: 0,
            guards: 0,
        };
        assert_eq!(config.validate(), Err(ConfigError::TooManySeers(2)));
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::RoleCountMismatch { total: 7, players: 6 };
        assert_eq!(
            err.to_string(),
            "role counts sum to 7 but the game has 6 players"
        );
    }
}
