//! Game events and visibility rules.
//!
//! Every observable thing that happens in a game is recorded as a
//! `GameEvent` with a `VisibilityRule`. Filtering happens at read time:
//! the log stores everything once and answers per-viewer queries, so a
//! seer check is written exactly once and only the seer ever reads it
//! back, until the game ends and `reveal_on_game_end` rules open up.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Player, PlayerId, PlayerStatus};
use crate::engine::Phase;
use crate::roles::{RoleKind, Team};

/// Who may read an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityScope {
    /// Everyone.
    Public,
    /// Only the listed players.
    Private { players: SmallVec<[PlayerId; 2]> },
    /// Every player on one of the listed teams.
    TeamBased { teams: SmallVec<[Team; 2]> },
    /// Every player holding one of the listed roles.
    RoleBased { roles: SmallVec<[RoleKind; 2]> },
}

/// A visibility scope plus the end-of-game reveal flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityRule {
    pub scope: VisibilityScope,
    /// Whether the event becomes public once the game has ended.
    pub reveal_on_game_end: bool,
}

impl VisibilityRule {
    #[must_use]
    pub fn public() -> Self {
        Self {
            scope: VisibilityScope::Public,
            reveal_on_game_end: true,
        }
    }

    /// Visible only to the listed players; revealed at game end.
    #[must_use]
    pub fn private_to(players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            scope: VisibilityScope::Private {
                players: players.into_iter().collect(),
            },
            reveal_on_game_end: true,
        }
    }

    /// Visible to one team; revealed at game end.
    #[must_use]
    pub fn team(team: Team) -> Self {
        Self {
            scope: VisibilityScope::TeamBased {
                teams: SmallVec::from_slice(&[team]),
            },
            reveal_on_game_end: true,
        }
    }

    /// Visible to holders of one role; revealed at game end.
    #[must_use]
    pub fn role(role: RoleKind) -> Self {
        Self {
            scope: VisibilityScope::RoleBased {
                roles: SmallVec::from_slice(&[role]),
            },
            reveal_on_game_end: true,
        }
    }

    /// Keep the event hidden even after the game ends.
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.reveal_on_game_end = false;
        self
    }

    /// Whether `viewer` may read an event carrying this rule.
    #[must_use]
    pub fn visible_to(&self, viewer: &Player, game_ended: bool) -> bool {
        if game_ended && self.reveal_on_game_end {
            return true;
        }
        match &self.scope {
            VisibilityScope::Public => true,
            VisibilityScope::Private { players } => players.contains(&viewer.id),
            VisibilityScope::TeamBased { teams } => teams.contains(&viewer.team()),
            VisibilityScope::RoleBased { roles } => roles.contains(&viewer.role),
        }
    }
}

/// What happened.
///
/// Name fields duplicate the roster's display names so a log entry can
/// be formatted without the state that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    GameStart {
        player_count: usize,
    },
    /// Dealt at game start to players who know their teammates.
    TeamReveal {
        team: Team,
        players: Vec<PlayerId>,
        names: Vec<String>,
    },
    PhaseChange {
        from: Phase,
        to: Phase,
        message: String,
    },
    /// One werewolf's kill vote. `committed` is set on the vote that
    /// finalizes the pack target.
    WerewolfKill {
        werewolf: PlayerId,
        target: PlayerId,
        target_name: String,
        committed: Option<PlayerId>,
    },
    SeerCheck {
        seer: PlayerId,
        target: PlayerId,
        target_name: String,
        is_werewolf: bool,
    },
    GuardProtect {
        guard: PlayerId,
        target: PlayerId,
        target_name: String,
    },
    WitchSave {
        witch: PlayerId,
        saved: PlayerId,
        saved_name: String,
    },
    WitchPoison {
        witch: PlayerId,
        target: PlayerId,
        target_name: String,
    },
    DeathShot {
        shooter: PlayerId,
        shooter_name: String,
        target: PlayerId,
        target_name: String,
    },
    Speech {
        speaker: PlayerId,
        speaker_name: String,
        content: String,
    },
    VoteCast {
        voter: PlayerId,
        voter_name: String,
        /// `None` is an abstention.
        target: Option<PlayerId>,
        target_name: Option<String>,
    },
    VoteResult {
        eliminated: Option<PlayerId>,
        message: String,
    },
    PlayerDeath {
        player: PlayerId,
        player_name: String,
        status: PlayerStatus,
    },
    NightResult {
        deaths: Vec<PlayerId>,
        message: String,
    },
    GameEnd {
        winner: Team,
        total_rounds: u32,
        summary: String,
    },
}

/// One log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Monotonic sequence number; the authoritative ordering.
    pub seq: u64,
    pub kind: EventKind,
    pub phase: Phase,
    pub round: u32,
    /// Wall-clock milliseconds since the Unix epoch. Informational only;
    /// ordering is by `seq`.
    pub timestamp_ms: u64,
    pub visibility: VisibilityRule,
}
