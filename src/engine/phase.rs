//! The game phase state machine.
//!
//! ## Cycle
//!
//! INIT -> NIGHT_START -> (night turns) -> DAY_START -> DISCUSSION ->
//! VOTE -> EXECUTION -> NIGHT_START -> ... with GAME_END reachable from
//! anywhere and absorbing.
//!
//! Night turns run in a fixed order (guard, werewolves, witch, seer) and
//! a turn is entered only while a living holder of its duty role exists.
//! On the classic board with neither guard nor witch this collapses to
//! the werewolf turn followed by the seer turn.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::GameState;
use crate::roles::RoleKind;

/// Game phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Pre-game. No roster yet.
    Init,
    /// Night falls: round counter bumps, night scratch space resets.
    NightStart,
    GuardTurn,
    WerewolfTurn,
    WitchTurn,
    SeerTurn,
    /// Night actions resolve and deaths are announced.
    DayStart,
    Discussion,
    Vote,
    /// The vote result is applied.
    Execution,
    /// Absorbing. Entered the moment a win condition holds.
    GameEnd,
}

impl Phase {
    /// Night turn order. Turns without a living duty holder are skipped.
    pub const NIGHT_SCHEDULE: [Phase; 4] = [
        Phase::GuardTurn,
        Phase::WerewolfTurn,
        Phase::WitchTurn,
        Phase::SeerTurn,
    ];

    #[must_use]
    pub const fn is_night(self) -> bool {
        matches!(
            self,
            Phase::NightStart
                | Phase::GuardTurn
                | Phase::WerewolfTurn
                | Phase::WitchTurn
                | Phase::SeerTurn
        )
    }

    #[must_use]
    pub const fn is_day(self) -> bool {
        matches!(
            self,
            Phase::DayStart | Phase::Discussion | Phase::Vote | Phase::Execution
        )
    }

    /// Roles that act during this phase. Empty outside night turns.
    #[must_use]
    pub const fn duty_roles(self) -> &'static [RoleKind] {
        match self {
            Phase::GuardTurn => &[RoleKind::Guard],
            Phase::WerewolfTurn => &[RoleKind::Werewolf, RoleKind::WolfKing],
            Phase::WitchTurn => &[RoleKind::Witch],
            Phase::SeerTurn => &[RoleKind::Seer],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Init => "init",
            Phase::NightStart => "night start",
            Phase::GuardTurn => "guard turn",
            Phase::WerewolfTurn => "werewolf turn",
            Phase::WitchTurn => "witch turn",
            Phase::SeerTurn => "seer turn",
            Phase::DayStart => "day start",
            Phase::Discussion => "discussion",
            Phase::Vote => "vote",
            Phase::Execution => "execution",
            Phase::GameEnd => "game end",
        };
        write!(f, "{s}")
    }
}

/// Result of a phase advance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub success: bool,
    /// The phase in effect after the call.
    pub phase: Phase,
    /// Narration for the phase, suitable for direct display.
    pub message: String,
}

/// Drives the phase cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseManager;

impl PhaseManager {
    fn has_living_duty_holder(state: &GameState, phase: Phase) -> bool {
        phase
            .duty_roles()
            .iter()
            .any(|&role| state.alive_players_by_role(role).next().is_some())
    }

    /// First night turn at or after `from` in the schedule with a living
    /// duty holder, else DAY_START.
    fn next_night_turn(state: &GameState, from: usize) -> Phase {
        Phase::NIGHT_SCHEDULE[from..]
            .iter()
            .copied()
            .find(|&turn| Self::has_living_duty_holder(state, turn))
            .unwrap_or(Phase::DayStart)
    }

    /// The phase that follows the current one, without side effects.
    #[must_use]
    pub fn next_phase(&self, state: &GameState) -> Phase {
        let schedule_after = |phase| {
            let index = Phase::NIGHT_SCHEDULE
                .iter()
                .position(|&p| p == phase)
                .map_or(0, |i| i + 1);
            Self::next_night_turn(state, index)
        };

        match state.phase() {
            Phase::Init | Phase::Execution => Phase::NightStart,
            Phase::NightStart => Self::next_night_turn(state, 0),
            p @ (Phase::GuardTurn | Phase::WerewolfTurn | Phase::WitchTurn | Phase::SeerTurn) => {
                schedule_after(p)
            }
            Phase::DayStart => Phase::Discussion,
            Phase::Discussion => Phase::Vote,
            Phase::Vote => Phase::Execution,
            Phase::GameEnd => Phase::GameEnd,
        }
    }

    /// Advance to the next phase, applying entry side effects.
    ///
    /// Entering NIGHT_START bumps the round counter and resets the night
    /// scratch space, the day ballot, and the death announcements. The
    /// GAME_END phase is absorbing: advancing from it fails.
    pub fn advance(&self, state: &mut GameState) -> PhaseTransition {
        if state.phase() == Phase::GameEnd {
            return PhaseTransition {
                success: false,
                phase: Phase::GameEnd,
                message: "The game has already ended.".to_string(),
            };
        }

        let next = self.next_phase(state);
        if next == Phase::NightStart {
            state.increment_round();
            state.reset_night_actions();
            state.clear_votes();
            state.clear_last_deaths();
        }
        state.set_phase(next);
        debug!(phase = %next, round = state.round(), "phase advanced");

        PhaseTransition {
            success: true,
            phase: next,
            message: self.phase_message(state),
        }
    }

    /// Narration for the current phase.
    #[must_use]
    pub fn phase_message(&self, state: &GameState) -> String {
        match state.phase() {
            Phase::Init => "Waiting for the game to start.".to_string(),
            Phase::NightStart => format!(
                "Night {} falls. Everyone, close your eyes.",
                state.round()
            ),
            Phase::GuardTurn => "Guard, wake up. Choose someone to protect.".to_string(),
            Phase::WerewolfTurn => "Werewolves, wake up. Choose your victim.".to_string(),
            Phase::WitchTurn => "Witch, wake up.".to_string(),
            Phase::SeerTurn => "Seer, wake up. Choose someone to inspect.".to_string(),
            Phase::DayStart => format!(
                "Day {} breaks. Everyone, open your eyes.",
                state.round()
            ),
            Phase::Discussion => "The village gathers to discuss.".to_string(),
            Phase::Vote => "Time to vote. Choose a player to eliminate.".to_string(),
            Phase::Execution => "The votes are tallied.".to_string(),
            Phase::GameEnd => "The game has ended.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, Player, PlayerId, PlayerStatus};

    fn classic_state() -> GameState {
        let mut state = GameState::new(GameConfig::classic_six(), 42);
        state.set_players(vec![
            Player::new(PlayerId::new(0), 1, RoleKind::Werewolf, true, None),
            Player::new(PlayerId::new(1), 2, RoleKind::Werewolf, false, None),
            Player::new(PlayerId::new(2), 3, RoleKind::Seer, false, None),
            Player::new(PlayerId::new(3), 4, RoleKind::Villager, false, None),
            Player::new(PlayerId::new(4), 5, RoleKind::Villager, false, None),
            Player::new(PlayerId::new(5), 6, RoleKind::Villager, false, None),
        ]);
        state
    }

    #[test]
    fn test_classic_cycle_skips_guard_and_witch() {
        let mut state = classic_state();
        let phases = PhaseManager;
        let expected = [
            Phase::NightStart,
            Phase::WerewolfTurn,
            Phase::SeerTurn,
            Phase::DayStart,
            Phase::Discussion,
            Phase::Vote,
            Phase::Execution,
            Phase::NightStart,
        ];
        for want in expected {
            let t = phases.advance(&mut state);
            assert!(t.success);
            assert_eq!(t.phase, want);
        }
        assert_eq!(state.round(), 2);
    }

    #[test]
    fn test_dead_seer_turn_is_skipped() {
        let mut state = classic_state();
        state.kill_player(PlayerId::new(2), PlayerStatus::Executed);
        let phases = PhaseManager;

        phases.advance(&mut state); // NightStart
        phases.advance(&mut state); // WerewolfTurn
        let t = phases.advance(&mut state);
        assert_eq!(t.phase, Phase::DayStart);
    }

    #[test]
    fn test_full_schedule_with_guard_and_witch() {
        let mut state = classic_state();
        let mut players = state.players().to_vec();
        players[3] = Player::new(PlayerId::new(3), 4, RoleKind::Guard, false, None);
        players[4] = Player::new(PlayerId::new(4), 5, RoleKind::Witch, false, None);
        state.set_players(players);

        let phases = PhaseManager;
        phases.advance(&mut state); // NightStart
        assert_eq!(phases.advance(&mut state).phase, Phase::GuardTurn);
        assert_eq!(phases.advance(&mut state).phase, Phase::WerewolfTurn);
        assert_eq!(phases.advance(&mut state).phase, Phase::WitchTurn);
        assert_eq!(phases.advance(&mut state).phase, Phase::SeerTurn);
        assert_eq!(phases.advance(&mut state).phase, Phase::DayStart);
    }

    #[test]
    fn test_night_start_resets_round_state() {
        let mut state = classic_state();
        let phases = PhaseManager;
        state.cast_vote(PlayerId::new(0), Some(PlayerId::new(3)));
        state.kill_player(PlayerId::new(5), PlayerStatus::Executed);

        let t = phases.advance(&mut state);
        assert_eq!(t.phase, Phase::NightStart);
        assert_eq!(state.round(), 1);
        assert!(state.votes().is_empty());
        assert!(state.last_deaths().is_empty());
        assert!(t.message.contains("Night 1"));
    }

    #[test]
    fn test_game_end_is_absorbing() {
        let mut state = classic_state();
        state.set_phase(Phase::GameEnd);
        let t = PhaseManager.advance(&mut state);
        assert!(!t.success);
        assert_eq!(t.phase, Phase::GameEnd);
        assert_eq!(state.phase(), Phase::GameEnd);
    }

    #[test]
    fn test_phase_predicates() {
        assert!(Phase::WerewolfTurn.is_night());
        assert!(Phase::Vote.is_day());
        assert!(!Phase::GameEnd.is_night());
        assert!(!Phase::GameEnd.is_day());
        assert_eq!(
            Phase::WerewolfTurn.duty_roles(),
            &[RoleKind::Werewolf, RoleKind::WolfKing]
        );
    }
}
