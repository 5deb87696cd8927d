//! Win-condition evaluation.
//!
//! Checked after every death, before any phase advance. The village wins
//! the moment no werewolf-aligned player lives; the werewolves win the
//! moment they equal or outnumber the living village.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{GameState, PlayerId};
use crate::roles::Team;

/// Final result of a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Team,
    pub total_rounds: u32,
    pub survivors: Vec<PlayerId>,
    pub deceased: Vec<PlayerId>,
    /// Full roster reveal, one line per player.
    pub summary: String,
}

/// Evaluates the two win conditions.
#[derive(Clone, Copy, Debug, Default)]
pub struct WinChecker;

impl WinChecker {
    /// `Some` when a side has won, `None` while the game continues.
    ///
    /// Village victory is checked first: with zero living werewolves the
    /// counts can never favor the pack.
    #[must_use]
    pub fn check(&self, state: &GameState) -> Option<GameResult> {
        let wolves = state.alive_players_by_team(Team::Werewolf).count();
        let village = state.alive_players_by_team(Team::Village).count();

        let winner = if wolves == 0 {
            Team::Village
        } else if wolves >= village {
            Team::Werewolf
        } else {
            return None;
        };

        debug!(%winner, wolves, village, "win condition met");
        Some(self.build_result(state, winner))
    }

    fn build_result(&self, state: &GameState, winner: Team) -> GameResult {
        let survivors: Vec<PlayerId> = state.alive_players().map(|p| p.id).collect();
        let deceased: Vec<PlayerId> = state
            .players()
            .iter()
            .filter(|p| !p.is_alive())
            .map(|p| p.id)
            .collect();

        let roster: Vec<String> = state
            .players()
            .iter()
            .map(|p| {
                let fate = if p.is_alive() {
                    "survived".to_string()
                } else {
                    p.status.to_string()
                };
                format!("{} was the {} ({fate})", p.display_name, p.role)
            })
            .collect();

        GameResult {
            winner,
            total_rounds: state.round(),
            survivors,
            deceased,
            summary: roster.join("\n"),
        }
    }
}
