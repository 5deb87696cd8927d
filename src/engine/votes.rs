//! Day-vote collection and tallying.
//!
//! Living players each cast one vote for another living player (or
//! abstain). A strict plurality
//! eliminates its target; any tie for the top count eliminates no one.
//! The ballot is public, so there is no visibility machinery here.

use tracing::debug;

use crate::core::{ActionOutcome, GameState, PlayerId, PlayerStatus};

/// Outcome of tallying one day's ballot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteResult {
    pub eliminated: Option<PlayerId>,
    pub eliminated_name: Option<String>,
    /// The top count was shared, so no one is eliminated.
    pub is_tie: bool,
    /// Vote counts per target, highest first, ties in id order.
    pub tally: Vec<(PlayerId, u32)>,
    /// Public announcement text.
    pub message: String,
}

/// Collects and tallies the day vote.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoteManager;

impl VoteManager {
    /// Record one vote. `None` is an abstention. Dead voters, dead
    /// targets, and self-votes are rejected; re-voting overwrites.
    pub fn cast_vote(
        &self,
        state: &mut GameState,
        voter: PlayerId,
        target: Option<PlayerId>,
    ) -> ActionOutcome {
        let Some(voter_player) = state.player(voter) else {
            return ActionOutcome::fail(format!("unknown player {voter}"));
        };
        if !voter_player.is_alive() {
            return ActionOutcome::fail("the dead do not vote");
        }
        if target == Some(voter) {
            return ActionOutcome::fail("you cannot vote for yourself");
        }

        let message = match target {
            Some(target_id) => {
                let Some(target_player) = state.player(target_id) else {
                    return ActionOutcome::fail(format!("unknown player {target_id}"));
                };
                if !target_player.is_alive() {
                    return ActionOutcome::fail(format!(
                        "{} is already dead",
                        target_player.display_name
                    ));
                }
                format!("You voted for {}", target_player.display_name)
            }
            None => "You abstained".to_string(),
        };

        state.cast_vote(voter, target);
        ActionOutcome::ok(message)
    }

    /// Whether every living player has voted or abstained.
    #[must_use]
    pub fn all_voted(&self, state: &GameState) -> bool {
        state
            .alive_players()
            .all(|p| state.votes().contains_key(&p.id))
    }

    /// Tally the ballot. A strict plurality eliminates; a tie for the
    /// top count, or an all-abstain ballot, eliminates no one.
    #[must_use]
    pub fn calculate_result(&self, state: &GameState) -> VoteResult {
        let mut tally: Vec<(PlayerId, u32)> = state.vote_tally().into_iter().collect();
        tally.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let Some(&(top_target, top_count)) = tally.first() else {
            return VoteResult {
                eliminated: None,
                eliminated_name: None,
                is_tie: false,
                tally,
                message: "No votes were cast. No one is eliminated.".to_string(),
            };
        };

        let is_tie = tally.iter().filter(|(_, count)| *count == top_count).count() > 1;
        if is_tie {
            return VoteResult {
                eliminated: None,
                eliminated_name: None,
                is_tie: true,
                tally,
                message: "The vote is tied. No one is eliminated today.".to_string(),
            };
        }

        let name = state.player_name(top_target);
        debug!(target = %top_target, votes = top_count, "vote decided");
        VoteResult {
            eliminated: Some(top_target),
            eliminated_name: Some(name.clone()),
            is_tie: false,
            tally,
            message: format!("{name} is eliminated with {top_count} votes."),
        }
    }

    /// Apply a tally: kill the eliminated player, if any, and clear the
    /// ballot for the next day.
    pub fn execute_result(&self, state: &mut GameState, result: &VoteResult) {
        if let Some(eliminated) = result.eliminated {
            state.kill_player(eliminated, PlayerStatus::Executed);
        }
        state.clear_votes();
    }

    /// One line per vote, for the day recap.
    #[must_use]
    pub fn vote_summary(&self, state: &GameState) -> String {
        let mut entries: Vec<(PlayerId, Option<PlayerId>)> =
            state.votes().iter().map(|(&v, &t)| (v, t)).collect();
        entries.sort_unstable_by_key(|(voter, _)| *voter);

        entries
            .into_iter()
            .map(|(voter, target)| match target {
                Some(t) => format!(
                    "{} voted for {}",
                    state.player_name(voter),
                    state.player_name(t)
                ),
                None => format!("{} abstained", state.player_name(voter)),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
