//! Night-action validation and resolution.
//!
//! Each handler validates one submitted action against the live state
//! and records it in the night scratch space. Rule violations come back
//! as failed `ActionOutcome`s with state untouched; nothing dies until
//! `resolve_night` runs at DAY_START.
//!
//! ## Werewolf consensus
//!
//! Every living werewolf-aligned player casts a kill vote. The pack
//! target commits on the last vote: plurality wins, and a tie among the
//! top targets is broken uniformly at random, over the tied candidates
//! only, in id order so the draw is seed-reproducible.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{
    ActionData, ActionOutcome, GameState, Player, PlayerId, PlayerStatus, SeerResult,
};
use crate::roles::{check_night_action, RoleKind};

/// What the night produced, for the day announcement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NightResolution {
    /// Players killed tonight, in resolution order.
    pub deaths: Vec<PlayerId>,
    /// The seer's result, delivered privately.
    pub seer_result: Option<SeerResult>,
    /// Public announcement text.
    pub message: String,
}

/// Validates night actions and resolves them into deaths.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionResolver;

impl ActionResolver {
    fn living_actor<'a>(state: &'a GameState, actor: PlayerId) -> Result<&'a Player, ActionOutcome> {
        match state.player(actor) {
            Some(p) if p.is_alive() => Ok(p),
            Some(p) => Err(ActionOutcome::fail(format!("{} is dead", p.display_name))),
            None => Err(ActionOutcome::fail(format!("unknown player {actor}"))),
        }
    }

    /// Record one werewolf's kill vote and commit the pack target once
    /// every living werewolf-aligned player has voted.
    pub fn handle_werewolf_kill(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        target: PlayerId,
    ) -> ActionOutcome {
        let actor_player = match Self::living_actor(state, actor) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        if !actor_player.role.is_werewolf_aligned() {
            return ActionOutcome::fail("only werewolves choose the kill target");
        }
        if state.night().werewolf_target.is_some() {
            return ActionOutcome::fail("the pack target is already settled");
        }
        let Some(target_player) = state.player(target) else {
            return ActionOutcome::fail(format!("unknown player {target}"));
        };

        let checked = check_night_action(actor_player, target_player);
        if !checked.success {
            return checked;
        }
        let message = checked.message;

        state.set_werewolf_vote(actor, target);
        let committed = self.finalize_werewolf_target(state);

        ActionOutcome::ok_with(message, ActionData::TargetChosen { target, committed })
    }

    /// Commit the pack target if every living werewolf-aligned player
    /// has voted. Returns the committed target.
    fn finalize_werewolf_target(&self, state: &mut GameState) -> Option<PlayerId> {
        let wolves: Vec<PlayerId> = state
            .alive_players()
            .filter(|p| p.role.is_werewolf_aligned())
            .map(|p| p.id)
            .collect();
        let votes = &state.night().werewolf_votes;
        if wolves.iter().any(|w| !votes.contains_key(w)) {
            return None;
        }

        let mut tally: FxHashMap<PlayerId, u32> = FxHashMap::default();
        for wolf in &wolves {
            if let Some(target) = votes.get(wolf) {
                *tally.entry(*target).or_insert(0) += 1;
            }
        }
        let top = tally.values().copied().max()?;
        let mut candidates: Vec<PlayerId> = tally
            .iter()
            .filter(|(_, &count)| count == top)
            .map(|(&target, _)| target)
            .collect();
        candidates.sort_unstable();

        let target = if candidates.len() == 1 {
            candidates[0]
        } else {
            // Random draw over the tied candidates only.
            *state
                .rng
                .choose(&candidates)
                .unwrap_or(&candidates[0])
        };

        debug!(%target, votes = wolves.len(), "pack target committed");
        state.set_werewolf_target(Some(target));
        Some(target)
    }

    /// The seer inspects one player's alignment.
    pub fn handle_seer_check(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        target: PlayerId,
    ) -> ActionOutcome {
        let actor_player = match Self::living_actor(state, actor) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        if actor_player.role != RoleKind::Seer {
            return ActionOutcome::fail("only the seer inspects");
        }
        if state.night().seer_target.is_some() {
            return ActionOutcome::fail("you already inspected someone tonight");
        }
        let Some(target_player) = state.player(target) else {
            return ActionOutcome::fail(format!("unknown player {target}"));
        };

        let checked = check_night_action(actor_player, target_player);
        if !checked.success {
            return checked;
        }

        let is_werewolf = target_player.role.is_werewolf_aligned();
        let name = target_player.display_name.clone();
        state.set_seer_action(target, is_werewolf);

        let verdict = if is_werewolf { "a werewolf" } else { "not a werewolf" };
        ActionOutcome::ok_with(
            format!("{name} is {verdict}"),
            ActionData::Investigation { target, is_werewolf },
        )
    }

    /// The guard shields one player for tonight. Protecting the same
    /// player on consecutive nights is rejected.
    pub fn handle_guard_protect(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        target: PlayerId,
    ) -> ActionOutcome {
        let actor_player = match Self::living_actor(state, actor) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        if actor_player.role != RoleKind::Guard {
            return ActionOutcome::fail("only the guard protects");
        }
        if state.night().guard_target.is_some() {
            return ActionOutcome::fail("you already chose someone to protect tonight");
        }
        let Some(target_player) = state.player(target) else {
            return ActionOutcome::fail(format!("unknown player {target}"));
        };
        if state.guard_previous_target() == Some(target) {
            return ActionOutcome::fail(format!(
                "you cannot protect {} two nights in a row",
                target_player.display_name
            ));
        }

        let checked = check_night_action(actor_player, target_player);
        if !checked.success {
            return checked;
        }

        state.set_guard_target(target);
        checked
    }

    /// The witch spends the antidote on tonight's werewolf victim.
    /// At most one potion may be used per night.
    pub fn handle_witch_save(&self, state: &mut GameState, actor: PlayerId) -> ActionOutcome {
        let actor_player = match Self::living_actor(state, actor) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        if actor_player.role != RoleKind::Witch {
            return ActionOutcome::fail("only the witch has the antidote");
        }
        if state.witch_antidote_used() {
            return ActionOutcome::fail("the antidote is already spent");
        }
        if state.night().witch_poison_target.is_some() {
            return ActionOutcome::fail("you may use only one potion each night");
        }
        let Some(victim) = state.night().werewolf_target else {
            return ActionOutcome::fail("no one needs saving tonight");
        };

        let name = state.player_name(victim);
        state.set_witch_saved();
        ActionOutcome::ok(format!("You saved {name} with the antidote"))
    }

    /// The witch spends the poison on a living player. At most one
    /// potion may be used per night.
    pub fn handle_witch_poison(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        target: PlayerId,
    ) -> ActionOutcome {
        let actor_player = match Self::living_actor(state, actor) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        if actor_player.role != RoleKind::Witch {
            return ActionOutcome::fail("only the witch has the poison");
        }
        if state.witch_poison_used() {
            return ActionOutcome::fail("the poison is already spent");
        }
        if state.night().witch_saved {
            return ActionOutcome::fail("you may use only one potion each night");
        }
        let Some(target_player) = state.player(target) else {
            return ActionOutcome::fail(format!("unknown player {target}"));
        };

        let checked = check_night_action(actor_player, target_player);
        if !checked.success {
            return checked;
        }

        state.set_witch_poison(target);
        checked
    }

    /// A dead Hunter or Wolf King fires the death-triggered shot.
    ///
    /// The engine arms the shot when the holder dies; this handler
    /// enforces the role, the poison block, and target legality, and
    /// applies the kill immediately.
    pub fn handle_death_shot(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        target: PlayerId,
    ) -> ActionOutcome {
        let Some(actor_player) = state.player(actor) else {
            return ActionOutcome::fail(format!("unknown player {actor}"));
        };
        if !actor_player.role.has_death_shot() {
            return ActionOutcome::fail(format!("the {} has no shot", actor_player.role));
        }
        if actor_player.is_alive() {
            return ActionOutcome::fail("the shot only fires on death");
        }
        if actor_player.status == PlayerStatus::Poisoned {
            return ActionOutcome::fail("the poison silences the shot");
        }
        let Some(target_player) = state.player(target) else {
            return ActionOutcome::fail(format!("unknown player {target}"));
        };
        if target == actor {
            return ActionOutcome::fail("you cannot shoot yourself");
        }
        if !target_player.is_alive() {
            return ActionOutcome::fail(format!(
                "{} is already dead",
                target_player.display_name
            ));
        }

        let name = target_player.display_name.clone();
        state.kill_player(target, PlayerStatus::Shot);
        ActionOutcome::ok(format!("You shot {name}"))
    }

    /// Resolve the night into deaths at DAY_START.
    ///
    /// The werewolf victim, if still alive, dies unless the guard
    /// protected them or the witch spent the antidote. The poison target
    /// dies regardless of protection. Order of deaths in the
    /// announcement is wolf kill first, then poison.
    pub fn resolve_night(&self, state: &mut GameState) -> NightResolution {
        let night = state.night().clone();
        let mut deaths = Vec::new();

        if let Some(victim) = night.werewolf_target {
            let guarded = night.guard_target == Some(victim);
            let saved = night.witch_saved;
            let alive = state.player(victim).is_some_and(Player::is_alive);
            if !guarded && !saved && alive {
                state.kill_player(victim, PlayerStatus::KilledByWerewolf);
                deaths.push(victim);
            }
        }

        if let Some(poisoned) = night.witch_poison_target {
            if state.player(poisoned).is_some_and(Player::is_alive) {
                state.kill_player(poisoned, PlayerStatus::Poisoned);
                deaths.push(poisoned);
            }
        }

        let message = if deaths.is_empty() {
            "It was a peaceful night. No one died.".to_string()
        } else {
            let names: Vec<String> = deaths.iter().map(|&id| state.player_name(id)).collect();
            format!("Last night, {} died.", names.join(" and "))
        };

        debug!(deaths = deaths.len(), "night resolved");
        NightResolution {
            deaths,
            seer_result: night.seer_result,
            message,
        }
    }
}
