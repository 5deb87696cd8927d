//! The mutable game state aggregate.
//!
//! `GameState` owns the roster, the current phase and round, the day
//! ballot, and the night-action scratch space. It is pure data behind
//! accessor/mutator contracts: no method here enforces game rules
//! (killing an already-dead player again is not an error at this layer).
//! Rule enforcement belongs to the action resolver and vote manager.
//!
//! Exactly one `GameState` exists per game, owned by one `GameEngine`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::player::{Player, PlayerId, PlayerStatus};
use super::rng::{GameRng, GameRngState};
use crate::engine::Phase;
use crate::roles::{RoleKind, Team};

/// A seer investigation result for one night.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeerResult {
    pub target: PlayerId,
    pub is_werewolf: bool,
}

/// Per-round night-action scratch space.
///
/// Reset wholesale at each NIGHT_START transition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightActions {
    /// Per-actor kill votes from werewolf-aligned players.
    pub werewolf_votes: FxHashMap<PlayerId, PlayerId>,
    /// Finalized pack target, committed once all votes are in.
    pub werewolf_target: Option<PlayerId>,
    pub seer_target: Option<PlayerId>,
    pub seer_result: Option<SeerResult>,
    pub guard_target: Option<PlayerId>,
    /// Whether the witch spent the antidote on tonight's victim.
    pub witch_saved: bool,
    pub witch_poison_target: Option<PlayerId>,
}

/// The single mutable aggregate for one running game.
pub struct GameState {
    config: GameConfig,
    phase: Phase,
    round: u32,
    players: Vec<Player>,
    /// Day ballot: voter -> target, `None` meaning abstain.
    votes: FxHashMap<PlayerId, Option<PlayerId>>,
    night: NightActions,
    /// Players who died since the last night started, for announcements.
    last_deaths: Vec<PlayerId>,
    /// The guard's target from the previous round. The resolver rejects
    /// protecting the same player on consecutive nights.
    guard_previous_target: Option<PlayerId>,
    witch_antidote_used: bool,
    witch_poison_used: bool,
    /// Deterministic RNG for dealing and tie-breaking.
    pub rng: GameRng,
}

impl GameState {
    /// Create a fresh state in the INIT phase, round 0, empty roster.
    #[must_use]
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            phase: Phase::Init,
            round: 0,
            players: Vec::new(),
            votes: FxHashMap::default(),
            night: NightActions::default(),
            last_deaths: Vec::new(),
            guard_previous_target: None,
            witch_antidote_used: false,
            witch_poison_used: false,
            rng: GameRng::new(seed),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Display name for a player, or a placeholder for unknown ids.
    #[must_use]
    pub fn player_name(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| format!("{id}"))
    }

    pub fn players_by_role(&self, role: RoleKind) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.role == role)
    }

    pub fn alive_players_by_role(&self, role: RoleKind) -> impl Iterator<Item = &Player> {
        self.alive_players().filter(move |p| p.role == role)
    }

    pub fn alive_players_by_team(&self, team: Team) -> impl Iterator<Item = &Player> {
        self.alive_players().filter(move |p| p.team() == team)
    }

    #[must_use]
    pub fn human_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_human)
    }

    pub fn npc_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_human)
    }

    #[must_use]
    pub fn votes(&self) -> &FxHashMap<PlayerId, Option<PlayerId>> {
        &self.votes
    }

    /// Tally the ballot by target, ignoring abstentions.
    #[must_use]
    pub fn vote_tally(&self) -> FxHashMap<PlayerId, u32> {
        let mut counts = FxHashMap::default();
        for target in self.votes.values().flatten() {
            *counts.entry(*target).or_insert(0) += 1;
        }
        counts
    }

    #[must_use]
    pub fn night(&self) -> &NightActions {
        &self.night
    }

    #[must_use]
    pub fn last_deaths(&self) -> &[PlayerId] {
        &self.last_deaths
    }

    #[must_use]
    pub fn guard_previous_target(&self) -> Option<PlayerId> {
        self.guard_previous_target
    }

    #[must_use]
    pub fn witch_antidote_used(&self) -> bool {
        self.witch_antidote_used
    }

    #[must_use]
    pub fn witch_poison_used(&self) -> bool {
        self.witch_poison_used
    }

    // === Mutators ===

    /// Install the roster. Called once, at initialization.
    ///
    /// Asserts the single-human invariant; violating it is a caller
    /// defect, not a recoverable condition.
    pub fn set_players(&mut self, players: Vec<Player>) {
        let humans = players.iter().filter(|p| p.is_human).count();
        assert!(humans == 1, "exactly one human player required, got {humans}");
        self.players = players;
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn increment_round(&mut self) {
        self.round += 1;
    }

    /// Set a player's status to a dead variant and record the death for
    /// the next announcement. Unknown ids are ignored.
    pub fn kill_player(&mut self, id: PlayerId, status: PlayerStatus) {
        assert!(status.is_dead(), "kill_player requires a dead status");
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            player.status = status;
            self.last_deaths.push(id);
        }
    }

    pub fn cast_vote(&mut self, voter: PlayerId, target: Option<PlayerId>) {
        self.votes.insert(voter, target);
    }

    pub fn clear_votes(&mut self) {
        self.votes.clear();
    }

    pub fn set_werewolf_vote(&mut self, wolf: PlayerId, target: PlayerId) {
        self.night.werewolf_votes.insert(wolf, target);
    }

    pub fn set_werewolf_target(&mut self, target: Option<PlayerId>) {
        self.night.werewolf_target = target;
    }

    pub fn set_seer_action(&mut self, target: PlayerId, is_werewolf: bool) {
        self.night.seer_target = Some(target);
        self.night.seer_result = Some(SeerResult { target, is_werewolf });
    }

    pub fn set_guard_target(&mut self, target: PlayerId) {
        self.night.guard_target = Some(target);
    }

    pub fn set_witch_saved(&mut self) {
        self.night.witch_saved = true;
        self.witch_antidote_used = true;
    }

    pub fn set_witch_poison(&mut self, target: PlayerId) {
        self.night.witch_poison_target = Some(target);
        self.witch_poison_used = true;
    }

    /// Clear the night scratch space for a new round, rolling the guard
    /// target into the previous-round slot.
    pub fn reset_night_actions(&mut self) {
        self.guard_previous_target = self.night.guard_target;
        self.night = NightActions::default();
    }

    pub fn clear_last_deaths(&mut self) {
        self.last_deaths.clear();
    }

    // === Snapshot ===

    /// Capture a serializable snapshot of the full state, including the
    /// RNG position. Not contractually bit-exact across versions.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            config: self.config,
            phase: self.phase,
            round: self.round,
            players: self.players.clone(),
            votes: self.votes.clone(),
            night: self.night.clone(),
            last_deaths: self.last_deaths.clone(),
            guard_previous_target: self.guard_previous_target,
            witch_antidote_used: self.witch_antidote_used,
            witch_poison_used: self.witch_poison_used,
            rng: self.rng.state(),
        }
    }

    /// Rebuild a state from a snapshot.
    #[must_use]
    pub fn restore(snapshot: StateSnapshot) -> Self {
        Self {
            config: snapshot.config,
            phase: snapshot.phase,
            round: snapshot.round,
            players: snapshot.players,
            votes: snapshot.votes,
            night: snapshot.night,
            last_deaths: snapshot.last_deaths,
            guard_previous_target: snapshot.guard_previous_target,
            witch_antidote_used: snapshot.witch_antidote_used,
            witch_poison_used: snapshot.witch_poison_used,
            rng: GameRng::from_state(&snapshot.rng),
        }
    }
}

/// Serializable image of a `GameState`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub config: GameConfig,
    pub phase: Phase,
    pub round: u32,
    pub players: Vec<Player>,
    pub votes: FxHashMap<PlayerId, Option<PlayerId>>,
    pub night: NightActions,
    pub last_deaths: Vec<PlayerId>,
    pub guard_previous_target: Option<PlayerId>,
    pub witch_antidote_used: bool,
    pub witch_poison_used: bool,
    pub rng: GameRngState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Player> {
        vec![
            Player::new(PlayerId::new(0), 1, RoleKind::Werewolf, true, None),
            Player::new(PlayerId::new(1), 2, RoleKind::Werewolf, false, None),
            Player::new(PlayerId::new(2), 3, RoleKind::Seer, false, None),
            Player::new(PlayerId::new(3), 4, RoleKind::Villager, false, None),
        ]
    }

    fn state() -> GameState {
        let mut state = GameState::new(GameConfig::classic_six(), 42);
        state.set_players(roster());
        state
    }

    #[test]
    fn test_new_state_is_init_round_zero() {
        let state = GameState::new(GameConfig::classic_six(), 42);
        assert_eq!(state.phase(), Phase::Init);
        assert_eq!(state.round(), 0);
        assert!(state.players().is_empty());
    }

    #[test]
    #[should_panic(expected = "exactly one human player")]
    fn test_two_humans_rejected() {
        let mut players = roster();
        players[1].is_human = true;
        GameState::new(GameConfig::classic_six(), 42).set_players(players);
    }

    #[test]
    fn test_alive_players_tracks_kills() {
        let mut state = state();
        assert_eq!(state.alive_count(), 4);

        state.kill_player(PlayerId::new(2), PlayerStatus::KilledByWerewolf);

        assert_eq!(state.alive_count(), 3);
        assert_eq!(state.last_deaths(), &[PlayerId::new(2)]);
        assert_eq!(
            state.player(PlayerId::new(2)).unwrap().status,
            PlayerStatus::KilledByWerewolf
        );
    }

    #[test]
    fn test_kill_unknown_player_is_ignored() {
        let mut state = state();
        state.kill_player(PlayerId::new(99), PlayerStatus::Executed);
        assert_eq!(state.alive_count(), 4);
        assert!(state.last_deaths().is_empty());
    }

    #[test]
    #[should_panic(expected = "dead status")]
    fn test_kill_with_alive_status_is_a_defect() {
        let mut state = state();
        state.kill_player(PlayerId::new(0), PlayerStatus::Alive);
    }

    #[test]
    fn test_vote_tally_ignores_abstentions() {
        let mut state = state();
        state.cast_vote(PlayerId::new(0), Some(PlayerId::new(3)));
        state.cast_vote(PlayerId::new(1), Some(PlayerId::new(3)));
        state.cast_vote(PlayerId::new(2), None);

        let tally = state.vote_tally();
        assert_eq!(tally.get(&PlayerId::new(3)), Some(&2));
        assert_eq!(tally.len(), 1);
    }

    #[test]
    fn test_night_scratch_reset_rolls_guard_target() {
        let mut state = state();
        state.set_werewolf_vote(PlayerId::new(0), PlayerId::new(3));
        state.set_werewolf_target(Some(PlayerId::new(3)));
        state.set_seer_action(PlayerId::new(1), true);
        state.set_guard_target(PlayerId::new(2));

        state.reset_night_actions();

        assert_eq!(state.night(), &NightActions::default());
        assert_eq!(state.guard_previous_target(), Some(PlayerId::new(2)));
    }

    #[test]
    fn test_witch_potions_survive_night_reset() {
        let mut state = state();
        state.set_witch_saved();
        state.set_witch_poison(PlayerId::new(3));
        state.reset_night_actions();

        assert!(state.witch_antidote_used());
        assert!(state.witch_poison_used());
        assert!(!state.night().witch_saved);
    }

    #[test]
    fn test_players_by_role_and_team() {
        let state = state();
        assert_eq!(state.players_by_role(RoleKind::Werewolf).count(), 2);
        assert_eq!(state.alive_players_by_team(Team::Village).count(), 2);
        assert!(state.human_player().unwrap().is_human);
        assert_eq!(state.npc_players().count(), 3);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = state();
        state.set_phase(Phase::Vote);
        state.increment_round();
        state.cast_vote(PlayerId::new(0), Some(PlayerId::new(2)));
        state.kill_player(PlayerId::new(3), PlayerStatus::Executed);
        state.rng.gen_range(0..100);

        let bytes = bincode::serialize(&state.snapshot()).unwrap();
        let snapshot: StateSnapshot = bincode::deserialize(&bytes).unwrap();
        let mut restored = GameState::restore(snapshot);

        assert_eq!(restored.phase(), Phase::Vote);
        assert_eq!(restored.round(), 1);
        assert_eq!(restored.players(), state.players());
        assert_eq!(restored.votes(), state.votes());
        // RNG continues from the captured position.
        assert_eq!(restored.rng.gen_range(0..1000), state.rng.gen_range(0..1000));
    }
}
