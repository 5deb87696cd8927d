//! The game engine facade.
//!
//! `GameEngine` owns the state, the event log, and the rule components,
//! and is the only API external callers need: initialize, advance
//! phases, submit actions, resolve votes, and query per-player views.
//!
//! The engine never generates behavior. Deciding what an NPC says or
//! targets is the caller's job (typically a dialogue model); the engine
//! validates submissions, applies them, and keeps the filtered history
//! that feeds those decisions back.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{
    Action, ActionOutcome, ConfigError, GameConfig, GameState, NpcProfile, Player, PlayerId,
    PlayerStatus, StateSnapshot,
};
use crate::history::{EventKind, EventLog, GameEvent, VisibilityRule};
use crate::roles::{
    death_shot_targets, distribute_roles, night_targets, RoleKind, Team,
};

use super::phase::{Phase, PhaseManager, PhaseTransition};
use super::resolver::ActionResolver;
use super::votes::{VoteManager, VoteResult};
use super::win::{GameResult, WinChecker};

/// One complete game of Werewolf.
pub struct GameEngine {
    state: GameState,
    log: EventLog,
    phases: PhaseManager,
    resolver: ActionResolver,
    votes: VoteManager,
    win: WinChecker,
    /// A dead Hunter or Wolf King whose shot has not been taken yet.
    /// While armed, the win check is deferred.
    pending_death_shot: Option<PlayerId>,
    result: Option<GameResult>,
    seed: u64,
}

impl GameEngine {
    /// Create an engine with an empty table. Call `initialize` before
    /// anything else.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(GameConfig::default(), seed),
            log: EventLog::new(),
            phases: PhaseManager,
            resolver: ActionResolver,
            votes: VoteManager,
            win: WinChecker,
            pending_death_shot: None,
            result: None,
            seed,
        }
    }

    /// Validate the config, deal roles, and seat the table.
    ///
    /// `human_id` is the caller's identifier for the human seat; NPC ids
    /// are allocated around it. `profiles` are attached to NPC seats in
    /// seat order. A `forced_human_role` must be present in the config.
    ///
    /// On error nothing is mutated and the engine stays uninitialized.
    pub fn initialize(
        &mut self,
        config: GameConfig,
        human_id: PlayerId,
        profiles: Vec<NpcProfile>,
        forced_human_role: Option<RoleKind>,
    ) -> Result<(), ConfigError> {
        let mut state = GameState::new(config, self.seed);
        let players = distribute_roles(
            &config,
            human_id,
            profiles,
            forced_human_role,
            &mut state.rng,
        )?;
        state.set_players(players);

        self.state = state;
        self.log = EventLog::new();
        self.pending_death_shot = None;
        self.result = None;

        self.record(
            EventKind::GameStart {
                player_count: config.player_count,
            },
            VisibilityRule::public(),
        );

        // Werewolves learn their pack at deal time.
        let pack: Vec<&Player> = self
            .state
            .players()
            .iter()
            .filter(|p| p.role.is_werewolf_aligned())
            .collect();
        if pack.len() > 1 {
            let kind = EventKind::TeamReveal {
                team: Team::Werewolf,
                players: pack.iter().map(|p| p.id).collect(),
                names: pack.iter().map(|p| p.display_name.clone()).collect(),
            };
            self.record(kind, VisibilityRule::team(Team::Werewolf));
        }

        info!(
            players = config.player_count,
            seed = self.seed,
            "game initialized"
        );
        Ok(())
    }

    fn record(&mut self, kind: EventKind, visibility: VisibilityRule) {
        self.log
            .record(kind, self.state.phase(), self.state.round(), visibility);
    }

    /// Advance to the next phase.
    ///
    /// Entering DAY_START resolves the night: deaths are applied and
    /// announced, death shots are armed, and the win check runs.
    pub fn next_phase(&mut self) -> PhaseTransition {
        let from = self.state.phase();
        let transition = self.phases.advance(&mut self.state);
        if !transition.success {
            return transition;
        }

        self.record(
            EventKind::PhaseChange {
                from,
                to: transition.phase,
                message: transition.message.clone(),
            },
            VisibilityRule::public(),
        );

        if transition.phase == Phase::DayStart {
            self.resolve_night();
        }
        transition
    }

    fn resolve_night(&mut self) {
        let resolution = self.resolver.resolve_night(&mut self.state);
        self.record(
            EventKind::NightResult {
                deaths: resolution.deaths.clone(),
                message: resolution.message.clone(),
            },
            VisibilityRule::public(),
        );
        for death in resolution.deaths {
            self.announce_death(death);
        }
        self.check_game_end();
    }

    /// Log a death publicly and arm the death shot when the victim
    /// holds one and was not poisoned.
    fn announce_death(&mut self, id: PlayerId) {
        let Some(player) = self.state.player(id) else {
            return;
        };
        let kind = EventKind::PlayerDeath {
            player: id,
            player_name: player.display_name.clone(),
            status: player.status,
        };
        let can_shoot =
            player.role.has_death_shot() && player.status != PlayerStatus::Poisoned;
        self.record(kind, VisibilityRule::public());
        if can_shoot {
            debug!(shooter = %id, "death shot armed");
            self.pending_death_shot = Some(id);
        }
    }

    /// Submit one player action for the current phase.
    ///
    /// Rule violations and wrong-phase submissions come back as failed
    /// outcomes with state untouched. Accepted actions are logged with
    /// the visibility their kind calls for.
    pub fn execute_action(&mut self, action: Action) -> ActionOutcome {
        if self.result.is_some() {
            return ActionOutcome::fail("The game has already ended.");
        }
        if action.round() != self.state.round() {
            return ActionOutcome::fail(format!(
                "stale action from round {}, the game is in round {}",
                action.round(),
                self.state.round()
            ));
        }

        match action {
            Action::WerewolfKill { actor, target, .. } => {
                self.gated(Phase::WerewolfTurn, |e| {
                    let outcome = e.resolver.handle_werewolf_kill(&mut e.state, actor, target);
                    if outcome.success {
                        let committed = match &outcome.data {
                            Some(crate::core::ActionData::TargetChosen { committed, .. }) => {
                                *committed
                            }
                            _ => None,
                        };
                        let kind = EventKind::WerewolfKill {
                            werewolf: actor,
                            target,
                            target_name: e.state.player_name(target),
                            committed,
                        };
                        e.record(kind, VisibilityRule::team(Team::Werewolf));
                    }
                    outcome
                })
            }
            Action::SeerCheck { actor, target, .. } => self.gated(Phase::SeerTurn, |e| {
                let outcome = e.resolver.handle_seer_check(&mut e.state, actor, target);
                if outcome.success {
                    let is_werewolf = matches!(
                        &outcome.data,
                        Some(crate::core::ActionData::Investigation { is_werewolf: true, .. })
                    );
                    let kind = EventKind::SeerCheck {
                        seer: actor,
                        target,
                        target_name: e.state.player_name(target),
                        is_werewolf,
                    };
                    e.record(kind, VisibilityRule::private_to([actor]));
                }
                outcome
            }),
            Action::GuardProtect { actor, target, .. } => self.gated(Phase::GuardTurn, |e| {
                let outcome = e.resolver.handle_guard_protect(&mut e.state, actor, target);
                if outcome.success {
                    let kind = EventKind::GuardProtect {
                        guard: actor,
                        target,
                        target_name: e.state.player_name(target),
                    };
                    e.record(kind, VisibilityRule::private_to([actor]));
                }
                outcome
            }),
            Action::WitchSave { actor, .. } => self.gated(Phase::WitchTurn, |e| {
                let victim = e.state.night().werewolf_target;
                let outcome = e.resolver.handle_witch_save(&mut e.state, actor);
                if outcome.success {
                    if let Some(saved) = victim {
                        let kind = EventKind::WitchSave {
                            witch: actor,
                            saved,
                            saved_name: e.state.player_name(saved),
                        };
                        e.record(kind, VisibilityRule::private_to([actor]));
                    }
                }
                outcome
            }),
            Action::WitchPoison { actor, target, .. } => self.gated(Phase::WitchTurn, |e| {
                let outcome = e.resolver.handle_witch_poison(&mut e.state, actor, target);
                if outcome.success {
                    let kind = EventKind::WitchPoison {
                        witch: actor,
                        target,
                        target_name: e.state.player_name(target),
                    };
                    e.record(kind, VisibilityRule::private_to([actor]));
                }
                outcome
            }),
            Action::Vote { actor, target, .. } => self.gated(Phase::Vote, |e| {
                let outcome = e.votes.cast_vote(&mut e.state, actor, target);
                if outcome.success {
                    let kind = EventKind::VoteCast {
                        voter: actor,
                        voter_name: e.state.player_name(actor),
                        target,
                        target_name: target.map(|t| e.state.player_name(t)),
                    };
                    e.record(kind, VisibilityRule::public());
                }
                outcome
            }),
            Action::Speech { actor, content, .. } => self.gated(Phase::Discussion, |e| {
                let Some(speaker) = e.state.player(actor) else {
                    return ActionOutcome::fail(format!("unknown player {actor}"));
                };
                if !speaker.is_alive() {
                    return ActionOutcome::fail("the dead do not speak");
                }
                let kind = EventKind::Speech {
                    speaker: actor,
                    speaker_name: speaker.display_name.clone(),
                    content,
                };
                e.record(kind, VisibilityRule::public());
                ActionOutcome::ok("Your words are heard")
            }),
            Action::DeathShot { actor, target, .. } => self.handle_death_shot(actor, target),
        }
    }

    fn gated(
        &mut self,
        phase: Phase,
        f: impl FnOnce(&mut Self) -> ActionOutcome,
    ) -> ActionOutcome {
        if self.state.phase() != phase {
            return ActionOutcome::fail(format!(
                "that action belongs to the {phase} phase, not {}",
                self.state.phase()
            ));
        }
        f(self)
    }

    /// Death shots interrupt the normal phase gating: they fire the
    /// moment the holder's death is announced, in whatever phase.
    fn handle_death_shot(&mut self, actor: PlayerId, target: PlayerId) -> ActionOutcome {
        if self.pending_death_shot != Some(actor) {
            return ActionOutcome::fail("no shot is pending for you");
        }
        let shooter_name = self.state.player_name(actor);
        let outcome = self.resolver.handle_death_shot(&mut self.state, actor, target);
        if outcome.success {
            self.pending_death_shot = None;
            let kind = EventKind::DeathShot {
                shooter: actor,
                shooter_name,
                target,
                target_name: self.state.player_name(target),
            };
            self.record(kind, VisibilityRule::public());
            self.announce_death(target);
            self.check_game_end();
        }
        outcome
    }

    /// Forfeit a pending death shot. Unblocks the deferred win check.
    pub fn skip_death_shot(&mut self, actor: PlayerId) -> ActionOutcome {
        if self.pending_death_shot != Some(actor) {
            return ActionOutcome::fail("no shot is pending for you");
        }
        self.pending_death_shot = None;
        self.check_game_end();
        ActionOutcome::ok("You lower your weapon")
    }

    /// Tally the day's ballot, apply the elimination, and log it.
    ///
    /// Meant to be called in the EXECUTION phase; callable earlier for a
    /// forced tally.
    pub fn resolve_vote(&mut self) -> VoteResult {
        let result = self.votes.calculate_result(&self.state);
        self.record(
            EventKind::VoteResult {
                eliminated: result.eliminated,
                message: result.message.clone(),
            },
            VisibilityRule::public(),
        );
        self.votes.execute_result(&mut self.state, &result);
        if let Some(eliminated) = result.eliminated {
            self.announce_death(eliminated);
        }
        self.check_game_end();
        result
    }

    /// Run the win check, finishing the game when a side has won.
    ///
    /// Idempotent. Deferred while a death shot is pending, since the
    /// shot can still change the board.
    pub fn check_game_end(&mut self) -> Option<&GameResult> {
        if self.result.is_some() {
            return self.result.as_ref();
        }
        if self.pending_death_shot.is_some() {
            return None;
        }
        let result = self.win.check(&self.state)?;

        self.record(
            EventKind::GameEnd {
                winner: result.winner,
                total_rounds: result.total_rounds,
                summary: result.summary.clone(),
            },
            VisibilityRule::public(),
        );
        self.state.set_phase(Phase::GameEnd);
        self.log.set_game_ended();
        info!(winner = %result.winner, rounds = result.total_rounds, "game over");
        self.result = Some(result);
        self.result.as_ref()
    }

    // === Queries ===

    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn current_round(&self) -> u32 {
        self.state.round()
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        self.state.players()
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.state.alive_players()
    }

    #[must_use]
    pub fn human_player(&self) -> Option<&Player> {
        self.state.human_player()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn pending_death_shooter(&self) -> Option<PlayerId> {
        self.pending_death_shot
    }

    /// Players killed since the current night began.
    #[must_use]
    pub fn last_deaths(&self) -> &[PlayerId] {
        self.state.last_deaths()
    }

    /// Legal targets for the human player right now: their pending death
    /// shot, their night action, or the day vote, depending on phase.
    #[must_use]
    pub fn valid_targets_for_human(&self) -> Vec<PlayerId> {
        let Some(human) = self.state.human_player() else {
            return Vec::new();
        };
        if self.pending_death_shot == Some(human.id) {
            return death_shot_targets(human, &self.state);
        }
        if !human.is_alive() {
            return Vec::new();
        }

        match self.state.phase() {
            phase if phase.duty_roles().contains(&human.role) => {
                night_targets(human, &self.state)
            }
            Phase::Vote => self
                .state
                .alive_players()
                .filter(|p| p.id != human.id)
                .map(|p| p.id)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Players the current phase is waiting on.
    #[must_use]
    pub fn players_needing_action(&self) -> Vec<PlayerId> {
        if let Some(shooter) = self.pending_death_shot {
            return vec![shooter];
        }
        let night = self.state.night();
        match self.state.phase() {
            Phase::WerewolfTurn if night.werewolf_target.is_none() => self
                .state
                .alive_players()
                .filter(|p| p.role.is_werewolf_aligned())
                .filter(|p| !night.werewolf_votes.contains_key(&p.id))
                .map(|p| p.id)
                .collect(),
            Phase::SeerTurn if night.seer_target.is_none() => self
                .state
                .alive_players_by_role(RoleKind::Seer)
                .map(|p| p.id)
                .collect(),
            Phase::GuardTurn if night.guard_target.is_none() => self
                .state
                .alive_players_by_role(RoleKind::Guard)
                .map(|p| p.id)
                .collect(),
            Phase::WitchTurn => {
                let has_potion = !self.state.witch_antidote_used()
                    || !self.state.witch_poison_used();
                let acted = night.witch_saved || night.witch_poison_target.is_some();
                if has_potion && !acted {
                    self.state
                        .alive_players_by_role(RoleKind::Witch)
                        .map(|p| p.id)
                        .collect()
                } else {
                    Vec::new()
                }
            }
            Phase::Vote => self
                .state
                .alive_players()
                .filter(|p| !self.state.votes().contains_key(&p.id))
                .map(|p| p.id)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Keep an externally generated choice inside the legal candidate
    /// set, drawing a random fallback when it strays.
    pub fn coerce_choice(
        &mut self,
        candidates: &[PlayerId],
        chosen: Option<PlayerId>,
    ) -> Option<PlayerId> {
        match chosen {
            Some(pick) if candidates.contains(&pick) => Some(pick),
            _ => self.state.rng.choose(candidates).copied(),
        }
    }

    /// Events `viewer` may read, in order.
    #[must_use]
    pub fn history_for_player(&self, viewer: PlayerId) -> Vec<GameEvent> {
        match self.state.player(viewer) {
            Some(player) => self.log.events_for_player(player).cloned().collect(),
            None => Vec::new(),
        }
    }

    /// The unfiltered log, for post-game review.
    #[must_use]
    pub fn full_history(&self) -> Vec<GameEvent> {
        self.log.all_events().cloned().collect()
    }

    /// Discussion lines the viewer has heard, formatted "Name: content".
    #[must_use]
    pub fn discussion_context(&self, viewer: PlayerId) -> Vec<String> {
        match self.state.player(viewer) {
            Some(player) => self.log.discussion_context(player),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn full_discussion(&self) -> String {
        self.log.full_discussion()
    }

    /// The current round's discussion, cut off before the given speaker
    /// index. Context for a participant who has not spoken yet.
    #[must_use]
    pub fn discussion_up_to(&self, speaker_index: usize) -> Vec<String> {
        self.log
            .discussion_up_to(self.state.round(), speaker_index)
    }

    /// Deaths and eliminations from one round, formatted for narration.
    #[must_use]
    pub fn round_key_events(&self, round: u32) -> Vec<String> {
        self.log.round_key_events(round)
    }

    /// Everything the viewer has seen, rendered to English lines.
    #[must_use]
    pub fn game_summary_for_player(&self, viewer: PlayerId) -> String {
        match self.state.player(viewer) {
            Some(player) => self.log.summary_for_player(player),
            None => String::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Capture the whole engine for persistence.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            state: self.state.snapshot(),
            log: self.log.clone(),
            pending_death_shot: self.pending_death_shot,
            result: self.result.clone(),
            seed: self.seed,
        }
    }

    /// Rebuild an engine from a snapshot.
    #[must_use]
    pub fn restore(snapshot: EngineSnapshot) -> Self {
        Self {
            state: GameState::restore(snapshot.state),
            log: snapshot.log,
            phases: PhaseManager,
            resolver: ActionResolver,
            votes: VoteManager,
            win: WinChecker,
            pending_death_shot: snapshot.pending_death_shot,
            result: snapshot.result,
            seed: snapshot.seed,
        }
    }
}

/// Serializable image of a `GameEngine`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: StateSnapshot,
    pub log: EventLog,
    pub pending_death_shot: Option<PlayerId>,
    pub result: Option<GameResult>,
    pub seed: u64,
}
