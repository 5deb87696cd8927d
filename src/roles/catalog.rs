//! Role capability tables.
//!
//! Each role tag resolves to a static `RoleSpec` (team, display metadata,
//! ability list) plus target-eligibility queries. Everything here is a
//! read-only computation over the state: roles never mutate anything.
//! Callers apply accepted actions through the action resolver.

use crate::core::{ActionOutcome, GameState, Player, PlayerId};

use super::kind::{RoleKind, Team};

/// One ability on a role's card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ability {
    pub name: &'static str,
    pub description: &'static str,
    pub is_night_action: bool,
    pub requires_target: bool,
    /// `None` means usable every night the role acts.
    pub usage_limit: Option<u32>,
}

/// Static definition of a role's capabilities.
#[derive(Clone, Copy, Debug)]
pub struct RoleSpec {
    pub kind: RoleKind,
    pub team: Team,
    pub display_name: &'static str,
    pub description: &'static str,
    pub can_act_at_night: bool,
    pub abilities: &'static [Ability],
}

const KILL: Ability = Ability {
    name: "Kill",
    description: "Choose one player to kill with the pack each night",
    is_night_action: true,
    requires_target: true,
    usage_limit: None,
};

const INSPECT: Ability = Ability {
    name: "Inspect",
    description: "Learn one player's alignment each night",
    is_night_action: true,
    requires_target: true,
    usage_limit: None,
};

const ANTIDOTE: Ability = Ability {
    name: "Antidote",
    description: "Save the night's werewolf victim",
    is_night_action: true,
    requires_target: false,
    usage_limit: Some(1),
};

const POISON: Ability = Ability {
    name: "Poison",
    description: "Kill one living player",
    is_night_action: true,
    requires_target: true,
    usage_limit: Some(1),
};

const PROTECT: Ability = Ability {
    name: "Protect",
    description: "Shield one player from the werewolf kill, never the same player twice in a row",
    is_night_action: true,
    requires_target: true,
    usage_limit: None,
};

const DEATH_SHOT: Ability = Ability {
    name: "Death shot",
    description: "Take one player along when eliminated",
    is_night_action: false,
    requires_target: true,
    usage_limit: Some(1),
};

static WEREWOLF: RoleSpec = RoleSpec {
    kind: RoleKind::Werewolf,
    team: Team::Werewolf,
    display_name: "Werewolf",
    description: "Kills with the pack each night; knows the other werewolves",
    can_act_at_night: true,
    abilities: &[KILL],
};

static WOLF_KING: RoleSpec = RoleSpec {
    kind: RoleKind::WolfKing,
    team: Team::Werewolf,
    display_name: "Wolf King",
    description: "Kills with the pack; shoots one player on death, teammates included",
    can_act_at_night: true,
    abilities: &[KILL, DEATH_SHOT],
};

static VILLAGER: RoleSpec = RoleSpec {
    kind: RoleKind::Villager,
    team: Team::Village,
    display_name: "Villager",
    description: "No abilities; wins with the village",
    can_act_at_night: false,
    abilities: &[],
};

static SEER: RoleSpec = RoleSpec {
    kind: RoleKind::Seer,
    team: Team::Village,
    display_name: "Seer",
    description: "Learns one player's alignment each night",
    can_act_at_night: true,
    abilities: &[INSPECT],
};

static WITCH: RoleSpec = RoleSpec {
    kind: RoleKind::Witch,
    team: Team::Village,
    display_name: "Witch",
    description: "Carries one antidote and one poison",
    can_act_at_night: true,
    abilities: &[ANTIDOTE, POISON],
};

static HUNTER: RoleSpec = RoleSpec {
    kind: RoleKind::Hunter,
    team: Team::Village,
    display_name: "Hunter",
    description: "Shoots one player when eliminated, unless poisoned",
    can_act_at_night: false,
    abilities: &[DEATH_SHOT],
};

static GUARD: RoleSpec = RoleSpec {
    kind: RoleKind::Guard,
    team: Team::Village,
    display_name: "Guard",
    description: "Protects one player per night from the werewolf kill",
    can_act_at_night: true,
    abilities: &[PROTECT],
};

/// Look up the capability table for a role tag.
#[must_use]
pub fn spec(kind: RoleKind) -> &'static RoleSpec {
    match kind {
        RoleKind::Werewolf => &WEREWOLF,
        RoleKind::WolfKing => &WOLF_KING,
        RoleKind::Villager => &VILLAGER,
        RoleKind::Seer => &SEER,
        RoleKind::Witch => &WITCH,
        RoleKind::Hunter => &HUNTER,
        RoleKind::Guard => &GUARD,
    }
}

/// Legal targets for a role's night action.
///
/// - Werewolf / Wolf King: living players outside the werewolf faction.
/// - Seer: living players other than the actor.
/// - Witch (poison): living players other than the actor.
/// - Guard: living players including self, minus the previous round's
///   protection target.
/// - Villager / Hunter: none.
#[must_use]
pub fn night_targets(actor: &Player, state: &GameState) -> Vec<PlayerId> {
    match actor.role {
        RoleKind::Werewolf | RoleKind::WolfKing => state
            .alive_players()
            .filter(|p| !p.role.is_werewolf_aligned())
            .map(|p| p.id)
            .collect(),
        RoleKind::Seer | RoleKind::Witch => state
            .alive_players()
            .filter(|p| p.id != actor.id)
            .map(|p| p.id)
            .collect(),
        RoleKind::Guard => state
            .alive_players()
            .filter(|p| Some(p.id) != state.guard_previous_target())
            .map(|p| p.id)
            .collect(),
        RoleKind::Villager | RoleKind::Hunter => Vec::new(),
    }
}

/// Legal targets for a death-triggered shot: living players other than
/// the shooter. The Wolf King may shoot werewolf teammates.
#[must_use]
pub fn death_shot_targets(actor: &Player, state: &GameState) -> Vec<PlayerId> {
    if !actor.role.has_death_shot() {
        return Vec::new();
    }
    state
        .alive_players()
        .filter(|p| p.id != actor.id)
        .map(|p| p.id)
        .collect()
}

/// Validate a role's targeted night action without mutating anything.
///
/// Returns a displayable outcome; the resolver commits accepted actions.
#[must_use]
pub fn check_night_action(actor: &Player, target: &Player) -> ActionOutcome {
    match actor.role {
        RoleKind::Werewolf | RoleKind::WolfKing => {
            if !target.is_alive() {
                return ActionOutcome::fail(format!("{} is already dead", target.display_name));
            }
            if target.role.is_werewolf_aligned() {
                return ActionOutcome::fail("cannot kill a werewolf-aligned player");
            }
            ActionOutcome::ok(format!(
                "You chose {} as tonight's target",
                target.display_name
            ))
        }
        RoleKind::Seer => {
            if !target.is_alive() {
                return ActionOutcome::fail(format!("{} is already dead", target.display_name));
            }
            if target.id == actor.id {
                return ActionOutcome::fail("cannot inspect yourself");
            }
            ActionOutcome::ok(format!("You inspected {}", target.display_name))
        }
        RoleKind::Witch => {
            if !target.is_alive() {
                return ActionOutcome::fail(format!("{} is already dead", target.display_name));
            }
            if target.id == actor.id {
                return ActionOutcome::fail("cannot poison yourself");
            }
            ActionOutcome::ok(format!("You poisoned {}", target.display_name))
        }
        RoleKind::Guard => {
            if !target.is_alive() {
                return ActionOutcome::fail(format!("{} is already dead", target.display_name));
            }
            ActionOutcome::ok(format!("You are protecting {} tonight", target.display_name))
        }
        RoleKind::Villager | RoleKind::Hunter => {
            ActionOutcome::fail(format!("the {} has no night action", actor.role))
        }
    }
}
