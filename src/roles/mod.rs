//! Roles: tags, capability tables, and assignment.

pub mod assign;
pub mod catalog;
pub mod kind;

pub use assign::{default_npc_profiles, distribute_roles};
pub use catalog::{
    check_night_action, death_shot_targets, night_targets, spec, Ability, RoleSpec,
};
pub use kind::{RoleKind, Team};
