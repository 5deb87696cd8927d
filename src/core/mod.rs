//! Core data model: players, configuration, state, actions, RNG.
//!
//! Pure data plus accessor/mutator contracts. Business rules live in the
//! `engine` modules; role capabilities live in `roles`.

pub mod action;
pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionData, ActionOutcome};
pub use config::{ConfigError, GameConfig};
pub use player::{NpcProfile, Player, PlayerId, PlayerStatus};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, NightActions, SeerResult, StateSnapshot};
