//! # werewolf-engine
//!
//! A deterministic rules engine for Werewolf (Mafia) social-deduction
//! games with one human player and model-driven NPCs.
//!
//! ## Design Principles
//!
//! 1. **Rules, Not Behavior**: The engine validates and applies actions
//!    and keeps the filtered history. Deciding what NPCs say and target
//!    is the caller's job.
//!
//! 2. **Deterministic**: One seeded RNG drives the deal and every
//!    tie-break, so a seed plus an action sequence replays a whole game.
//!
//! 3. **Visibility at Read Time**: Every event is stored once with a
//!    visibility rule; per-player views are filters over the one log.
//!
//! ## Architecture
//!
//! - **Phase FSM**: INIT -> night turns -> day -> vote -> execution,
//!   looping until a win condition holds. Night turns without a living
//!   duty holder are skipped.
//!
//! - **Persistent Event Log**: Append-only `im` vector, O(1) to clone
//!   for snapshots.
//!
//! ## Modules
//!
//! - `core`: Player identity, configuration, state, actions, RNG
//! - `roles`: Role tags, capability tables, role assignment
//! - `history`: The per-player-visible event log
//! - `engine`: Phases, night resolution, voting, win conditions, facade
//!
//! ## Example
//!
//! ```
//! use werewolf_engine::{GameConfig, GameEngine, PlayerId};
//!
//! let mut engine = GameEngine::new(42);
//! engine
//!     .initialize(GameConfig::classic_six(), PlayerId::new(0), Vec::new(), None)
//!     .unwrap();
//! let night = engine.next_phase();
//! assert!(night.success);
//! ```

pub mod core;
pub mod engine;
pub mod history;
pub mod roles;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionData, ActionOutcome, ConfigError, GameConfig, GameRng, GameRngState, GameState,
    NightActions, NpcProfile, Player, PlayerId, PlayerStatus, SeerResult, StateSnapshot,
};

pub use crate::roles::{
    default_npc_profiles, distribute_roles, night_targets, RoleKind, RoleSpec, Team,
};

pub use crate::history::{EventKind, EventLog, GameEvent, VisibilityRule, VisibilityScope};

pub use crate::engine::{
    EngineSnapshot, GameEngine, GameResult, NightResolution, Phase, PhaseManager, PhaseTransition,
    VoteManager, VoteResult, WinChecker,
};
