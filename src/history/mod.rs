//! The per-player-visible event history.

pub mod event;
pub mod log;

pub use event::{EventKind, GameEvent, VisibilityRule, VisibilityScope};
pub use log::{format_event, EventLog};
