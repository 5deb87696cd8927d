//! Game rules: phases, night resolution, voting, win conditions, and
//! the engine facade that ties them together.

pub mod game;
pub mod phase;
pub mod resolver;
pub mod votes;
pub mod win;

pub use game::{EngineSnapshot, GameEngine};
pub use phase::{Phase, PhaseManager, PhaseTransition};
pub use resolver::{ActionResolver, NightResolution};
pub use votes::{VoteManager, VoteResult};
pub use win::{GameResult, WinChecker};
