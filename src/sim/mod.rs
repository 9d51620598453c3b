//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//! - State owned by `GameState`, never ambient globals

pub mod pending;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use pending::{DropPose, PendingBlock};
pub use physics::{PhysicsWorld, SeesawState, WindState};
pub use spawner::{BlockConfig, BlockKind, DifficultySnapshot};
pub use state::{DroppedBlock, GameOverReason, GamePhase, GameState, RoundEvent};
pub use tick::{TickInput, tick};
