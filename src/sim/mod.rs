//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timesteps come in from the driver, already clamped
//! - Seeded RNG only (pickup wobble phases)
//! - Stable iteration order (map authoring order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod grid;
pub mod level;
pub mod tick;

pub use actor::{Actor, ActorKind, Contact};
pub use grid::{Grid, MapError, TileKind};
pub use level::{Level, Obstacle, Status};
pub use tick::{FrameDriver, Intent, step};
