//! Gridhop - a 2D tile-grid platformer simulation core
//!
//! Core modules:
//! - `sim`: deterministic simulation (grid, actors, level state, frame driver)
//!
//! Rendering and input live outside this crate: a frontend samples held keys
//! into an [`Intent`], feeds it with a timestamp into the [`FrameDriver`]
//! each frame, and reads the level back as a read-only snapshot
//! ([`Level::grid`], [`Level::actors`], [`Level::status`]).

pub mod sim;

pub use sim::{
    Actor, ActorKind, FrameDriver, Grid, Intent, Level, MapError, Obstacle, Status, TileKind,
};

/// Game tuning constants
pub mod consts {
    use glam::DVec2;

    /// Horizontal run speed (tiles per second)
    pub const PLAYER_SPEED_X: f64 = 6.0;
    /// Downward acceleration (tiles per second squared)
    pub const GRAVITY: f64 = 22.0;
    /// Upward launch speed granted when a landing coincides with a jump intent
    pub const JUMP_FORCE: f64 = 10.0;
    /// Player bounding box
    pub const PLAYER_SIZE: DVec2 = DVec2::new(0.6, 0.6);
    /// Player spawn offset from its map tile origin
    pub const PLAYER_SPAWN_OFFSET: DVec2 = DVec2::new(0.2, 0.2);

    /// Pickup bounding box
    pub const PICKUP_SIZE: DVec2 = DVec2::new(0.5, 0.5);
    /// Pickup spawn offset from its map tile origin
    pub const PICKUP_SPAWN_OFFSET: DVec2 = DVec2::new(0.25, -0.25);
    /// Wobble phase advance (radians per second)
    pub const PICKUP_WOBBLE_SPEED: f64 = 7.0;
    /// Wobble amplitude (tiles)
    pub const PICKUP_WOBBLE_DIST: f64 = 0.1;

    /// Moving hazard bounding box
    pub const HAZARD_SIZE: DVec2 = DVec2::new(1.0, 1.0);
    /// Moving hazard patrol speed (tiles per second)
    pub const HAZARD_SPEED_X: f64 = 1.2;

    /// Upper bound on one frame's elapsed wall time (milliseconds). A longer
    /// stall (tab backgrounded, debugger pause) must not turn into a physics
    /// step large enough to tunnel an actor through a wall.
    pub const MAX_FRAME_MS: f64 = 100.0;
}
