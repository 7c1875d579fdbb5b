//! Commit Breakout - a contribution calendar replayed as a Breakout game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (brick wall, physics, strategies, tick loop)
//! - `calendar`: Activity data model and snapshot I/O
//! - `config`: Validated simulation configuration
//! - `render`: Frame-stream boundary consumed by external renderers

pub mod calendar;
pub mod config;
pub mod error;
pub mod render;
pub mod sim;

pub use config::{SimConfig, StrategyKind, StrengthTiers};
pub use error::Error;

/// Game tuning constants
pub mod consts {
    /// Rows in the brick grid (days per week)
    pub const GRID_ROWS: usize = 7;

    /// Brick cell edge length, world units
    pub const CELL_SIZE: f64 = 14.0;
    /// Gap between adjacent cells
    pub const CELL_GAP: f64 = 3.0;
    /// Center-to-center cell spacing
    pub const CELL_PITCH: f64 = CELL_SIZE + CELL_GAP;

    /// Clearance between the playfield edge and the brick grid
    pub const WALL_INSET: f64 = 10.0;
    /// Open space between the lowest brick row and the paddle
    pub const PADDLE_GAP: f64 = 80.0;
    /// Paddle top edge sits this far above the bottom bound
    pub const PADDLE_RAISE: f64 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 4.0;
    /// Ball speed, world units per tick (conserved across collisions)
    pub const BALL_SPEED: f64 = 3.0;
    /// Launch angle off vertical, degrees
    pub const LAUNCH_ANGLE_DEG: f64 = 15.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f64 = 60.0;
    pub const PADDLE_HEIGHT: f64 = 10.0;
    /// Maximum paddle travel per tick
    pub const PADDLE_SPEED: f64 = 5.0;
    /// Maximum deflection off vertical when the ball strikes the paddle, degrees
    pub const BOUNCE_ANGLE_MAX_DEG: f64 = 60.0;

    /// Score awarded for each destroyed brick
    pub const BRICK_SCORE: u64 = 50;

    /// Tick cap before a run is declared stalled
    pub const MAX_TICKS: u64 = 5000;
    /// Collision resolutions allowed within a single tick before the ball is
    /// snapped to a safe position
    pub const MAX_RESOLUTIONS_PER_TICK: u32 = 8;

    /// Seed used when the caller does not supply one
    pub const DEFAULT_SEED: u64 = 0x5eed_cafe;

    /// Tolerance for the speed-conservation invariant
    pub const SPEED_EPSILON: f64 = 1e-6;
}
