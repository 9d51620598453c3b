//! Tilt Tower - a see-saw block stacking game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (seesaw physics, wind, game state)
//! - `tuning`: Data-driven game balance
//! - `content`: Image/keyword content the block factory draws from
//! - `score`: Rank/medal result glue
//! - `highscores`: LocalStorage leaderboard
//! - `audio`: Procedural audio cues

pub mod audio;
pub mod content;
pub mod highscores;
pub mod score;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{DifficultyMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Board dimensions (logical pixels, portrait)
    pub const BOARD_WIDTH: f32 = 400.0;
    pub const BOARD_HEIGHT: f32 = 800.0;
    /// Horizontal center of the board (the see-saw pivot X)
    pub const BOARD_CENTER_X: f32 = BOARD_WIDTH / 2.0;

    /// See-saw platform
    pub const PLATFORM_Y: f32 = 650.0;
    pub const PLATFORM_WIDTH: f32 = 220.0;
    pub const PLATFORM_HALF_WIDTH: f32 = PLATFORM_WIDTH / 2.0;
    pub const PLATFORM_THICKNESS: f32 = 16.0;

    /// Blocks below this Y have fallen off the tower
    pub const FALL_THRESHOLD_Y: f32 = 750.0;
    /// Horizontal overshoot past the board edges that counts as fallen
    pub const FALL_SIDE_MARGIN: f32 = 100.0;

    /// Pending block oscillation
    pub const SPAWN_Y: f32 = 60.0;
    pub const OSC_LEFT_BOUND: f32 = 40.0;
    pub const OSC_RIGHT_BOUND: f32 = 360.0;

    /// Round shape
    pub const TOTAL_BLOCKS: u32 = 10;
    pub const ROUND_DURATION_SECS: f32 = 60.0;
}

/// Apparent (axis-aligned bounding box) height of a `w`×`h` rectangle
/// rotated by `angle_deg`.
#[inline]
pub fn rotated_extent_y(width: f32, height: f32, angle_deg: f32) -> f32 {
    let rad = angle_deg.to_radians();
    width * rad.sin().abs() + height * rad.cos().abs()
}

/// Apparent width of a rotated rectangle (X extent of its bounding box).
#[inline]
pub fn rotated_extent_x(width: f32, height: f32, angle_deg: f32) -> f32 {
    let rad = angle_deg.to_radians();
    width * rad.cos().abs() + height * rad.sin().abs()
}

/// Nearest multiple of 90 degrees
#[inline]
pub fn snap_to_right_angle(angle_deg: f32) -> f32 {
    (angle_deg / 90.0).round() * 90.0
}
