//! Snake Rush - arcade snake on a bounded grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, power-ups, effects timing)
//! - `highscores`: Persisted best score
//! - `settings`: Presentation preferences

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, StoreError};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// All times are milliseconds on the host's monotonic clock.
pub mod consts {
    /// Grid side length in cells
    pub const GRID_SIZE: i32 = 30;
    /// Pixel size of one cell
    pub const CELL_SIZE: f32 = 20.0;
    /// Playfield size in pixels (square)
    pub const PLAYFIELD_PX: f32 = GRID_SIZE as f32 * CELL_SIZE;

    /// Interval between snake moves without Speed Boost
    pub const BASE_MOVE_DELAY_MS: u64 = 100;
    /// Starting snake length
    pub const START_LENGTH: usize = 3;

    /// Score per apple, and under Double Points
    pub const POINTS_PER_FOOD: u64 = 10;
    pub const DOUBLE_POINTS_PER_FOOD: u64 = 20;
    /// Apples that Double Points lasts for
    pub const DOUBLE_POINTS_USES: u32 = 5;
    /// Offer a power-up every N apples
    pub const POWERUP_EVERY_APPLES: u32 = 3;
    /// Number of power-ups offered at once
    pub const POWERUP_CHOICES: usize = 3;

    pub const GHOST_DURATION_MS: u64 = 6_000;
    pub const SPEED_BOOST_DURATION_MS: u64 = 5_000;
    pub const SPEED_BOOST_DELAY_FACTOR: f32 = 0.5;

    /// Obstacles requested per round
    pub const OBSTACLE_COUNT: usize = 15;

    pub const PARTICLE_LIFETIME_MS: u64 = 600;

    /// Screen shake decay window and trigger intensities (pixels)
    pub const SHAKE_DECAY_MS: u64 = 300;
    pub const SHAKE_FOOD: f32 = 8.0;
    pub const SHAKE_SHIELD: f32 = 10.0;
    pub const SHAKE_DEATH: f32 = 15.0;

    pub const SCORE_FLASH_MS: u64 = 300;
    pub const SCREEN_FLASH_MS: u64 = 150;

    pub const COUNTDOWN_MS: u64 = 3_500;
    pub const DEATH_ANIMATION_MS: u64 = 2_500;
}

/// Pixel-space center of a grid cell
#[inline]
pub fn cell_center(x: i32, y: i32) -> Vec2 {
    use consts::CELL_SIZE;
    Vec2::new(
        x as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        y as f32 * CELL_SIZE + CELL_SIZE / 2.0,
    )
}

/// Fraction of `window` elapsed since `start`, clamped to [0, 1]
#[inline]
pub fn progress(now: u64, start: u64, window: u64) -> f32 {
    if window == 0 {
        return 1.0;
    }
    (now.saturating_sub(start) as f32 / window as f32).clamp(0.0, 1.0)
}
