//! Gold Sweeper - two small arcade games
//!
//! Core modules:
//! - `sim`: Gold digger simulation (entities, collisions, level progression)
//! - `sweeper`: Minesweeper board engine
//! - `settings`: Persisted player preferences (difficulty)
//! - `web`: Browser bindings (wasm32 only)

pub mod error;
pub mod settings;
pub mod sim;
pub mod sweeper;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{GameError, Result};
pub use settings::{Difficulty, Settings};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Map dimensions (centred on the origin, y grows downward)
    pub const MAP_SIZE: Vec2 = Vec2::new(400.0, 400.0);
    /// Floor line, items are buried below it
    pub const FLOOR_HEIGHT: f32 = -100.0;

    /// Level progression
    pub const BASE_SCORE_FOR_NEXT_LEVEL: i64 = 5;
    pub const BASE_NUMBER_OF_ROCKS: u32 = 2;
    pub const MAX_NUMBER_OF_SURPRISES: u32 = 3;
    /// Seconds on the clock for level 0, before the score bonus
    pub const BASE_TIME: i64 = 20;

    /// Item placement: candidate positions tried before accepting an overlap
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 11;
    /// Horizontal gap kept between items and the map walls
    pub const ITEM_MARGIN_X: f32 = 45.0;

    /// Item sizes (pixels)
    pub const GOLD_BASE_SIZE: f32 = 12.0;
    pub const GOLD_SIZE_STEP: f32 = 6.0;
    pub const MAX_GOLD_VALUE: u32 = 3;
    pub const ROCK_SIZE: f32 = 28.0;
    pub const ROCK_WEIGHT: u32 = 3;
    pub const SURPRISE_SIZE: f32 = 20.0;

    /// Hook defaults
    pub const HOOK_ORIGIN: Vec2 = Vec2::new(0.0, FLOOR_HEIGHT);
    pub const HOOK_SIZE: f32 = 10.0;
    /// Travel per frame while extending (pixels)
    pub const HOOK_SPEED: f32 = 4.0;
    /// Swing per frame while idle (radians)
    pub const HOOK_SWING_SPEED: f32 = 0.02;
    /// Swing limit either side of straight down (~70 degrees)
    pub const HOOK_MAX_ANGLE: f32 = 1.22;

    /// Dynamite defaults
    pub const DYNAMITE_SIZE: f32 = 8.0;
    pub const DYNAMITE_SPEED: f32 = 6.0;
    pub const STARTING_DYNAMITES: u32 = 1;

    /// Surprise sacks
    pub const SURPRISE_SCORE_CHANCE: f64 = 0.7;
    pub const MAX_SURPRISE_SCORE: u32 = 5;
}

/// Vector with both components sampled independently from [-1, 1]
#[inline]
pub fn random_unit(rng: &mut impl Rng) -> Vec2 {
    Vec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0))
}

/// Unit vector pointing `angle` radians away from straight down
#[inline]
pub fn aim_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_unit_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_unit(&mut rng);
            assert!((-1.0..=1.0).contains(&v.x));
            assert!((-1.0..=1.0).contains(&v.y));
        }
    }

    #[test]
    fn test_aim_direction() {
        let down = aim_direction(0.0);
        assert!((down - Vec2::new(0.0, 1.0)).length() < 0.0001);

        let right = aim_direction(std::f32::consts::FRAC_PI_2);
        assert!((right - Vec2::new(1.0, 0.0)).length() < 0.0001);
        assert!((aim_direction(0.7).length() - 1.0).abs() < 0.0001);
    }
}
