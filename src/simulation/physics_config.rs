//! Canonical scene configuration for the sea simulation.
//!
//! All world-space sizes are in metres; the camera shows a fixed
//! `VIEWPORT_WIDTH x VIEWPORT_HEIGHT` window with its bottom-left corner at
//! the origin. To tune the scene, modify `default_sea_config()` and run
//! `cargo test` to verify the regression checks still pass.

use bevy::math::Vec2;

use crate::resources::WaterParams;
use crate::water::{WaterConfig, WaterConfigError, WaterRange};

// ==================== TIMING ====================
/// Fixed simulation tick (60 Hz)
pub const TIME_STEP: f32 = 1.0 / 60.0;
/// Longest frame fed to the accumulator, to avoid a spiral of death
pub const MAX_FRAME_TIME: f32 = 0.25;

// ==================== VIEWPORT ====================
pub const VIEWPORT_HEIGHT: f32 = 12.0;
pub const VIEWPORT_WIDTH: f32 = 16.0 / 9.0 * VIEWPORT_HEIGHT;

// ==================== BOAT ====================
pub const BOAT_HEIGHT: f32 = 5.0;
pub const BOAT_ASPECT_RATIO: f32 = 1.07;
pub const BOAT_WIDTH: f32 = BOAT_ASPECT_RATIO * BOAT_HEIGHT;
pub const BOAT_DENSITY: f32 = 0.25;

/// Everything the demo needs to build a sea and what floats on it.
#[derive(Clone, Debug)]
pub struct SeaConfig {
    pub gravity: Vec2,
    pub springs_count: usize,
    /// Springs exist and propagate here (wider than the screen)
    pub simulation_range: WaterRange,
    /// Springs get a sensor column here (just around the boat)
    pub physics_range: WaterRange,
    pub water: WaterParams,

    /// Emitter wait between waves, in seconds
    pub wave_period: WaterRange,
    /// Emitter kick velocity
    pub wave_amplitude: WaterRange,

    pub boat_width: f32,
    pub boat_height: f32,
    pub boat_density: f32,
    /// Boat body origin; x is held here every tick
    pub boat_spawn: Vec2,

    pub crate_half_size: f32,
    pub crate_density: f32,
    pub crate_spawns: Vec<Vec2>,
}

impl SeaConfig {
    pub fn water_config(&self) -> WaterConfig {
        WaterConfig::new(self.springs_count, self.simulation_range, self.physics_range)
            .with_params(self.water)
    }
}

/// The canonical scene: an 80-spring sea a quarter screen wider than the
/// view on both sides, physics only under the boat plus a 20 % margin.
pub fn default_sea_config() -> Result<SeaConfig, WaterConfigError> {
    let water = WaterParams::default();

    let simulation_range = WaterRange::new(-0.25 * VIEWPORT_WIDTH, 1.25 * VIEWPORT_WIDTH)?;
    let margin = BOAT_WIDTH * 0.2;
    let physics_range = simulation_range.sub_range(
        simulation_range.half_extent() - BOAT_WIDTH / 2.0 - margin,
        BOAT_WIDTH + 2.0 * margin,
    )?;

    let centre_x = VIEWPORT_WIDTH / 2.0;
    let level = water.base_water_level;

    Ok(SeaConfig {
        gravity: Vec2::new(0.0, -10.0),
        springs_count: 80,
        simulation_range,
        physics_range,
        water,

        wave_period: WaterRange::new(0.5, 1.5)?,
        wave_amplitude: WaterRange::new(4.0, 6.5)?,

        boat_width: BOAT_WIDTH,
        boat_height: BOAT_HEIGHT,
        boat_density: BOAT_DENSITY,
        boat_spawn: Vec2::new(centre_x, level + 1.0),

        crate_half_size: 0.3,
        crate_density: 0.4,
        crate_spawns: vec![
            Vec2::new(centre_x - 1.2, level + 3.0),
            Vec2::new(centre_x + 1.0, level + 4.0),
        ],
    })
}
