//! Tunable parameter sets shared by the water core and the renderer.
//!
//! All fields are public and may be changed between ticks; nothing here is
//! validated beyond the documented ranges.

use bevy::math::{Vec2, Vec4};

/// Water surface and submersion tunables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterParams {
    /// Relaxation passes per tick spreading height differences to neighbours (>= 1)
    pub waves_propagation_passes: u32,
    /// Fraction of a height difference moved to a neighbour per pass (0..1)
    pub waves_propagation_spread_factor: f32,
    /// Pull of each spring toward the rest level
    pub springs_stiffness: f32,
    /// Velocity damping applied by each spring
    pub springs_dampening_factor: f32,
    /// Rest level every spring settles to
    pub base_water_level: f32,
    /// Density of the sensor fixtures, used as fluid density for buoyancy and drag
    pub water_density: f32,
    /// Artificial uniform current used for drag instead of the water body velocity
    pub fake_water_velocity: Vec2,
    pub fake_velocity_enabled: bool,
    pub drag_enabled: bool,
    pub lift_enabled: bool,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            waves_propagation_passes: 4,
            waves_propagation_spread_factor: 0.2,
            springs_stiffness: 0.025,
            springs_dampening_factor: 0.025,
            base_water_level: 5.0,
            water_density: 1.0,
            fake_water_velocity: Vec2::new(2.0, 0.0),
            fake_velocity_enabled: true,
            drag_enabled: true,
            lift_enabled: true,
        }
    }
}

/// Vertical gradient used for the surface mesh (RGBA, linear 0..1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceColors {
    /// Colour at the spring tops
    pub surface: Vec4,
    /// Colour at the mesh bottom
    pub deep: Vec4,
}

impl Default for SurfaceColors {
    fn default() -> Self {
        Self {
            surface: Vec4::new(0.0, 1.0, 0.8, 0.7),
            deep: Vec4::new(0.0, 0.0, 0.4, 1.0),
        }
    }
}
