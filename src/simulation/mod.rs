//! Simulation module - fixed-timestep sea simulation driven by Bevy.

mod input;
mod physics_config;
mod scenarios;
mod setup;
mod systems;

use bevy::prelude::*;

pub use input::DebugToggles;
pub use physics_config::{
    default_sea_config, SeaConfig, BOAT_DENSITY, BOAT_HEIGHT, BOAT_WIDTH, MAX_FRAME_TIME, TIME_STEP,
    VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
pub use scenarios::{
    boat_hull, hold_boat_x, populate, respawn_lost_crates, spawn_boat, spawn_crate, Floater, FloaterKind,
};
pub use setup::{setup_sea, Sea};
pub use systems::TickCounter;

/// Plugin that owns the sea and advances it at a fixed 60 Hz.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let mut virtual_time = Time::<Virtual>::default();
        virtual_time.set_max_delta(std::time::Duration::from_secs_f32(MAX_FRAME_TIME));

        app.insert_resource(Time::<Fixed>::from_seconds(TIME_STEP as f64))
            .insert_resource(virtual_time)
            .init_resource::<DebugToggles>()
            .init_resource::<TickCounter>()
            .add_systems(Startup, setup_sea)
            .add_systems(Update, (input::handle_keyboard_input, input::handle_mouse_input))
            .add_systems(FixedUpdate, (systems::step_sea, systems::log_sea_state).chain());
    }
}
