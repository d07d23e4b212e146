//! Fixed-timestep systems driving the sea.
//!
//! Per tick, in order:
//! 1. Wave emitter
//! 2. Boat hold + lost crate respawn
//! 3. Spring settle + water column rebuild
//! 4. Rapier step
//! 5. Contact events into the water
//! 6. Buoyancy, drag and lift

use bevy::prelude::*;

use super::physics_config::TIME_STEP;
use super::setup::Sea;

// ==================== Tick ====================

/// Runs in `FixedUpdate`; Bevy's accumulator decides how many times per frame.
pub fn step_sea(sea: Option<ResMut<Sea>>) {
    let Some(mut sea) = sea else {
        return;
    };
    sea.tick(TIME_STEP);
}

// ==================== Diagnostics ====================

/// Tick counter for periodic state logging
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

/// Log a water summary every 5 simulated seconds.
pub fn log_sea_state(mut counter: ResMut<TickCounter>, sea: Option<Res<Sea>>) {
    counter.0 += 1;
    if counter.0 % 300 != 0 {
        return;
    }
    let Some(sea) = sea else {
        return;
    };
    let springs = sea.water.springs();
    let (min, max) = springs.iter().fold((f32::MAX, f32::MIN), |(lo, hi), s| {
        (lo.min(s.height()), hi.max(s.height()))
    });
    let submerged: f32 = sea.last_forces.iter().map(|f| f.submerged_area).sum();
    debug!(
        "Tick {}: surface {:.2}..{:.2}, {} contacts, submerged area {:.3}",
        counter.0,
        min,
        max,
        sea.water.contacts().len(),
        submerged
    );
}
