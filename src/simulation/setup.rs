//! Scene construction and the per-tick pipeline of the sea.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::physics_config::{default_sea_config, SeaConfig};
use super::scenarios::{self, Floater};
use crate::physics::{PhysicsBackend, RapierWorld};
use crate::water::{ContactForces, WaterConfigError, WaterSimulation, WaveEmitter};

/// The whole simulated scene: physics world, water surface, wave source and
/// the bodies floating on it.
#[derive(Resource)]
pub struct Sea {
    pub world: RapierWorld,
    pub water: WaterSimulation,
    pub emitter: WaveEmitter,
    pub floaters: Vec<Floater>,
    pub config: SeaConfig,
    /// Forces applied during the last tick, for debug drawing
    pub last_forces: Vec<ContactForces>,
    rng: StdRng,
}

impl Sea {
    pub fn new(config: SeaConfig, mut rng: StdRng) -> Result<Self, WaterConfigError> {
        let mut world = RapierWorld::new(config.gravity);
        let water = WaterSimulation::new(&mut world, config.water_config())?;
        let emitter = WaveEmitter::new(config.wave_period, config.wave_amplitude, &mut rng);
        let floaters = scenarios::populate(&mut world, &config);
        Ok(Self {
            world,
            water,
            emitter,
            floaters,
            config,
            last_forces: Vec::new(),
            rng,
        })
    }

    /// One fixed step: waves, column rebuild, physics, contacts, forces.
    ///
    /// Bodies are only teleported before the step, so the poses the resolver
    /// clips against are the ones contacts were found for.
    pub fn tick(&mut self, dt: f32) {
        self.emitter.update(&mut self.water, dt, &mut self.rng);
        scenarios::hold_boat_x(&mut self.world, &self.floaters, self.config.boat_spawn.x);
        scenarios::respawn_lost_crates(&mut self.world, &self.floaters, &self.config);
        self.water.update(&mut self.world);
        self.world.step(dt);
        let events = self.world.drain_contact_events();
        self.water.handle_contact_events(events);
        self.last_forces = self.water.resolve_forces(&mut self.world);
    }

    /// Rebuild the scene from its config, keeping runtime water tuning.
    pub fn reset(&mut self) -> Result<(), WaterConfigError> {
        let mut config = self.config.clone();
        config.water = *self.water.params();
        let rng = StdRng::from_rng(&mut self.rng).unwrap_or_else(|_| StdRng::from_entropy());
        *self = Self::new(config, rng)?;
        info!("Sea reset");
        Ok(())
    }
}

/// Startup system: build the canonical scene.
pub fn setup_sea(mut commands: Commands) {
    let sea = default_sea_config().and_then(|config| Sea::new(config, StdRng::from_entropy()));
    match sea {
        Ok(sea) => {
            info!(
                "Sea ready: {} springs, {} floating bodies ({} bodies, {} colliders in the world)",
                sea.water.springs().len(),
                sea.floaters.len(),
                sea.world.body_count(),
                sea.world.fixture_count()
            );
            commands.insert_resource(sea);
        }
        Err(e) => error!("Failed to build the sea: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::physics_config::TIME_STEP;

    fn sea() -> Sea {
        Sea::new(default_sea_config().unwrap(), StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn bodies_are_placed_before_the_step() {
        let mut sea = sea();
        let boat = sea.floaters[0].body;
        sea.world.set_linear_velocity(boat, Vec2::new(3.0, 0.0));
        sea.tick(TIME_STEP);

        // Held back to the spawn x first, then carried by the step.
        let x = sea.world.body_transform(boat).unwrap().position.x;
        let expected = sea.config.boat_spawn.x + 3.0 * TIME_STEP;
        assert!((x - expected).abs() < 1e-3, "boat at x={x}, expected {expected}");
        assert!(!sea.last_forces.is_empty());
    }

    #[test]
    fn reset_keeps_water_tuning() {
        let mut sea = sea();
        sea.water.params_mut().drag_enabled = false;
        for _ in 0..30 {
            sea.tick(TIME_STEP);
        }
        sea.reset().unwrap();
        assert!(!sea.water.params().drag_enabled);
        assert!(sea.last_forces.is_empty());
        assert_eq!(sea.floaters.len(), 1 + sea.config.crate_spawns.len());
    }
}
