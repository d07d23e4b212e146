//! Mass-spring water surface coupled to a rigid-body backend.
//!
//! A tick is driven by the host in this order:
//!
//! 1. [`WaterSimulation::update`] settles the springs and rebuilds the sensor
//!    columns (all previous fixture handles become stale).
//! 2. The host steps its physics engine.
//! 3. The host forwards contact events with
//!    [`WaterSimulation::handle_contact_events`].
//! 4. [`WaterSimulation::resolve_forces`] applies buoyancy, drag and lift to
//!    every foreign body touching the water.

mod body;
mod buoyancy;
mod contacts;
mod emitter;
mod error;
mod range;
mod spring;
mod waves;

use std::ops::Range;

use bevy::log::{debug, info, warn};

use crate::physics::{BodyHandle, ContactEvent, FixtureHandle, PhysicsBackend};
use crate::resources::WaterParams;

pub use body::{physical_indices, WaterBody};
pub use buoyancy::{resolve_contact, world_polygon, ContactForces};
pub use contacts::{ContactSet, FixtureContact};
pub use emitter::WaveEmitter;
pub use error::WaterConfigError;
pub use range::WaterRange;
pub use spring::Spring;
pub use waves::WaveField;

/// Velocity added to the spring under a pointer click.
pub const INPUT_DISTURBANCE: f32 = 5.0;

/// Everything needed to build a [`WaterSimulation`].
#[derive(Clone, Debug)]
pub struct WaterConfig {
    pub springs_count: usize,
    /// Where springs exist and propagate waves
    pub simulation: WaterRange,
    /// Where springs get a sensor column; must lie inside `simulation`
    pub physics: WaterRange,
    pub params: WaterParams,
}

impl WaterConfig {
    pub fn new(springs_count: usize, simulation: WaterRange, physics: WaterRange) -> Self {
        Self {
            springs_count,
            simulation,
            physics,
            params: WaterParams::default(),
        }
    }

    pub fn with_params(mut self, params: WaterParams) -> Self {
        self.params = params;
        self
    }
}

pub struct WaterSimulation {
    waves: WaveField,
    body: WaterBody,
    contacts: ContactSet,
    params: WaterParams,
}

impl WaterSimulation {
    /// Place the springs at rest, create the water body and its first columns.
    pub fn new<B: PhysicsBackend>(backend: &mut B, config: WaterConfig) -> Result<Self, WaterConfigError> {
        let WaterConfig {
            springs_count,
            simulation,
            physics,
            params,
        } = config;

        if !simulation.contains_range(&physics) {
            return Err(WaterConfigError::PhysicsRangeOutOfBounds {
                simulation: (simulation.from, simulation.to),
                physics: (physics.from, physics.to),
            });
        }

        let waves = WaveField::new(simulation, springs_count, params.base_water_level)?;
        let indices = physical_indices(&simulation, &physics, waves.spacing(), waves.len());
        let mut body = WaterBody::new(backend, indices.clone());
        body.rebuild(backend, waves.springs(), waves.spacing(), params.water_density);

        info!(
            "Water simulation created: {} springs over [{:.2}, {:.2}], spacing {:.3}, physical springs {}..{}",
            springs_count,
            simulation.from,
            simulation.to,
            waves.spacing(),
            indices.start,
            indices.end
        );

        Ok(Self {
            waves,
            body,
            contacts: ContactSet::default(),
            params,
        })
    }

    /// Settle the surface and replace every water column.
    ///
    /// The contact set is emptied: the pairs it held reference the destroyed
    /// columns. Begin events for the new columns arrive after the next
    /// physics step.
    pub fn update<B: PhysicsBackend>(&mut self, backend: &mut B) {
        self.waves.step(&self.params);
        self.body.rebuild(
            backend,
            self.waves.springs(),
            self.waves.spacing(),
            self.params.water_density,
        );
        if !self.contacts.is_empty() {
            debug!("clearing {} water contacts", self.contacts.len());
            self.contacts.clear();
        }
    }

    /// Orient a fixture pair as (water, foreign). `None` unless exactly one
    /// side is a live water column.
    fn classify(&self, a: FixtureHandle, b: FixtureHandle) -> Option<FixtureContact> {
        match (self.body.is_water_fixture(a), self.body.is_water_fixture(b)) {
            (true, false) => Some(FixtureContact { water: a, other: b }),
            (false, true) => Some(FixtureContact { water: b, other: a }),
            (true, true) => {
                warn!("contact between two water columns ignored");
                None
            }
            (false, false) => None,
        }
    }

    /// Returns whether the contact set changed.
    pub fn handle_contact_event(&mut self, event: ContactEvent) -> bool {
        match event {
            ContactEvent::Begin(a, b) => self
                .classify(a, b)
                .is_some_and(|contact| self.contacts.begin(contact)),
            ContactEvent::End(a, b) => self
                .classify(a, b)
                .is_some_and(|contact| self.contacts.end(contact)),
        }
    }

    pub fn handle_contact_events(&mut self, events: impl IntoIterator<Item = ContactEvent>) {
        for event in events {
            self.handle_contact_event(event);
        }
    }

    /// Push buoyancy, drag and lift onto every body currently touching the water.
    ///
    /// Each live contact is resolved exactly once. Returns what was applied,
    /// in contact order; contacts that no longer overlap are skipped.
    pub fn resolve_forces<B: PhysicsBackend>(&mut self, backend: &mut B) -> Vec<ContactForces> {
        let water_body = self.body.body();
        self.contacts
            .snapshot()
            .into_iter()
            .filter_map(|contact| resolve_contact(backend, water_body, contact, &self.params))
            .collect()
    }

    /// Add `speed` to spring `index`. Out-of-range indices are ignored.
    pub fn disturb_water(&mut self, index: usize, speed: f32) -> bool {
        self.waves.disturb(index, speed)
    }

    /// Kick the spring nearest to a clicked world x.
    pub fn handle_input(&mut self, world_x: f32) -> bool {
        match self.waves.index_at(world_x) {
            Some(index) => self.disturb_water(index, INPUT_DISTURBANCE),
            None => false,
        }
    }

    /// Remove the water body (and its columns) from the backend.
    pub fn destroy<B: PhysicsBackend>(mut self, backend: &mut B) {
        self.contacts.clear();
        self.body.destroy(backend);
    }

    pub fn params(&self) -> &WaterParams {
        &self.params
    }

    /// Changes apply from the next [`WaterSimulation::update`].
    pub fn params_mut(&mut self) -> &mut WaterParams {
        &mut self.params
    }

    pub fn water_level(&self) -> f32 {
        self.params.base_water_level
    }

    pub fn springs(&self) -> &[Spring] {
        self.waves.springs()
    }

    pub fn spacing(&self) -> f32 {
        self.waves.spacing()
    }

    pub fn physical_indices(&self) -> Range<usize> {
        self.body.indices()
    }

    pub fn fixtures(&self) -> &[FixtureHandle] {
        self.body.fixtures()
    }

    pub fn contacts(&self) -> &ContactSet {
        &self.contacts
    }

    pub fn body(&self) -> BodyHandle {
        self.body.body()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ConvexPolygon;
    use crate::physics::{BodyDef, BodyKind, FixtureDef, ScriptedWorld, Shape};
    use bevy::math::Vec2;

    fn world() -> ScriptedWorld {
        ScriptedWorld::new(Vec2::new(0.0, -10.0))
    }

    fn config(count: usize, from: f32, to: f32) -> WaterConfig {
        let range = WaterRange::new(from, to).unwrap();
        WaterConfig::new(count, range, range)
    }

    fn spawn_box(world: &mut ScriptedWorld, center: Vec2, half: f32) -> (BodyHandle, FixtureHandle) {
        let body = world.create_body(&BodyDef {
            kind: BodyKind::Dynamic,
            position: center,
            ..Default::default()
        });
        let shape = Shape::Polygon(ConvexPolygon::rect(Vec2::ZERO, Vec2::splat(half)));
        let fixture = world.create_fixture(body, &FixtureDef::new(shape, 0.25)).unwrap();
        (body, fixture)
    }

    fn tick(water: &mut WaterSimulation, world: &mut ScriptedWorld) -> Vec<ContactForces> {
        world.clear_forces();
        water.update(world);
        world.detect_contacts();
        let events = world.drain_contact_events();
        water.handle_contact_events(events);
        water.resolve_forces(world)
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let mut world = world();
        let sim = WaterRange::new(0.0, 10.0).unwrap();
        let phys = WaterRange::new(5.0, 12.0).unwrap();
        let result = WaterSimulation::new(&mut world, WaterConfig::new(11, sim, phys));
        assert!(matches!(
            result,
            Err(WaterConfigError::PhysicsRangeOutOfBounds { .. })
        ));
        assert!(matches!(
            WaterSimulation::new(&mut world, config(1, 0.0, 10.0)),
            Err(WaterConfigError::TooFewSprings(1))
        ));
        assert!(matches!(
            WaterSimulation::new(&mut world, config(3, 1.0, 1.0)),
            Err(WaterConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn one_column_per_physical_spring() {
        let mut world = world();
        let sim = WaterRange::new(0.0, 10.0).unwrap();
        let phys = WaterRange::new(2.0, 6.0).unwrap();
        let mut water = WaterSimulation::new(&mut world, WaterConfig::new(11, sim, phys)).unwrap();
        // springs at x = 2, 3, 4, 5, 6
        assert_eq!(water.physical_indices(), 2..7);
        assert_eq!(water.fixtures().len(), 5);

        let before = water.fixtures().to_vec();
        water.update(&mut world);
        assert_eq!(water.fixtures().len(), 5);
        assert_eq!(world.body_fixtures(water.body()).len(), 5);
        for old in before {
            assert!(world.fixture_body(old).is_none());
        }
    }

    #[test]
    fn columns_follow_spring_heights() {
        let mut world = world();
        let mut water = WaterSimulation::new(&mut world, config(5, 0.0, 4.0)).unwrap();
        water.disturb_water(2, 5.0);
        water.update(&mut world);
        for (spring, &fixture) in water.springs().iter().zip(water.fixtures()) {
            let Some(Shape::Polygon(column)) = world.fixture_world_shape(fixture) else {
                panic!("water column should be a polygon");
            };
            let (min, max) = column.vertices().iter().fold(
                (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
                |(lo, hi), &v| (lo.min(v), hi.max(v)),
            );
            assert!((min - Vec2::new(spring.x(), 0.0)).length() < 1e-5);
            assert!((max - Vec2::new(spring.x() + 1.0, spring.height())).length() < 1e-5);
        }
    }

    #[test]
    fn floating_box_gets_lifted() {
        let mut world = world();
        let mut water = WaterSimulation::new(&mut world, config(11, 0.0, 10.0)).unwrap();
        water.params_mut().drag_enabled = false;
        water.params_mut().lift_enabled = false;
        // Bottom half of a 2x2 box below the rest level (5.0).
        let (boat, hull) = spawn_box(&mut world, Vec2::new(5.0, 5.0), 1.0);

        let forces = tick(&mut water, &mut world);
        assert_eq!(forces.len(), 2);
        assert!(water.contacts().iter().all(|c| c.other == hull));

        let area: f32 = forces.iter().map(|f| f.submerged_area).sum();
        assert!((area - 2.0).abs() < 1e-4, "submerged area {area}");
        let applied = world.net_force(boat);
        assert!((applied - Vec2::new(0.0, 20.0)).length() < 1e-3, "{applied}");
    }

    #[test]
    fn contacts_are_cleared_on_rebuild() {
        let mut world = world();
        let mut water = WaterSimulation::new(&mut world, config(11, 0.0, 10.0)).unwrap();
        spawn_box(&mut world, Vec2::new(5.0, 5.0), 1.0);
        tick(&mut water, &mut world);
        assert!(!water.contacts().is_empty());
        water.update(&mut world);
        assert!(water.contacts().is_empty());
    }

    #[test]
    fn stale_events_are_ignored() {
        let mut world = world();
        let mut water = WaterSimulation::new(&mut world, config(11, 0.0, 10.0)).unwrap();
        let (_, hull) = spawn_box(&mut world, Vec2::new(5.0, 5.0), 1.0);
        let stale = water.fixtures()[0];
        water.update(&mut world);
        assert!(!water.handle_contact_event(ContactEvent::Begin(stale, hull)));
        assert!(!water.handle_contact_event(ContactEvent::End(stale, hull)));
        assert!(water.contacts().is_empty());
    }

    #[test]
    fn handle_input_kicks_nearest_spring() {
        let mut world = world();
        let mut water = WaterSimulation::new(&mut world, config(5, 0.0, 4.0)).unwrap();
        assert!(water.handle_input(2.0));
        assert_eq!(water.springs()[3].velocity(), INPUT_DISTURBANCE);
        assert!(!water.handle_input(4.0));
        assert!(!water.handle_input(-1.0));
    }

    #[test]
    fn water_level_follows_params() {
        let mut world = world();
        let mut water = WaterSimulation::new(&mut world, config(5, 0.0, 4.0)).unwrap();
        assert_eq!(water.water_level(), 5.0);
        water.params_mut().base_water_level = 3.0;
        assert_eq!(water.water_level(), 3.0);
    }

    #[test]
    fn destroy_removes_the_water_body() {
        let mut world = world();
        let water = WaterSimulation::new(&mut world, config(5, 0.0, 4.0)).unwrap();
        let body = water.body();
        let column = water.fixtures()[0];
        water.destroy(&mut world);
        assert!(world.body_transform(body).is_none());
        assert!(world.fixture_body(column).is_none());
    }
}
