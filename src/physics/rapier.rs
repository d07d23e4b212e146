//! [`PhysicsBackend`] on top of the Rapier pipeline.
//!
//! Pipeline per `step()`:
//! 1. Rapier step (integration, contact resolution, sensor intersections)
//! 2. Collision events translated into [`ContactEvent`]s
//! 3. User forces cleared, so each force acts for exactly one step
//!
//! Handles map one to one onto Rapier's generational handles, so a fixture
//! handle goes stale as soon as its collider is removed.

use std::collections::HashMap;
use std::sync::Mutex;

use bevy::math::Vec2;
use bevy_rapier2d::rapier::prelude::{
    ActiveEvents, CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, CollisionEvent,
    ContactPair, DefaultBroadPhase, EventHandler, ImpulseJointSet, IntegrationParameters,
    IslandManager, Isometry, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Point, Real,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet, RigidBodyType, Vector,
};

use super::{
    ArenaIndex, BodyDef, BodyHandle, BodyKind, BodyTransform, ContactEvent, FixtureDef,
    FixtureHandle, PhysicsBackend, Shape,
};

fn vector(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

fn point(p: Vec2) -> Point<Real> {
    Point::new(p.x, p.y)
}

fn vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn rigid_body_handle(body: BodyHandle) -> RigidBodyHandle {
    RigidBodyHandle::from_raw_parts(body.0.index, body.0.generation)
}

fn body_handle(handle: RigidBodyHandle) -> BodyHandle {
    let (index, generation) = handle.into_raw_parts();
    BodyHandle(ArenaIndex { index, generation })
}

fn collider_handle(fixture: FixtureHandle) -> ColliderHandle {
    ColliderHandle::from_raw_parts(fixture.0.index, fixture.0.generation)
}

fn fixture_handle(handle: ColliderHandle) -> FixtureHandle {
    let (index, generation) = handle.into_raw_parts();
    FixtureHandle(ArenaIndex { index, generation })
}

/// Collects collision events raised during a step.
#[derive(Default)]
struct EventCollector {
    events: Mutex<Vec<CollisionEvent>>,
}

impl EventCollector {
    fn take(&mut self) -> Vec<CollisionEvent> {
        self.events
            .get_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

impl EventHandler for EventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// What Rapier does not keep about a fixture in the form the water core reads.
struct FixtureRecord {
    shape: Shape,
    density: f32,
}

/// Rigid-body world stepped by Rapier.
pub struct RapierWorld {
    gravity: Vec2,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    collector: EventCollector,
    fixtures: HashMap<FixtureHandle, FixtureRecord>,
    events: Vec<ContactEvent>,
}

impl RapierWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            collector: EventCollector::default(),
            fixtures: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn fixture_count(&self) -> usize {
        self.colliders.len()
    }

    /// Live fixtures attached to `body`.
    pub fn body_fixtures(&self, body: BodyHandle) -> Vec<FixtureHandle> {
        self.bodies
            .get(rigid_body_handle(body))
            .map(|rb| rb.colliders().iter().copied().map(fixture_handle).collect())
            .unwrap_or_default()
    }

    pub fn body_kind(&self, body: BodyHandle) -> Option<BodyKind> {
        let rb = self.bodies.get(rigid_body_handle(body))?;
        Some(match rb.body_type() {
            RigidBodyType::Fixed => BodyKind::Static,
            RigidBodyType::Dynamic => BodyKind::Dynamic,
            RigidBodyType::KinematicPositionBased | RigidBodyType::KinematicVelocityBased => {
                BodyKind::Kinematic
            }
        })
    }

    pub fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies
            .get(rigid_body_handle(body))
            .map(|rb| vec2(rb.linvel()))
    }

    pub fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(rb) = self.bodies.get_mut(rigid_body_handle(body)) {
            rb.set_linvel(vector(velocity), true);
        }
    }

    pub fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f32) {
        if let Some(rb) = self.bodies.get_mut(rigid_body_handle(body)) {
            rb.set_angvel(velocity, true);
        }
    }

    pub fn set_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32) {
        if let Some(rb) = self.bodies.get_mut(rigid_body_handle(body)) {
            rb.set_position(Isometry::new(vector(position), angle), true);
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &vector(self.gravity),
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.collector,
        );

        for event in self.collector.take() {
            let (a, b) = (fixture_handle(event.collider1()), fixture_handle(event.collider2()));
            self.events.push(match event {
                CollisionEvent::Started(..) => ContactEvent::Begin(a, b),
                CollisionEvent::Stopped(..) => ContactEvent::End(a, b),
            });
        }

        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
            rb.reset_torques(false);
        }
    }
}

impl PhysicsBackend for RapierWorld {
    fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let builder = match def.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic().can_sleep(false),
        };
        let rb = builder
            .translation(vector(def.position))
            .rotation(def.angle)
            .linvel(vector(def.linear_velocity))
            .angvel(def.angular_velocity)
            .linear_damping(def.linear_damping)
            .angular_damping(def.angular_damping)
            .build();
        body_handle(self.bodies.insert(rb))
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        let handle = rigid_body_handle(body);
        let Some(rb) = self.bodies.get(handle) else {
            return;
        };
        for collider in rb.colliders() {
            self.fixtures.remove(&fixture_handle(*collider));
        }
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn create_fixture(&mut self, body: BodyHandle, def: &FixtureDef) -> Option<FixtureHandle> {
        let parent = rigid_body_handle(body);
        if !self.bodies.contains(parent) {
            return None;
        }
        let builder = match &def.shape {
            Shape::Polygon(polygon) => {
                let points: Vec<_> = polygon.vertices().iter().map(|&v| point(v)).collect();
                ColliderBuilder::convex_hull(&points)?
            }
            Shape::Circle { center, radius } => {
                ColliderBuilder::ball(*radius).translation(vector(*center))
            }
        };
        let collider = builder
            .density(def.density)
            .sensor(def.is_sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = fixture_handle(self.colliders.insert_with_parent(collider, parent, &mut self.bodies));
        self.fixtures.insert(
            handle,
            FixtureRecord {
                shape: def.shape.clone(),
                density: def.density,
            },
        );
        Some(handle)
    }

    fn destroy_fixture(&mut self, fixture: FixtureHandle) {
        if self.fixtures.remove(&fixture).is_none() {
            return;
        }
        self.colliders.remove(
            collider_handle(fixture),
            &mut self.islands,
            &mut self.bodies,
            true,
        );
    }

    fn fixture_body(&self, fixture: FixtureHandle) -> Option<BodyHandle> {
        self.colliders
            .get(collider_handle(fixture))?
            .parent()
            .map(body_handle)
    }

    fn fixture_shape(&self, fixture: FixtureHandle) -> Option<&Shape> {
        self.fixtures.get(&fixture).map(|f| &f.shape)
    }

    fn fixture_density(&self, fixture: FixtureHandle) -> Option<f32> {
        self.fixtures.get(&fixture).map(|f| f.density)
    }

    fn body_transform(&self, body: BodyHandle) -> Option<BodyTransform> {
        let rb = self.bodies.get(rigid_body_handle(body))?;
        Some(BodyTransform::new(vec2(rb.translation()), rb.rotation().angle()))
    }

    fn linear_velocity_at(&self, body: BodyHandle, world_point: Vec2) -> Option<Vec2> {
        let rb = self.bodies.get(rigid_body_handle(body))?;
        Some(vec2(&rb.velocity_at_point(&point(world_point))))
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2, world_point: Vec2) {
        if let Some(rb) = self.bodies.get_mut(rigid_body_handle(body)) {
            rb.add_force_at_point(vector(force), point(world_point), true);
        }
    }

    fn drain_contact_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }
}
