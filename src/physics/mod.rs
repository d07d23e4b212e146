//! Physics engine capability interface used by the water core.
//!
//! The water simulation never integrates rigid bodies itself. It creates one
//! body, rebuilds sensor fixtures on it, reads contacts, and pushes forces
//! back through [`PhysicsBackend`].
//!
//! - [`RapierWorld`]: Rapier pipeline, drives the demo.
//! - [`ScriptedWorld`]: test double. Bodies stay where they are put, forces
//!   are recorded, overlaps are reported on demand.

mod arena;
mod rapier;
mod scripted;

use bevy::math::Vec2;

use crate::geometry::ConvexPolygon;

pub use arena::{Arena, ArenaIndex};
pub use rapier::RapierWorld;
pub use scripted::ScriptedWorld;

/// Short-lived handle to a body. Stale handles resolve to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(pub ArenaIndex);

/// Tick-scoped handle to a fixture. Stale handles resolve to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixtureHandle(pub ArenaIndex);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BodyKind {
    #[default]
    Static,
    Kinematic,
    Dynamic,
}

#[derive(Clone, Debug)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            kind: BodyKind::Static,
            position: Vec2::ZERO,
            angle: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }
}

/// Collision shape in body-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Polygon(ConvexPolygon),
    Circle { center: Vec2, radius: f32 },
}

impl Shape {
    /// Same shape moved by `transform`.
    pub fn transformed(&self, transform: &BodyTransform) -> Shape {
        match self {
            Shape::Polygon(polygon) => Shape::Polygon(polygon.map(|p| transform.world_point(p))),
            Shape::Circle { center, radius } => Shape::Circle {
                center: transform.world_point(*center),
                radius: *radius,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct FixtureDef {
    pub shape: Shape,
    pub density: f32,
    pub is_sensor: bool,
}

impl FixtureDef {
    pub fn new(shape: Shape, density: f32) -> Self {
        Self {
            shape,
            density,
            is_sensor: false,
        }
    }

    pub fn sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }
}

/// Rigid transform of a body origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyTransform {
    pub position: Vec2,
    pub angle: f32,
}

impl BodyTransform {
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }

    /// Body-local point to world space.
    pub fn world_point(&self, local: Vec2) -> Vec2 {
        self.position + Vec2::from_angle(self.angle).rotate(local)
    }
}

/// Overlap notifications. The pair order carries no meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactEvent {
    Begin(FixtureHandle, FixtureHandle),
    End(FixtureHandle, FixtureHandle),
}

/// The capabilities the water core needs from a 2D physics engine.
///
/// Every query takes handles that may be stale; implementations answer
/// `None` (or do nothing) for those instead of panicking.
pub trait PhysicsBackend {
    /// World gravity vector.
    fn gravity(&self) -> Vec2;

    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;

    /// Destroys the body and all of its fixtures.
    fn destroy_body(&mut self, body: BodyHandle);

    fn create_fixture(&mut self, body: BodyHandle, def: &FixtureDef) -> Option<FixtureHandle>;

    fn destroy_fixture(&mut self, fixture: FixtureHandle);

    fn fixture_body(&self, fixture: FixtureHandle) -> Option<BodyHandle>;

    /// Shape in the owning body's local frame.
    fn fixture_shape(&self, fixture: FixtureHandle) -> Option<&Shape>;

    fn fixture_density(&self, fixture: FixtureHandle) -> Option<f32>;

    fn body_transform(&self, body: BodyHandle) -> Option<BodyTransform>;

    /// Velocity of the material point of `body` currently at `world_point`.
    fn linear_velocity_at(&self, body: BodyHandle, world_point: Vec2) -> Option<Vec2>;

    /// Continuous force at a world point, accumulated until the next step.
    fn apply_force(&mut self, body: BodyHandle, force: Vec2, world_point: Vec2);

    /// Contact begin/end notifications since the last call.
    fn drain_contact_events(&mut self) -> Vec<ContactEvent>;

    /// Fixture shape in world space, at its body's current pose.
    fn fixture_world_shape(&self, fixture: FixtureHandle) -> Option<Shape> {
        let transform = self.body_transform(self.fixture_body(fixture)?)?;
        Some(self.fixture_shape(fixture)?.transformed(&transform))
    }
}
