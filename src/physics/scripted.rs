//! Test double for [`PhysicsBackend`].
//!
//! Nothing moves unless the caller moves it: there is no integration and no
//! collision response. Forces are recorded per body, and `detect_contacts()`
//! compares every fixture pair against the previous call to emit begin/end
//! events. Only polygon pairs are tested for overlap.

use std::collections::BTreeSet;

use bevy::math::Vec2;

use super::arena::Arena;
use super::{
    BodyDef, BodyHandle, BodyKind, BodyTransform, ContactEvent, FixtureDef, FixtureHandle,
    PhysicsBackend, Shape,
};
use crate::geometry;

struct Body {
    kind: BodyKind,
    transform: BodyTransform,
    linear_velocity: Vec2,
    angular_velocity: f32,
    /// (force, world point) pairs since the last `clear_forces()`
    forces: Vec<(Vec2, Vec2)>,
    fixtures: Vec<FixtureHandle>,
}

struct Fixture {
    body: BodyHandle,
    shape: Shape,
    density: f32,
    is_sensor: bool,
}

/// Backend whose bodies stay where they are put.
pub struct ScriptedWorld {
    gravity: Vec2,
    bodies: Arena<Body>,
    fixtures: Arena<Fixture>,
    touching: BTreeSet<(FixtureHandle, FixtureHandle)>,
    events: Vec<ContactEvent>,
}

impl ScriptedWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Arena::default(),
            fixtures: Arena::default(),
            touching: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    /// Live fixtures attached to `body`.
    pub fn body_fixtures(&self, body: BodyHandle) -> &[FixtureHandle] {
        self.bodies
            .get(body.0)
            .map_or(&[], |b| b.fixtures.as_slice())
    }

    /// Every force applied to `body` since the last [`ScriptedWorld::clear_forces`].
    pub fn applied_forces(&self, body: BodyHandle) -> &[(Vec2, Vec2)] {
        self.bodies.get(body.0).map_or(&[], |b| b.forces.as_slice())
    }

    pub fn net_force(&self, body: BodyHandle) -> Vec2 {
        self.applied_forces(body).iter().map(|(force, _)| *force).sum()
    }

    pub fn clear_forces(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            body.forces.clear();
        }
    }

    pub fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.linear_velocity = velocity;
        }
    }

    pub fn set_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.transform = BodyTransform::new(position, angle);
        }
    }

    /// Queue begin/end events for polygon pairs whose overlap changed.
    ///
    /// Pairs on the same body, sensor pairs and pairs without a dynamic body
    /// are never reported. Touching edges do not count as overlap.
    pub fn detect_contacts(&mut self) {
        let proxies: Vec<_> = self
            .fixtures
            .iter()
            .filter_map(|(id, f)| {
                let body = self.bodies.get(f.body.0)?;
                match f.shape.transformed(&body.transform) {
                    Shape::Polygon(polygon) => {
                        Some((FixtureHandle(id), f.body, body.kind, f.is_sensor, polygon))
                    }
                    Shape::Circle { .. } => None,
                }
            })
            .collect();

        let mut touching = BTreeSet::new();
        for (i, a) in proxies.iter().enumerate() {
            for b in &proxies[i + 1..] {
                if a.1 == b.1 || (a.3 && b.3) {
                    continue;
                }
                if a.2 != BodyKind::Dynamic && b.2 != BodyKind::Dynamic {
                    continue;
                }
                let overlaps = geometry::clip(&a.4, &b.4)
                    .and_then(|overlap| geometry::centroid_and_area(&overlap))
                    .is_some();
                if overlaps {
                    touching.insert((a.0, b.0));
                }
            }
        }

        for &(a, b) in touching.difference(&self.touching) {
            self.events.push(ContactEvent::Begin(a, b));
        }
        for &(a, b) in self.touching.difference(&touching) {
            self.events.push(ContactEvent::End(a, b));
        }
        self.touching = touching;
    }
}

impl PhysicsBackend for ScriptedWorld {
    fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        BodyHandle(self.bodies.insert(Body {
            kind: def.kind,
            transform: BodyTransform::new(def.position, def.angle),
            linear_velocity: def.linear_velocity,
            angular_velocity: def.angular_velocity,
            forces: Vec::new(),
            fixtures: Vec::new(),
        }))
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        let Some(b) = self.bodies.get(body.0) else {
            return;
        };
        for fixture in b.fixtures.clone() {
            self.destroy_fixture(fixture);
        }
        self.bodies.remove(body.0);
    }

    fn create_fixture(&mut self, body: BodyHandle, def: &FixtureDef) -> Option<FixtureHandle> {
        if !self.bodies.contains(body.0) {
            return None;
        }
        let handle = FixtureHandle(self.fixtures.insert(Fixture {
            body,
            shape: def.shape.clone(),
            density: def.density,
            is_sensor: def.is_sensor,
        }));
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.fixtures.push(handle);
        }
        Some(handle)
    }

    fn destroy_fixture(&mut self, fixture: FixtureHandle) {
        let Some(f) = self.fixtures.remove(fixture.0) else {
            return;
        };
        if let Some(b) = self.bodies.get_mut(f.body.0) {
            b.fixtures.retain(|&h| h != fixture);
        }
        self.touching.retain(|&(a, b)| {
            let ended = a == fixture || b == fixture;
            if ended {
                self.events.push(ContactEvent::End(a, b));
            }
            !ended
        });
    }

    fn fixture_body(&self, fixture: FixtureHandle) -> Option<BodyHandle> {
        self.fixtures.get(fixture.0).map(|f| f.body)
    }

    fn fixture_shape(&self, fixture: FixtureHandle) -> Option<&Shape> {
        self.fixtures.get(fixture.0).map(|f| &f.shape)
    }

    fn fixture_density(&self, fixture: FixtureHandle) -> Option<f32> {
        self.fixtures.get(fixture.0).map(|f| f.density)
    }

    fn body_transform(&self, body: BodyHandle) -> Option<BodyTransform> {
        self.bodies.get(body.0).map(|b| b.transform)
    }

    /// Spin is taken about the body origin.
    fn linear_velocity_at(&self, body: BodyHandle, world_point: Vec2) -> Option<Vec2> {
        let b = self.bodies.get(body.0)?;
        let r = world_point - b.transform.position;
        Some(b.linear_velocity + b.angular_velocity * r.perp())
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2, world_point: Vec2) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            if b.kind == BodyKind::Dynamic {
                b.forces.push((force, world_point));
            }
        }
    }

    fn drain_contact_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }
}
