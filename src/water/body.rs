//! The physics-side representation of the water: one static body carrying a
//! thin sensor column per physically active spring.

use std::ops::Range;

use bevy::math::Vec2;

use super::range::WaterRange;
use super::spring::Spring;
use crate::geometry::ConvexPolygon;
use crate::physics::{BodyDef, BodyHandle, BodyKind, FixtureDef, FixtureHandle, PhysicsBackend, Shape};

/// Absorbs float noise when a physical bound sits exactly on a spring.
const INDEX_EPSILON: f32 = 1e-4;

/// Indices of the springs whose x lies inside `physics`, bounds included.
pub fn physical_indices(simulation: &WaterRange, physics: &WaterRange, spacing: f32, count: usize) -> Range<usize> {
    let first = ((physics.from - simulation.from) / spacing - INDEX_EPSILON).ceil();
    let last = ((physics.to - simulation.from) / spacing + INDEX_EPSILON).floor();
    let end = ((last + 1.0).max(0.0) as usize).min(count);
    let start = (first.max(0.0) as usize).min(end);
    start..end
}

pub struct WaterBody {
    body: BodyHandle,
    origin: Vec2,
    indices: Range<usize>,
    fixtures: Vec<FixtureHandle>,
}

impl WaterBody {
    /// Create the static water body at the world origin.
    pub fn new<B: PhysicsBackend>(backend: &mut B, indices: Range<usize>) -> Self {
        let origin = Vec2::ZERO;
        let body = backend.create_body(&BodyDef {
            kind: BodyKind::Static,
            position: origin,
            ..Default::default()
        });
        Self {
            body,
            origin,
            fixtures: Vec::with_capacity(indices.len()),
            indices,
        }
    }

    /// Destroy every column and create fresh ones from the current spring heights.
    ///
    /// Every handle issued by the previous rebuild is invalid afterwards.
    pub fn rebuild<B: PhysicsBackend>(&mut self, backend: &mut B, springs: &[Spring], spacing: f32, density: f32) {
        for fixture in self.fixtures.drain(..) {
            backend.destroy_fixture(fixture);
        }

        let half_width = spacing / 2.0;
        for spring in &springs[self.indices.clone()] {
            let height = spring.height();
            let center = Vec2::new(spring.x() + half_width, height / 2.0) - self.origin;
            let column = ConvexPolygon::rect(center, Vec2::new(half_width, height / 2.0));
            let def = FixtureDef::new(Shape::Polygon(column), density).sensor();
            if let Some(fixture) = backend.create_fixture(self.body, &def) {
                self.fixtures.push(fixture);
            }
        }
    }

    pub fn destroy<B: PhysicsBackend>(&mut self, backend: &mut B) {
        self.fixtures.clear();
        backend.destroy_body(self.body);
    }

    pub fn is_water_fixture(&self, fixture: FixtureHandle) -> bool {
        self.fixtures.contains(&fixture)
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn fixtures(&self) -> &[FixtureHandle] {
        &self.fixtures
    }

    pub fn indices(&self) -> Range<usize> {
        self.indices.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn springs_inside(sim: &WaterRange, phys: &WaterRange, spacing: f32, count: usize) -> usize {
        (0..count)
            .map(|i| sim.from + i as f32 * spacing)
            .filter(|&x| phys.contains(x))
            .count()
    }

    #[test]
    fn full_range_covers_every_spring() {
        let sim = WaterRange::new(0.0, 4.0).unwrap();
        assert_eq!(physical_indices(&sim, &sim, 1.0, 5), 0..5);
    }

    #[test]
    fn centred_window() {
        let sim = WaterRange::new(-10.0, 10.0).unwrap();
        let phys = WaterRange::new(-2.5, 2.5).unwrap();
        // springs at x = -2 ..= 2
        assert_eq!(physical_indices(&sim, &phys, 1.0, 21), 8..13);
    }

    #[test]
    fn window_matches_springs_in_range() {
        let sim = WaterRange::new(0.0, 20.0).unwrap();
        for (from, to) in [(4.0, 12.0), (0.5, 3.5), (0.0, 20.0), (7.25, 7.75), (19.5, 20.0)] {
            let phys = WaterRange::new(from, to).unwrap();
            let window = physical_indices(&sim, &phys, 1.0, 21);
            assert_eq!(window.len(), springs_inside(&sim, &phys, 1.0, 21), "[{from}, {to}]");
        }
    }

    #[test]
    fn bound_on_a_spring_includes_it() {
        let sim = WaterRange::new(0.0, 4.0).unwrap();
        let phys = WaterRange::new(2.0, 2.0).unwrap();
        assert_eq!(physical_indices(&sim, &phys, 1.0, 5), 2..3);
    }

    #[test]
    fn empty_window_is_allowed() {
        let sim = WaterRange::new(0.0, 4.0).unwrap();
        let phys = WaterRange::new(2.2, 2.8).unwrap();
        let window = physical_indices(&sim, &phys, 1.0, 5);
        assert!(window.is_empty());
    }
}
