//! Buoyancy, drag and lift for one (water column, foreign fixture) contact.

use bevy::math::Vec2;

use super::contacts::FixtureContact;
use crate::geometry::{self, ConvexPolygon};
use crate::physics::{BodyHandle, FixtureHandle, PhysicsBackend, Shape};
use crate::resources::WaterParams;

/// Below this a relative speed or edge length has no usable direction.
const DIRECTION_EPSILON: f32 = 1e-6;

/// Totals pushed onto the foreign body for one contact.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContactForces {
    pub submerged_area: f32,
    pub centroid: Vec2,
    pub buoyancy: Vec2,
    pub drag: Vec2,
    pub lift: Vec2,
}

impl ContactForces {
    pub fn total(&self) -> Vec2 {
        self.buoyancy + self.drag + self.lift
    }
}

/// Fixture polygon in world space. Circles and stale handles give `None`.
pub fn world_polygon<B: PhysicsBackend>(backend: &B, fixture: FixtureHandle) -> Option<ConvexPolygon> {
    match backend.fixture_world_shape(fixture)? {
        Shape::Polygon(polygon) => Some(polygon),
        Shape::Circle { .. } => None,
    }
}

/// Apply buoyancy and per-edge drag/lift for `contact` to the foreign body.
///
/// Returns `None` when nothing was applied: unsupported shape, stale handle,
/// or no overlap left this tick.
pub fn resolve_contact<B: PhysicsBackend>(
    backend: &mut B,
    water_body: BodyHandle,
    contact: FixtureContact,
    params: &WaterParams,
) -> Option<ContactForces> {
    let water = world_polygon(backend, contact.water)?;
    let other = world_polygon(backend, contact.other)?;
    let submerged = geometry::clip(&water, &other)?;
    let (centroid, area) = geometry::centroid_and_area(&submerged)?;

    let density = backend.fixture_density(contact.water)?;
    let body = backend.fixture_body(contact.other)?;

    let mut forces = ContactForces {
        submerged_area: area,
        centroid,
        ..Default::default()
    };

    let displaced_mass = density * area;
    forces.buoyancy = displaced_mass * -backend.gravity();
    backend.apply_force(body, forces.buoyancy, centroid);

    if !params.drag_enabled && !params.lift_enabled {
        return Some(forces);
    }

    let n = submerged.len();
    for i in 0..n {
        let v0 = submerged[i];
        let v1 = submerged[(i + 1) % n];
        let mid = (v0 + v1) * 0.5;

        let Some(body_velocity) = backend.linear_velocity_at(body, mid) else {
            continue;
        };
        let ambient = if params.fake_velocity_enabled {
            params.fake_water_velocity
        } else {
            backend.linear_velocity_at(water_body, mid).unwrap_or(Vec2::ZERO)
        };
        let relative = body_velocity - ambient;
        let vel = relative.length();
        if vel < DIRECTION_EPSILON {
            continue;
        }
        let vel_dir = relative / vel;

        let edge = v1 - v0;
        let edge_length = edge.length();
        if edge_length < DIRECTION_EPSILON {
            continue;
        }
        let edge_dir = edge / edge_length;
        // outward for counter-clockwise winding
        let normal = Vec2::new(edge_dir.y, -edge_dir.x);

        let drag_dot = normal.dot(vel_dir);
        if drag_dot < 0.0 {
            continue;
        }
        let drag_mag = drag_dot * edge_length * density * vel * vel;

        if params.drag_enabled {
            let drag = -drag_mag * vel_dir;
            forces.drag += drag;
            backend.apply_force(body, drag, mid);
        }
        if params.lift_enabled {
            let lift_dot = edge_dir.dot(vel_dir);
            let lift = drag_mag * lift_dot * vel_dir.perp();
            forces.lift += lift;
            backend.apply_force(body, lift, mid);
        }
    }

    Some(forces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyDef, BodyKind, FixtureDef, ScriptedWorld};

    struct Scene {
        world: ScriptedWorld,
        water_body: BodyHandle,
        water: FixtureHandle,
        boat: BodyHandle,
        hull: FixtureHandle,
    }

    /// Unit water column over [0,1]x[0,1] and a unit box centred at `(0.5, y)`.
    fn scene(box_y: f32, box_velocity: Vec2) -> Scene {
        let mut world = ScriptedWorld::new(Vec2::new(0.0, -10.0));
        let water_body = world.create_body(&BodyDef::default());
        let column = ConvexPolygon::rect(Vec2::splat(0.5), Vec2::splat(0.5));
        let water = world
            .create_fixture(water_body, &FixtureDef::new(Shape::Polygon(column), 1.0).sensor())
            .unwrap();
        let boat = world.create_body(&BodyDef {
            kind: BodyKind::Dynamic,
            position: Vec2::new(0.5, box_y),
            linear_velocity: box_velocity,
            ..Default::default()
        });
        let hull_shape = ConvexPolygon::rect(Vec2::ZERO, Vec2::splat(0.5));
        let hull = world
            .create_fixture(boat, &FixtureDef::new(Shape::Polygon(hull_shape), 0.25))
            .unwrap();
        Scene {
            world,
            water_body,
            water,
            boat,
            hull,
        }
    }

    fn still_water() -> WaterParams {
        WaterParams {
            drag_enabled: false,
            lift_enabled: false,
            ..WaterParams::default()
        }
    }

    #[test]
    fn buoyancy_is_density_times_area_times_gravity() {
        let mut s = scene(1.0, Vec2::ZERO);
        let contact = FixtureContact {
            water: s.water,
            other: s.hull,
        };
        let forces = resolve_contact(&mut s.world, s.water_body, contact, &still_water()).unwrap();
        assert!((forces.submerged_area - 0.5).abs() < 1e-5);
        assert!((forces.buoyancy - Vec2::new(0.0, 5.0)).length() < 1e-4);
        assert!((forces.centroid - Vec2::new(0.5, 0.75)).length() < 1e-5);

        let applied = s.world.net_force(s.boat);
        assert!((applied - Vec2::new(0.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn drag_opposes_relative_motion() {
        let mut s = scene(1.0, Vec2::new(0.0, -2.0));
        let params = WaterParams {
            fake_velocity_enabled: false,
            lift_enabled: false,
            ..WaterParams::default()
        };
        let contact = FixtureContact {
            water: s.water,
            other: s.hull,
        };
        let forces = resolve_contact(&mut s.world, s.water_body, contact, &params).unwrap();
        // Only the bottom edge (length 1) faces the downward motion: 1 * 1 * 1 * 2^2.
        assert!((forces.drag - Vec2::new(0.0, 4.0)).length() < 1e-4);
        assert_eq!(forces.lift, Vec2::ZERO);
    }

    #[test]
    fn slanted_edge_produces_lift() {
        let mut world = ScriptedWorld::new(Vec2::new(0.0, -10.0));
        let water_body = world.create_body(&BodyDef::default());
        let column = ConvexPolygon::rect(Vec2::ZERO, Vec2::splat(5.0));
        let water = world
            .create_fixture(water_body, &FixtureDef::new(Shape::Polygon(column), 1.0).sensor())
            .unwrap();
        let hull = ConvexPolygon::new(vec![
            Vec2::new(-1.0, -0.5),
            Vec2::new(1.0, -0.5),
            Vec2::new(-1.0, 0.5),
        ])
        .unwrap();
        let boat = world.create_body(&BodyDef {
            kind: BodyKind::Dynamic,
            linear_velocity: Vec2::new(2.0, 0.0),
            ..Default::default()
        });
        let other = world
            .create_fixture(boat, &FixtureDef::new(Shape::Polygon(hull), 0.25))
            .unwrap();
        let params = WaterParams {
            fake_velocity_enabled: false,
            ..WaterParams::default()
        };

        let forces = resolve_contact(&mut world, water_body, FixtureContact { water, other }, &params).unwrap();
        // Only the slanted edge faces the flow: normal (1, 2)/sqrt(5), length sqrt(5).
        // drag = 1 * 4 = 4 against the motion, lift = 4 * (-2/sqrt(5)) along (0, 1).
        let lift = 4.0 * -2.0 / 5.0_f32.sqrt();
        assert!((forces.drag - Vec2::new(-4.0, 0.0)).length() < 1e-4, "{}", forces.drag);
        assert!((forces.lift - Vec2::new(0.0, lift)).length() < 1e-4, "{}", forces.lift);
        assert!((forces.submerged_area - 1.0).abs() < 1e-5);

        let applied = world.net_force(boat);
        assert!((applied - (forces.buoyancy + forces.drag + forces.lift)).length() < 1e-4);
    }

    #[test]
    fn lift_toggle_leaves_drag_alone() {
        let mut s = scene(1.0, Vec2::new(0.0, -2.0));
        let params = WaterParams {
            fake_velocity_enabled: false,
            lift_enabled: false,
            ..WaterParams::default()
        };
        let contact = FixtureContact {
            water: s.water,
            other: s.hull,
        };
        let without_lift = resolve_contact(&mut s.world, s.water_body, contact, &params).unwrap();
        let with_lift = resolve_contact(
            &mut s.world,
            s.water_body,
            contact,
            &WaterParams {
                lift_enabled: true,
                ..params
            },
        )
        .unwrap();
        assert_eq!(without_lift.drag, with_lift.drag);
        assert_eq!(without_lift.lift, Vec2::ZERO);
    }

    #[test]
    fn fake_current_drives_drag_on_a_resting_body() {
        let mut s = scene(1.0, Vec2::ZERO);
        let params = WaterParams {
            lift_enabled: false,
            fake_water_velocity: Vec2::new(2.0, 0.0),
            ..WaterParams::default()
        };
        let contact = FixtureContact {
            water: s.water,
            other: s.hull,
        };
        let forces = resolve_contact(&mut s.world, s.water_body, contact, &params).unwrap();
        // Relative velocity (-2, 0): the left edge (length 0.5) faces the flow.
        assert!(forces.drag.x > 0.0);
        assert!((forces.drag.x - 0.5 * 4.0).abs() < 1e-4);
        assert!(forces.drag.y.abs() < 1e-5);
    }

    #[test]
    fn no_relative_velocity_means_no_drag() {
        let mut s = scene(1.0, Vec2::ZERO);
        let params = WaterParams {
            fake_velocity_enabled: false,
            ..WaterParams::default()
        };
        let contact = FixtureContact {
            water: s.water,
            other: s.hull,
        };
        let forces = resolve_contact(&mut s.world, s.water_body, contact, &params).unwrap();
        assert_eq!(forces.drag, Vec2::ZERO);
        assert_eq!(forces.lift, Vec2::ZERO);
        assert!(forces.total().y > 0.0);
    }

    #[test]
    fn separated_shapes_apply_nothing() {
        let mut s = scene(3.0, Vec2::ZERO);
        let contact = FixtureContact {
            water: s.water,
            other: s.hull,
        };
        assert!(resolve_contact(&mut s.world, s.water_body, contact, &still_water()).is_none());
        assert!(s.world.applied_forces(s.boat).is_empty());
    }

    #[test]
    fn circles_are_rejected() {
        let mut s = scene(1.0, Vec2::ZERO);
        let ball = s
            .world
            .create_fixture(
                s.boat,
                &FixtureDef::new(
                    Shape::Circle {
                        center: Vec2::ZERO,
                        radius: 0.5,
                    },
                    1.0,
                ),
            )
            .unwrap();
        let contact = FixtureContact {
            water: s.water,
            other: ball,
        };
        assert!(resolve_contact(&mut s.world, s.water_body, contact, &still_water()).is_none());
    }
}
