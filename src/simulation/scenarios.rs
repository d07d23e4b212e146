//! Things that float: the boat and a few crates.
//!
//! To change what is dropped on the water, edit `populate()`.

use bevy::log::{debug, info, warn};
use bevy::math::Vec2;

use super::physics_config::SeaConfig;
use crate::geometry::ConvexPolygon;
use crate::physics::{BodyDef, BodyHandle, BodyKind, FixtureDef, PhysicsBackend, RapierWorld, Shape};

/// What a floating body is, for rendering and per-tick rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloaterKind {
    Boat,
    Crate,
}

#[derive(Clone, Copy, Debug)]
pub struct Floater {
    pub kind: FloaterKind,
    pub body: BodyHandle,
    pub spawn: Vec2,
}

// ==================== SCENARIO SELECTION ====================

/// Spawn everything the scene floats; bodies that fail to build are skipped.
pub fn populate(world: &mut RapierWorld, config: &SeaConfig) -> Vec<Floater> {
    let mut floaters = Vec::with_capacity(1 + config.crate_spawns.len());

    match spawn_boat(world, config) {
        Some(body) => floaters.push(Floater {
            kind: FloaterKind::Boat,
            body,
            spawn: config.boat_spawn,
        }),
        None => warn!("Boat hull is not convex, boat skipped"),
    }
    for &at in &config.crate_spawns {
        if let Some(body) = spawn_crate(world, at, config.crate_half_size, config.crate_density) {
            floaters.push(Floater {
                kind: FloaterKind::Crate,
                body,
                spawn: at,
            });
        }
    }

    info!("Scene populated with {} floating bodies", floaters.len());
    floaters
}

// ==================== BODIES ====================

/// Hull outline in body space, origin on the deck line.
pub fn boat_hull(width: f32, height: f32) -> Option<ConvexPolygon> {
    ConvexPolygon::new(vec![
        Vec2::new(-width / 2.0, 0.0),
        Vec2::new(-width / 3.0, -height / 3.0),
        Vec2::new(0.0, -2.0),
        Vec2::new(width / 3.0, -height / 3.0),
        Vec2::new(width / 2.2, 0.0),
    ])
}

pub fn spawn_boat(world: &mut RapierWorld, config: &SeaConfig) -> Option<BodyHandle> {
    let hull = boat_hull(config.boat_width, config.boat_height)?;
    let body = world.create_body(&BodyDef {
        kind: BodyKind::Dynamic,
        position: config.boat_spawn,
        ..Default::default()
    });
    world.create_fixture(body, &FixtureDef::new(Shape::Polygon(hull), config.boat_density))?;
    Some(body)
}

pub fn spawn_crate(world: &mut RapierWorld, at: Vec2, half_size: f32, density: f32) -> Option<BodyHandle> {
    let body = world.create_body(&BodyDef {
        kind: BodyKind::Dynamic,
        position: at,
        angular_damping: 0.5,
        ..Default::default()
    });
    let shape = Shape::Polygon(ConvexPolygon::rect(Vec2::ZERO, Vec2::splat(half_size)));
    world.create_fixture(body, &FixtureDef::new(shape, density))?;
    Some(body)
}

/// The boat drifts vertically and rotates but never leaves the screen centre.
pub fn hold_boat_x(world: &mut RapierWorld, floaters: &[Floater], x: f32) {
    for floater in floaters.iter().filter(|f| f.kind == FloaterKind::Boat) {
        if let Some(transform) = world.body_transform(floater.body) {
            world.set_transform(floater.body, Vec2::new(x, transform.position.y), transform.angle);
        }
    }
}

/// Crates carried out of the physical window have nothing left to float
/// on; drop them back at their spawn point.
pub fn respawn_lost_crates(world: &mut RapierWorld, floaters: &[Floater], config: &SeaConfig) {
    for floater in floaters.iter().filter(|f| f.kind == FloaterKind::Crate) {
        let Some(transform) = world.body_transform(floater.body) else {
            continue;
        };
        let position = transform.position;
        if config.physics_range.contains(position.x) && position.y > -config.boat_height {
            continue;
        }
        debug!("Crate lost at ({:.2}, {:.2}), respawning", position.x, position.y);
        world.set_transform(floater.body, floater.spawn, 0.0);
        world.set_linear_velocity(floater.body, Vec2::ZERO);
        world.set_angular_velocity(floater.body, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::physics_config::{default_sea_config, BOAT_HEIGHT, BOAT_WIDTH};

    #[test]
    fn boat_hull_is_convex() {
        let hull = boat_hull(BOAT_WIDTH, BOAT_HEIGHT).expect("hull should be convex");
        assert_eq!(hull.vertices().len(), 5);
        assert!(hull.area() > 0.0);
    }

    #[test]
    fn populate_spawns_boat_and_crates() {
        let config = default_sea_config().unwrap();
        let mut world = RapierWorld::new(config.gravity);
        let floaters = populate(&mut world, &config);
        assert_eq!(floaters.len(), 1 + config.crate_spawns.len());
        assert_eq!(floaters[0].kind, FloaterKind::Boat);
        for floater in &floaters {
            assert_eq!(world.body_kind(floater.body), Some(BodyKind::Dynamic));
        }
    }

    #[test]
    fn boat_is_held_horizontally() {
        let config = default_sea_config().unwrap();
        let mut world = RapierWorld::new(config.gravity);
        let floaters = populate(&mut world, &config);
        let boat = floaters[0].body;
        world.set_linear_velocity(boat, Vec2::new(3.0, 0.0));
        world.step(0.1);
        hold_boat_x(&mut world, &floaters, config.boat_spawn.x);
        let position = world.body_transform(boat).unwrap().position;
        assert!((position.x - config.boat_spawn.x).abs() < 1e-6);
    }

    #[test]
    fn drifting_crate_is_respawned() {
        let config = default_sea_config().unwrap();
        let mut world = RapierWorld::new(config.gravity);
        let floaters = populate(&mut world, &config);
        let crate_ = floaters[1];
        world.set_transform(crate_.body, Vec2::new(config.physics_range.to + 1.0, 5.0), 0.3);
        world.set_linear_velocity(crate_.body, Vec2::new(2.0, 0.0));
        respawn_lost_crates(&mut world, &floaters, &config);
        let transform = world.body_transform(crate_.body).unwrap();
        assert_eq!(transform.position, crate_.spawn);
        assert_eq!(world.linear_velocity(crate_.body), Some(Vec2::ZERO));
    }
}
