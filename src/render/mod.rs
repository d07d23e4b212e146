//! Water rendering module - vertex-coloured surface mesh plus gizmo outlines.

use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        render_asset::RenderAssetUsages,
    },
};

use crate::physics::{PhysicsBackend, Shape};
use crate::resources::SurfaceColors;
use crate::simulation::{DebugToggles, FloaterKind, Sea};
use crate::water::{world_polygon, Spring};

/// Bottom edge of the surface mesh, below the visible viewport.
pub const MESH_BOTTOM: f32 = -1.0;

/// Plugin for drawing the sea and what floats on it.
pub struct WaterRenderPlugin;

impl Plugin for WaterRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaterColors>()
            .add_systems(Startup, spawn_water_surface)
            .add_systems(
                Update,
                (update_water_surface, draw_floaters, draw_debug_overlay),
            );
    }
}

/// Colours of the water gradient.
#[derive(Resource, Default)]
pub struct WaterColors(pub SurfaceColors);

/// Marker for the entity carrying the surface mesh
#[derive(Component)]
pub struct WaterSurface;

// ==================== Mesh generation ====================

/// Surface geometry ready for upload.
#[derive(Debug, Default, Clone)]
pub struct SurfaceMesh {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn into_mesh(self) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, self.colors);
        mesh.insert_indices(Indices::U32(self.indices));
        mesh
    }
}

/// One quad per adjacent spring pair, from the spring tops down to `bottom`.
///
/// Quad vertices are bottom-right, top-right, top-left, bottom-left, drawn
/// as triangles (0, 1, 2) and (2, 3, 0).
pub fn build_surface_mesh(springs: &[Spring], colors: &SurfaceColors, bottom: f32) -> SurfaceMesh {
    let quads = springs.len().saturating_sub(1);
    let mut out = SurfaceMesh {
        positions: Vec::with_capacity(4 * quads),
        colors: Vec::with_capacity(4 * quads),
        indices: Vec::with_capacity(6 * quads),
    };

    let surface = colors.surface.to_array();
    let deep = colors.deep.to_array();
    for pair in springs.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        let base = out.positions.len() as u32;

        out.positions.extend([
            [right.x(), bottom, 0.0],
            [right.x(), right.height(), 0.0],
            [left.x(), left.height(), 0.0],
            [left.x(), bottom, 0.0],
        ]);
        out.colors.extend([deep, surface, surface, deep]);
        out.indices
            .extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    out
}

// ==================== Systems ====================

fn spawn_water_surface(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let mesh = meshes.add(SurfaceMesh::default().into_mesh());
    let material = materials.add(ColorMaterial::default());
    commands.spawn((
        WaterSurface,
        Mesh2d(mesh),
        MeshMaterial2d(material),
        Transform::from_xyz(0.0, 0.0, 1.0),
    ));
}

/// Rebuild the surface mesh from the current spring heights.
fn update_water_surface(
    sea: Option<Res<Sea>>,
    colors: Res<WaterColors>,
    toggles: Res<DebugToggles>,
    mut surfaces: Query<(&Mesh2d, &mut Visibility), With<WaterSurface>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Some(sea) = sea else {
        return;
    };
    for (handle, mut visibility) in &mut surfaces {
        *visibility = if toggles.water_mesh {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if let Some(mesh) = meshes.get_mut(&handle.0) {
            *mesh = build_surface_mesh(sea.water.springs(), &colors.0, MESH_BOTTOM).into_mesh();
        }
    }
}

fn draw_floaters(sea: Option<Res<Sea>>, mut gizmos: Gizmos) {
    let Some(sea) = sea else {
        return;
    };
    for floater in &sea.floaters {
        let color = match floater.kind {
            FloaterKind::Boat => Color::srgb(0.9, 0.6, 0.2),
            FloaterKind::Crate => Color::srgb(0.6, 0.4, 0.2),
        };
        for fixture in sea.world.body_fixtures(floater.body) {
            if let Some(Shape::Polygon(polygon)) = sea.world.fixture_world_shape(fixture) {
                outline(&mut gizmos, polygon.vertices(), color);
            }
        }
    }
}

/// Spring columns, live water fixtures and applied forces.
fn draw_debug_overlay(sea: Option<Res<Sea>>, toggles: Res<DebugToggles>, mut gizmos: Gizmos) {
    if !toggles.overlay {
        return;
    }
    let Some(sea) = sea else {
        return;
    };

    let spring_color = Color::srgb(0.0, 0.5, 1.0);
    for spring in sea.water.springs() {
        gizmos.line_2d(
            Vec2::new(spring.x(), MESH_BOTTOM),
            Vec2::new(spring.x(), spring.height()),
            spring_color,
        );
    }

    let fixture_color = Color::srgba(0.2, 1.0, 0.4, 0.6);
    for &fixture in sea.water.fixtures() {
        if let Some(polygon) = world_polygon(&sea.world, fixture) {
            outline(&mut gizmos, polygon.vertices(), fixture_color);
        }
    }

    let force_color = Color::srgb(1.0, 0.2, 0.2);
    for forces in &sea.last_forces {
        gizmos.arrow_2d(forces.centroid, forces.centroid + forces.total() * 0.1, force_color);
    }
}

fn outline(gizmos: &mut Gizmos, vertices: &[Vec2], color: Color) {
    let closed = vertices.iter().chain(vertices.first()).copied();
    gizmos.linestrip_2d(closed, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn springs() -> Vec<Spring> {
        vec![
            Spring::new(0.0, 5.0),
            Spring::new(1.0, 6.0),
            Spring::new(2.0, 4.0),
        ]
    }

    #[test]
    fn one_quad_per_spring_pair() {
        let mesh = build_surface_mesh(&springs(), &SurfaceColors::default(), MESH_BOTTOM);
        assert_eq!(mesh.positions.len(), 8);
        assert_eq!(mesh.colors.len(), 8);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn quad_corners_follow_spring_heights() {
        let mesh = build_surface_mesh(&springs(), &SurfaceColors::default(), MESH_BOTTOM);
        assert_eq!(
            &mesh.positions[0..4],
            &[
                [1.0, MESH_BOTTOM, 0.0],
                [1.0, 6.0, 0.0],
                [0.0, 5.0, 0.0],
                [0.0, MESH_BOTTOM, 0.0],
            ]
        );
    }

    #[test]
    fn top_vertices_use_surface_colour() {
        let colors = SurfaceColors::default();
        let mesh = build_surface_mesh(&springs(), &colors, MESH_BOTTOM);
        assert_eq!(mesh.colors[1], colors.surface.to_array());
        assert_eq!(mesh.colors[2], colors.surface.to_array());
        assert_eq!(mesh.colors[0], colors.deep.to_array());
        assert_eq!(mesh.colors[3], colors.deep.to_array());
    }

    #[test]
    fn fewer_than_two_springs_give_no_geometry() {
        let mesh = build_surface_mesh(&[Spring::new(0.0, 5.0)], &SurfaceColors::default(), 0.0);
        assert!(mesh.is_empty());
        assert!(mesh.indices.is_empty());
    }
}
