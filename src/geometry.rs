//! Convex polygon clipping and area computation.
//!
//! Submerged areas are found by clipping one fixture outline against another
//! (Sutherland–Hodgman). Both inputs must be convex and wound counter-clockwise;
//! anything else is rejected up front so callers can skip the contact.

use bevy::math::Vec2;

/// Polygons with an absolute signed area below this are treated as degenerate.
const AREA_EPSILON: f32 = 1e-7;

/// A convex polygon with counter-clockwise winding.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Vec2>,
}

impl ConvexPolygon {
    /// Validate and normalize a vertex loop.
    ///
    /// Clockwise input is reversed. Returns `None` for fewer than three
    /// vertices, zero area, or a non-convex loop.
    pub fn new(vertices: Vec<Vec2>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let (_, area) = centroid_and_area(&vertices)?;
        let mut vertices = vertices;
        if area < 0.0 {
            vertices.reverse();
        }
        is_convex_ccw(&vertices).then_some(Self { vertices })
    }

    /// Axis-aligned box centred on `center`.
    pub fn rect(center: Vec2, half_extents: Vec2) -> Self {
        let (hx, hy) = (half_extents.x.abs(), half_extents.y.abs());
        Self {
            vertices: vec![
                center + Vec2::new(-hx, -hy),
                center + Vec2::new(hx, -hy),
                center + Vec2::new(hx, hy),
                center + Vec2::new(-hx, hy),
            ],
        }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Signed area (positive, since winding is counter-clockwise).
    pub fn area(&self) -> f32 {
        centroid_and_area(&self.vertices).map_or(0.0, |(_, a)| a)
    }

    pub fn centroid(&self) -> Vec2 {
        centroid_and_area(&self.vertices).map_or(Vec2::ZERO, |(c, _)| c)
    }

    /// Map every vertex through `f`, keeping the winding.
    ///
    /// `f` must be a rigid transform (rotation + translation) for the result
    /// to stay convex and counter-clockwise.
    pub fn map(&self, f: impl Fn(Vec2) -> Vec2) -> Self {
        Self {
            vertices: self.vertices.iter().map(|&v| f(v)).collect(),
        }
    }
}

fn is_convex_ccw(vertices: &[Vec2]) -> bool {
    let n = vertices.len();
    (0..n).all(|i| {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        (b - a).perp_dot(c - b) >= 0.0
    })
}

/// Half-plane test: `p` is strictly left of the directed edge `cp1 -> cp2`.
#[inline]
pub fn inside(cp1: Vec2, cp2: Vec2, p: Vec2) -> bool {
    (cp2 - cp1).perp_dot(p - cp1) > 0.0
}

/// Intersection of the infinite line through `cp1, cp2` with the line through `s, e`.
///
/// Only called for a segment that crosses the clip edge, so the lines are
/// never parallel.
#[inline]
pub fn line_intersection(cp1: Vec2, cp2: Vec2, s: Vec2, e: Vec2) -> Vec2 {
    let dc = cp1 - cp2;
    let dp = s - e;
    let n1 = cp1.perp_dot(cp2);
    let n2 = s.perp_dot(e);
    let n3 = 1.0 / dc.perp_dot(dp);
    (n1 * dp - n2 * dc) * n3
}

/// Clip `subject` against every edge of `clip`.
///
/// Returns `None` as soon as the subject is clipped away entirely, or if what
/// is left has fewer than three vertices.
pub fn clip(subject: &ConvexPolygon, clip: &ConvexPolygon) -> Option<Vec<Vec2>> {
    let clip_vertices = clip.vertices();
    let mut output = subject.vertices().to_vec();
    let mut input = Vec::with_capacity(output.len() + clip_vertices.len());

    let mut cp1 = clip_vertices[clip_vertices.len() - 1];
    for &cp2 in clip_vertices {
        if output.is_empty() {
            return None;
        }
        std::mem::swap(&mut input, &mut output);
        output.clear();

        let mut s = input[input.len() - 1];
        for &e in &input {
            if inside(cp1, cp2, e) {
                if !inside(cp1, cp2, s) {
                    output.push(line_intersection(cp1, cp2, s, e));
                }
                output.push(e);
            } else if inside(cp1, cp2, s) {
                output.push(line_intersection(cp1, cp2, s, e));
            }
            s = e;
        }
        cp1 = cp2;
    }

    (output.len() >= 3).then_some(output)
}

/// Convenience wrapper over raw vertex loops: validates both, then clips `a` by `b`.
pub fn intersection(a: &[Vec2], b: &[Vec2]) -> Option<Vec<Vec2>> {
    let a = ConvexPolygon::new(a.to_vec())?;
    let b = ConvexPolygon::new(b.to_vec())?;
    clip(&a, &b)
}

/// Centroid and signed area of a closed vertex loop (shoelace formula).
///
/// Area is positive for counter-clockwise loops. Returns `None` for fewer
/// than three vertices or a degenerate (zero-area) loop.
pub fn centroid_and_area(vertices: &[Vec2]) -> Option<(Vec2, f32)> {
    if vertices.len() < 3 {
        return None;
    }
    // Triangle fan around the first vertex keeps precision for loops far from the origin.
    let origin = vertices[0];
    let mut centroid = Vec2::ZERO;
    let mut area = 0.0;
    for i in 1..vertices.len() - 1 {
        let e1 = vertices[i] - origin;
        let e2 = vertices[i + 1] - origin;
        let tri_area = 0.5 * e1.perp_dot(e2);
        area += tri_area;
        centroid += tri_area * (e1 + e2) / 3.0;
    }
    if area.abs() < AREA_EPSILON {
        return None;
    }
    Some((origin + centroid / area, area))
}
