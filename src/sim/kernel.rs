//! Vector/transform kernel
//!
//! Stateless helpers for the software 3D pipeline: Euler rotation (X, then Y,
//! then Z), scale, translation, perspective projection and per-polygon geometry.
//! World space has +Y pointing down the screen and the camera sitting on +Z
//! looking toward the origin.

use glam::{Vec2, Vec3};

use super::mesh::Face;
use crate::consts::MIN_PROJECTION_DISTANCE;

/// Translation, Euler rotation (radians) and non-uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Vec3,
    pub rotate: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translate: Vec3::ZERO,
        rotate: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn new(translate: Vec3, rotate: Vec3, scale: Vec3) -> Self {
        Self {
            translate,
            rotate,
            scale,
        }
    }

    /// Pure rotation about the origin
    pub fn rotation(rotate: Vec3) -> Self {
        Self {
            rotate,
            ..Self::IDENTITY
        }
    }

    /// Sines/cosines only need computing once for a whole vertex batch
    fn prepare(&self) -> PreparedTransform {
        let (sin_x, cos_x) = self.rotate.x.sin_cos();
        let (sin_y, cos_y) = self.rotate.y.sin_cos();
        let (sin_z, cos_z) = self.rotate.z.sin_cos();
        PreparedTransform {
            sin: Vec3::new(sin_x, sin_y, sin_z),
            cos: Vec3::new(cos_x, cos_y, cos_z),
            translate: self.translate,
            scale: self.scale,
        }
    }

    /// Apply to a single point
    pub fn apply(&self, v: Vec3) -> Vec3 {
        self.prepare().apply(v)
    }
}

struct PreparedTransform {
    sin: Vec3,
    cos: Vec3,
    translate: Vec3,
    scale: Vec3,
}

impl PreparedTransform {
    #[inline]
    fn apply(&self, v: Vec3) -> Vec3 {
        let (s, c) = (self.sin, self.cos);
        // X axis
        let x1 = v.x;
        let y1 = v.z * s.x + v.y * c.x;
        let z1 = v.z * c.x - v.y * s.x;
        // Y axis
        let x2 = x1 * c.y - z1 * s.y;
        let y2 = y1;
        let z2 = x1 * s.y + z1 * c.y;
        // Z axis
        let x3 = x2 * c.z - y2 * s.z;
        let y3 = x2 * s.z + y2 * c.z;
        let z3 = z2;

        Vec3::new(x3, y3, z3) * self.scale + self.translate
    }
}

/// Rotate (X, Y, Z order), scale, then translate every vertex of `source` into `target`.
///
/// # Panics
/// If the buffers differ in length. Callers size both from the same mesh.
pub fn transform_vertices(source: &[Vec3], target: &mut [Vec3], transform: &Transform) {
    assert_eq!(
        source.len(),
        target.len(),
        "transform buffers must have equal length"
    );
    let prepared = transform.prepare();
    for (src, dst) in source.iter().zip(target.iter_mut()) {
        *dst = prepared.apply(*src);
    }
}

/// In-place variant of [`transform_vertices`]
pub fn transform_in_place(vertices: &mut [Vec3], transform: &Transform) {
    let prepared = transform.prepare();
    for v in vertices.iter_mut() {
        *v = prepared.apply(*v);
    }
}

/// Perspective projection: `depth = d / (d - z)`, scaling x and y.
///
/// Unclamped; degenerates as `z` approaches `camera_distance`.
#[inline]
pub fn project(v: Vec3, camera_distance: f32) -> Vec2 {
    let depth = camera_distance / (camera_distance - v.z);
    Vec2::new(v.x * depth, v.y * depth)
}

/// Projection that never divides by less than [`MIN_PROJECTION_DISTANCE`]
#[inline]
pub fn project_clamped(v: Vec3, camera_distance: f32) -> Vec2 {
    let z = v.z.min(camera_distance - MIN_PROJECTION_DISTANCE);
    project(Vec3::new(v.x, v.y, z), camera_distance)
}

/// Project in place: x/y become screen coordinates, z keeps the world depth.
#[inline]
pub fn project_in_place(v: &mut Vec3, camera_distance: f32) {
    let p = project_clamped(*v, camera_distance);
    v.x = p.x;
    v.y = p.y;
}

/// Unit normal from the cross product of the first two edges (winding order).
///
/// Zero-area polygons yield `Vec3::ZERO` instead of NaN.
pub fn polygon_normal(face: &Face, vertices: &[Vec3]) -> Vec3 {
    let idx = face.indices();
    let v1 = vertices[idx[0] as usize];
    let v2 = vertices[idx[1] as usize];
    let v3 = vertices[idx[2] as usize];
    let a = v1 - v2;
    let b = v1 - v3;
    let n = a.cross(b);
    let mag = n.length();
    if mag > f32::EPSILON && mag.is_finite() {
        n / mag
    } else {
        log::trace!("degenerate polygon normal, magnitude {mag}");
        Vec3::ZERO
    }
}

/// Centroid of a triangle or quad
pub fn polygon_middle(face: &Face, vertices: &[Vec3]) -> Vec3 {
    let idx = face.indices();
    let sum: Vec3 = idx.iter().map(|&i| vertices[i as usize]).sum();
    sum / idx.len() as f32
}

/// Euclidean distance from a polygon centroid to the camera (all three axes, not view depth).
#[inline]
pub fn polygon_depth(middle: Vec3, camera_distance: f32) -> f32 {
    Vec3::new(middle.x, middle.y, middle.z - camera_distance).length()
}
