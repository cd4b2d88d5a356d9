//! Per-frame render preparation
//!
//! Every frame the live entities' vertices and polygons are gathered into flat
//! buffers, lit, depth sorted (farthest first), projected, and shadowed. The
//! buffers are cleared and rebuilt each frame, so polygon geometry can never be
//! read from a previous frame.

use glam::Vec3;

use super::entity::{Entity, PolyStyle};
use super::kernel::{self, Transform};
use super::mesh::Face;
use crate::consts::{BACKBOARD_Z, CAMERA_DISTANCE, LIGHT_ELEVATION};

/// A polygon of the aggregated scene, with geometry computed this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePolygon {
    /// Indices into [`Scene::vertices`]
    pub face: Face,
    pub style: PolyStyle,
    /// World-space centroid
    pub middle: Vec3,
    /// Distance from centroid to camera
    pub depth: f32,
    pub normal_world: Vec3,
    /// Normal of the projected polygon; `z < 0` means it faces away
    pub normal_camera: Vec3,
}

/// A polygon of the projected shadow geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowPolygon {
    /// Indices into [`Scene::shadow_vertices`]
    pub face: Face,
    pub wireframe: bool,
}

/// Aggregated, sorted, projected frame geometry
#[derive(Debug, Default)]
pub struct Scene {
    vertices: Vec<Vec3>,
    polys: Vec<ScenePolygon>,
    shadow_vertices: Vec<Vec3>,
    shadow_polys: Vec<ShadowPolygon>,
}

impl Scene {
    /// Projected vertices: x/y in screen space, z still world depth
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Polygons, farthest first
    pub fn polys(&self) -> &[ScenePolygon] {
        &self.polys
    }

    pub fn shadow_vertices(&self) -> &[Vec3] {
        &self.shadow_vertices
    }

    pub fn shadow_polys(&self) -> &[ShadowPolygon] {
        &self.shadow_polys
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.polys.clear();
        self.shadow_vertices.clear();
        self.shadow_polys.clear();
    }

    /// Append an entity's current world geometry
    pub fn push_entity(&mut self, entity: &Entity) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(entity.vertices());
        self.shadow_vertices.extend_from_slice(entity.shadow_vertices());
        for face in entity.faces() {
            let face = face.offset(offset);
            self.polys.push(ScenePolygon {
                face,
                style: entity.poly_style,
                middle: Vec3::ZERO,
                depth: 0.0,
                normal_world: Vec3::ZERO,
                normal_camera: Vec3::ZERO,
            });
            self.shadow_polys.push(ShadowPolygon {
                face,
                wireframe: entity.poly_style.wireframe,
            });
        }
    }

    /// Light, sort, project and shadow everything pushed since the last `clear`
    pub fn prepare(&mut self) {
        for poly in self.polys.iter_mut() {
            poly.normal_world = kernel::polygon_normal(&poly.face, &self.vertices);
            poly.middle = kernel::polygon_middle(&poly.face, &self.vertices);
            poly.depth = kernel::polygon_depth(poly.middle, CAMERA_DISTANCE);
        }
        // Painter's algorithm; stable so equal depths keep push order
        self.polys.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        for v in self.vertices.iter_mut() {
            kernel::project_in_place(v, CAMERA_DISTANCE);
        }
        for poly in self.polys.iter_mut() {
            poly.normal_camera = kernel::polygon_normal(&poly.face, &self.vertices);
        }

        self.project_shadows();
    }

    /// Rotate into the light's frame, push each vertex toward the backboard by its
    /// height above it, rotate back, project.
    fn project_shadows(&mut self) {
        kernel::transform_in_place(
            &mut self.shadow_vertices,
            &Transform::rotation(Vec3::new(LIGHT_ELEVATION, 0.0, 0.0)),
        );
        let distance_mult = std::f32::consts::SQRT_2;
        // `vertices` were projected in place but kept their world z
        for (shadow, v) in self.shadow_vertices.iter_mut().zip(&self.vertices) {
            shadow.z -= distance_mult * (v.z - BACKBOARD_Z);
        }
        kernel::transform_in_place(
            &mut self.shadow_vertices,
            &Transform::rotation(Vec3::new(-LIGHT_ELEVATION, 0.0, 0.0)),
        );
        for v in self.shadow_vertices.iter_mut() {
            kernel::project_in_place(v, CAMERA_DISTANCE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Role, Style, TargetColor};
    use crate::sim::mesh::Mesh;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn cube_at(pos: Vec3) -> Entity {
        let mut e = Entity::new(
            Arc::new(Mesh::cube(10.0)),
            TargetColor::Blue,
            Style::Solid,
            Role::Fragment,
        );
        e.kin.position = pos;
        e.transform();
        e
    }

    #[test]
    fn test_aggregates_with_offsets() {
        let mut scene = Scene::default();
        scene.push_entity(&cube_at(Vec3::ZERO));
        scene.push_entity(&cube_at(Vec3::new(100.0, 0.0, 0.0)));
        assert_eq!(scene.vertices().len(), 16);
        assert_eq!(scene.polys().len(), 12);
        assert_eq!(scene.shadow_polys().len(), 12);
        assert!(scene.polys()[6..].iter().all(|p| p.face.indices()[0] >= 8));
        scene.clear();
        assert!(scene.vertices().is_empty() && scene.polys().is_empty());
    }

    #[test]
    fn test_sorted_farthest_first() {
        let mut scene = Scene::default();
        scene.push_entity(&cube_at(Vec3::new(0.0, 0.0, 200.0)));
        scene.push_entity(&cube_at(Vec3::new(0.0, 0.0, -300.0)));
        scene.prepare();
        let depths: Vec<f32> = scene.polys().iter().map(|p| p.depth).collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]));
        // The back cube's polygons come first
        assert!(scene.polys()[0].middle.z < -200.0);
    }

    #[test]
    fn test_front_face_faces_camera() {
        let mut scene = Scene::default();
        scene.push_entity(&cube_at(Vec3::ZERO));
        scene.prepare();
        let front = scene
            .polys()
            .iter()
            .find(|p| p.normal_world.z > 0.9)
            .map(|p| p.normal_camera.z);
        assert!(front.is_some_and(|z| z > 0.0));
        let back = scene
            .polys()
            .iter()
            .find(|p| p.normal_world.z < -0.9)
            .map(|p| p.normal_camera.z);
        assert!(back.is_some_and(|z| z < 0.0));
    }

    #[test]
    fn test_projection_keeps_world_depth() {
        let mut scene = Scene::default();
        scene.push_entity(&cube_at(Vec3::new(0.0, 0.0, 450.0)));
        scene.prepare();
        let v = scene.vertices()[0];
        // (-10, -10, 460) projects with depth 900/440
        assert!((v.z - 460.0).abs() < 1e-4);
        assert!((v.x - -10.0 * 900.0 / 440.0).abs() < 1e-3);
    }

    #[test]
    fn test_shadow_lands_on_backboard() {
        let mut scene = Scene::default();
        scene.push_entity(&cube_at(Vec3::new(0.0, 0.0, 0.0)));
        scene.prepare();
        // Shadows are shifted below the object and shrunk toward the backboard
        let obj_y: f32 = scene.vertices().iter().map(|v| v.y).sum::<f32>() / 8.0;
        let shadow_y: f32 = scene.shadow_vertices().iter().map(|v| v.y).sum::<f32>() / 8.0;
        assert!(shadow_y > obj_y);
        assert!(scene.shadow_vertices().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_near_camera_geometry_stays_finite() {
        let mut scene = Scene::default();
        scene.push_entity(&cube_at(Vec3::new(0.0, 0.0, 895.0)));
        scene.prepare();
        assert!(scene.vertices().iter().all(|v| v.is_finite()));
        assert!(scene.polys().iter().all(|p| p.normal_camera.is_finite()));
    }

    proptest! {
        #[test]
        fn prop_depth_sort_order(
            positions in prop::collection::vec(
                (-400.0f32..400.0, -300.0f32..300.0, -400.0f32..300.0), 1..12)
        ) {
            let mut scene = Scene::default();
            for (x, y, z) in positions {
                scene.push_entity(&cube_at(Vec3::new(x, y, z)));
            }
            scene.prepare();
            for pair in scene.polys().windows(2) {
                prop_assert!(pair[0].depth >= pair[1].depth);
            }
        }
    }
}
