//! Immutable base geometry shared by every entity built from it
//!
//! Meshes are authored elsewhere; the simulation only checks they are usable.
//! The model origin is the center of the mesh.

use std::sync::Arc;

use glam::Vec3;
use thiserror::Error;

/// Mesh rejected at construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("polygon {poly} has {count} vertices (expected 3 or 4)")]
    BadArity { poly: usize, count: usize },
    #[error("polygon {poly} references vertex {index}, but the mesh has {len}")]
    IndexOutOfRange { poly: usize, index: u32, len: usize },
}

/// A triangle or quad, as indices into a vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    indices: [u32; 4],
    len: u8,
}

impl Face {
    pub fn tri(a: u32, b: u32, c: u32) -> Self {
        Self {
            indices: [a, b, c, 0],
            len: 3,
        }
    }

    pub fn quad(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self {
            indices: [a, b, c, d],
            len: 4,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices[..self.len as usize]
    }

    /// Same face with every index shifted by `offset` (used when aggregating buffers)
    #[inline]
    pub fn offset(&self, offset: u32) -> Self {
        let mut indices = self.indices;
        for i in indices.iter_mut().take(self.len as usize) {
            *i += offset;
        }
        Self {
            indices,
            len: self.len,
        }
    }
}

/// Validated vertex + polygon topology
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Build a mesh from vertex positions and polygon index lists.
    pub fn new(vertices: Vec<Vec3>, polys: &[Vec<u32>]) -> Result<Self, MeshError> {
        let mut faces = Vec::with_capacity(polys.len());
        for (poly, indices) in polys.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(MeshError::IndexOutOfRange {
                    poly,
                    index,
                    len: vertices.len(),
                });
            }
            let face = match indices[..] {
                [a, b, c] => Face::tri(a, b, c),
                [a, b, c, d] => Face::quad(a, b, c, d),
                _ => {
                    return Err(MeshError::BadArity {
                        poly,
                        count: indices.len(),
                    });
                }
            };
            faces.push(face);
        }
        Ok(Self { vertices, faces })
    }

    /// Axis-aligned cube with the given half edge length (8 vertices, 6 quads).
    pub fn cube(half_extent: f32) -> Self {
        let s = half_extent;
        let vertices = vec![
            Vec3::new(-s, -s, s),
            Vec3::new(s, -s, s),
            Vec3::new(s, s, s),
            Vec3::new(-s, s, s),
            Vec3::new(-s, -s, -s),
            Vec3::new(s, -s, -s),
            Vec3::new(s, s, -s),
            Vec3::new(-s, s, -s),
        ];
        let faces = vec![
            Face::quad(0, 1, 2, 3),
            Face::quad(7, 6, 5, 4),
            Face::quad(3, 2, 6, 7),
            Face::quad(4, 5, 1, 0),
            Face::quad(5, 6, 2, 1),
            Face::quad(0, 3, 7, 4),
        ];
        Self { vertices, faces }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }
}

/// All geometry the simulation needs: the target model, the fragment model, and
/// the offsets (in target model space) at which fragments appear when a target bursts.
#[derive(Debug, Clone)]
pub struct MeshSet {
    pub target: Arc<Mesh>,
    pub fragment: Arc<Mesh>,
    pub burst_offsets: Vec<Vec3>,
}

impl MeshSet {
    pub fn new(target: Mesh, fragment: Mesh, burst_offsets: Vec<Vec3>) -> Self {
        Self {
            target: Arc::new(target),
            fragment: Arc::new(fragment),
            burst_offsets,
        }
    }

    /// Cube target and fragments, one fragment per target corner
    pub fn cubes(target_radius: f32, frag_radius: f32) -> Self {
        let offsets = Mesh::cube(target_radius - frag_radius).vertices.clone();
        Self::new(Mesh::cube(target_radius), Mesh::cube(frag_radius), offsets)
    }

    pub fn fragment_count(&self) -> usize {
        self.burst_offsets.len()
    }
}
