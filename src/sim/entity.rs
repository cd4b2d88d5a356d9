//! Drawable, simulatable 3D objects
//!
//! Targets and fragments share one representation; `Role` carries what differs.
//! Entities never register themselves anywhere: the tick decides whether an
//! entity lives in an active list or in the pool.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use super::kernel::{self, Transform};
use super::mesh::{Face, Mesh};
use crate::color::{Rgb, colors};
use crate::consts::CAMERA_DISTANCE;

/// Closed set of target colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetColor {
    Blue,
    Green,
    Pink,
    Orange,
}

impl TargetColor {
    pub const ALL: [TargetColor; 4] = [
        TargetColor::Blue,
        TargetColor::Green,
        TargetColor::Pink,
        TargetColor::Orange,
    ];

    /// Colors a regular (non-special) target may be given
    pub const REGULAR: [TargetColor; 3] = [TargetColor::Blue, TargetColor::Green, TargetColor::Orange];

    pub fn rgb(self) -> Rgb {
        match self {
            TargetColor::Blue => colors::BLUE,
            TargetColor::Green => colors::GREEN,
            TargetColor::Pink => colors::PINK,
            TargetColor::Orange => colors::ORANGE,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Solid (filled, lit) or wireframe (stroke only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Solid,
    Wireframe,
}

impl Style {
    pub const ALL: [Style; 2] = [Style::Solid, Style::Wireframe];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Entity category, used as the first component of a pool key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Target,
    Fragment,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Target, Category::Fragment];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Per-category state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Target { health: u32, max_health: u32 },
    Fragment,
}

impl Role {
    pub fn category(&self) -> Category {
        match self {
            Role::Target { .. } => Category::Target,
            Role::Fragment => Category::Fragment,
        }
    }
}

/// Appearance shared by every polygon of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyStyle {
    pub color: Rgb,
    pub wireframe: bool,
    /// Zero means no stroke
    pub stroke_width: f32,
    pub stroke_color: Rgb,
}

impl PolyStyle {
    fn new(color: TargetColor, style: Style) -> Self {
        let wireframe = style == Style::Wireframe;
        Self {
            color: color.rgb(),
            wireframe,
            stroke_width: if wireframe { 2.0 } else { 0.0 },
            stroke_color: color.rgb(),
        }
    }
}

/// Position, velocity, rotation, angular velocity and scale.
///
/// Velocities are per nominal (60 Hz) frame and get multiplied by the frame's speed scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Vec3,
    pub spin: Vec3,
    pub scale: Vec3,
}

impl Kinematics {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        velocity: Vec3::ZERO,
        rotation: Vec3::ZERO,
        spin: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation, self.scale)
    }

    /// Where this object was one nominal frame ago
    pub fn previous_transform(&self) -> Transform {
        Transform::new(
            self.position - self.velocity,
            self.rotation - self.spin,
            self.scale,
        )
    }

    /// Advance position and rotation by `speed` nominal frames
    #[inline]
    pub fn integrate(&mut self, speed: f32) {
        self.position += self.velocity * speed;
        self.rotation += self.spin * speed;
    }
}

impl Default for Kinematics {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A mesh instance with live world-space buffers
#[derive(Debug, Clone)]
pub struct Entity {
    mesh: Arc<Mesh>,
    /// World-space vertices, rebuilt by `transform`
    vertices: Vec<Vec3>,
    /// Copy of `vertices` that the shadow pass may mutate freely
    shadow_vertices: Vec<Vec3>,
    pub color: TargetColor,
    pub style: Style,
    pub poly_style: PolyStyle,
    pub role: Role,
    pub kin: Kinematics,
    /// Projected origin, used for hit-testing
    pub projected: Vec2,
    /// Set while the pointer overlaps this frame; at most one hit per overlap
    pub hit: bool,
}

impl Entity {
    pub fn new(mesh: Arc<Mesh>, color: TargetColor, style: Style, role: Role) -> Self {
        let vertices = mesh.vertices().to_vec();
        let shadow_vertices = vertices.clone();
        Self {
            mesh,
            vertices,
            shadow_vertices,
            color,
            style,
            poly_style: PolyStyle::new(color, style),
            role,
            kin: Kinematics::IDENTITY,
            projected: Vec2::ZERO,
            hit: false,
        }
    }

    pub fn category(&self) -> Category {
        self.role.category()
    }

    pub fn is_wireframe(&self) -> bool {
        self.style == Style::Wireframe
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn shadow_vertices(&self) -> &[Vec3] {
        &self.shadow_vertices
    }

    pub fn faces(&self) -> &[Face] {
        self.mesh.faces()
    }

    /// Rebuild world vertices from the base mesh and mirror them into the shadow buffer.
    pub fn transform(&mut self) {
        kernel::transform_vertices(self.mesh.vertices(), &mut self.vertices, &self.kin.transform());
        self.shadow_vertices.copy_from_slice(&self.vertices);
    }

    /// Update the cached 2D origin
    pub fn project_origin(&mut self) {
        self.projected = kernel::project_clamped(self.kin.position, CAMERA_DISTANCE);
    }

    /// Back to the state `new` builds for the same color and style.
    ///
    /// Buffers are overwritten in place, never reallocated.
    pub fn reset(&mut self) {
        self.kin = Kinematics::IDENTITY;
        self.projected = Vec2::ZERO;
        self.hit = false;
        self.poly_style = PolyStyle::new(self.color, self.style);
        if let Role::Target { .. } = self.role {
            self.role = Role::Target {
                health: 0,
                max_health: 0,
            };
        }
        self.vertices.copy_from_slice(self.mesh.vertices());
        self.shadow_vertices.copy_from_slice(self.mesh.vertices());
    }

    pub fn health(&self) -> u32 {
        match self.role {
            Role::Target { health, .. } => health,
            Role::Fragment => 0,
        }
    }

    /// Set health (targets only) and refresh the glue stroke showing it.
    ///
    /// Wireframe targets keep their edge stroke.
    pub fn set_health(&mut self, health: u32, max_health: u32) {
        if let Role::Target { .. } = self.role {
            self.role = Role::Target { health, max_health };
            if !self.is_wireframe() {
                self.poly_style.stroke_width = health.saturating_sub(1) as f32;
                self.poly_style.stroke_color = colors::GLUE;
            }
        }
    }

    /// Remove one point of health, returning what is left
    pub fn damage(&mut self) -> u32 {
        match self.role {
            Role::Target { health, max_health } => {
                let left = health.saturating_sub(1);
                self.set_health(left, max_health);
                left
            }
            Role::Fragment => 0,
        }
    }
}
