//! Menja - a swipe-to-smash arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, pooling, hit-testing, scene prep)
//! - `renderer`: Software painting of the prepared scene (no GPU)
//! - `platform`: Frame pacing for whatever host drives the loop
//! - `tuning`: Data-driven game balance

pub mod color;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use color::{Rgb, Rgba};
pub use tuning::{Tuning, TuningError};

/// Engine constants that are not balance knobs
pub mod consts {
    use std::f32::consts::TAU;

    /// Distance from the scene origin to the camera along +Z. Also the focal length.
    pub const CAMERA_DISTANCE: f32 = 900.0;
    /// Plane that receives shadows; the farthest negative Z any entity may reach.
    pub const BACKBOARD_Z: f32 = -400.0;
    /// Polygons whose centroid is nearer than this start fading out
    pub const CAMERA_FADE_START_Z: f32 = 0.45 * CAMERA_DISTANCE;
    /// Fully transparent from here on
    pub const CAMERA_FADE_END_Z: f32 = 0.65 * CAMERA_DISTANCE;
    /// Elevation of the light used for planar shadows (45 degrees)
    pub const LIGHT_ELEVATION: f32 = TAU / 8.0;
    /// Projection divisor never drops below this (keeps near-camera vertices finite)
    pub const MIN_PROJECTION_DISTANCE: f32 = 1.0;

    /// Nominal frame duration in milliseconds (60 Hz)
    pub const NOMINAL_FRAME_MS: f32 = 16.6667;
    /// Substitute for a negative frame delta (first frame can be whacky)
    pub const FALLBACK_FRAME_MS: f32 = 17.0;
    /// Frame time cap, i.e. the simulation never steps slower than ~15 fps
    pub const MAX_FRAME_MS: f32 = 68.0;
}

/// Clamp a number between min and max (inclusive)
#[inline]
pub fn clamp(num: f32, min: f32, max: f32) -> f32 {
    num.max(min).min(max)
}

/// Linear interpolation from `a` to `b`
#[inline]
pub fn lerp(a: f32, b: f32, mix: f32) -> f32 {
    (b - a) * mix + a
}
