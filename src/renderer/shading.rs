//! Directional lighting and camera-proximity fade

use glam::Vec3;

use crate::consts::{CAMERA_FADE_END_Z, CAMERA_FADE_START_Z};

/// Lightness (0..1, 0.5 = base color) of a solid polygon with the given world normal.
///
/// Faces tilted down or away from the camera all get the same dark value. The
/// rest brighten as they turn up toward the camera.
pub fn lightness(normal_world: Vec3) -> f32 {
    let normal_light = normal_world.y * 0.5 - normal_world.z * 0.5;
    if normal_light > 0.0 {
        0.1
    } else {
        ((normal_light.powi(32) - normal_light) / 2.0) * 0.9 + 0.1
    }
}

/// Opacity of a polygon whose centroid sits at world depth `z`
pub fn fade_alpha(z: f32) -> f32 {
    if z <= CAMERA_FADE_START_Z {
        return 1.0;
    }
    let range = CAMERA_FADE_END_Z - CAMERA_FADE_START_Z;
    // Past the end the ratio exceeds 1; negative alpha would read as opaque
    (1.0 - (z - CAMERA_FADE_START_Z) / range).max(0.0)
}
