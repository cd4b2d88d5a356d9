//! Pointer hit-testing and play-volume bounds
//!
//! A fast swipe can cover several target radii in one frame, so the pointer's
//! last-frame displacement is sampled at evenly spaced points instead of only
//! testing where the pointer ended up.

use glam::Vec2;

/// Pointer motion over the last frame, in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSweep {
    /// Where the pointer is now
    pub end: Vec2,
    /// Displacement since the previous frame
    pub delta: Vec2,
}

impl PointerSweep {
    pub fn new(end: Vec2, delta: Vec2) -> Self {
        Self { end, delta }
    }

    pub fn speed(&self) -> f32 {
        self.delta.length()
    }

    /// Samples needed so consecutive samples are at most half a target radius apart.
    ///
    /// Uses the on-screen speed; a stationary pointer tests nothing.
    pub fn sample_count(&self, target_radius: f32) -> u32 {
        if target_radius <= 0.0 {
            return 0;
        }
        (self.speed() / target_radius * 2.0).ceil() as u32
    }

    /// Sample `k` of `count`, oldest first. The previous position (k = 0) is skipped
    /// and the current one (k = count) included.
    #[inline]
    pub fn sample(&self, k: u32, count: u32) -> Vec2 {
        let percent = 1.0 - k as f32 / count as f32;
        self.end - self.delta * percent
    }

    /// First sample, oldest to newest, within `hit_radius` of `center`
    pub fn first_hit(&self, center: Vec2, target_radius: f32, hit_radius: f32) -> Option<Vec2> {
        let count = self.sample_count(target_radius);
        (1..=count)
            .map(|k| self.sample(k, count))
            .find(|p| p.distance(center) <= hit_radius)
    }
}

/// Damped reflection off a lower bound. Returns true if the bound was crossed.
#[inline]
pub fn reflect_min(pos: &mut f32, vel: &mut f32, bound: f32, damping: f32) -> bool {
    if *pos < bound {
        *pos = bound;
        *vel *= -damping;
        true
    } else {
        false
    }
}

/// Damped reflection off an upper bound. Returns true if the bound was crossed.
#[inline]
pub fn reflect_max(pos: &mut f32, vel: &mut f32, bound: f32, damping: f32) -> bool {
    if *pos > bound {
        *pos = bound;
        *vel *= -damping;
        true
    } else {
        false
    }
}

/// Inelastic stop at a ceiling (screen-space up is -Y)
#[inline]
pub fn clamp_ceiling(y: &mut f32, vel_y: &mut f32, ceiling: f32) {
    if *y < ceiling {
        *y = ceiling;
        *vel_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count() {
        let sweep = PointerSweep::new(Vec2::ZERO, Vec2::new(300.0, 0.0));
        assert_eq!(sweep.sample_count(40.0), 15);
        let still = PointerSweep::new(Vec2::ZERO, Vec2::ZERO);
        assert_eq!(still.sample_count(40.0), 0);
        let slow = PointerSweep::new(Vec2::ZERO, Vec2::new(1.0, 0.0));
        assert_eq!(slow.sample_count(40.0), 1);
    }

    #[test]
    fn test_samples_skip_start_include_end() {
        let sweep = PointerSweep::new(Vec2::new(100.0, 0.0), Vec2::new(100.0, 0.0));
        let count = 4;
        assert_eq!(sweep.sample(1, count), Vec2::new(25.0, 0.0));
        assert_eq!(sweep.sample(count, count), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_fast_swipe_hits_target_it_passed_through() {
        // Pointer started left of the target and ended far right of it
        let sweep = PointerSweep::new(Vec2::new(400.0, 0.0), Vec2::new(800.0, 0.0));
        let hit = sweep.first_hit(Vec2::ZERO, 40.0, 50.0);
        assert!(hit.is_some());
        assert!(hit.is_some_and(|p| p.length() <= 50.0));

        // Only testing the end point would have missed
        assert!(sweep.end.distance(Vec2::ZERO) > 50.0);
    }

    #[test]
    fn test_first_hit_is_oldest_sample() {
        let sweep = PointerSweep::new(Vec2::new(40.0, 0.0), Vec2::new(80.0, 0.0));
        let hit = sweep.first_hit(Vec2::ZERO, 40.0, 50.0);
        // Samples at -20, 0, 20, 40 -> -20 is first in range
        assert_eq!(hit, Some(Vec2::new(-20.0, 0.0)));
    }

    #[test]
    fn test_miss() {
        let sweep = PointerSweep::new(Vec2::new(0.0, 200.0), Vec2::new(100.0, 0.0));
        assert_eq!(sweep.first_hit(Vec2::ZERO, 40.0, 50.0), None);
    }

    #[test]
    fn test_reflect_min() {
        let (mut x, mut vx) = (-510.0, -10.0);
        assert!(reflect_min(&mut x, &mut vx, -500.0, 0.4));
        assert_eq!(x, -500.0);
        assert!((vx - 4.0).abs() < 1e-6);

        let (mut x, mut vx) = (0.0, -10.0);
        assert!(!reflect_min(&mut x, &mut vx, -500.0, 0.4));
        assert_eq!(vx, -10.0);
    }

    #[test]
    fn test_reflect_max() {
        let (mut x, mut vx) = (520.0, 10.0);
        assert!(reflect_max(&mut x, &mut vx, 500.0, 0.4));
        assert_eq!(x, 500.0);
        assert!((vx + 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_ceiling() {
        let (mut y, mut vy) = (-700.0, -5.0);
        clamp_ceiling(&mut y, &mut vy, -620.0);
        assert_eq!((y, vy), (-620.0, 0.0));
    }
}
