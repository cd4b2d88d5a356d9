//! 2D particles drawn over the 3D scene: sparks and the pointer trail

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::kernel;
use super::pool::SparkPool;
use crate::consts::CAMERA_DISTANCE;
use crate::tuning::{EffectsTuning, PhysicsTuning};

/// Short-lived streak in screen space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life (simulated ms)
    pub life: f32,
    pub max_life: f32,
}

impl Spark {
    /// Remaining life as a fraction of the initial life
    pub fn life_fraction(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).max(0.0)
        } else {
            0.0
        }
    }
}

/// Live sparks plus their free-list
#[derive(Debug, Default)]
pub struct Sparks {
    live: Vec<Spark>,
    pool: SparkPool,
}

impl Sparks {
    pub fn live(&self) -> &[Spark] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn pool(&self) -> &SparkPool {
        &self.pool
    }

    /// Emit one spark, started half a frame along its velocity
    pub fn add<R: Rng>(&mut self, rng: &mut R, pos: Vec2, vel: Vec2, effects: &EffectsTuning) {
        let mut spark = self.pool.acquire();
        let life = rng.random_range(effects.spark_life_min..effects.spark_life_max);
        spark.pos = pos + vel * 0.5;
        spark.vel = vel;
        spark.life = life;
        spark.max_life = life;
        self.live.push(spark);
    }

    /// `count` sparks at evenly spaced, jittered angles. Most sparks fly near `max_speed`.
    pub fn burst<R: Rng>(
        &mut self,
        rng: &mut R,
        pos: Vec2,
        count: u32,
        max_speed: f32,
        effects: &EffectsTuning,
    ) {
        if count == 0 {
            return;
        }
        let angle_inc = TAU / count as f32;
        for i in 0..count {
            let angle = i as f32 * angle_inc + angle_inc * rng.random::<f32>();
            let speed = (1.0 - rng.random::<f32>().powi(3)) * max_speed;
            let vel = Vec2::new(angle.sin() * speed, angle.cos() * speed);
            self.add(rng, pos, vel, effects);
        }
    }

    /// Leak sparks from a random subset of world-space vertices
    pub fn shed<R: Rng>(&mut self, rng: &mut R, vertices: &[Vec3], effects: &EffectsTuning) {
        let speed = effects.glue_spark_speed;
        for v in vertices {
            if rng.random::<f32>() < effects.glue_shed_chance {
                let pos = kernel::project_clamped(*v, CAMERA_DISTANCE);
                let vel = Vec2::new(
                    rng.random_range(-speed..speed),
                    rng.random_range(-speed..speed),
                );
                self.add(rng, pos, vel, effects);
            }
        }
    }

    /// Age, expire, then integrate with drag and gravity
    pub fn update(&mut self, sim_time: f32, sim_speed: f32, physics: &PhysicsTuning) {
        let drag = 1.0 - physics.spark_air_drag * sim_speed;
        for i in (0..self.live.len()).rev() {
            let spark = &mut self.live[i];
            spark.life -= sim_time;
            if spark.life <= 0.0 {
                let spark = self.live.swap_remove(i);
                self.pool.release(spark);
                continue;
            }
            spark.pos += spark.vel * sim_speed;
            spark.vel *= drag;
            spark.vel.y += physics.gravity * sim_speed;
        }
    }

    pub fn clear(&mut self) {
        for spark in self.live.drain(..) {
            self.pool.release(spark);
        }
    }
}

/// One sample of the pointer trail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Remaining life (simulated ms)
    pub life: f32,
    /// Marks a pointer release; segments touching it are not drawn or measured
    pub touch_break: bool,
}

/// Recent pointer positions, oldest first
#[derive(Debug, Default)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
}

impl Trail {
    pub fn points(&self) -> &VecDeque<TrailPoint> {
        &self.points
    }

    /// Position of the newest sample, unless it is a break
    pub fn last_position(&self) -> Option<Vec2> {
        self.points
            .back()
            .filter(|p| !p.touch_break)
            .map(|p| p.pos)
    }

    /// Age every sample, record `pointer` if engaged, then drop expired samples from the front.
    pub fn update(&mut self, sim_time: f32, pointer: Option<Vec2>, life: f32) {
        for p in self.points.iter_mut() {
            p.life -= sim_time;
        }
        if let Some(pos) = pointer {
            self.points.push_back(TrailPoint {
                pos,
                life,
                touch_break: false,
            });
        }
        while self.points.front().is_some_and(|p| p.life <= 0.0) {
            self.points.pop_front();
        }
    }

    pub fn push_break(&mut self, life: f32) {
        self.points.push_back(TrailPoint {
            pos: Vec2::ZERO,
            life,
            touch_break: true,
        });
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_add_offsets_by_half_velocity() {
        let effects = EffectsTuning::default();
        let mut sparks = Sparks::default();
        sparks.add(&mut rng(), Vec2::new(10.0, 10.0), Vec2::new(4.0, -2.0), &effects);
        let s = sparks.live()[0];
        assert_eq!(s.pos, Vec2::new(12.0, 9.0));
        assert!(s.life >= 200.0 && s.life < 300.0);
        assert_eq!(s.life, s.max_life);
    }

    #[test]
    fn test_burst_count_and_speed() {
        let effects = EffectsTuning::default();
        let mut sparks = Sparks::default();
        sparks.burst(&mut rng(), Vec2::ZERO, 8, 10.0, &effects);
        assert_eq!(sparks.len(), 8);
        assert!(sparks.live().iter().all(|s| s.vel.length() <= 10.0 + 1e-4));
    }

    #[test]
    fn test_burst_of_zero_is_empty() {
        let effects = EffectsTuning::default();
        let mut sparks = Sparks::default();
        sparks.burst(&mut rng(), Vec2::ZERO, 0, 10.0, &effects);
        assert!(sparks.is_empty());
    }

    #[test]
    fn test_shed_emits_subset() {
        let effects = EffectsTuning::default();
        let mut sparks = Sparks::default();
        let verts = vec![Vec3::new(1.0, 2.0, 0.0); 200];
        sparks.shed(&mut rng(), &verts, &effects);
        assert!(sparks.len() > 0 && sparks.len() < 200);
        for s in sparks.live() {
            assert!(s.vel.x.abs() <= 12.0 && s.vel.y.abs() <= 12.0);
        }
    }

    #[test]
    fn test_update_expires_into_pool() {
        let effects = EffectsTuning::default();
        let physics = PhysicsTuning::default();
        let mut sparks = Sparks::default();
        sparks.burst(&mut rng(), Vec2::ZERO, 4, 5.0, &effects);
        sparks.update(100.0, 1.0, &physics);
        assert_eq!(sparks.len(), 4);
        sparks.update(200.0, 1.0, &physics);
        assert!(sparks.is_empty());
        assert_eq!(sparks.pool().pooled(), 4);

        sparks.burst(&mut rng(), Vec2::ZERO, 4, 5.0, &effects);
        assert_eq!(sparks.pool().constructed(), 4);
    }

    #[test]
    fn test_update_applies_drag_and_gravity() {
        let physics = PhysicsTuning::default();
        let mut sparks = Sparks::default();
        sparks.live.push(Spark {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, 0.0),
            life: 100.0,
            max_life: 100.0,
        });
        sparks.update(16.0, 1.0, &physics);
        let s = sparks.live()[0];
        assert_eq!(s.pos, Vec2::new(10.0, 0.0));
        assert!((s.vel.x - 9.0).abs() < 1e-5);
        assert!((s.vel.y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_trail_ages_and_evicts_fifo() {
        let mut trail = Trail::default();
        trail.update(16.0, Some(Vec2::new(1.0, 1.0)), 120.0);
        trail.update(16.0, Some(Vec2::new(2.0, 2.0)), 120.0);
        assert_eq!(trail.points().len(), 2);
        assert_eq!(trail.last_position(), Some(Vec2::new(2.0, 2.0)));
        // First sample has lived 16ms more than the second
        trail.update(104.0, None, 120.0);
        assert_eq!(trail.points().len(), 1);
        assert_eq!(trail.points()[0].pos, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_break_hides_last_position() {
        let mut trail = Trail::default();
        trail.update(16.0, Some(Vec2::ONE), 120.0);
        trail.push_break(120.0);
        assert_eq!(trail.last_position(), None);
    }
}
