//! Data-driven game balance
//!
//! Every knob defaults to the values the game shipped with. A JSON document may
//! override any subset; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Parameters of one rate-limited spawner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnerTuning {
    /// Probability (0-1) that an eligible spawn roll succeeds
    pub chance: f32,
    /// Simulated milliseconds needed to recharge one unit
    pub cooldown_per_spawn: f32,
    /// Burst capacity
    pub max_spawns: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Base delay between spawns (ms) before any cubes are smashed
    pub delay_max: f32,
    /// Floor for the base delay (ms)
    pub delay_min: f32,
    /// Base delay shrinks by this much per smashed cube (ms)
    pub delay_per_cube: f32,
    /// Delay used while extra-spawn credits are pending (ms)
    pub extra_delay: f32,
    /// Credits granted by destroying a slow-motion target
    pub extra_spawns: u32,
    /// Smashed cubes needed before slow-motion targets appear
    pub slowmo_threshold: u32,
    /// Smashed cubes needed before reinforced targets appear
    pub strong_threshold: u32,
    /// Smashed cubes needed before spinner targets appear
    pub spinner_threshold: u32,
    /// Score above which reinforced targets may arrive two at a time
    pub double_strong_score: u64,
    pub slowmo: SpawnerTuning,
    pub strong: SpawnerTuning,
    pub spinner: SpawnerTuning,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            delay_max: 1400.0,
            delay_min: 550.0,
            delay_per_cube: 3.1,
            extra_delay: 300.0,
            extra_spawns: 2,
            slowmo_threshold: 10,
            strong_threshold: 25,
            spinner_threshold: 25,
            double_strong_score: 2000,
            slowmo: SpawnerTuning {
                chance: 0.5,
                cooldown_per_spawn: 10_000.0,
                max_spawns: 1,
            },
            strong: SpawnerTuning {
                chance: 0.3,
                cooldown_per_spawn: 12_000.0,
                max_spawns: 1,
            },
            spinner: SpawnerTuning {
                chance: 0.1,
                cooldown_per_spawn: 10_000.0,
                max_spawns: 1,
            },
        }
    }
}

impl SpawnTuning {
    /// Base spawn delay for the given smashed-cube count
    pub fn spawn_delay(&self, cube_count: u32) -> f32 {
        (self.delay_max - cube_count as f32 * self.delay_per_cube).max(self.delay_min)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetTuning {
    /// Model radius; also the horizontal wall inset
    pub radius: f32,
    /// Pointer must pass within this distance of the projected origin
    pub hit_radius: f32,
    /// Fragment model radius
    pub frag_radius: f32,
    /// Widest horizontal spawn offset from center
    pub max_spawn_x: f32,
    /// Initial upward speed (per nominal frame)
    pub launch_speed: f32,
    /// Random idle spin is uniform in ±spin_range
    pub spin_range: f32,
    /// Spin applied to the single axis of a spinner
    pub spinner_speed: f32,
    /// Health of a reinforced target
    pub strong_health: u32,
    /// Health ceiling used for glue display
    pub max_health: u32,
}

impl Default for TargetTuning {
    fn default() -> Self {
        Self {
            radius: 40.0,
            hit_radius: 50.0,
            frag_radius: 40.0 / 3.0,
            max_spawn_x: 450.0,
            launch_speed: 20.0,
            spin_range: 0.05,
            spinner_speed: 0.25,
            strong_health: 3,
            max_health: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration per nominal frame
    pub gravity: f32,
    /// Fractional velocity loss per nominal frame for fragments
    pub air_drag: f32,
    /// Fractional velocity loss per nominal frame for sparks
    pub spark_air_drag: f32,
    /// Velocity kept (and negated) on a wall bounce
    pub bound_damping: f32,
    /// Ceiling sits this far above the top edge of the view
    pub ceiling_margin: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            air_drag: 0.022,
            spark_air_drag: 0.1,
            bound_damping: 0.4,
            ceiling_margin: 120.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerTuning {
    /// Scaled pointer speed required for a damaging hit
    pub min_speed: f32,
    /// Share of the pointer force transferred to a struck target
    pub hit_dampening: f32,
    /// Rotation impulse per unit of pointer travel
    pub spin_impulse: f32,
    /// Lifetime of a trail sample (ms)
    pub trail_life: f32,
}

impl Default for PointerTuning {
    fn default() -> Self {
        Self {
            min_speed: 60.0,
            hit_dampening: 0.1,
            spin_impulse: 0.001,
            trail_life: 120.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlowmoTuning {
    /// Slow motion length in simulated ms
    pub duration: f32,
    /// Time dilation while slow and the pointer is engaged
    pub speed_pointer_down: f32,
    /// Time dilation while slow and the pointer is released
    pub speed_pointer_up: f32,
    /// Time dilation while a menu absorbs the pointer
    pub menu_speed: f32,
    /// Smoothing divisor; larger blends more slowly
    pub blend_frames: f32,
}

impl Default for SlowmoTuning {
    fn default() -> Self {
        Self {
            duration: 1500.0,
            speed_pointer_down: 0.075,
            speed_pointer_up: 0.3,
            menu_speed: 0.025,
            blend_frames: 22.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub hit_points: i64,
    pub slow_hit_points: i64,
    /// Deducted in casual mode when a target falls out unhit
    pub miss_penalty: i64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            hit_points: 10,
            slow_hit_points: 5,
            miss_penalty: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    pub burst_sparks: u32,
    pub slow_hit_sparks: u32,
    pub spark_base_speed: f32,
    pub spark_speed_factor: f32,
    pub spark_life_min: f32,
    pub spark_life_max: f32,
    pub glue_shed_chance: f32,
    pub glue_spark_speed: f32,
    pub burst_speed: f32,
    pub burst_random_speed: f32,
    pub frag_spin_scale: f32,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            burst_sparks: 8,
            slow_hit_sparks: 3,
            spark_base_speed: 7.0,
            spark_speed_factor: 0.125,
            spark_life_min: 200.0,
            spark_life_max: 300.0,
            glue_shed_chance: 0.4,
            glue_spark_speed: 12.0,
            burst_speed: 2.0,
            burst_random_speed: 2.0,
            frag_spin_scale: 0.015,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub spawn: SpawnTuning,
    pub targets: TargetTuning,
    pub physics: PhysicsTuning,
    pub pointer: PointerTuning,
    pub slowmo: SlowmoTuning,
    pub scoring: ScoringTuning,
    pub effects: EffectsTuning,
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("must be within 0..=1, got {value}"),
        })
    }
}

fn spawner(field: &'static str, s: &SpawnerTuning) -> Result<(), TuningError> {
    unit_interval(field, s.chance)?;
    positive(field, s.cooldown_per_spawn)?;
    if s.max_spawns == 0 {
        return Err(TuningError::Invalid {
            field,
            reason: "max_spawns must be at least 1".to_string(),
        });
    }
    Ok(())
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let s = &self.spawn;
        positive("spawn.delay_min", s.delay_min)?;
        positive("spawn.delay_max", s.delay_max)?;
        if s.delay_min > s.delay_max {
            return Err(TuningError::Invalid {
                field: "spawn.delay_min",
                reason: format!("{} exceeds delay_max {}", s.delay_min, s.delay_max),
            });
        }
        positive("spawn.extra_delay", s.extra_delay)?;
        spawner("spawn.slowmo", &s.slowmo)?;
        spawner("spawn.strong", &s.strong)?;
        spawner("spawn.spinner", &s.spinner)?;

        let t = &self.targets;
        positive("targets.radius", t.radius)?;
        positive("targets.hit_radius", t.hit_radius)?;
        positive("targets.frag_radius", t.frag_radius)?;
        positive("targets.max_spawn_x", t.max_spawn_x)?;
        if t.strong_health == 0 {
            return Err(TuningError::Invalid {
                field: "targets.strong_health",
                reason: "must be at least 1".to_string(),
            });
        }

        let p = &self.physics;
        if !(0.0..1.0).contains(&p.bound_damping) {
            return Err(TuningError::Invalid {
                field: "physics.bound_damping",
                reason: format!("must be within 0..1, got {}", p.bound_damping),
            });
        }
        unit_interval("physics.air_drag", p.air_drag)?;
        unit_interval("physics.spark_air_drag", p.spark_air_drag)?;

        positive("pointer.trail_life", self.pointer.trail_life)?;
        positive("slowmo.duration", self.slowmo.duration)?;
        positive("slowmo.blend_frames", self.slowmo.blend_frames)?;
        unit_interval("slowmo.speed_pointer_down", self.slowmo.speed_pointer_down)?;
        unit_interval("slowmo.speed_pointer_up", self.slowmo.speed_pointer_up)?;
        unit_interval("slowmo.menu_speed", self.slowmo.menu_speed)?;

        let e = &self.effects;
        positive("effects.spark_life_min", e.spark_life_min)?;
        if e.spark_life_max < e.spark_life_min {
            return Err(TuningError::Invalid {
                field: "effects.spark_life_max",
                reason: "must not be below spark_life_min".to_string(),
            });
        }
        unit_interval("effects.glue_shed_chance", e.glue_shed_chance)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_spawn_delay_floor() {
        let s = SpawnTuning::default();
        assert_eq!(s.spawn_delay(0), 1400.0);
        assert!((s.spawn_delay(100) - 1090.0).abs() < 0.01);
        assert_eq!(s.spawn_delay(10_000), 550.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "physics": { "gravity": 0.5 } }"#).unwrap();
        assert_eq!(tuning.physics.gravity, 0.5);
        assert_eq!(tuning.physics.bound_damping, 0.4);
        assert_eq!(tuning.spawn.slowmo_threshold, 10);
    }

    #[test]
    fn test_round_trip_json() {
        let json = Tuning::default().to_json();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.spawn.strong, Tuning::default().spawn.strong);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "physics": { "bound_damping": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "physics.bound_damping", .. }));

        let err = Tuning::from_json(
            r#"{ "spawn": { "slowmo": { "chance": 0.5, "cooldown_per_spawn": 100.0, "max_spawns": 0 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "spawn.slowmo", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Parse(_))));
    }
}
