//! Rate limiting against simulated time
//!
//! A [`Cooldown`] holds `units` charges; each use adds `recharge_time` to the time
//! remaining, and it stays usable while at least one unit is charged. A
//! [`Spawner`] pairs a cooldown with a probability roll.

use rand::Rng;

use crate::tuning::SpawnerTuning;

/// Recharge-units cooldown
#[derive(Debug, Clone, PartialEq)]
pub struct Cooldown {
    time_remaining: f32,
    recharge_time: f32,
    units: u32,
    initial: (f32, u32),
}

impl Cooldown {
    pub fn new(recharge_time: f32, units: u32) -> Self {
        Self {
            time_remaining: 0.0,
            recharge_time,
            units: units.max(1),
            initial: (recharge_time, units.max(1)),
        }
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    pub fn recharge_time(&self) -> f32 {
        self.recharge_time
    }

    pub fn units(&self) -> u32 {
        self.units
    }

    /// Let `elapsed` simulated ms pass. Time running backwards resets the cooldown.
    pub fn elapse(&mut self, elapsed: f32) {
        if elapsed < 0.0 {
            self.time_remaining = 0.0;
        } else {
            self.time_remaining = (self.time_remaining - elapsed).max(0.0);
        }
    }

    pub fn can_use(&self) -> bool {
        self.time_remaining <= self.recharge_time * (self.units - 1) as f32
    }

    /// Consume one unit if available
    pub fn use_if_able(&mut self) -> bool {
        let usable = self.can_use();
        if usable {
            self.time_remaining += self.recharge_time;
        }
        usable
    }

    /// Change the recharge time, applying the difference to the current cooldown immediately.
    pub fn set_recharge_time(&mut self, recharge_time: f32) {
        self.time_remaining = (self.time_remaining - (self.recharge_time - recharge_time)).max(0.0);
        self.recharge_time = recharge_time;
    }

    pub fn set_units(&mut self, units: u32) {
        self.units = units.max(1);
    }

    /// Fully charged, with the options it was created with
    pub fn reset(&mut self) {
        let (recharge_time, units) = self.initial;
        self.time_remaining = 0.0;
        self.recharge_time = recharge_time;
        self.units = units;
    }
}

/// Probability roll gated by a cooldown
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    chance: f32,
    cooldown: Cooldown,
}

impl Spawner {
    pub fn new(tuning: &SpawnerTuning) -> Self {
        Self {
            chance: tuning.chance,
            cooldown: Cooldown::new(tuning.cooldown_per_spawn, tuning.max_spawns),
        }
    }

    pub fn chance(&self) -> f32 {
        self.chance
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    /// Roll, and on success consume a unit. A failed roll leaves the cooldown untouched.
    pub fn should_spawn<R: Rng>(&mut self, rng: &mut R) -> bool {
        rng.random::<f32>() <= self.chance && self.cooldown.use_if_able()
    }

    pub fn elapse(&mut self, elapsed: f32) {
        self.cooldown.elapse(elapsed);
    }

    pub fn set_max_spawns(&mut self, max_spawns: u32) {
        self.cooldown.set_units(max_spawns);
    }

    pub fn reset(&mut self) {
        self.cooldown.reset();
    }
}
