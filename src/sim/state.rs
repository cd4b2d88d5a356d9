//! Game state and core simulation types
//!
//! Everything one frame of simulation reads or writes lives in [`GameState`];
//! the host owns it and hands it to `tick` and the painter in turn.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::cooldown::Spawner;
use super::entity::Entity;
use super::mesh::MeshSet;
use super::particles::{Sparks, Trail};
use super::pool::EntityPool;
use super::scene::Scene;
use crate::tuning::Tuning;

/// Current phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay: targets spawn and score counts
    Playing,
    /// Nothing is simulated
    Paused,
    /// A menu is up; live objects keep moving but nothing spawns or scores
    Menu,
    /// Run over, score menu showing
    Ended,
}

/// What happens when a target falls out unhit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// The run ends
    Ranked,
    /// Points are deducted
    Casual,
}

/// Notifications for the host (HUD, menus, persistence)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ScoreChanged(i64),
    CubesSmashed(u32),
    /// Remaining slow-motion as a 0..1 fraction
    SlowmoChanged(f32),
    GameEnded { score: i64, cubes: u32 },
}

/// The three rate-limited target variants
#[derive(Debug, Clone)]
pub struct Spawners {
    pub slowmo: Spawner,
    pub strong: Spawner,
    pub spinner: Spawner,
}

impl Spawners {
    fn new(tuning: &Tuning) -> Self {
        Self {
            slowmo: Spawner::new(&tuning.spawn.slowmo),
            strong: Spawner::new(&tuning.spawn.strong),
            spinner: Spawner::new(&tuning.spawn.spinner),
        }
    }

    pub fn elapse(&mut self, elapsed: f32) {
        self.slowmo.elapse(elapsed);
        self.strong.elapse(elapsed);
        self.spinner.elapse(elapsed);
    }

    pub fn reset(&mut self) {
        self.slowmo.reset();
        self.strong.reset();
        self.spinner.reset();
    }
}

/// Pointer engagement as last reported by the input layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub down: bool,
    /// Scene coordinates (origin at view center)
    pub pos: Vec2,
}

/// Complete simulation context
#[derive(Debug)]
pub struct GameState {
    /// Shared so a tick can read it while mutating the rest of the state
    pub tuning: Arc<Tuning>,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub mode: GameMode,
    /// Simulated ms since the game started
    pub time: f32,
    /// Time dilation in 0..=1
    pub game_speed: f32,
    pub score: i64,
    pub cube_count: u32,
    /// Countdown to the next spawn (simulated ms)
    pub spawn_time: f32,
    /// Pending short-delay spawns
    pub spawn_extra: u32,
    /// Remaining slow motion (simulated ms)
    pub slowmo_remaining: f32,
    /// Reinforced targets may spawn two at a time
    pub double_strong: bool,
    pub spawners: Spawners,
    pub pointer: Pointer,
    pub targets: Vec<Entity>,
    pub frags: Vec<Entity>,
    pub sparks: Sparks,
    pub trail: Trail,
    pub pool: EntityPool,
    pub scene: Scene,
    last_slowmo_fraction: f32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh context showing the menu. Identical seeds give identical runs.
    pub fn new(seed: u64, tuning: Tuning, meshes: MeshSet) -> Self {
        let spawn_time = tuning.spawn.spawn_delay(0);
        let tuning = Arc::new(tuning);
        Self {
            spawners: Spawners::new(&tuning),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            mode: GameMode::Ranked,
            time: 0.0,
            game_speed: 1.0,
            score: 0,
            cube_count: 0,
            spawn_time,
            spawn_extra: 0,
            slowmo_remaining: 0.0,
            double_strong: false,
            pointer: Pointer::default(),
            targets: Vec::new(),
            frags: Vec::new(),
            sparks: Sparks::default(),
            trail: Trail::default(),
            pool: EntityPool::new(meshes),
            scene: Scene::default(),
            last_slowmo_fraction: 0.0,
            events: Vec::new(),
        }
    }

    pub fn is_in_game(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Any menu (pause, main, score) is on screen
    pub fn is_menu_visible(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    /// Clear the field and start a run
    pub fn new_game(&mut self, mode: GameMode) {
        while let Some(target) = self.targets.pop() {
            self.pool.release(target);
        }
        self.sparks.clear();
        self.trail.clear();
        self.mode = mode;
        self.time = 0.0;
        self.spawners.reset();
        self.double_strong = false;
        self.spawn_extra = 0;
        self.slowmo_remaining = 0.0;
        self.set_score(0);
        self.set_cube_count(0);
        self.spawn_time = self.tuning.spawn.spawn_delay(0);
        self.phase = GamePhase::Playing;
        log::info!("new {mode:?} game");
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            log::debug!("paused at {:.0}ms", self.time);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            log::debug!("resumed");
        }
    }

    pub fn show_menu(&mut self) {
        self.phase = GamePhase::Menu;
    }

    /// Release the pointer and show the score menu
    pub fn end_game(&mut self) {
        self.pointer_up();
        self.phase = GamePhase::Ended;
        log::info!(
            "game over: score {}, {} cubes smashed",
            self.score,
            self.cube_count
        );
        self.events.push(GameEvent::GameEnded {
            score: self.score,
            cubes: self.cube_count,
        });
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        if !self.pointer.down {
            self.pointer = Pointer { down: true, pos };
        }
    }

    /// Ignored unless the pointer is engaged
    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.pointer.down {
            self.pointer.pos = pos;
        }
    }

    /// Disengage, leaving a break in the trail so the next stroke starts clean
    pub fn pointer_up(&mut self) {
        if self.pointer.down {
            self.pointer.down = false;
            self.trail.push_break(self.tuning.pointer.trail_life);
        }
    }

    /// Score changes only count during play and never go below zero
    pub fn add_score(&mut self, points: i64) {
        if self.is_in_game() {
            self.set_score((self.score + points).max(0));
        }
    }

    pub fn add_cubes(&mut self, count: u32) {
        if self.is_in_game() {
            self.set_cube_count(self.cube_count + count);
        }
    }

    fn set_score(&mut self, score: i64) {
        self.score = score;
        self.events.push(GameEvent::ScoreChanged(score));
    }

    fn set_cube_count(&mut self, count: u32) {
        self.cube_count = count;
        self.events.push(GameEvent::CubesSmashed(count));
    }

    /// Queue a slow-motion status update if it moved
    pub(crate) fn report_slowmo(&mut self) {
        let fraction = if self.tuning.slowmo.duration > 0.0 {
            (self.slowmo_remaining / self.tuning.slowmo.duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        if fraction != self.last_slowmo_fraction {
            self.last_slowmo_fraction = fraction;
            self.events.push(GameEvent::SlowmoChanged(fraction));
        }
    }

    /// Take all notifications queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Category, Style, TargetColor};
    use crate::sim::pool::PoolKey;

    fn state() -> GameState {
        GameState::new(42, Tuning::default(), MeshSet::cubes(40.0, 40.0 / 3.0))
    }

    #[test]
    fn test_starts_in_menu() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Menu);
        assert!(s.is_menu_visible());
        assert_eq!(s.spawn_time, 1400.0);
    }

    #[test]
    fn test_new_game_resets() {
        let mut s = state();
        s.new_game(GameMode::Casual);
        s.add_score(500);
        s.add_cubes(3);
        s.time = 1234.0;
        let key = PoolKey::new(Category::Target, TargetColor::Green, Style::Solid);
        let t = s.pool.acquire(key);
        s.targets.push(t);
        s.drain_events();

        s.new_game(GameMode::Ranked);
        assert!(s.targets.is_empty());
        assert_eq!(s.pool.pooled(key), 1);
        assert_eq!(s.time, 0.0);
        assert_eq!(s.score, 0);
        assert_eq!(s.cube_count, 0);
        assert_eq!(s.mode, GameMode::Ranked);
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::ScoreChanged(0), GameEvent::CubesSmashed(0)]
        );
    }

    #[test]
    fn test_new_game_clears_sparks_and_trail() {
        let mut s = state();
        let effects = s.tuning.effects.clone();
        s.sparks.burst(&mut s.rng, Vec2::ZERO, 6, 10.0, &effects);
        s.pointer_down(Vec2::new(5.0, 5.0));
        s.trail.update(16.0, Some(Vec2::new(5.0, 5.0)), 120.0);
        s.pointer_up();

        s.new_game(GameMode::Casual);
        assert!(s.sparks.is_empty());
        assert_eq!(s.sparks.pool().pooled(), 6);
        assert!(s.trail.points().is_empty());
        assert_eq!(s.trail.last_position(), None);
    }

    #[test]
    fn test_score_floor_and_gating() {
        let mut s = state();
        s.add_score(10);
        assert_eq!(s.score, 0, "menu does not score");
        s.new_game(GameMode::Casual);
        s.add_score(10);
        s.add_score(-25);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_pause_resume_only_from_valid_phases() {
        let mut s = state();
        s.pause();
        assert_eq!(s.phase, GamePhase::Menu);
        s.new_game(GameMode::Ranked);
        s.pause();
        assert!(s.is_paused());
        s.resume();
        assert_eq!(s.phase, GamePhase::Playing);
        s.resume();
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_end_game_releases_pointer() {
        let mut s = state();
        s.new_game(GameMode::Ranked);
        s.pointer_down(Vec2::new(5.0, 5.0));
        s.drain_events();
        s.end_game();
        assert!(!s.pointer.down);
        assert_eq!(s.trail.last_position(), None);
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::GameEnded { score: 0, cubes: 0 }]
        );
    }

    #[test]
    fn test_pointer_move_requires_down() {
        let mut s = state();
        s.pointer_move(Vec2::new(3.0, 3.0));
        assert_eq!(s.pointer.pos, Vec2::ZERO);
        s.pointer_down(Vec2::ONE);
        s.pointer_move(Vec2::new(3.0, 3.0));
        assert_eq!(s.pointer.pos, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_slowmo_reported_on_change_only() {
        let mut s = state();
        s.slowmo_remaining = 750.0;
        s.report_slowmo();
        s.report_slowmo();
        assert_eq!(s.drain_events(), vec![GameEvent::SlowmoChanged(0.5)]);
    }
}
