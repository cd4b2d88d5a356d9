//! Frame-paced simulation tick
//!
//! Core game loop: advances simulated time, spawns and integrates targets,
//! resolves pointer hits, animates debris, and prepares the scene for painting.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::collision::{PointerSweep, clamp_ceiling, reflect_max, reflect_min};
use super::entity::{Category, Entity, Style, TargetColor};
use super::kernel::Transform;
use super::pool::PoolKey;
use super::state::{GameMode, GameState};
use crate::consts::{BACKBOARD_Z, CAMERA_FADE_END_Z};
use crate::tuning::Tuning;

/// Axis pairs a regular target may tumble around
const SPIN_AXES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];

/// Timing and view size for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    pub view_width: f32,
    pub view_height: f32,
    /// Simulated milliseconds elapsed this frame
    pub sim_time: f32,
    /// Nominal frames elapsed this frame, time dilation included
    pub sim_speed: f32,
    /// Wall frame time relative to a nominal 60 Hz frame
    pub lag: f32,
}

impl TickInput {
    fn center(&self) -> Vec2 {
        Vec2::new(self.view_width / 2.0, self.view_height / 2.0)
    }
}

/// Advance the game state by one frame. A paused game is left untouched.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_paused() {
        return;
    }

    let tuning = Arc::clone(&state.tuning);
    let TickInput {
        sim_time,
        sim_speed,
        lag,
        ..
    } = *input;
    let center = input.center();

    state.time += sim_time;
    state.spawners.elapse(sim_time);

    update_game_speed(state, &tuning, sim_time, lag);

    // Pointer tracking. The scaled variant keeps lag spikes from inflating the
    // force, and compensates for slow motion so swipes don't feel dampened.
    let force_multiplier = 1.0 / (sim_speed * 0.75 + 0.25);
    let delta = match (state.pointer.down, state.trail.last_position()) {
        (true, Some(last)) => state.pointer.pos - last,
        _ => Vec2::ZERO,
    };
    let sweep = PointerSweep::new(state.pointer.pos, delta);
    let delta_scaled = delta * force_multiplier;
    let speed_scaled = sweep.speed() * force_multiplier;

    let engaged = state.pointer.down.then_some(state.pointer.pos);
    state
        .trail
        .update(sim_time, engaged, tuning.pointer.trail_life);

    if state.is_in_game() {
        state.spawn_time -= sim_time;
        if state.spawn_time <= 0.0 {
            if state.spawn_extra > 0 {
                state.spawn_extra -= 1;
                state.spawn_time = tuning.spawn.extra_delay;
            } else {
                state.spawn_time = tuning.spawn.spawn_delay(state.cube_count);
            }
            spawn_target(state, &tuning, center);
        }
    }

    let hit = Hit {
        sweep,
        delta_scaled,
        speed_scaled,
        force_multiplier,
    };
    update_targets(state, &tuning, input, &hit);
    update_frags(state, &tuning, input);
    state.sparks.update(sim_time, sim_speed, &tuning.physics);

    state.scene.clear();
    for entity in state.targets.iter().chain(state.frags.iter()) {
        state.scene.push_entity(entity);
    }
    state.scene.prepare();
}

/// Blend time dilation toward its target for this frame
fn update_game_speed(state: &mut GameState, tuning: &Tuning, sim_time: f32, lag: f32) {
    let slowmo = &tuning.slowmo;
    let target_speed = if state.slowmo_remaining > 0.0 {
        state.slowmo_remaining = (state.slowmo_remaining - sim_time).max(0.0);
        if state.pointer.down {
            slowmo.speed_pointer_down
        } else {
            slowmo.speed_pointer_up
        }
    } else if state.is_menu_visible() && state.pointer.down {
        slowmo.menu_speed
    } else {
        1.0
    };
    state.report_slowmo();

    let speed = state.game_speed + (target_speed - state.game_speed) / slowmo.blend_frames * lag;
    state.game_speed = crate::clamp(speed, 0.0, 1.0);
}

/// Pick a variant, configure it, and launch it from below the view
fn spawn_target(state: &mut GameState, tuning: &Tuning, center: Vec2) {
    let spawn = &tuning.spawn;
    let targets = &tuning.targets;

    let double_score = i64::try_from(spawn.double_strong_score).unwrap_or(i64::MAX);
    if state.double_strong && state.score <= double_score {
        state.double_strong = false;
        state.spawners.strong.set_max_spawns(spawn.strong.max_spawns);
    } else if !state.double_strong && state.score > double_score {
        state.double_strong = true;
        state.spawners.strong.set_max_spawns(spawn.strong.max_spawns.saturating_mul(2));
        log::debug!("double reinforcement enabled at score {}", state.score);
    }

    let rng = &mut state.rng;
    let mut color = TargetColor::REGULAR[rng.random_range(0..TargetColor::REGULAR.len())];
    let mut style = Style::Solid;
    let mut health = 1;
    let spinner = state.cube_count >= spawn.spinner_threshold
        && state.spawners.spinner.should_spawn(rng);

    if state.cube_count >= spawn.slowmo_threshold && state.spawners.slowmo.should_spawn(rng) {
        color = TargetColor::Blue;
        style = Style::Wireframe;
    } else if state.cube_count >= spawn.strong_threshold && state.spawners.strong.should_spawn(rng)
    {
        color = TargetColor::Pink;
        health = targets.strong_health;
    }

    let mut target = state
        .pool
        .acquire(PoolKey::new(Category::Target, color, style));
    target.hit = false;
    target.set_health(health, targets.max_health);

    let rng = &mut state.rng;
    let range = targets.spin_range;
    let mut spins = [
        rng.random::<f32>() * range * 2.0 - range,
        rng.random::<f32>() * range * 2.0 - range,
    ];
    if spinner {
        spins = [-targets.spinner_speed, 0.0];
        target.kin.rotation.z = rng.random::<f32>() * TAU;
    }
    let axes = SPIN_AXES[rng.random_range(0..SPIN_AXES.len())];
    for (axis, spin) in axes.into_iter().zip(spins) {
        target.kin.spin[axis] = spin;
    }

    let spawn_radius = (center.x * 0.8).min(targets.max_spawn_x);
    let x = rng.random::<f32>() * spawn_radius * 2.0 - spawn_radius;
    let y = center.y + targets.hit_radius * 2.0;
    let z = rng.random::<f32>() * targets.radius * 2.0 - targets.radius;
    target.kin.position = Vec3::new(x, y, z);
    // Lateral drift biased back toward the middle
    target.kin.velocity = Vec3::new(
        rng.random::<f32>() * (x * -2.0 / 120.0),
        -targets.launch_speed,
        0.0,
    );

    log::debug!(
        "spawned {:?} {:?} target (health {health}{}) at x={x:.0}",
        color,
        style,
        if spinner { ", spinner" } else { "" }
    );
    state.targets.push(target);
}

/// Pointer motion shared by every target's hit-test this frame
struct Hit {
    sweep: PointerSweep,
    delta_scaled: Vec2,
    speed_scaled: f32,
    force_multiplier: f32,
}

fn update_targets(state: &mut GameState, tuning: &Tuning, input: &TickInput, hit: &Hit) {
    let center = input.center();
    let sim_speed = input.sim_speed;
    let physics = &tuning.physics;
    let targets = &tuning.targets;
    let effects = &tuning.effects;

    let left_bound = -center.x + targets.radius;
    let right_bound = center.x - targets.radius;
    let ceiling = -center.y - physics.ceiling_margin;
    let floor = center.y + targets.hit_radius * 2.0;

    // Reverse order so swap_remove only moves already-processed targets
    for i in (0..state.targets.len()).rev() {
        let target = &mut state.targets[i];
        let kin = &mut target.kin;
        kin.integrate(sim_speed);
        clamp_ceiling(&mut kin.position.y, &mut kin.velocity.y, ceiling);
        if !reflect_min(
            &mut kin.position.x,
            &mut kin.velocity.x,
            left_bound,
            physics.bound_damping,
        ) {
            reflect_max(
                &mut kin.position.x,
                &mut kin.velocity.x,
                right_bound,
                physics.bound_damping,
            );
        }
        reflect_min(
            &mut kin.position.z,
            &mut kin.velocity.z,
            BACKBOARD_Z,
            physics.bound_damping,
        );
        kin.velocity.y += physics.gravity * sim_speed;
        target.transform();
        target.project_origin();

        if target.kin.position.y > floor {
            let target = state.targets.swap_remove(i);
            state.pool.release(target);
            if state.is_in_game() {
                match state.mode {
                    GameMode::Casual => state.add_score(-tuning.scoring.miss_penalty),
                    GameMode::Ranked => state.end_game(),
                }
            }
            continue;
        }

        let Some(hit_pos) = hit
            .sweep
            .first_hit(target.projected, targets.radius, targets.hit_radius)
        else {
            target.hit = false;
            continue;
        };
        // Still overlapping since an earlier frame's hit
        if target.hit {
            continue;
        }
        target.hit = true;

        let pointer = &tuning.pointer;
        target.kin.velocity.x += hit.delta_scaled.x * pointer.hit_dampening;
        target.kin.velocity.y += hit.delta_scaled.y * pointer.hit_dampening;
        target.kin.spin.x += hit.delta_scaled.y * pointer.spin_impulse;
        target.kin.spin.y += hit.delta_scaled.x * pointer.spin_impulse;

        let spark_speed = effects.spark_base_speed + hit.speed_scaled * effects.spark_speed_factor;

        if hit.speed_scaled <= pointer.min_speed {
            log::trace!("glancing hit at {hit_pos}");
            state.add_score(tuning.scoring.slow_hit_points);
            state.sparks.burst(
                &mut state.rng,
                hit_pos,
                effects.slow_hit_sparks,
                spark_speed,
                effects,
            );
            continue;
        }

        let health = target.damage();
        state.add_score(tuning.scoring.hit_points);
        state.sparks.burst(
            &mut state.rng,
            hit_pos,
            effects.burst_sparks,
            spark_speed,
            effects,
        );

        if health > 0 {
            state
                .sparks
                .shed(&mut state.rng, state.targets[i].vertices(), effects);
            continue;
        }

        let target = state.targets.swap_remove(i);
        state.add_cubes(1);
        create_burst(state, tuning, &target, hit.force_multiplier);
        if target.is_wireframe() {
            state.slowmo_remaining = tuning.slowmo.duration;
            state.spawn_time = 0.0;
            state.spawn_extra = tuning.spawn.extra_spawns;
            log::info!("slow motion triggered");
        }
        log::debug!("smashed {:?} target", target.color);
        state.pool.release(target);
    }
}

/// Split a destroyed target into fragments that keep its momentum
fn create_burst(state: &mut GameState, tuning: &Tuning, target: &Entity, force: f32) {
    let kin = &target.kin;
    let current = kin.transform();
    let previous = kin.previous_transform();
    let rotation = Transform::rotation(kin.rotation);

    let effects = &tuning.effects;
    let burst_speed = effects.burst_speed * force;
    let random_speed = effects.burst_random_speed * force;
    let key = PoolKey::new(Category::Fragment, target.color, target.style);

    for i in 0..state.pool.meshes().fragment_count() {
        let offset = state.pool.meshes().burst_offsets[i];
        let position = current.apply(offset);
        let inherited = position - previous.apply(offset);
        let normal = rotation.apply(offset.normalize_or_zero());

        let rng = &mut state.rng;
        let jitter = Vec3::new(rng.random(), rng.random(), rng.random()) * random_speed;

        let mut frag = state.pool.acquire(key);
        frag.kin.position = position;
        frag.kin.rotation = kin.rotation;
        frag.kin.velocity = inherited + normal * burst_speed + jitter;
        frag.kin.spin = frag.kin.velocity * effects.frag_spin_scale;
        state.frags.push(frag);
    }
}

fn update_frags(state: &mut GameState, tuning: &Tuning, input: &TickInput) {
    let center = input.center();
    let sim_speed = input.sim_speed;
    let physics = &tuning.physics;
    let ceiling = -center.y - physics.ceiling_margin;
    let backboard = BACKBOARD_Z + tuning.targets.frag_radius;
    let drag = 1.0 - physics.air_drag * sim_speed;
    // Fragments may drift past the sides a while; their shadows are still visible
    let side_bound = input.view_width;
    let floor = center.y + tuning.targets.hit_radius;

    for i in (0..state.frags.len()).rev() {
        let frag = &mut state.frags[i];
        let kin = &mut frag.kin;
        kin.position += kin.velocity * sim_speed;
        kin.velocity *= drag;
        clamp_ceiling(&mut kin.position.y, &mut kin.velocity.y, ceiling);
        reflect_min(
            &mut kin.position.z,
            &mut kin.velocity.z,
            backboard,
            physics.bound_damping,
        );
        kin.velocity.y += physics.gravity * sim_speed;
        kin.rotation += kin.spin * sim_speed;
        frag.transform();
        frag.project_origin();

        let gone = frag.projected.y > floor
            || frag.projected.x.abs() > side_bound
            || frag.kin.position.z > CAMERA_FADE_END_Z;
        if gone {
            let frag = state.frags.swap_remove(i);
            state.pool.release(frag);
        }
    }
}
