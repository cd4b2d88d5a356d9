//! Menja headless demo
//!
//! Runs a seeded session with an autopilot pointer that swipes through the
//! lowest live target, logs game events, and can dump the last frame as PPM.
//!
//! Usage: menja [--tuning FILE] [--frames N] [--seed N] [--ppm FILE] [--ranked]

use std::error::Error;
use std::path::PathBuf;

use glam::Vec2;

use menja::Tuning;
use menja::color::colors;
use menja::consts::NOMINAL_FRAME_MS;
use menja::platform::FrameClock;
use menja::renderer::{PixelCanvas, paint};
use menja::sim::{GameEvent, GameMode, GameState, MeshSet, tick};

const VIEW_WIDTH: u32 = 1280;
const VIEW_HEIGHT: u32 = 800;
/// Horizontal reach of each autopilot swipe either side of the target
const SWIPE_REACH: f32 = 80.0;

#[derive(Debug)]
struct Args {
    tuning: Option<PathBuf>,
    frames: u32,
    seed: u64,
    ppm: Option<PathBuf>,
    mode: GameMode,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            tuning: None,
            frames: 1800,
            seed: 0x6d656e6a61,
            ppm: None,
            mode: GameMode::Casual,
        }
    }
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--tuning" => args.tuning = Some(PathBuf::from(value()?)),
            "--frames" => args.frames = value()?.parse()?,
            "--seed" => args.seed = value()?.parse()?,
            "--ppm" => args.ppm = Some(PathBuf::from(value()?)),
            "--ranked" => args.mode = GameMode::Ranked,
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }
    Ok(args)
}

/// Steer the pointer back and forth across the lowest target
fn autopilot(state: &mut GameState, frame: u32) {
    let lowest = state
        .targets
        .iter()
        .map(|t| t.projected)
        .max_by(|a, b| a.y.total_cmp(&b.y));

    match lowest {
        Some(target) => {
            let side = if frame % 2 == 0 { -1.0 } else { 1.0 };
            let pos = target + Vec2::new(side * SWIPE_REACH, 0.0);
            if state.pointer.down {
                state.pointer_move(pos);
            } else {
                state.pointer_down(pos);
            }
        }
        None => state.pointer_up(),
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::ScoreChanged(score) => log::debug!("score {score}"),
        GameEvent::CubesSmashed(cubes) => log::debug!("cubes {cubes}"),
        GameEvent::SlowmoChanged(fraction) => log::trace!("slow-motion {fraction:.2}"),
        GameEvent::GameEnded { score, cubes } => {
            log::info!("game ended with {score} points, {cubes} cubes")
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;

    let tuning = match &args.tuning {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };
    let meshes = MeshSet::cubes(tuning.targets.radius, tuning.targets.frag_radius);
    let mut state = GameState::new(args.seed, tuning, meshes);
    state.new_game(args.mode);
    log::info!("seed {:#x}, {} frames, {:?}", args.seed, args.frames, args.mode);

    let mut clock = FrameClock::new();
    let mut canvas = PixelCanvas::new(VIEW_WIDTH, VIEW_HEIGHT);
    let mut timestamp = 0.0f64;
    // Prime the clock so the first loop iteration produces timing
    clock.frame(timestamp, state.game_speed, state.is_paused());

    for frame in 0..args.frames {
        timestamp += NOMINAL_FRAME_MS as f64;
        autopilot(&mut state, frame);
        if let Some(timing) = clock.frame(timestamp, state.game_speed, state.is_paused()) {
            tick(
                &mut state,
                &timing.tick_input(VIEW_WIDTH as f32, VIEW_HEIGHT as f32),
            );
        }
        for event in state.drain_events() {
            log_event(&event);
        }
        if !state.is_in_game() {
            log::info!("stopped after {} frames", frame + 1);
            break;
        }
    }

    log::info!(
        "final score {}, {} cubes, {} entities pooled, {} sparks constructed",
        state.score,
        state.cube_count,
        state.pool.total_pooled(),
        state.sparks.pool().constructed(),
    );

    if let Some(path) = &args.ppm {
        canvas.clear(colors::BACKGROUND);
        paint(&mut canvas, &state);
        canvas.save_ppm(path)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
