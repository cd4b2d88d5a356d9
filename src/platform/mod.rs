//! Platform glue
//!
//! Whatever drives the loop (a browser animation callback, a native window,
//! the headless demo) reports wall-clock timestamps here and gets back the
//! simulated timing for one tick.

pub mod frame;

pub use frame::{FrameClock, FrameTiming};
