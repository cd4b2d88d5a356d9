//! Software rendering of a prepared scene
//!
//! `paint` walks the simulation's scene buffers and issues 2D primitives onto
//! a [`Canvas`]. Backends: [`PixelCanvas`] rasterizes into RGBA8 memory,
//! [`DrawList`] records commands for replay.

pub mod canvas;
pub mod paint;
pub mod pixel;
pub mod shading;
pub mod shapes;

pub use canvas::{Canvas, DrawCommand, DrawList};
pub use paint::paint;
pub use pixel::{Pixel, PixelCanvas};
