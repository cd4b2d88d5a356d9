//! Software framebuffer
//!
//! RGBA8 pixels, source-over blending, even-odd scanline polygon fill. Thick
//! lines are filled as quads. The scene origin maps to the buffer center.

use std::io::{self, Write};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::canvas::Canvas;
use super::shapes;
use crate::color::{Rgb, Rgba};

/// One framebuffer pixel, in memory order R, G, B, A
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const fn opaque(color: Rgb) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
            a: 255,
        }
    }

    /// Source-over composite of `color` onto this pixel
    #[inline]
    fn blend(&mut self, color: Rgba) {
        let a = color.a.clamp(0.0, 1.0);
        let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        self.r = mix(color.r, self.r);
        self.g = mix(color.g, self.g);
        self.b = mix(color.b, self.b);
        self.a = (a * 255.0 + self.a as f32 * (1.0 - a)).round() as u8;
    }
}

/// RGBA8 canvas for headless rendering
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    pixels: Vec<Pixel>,
    width: u32,
    height: u32,
    /// Scratch for scanline crossings
    crossings: Vec<f32>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![Pixel::default(); (width * height) as usize],
            width,
            height,
            crossings: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(Pixel::opaque(color));
    }

    /// Pixel at buffer coordinates (top-left origin), if in bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Binary PPM (P6); alpha is dropped
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut row = Vec::with_capacity(self.width as usize * 3);
        for line in self.pixels.chunks(self.width.max(1) as usize) {
            row.clear();
            for p in line {
                row.extend_from_slice(&[p.r, p.g, p.b]);
            }
            out.write_all(&row)?;
        }
        Ok(())
    }

    pub fn save_ppm(&self, path: &Path) -> io::Result<()> {
        let mut file = io::BufWriter::new(std::fs::File::create(path)?);
        self.write_ppm(&mut file)?;
        file.flush()
    }

    /// Scene coordinates to buffer coordinates
    #[inline]
    fn to_buffer(&self, p: Vec2) -> Vec2 {
        p + Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Even-odd fill sampling pixel centers. `points` are in buffer coordinates.
    fn fill_buffer_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 || color.a <= 0.0 {
            return;
        }
        let Some((min, max)) = shapes::bounds(points) else {
            return;
        };
        let y_start = (min.y - 0.5).ceil().max(0.0) as u32;
        let y_end = ((max.y - 0.5).floor() + 1.0).clamp(0.0, self.height as f32) as u32;

        let mut crossings = std::mem::take(&mut self.crossings);
        for y in y_start..y_end {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy && sy < b.y) || (b.y <= sy && sy < a.y) {
                    crossings.push(a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                let x0 = (span[0] - 0.5).ceil().max(0.0) as u32;
                let x1 = (span[1] - 0.5).ceil().clamp(0.0, self.width as f32) as u32;
                let row = (y * self.width) as usize;
                for x in x0..x1 {
                    self.pixels[row + x as usize].blend(color);
                }
            }
        }
        self.crossings = crossings;
    }
}

impl Canvas for PixelCanvas {
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        let mut local = [Vec2::ZERO; 4];
        if points.len() <= local.len() {
            for (dst, p) in local.iter_mut().zip(points) {
                *dst = self.to_buffer(*p);
            }
            self.fill_buffer_polygon(&local[..points.len()], color);
        } else {
            let mapped: Vec<Vec2> = points.iter().map(|p| self.to_buffer(*p)).collect();
            self.fill_buffer_polygon(&mapped, color);
        }
    }

    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        for quad in shapes::outline_quads(points, width) {
            self.fill_polygon(&quad, color);
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if let Some(quad) = shapes::line_quad(from, to, width) {
            self.fill_polygon(&quad, color);
        }
    }
}
