//! Color types shared by the simulation and the painter

use bytemuck::{Pod, Zeroable};

use crate::lerp;

/// 8-bit RGB color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Shade toward black (lightness < 0.5) or white (lightness > 0.5).
    ///
    /// `lightness` ranges from 0 (pure black) to 1 (pure white); 0.5 returns the color unchanged.
    pub fn shade(self, lightness: f32) -> Rgb {
        let (other, mix) = if lightness < 0.5 {
            (0.0, 1.0 - lightness * 2.0)
        } else {
            (255.0, lightness * 2.0 - 1.0)
        };
        let channel = |c: u8| lerp(c as f32, other, mix).clamp(0.0, 255.0) as u8;
        Rgb::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

/// RGB color with floating point opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Colors for game elements
pub mod colors {
    use super::{Rgb, Rgba};

    pub const BLUE: Rgb = Rgb::new(0x67, 0xd7, 0xf0);
    pub const GREEN: Rgb = Rgb::new(0xa6, 0xe0, 0x2c);
    pub const PINK: Rgb = Rgb::new(0xfa, 0x24, 0x73);
    pub const ORANGE: Rgb = Rgb::new(0xfe, 0x95, 0x22);
    /// Stroke showing extra health on reinforced targets
    pub const GLUE: Rgb = Rgb::new(170, 221, 255);
    pub const SHADOW: Rgb = Rgb::new(0x26, 0x2e, 0x36);
    pub const SPARK: Rgba = Rgb::new(170, 221, 255).with_alpha(0.9);
    pub const TOUCH_TRAIL: Rgba = Rgb::new(170, 221, 255).with_alpha(0.62);
    pub const BACKGROUND: Rgb = Rgb::new(0x16, 0x1b, 0x20);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_midpoint_is_identity() {
        let c = Rgb::new(100, 150, 200);
        assert_eq!(c.shade(0.5), c);
    }

    #[test]
    fn test_shade_extremes() {
        let c = colors::PINK;
        assert_eq!(c.shade(0.0), Rgb::new(0, 0, 0));
        assert_eq!(c.shade(1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_shade_dark_stroke() {
        // 0.4 lightness mixes 20% toward black
        let c = Rgb::new(100, 200, 50).shade(0.4);
        assert_eq!(c, Rgb::new(80, 160, 40));
    }
}
