//! Paint attributes carried by bones and keyframes, and the blend modes the
//! renderer applies when drawing attached surfaces.

use serde::{Deserialize, Serialize};

use crate::math::lerp_f32;

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Per-channel linear interpolation (R/G/B/A independently).
    pub fn lerp(a: Color, b: Color, t: f32) -> Color {
        Color {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }

    pub fn with_alpha(self, a: u8) -> Color {
        Color { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[inline]
pub(crate) fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    lerp_f32(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8
}

/// The paint tuple attached to every bone each frame: fill opacity and tint,
/// outline color and thickness. Not inherited from parent bones.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub opacity: u8,
    pub tint: Color,
    pub outline_color: Color,
    pub outline_thickness: f32,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            opacity: 255,
            tint: Color::WHITE,
            outline_color: Color::WHITE,
            outline_thickness: 0.0,
        }
    }
}

impl Paint {
    /// Fill color with the bone's opacity applied as alpha.
    pub fn fill_color(&self) -> Color {
        self.tint.with_alpha(self.opacity)
    }

    /// Outline color with the bone's opacity applied as alpha.
    pub fn outline_rgba(&self) -> Color {
        self.outline_color.with_alpha(self.opacity)
    }
}

/// Blend mode used when drawing a bone's attached surface.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Alpha,
    Add,
    Multiply,
    Subtract,
}
