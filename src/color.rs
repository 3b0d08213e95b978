//! RGB colour triple.
//!
//! All arithmetic on colours happens in `f32` and is clamped back into
//! `[0, 255]` per channel on the way in.

use std::fmt;

use serde::Deserialize;

use crate::shader::{clamp_channel, lerp};

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from unbounded channel values, clamping each into
    /// `[0, 255]`. NaN channels become 0.
    pub fn from_f32(channels: [f32; 3]) -> Self {
        Self {
            r: clamp_channel(channels[0]),
            g: clamp_channel(channels[1]),
            b: clamp_channel(channels[2]),
        }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Linear blend between two colours. `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let a = self.to_f32();
        let b = other.to_f32();
        Color::from_f32([lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)])
    }

    /// Shift every channel by its own offset, clamping the result.
    pub fn shifted(self, offsets: [f32; 3]) -> Color {
        let c = self.to_f32();
        Color::from_f32([c[0] + offsets[0], c[1] + offsets[1], c[2] + offsets[2]])
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Color::new(c[0], c[1], c[2])
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b)
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(c: Color) -> Self {
        image::Rgb(c.channels())
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(p: image::Rgb<u8>) -> Self {
        Color::from(p.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f32_clamps() {
        assert_eq!(Color::from_f32([-20.0, 300.0, 127.6]), Color::new(0, 255, 127));
        assert_eq!(Color::from_f32([f32::NAN, 1e9, -1e9]), Color::new(0, 255, 0));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::new(0, 100, 200);
        let b = Color::new(200, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::new(100, 100, 100));
        // out of range t is clamped
        assert_eq!(a.lerp(b, 4.0), b);
    }

    #[test]
    fn test_shifted_clamps() {
        let c = Color::new(250, 5, 128);
        assert_eq!(c.shifted([40.0, -40.0, 0.0]), Color::new(255, 0, 128));
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(Color::new(255, 0, 16).to_string(), "#ff0010");
    }
}
