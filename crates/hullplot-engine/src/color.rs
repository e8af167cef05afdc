use bytemuck::{Pod, Zeroable};

/// Straight-alpha RGBA, one unsigned byte per channel.
///
/// This is the per-vertex color unit uploaded to the GPU; the shader reads it
/// normalized to `[0, 1]`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);
    pub const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let byte = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();
        match s.len() {
            6 => Some(Self::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl From<[u8; 4]> for Rgba8 {
    #[inline]
    fn from(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

/// Floating point RGBA in `[0, 1]`, used for the clear color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    /// Opaque color; channels are clamped to `[0, 1]`.
    #[inline]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: 1.0,
        }
    }

    #[inline]
    pub fn from_rgba8(c: Rgba8) -> Self {
        Self {
            r: c.r as f32 / 255.0,
            g: c.g as f32 / 255.0,
            b: c.b as f32 / 255.0,
            a: c.a as f32 / 255.0,
        }
    }
}

impl From<[f32; 3]> for Color {
    #[inline]
    fn from(c: [f32; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }
}

impl From<[u8; 3]> for Color {
    #[inline]
    fn from(c: [u8; 3]) -> Self {
        Self::from_rgba8(Rgba8::opaque(c[0], c[1], c[2]))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_six_digits_is_opaque() {
        assert_eq!(Rgba8::from_hex("#ff8000"), Some(Rgba8::new(255, 128, 0, 255)));
    }

    #[test]
    fn hex_eight_digits_keeps_alpha() {
        assert_eq!(Rgba8::from_hex("10203040"), Some(Rgba8::new(16, 32, 48, 64)));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert_eq!(Rgba8::from_hex("#xyzxyz"), None);
        assert_eq!(Rgba8::from_hex("#fff"), None);
    }

    #[test]
    fn rgb_clamps_and_is_opaque() {
        let c = Color::rgb(2.0, -1.0, 0.5);
        assert_eq!(c, Color { r: 1.0, g: 0.0, b: 0.5, a: 1.0 });
    }

    #[test]
    fn bytes_normalize_to_unit_range() {
        let c = Color::from([255u8, 0, 51]);
        assert_eq!(c, Color { r: 1.0, g: 0.0, b: 0.2, a: 1.0 });
    }
}
