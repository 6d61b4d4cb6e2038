//! RGBA color used by frame images.

/// RGBA color with f64 components (0.0 to 1.0 range).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// Create a new color with alpha = 1.0.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a new color with alpha.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create black.
    pub const fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Create white.
    pub const fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::rgba(0.0, 0.0, 0.0, 0.0)
    }

    /// Magenta used by the missing-texture checkerboard.
    pub const fn fuchsia() -> Self {
        Self::rgb(1.0, 0.0, 1.0)
    }

    /// Clamp all components to [0, 1].
    pub fn clamp(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Convert to 8-bit RGBA.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let c = self.clamp();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        ]
    }

    /// Create from 8-bit RGBA.
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0] as f64 / 255.0,
            g: rgba[1] as f64 / 255.0,
            b: rgba[2] as f64 / 255.0,
            a: rgba[3] as f64 / 255.0,
        }
    }

    /// Perceived brightness (Rec. 601 weights).
    pub fn luminance(&self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::transparent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba8_roundtrip_is_lossless() {
        for v in [0u8, 1, 127, 128, 254, 255] {
            let c = Color::from_rgba8([v, 255 - v, v / 2, v]);
            assert_eq!(c.to_rgba8(), [v, 255 - v, v / 2, v]);
        }
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(Color::black().luminance(), 0.0);
        assert!((Color::white().luminance() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_out_of_range() {
        let c = Color::rgba(1.5, -0.5, 0.5, 2.0).to_rgba8();
        assert_eq!(c, [255, 0, 128, 255]);
    }
}
