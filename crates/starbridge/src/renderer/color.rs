/// RGBA color with 8-bit channels, matching the canvas fill model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Shift each color channel by its own delta, clamped to 0..=255.
    pub fn offset(self, dr: i16, dg: i16, db: i16) -> Self {
        fn shift(c: u8, d: i16) -> u8 {
            (c as i16 + d).clamp(0, 255) as u8
        }
        Self {
            r: shift(self.r, dr),
            g: shift(self.g, dg),
            b: shift(self.b, db),
            a: self.a,
        }
    }

    /// CSS color string, e.g. `rgba(255,0,0,0.5)`.
    pub fn to_css(self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const BACKGROUND: Self = Self::rgb(220, 220, 220);
    pub const INDIGO: Self = Self::rgb(67, 56, 202);
    pub const GOLD: Self = Self::rgb(255, 215, 0);
}

/// Hue / saturation / brightness color. Hue in degrees, the rest in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl Hsb {
    pub fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            saturation,
            brightness,
        }
    }

    /// Rotate the hue by `degrees`, wrapping into [0, 360).
    pub fn rotated(self, degrees: f32) -> Self {
        Self::new(self.hue + degrees, self.saturation, self.brightness)
    }

    pub fn to_rgba(self) -> Rgba {
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let v = (self.brightness / 100.0).clamp(0.0, 1.0);
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        let to_u8 = |f: f32| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba::rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues_convert() {
        assert_eq!(Hsb::new(0.0, 100.0, 100.0).to_rgba(), Rgba::RED);
        assert_eq!(Hsb::new(120.0, 100.0, 100.0).to_rgba(), Rgba::rgb(0, 255, 0));
        assert_eq!(Hsb::new(240.0, 100.0, 100.0).to_rgba(), Rgba::rgb(0, 0, 255));
        assert_eq!(Hsb::new(0.0, 0.0, 100.0).to_rgba(), Rgba::WHITE);
    }

    #[test]
    fn hue_rotation_wraps() {
        let c = Hsb::new(350.0, 80.0, 100.0).rotated(40.0);
        assert!((c.hue - 30.0).abs() < 1e-4);
        assert!((Hsb::new(-30.0, 0.0, 0.0).hue - 330.0).abs() < 1e-4);
    }

    #[test]
    fn offset_clamps_channels() {
        let c = Rgba::rgb(250, 10, 128).offset(50, -50, 0);
        assert_eq!(c, Rgba::rgb(255, 0, 128));
    }

    #[test]
    fn css_string() {
        assert_eq!(Rgba::new(1, 2, 3, 255).to_css(), "rgba(1,2,3,1)");
    }
}
