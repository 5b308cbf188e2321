use serde::{Deserialize, Serialize};

/// Opaque 8-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an opacity (clamped to 0.0-1.0)
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Channels as floats on the 0-255 scale (sRGB, no gamma conversion)
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Round 0-255 float channels back to bytes, clamping out-of-range values
    pub fn from_f32(c: [f32; 3]) -> Self {
        let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Self::new(q(c[0]), q(c[1]), q(c[2]))
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(c: Rgb) -> Self {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}

/// Color with straight (non-premultiplied) opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

/// Source-over blend of `src` onto `dst`, done directly on sRGB values
pub fn blend(dst: [f32; 3], src: Rgba) -> [f32; 3] {
    let a = src.alpha;
    let s = src.rgb.to_f32();
    [
        dst[0] * (1.0 - a) + s[0] * a,
        dst[1] * (1.0 - a) + s[1] * a,
        dst[2] * (1.0 - a) + s[2] * a,
    ]
}

/// One of the four palette slots a particle can be tinted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hue {
    Primary,
    Secondary,
    Tertiary,
    Neutral,
}

impl Hue {
    pub const ALL: [Hue; 4] = [Hue::Primary, Hue::Secondary, Hue::Tertiary, Hue::Neutral];
}

/// Four-entry particle palette
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub tertiary: Rgb,
    pub neutral: Rgb,
}

impl Palette {
    pub fn color(&self, hue: Hue) -> Rgb {
        match hue {
            Hue::Primary => self.primary,
            Hue::Secondary => self.secondary,
            Hue::Tertiary => self.tertiary,
            Hue::Neutral => self.neutral,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Rgb::new(59, 130, 246),   // blue
            secondary: Rgb::new(147, 51, 234), // purple
            tertiary: Rgb::new(34, 211, 238),  // cyan
            neutral: Rgb::new(148, 163, 184),  // slate
        }
    }
}
