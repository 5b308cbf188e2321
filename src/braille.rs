use crate::color::{Rgb, Rgba};
use crate::raster::Raster;
use crate::surface::Surface;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// A single rendered Braille cell with position and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Rgb,
}

/// Surface that rasterizes at braille-dot resolution over a grid of terminal cells
#[derive(Debug, Clone)]
pub struct BrailleSurface {
    raster: Raster,
    columns: u16,
    rows: u16,
    /// Viewport units per terminal cell
    cell_width: f32,
    cell_height: f32,
    /// Minimum coverage for a dot to light
    threshold: f32,
}

impl BrailleSurface {
    pub fn new(cell_width: f32, cell_height: f32, threshold: f32) -> Self {
        Self {
            raster: Raster::default(),
            columns: 0,
            rows: 0,
            cell_width,
            cell_height,
            threshold,
        }
    }

    /// Terminal cell grid currently covered
    pub fn grid_size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    /// Viewport units per braille dot (x, y)
    fn dot_scale(&self) -> (f32, f32) {
        (self.cell_width / 2.0, self.cell_height / 4.0)
    }

    /// Collect every cell with at least one lit dot.
    /// Cell color is the average of its lit dots.
    pub fn cells(&self) -> Vec<BrailleCell> {
        let mut cells = Vec::new();

        for cy in 0..self.rows {
            for cx in 0..self.columns {
                let mut pattern: u8 = 0;
                let mut sum = [0u32; 3];
                let mut lit: u32 = 0;

                let base_x = cx as usize * 2;
                let base_y = cy as usize * 4;

                for dx in 0..2 {
                    for dy in 0..4 {
                        let (x, y) = (base_x + dx, base_y + dy);
                        if self.raster.coverage(x, y) < self.threshold {
                            continue;
                        }
                        if let Some(c) = self.raster.pixel(x, y) {
                            pattern |= BRAILLE_DOTS[dx][dy];
                            sum[0] += c.r as u32;
                            sum[1] += c.g as u32;
                            sum[2] += c.b as u32;
                            lit += 1;
                        }
                    }
                }

                // Only emit cells that have at least one dot
                if pattern != 0 {
                    let braille_char =
                        char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                    cells.push(BrailleCell {
                        x: cx,
                        y: cy,
                        char: braille_char,
                        color: Rgb::new(
                            (sum[0] / lit) as u8,
                            (sum[1] / lit) as u8,
                            (sum[2] / lit) as u8,
                        ),
                    });
                }
            }
        }

        cells
    }
}

impl Surface for BrailleSurface {
    fn resize(&mut self, width: f32, height: f32) {
        self.columns = (width / self.cell_width).floor().clamp(0.0, u16::MAX as f32) as u16;
        self.rows = (height / self.cell_height).floor().clamp(0.0, u16::MAX as f32) as u16;
        self.raster
            .resize(self.columns as usize * 2, self.rows as usize * 4);
    }

    fn clear(&mut self, color: Rgb) {
        self.raster.clear(color);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        let (sx, sy) = self.dot_scale();
        // dots are square with the default 8x16 cells
        let r = radius / ((sx + sy) / 2.0);
        self.raster.fill_circle(x / sx, y / sy, r, color);
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba) {
        let (sx, sy) = self.dot_scale();
        self.raster
            .stroke_line(from.0 / sx, from.1 / sy, to.0 / sx, to.1 / sy, color);
    }
}
