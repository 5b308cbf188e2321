use crate::color::{blend, Rgb, Rgba};

/// Software RGB raster with per-pixel coverage tracking.
///
/// Coordinates are in raster pixels; pixel (x, y) covers [x, x+1) x [y, y+1).
#[derive(Debug, Clone, Default)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 3]>,
    /// Highest opacity painted onto each pixel since the last clear
    coverage: Vec<f32>,
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Self {
        let mut raster = Self::default();
        raster.resize(width, height);
        raster
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 3]; width * height];
        self.coverage = vec![0.0; width * height];
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color.to_f32());
        self.coverage.fill(0.0);
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Blend `color` over one pixel; out-of-bounds writes are dropped
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if color.alpha <= 0.0 {
            return;
        }
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = blend(self.pixels[idx], color);
            self.coverage[idx] = self.coverage[idx].max(color.alpha);
        }
    }

    /// Filled disc. Discs smaller than a pixel still paint the pixel under their center.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        if !(cx.is_finite() && cy.is_finite()) {
            return;
        }
        let r = radius.max(0.0);
        let x0 = (cx - r).floor() as i64;
        let x1 = (cx + r).ceil() as i64;
        let y0 = (cy - r).floor() as i64;
        let y1 = (cy + r).ceil() as i64;

        let mut painted = false;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.blend_pixel(x, y, color);
                    painted = true;
                }
            }
        }
        if !painted {
            self.blend_pixel(cx.floor() as i64, cy.floor() as i64, color);
        }
    }

    /// One-pixel line, sampled once per pixel step along the major axis
    pub fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return;
        }
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let px = (x0 + dx * t).floor() as i64;
            let py = (y0 + dy * t).floor() as i64;
            if last != Some((px, py)) {
                self.blend_pixel(px, py, color);
                last = Some((px, py));
            }
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        self.index(x as i64, y as i64)
            .map(|idx| Rgb::from_f32(self.pixels[idx]))
    }

    pub fn coverage(&self, x: usize, y: usize) -> f32 {
        self.index(x as i64, y as i64)
            .map_or(0.0, |idx| self.coverage[idx])
    }

    /// Packed 8-bit RGB rows, top to bottom
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for px in &self.pixels {
            let c = Rgb::from_f32(*px);
            out.extend_from_slice(&[c.r, c.g, c.b]);
        }
        out
    }
}
