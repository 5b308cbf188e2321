use crate::color::{Rgb, Rgba};

/// A 2D drawing target addressed in viewport units.
///
/// Implemented by the terminal braille raster and the image exporter.
pub trait Surface {
    /// Match the surface to a new viewport size
    fn resize(&mut self, width: f32, height: f32);

    /// Whether the surface can no longer be drawn to
    fn is_lost(&self) -> bool {
        false
    }

    /// Paint the whole surface with an opaque color
    fn clear(&mut self, color: Rgb);

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba);
}
