//! Headless rendering of the field to PNG snapshots and animated GIFs.

use crate::color::{Rgb, Rgba};
use crate::config::FieldConfig;
use crate::driver::{HostEvent, ParticleBackground, QueuedHost};
use crate::error::FieldError;
use crate::raster::Raster;
use crate::surface::Surface;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// GIF frame delay in hundredths of a second (~50 fps playback)
const GIF_FRAME_DELAY: u16 = 2;

/// NeuQuant speed passed to the GIF encoder (1 = best, 30 = fastest)
const GIF_QUANTIZE_SPEED: i32 = 10;

/// Full-resolution surface: one raster pixel per viewport unit
#[derive(Debug, Clone, Default)]
pub struct ImageSurface {
    raster: Raster,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: Raster::new(width as usize, height as usize),
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }
}

impl Surface for ImageSurface {
    fn resize(&mut self, width: f32, height: f32) {
        self.raster
            .resize(width.max(0.0) as usize, height.max(0.0) as usize);
    }

    fn clear(&mut self, color: Rgb) {
        self.raster.clear(color);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.raster.fill_circle(x, y, radius, color);
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba) {
        self.raster.stroke_line(from.0, from.1, to.0, to.1, color);
    }
}

/// Options shared by both export formats
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
    /// Frames to simulate (PNG: before the snapshot; GIF: recorded)
    pub frames: usize,
    /// Pointer position; defaults to the viewport center
    pub pointer: Option<(f32, f32)>,
}

fn start_background(
    config: &FieldConfig,
    options: &ExportOptions,
    rng: StdRng,
) -> Result<ParticleBackground<QueuedHost, ImageSurface>, FieldError> {
    let max = u16::MAX as u32;
    if options.width == 0 || options.height == 0 || options.width > max || options.height > max {
        return Err(FieldError::InvalidDimensions {
            width: options.width,
            height: options.height,
        });
    }

    let host = QueuedHost::new(options.width as f32, options.height as f32);
    let mut background = ParticleBackground::new(config.clone(), host, rng);
    background.attach(Some(ImageSurface::new(options.width, options.height)));
    if let Some((x, y)) = options.pointer {
        background.handle_event(HostEvent::PointerMove { x, y });
    }
    Ok(background)
}

/// Fire one scheduled frame, as a display tick would
fn advance(background: &mut ParticleBackground<QueuedHost, ImageSurface>) {
    if let Some(handle) = background.host_mut().take_scheduled() {
        background.on_frame(handle);
    }
}

/// Dimensions and RGB8 bytes of the last drawn frame
fn current_frame(background: &ParticleBackground<QueuedHost, ImageSurface>) -> (u32, u32, Vec<u8>) {
    match background.surface() {
        Some(surface) => {
            let raster = surface.raster();
            (raster.width() as u32, raster.height() as u32, raster.to_rgb8())
        }
        None => (0, 0, Vec::new()),
    }
}

/// Simulate `options.frames` frames and save the last one as PNG
pub fn export_png(
    config: &FieldConfig,
    options: &ExportOptions,
    rng: StdRng,
    path: &Path,
) -> Result<(), FieldError> {
    let mut background = start_background(config, options, rng)?;
    for _ in 0..options.frames.max(1) {
        advance(&mut background);
    }

    let (width, height, pixels) = current_frame(&background);
    let image = image::RgbImage::from_raw(width, height, pixels).ok_or(
        FieldError::InvalidDimensions {
            width: options.width,
            height: options.height,
        },
    )?;
    image.save(path)?;

    log::info!(
        "wrote {}x{} snapshot after {} frames to {}",
        options.width,
        options.height,
        background.frames(),
        path.display()
    );
    Ok(())
}

/// Record `options.frames` frames as a looping GIF
pub fn export_gif(
    config: &FieldConfig,
    options: &ExportOptions,
    rng: StdRng,
    path: &Path,
) -> Result<(), FieldError> {
    let mut background = start_background(config, options, rng)?;
    let (w, h) = (options.width as u16, options.height as u16);

    let file = BufWriter::new(File::create(path)?);
    let mut encoder = gif::Encoder::new(file, w, h, &[])?;
    encoder.set_repeat(gif::Repeat::Infinite)?;

    for _ in 0..options.frames.max(1) {
        advance(&mut background);
        let (_, _, pixels) = current_frame(&background);
        let mut frame = gif::Frame::from_rgb_speed(w, h, &pixels, GIF_QUANTIZE_SPEED);
        frame.delay = GIF_FRAME_DELAY;
        encoder.write_frame(&frame)?;
    }

    log::info!(
        "recorded {} frames ({}x{}) to {}",
        background.frames(),
        w,
        h,
        path.display()
    );
    Ok(())
}
