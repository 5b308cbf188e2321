use crate::color::Hue;
use crate::config::FieldConfig;
use rand::Rng;
use std::f32::consts::TAU;

/// One animated point of the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Constant drift per frame
    pub vx: f32,
    pub vy: f32,
    pub base_size: f32,
    /// Current radius, recomputed every frame from `base_size` and `phase`
    pub size: f32,
    /// Phase advance per frame
    pub oscillation_speed: f32,
    /// Breathing phase in radians, within [0, TAU)
    pub phase: f32,
    pub hue: Hue,
}

impl Particle {
    /// Particle at rest at (x, y)
    #[cfg(test)]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            base_size: 1.0,
            size: 1.0,
            oscillation_speed: 0.0,
            phase: 0.0,
            hue: Hue::Primary,
        }
    }

    /// Draw a fresh particle somewhere inside a `width` x `height` viewport
    fn random<R: Rng>(rng: &mut R, width: f32, height: f32, config: &FieldConfig) -> Self {
        let base_size = uniform(rng, config.size_range.0, config.size_range.1);
        Self {
            x: uniform(rng, 0.0, width),
            y: uniform(rng, 0.0, height),
            vx: uniform(rng, -config.max_drift, config.max_drift),
            vy: uniform(rng, -config.max_drift, config.max_drift),
            base_size,
            size: base_size,
            oscillation_speed: uniform(rng, config.oscillation_range.0, config.oscillation_range.1),
            phase: uniform(rng, 0.0, TAU),
            hue: Hue::ALL[rng.gen_range(0..Hue::ALL.len())],
        }
    }

    /// Euclidean distance to a point
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        (self.x - x).hypot(self.y - y)
    }
}

/// Uniform sample in [lo, hi); collapses to `lo` for empty or inverted ranges
fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        lo + rng.gen::<f32>() * (hi - lo)
    } else {
        lo
    }
}

/// Mutable simulation state: particles, viewport and pointer
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
    pub width: f32,
    pub height: f32,
    pub pointer: (f32, f32),
}

impl ParticleField {
    /// Empty field with the pointer parked at the viewport center
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            particles: Vec::new(),
            width,
            height,
            pointer: (width / 2.0, height / 2.0),
        }
    }

    /// Replace every particle with a freshly generated set for the given viewport.
    /// The pointer position is left untouched.
    pub fn reinitialize<R: Rng>(&mut self, width: f32, height: f32, config: &FieldConfig, rng: &mut R) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);

        let count = config.particle_count(self.width);
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles
                .push(Particle::random(rng, self.width, self.height, config));
        }
        log::debug!(
            "field reinitialized: {} particles for {:.0}x{:.0}",
            count,
            self.width,
            self.height
        );
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
