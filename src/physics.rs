use crate::config::FieldConfig;
use crate::field::{Particle, ParticleField};
use std::f32::consts::TAU;

/// Push distance applied to a particle `distance` away from the pointer.
/// Zero at or beyond the interaction radius, `push_strength` at zero range.
pub fn push_magnitude(distance: f32, config: &FieldConfig) -> f32 {
    let radius = config.interaction_radius;
    if distance < radius {
        (radius - distance) / radius * config.push_strength
    } else {
        0.0
    }
}

/// Advance every particle by one frame
pub fn step(field: &mut ParticleField, config: &FieldConfig) {
    let (px, py) = field.pointer;
    let (width, height) = (field.width, field.height);

    for p in &mut field.particles {
        // Drift
        p.x += p.vx;
        p.y += p.vy;

        repel(p, px, py, config);
        wrap(p, width, height, config.wrap_margin);

        // Breathing uses this frame's phase. Kept within one period so f32
        // precision does not erode the step over a long run.
        p.phase = (p.phase + p.oscillation_speed).rem_euclid(TAU);
        p.size = (p.base_size + p.phase.sin() * config.size_amplitude).max(config.min_size);
    }
}

fn repel(p: &mut Particle, px: f32, py: f32, config: &FieldConfig) {
    let dx = p.x - px;
    let dy = p.y - py;
    let distance = dx.hypot(dy);
    let push = push_magnitude(distance, config);
    if push > 0.0 {
        let angle = dy.atan2(dx);
        p.x += angle.cos() * push;
        p.y += angle.sin() * push;
    }
}

/// Toroidal wrap with an off-screen margin on every edge
fn wrap(p: &mut Particle, width: f32, height: f32, margin: f32) {
    if p.x < -margin {
        p.x = width + margin;
    } else if p.x > width + margin {
        p.x = -margin;
    }
    if p.y < -margin {
        p.y = height + margin;
    } else if p.y > height + margin {
        p.y = -margin;
    }
}
