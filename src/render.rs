use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::surface::Surface;

/// Opacity of a link between two points `distance` apart.
/// Fades linearly from `peak` at zero range to 0 at `max_distance`.
pub fn link_opacity(distance: f32, max_distance: f32, peak: f32) -> f32 {
    ((1.0 - distance / max_distance) * peak).max(0.0)
}

/// Paint one frame of the field. Returns false if the surface is lost.
///
/// Per particle, in sequence order: its circle, its links to later
/// particles, then its link to the pointer.
pub fn draw<S: Surface + ?Sized>(field: &ParticleField, config: &FieldConfig, surface: &mut S) -> bool {
    if surface.is_lost() {
        return false;
    }

    surface.clear(config.background);

    let (px, py) = field.pointer;
    let particles = &field.particles;

    for (i, p) in particles.iter().enumerate() {
        let opacity = config.opacity_base + p.phase.sin() * config.opacity_amplitude;
        let color = config.palette.color(p.hue).with_alpha(opacity);
        surface.fill_circle(p.x, p.y, p.size, color);

        for q in &particles[i + 1..] {
            let distance = p.distance_to(q.x, q.y);
            if distance < config.connection_distance {
                let alpha = link_opacity(distance, config.connection_distance, config.link_opacity);
                surface.stroke_line((p.x, p.y), (q.x, q.y), config.link_color.with_alpha(alpha));
            }
        }

        let distance = p.distance_to(px, py);
        if distance < config.interaction_radius {
            let alpha = link_opacity(
                distance,
                config.interaction_radius,
                config.pointer_link_opacity,
            );
            surface.stroke_line((p.x, p.y), (px, py), config.accent_color.with_alpha(alpha));
        }
    }

    true
}
