use crate::color::{Palette, Rgb};
use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Highest particle cap reachable with the +/- keys
pub const MAX_PARTICLES_LIMIT: usize = 1000;

/// All particle-field tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    // === Population ===
    /// Particles per unit of viewport width
    pub density: f32,
    /// Hard cap on particle count
    pub max_particles: usize,

    // === Motion ===
    /// Maximum drift per axis per frame
    pub max_drift: f32,
    /// Base radius range (min, max)
    pub size_range: (f32, f32),
    /// Phase advance per frame range (min, max)
    pub oscillation_range: (f32, f32),
    /// Radius swing around the base size
    pub size_amplitude: f32,
    /// Radius floor
    pub min_size: f32,
    /// Off-screen distance before a particle wraps
    pub wrap_margin: f32,

    // === Pointer ===
    /// Distance within which the pointer repels particles
    pub interaction_radius: f32,
    /// Push distance at zero range
    pub push_strength: f32,

    // === Drawing ===
    /// Max distance for particle-particle links
    pub connection_distance: f32,
    pub opacity_base: f32,
    pub opacity_amplitude: f32,
    /// Peak opacity of particle-particle links
    pub link_opacity: f32,
    /// Peak opacity of particle-pointer links
    pub pointer_link_opacity: f32,
    pub palette: Palette,
    pub link_color: Rgb,
    pub accent_color: Rgb,
    pub background: Rgb,
}

impl Default for FieldConfig {
    fn default() -> Self {
        let palette = Palette::default();
        Self {
            density: 0.1,
            max_particles: 120,

            max_drift: 0.15,
            size_range: (0.5, 2.5),
            oscillation_range: (0.005, 0.025),
            size_amplitude: 0.5,
            min_size: 0.1,
            wrap_margin: 50.0,

            interaction_radius: 180.0,
            push_strength: 1.2,

            connection_distance: 120.0,
            opacity_base: 0.3,
            opacity_amplitude: 0.2,
            link_opacity: 0.15,
            pointer_link_opacity: 0.1,
            accent_color: palette.primary,
            palette,
            link_color: Rgb::new(100, 116, 139),
            background: Rgb::BLACK,
        }
    }
}

impl FieldConfig {
    /// Particle count for a viewport of the given width
    pub fn particle_count(&self, width: f32) -> usize {
        let raw = (f64::from(width) * f64::from(self.density)).floor();
        if raw.is_finite() && raw > 0.0 {
            (raw as usize).min(self.max_particles)
        } else {
            0
        }
    }

    /// Adjust the particle cap (clamped to 0-MAX_PARTICLES_LIMIT)
    pub fn adjust_max_particles(&mut self, delta: i32) {
        self.max_particles = self
            .max_particles
            .saturating_add_signed(delta as isize)
            .min(MAX_PARTICLES_LIMIT);
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<(), FieldError> {
        let finite = [
            ("density", self.density),
            ("max_drift", self.max_drift),
            ("size_amplitude", self.size_amplitude),
            ("min_size", self.min_size),
            ("wrap_margin", self.wrap_margin),
            ("interaction_radius", self.interaction_radius),
            ("push_strength", self.push_strength),
            ("connection_distance", self.connection_distance),
            ("opacity_base", self.opacity_base),
            ("opacity_amplitude", self.opacity_amplitude),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(format!("{} must be finite", name)));
            }
        }

        if self.density < 0.0 {
            return Err(invalid("density must not be negative".into()));
        }
        if self.max_drift < 0.0 || self.wrap_margin < 0.0 {
            return Err(invalid("max_drift and wrap_margin must not be negative".into()));
        }
        check_range("size_range", self.size_range)?;
        check_range("oscillation_range", self.oscillation_range)?;
        if self.min_size <= 0.0 {
            return Err(invalid("min_size must be positive".into()));
        }
        if self.interaction_radius <= 0.0 || self.connection_distance <= 0.0 {
            return Err(invalid(
                "interaction_radius and connection_distance must be positive".into(),
            ));
        }

        for (name, value) in [
            ("link_opacity", self.link_opacity),
            ("pointer_link_opacity", self.pointer_link_opacity),
            ("opacity_base", self.opacity_base),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{} must be within 0.0-1.0", name)));
            }
        }

        Ok(())
    }
}

fn invalid(msg: String) -> FieldError {
    FieldError::InvalidConfig(msg)
}

fn check_range(name: &str, (lo, hi): (f32, f32)) -> Result<(), FieldError> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(invalid(format!("{} must be finite", name)));
    }
    if lo < 0.0 || lo > hi {
        return Err(invalid(format!("{} must satisfy 0 <= min <= max", name)));
    }
    Ok(())
}

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Simulation and drawing parameters
    pub field: FieldConfig,
    /// Virtual pixels covered by one terminal cell, horizontally
    pub cell_width_px: f32,
    /// Virtual pixels covered by one terminal cell, vertically
    pub cell_height_px: f32,
    /// Minimum raster coverage for a braille dot to light
    pub dot_threshold: f32,
    /// Show the hero text overlay
    pub show_overlay: bool,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), FieldError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, FieldError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.cell_width_px > 0.0 && self.cell_height_px > 0.0) {
            return Err(invalid("cell dimensions must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.dot_threshold) {
            return Err(invalid("dot_threshold must be within 0.0-1.0".into()));
        }
        self.field.validate()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            field: FieldConfig::default(),
            cell_width_px: 8.0,
            cell_height_px: 16.0,
            dot_threshold: 0.02,
            show_overlay: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_particle_count() {
        let config = FieldConfig::default();
        assert_eq!(config.particle_count(1200.0), 120);
        assert_eq!(config.particle_count(600.0), 60);
        assert_eq!(config.particle_count(2000.0), 120);
        assert_eq!(config.particle_count(9.0), 0);
        assert_eq!(config.particle_count(0.0), 0);
        assert_eq!(config.particle_count(-40.0), 0);
    }

    #[test]
    fn test_adjust_max_particles_clamped() {
        let mut config = FieldConfig::default();
        config.adjust_max_particles(-500);
        assert_eq!(config.max_particles, 0);
        config.adjust_max_particles(5000);
        assert_eq!(config.max_particles, 1000);
    }

    #[test]
    fn test_adjust_huge_max_particles() {
        let mut config = FieldConfig {
            max_particles: usize::MAX,
            ..Default::default()
        };
        config.adjust_max_particles(-10);
        assert_eq!(config.max_particles, MAX_PARTICLES_LIMIT);

        config.max_particles = i32::MAX as usize + 1;
        config.adjust_max_particles(10);
        assert_eq!(config.max_particles, MAX_PARTICLES_LIMIT);
    }

    #[test]
    fn test_dot_threshold_validated() {
        for threshold in [f32::NAN, -0.1, 1.5, f32::INFINITY] {
            let config = AppConfig {
                dot_threshold: threshold,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(FieldError::InvalidConfig(_))),
                "{}",
                threshold
            );
        }
        let edge = AppConfig {
            dot_threshold: 1.0,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = FieldConfig {
            size_range: (2.0, 1.0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FieldError::InvalidConfig(_))));

        config = FieldConfig {
            interaction_radius: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config = FieldConfig {
            link_opacity: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config = FieldConfig {
            density: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_save_and_load() {
        let mut config = AppConfig::default();
        config.field.max_particles = 80;
        config.field.push_strength = 2.5;
        config.show_overlay = false;

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_field_uses_defaults() {
        let json = r#"{
            "version": 1,
            "field": { "max_particles": 40 },
            "cell_width_px": 8.0,
            "cell_height_px": 16.0,
            "dot_threshold": 0.02,
            "show_overlay": true
        }"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.field.max_particles, 40);
        assert_eq!(parsed.field.interaction_radius, 180.0);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(FieldError::Json(_))));
    }

    #[test]
    fn test_out_of_range_config_file() {
        let mut config = AppConfig::default();
        config.field.min_size = -1.0;
        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(FieldError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(matches!(result, Err(FieldError::Io(_))));
    }
}
