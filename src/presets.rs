use crate::config::FieldConfig;
use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A named set of field parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub field: FieldConfig,
}

impl Preset {
    pub fn new(name: impl Into<String>, description: impl Into<String>, field: FieldConfig) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            field,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
    /// Where user presets live; None if no config dir exists
    dir: Option<PathBuf>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    /// Manager backed by the platform config directory
    pub fn new() -> Self {
        Self::with_dir(Self::default_dir())
    }

    pub fn with_dir(dir: Option<PathBuf>) -> Self {
        let mut manager = Self {
            builtin: builtin_presets(),
            user: Vec::new(),
            dir,
        };
        manager.load_user_presets();
        manager
    }

    /// Get the presets directory path
    fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("particle-field").join("presets"))
    }

    /// Load user presets from disk; unreadable files are skipped, as are
    /// presets whose name is already taken
    fn load_user_presets(&mut self) {
        let Some(dir) = &self.dir else { return };
        let Ok(entries) = fs::read_dir(dir) else { return };

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let preset = match fs::read_to_string(&path)
                .map_err(FieldError::from)
                .and_then(|s| serde_json::from_str::<Preset>(&s).map_err(FieldError::from))
            {
                Ok(preset) => preset,
                Err(e) => {
                    log::warn!("skipping preset {}: {}", path.display(), e);
                    continue;
                }
            };
            if self.all_presets().any(|p| p.name.eq_ignore_ascii_case(&preset.name)) {
                log::warn!(
                    "skipping preset {}: name '{}' is already taken",
                    path.display(),
                    preset.name
                );
                continue;
            }
            self.user.push(preset);
        }
    }

    /// File name a preset is stored under. Names differing only in case
    /// share a file, matching the case-insensitive lookup.
    fn file_name(name: &str) -> String {
        let stem: String = name
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}.json", stem)
    }

    fn is_builtin(&self, name: &str) -> bool {
        self.builtin.iter().any(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Save a preset to disk, replacing any user preset of the same name.
    ///
    /// Built-in names are reserved, and a name whose file would overwrite a
    /// different user preset is refused.
    pub fn save_preset(&mut self, preset: Preset) -> Result<PathBuf, FieldError> {
        preset.field.validate()?;
        if self.is_builtin(&preset.name) {
            return Err(FieldError::PresetConflict(format!(
                "'{}' is a built-in preset",
                preset.name
            )));
        }
        let file_name = Self::file_name(&preset.name);
        if let Some(other) = self.user.iter().find(|p| {
            !p.name.eq_ignore_ascii_case(&preset.name) && Self::file_name(&p.name) == file_name
        }) {
            return Err(FieldError::PresetConflict(format!(
                "'{}' would overwrite preset '{}' ({})",
                preset.name, other.name, file_name
            )));
        }

        let dir = self.dir.as_ref().ok_or(FieldError::NoConfigDir)?;
        fs::create_dir_all(dir)?;

        let path = dir.join(file_name);
        fs::write(&path, serde_json::to_string_pretty(&preset)?)?;

        self.user.retain(|p| !p.name.eq_ignore_ascii_case(&preset.name));
        self.user.push(preset);
        Ok(path)
    }

    /// Delete a user preset (case-insensitive). Built-ins cannot be deleted.
    pub fn delete_preset(&mut self, name: &str) -> Result<(), FieldError> {
        if self.is_builtin(name) {
            return Err(FieldError::PresetConflict(format!(
                "'{}' is a built-in preset",
                name
            )));
        }
        let dir = self.dir.as_ref().ok_or(FieldError::NoConfigDir)?;
        let index = self
            .user
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FieldError::UnknownPreset(name.to_string()))?;
        let preset = self.user.remove(index);

        let path = dir.join(Self::file_name(&preset.name));
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name (case-insensitive)
    pub fn find(&self, name: &str) -> Result<&Preset, FieldError> {
        self.all_presets()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FieldError::UnknownPreset(name.to_string()))
    }
}

fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new("Hero", "The landing-page background", FieldConfig::default()),
        Preset::new(
            "Constellation",
            "Long, bright links between slow particles",
            FieldConfig {
                max_drift: 0.08,
                connection_distance: 170.0,
                link_opacity: 0.3,
                ..Default::default()
            },
        ),
        Preset::new(
            "Dense",
            "Twice the particles, tighter links",
            FieldConfig {
                density: 0.2,
                max_particles: 240,
                connection_distance: 90.0,
                ..Default::default()
            },
        ),
        Preset::new(
            "Calm",
            "Barely drifting, soft pointer",
            FieldConfig {
                max_drift: 0.05,
                push_strength: 0.5,
                oscillation_range: (0.002, 0.01),
                ..Default::default()
            },
        ),
        Preset::new(
            "Storm",
            "Fast drift and a strong pointer",
            FieldConfig {
                max_drift: 0.8,
                push_strength: 4.0,
                interaction_radius: 240.0,
                pointer_link_opacity: 0.25,
                ..Default::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtins_valid() {
        let manager = PresetManager::with_dir(None);
        assert!(!manager.builtin.is_empty());
        for preset in &manager.builtin {
            assert!(preset.field.validate().is_ok(), "{}", preset.name);
        }
    }

    #[test]
    fn test_find_case_insensitive() {
        let manager = PresetManager::with_dir(None);
        assert_eq!(manager.find("storm").unwrap().name, "Storm");
        assert!(matches!(
            manager.find("nebula"),
            Err(FieldError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let mut manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));

        let preset = Preset::new(
            "My Field/1",
            "slashes get sanitized",
            FieldConfig {
                max_particles: 42,
                ..Default::default()
            },
        );
        let path = manager.save_preset(preset.clone()).unwrap();
        assert_eq!(path.file_name().unwrap(), "my_field_1.json");

        let reloaded = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        assert_eq!(reloaded.user, vec![preset]);
        assert_eq!(reloaded.find("my field/1").unwrap().field.max_particles, 42);
    }

    #[test]
    fn test_save_replaces_same_name() {
        let dir = tempdir().unwrap();
        let mut manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        manager
            .save_preset(Preset::new("A", "first", FieldConfig::default()))
            .unwrap();
        manager
            .save_preset(Preset::new("A", "second", FieldConfig::default()))
            .unwrap();

        assert_eq!(manager.user.len(), 1);
        assert_eq!(manager.user[0].description, "second");
    }

    #[test]
    fn test_delete_preset() {
        let dir = tempdir().unwrap();
        let mut manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        let path = manager
            .save_preset(Preset::new("Gone", "", FieldConfig::default()))
            .unwrap();

        manager.delete_preset("Gone").unwrap();
        assert!(!path.exists());
        assert!(manager.find("Gone").is_err());
    }

    #[test]
    fn test_bad_files_skipped() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        assert!(manager.user.is_empty());
    }

    #[test]
    fn test_no_dir_cannot_save() {
        let mut manager = PresetManager::with_dir(None);
        let result = manager.save_preset(Preset::new("X", "", FieldConfig::default()));
        assert!(matches!(result, Err(FieldError::NoConfigDir)));
    }

    #[test]
    fn test_builtin_names_reserved() {
        let dir = tempdir().unwrap();
        let mut manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        let shadow = Preset::new(
            "hero",
            "",
            FieldConfig {
                max_particles: 7,
                ..Default::default()
            },
        );

        let result = manager.save_preset(shadow);
        assert!(matches!(result, Err(FieldError::PresetConflict(_))));
        assert!(manager.user.is_empty());
        assert_eq!(manager.find("Hero").unwrap().field.max_particles, 120);
        assert!(matches!(
            manager.delete_preset("HERO"),
            Err(FieldError::PresetConflict(_))
        ));
    }

    #[test]
    fn test_builtin_name_on_disk_skipped() {
        let dir = tempdir().unwrap();
        let json = serde_json::to_string(&Preset::new("Hero", "", FieldConfig::default())).unwrap();
        std::fs::write(dir.path().join("hero.json"), json).unwrap();

        let manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        assert!(manager.user.is_empty());
    }

    #[test]
    fn test_file_collision_refused() {
        let dir = tempdir().unwrap();
        let mut manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        manager
            .save_preset(Preset::new("a/b", "first", FieldConfig::default()))
            .unwrap();

        let result = manager.save_preset(Preset::new("a_b", "second", FieldConfig::default()));
        assert!(matches!(result, Err(FieldError::PresetConflict(_))));

        let reloaded = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        assert_eq!(reloaded.user.len(), 1);
        assert_eq!(reloaded.find("a/b").unwrap().description, "first");
    }

    #[test]
    fn test_names_case_insensitive() {
        let dir = tempdir().unwrap();
        let mut manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        manager
            .save_preset(Preset::new("Drift", "first", FieldConfig::default()))
            .unwrap();
        manager
            .save_preset(Preset::new("DRIFT", "second", FieldConfig::default()))
            .unwrap();
        assert_eq!(manager.user.len(), 1);

        let reloaded = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        assert_eq!(reloaded.user.len(), 1);
        assert_eq!(reloaded.find("drift").unwrap().description, "second");

        manager.delete_preset("drift").unwrap();
        assert!(manager.find("Drift").is_err());
        assert!(PresetManager::with_dir(Some(dir.path().to_path_buf()))
            .user
            .is_empty());
    }

    #[test]
    fn test_delete_unknown_preset() {
        let dir = tempdir().unwrap();
        let mut manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        assert!(matches!(
            manager.delete_preset("nothing"),
            Err(FieldError::UnknownPreset(_))
        ));
    }
}
