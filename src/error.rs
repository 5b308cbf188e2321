//! Error type for configuration, preset and export operations.
//!
//! The simulation itself never fails; only the file-facing edges of the
//! application do.

use std::fmt;

/// Errors raised while loading/saving configuration or exporting frames.
#[derive(Debug)]
pub enum FieldError {
    /// Reading or writing a file failed.
    Io(std::io::Error),
    /// A config or preset file could not be (de)serialized.
    Json(serde_json::Error),
    /// A config value is out of its allowed range.
    InvalidConfig(String),
    /// No preset with the given name exists.
    UnknownPreset(String),
    /// A preset cannot be saved or deleted under this name.
    PresetConflict(String),
    /// The platform config directory could not be determined.
    NoConfigDir,
    /// PNG encoding failed.
    Image(image::ImageError),
    /// GIF encoding failed.
    Gif(gif::EncodingError),
    /// Requested export dimensions are unusable.
    InvalidDimensions { width: u32, height: u32 },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Io(e) => write!(f, "I/O error: {}", e),
            FieldError::Json(e) => write!(f, "Failed to parse or serialize JSON: {}", e),
            FieldError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            FieldError::UnknownPreset(name) => write!(f, "Unknown preset: {}", name),
            FieldError::PresetConflict(msg) => write!(f, "Preset conflict: {}", msg),
            FieldError::NoConfigDir => write!(f, "Could not determine config directory"),
            FieldError::Image(e) => write!(f, "Failed to write image: {}", e),
            FieldError::Gif(e) => write!(f, "Failed to encode GIF: {}", e),
            FieldError::InvalidDimensions { width, height } => {
                write!(f, "Invalid export dimensions {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::Io(e) => Some(e),
            FieldError::Json(e) => Some(e),
            FieldError::Image(e) => Some(e),
            FieldError::Gif(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FieldError {
    fn from(e: std::io::Error) -> Self {
        FieldError::Io(e)
    }
}

impl From<serde_json::Error> for FieldError {
    fn from(e: serde_json::Error) -> Self {
        FieldError::Json(e)
    }
}

impl From<image::ImageError> for FieldError {
    fn from(e: image::ImageError) -> Self {
        FieldError::Image(e)
    }
}

impl From<gif::EncodingError> for FieldError {
    fn from(e: gif::EncodingError) -> Self {
        FieldError::Gif(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_io_error_has_source() {
        let err: FieldError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_message_variants() {
        let err = FieldError::UnknownPreset("Nebula".into());
        assert_eq!(err.to_string(), "Unknown preset: Nebula");
        assert!(err.source().is_none());

        let err = FieldError::InvalidDimensions { width: 0, height: 10 };
        assert_eq!(err.to_string(), "Invalid export dimensions 0x10");
    }
}
