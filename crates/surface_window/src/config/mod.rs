//! Configuration system

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Surface creation settings
///
/// Missing fields fall back to their defaults, so a config file only needs the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Initial title text
    pub title: String,
    /// Client width; non-positive selects the desktop-derived default
    pub width: i32,
    /// Client height; non-positive selects the desktop-derived default
    pub height: i32,
    /// Strip the title bar and sizing border after creation
    pub hide_frame: bool,
    /// Show the surface as soon as it is created
    pub show_on_create: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            title: "Surface".to_string(),
            width: 0,
            height: 0,
            hide_frame: false,
            show_on_create: true,
        }
    }
}

impl Config for SurfaceConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_in(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_load_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "surface.toml");
        std::fs::write(&path, "title = \"Output\"\nhide_frame = true\n").unwrap();

        let config = SurfaceConfig::load_from_file(&path).unwrap();

        assert_eq!(config.title, "Output");
        assert!(config.hide_frame);
        assert_eq!(config.width, 0);
        assert!(config.show_on_create);
    }

    #[test]
    fn test_save_and_load_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "surface.ron");
        let config = SurfaceConfig {
            title: "Output".to_string(),
            width: 1024,
            height: 768,
            hide_frame: false,
            show_on_create: false,
        };

        config.save_to_file(&path).unwrap();

        assert_eq!(SurfaceConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "surface.json");

        let result = SurfaceConfig::default().save_to_file(&path);

        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "absent.toml");

        assert!(matches!(SurfaceConfig::load_from_file(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "surface.toml");
        std::fs::write(&path, "width = \"wide\"").unwrap();

        assert!(matches!(SurfaceConfig::load_from_file(&path), Err(ConfigError::Parse(_))));
    }
}
