//! Persisted per-user defaults
//!
//! Stored as JSON in `~/.config/renderprof.json`. Read at startup, written
//! back after a normal exit so the last option set carries over.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::SettingsError;
use crate::review::DEFAULT_OPTIONS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Visualizer options used for reviews
    pub pprof: Vec<String>,
    pub frequency: Option<u32>,
    pub event: Option<String>,
    /// Keep artifacts after review
    pub keep: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pprof: DEFAULT_OPTIONS.iter().map(ToString::to_string).collect(),
            frequency: None,
            event: None,
            keep: false,
        }
    }
}

impl Settings {
    /// `~/.config/renderprof.json`, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("renderprof.json"))
    }

    /// Load settings, falling back to defaults when the file does not exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(SettingsError::Io { path: path.to_path_buf(), source }),
        };
        serde_json::from_str(&text)
            .map_err(|source| SettingsError::Json { path: path.to_path_buf(), source })
    }

    /// Write settings, creating the parent directory if needed
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| SettingsError::Json { path: path.to_path_buf(), source })?;
        fs::write(path, json).map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.pprof, ["-web"]);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("renderprof.json");
        let settings = Settings {
            pprof: vec!["-svg".to_string(), "-show_from=Foo Bar".to_string()],
            frequency: Some(4000),
            event: Some("cpu-clock".to_string()),
            keep: true,
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renderprof.json");
        fs::write(&path, r#"{"pprof": ["-top"]}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.pprof, ["-top"]);
        assert_eq!(settings.frequency, None);
        assert!(!settings.keep);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renderprof.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(Settings::load(&path), Err(SettingsError::Json { .. })));
    }
}
