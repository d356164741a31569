use super::Settings;
use super::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persistence for [`Settings`].
///
/// `load` returns `Ok(None)` when nothing has been stored yet.
pub trait SettingsBackend: Send + Sync {
    fn load(&self) -> Result<Option<Settings>, Error>;
    fn save(&self, settings: &Settings) -> Result<(), Error>;
}

/// Keeps settings in process memory only.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: Mutex<Option<Settings>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            stored: Mutex::new(Some(settings)),
        }
    }

    /// What was last saved, if anything.
    pub fn stored(&self) -> Option<Settings> {
        *self.stored.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Settings>, Error> {
        Ok(self.stored())
    }

    fn save(&self, settings: &Settings) -> Result<(), Error> {
        *self.stored.lock().unwrap_or_else(|e| e.into_inner()) = Some(*settings);
        Ok(())
    }
}

/// Stores settings as a small TOML document on disk.
#[derive(Debug, Clone)]
pub struct TomlFileBackend {
    path: PathBuf,
}

impl TomlFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsBackend for TomlFileBackend {
    fn load(&self) -> Result<Option<Settings>, Error> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        toml::from_str(&text)
            .map(Some)
            .map_err(|source| Error::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, settings: &Settings) -> Result<(), Error> {
        let text = toml::to_string(settings)?;
        std::fs::write(&self.path, text).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Language, Theme};

    #[test]
    fn memory_backend_starts_empty_and_remembers() {
        let backend = MemoryBackend::new();
        assert!(backend.load().unwrap().is_none());

        let settings = Settings {
            language: Language::Zh,
            theme: Theme::Dark,
        };
        backend.save(&settings).unwrap();
        assert_eq!(backend.load().unwrap(), Some(settings));
    }

    #[test]
    fn toml_backend_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = TomlFileBackend::new(dir.path().join("absent.toml"));
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn toml_backend_roundtrips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let backend = TomlFileBackend::new(&path);

        let settings = Settings {
            language: Language::Zh,
            theme: Theme::Dark,
        };
        backend.save(&settings).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("language = \"zh\""));
        assert!(text.contains("theme = \"dark\""));
        assert_eq!(backend.load().unwrap(), Some(settings));
    }

    #[test]
    fn toml_backend_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "language = \"klingon\"").unwrap();

        let err = TomlFileBackend::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn toml_backend_fills_missing_keys_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "theme = \"dark\"\n").unwrap();

        let loaded = TomlFileBackend::new(&path).load().unwrap().unwrap();
        assert_eq!(loaded.language, Language::En);
        assert_eq!(loaded.theme, Theme::Dark);
    }
}
