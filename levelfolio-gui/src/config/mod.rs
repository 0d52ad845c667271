use std::{
    fs, io,
    path::Path,
    sync::Arc,
};

use levelfolio_lib::fs::config_dir;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

const FILE_NAME: &str = "gui.toml";

/// Handle to the GUI preferences
pub type Cfg = Arc<RwLock<GuiConfig>>;

/// Client-local display preferences, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub dark_mode: bool,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

impl GuiConfig {
    /// Read the preferences, falling back to the defaults when the file is missing or
    /// unreadable.
    pub fn load() -> Self {
        match config_dir() {
            Ok(dir) => Self::load_from(&dir.join(FILE_NAME)),
            Err(err) => {
                warn!("No configuration directory, using default preferences: {err}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring malformed {}: {err}", path.display());
                Self::default()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                warn!("Failed to read {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let written = config_dir()
            .map(|dir| dir.join(FILE_NAME))
            .and_then(|path| self.save_to(&path));

        if let Err(err) = written {
            warn!("Failed to save preferences: {err}");
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let contents = toml::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, contents)
    }

    pub fn theme(&self) -> iced::Theme {
        if self.dark_mode {
            iced::Theme::Dark
        } else {
            iced::Theme::Light
        }
    }

    /// Flip the preference and persist it.
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.save();
    }
}

#[cfg(test)]
mod test {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_defaults_to_dark() {
        let dir = tempdir().unwrap();

        let cfg = GuiConfig::load_from(&dir.path().join(FILE_NAME));

        assert!(cfg.dark_mode);
        assert_eq!(cfg.theme(), iced::Theme::Dark);
    }

    #[test]
    fn test_light_mode_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);

        GuiConfig { dark_mode: false }.save_to(&path).unwrap();

        assert!(!GuiConfig::load_from(&path).dark_mode);
        assert!(GuiConfig::load_from(&dir.path().join("empty.toml")).dark_mode);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "dark_mode = \"sometimes\"").unwrap();

        assert_eq!(GuiConfig::load_from(&path), GuiConfig::default());
    }
}
