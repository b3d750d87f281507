//! # Theme Preference
//!
//! Light/dark palette choice, persisted in the preferences INI file under
//! `[console] theme = Light Mode | Dark Mode`. A missing file or key means
//! light mode.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ini::Ini;

const PREFS_SECTION: &str = "console";
const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored representation of the preference
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "Light Mode",
            Theme::Dark => "Dark Mode",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Light Mode" => Some(Theme::Light),
            "Dark Mode" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads and writes the theme preference
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored theme; anything missing or unreadable yields light mode
    pub fn load(&self) -> Theme {
        if !self.path.exists() {
            return Theme::default();
        }
        match Ini::load_from_file(&self.path) {
            Ok(ini) => ini
                .get_from(Some(PREFS_SECTION), THEME_KEY)
                .and_then(Theme::parse)
                .unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    "Failed to read preferences from {}: {}",
                    self.path.display(),
                    e
                );
                Theme::default()
            }
        }
    }

    /// Persist the theme, keeping any other preferences in the file
    pub fn save(&self, theme: Theme) -> Result<()> {
        let mut ini = if self.path.exists() {
            Ini::load_from_file(&self.path)
                .with_context(|| format!("Failed to read {}", self.path.display()))?
        } else {
            Ini::new()
        };

        ini.with_section(Some(PREFS_SECTION))
            .set(THEME_KEY, theme.as_str());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        ini.write_to_file(&self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        tracing::debug!("Saved theme '{}' to {}", theme, self.path.display());
        Ok(())
    }

    /// Flip the stored theme and return the new value
    pub fn toggle(&self) -> Result<Theme> {
        let theme = self.load().toggled();
        self.save(theme)?;
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_should_default_to_light_mode() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("prefs"));
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn theme_should_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("nested").join("prefs"));

        store.save(Theme::Dark).unwrap();
        assert_eq!(store.load(), Theme::Dark);

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("Dark Mode"));
    }

    #[test]
    fn toggle_should_flip_stored_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("prefs"));

        assert_eq!(store.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.toggle().unwrap(), Theme::Light);
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn unknown_value_should_fall_back_to_light_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs");
        std::fs::write(&path, "[console]\ntheme = Sepia\n").unwrap();

        assert_eq!(ThemeStore::new(path).load(), Theme::Light);
    }
}
