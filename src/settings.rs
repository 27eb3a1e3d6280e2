//! Colorization settings persistence
//!
//! Stores the configuration surface in `~/.config/scopelight/settings.yaml`:
//! the active color theme name, user token-color customization rules,
//! the document kinds eligible for colorization, and the directories
//! scanned for installed extensions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::theme::TokenColorRule;

/// Settings that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Display name of the active color theme (e.g. "Nord")
    #[serde(default)]
    pub color_theme: String,

    /// Token-color rules that override the active theme
    #[serde(default)]
    pub token_color_customizations: Vec<TokenColorRule>,

    /// File extensions (without dot) of documents to colorize.
    /// Documents with other extensions are never requested.
    #[serde(default)]
    pub file_extensions: Vec<String>,

    /// Directories scanned for installed extension manifests
    #[serde(default = "default_extensions_dirs")]
    pub extensions_dirs: Vec<PathBuf>,
}

fn default_extensions_dirs() -> Vec<PathBuf> {
    crate::config_paths::extensions_dir().into_iter().collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color_theme: String::new(),
            token_color_customizations: Vec::new(),
            file_extensions: Vec::new(),
            extensions_dirs: default_extensions_dirs(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::settings_file() else {
            tracing::debug!("No config directory available, using default settings");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from an explicit path, falling back to defaults
    /// on any read or parse failure.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::settings_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write settings to {}: {}", path.display(), e))?;

        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, newer: &Settings) -> ConfigChange {
        ConfigChange {
            color_theme: self.color_theme != newer.color_theme,
            token_color_customizations: self.token_color_customizations
                != newer.token_color_customizations,
            file_extensions: self.file_extensions != newer.file_extensions,
            extensions_dirs: self.extensions_dirs != newer.extensions_dirs,
        }
    }
}

/// Which settings keys a configuration-change event touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigChange {
    pub color_theme: bool,
    pub token_color_customizations: bool,
    pub file_extensions: bool,
    pub extensions_dirs: bool,
}

impl ConfigChange {
    /// Whether the change requires the theme/decoration reload path.
    ///
    /// Only the theme name and token-color customizations feed the
    /// scope table; other keys change request targeting, not styles.
    pub fn affects_colorization(&self) -> bool {
        self.color_theme || self.token_color_customizations
    }

    pub fn is_empty(&self) -> bool {
        !(self.color_theme
            || self.token_color_customizations
            || self.file_extensions
            || self.extensions_dirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{RawStyle, ScopeSelector};
    use tempfile::tempdir;

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.yaml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_malformed_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, ":[ definitely not yaml {{").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_roundtrip_via_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(
            &path,
            concat!(
                "color_theme: Nord\n",
                "file_extensions: [leo, in]\n",
                "token_color_customizations:\n",
                "  - scope: keyword\n",
                "    settings:\n",
                "      foreground: \"#FF00FF\"\n",
            ),
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.color_theme, "Nord");
        assert_eq!(settings.file_extensions, ["leo", "in"]);
        assert_eq!(settings.token_color_customizations.len(), 1);
        assert_eq!(
            settings.token_color_customizations[0].scope,
            Some(ScopeSelector::One("keyword".to_string()))
        );
    }

    #[test]
    fn test_diff_flags_changed_keys() {
        let base = Settings {
            color_theme: "Nord".to_string(),
            ..Default::default()
        };
        let mut newer = base.clone();
        newer.color_theme = "Solarized".to_string();

        let change = base.diff(&newer);
        assert!(change.color_theme);
        assert!(!change.token_color_customizations);
        assert!(change.affects_colorization());
    }

    #[test]
    fn test_diff_of_identical_settings_is_empty() {
        let settings = Settings::default();
        assert!(settings.diff(&settings.clone()).is_empty());
    }

    #[test]
    fn test_customization_change_affects_colorization() {
        let base = Settings::default();
        let mut newer = base.clone();
        newer.token_color_customizations.push(TokenColorRule {
            scope: Some(ScopeSelector::One("keyword".to_string())),
            settings: RawStyle::default(),
        });

        assert!(base.diff(&newer).affects_colorization());
    }

    #[test]
    fn test_extension_list_change_does_not_reload_theme() {
        let base = Settings::default();
        let mut newer = base.clone();
        newer.file_extensions.push("leo".to_string());

        let change = base.diff(&newer);
        assert!(!change.is_empty());
        assert!(!change.affects_colorization());
    }
}
