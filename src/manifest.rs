//! Installed-extension manifest scanning
//!
//! The active color theme is located by name: every directory under
//! the configured extensions roots is expected to hold a
//! `package.json` manifest which may declare theme contributions. The
//! first contribution whose id (or label) matches the configured theme
//! name points at the theme file to load.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::theme::strip_json_comments;

/// The parts of an extension manifest this subsystem consumes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtensionManifest {
    #[serde(default)]
    pub contributes: Contributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contributes {
    #[serde(default)]
    pub themes: Vec<ThemeContribution>,
}

/// One declared theme: a display name plus a manifest-relative path
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeContribution {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    pub path: String,
}

impl ThemeContribution {
    /// The name themes are matched by: `id` if present, else `label`
    pub fn display_name(&self) -> Option<&str> {
        self.id.as_deref().or(self.label.as_deref())
    }
}

impl ExtensionManifest {
    /// Parse a manifest document (JSON, comments tolerated)
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&strip_json_comments(text))
    }
}

/// Scan the extension roots for a theme contribution named
/// `theme_name` and return the absolute path of its theme file.
///
/// Directories without a readable manifest, malformed manifests, and
/// manifests without theme contributions are skipped without error.
pub fn find_theme_file(roots: &[PathBuf], theme_name: &str) -> Option<PathBuf> {
    for root in roots {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Skipping extensions root {}: {}", root.display(), e);
                continue;
            }
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let extension_dir = entry.path();
            if !extension_dir.is_dir() {
                continue;
            }
            if let Some(theme_path) = theme_in_extension(&extension_dir, theme_name) {
                tracing::debug!(
                    "Theme {:?} found in {}",
                    theme_name,
                    extension_dir.display()
                );
                return Some(theme_path);
            }
        }
    }

    tracing::warn!("No installed extension contributes a theme named {:?}", theme_name);
    None
}

fn theme_in_extension(extension_dir: &Path, theme_name: &str) -> Option<PathBuf> {
    let manifest_path = extension_dir.join("package.json");
    let text = match fs::read_to_string(&manifest_path) {
        Ok(text) => text,
        Err(_) => return None,
    };

    let manifest = match ExtensionManifest::parse(&text) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!("Malformed manifest {}: {}", manifest_path.display(), e);
            return None;
        }
    };

    manifest
        .contributes
        .themes
        .iter()
        .find(|theme| theme.display_name() == Some(theme_name))
        .map(|theme| extension_dir.join(&theme.path))
}
