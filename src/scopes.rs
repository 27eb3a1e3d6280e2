//! Scope → style resolution for the active color theme
//!
//! [`ScopeResolver`] owns the lookup table mapping scope names (dotted
//! token-category identifiers such as `keyword.control`) to resolved
//! [`ScopeStyle`] values. The table is rebuilt wholesale by [`load`]
//! on every theme or configuration change and is never partially
//! mutated; reads between reloads are pure and O(1).
//!
//! Rule precedence is insertion order with no overwrite: the first
//! rule that defines a scope wins. Loading ingests user token-color
//! customizations first, then the active theme file, then any
//! `include`d base themes, so customizations override the theme and
//! the theme overrides its bases.
//!
//! [`load`]: ScopeResolver::load

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::manifest::find_theme_file;
use crate::settings::Settings;
use crate::theme::{ScopeStyle, ThemeFile, TokenColorRule};

/// The scope table for the currently active color theme.
///
/// All I/O and parse failures during a load are caught and logged;
/// `load` never fails and always leaves the table in a valid
/// (possibly empty) state, degrading coloring to "no styles".
#[derive(Debug, Default)]
pub struct ScopeResolver {
    table: HashMap<String, ScopeStyle>,
}

impl ScopeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the table for the theme named in `settings`.
    pub fn load(&mut self, settings: &Settings) {
        self.table.clear();

        // User customizations first, so they win under first-wins insertion
        self.ingest_rules(&settings.token_color_customizations);

        if settings.color_theme.is_empty() {
            tracing::warn!("No color theme configured, skipping theme scan");
            return;
        }

        match find_theme_file(&settings.extensions_dirs, &settings.color_theme) {
            Some(theme_path) => {
                let mut visited = HashSet::new();
                self.load_theme_file(&theme_path, &mut visited);
                tracing::info!(
                    "Loaded {} scope styles for theme {:?}",
                    self.table.len(),
                    settings.color_theme
                );
            }
            None => {
                tracing::warn!(
                    "Theme {:?} is not installed, scope table left empty",
                    settings.color_theme
                );
            }
        }
    }

    /// Parse one theme document and follow its `include` chain.
    ///
    /// A file that fails to read or parse aborts only itself; rules
    /// already ingested from earlier files in the chain are kept. A
    /// file revisited within one load pass is a no-op, so include
    /// cycles terminate.
    pub fn load_theme_file(&mut self, path: &Path, visited: &mut HashSet<PathBuf>) {
        let identity = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if !visited.insert(identity) {
            tracing::debug!("Include cycle at {}, skipping revisit", path.display());
            return;
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read theme file {}: {}", path.display(), e);
                return;
            }
        };

        let theme = match ThemeFile::parse(&text) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!("Failed to parse theme file {}: {}", path.display(), e);
                return;
            }
        };

        self.ingest_rules(&theme.token_colors);

        if let Some(include) = &theme.include {
            let base = path.parent().unwrap_or(Path::new("")).join(include);
            self.load_theme_file(&base, visited);
        }
    }

    /// Insert each rule's scopes, keeping existing entries untouched.
    pub fn ingest_rules(&mut self, rules: &[TokenColorRule]) {
        for rule in rules {
            let Some(selector) = &rule.scope else {
                // Scope-less rules carry global editor colors
                continue;
            };
            let style = rule.settings.resolve();
            for name in selector.names() {
                if !self.table.contains_key(name) {
                    self.table.insert(name.clone(), style);
                }
            }
        }
    }

    /// Pure read; O(1)
    pub fn lookup(&self, scope: &str) -> Option<&ScopeStyle> {
        self.table.get(scope)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
