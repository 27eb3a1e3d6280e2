//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use scopelight::decorations::DecorationHandle;
use scopelight::protocol::{ColorRange, ColorScopes, ColorizeResponse, Point};
use scopelight::theme::Color;
use scopelight::{EditorRegistry, Settings, TextEditor};

/// Editor double recording the latest range set applied per handle
pub struct FakeEditor {
    pub uri: String,
    pub lines: u32,
    /// handle id → (foreground of the handle, ranges last applied)
    pub rendered: HashMap<u64, (Option<Color>, Vec<ColorRange>)>,
}

impl FakeEditor {
    pub fn new(uri: &str, lines: u32) -> Self {
        Self {
            uri: uri.to_string(),
            lines,
            rendered: HashMap::new(),
        }
    }

    /// Ranges currently rendered with a given foreground color.
    /// Tests give every scope a distinct color, so this identifies
    /// the scope without reaching into cache internals.
    pub fn ranges_with_foreground(&self, color: Color) -> Vec<ColorRange> {
        self.rendered
            .values()
            .find(|(foreground, _)| *foreground == Some(color))
            .map(|(_, ranges)| ranges.clone())
            .unwrap_or_default()
    }

    /// Whether any decoration with this foreground was ever applied
    pub fn has_decoration_with_foreground(&self, color: Color) -> bool {
        self.rendered
            .values()
            .any(|(foreground, _)| *foreground == Some(color))
    }
}

impl TextEditor for FakeEditor {
    fn document_uri(&self) -> &str {
        &self.uri
    }

    fn line_count(&self) -> u32 {
        self.lines
    }

    fn set_decorations(&mut self, handle: &DecorationHandle, ranges: &[ColorRange]) {
        self.rendered
            .insert(handle.id(), (handle.options.color, ranges.to_vec()));
    }
}

/// Registry double over a vector of fake editors
#[derive(Default)]
pub struct FakeRegistry {
    pub editors: Vec<FakeEditor>,
}

impl FakeRegistry {
    pub fn with_editors(editors: Vec<FakeEditor>) -> Self {
        Self { editors }
    }

    pub fn editor(&self, uri: &str) -> &FakeEditor {
        self.editors
            .iter()
            .find(|editor| editor.uri == uri)
            .expect("no such editor")
    }
}

impl EditorRegistry for FakeRegistry {
    fn visible_editors(&mut self) -> Vec<&mut dyn TextEditor> {
        self.editors
            .iter_mut()
            .map(|editor| editor as &mut dyn TextEditor)
            .collect()
    }
}

/// Install an extension directory with a manifest contributing one
/// theme, returning nothing; the caller points `extensions_dirs` at
/// `root`.
pub fn install_theme(root: &Path, extension: &str, label: &str, theme_json: &str) {
    let extension_dir = root.join(extension);
    fs::create_dir_all(&extension_dir).unwrap();
    fs::write(
        extension_dir.join("package.json"),
        format!(
            r#"{{"contributes": {{"themes": [{{"label": "{}", "path": "theme.json"}}]}}}}"#,
            label
        ),
    )
    .unwrap();
    fs::write(extension_dir.join("theme.json"), theme_json).unwrap();
}

/// Settings pointing at a fixture extensions root
pub fn settings_for(extensions_root: &Path, theme: &str, extensions: &[&str]) -> Settings {
    Settings {
        color_theme: theme.to_string(),
        token_color_customizations: Vec::new(),
        file_extensions: extensions.iter().map(|s| s.to_string()).collect(),
        extensions_dirs: vec![extensions_root.to_path_buf()],
    }
}

pub fn range(row: u32, start_col: u32, end_col: u32) -> ColorRange {
    ColorRange::new(Point::new(row, start_col), Point::new(row, end_col))
}

/// Build a colorize response from (scope, ranges) pairs
pub fn response(uri: &str, revision: u64, scopes: &[(&str, Vec<ColorRange>)]) -> ColorizeResponse {
    let mut map = ColorScopes::new();
    for (scope, ranges) in scopes {
        map.insert(scope.to_string(), ranges.clone());
    }
    ColorizeResponse {
        uri: uri.to_string(),
        revision,
        scopes: map,
    }
}
