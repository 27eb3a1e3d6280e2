//! Theme data model
//!
//! Color themes are JSON-with-comments documents carrying a
//! `tokenColors` array of scope → style rules, optionally chained to a
//! base theme via an `include` reference. This module defines the raw
//! (serde) shapes of those documents, the resolved [`ScopeStyle`]
//! values the rest of the crate consumes, and the comment-stripping
//! preprocessor that lets `serde_json` parse the files.

use serde::{Deserialize, Serialize};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        match s.len() {
            6 => Ok(Color {
                r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
                g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
                b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
                a: 255,
            }),
            8 => Ok(Color {
                r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
                g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
                b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
                a: u8::from_str_radix(&s[6..8], 16).map_err(|e| e.to_string())?,
            }),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

/// Font style flags from a rule's `fontStyle` field.
///
/// Multiple flags may combine (e.g. italic+bold). Tokens other than
/// `italic`, `bold` and `underline` are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontStyle {
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
}

impl FontStyle {
    /// Parse a space-separated token list such as `"bold italic"`
    pub fn parse(text: &str) -> Self {
        let mut style = FontStyle::default();
        for part in text.split_whitespace() {
            match part {
                "italic" => style.italic = true,
                "bold" => style.bold = true,
                "underline" => style.underline = true,
                _ => {}
            }
        }
        style
    }

    pub fn is_plain(&self) -> bool {
        !(self.italic || self.bold || self.underline)
    }
}

/// Resolved style for one scope name. Immutable once resolved for a
/// theme load; the table holding these is rebuilt wholesale on reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopeStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub font_style: FontStyle,
}

/// Style settings as they appear in a theme rule (raw strings)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
}

impl RawStyle {
    /// Resolve raw strings into a [`ScopeStyle`].
    ///
    /// A malformed color drops that field rather than failing the
    /// rule; unknown font-style tokens are ignored.
    pub fn resolve(&self) -> ScopeStyle {
        ScopeStyle {
            foreground: self.foreground.as_deref().and_then(parse_color_field),
            background: self.background.as_deref().and_then(parse_color_field),
            font_style: self
                .font_style
                .as_deref()
                .map(FontStyle::parse)
                .unwrap_or_default(),
        }
    }
}

fn parse_color_field(text: &str) -> Option<Color> {
    match Color::from_hex(text) {
        Ok(color) => Some(color),
        Err(e) => {
            tracing::warn!("Ignoring malformed theme color {:?}: {}", text, e);
            None
        }
    }
}

/// A rule's `scope` field: a single scope name or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeSelector {
    One(String),
    Many(Vec<String>),
}

impl ScopeSelector {
    pub fn names(&self) -> &[String] {
        match self {
            ScopeSelector::One(name) => std::slice::from_ref(name),
            ScopeSelector::Many(names) => names,
        }
    }
}

/// One entry of a theme's `tokenColors` array.
///
/// Rules without a `scope` field define global editor colors and are
/// skipped during scope ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenColorRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeSelector>,
    #[serde(default)]
    pub settings: RawStyle,
}

/// The parts of a theme document this subsystem consumes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFile {
    #[serde(default)]
    pub token_colors: Vec<TokenColorRule>,
    /// Relative path of a base theme to chain-load after this file
    #[serde(default)]
    pub include: Option<String>,
}

impl ThemeFile {
    /// Parse a JSON-with-comments theme document
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&strip_json_comments(text))
    }
}

/// Strip `//` and `/* */` comments plus trailing commas so the result
/// is plain JSON. Comment-like text inside string literals is kept.
pub fn strip_json_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    // Pass 1: comments
    let mut in_string = false;
    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            out.push(b);
            if b == b'\\' && i + 1 < bytes.len() {
                out.push(bytes[i + 1]);
                i += 2;
                continue;
            }
            if b == b'"' {
                in_string = false;
            }
            i += 1;
        } else if b == b'"' {
            in_string = true;
            out.push(b);
            i += 1;
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i += 2;
            while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                // Preserve newlines for line numbers in error messages
                if bytes[i] == b'\n' {
                    out.push(b'\n');
                }
                i += 1;
            }
            i = (i + 2).min(bytes.len());
        } else {
            out.push(b);
            i += 1;
        }
    }

    // Pass 2: trailing commas (a comma whose next non-whitespace byte
    // closes an object or array)
    let stripped = out;
    let mut result = Vec::with_capacity(stripped.len());
    let mut in_string = false;
    let mut i = 0;
    while i < stripped.len() {
        let b = stripped[i];
        if in_string {
            result.push(b);
            if b == b'\\' && i + 1 < stripped.len() {
                result.push(stripped[i + 1]);
                i += 2;
                continue;
            }
            if b == b'"' {
                in_string = false;
            }
            i += 1;
        } else if b == b'"' {
            in_string = true;
            result.push(b);
            i += 1;
        } else if b == b',' {
            let mut j = i + 1;
            while j < stripped.len() && stripped[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < stripped.len() && (stripped[j] == b'}' || stripped[j] == b']') {
                i += 1; // drop the comma, keep the whitespace
            } else {
                result.push(b);
                i += 1;
            }
        } else {
            result.push(b);
            i += 1;
        }
    }

    // Input was valid UTF-8 and only ASCII bytes were removed
    String::from_utf8(result).unwrap_or_default()
}
