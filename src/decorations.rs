//! Decoration materialization and diff-application
//!
//! [`DecorationCache`] turns resolved scope styles into reusable
//! renderable decoration handles, one per distinct scope string, and
//! applies a colorize response onto an editor with minimal churn:
//! scopes present in the response are (re)rendered, cached scopes
//! absent from it are explicitly cleared so stale highlighting from an
//! earlier response never lingers.
//!
//! Handles live for the lifetime of the current theme; a theme or
//! configuration reload drops them all before the next coloring pass.

use std::collections::{HashMap, HashSet};

use crate::editors::TextEditor;
use crate::protocol::ColorizeResponse;
use crate::scopes::ScopeResolver;
use crate::theme::{Color, ScopeStyle};

/// How a decorated range grows when text is typed at its edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeBehavior {
    /// Typing at either edge stays outside the decoration
    #[default]
    OpenOpen,
    /// Typing at either edge extends the decoration
    ClosedClosed,
}

/// Host-renderable styling derived from one [`ScopeStyle`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub color: Option<Color>,
    pub background_color: Option<Color>,
    pub font_style: Option<&'static str>,
    pub font_weight: Option<&'static str>,
    pub text_decoration: Option<&'static str>,
    pub range_behavior: RangeBehavior,
}

impl RenderOptions {
    /// Map a resolved style onto render options. Each font-style flag
    /// maps to its own field, so flags combine independently.
    pub fn from_style(style: &ScopeStyle) -> Self {
        Self {
            color: style.foreground,
            background_color: style.background,
            font_style: style.font_style.italic.then_some("italic"),
            font_weight: style.font_style.bold.then_some("bold"),
            text_decoration: style.font_style.underline.then_some("underline"),
            range_behavior: RangeBehavior::OpenOpen,
        }
    }
}

/// A renderable decoration bound 1:1 to a scope name.
///
/// Ids are allocated from a monotonically increasing counter, so a
/// handle created before a [`DecorationCache::reload`] never compares
/// equal to one created after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationHandle {
    id: u64,
    pub options: RenderOptions,
}

impl DecorationHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Lazily materialized decoration handles for the current theme
#[derive(Debug, Default)]
pub struct DecorationCache {
    cache: HashMap<String, DecorationHandle>,
    /// Scopes already warned about; process lifetime, survives reloads
    warned: HashSet<String>,
    next_id: u64,
}

impl DecorationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The decoration for `scope`, creating it on first use.
    ///
    /// Returns `None` for scopes the current theme does not style,
    /// warning at most once per scope for the life of the process.
    pub fn decoration_for(
        &mut self,
        scope: &str,
        resolver: &ScopeResolver,
    ) -> Option<&DecorationHandle> {
        if self.cache.contains_key(scope) {
            return self.cache.get(scope);
        }

        match resolver.lookup(scope) {
            Some(style) => {
                let handle = DecorationHandle {
                    id: self.next_id,
                    options: RenderOptions::from_style(style),
                };
                self.next_id += 1;
                self.cache.insert(scope.to_string(), handle);
                self.cache.get(scope)
            }
            None => {
                if self.warned.insert(scope.to_string()) {
                    tracing::warn!("Scope {:?} was not found in the current theme", scope);
                }
                None
            }
        }
    }

    /// Drop every cached handle, releasing the host's rendering
    /// resources. Must run before the first coloring pass after a
    /// theme or configuration change so stale handles are never
    /// reused across themes. The warned-scope set is kept.
    pub fn reload(&mut self) {
        if !self.cache.is_empty() {
            tracing::debug!("Disposing {} decoration handles", self.cache.len());
        }
        self.cache.clear();
    }

    /// Render one colorize response onto `editor`.
    ///
    /// Scopes in the response with no resolvable handle are skipped.
    /// Cached scopes absent from the response are cleared with an
    /// empty range set. Iteration order across scopes is irrelevant:
    /// no overlap priority exists between different scopes' ranges.
    pub fn apply(
        &mut self,
        editor: &mut dyn TextEditor,
        response: &ColorizeResponse,
        resolver: &ScopeResolver,
    ) {
        for (scope, ranges) in &response.scopes {
            if let Some(handle) = self.decoration_for(scope, resolver) {
                editor.set_decorations(handle, ranges);
            }
        }

        for (scope, handle) in &self.cache {
            if !response.scopes.contains_key(scope) {
                editor.set_decorations(handle, &[]);
            }
        }
    }

    pub fn handle_count(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
