//! scopelight - theme-aware semantic syntax coloring client
//!
//! The editor-side coloring subsystem of a language-tooling
//! integration: resolves the active color theme into a scope → style
//! table, materializes reusable decoration handles, and drives a
//! fire-and-forget colorize notification protocol with a
//! language-analysis backend that supplies semantic scope ranges.

pub mod config_paths;
pub mod coordinator;
pub mod decorations;
pub mod editors;
pub mod manifest;
pub mod protocol;
pub mod scopes;
pub mod settings;
pub mod settings_watcher;
pub mod theme;
pub mod tracing;

// Re-export commonly used types
pub use coordinator::ColorizationCoordinator;
pub use decorations::{DecorationCache, DecorationHandle, RenderOptions};
pub use editors::{EditorRegistry, TextEditor};
pub use protocol::{
    BackendTransport, ColorRange, ColorizeRequest, ColorizeResponse, Notification, Point,
    VisibleRange,
};
pub use scopes::ScopeResolver;
pub use settings::{ConfigChange, Settings};
pub use theme::{Color, FontStyle, ScopeStyle};
