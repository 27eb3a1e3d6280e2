//! Colorization orchestration
//!
//! [`ColorizationCoordinator`] reacts to environment changes (editor
//! visibility, active-editor focus, configuration edits), issues
//! colorize requests to the analysis backend, and applies responses
//! through the decoration cache.
//!
//! Requests and responses are uncorrelated fire-and-forget
//! notifications, so two rapid requests for one document can complete
//! out of order. The coordinator closes that race with a monotonic
//! per-document revision: each request bumps it, responses echo it,
//! and a response older than the newest applied revision for its
//! document is dropped instead of overwriting fresher decorations.

use std::collections::HashMap;

use crate::decorations::DecorationCache;
use crate::editors::{is_supported_document, visible_lines, EditorRegistry, TextEditor};
use crate::protocol::{
    BackendTransport, ColorizeRequest, ColorizeResponse, DocumentActivated, Notification,
};
use crate::scopes::ScopeResolver;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordinatorState {
    Uninitialized,
    /// Theme loaded and backend connected; stays here for the
    /// process lifetime.
    Ready,
}

#[derive(Debug, Default, Clone, Copy)]
struct DocumentRevisions {
    /// Revision carried by the most recent request
    requested: u64,
    /// Revision of the most recently applied response
    applied: u64,
}

/// Drives the request/response protocol and reacts to change events
pub struct ColorizationCoordinator {
    resolver: ScopeResolver,
    decorations: DecorationCache,
    settings: Settings,
    transport: Box<dyn BackendTransport>,
    revisions: HashMap<String, DocumentRevisions>,
    state: CoordinatorState,
}

impl ColorizationCoordinator {
    pub fn new(settings: Settings, transport: Box<dyn BackendTransport>) -> Self {
        Self {
            resolver: ScopeResolver::new(),
            decorations: DecorationCache::new(),
            settings,
            transport,
            revisions: HashMap::new(),
            state: CoordinatorState::Uninitialized,
        }
    }

    /// Initial theme load, then a colorize request for every visible
    /// editor. Transitions `Uninitialized → Ready`.
    pub fn activate(&mut self, registry: &mut dyn EditorRegistry) {
        self.resolver.load(&self.settings);
        self.state = CoordinatorState::Ready;
        tracing::info!("Colorization ready ({} scope styles)", self.resolver.len());
        self.colorize_visible_editors(registry);
    }

    pub fn is_ready(&self) -> bool {
        self.state == CoordinatorState::Ready
    }

    /// Apply a new settings snapshot.
    ///
    /// If the theme name or token-color customizations changed, run
    /// the full invalidation path: rebuild the scope table, drop all
    /// decoration handles, then re-request every visible editor.
    /// Styles are recomputed; scope ranges are not, since they don't
    /// depend on the theme.
    pub fn on_configuration_changed(
        &mut self,
        newer: Settings,
        registry: &mut dyn EditorRegistry,
    ) {
        let change = self.settings.diff(&newer);
        self.settings = newer;

        if !change.affects_colorization() {
            tracing::debug!("Configuration change does not affect colorization");
            return;
        }

        // Reload must complete before any apply runs, so stale
        // handles are never reused across themes.
        self.resolver.load(&self.settings);
        self.decorations.reload();
        self.colorize_visible_editors(registry);
    }

    /// Tell the backend which document has focus. A prioritization
    /// hint only; the backend works without it.
    pub fn on_active_editor_changed(&mut self, editor: &dyn TextEditor) {
        self.transport
            .send(Notification::DocumentActivated(DocumentActivated {
                document_uri: editor.document_uri().to_string(),
            }));
    }

    /// Fire a colorize request for one editor, if its document kind
    /// is supported. No response handle is returned; the reply
    /// arrives later through [`on_colorize_response`].
    ///
    /// [`on_colorize_response`]: Self::on_colorize_response
    pub fn request_colorization(&mut self, editor: &dyn TextEditor) {
        let uri = editor.document_uri();
        if !is_supported_document(uri, &self.settings.file_extensions) {
            return;
        }

        let revisions = self.revisions.entry(uri.to_string()).or_default();
        revisions.requested += 1;

        let request = ColorizeRequest {
            document_uri: uri.to_string(),
            visible_range: visible_lines(editor),
            revision: revisions.requested,
        };
        tracing::debug!(
            "Requesting colorization for {} (revision {})",
            request.document_uri,
            request.revision
        );
        self.transport.send(Notification::ColorizeRequest(request));
    }

    /// Apply a backend response to whichever visible editor shows its
    /// document.
    ///
    /// A response for a document with no visible editor is dropped
    /// silently: the document may have been closed or scrolled away
    /// between request and response. A response whose revision is
    /// older than the newest applied one for its document is dropped
    /// as stale.
    pub fn on_colorize_response(
        &mut self,
        response: ColorizeResponse,
        registry: &mut dyn EditorRegistry,
    ) {
        let revisions = self.revisions.entry(response.uri.clone()).or_default();
        if response.revision < revisions.applied {
            tracing::debug!(
                "Dropping stale colorize response for {} (revision {} < {})",
                response.uri,
                response.revision,
                revisions.applied
            );
            return;
        }

        let Some(editor) = registry.editor_for_uri(&response.uri) else {
            tracing::debug!("No visible editor for {}, dropping response", response.uri);
            return;
        };

        revisions.applied = response.revision;
        self.decorations.apply(editor, &response, &self.resolver);
    }

    /// Issue a colorize request for every currently visible editor
    pub fn colorize_visible_editors(&mut self, registry: &mut dyn EditorRegistry) {
        for editor in registry.visible_editors() {
            self.request_colorization(editor);
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resolver(&self) -> &ScopeResolver {
        &self.resolver
    }
}
