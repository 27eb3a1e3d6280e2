//! Host editor seams
//!
//! The host application renders decorations and knows which editors
//! are on screen; this subsystem only needs the two traits below.
//! Tests inject recording fakes, the embedding host adapts its real
//! editor objects.

use std::path::Path;

use crate::decorations::DecorationHandle;
use crate::protocol::{ColorRange, VisibleRange};

/// One visible text editor, addressed by the URI of its document
pub trait TextEditor {
    fn document_uri(&self) -> &str;

    /// Number of lines in the document
    fn line_count(&self) -> u32;

    /// Render `ranges` with the given decoration. An empty slice
    /// clears whatever this decoration previously covered.
    fn set_decorations(&mut self, handle: &DecorationHandle, ranges: &[ColorRange]);
}

/// The host's collection of currently visible editors
pub trait EditorRegistry {
    fn visible_editors(&mut self) -> Vec<&mut dyn TextEditor>;

    /// The visible editor showing `uri`, if any
    fn editor_for_uri(&mut self, uri: &str) -> Option<&mut dyn TextEditor> {
        self.visible_editors()
            .into_iter()
            .find(|editor| editor.document_uri() == uri)
    }
}

/// The line span requested for coloring.
///
/// Always the entire document plus one line; the backend treats it as
/// a hint, not a clipping bound, and no viewport narrowing occurs.
pub fn visible_lines(editor: &dyn TextEditor) -> VisibleRange {
    VisibleRange {
        start: 0,
        end: editor.line_count() + 1,
    }
}

/// Whether a document is eligible for colorization: a `file` URI whose
/// path carries one of the configured extensions.
pub fn is_supported_document(uri: &str, extensions: &[String]) -> bool {
    let Some(path) = uri.strip_prefix("file://") else {
        return false;
    };
    extensions
        .iter()
        .any(|ext| Path::new(path).extension().and_then(|e| e.to_str()) == Some(ext.as_str()))
}
