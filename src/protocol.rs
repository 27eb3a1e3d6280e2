//! Wire types for the colorize notification protocol
//!
//! The client and the analysis backend exchange fire-and-forget JSON
//! notifications over an asynchronous channel. Three methods exist:
//!
//! ```text
//! colorize.request    client → backend   {documentUri, visibleRange, revision}
//! colorize.response   backend → client   {uri, revision, scopes}
//! document.activated  client → backend   {documentUri}
//! ```
//!
//! Requests carry a monotonic per-document `revision` that responses
//! echo back, so the coordinator can discard a response that was
//! overtaken by a newer request for the same document.

use std::collections::HashMap;
use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

/// Zero-based text position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub row: u32,
    pub column: u32,
}

impl Point {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

/// A span of text, end-exclusive. `end` must not precede `start`
/// in (row, column) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub start: Point,
    pub end: Point,
}

impl ColorRange {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Whether `end >= start` lexicographically
    pub fn is_well_formed(&self) -> bool {
        self.end >= self.start
    }
}

/// The line-index span of a document currently intended to be styled.
///
/// The backend treats this as a hint, not a clipping bound; the client
/// currently always requests the entire document (see
/// [`crate::editors::visible_lines`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start: u32,
    pub end: u32,
}

/// Scope name → ranges covered by that scope, for one document
pub type ColorScopes = HashMap<String, Vec<ColorRange>>;

/// `colorize.request` payload, client → backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorizeRequest {
    pub document_uri: String,
    pub visible_range: VisibleRange,
    pub revision: u64,
}

/// `colorize.response` payload, backend → client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorizeResponse {
    pub uri: String,
    pub revision: u64,
    pub scopes: ColorScopes,
}

/// `document.activated` payload, client → backend
///
/// Sent whenever the active editor changes; the backend may use it to
/// prioritize work on the focused document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentActivated {
    pub document_uri: String,
}

/// A protocol notification, serialized as `{"method": ..., "params": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum Notification {
    #[serde(rename = "colorize.request")]
    ColorizeRequest(ColorizeRequest),
    #[serde(rename = "colorize.response")]
    ColorizeResponse(ColorizeResponse),
    #[serde(rename = "document.activated")]
    DocumentActivated(DocumentActivated),
}

impl Notification {
    /// Encode to the JSON wire form
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from the JSON wire form
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Outbound half of the channel to the analysis backend.
///
/// Sends are fire-and-forget: no response handle is returned and a
/// failed send is logged, never propagated.
pub trait BackendTransport {
    fn send(&self, notification: Notification);
}

/// Transport over an in-process mpsc channel, used when the backend
/// runs on a worker thread and by the test harness.
pub struct MpscTransport {
    tx: Sender<Notification>,
}

impl MpscTransport {
    pub fn new(tx: Sender<Notification>) -> Self {
        Self { tx }
    }
}

impl BackendTransport for MpscTransport {
    fn send(&self, notification: Notification) {
        if let Err(e) = self.tx.send(notification) {
            tracing::warn!("Backend channel closed, dropping notification: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = Notification::ColorizeRequest(ColorizeRequest {
            document_uri: "file:///main.leo".to_string(),
            visible_range: VisibleRange { start: 0, end: 42 },
            revision: 3,
        });

        let json: serde_json::Value =
            serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(json["method"], "colorize.request");
        assert_eq!(json["params"]["documentUri"], "file:///main.leo");
        assert_eq!(json["params"]["visibleRange"]["end"], 42);
        assert_eq!(json["params"]["revision"], 3);
    }

    #[test]
    fn test_response_decodes_from_backend_json() {
        let wire = r#"{
            "method": "colorize.response",
            "params": {
                "uri": "file:///main.leo",
                "revision": 7,
                "scopes": {
                    "keyword.control": [
                        {"start": {"row": 0, "column": 0}, "end": {"row": 0, "column": 3}}
                    ]
                }
            }
        }"#;

        let decoded = Notification::from_json(wire).unwrap();
        match decoded {
            Notification::ColorizeResponse(response) => {
                assert_eq!(response.uri, "file:///main.leo");
                assert_eq!(response.revision, 7);
                let ranges = &response.scopes["keyword.control"];
                assert_eq!(ranges.len(), 1);
                assert_eq!(ranges[0].end.column, 3);
            }
            other => panic!("Expected colorize.response, got {:?}", other),
        }
    }

    #[test]
    fn test_range_well_formedness_is_lexicographic() {
        let forward = ColorRange::new(Point::new(1, 8), Point::new(2, 0));
        assert!(forward.is_well_formed());

        // Same row, end column before start column
        let backward = ColorRange::new(Point::new(3, 5), Point::new(3, 2));
        assert!(!backward.is_well_formed());

        // Empty range is allowed
        let empty = ColorRange::new(Point::new(4, 1), Point::new(4, 1));
        assert!(empty.is_well_formed());
    }

    #[test]
    fn test_mpsc_transport_delivers() {
        let (tx, rx) = std::sync::mpsc::channel();
        let transport = MpscTransport::new(tx);

        transport.send(Notification::DocumentActivated(DocumentActivated {
            document_uri: "file:///a.leo".to_string(),
        }));

        match rx.try_recv().unwrap() {
            Notification::DocumentActivated(activated) => {
                assert_eq!(activated.document_uri, "file:///a.leo");
            }
            other => panic!("Unexpected notification: {:?}", other),
        }
    }
}
