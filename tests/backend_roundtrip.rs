mod common;

use std::sync::mpsc::channel;
use std::thread;

use common::{install_theme, range, settings_for, FakeEditor, FakeRegistry};
use scopelight::protocol::{ColorScopes, MpscTransport};
use scopelight::theme::Color;
use scopelight::{ColorizationCoordinator, ColorizeResponse, Notification};
use tempfile::tempdir;

/// Drive the full notification loop against a scripted backend: the
/// backend thread decodes each request from its JSON wire form and
/// answers with a fixed scope map, echoing the request's revision.
#[test]
fn test_request_response_loop_with_scripted_backend() {
    let dir = tempdir().unwrap();
    install_theme(
        dir.path(),
        "publisher.roundtrip",
        "Roundtrip",
        r##"{"tokenColors": [{"scope": "keyword", "settings": {"foreground": "#ff0000"}}]}"##,
    );
    let settings = settings_for(dir.path(), "Roundtrip", &["leo"]);

    let (request_tx, request_rx) = channel::<Notification>();
    let (response_tx, response_rx) = channel::<ColorizeResponse>();

    let backend = thread::spawn(move || {
        while let Ok(notification) = request_rx.recv() {
            // Exercise the wire encoding both ways, as a real channel would
            let wire = notification.to_json().unwrap();
            match Notification::from_json(&wire).unwrap() {
                Notification::ColorizeRequest(request) => {
                    let mut scopes = ColorScopes::new();
                    scopes.insert("keyword".to_string(), vec![range(0, 0, 3)]);
                    response_tx
                        .send(ColorizeResponse {
                            uri: request.document_uri,
                            revision: request.revision,
                            scopes,
                        })
                        .unwrap();
                }
                Notification::DocumentActivated(_) => {}
                Notification::ColorizeResponse(_) => {
                    panic!("Backend received a response notification")
                }
            }
        }
    });

    let mut coordinator =
        ColorizationCoordinator::new(settings, Box::new(MpscTransport::new(request_tx)));
    let mut registry =
        FakeRegistry::with_editors(vec![FakeEditor::new("file:///main.leo", 12)]);

    coordinator.activate(&mut registry);

    // The focus hint must not confuse the backend
    coordinator.on_active_editor_changed(&registry.editors[0]);

    let response = response_rx.recv().expect("Backend should answer");
    assert_eq!(response.revision, 1);
    coordinator.on_colorize_response(response, &mut registry);

    let editor = registry.editor("file:///main.leo");
    assert_eq!(
        editor.ranges_with_foreground(Color::rgb(0xFF, 0, 0)),
        vec![range(0, 0, 3)]
    );

    drop(coordinator);
    backend.join().unwrap();
}
