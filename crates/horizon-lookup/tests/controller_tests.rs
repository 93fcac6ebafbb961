//! End-to-end tests driving a controller the way a host would.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use horizon_lookup::net::NetworkError;
use horizon_lookup::prelude::*;
use parking_lot::Mutex;
use serde_json::json;

fn sailors() -> serde_json::Value {
    json!([
        {"Classtype": "Laser", "sailnos": "1234", "sailor": "Ann Smith"},
        {"Classtype": "Optimist", "sailnos": 512, "sailor": "Bob Jones"},
        {"Classtype": "49er", "sailnos": "1299"},
    ])
}

/// Type `text` one character at a time, sending key-down/key-up for each.
fn type_chars(controller: &mut LookupController, input: &mut TextBuffer, text: &str) {
    for c in text.chars() {
        let key = Key::Other(u32::from(c));
        controller.handle_event(input, LookupEvent::KeyDown(key));
        input.insert_str(c.encode_utf8(&mut [0; 4]));
        controller.handle_event(input, LookupEvent::KeyUp(key));
    }
}

fn press(controller: &mut LookupController, input: &mut TextBuffer, key: Key) -> EventResponse {
    let response = controller.handle_event(input, LookupEvent::KeyDown(key));
    controller.handle_event(input, LookupEvent::KeyUp(key));
    response
}

async fn loaded_controller(surface: HeadlessSurface) -> LookupController {
    let mut controller =
        LookupController::new(LookupConfig::default(), surface, StaticSource::new(sailors()));
    controller.refresh("static://sailors", |_| {}).fetched().await;
    assert_eq!(controller.process_pending(), 1);
    controller
}

#[tokio::test]
async fn test_single_record_enter_replaces_token() {
    let surface = HeadlessSurface::new();
    let mut controller = LookupController::new(
        LookupConfig::default(),
        surface.clone(),
        StaticSource::new(json!([{"Classtype": "Laser", "sailnos": "1234", "sailor": "Ann"}])),
    );
    controller.refresh("static://one", |_| {}).fetched().await;
    controller.process_pending();

    let mut input = TextBuffer::new();
    controller.attach(&input);

    type_chars(&mut controller, &mut input, "Boat 123");
    assert_eq!(surface.row_texts(), vec!["Laser 1234 (Ann)"]);

    let response = press(&mut controller, &mut input, Key::Enter);
    assert!(response.prevent_default);
    assert!(response.stop_propagation);
    assert_eq!(input.text(), "Boat Laser 1234 (Ann)");
    assert!(!surface.is_visible());
    assert!(!controller.is_visible());
}

#[tokio::test]
async fn test_typing_narrows_suggestions() {
    let surface = HeadlessSurface::new();
    let mut controller = loaded_controller(surface.clone()).await;
    let mut input = TextBuffer::new();
    controller.attach(&input);

    type_chars(&mut controller, &mut input, "1");
    assert_eq!(surface.row_texts().len(), 3);

    type_chars(&mut controller, &mut input, "29");
    assert_eq!(surface.row_texts(), vec!["49er 1299 ()"]);

    type_chars(&mut controller, &mut input, "x");
    // "129x" still contains digits, so it qualifies but matches nothing
    assert!(!surface.is_visible());
}

#[tokio::test]
async fn test_keyboard_round_trip_with_signals() {
    let surface = HeadlessSurface::new();
    let mut controller = loaded_controller(surface.clone()).await;
    let mut input = TextBuffer::new().with_text("Crew: ");
    controller.attach(&input);

    let committed = Arc::new(Mutex::new(None));
    let committed_clone = committed.clone();
    controller.activated.connect(move |commit: &Commit| {
        *committed_clone.lock() = Some(commit.replacement.clone());
    });

    type_chars(&mut controller, &mut input, "12");
    assert_eq!(surface.row_texts().len(), 3);

    // Down, down, up: second row
    press(&mut controller, &mut input, Key::ArrowDown);
    press(&mut controller, &mut input, Key::ArrowDown);
    press(&mut controller, &mut input, Key::ArrowUp);
    assert_eq!(surface.highlighted(), Some(1));

    press(&mut controller, &mut input, Key::ArrowRight);
    assert_eq!(input.text(), "Crew: Optimist 512 (Bob Jones)");
    assert_eq!(input.caret_offset(), input.text().len());
    assert_eq!(committed.lock().as_deref(), Some("Optimist 512 (Bob Jones)"));
}

#[tokio::test]
async fn test_commit_in_middle_of_text_uses_recorded_caret() {
    let surface = HeadlessSurface::new();
    let mut controller = loaded_controller(surface.clone()).await;
    let mut input = TextBuffer::new().with_text("before 51 after");
    controller.attach(&input);

    // Caret between the two digits; the whole word is looked up
    input.set_caret_offset(8);
    controller.handle_event(&mut input, LookupEvent::Click);
    assert_eq!(surface.row_texts(), vec!["Optimist 512 (Bob Jones)"]);

    press(&mut controller, &mut input, Key::Tab);
    assert_eq!(input.text(), "before Optimist 512 (Bob Jones) after");
    assert_eq!(input.caret_offset(), "before Optimist 512 (Bob Jones)".len());
}

#[tokio::test]
async fn test_no_matches_text_is_shown() {
    let surface = HeadlessSurface::new();
    let config = LookupConfig::default().with_no_matches_text("No sailors found");
    let mut controller = LookupController::new(config, surface.clone(), StaticSource::new(sailors()));
    controller.refresh("static://sailors", |_| {}).fetched().await;
    controller.process_pending();

    let mut input = TextBuffer::new();
    controller.attach(&input);
    type_chars(&mut controller, &mut input, "777");

    assert_eq!(surface.message().as_deref(), Some("No sailors found"));
    assert!(!controller.is_visible());

    // Enter is not a commit while only the message is shown
    let response = press(&mut controller, &mut input, Key::Enter);
    assert_eq!(response, EventResponse::PROPAGATE);
    assert_eq!(input.text(), "777");
}

/// Answers per URL; unknown URLs fail with a 404.
struct RoutedSource {
    routes: HashMap<String, serde_json::Value>,
}

impl DataSource for RoutedSource {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<serde_json::Value, NetworkError>> {
        let payload = self.routes.get(url).cloned().ok_or(NetworkError::HttpStatus {
            status: 404,
            message: Some(format!("no route for {url}")),
        });
        Box::pin(async move { payload })
    }
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_records() {
    let surface = HeadlessSurface::new();
    let source = RoutedSource {
        routes: HashMap::from([
            ("https://club.example/sailors".to_string(), json!({"results": sailors()})),
            ("https://club.example/flat".to_string(), sailors()),
        ]),
    };
    let mut controller = LookupController::new(
        LookupConfig::default()
            .with_data_property("results")
            .with_lookup_url("https://club.example/sailors"),
        surface.clone(),
        source,
    );
    // The configured URL was loaded on construction
    assert!(controller.records().is_empty());
    wait_for_pending(&mut controller).await;
    assert_eq!(controller.records().len(), 3);

    let errors = Arc::new(Mutex::new(Vec::new()));
    for url in ["https://club.example/missing", "https://club.example/flat"] {
        let errors_clone = errors.clone();
        let handle = controller.refresh(url, move |result: &RefreshResult| {
            errors_clone.lock().push(result.error().map(ToString::to_string));
        });
        handle.fetched().await;
        controller.process_pending();
    }

    let errors = errors.lock();
    assert!(errors[0].as_deref().is_some_and(|e| e.contains("404")));
    // The flat array has no "results" property
    assert!(errors[1].as_deref().is_some_and(|e| e.contains("results")));
    assert_eq!(controller.records().len(), 3);
}

async fn wait_for_pending(controller: &mut LookupController) {
    for _ in 0..100 {
        if controller.process_pending() > 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("no refresh completed");
}

#[tokio::test]
async fn test_pointer_selection() {
    let surface = HeadlessSurface::new();
    let mut controller = loaded_controller(surface.clone()).await;
    let mut input = TextBuffer::new();
    controller.attach(&input);

    type_chars(&mut controller, &mut input, "12");
    let anchor = surface.snapshot().anchor.expect("surface is anchored");
    assert_eq!(anchor, input.id());

    input.clear_focus();
    let response = controller.handle_event(&mut input, LookupEvent::PointerDown { index: 2 });
    assert_eq!(response, EventResponse::CONSUMED);
    assert_eq!(input.text(), "49er 1299 ()");
    assert!(input.has_focus());

    // The blur that follows the pointer-down changes nothing
    controller.handle_event(&mut input, LookupEvent::Blur);
    assert_eq!(input.text(), "49er 1299 ()");
}

#[tokio::test]
async fn test_two_controls_share_one_controller() {
    let surface = HeadlessSurface::new();
    let mut controller = loaded_controller(surface.clone()).await;
    let mut helm = TextBuffer::new();
    let mut crew = TextBuffer::new();
    controller.attach(&helm);
    controller.attach(&crew);

    type_chars(&mut controller, &mut helm, "1234");
    assert_eq!(surface.snapshot().anchor, Some(helm.id()));
    controller.handle_event(&mut helm, LookupEvent::Blur);

    type_chars(&mut controller, &mut crew, "512");
    assert_eq!(surface.snapshot().anchor, Some(crew.id()));
    press(&mut controller, &mut crew, Key::Enter);

    assert_eq!(helm.text(), "1234");
    assert_eq!(crew.text(), "Optimist 512 (Bob Jones)");
}

#[tokio::test]
async fn test_refresh_replaces_records_wholesale() {
    let surface = HeadlessSurface::new();
    let mut controller = loaded_controller(surface.clone()).await;
    assert_eq!(controller.records().len(), 3);

    let results = Arc::new(Mutex::new(Vec::new()));
    let results_clone = results.clone();
    controller.records_loaded.connect(move |result: &RefreshResult| {
        results_clone.lock().push(result.is_loaded());
    });

    let first = controller.refresh("static://a", |_| {});
    let second = controller.refresh("static://b", |_| {});
    assert!(second.sequence() > first.sequence());
    first.fetched().await;
    second.fetched().await;
    assert_eq!(controller.process_pending(), 2);

    assert_eq!(controller.records().len(), 3);
    let results = results.lock();
    assert_eq!(results.len(), 2);
    assert!(results.iter().any(|loaded| *loaded));
}
