//! Horizon Lookup Scripted Session
//!
//! Drives a lookup controller through a short typing session against an
//! in-memory text buffer and prints what a host would render:
//! - Suggestion rows as they narrow
//! - Keyboard navigation and commit
//! - Record refresh reporting
//!
//! Pass a config file (`.toml` or `.json`) to override the defaults.
//!
//! Run with: cargo run -p horizon-lookup --example scripted_session [config]

use std::error::Error;

use horizon_lookup::prelude::*;
use serde_json::json;

fn sample_records() -> serde_json::Value {
    json!([
        {"Classtype": "Laser", "sailnos": "1234", "sailor": "Ann Smith"},
        {"Classtype": "Optimist", "sailnos": 512, "sailor": "Bob Jones"},
        {"Classtype": "49er", "sailnos": "1299", "sailor": "Cat Lee"},
        {"Classtype": "Finn", "sailnos": "7", "sailor": "Dan Moss"},
    ])
}

/// Print the surface the way a popup would show it.
fn print_surface(surface: &HeadlessSurface) {
    let snapshot = surface.snapshot();
    if !snapshot.visible {
        println!("    (hidden)");
        return;
    }
    if let Some(message) = &snapshot.message {
        println!("    [{message}]");
    }
    for (index, row) in snapshot.rows.iter().enumerate() {
        let marker = if snapshot.highlighted == Some(index) { '>' } else { ' ' };
        println!("  {marker} {}", row.text);
    }
}

fn type_text(controller: &mut LookupController, input: &mut TextBuffer, text: &str) {
    for c in text.chars() {
        let key = Key::Other(u32::from(c));
        controller.handle_event(input, LookupEvent::KeyDown(key));
        input.insert_str(c.encode_utf8(&mut [0; 4]));
        controller.handle_event(input, LookupEvent::KeyUp(key));
    }
}

fn press(controller: &mut LookupController, input: &mut TextBuffer, key: Key) {
    let response = controller.handle_event(input, LookupEvent::KeyDown(key));
    if !response.prevent_default {
        // The host's own default action for the keys this session uses
        match key {
            Key::Backspace => input.backspace(),
            Key::ArrowLeft => input.cursor_left(),
            Key::ArrowRight => input.cursor_right(),
            _ => {}
        }
    }
    controller.handle_event(input, LookupEvent::KeyUp(key));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horizon_lookup=debug".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => LookupOptions::from_file(path)?.into_config()?,
        None => LookupConfig::default().with_no_matches_text("No sailors found"),
    };

    let surface = HeadlessSurface::new();
    let mut controller = LookupController::new(config, surface.clone(), StaticSource::new(sample_records()));
    controller.records_loaded.connect(|result: &RefreshResult| {
        println!("refresh #{} from {}: {:?}", result.sequence, result.url, result.status);
    });
    controller.activated.connect(|commit: &Commit| {
        println!("committed \"{}\"", commit.replacement);
    });

    controller.refresh("static://sample", |_| {}).fetched().await;
    controller.process_pending();

    let mut input = TextBuffer::new().with_text("Helm: ");
    controller.attach(&input);

    println!("typing \"12\"");
    type_text(&mut controller, &mut input, "12");
    print_surface(&surface);

    println!("arrow down");
    press(&mut controller, &mut input, Key::ArrowDown);
    print_surface(&surface);

    println!("enter");
    press(&mut controller, &mut input, Key::Enter);
    println!("text: {:?}", input.text());

    println!("typing \", 99\"");
    type_text(&mut controller, &mut input, ", 99");
    print_surface(&surface);

    println!("backspace twice, then \"7\"");
    press(&mut controller, &mut input, Key::Backspace);
    press(&mut controller, &mut input, Key::Backspace);
    type_text(&mut controller, &mut input, "7");
    print_surface(&surface);

    println!("tab");
    press(&mut controller, &mut input, Key::Tab);
    println!("text: {:?}", input.text());

    Ok(())
}
