//! The presentation surface that displays suggestions.
//!
//! The engine never draws anything itself. It hands rendered rows to a
//! [`PresentationSurface`] implemented by the host (a popup list, a terminal
//! menu, ...). Activating a row is reported back as
//! [`LookupEvent::PointerDown`](crate::events::LookupEvent::PointerDown).

use std::ops::Range;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::control::ControlId;
use crate::suggestion::Suggestion;

/// A styled range inside a row: the text that came from one return field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpan {
    /// Name of the return field.
    pub field: String,
    /// Byte range in [`SuggestionRow::text`].
    pub range: Range<usize>,
}

/// One rendered suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRow {
    /// The formatted row text.
    pub text: String,
    /// Where each field's value appears in `text`.
    pub spans: Vec<FieldSpan>,
}

impl SuggestionRow {
    /// Render `suggestion` with `template`.
    pub fn render(suggestion: &Suggestion, template: &str) -> Self {
        let formatted = suggestion.render(template);
        let names: Vec<&str> = suggestion.field_names().collect();
        let spans = formatted
            .spans
            .into_iter()
            .filter_map(|span| {
                names.get(span.index).map(|name| FieldSpan {
                    field: (*name).to_string(),
                    range: span.range,
                })
            })
            .collect();

        Self {
            text: formatted.text,
            spans,
        }
    }

    /// The text of the span for `field`, if the template used it.
    pub fn field_text(&self, field: &str) -> Option<&str> {
        self.spans
            .iter()
            .find(|span| span.field == field)
            .map(|span| &self.text[span.range.clone()])
    }
}

/// Displays the suggestion list next to a control.
pub trait PresentationSurface {
    /// Show `rows` anchored to `anchor`, replacing anything shown before.
    fn show(&mut self, anchor: ControlId, rows: &[SuggestionRow]);

    /// Show a plain message (no selectable rows) anchored to `anchor`.
    fn show_message(&mut self, anchor: ControlId, text: &str);

    /// Hide the surface.
    fn hide(&mut self);

    /// Highlight the row at `index`.
    fn highlight(&mut self, index: usize);

    /// Whether anything is currently shown.
    fn is_visible(&self) -> bool;
}

/// What a [`HeadlessSurface`] is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    /// The control the surface is anchored to.
    pub anchor: Option<ControlId>,
    /// Rows shown.
    pub rows: Vec<SuggestionRow>,
    /// Message shown instead of rows.
    pub message: Option<String>,
    /// Highlighted row.
    pub highlighted: Option<usize>,
    /// Whether the surface is visible.
    pub visible: bool,
}

/// An in-memory surface for headless hosts and tests.
///
/// Clones share state, so a host can keep a handle after giving the surface
/// to a controller.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    state: Arc<Mutex<SurfaceSnapshot>>,
}

impl HeadlessSurface {
    /// Create a hidden surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.state.lock().clone()
    }

    /// The texts of the shown rows.
    pub fn row_texts(&self) -> Vec<String> {
        self.state.lock().rows.iter().map(|row| row.text.clone()).collect()
    }

    /// The highlighted row index.
    pub fn highlighted(&self) -> Option<usize> {
        self.state.lock().highlighted
    }

    /// The message shown, if any.
    pub fn message(&self) -> Option<String> {
        self.state.lock().message.clone()
    }
}

impl PresentationSurface for HeadlessSurface {
    fn show(&mut self, anchor: ControlId, rows: &[SuggestionRow]) {
        let mut state = self.state.lock();
        state.anchor = Some(anchor);
        state.rows = rows.to_vec();
        state.message = None;
        state.highlighted = None;
        state.visible = true;
    }

    fn show_message(&mut self, anchor: ControlId, text: &str) {
        let mut state = self.state.lock();
        state.anchor = Some(anchor);
        state.rows.clear();
        state.message = Some(text.to_string());
        state.highlighted = None;
        state.visible = true;
    }

    fn hide(&mut self) {
        *self.state.lock() = SurfaceSnapshot::default();
    }

    fn highlight(&mut self, index: usize) {
        let mut state = self.state.lock();
        if index < state.rows.len() {
            state.highlighted = Some(index);
        }
    }

    fn is_visible(&self) -> bool {
        self.state.lock().visible
    }
}
