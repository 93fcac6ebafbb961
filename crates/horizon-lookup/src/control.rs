//! The host text control seen by the lookup engine.

use std::sync::atomic::{AtomicU64, Ordering};

use unicode_segmentation::UnicodeSegmentation;

use crate::text::clamp_offset;

/// Identifies a host text control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u64);

static NEXT_CONTROL_ID: AtomicU64 = AtomicU64::new(1);

impl ControlId {
    /// Wrap a host-assigned identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocate a fresh, process-unique identifier.
    ///
    /// Allocated ids start high so they do not collide with small
    /// host-assigned ones.
    pub fn next() -> Self {
        Self((1 << 32) + NEXT_CONTROL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value of this ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A single-line text input the lookup engine reads from and writes to.
///
/// Offsets are UTF-8 byte offsets into [`text`](Self::text).
pub trait TextControl {
    /// The control's identity.
    fn id(&self) -> ControlId;

    /// The current text.
    fn text(&self) -> &str;

    /// The caret position.
    fn caret_offset(&self) -> usize;

    /// Replace the whole text.
    fn set_text(&mut self, text: String);

    /// Move the caret.
    fn set_caret_offset(&mut self, offset: usize);

    /// Give the control keyboard focus.
    fn set_focus(&mut self) {}
}

/// An in-memory [`TextControl`].
///
/// Useful for headless hosts and tests; editing helpers move by grapheme
/// cluster like a real line edit does.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    id: ControlId,
    text: String,
    cursor_pos: usize,
    focused: bool,
}

impl TextBuffer {
    /// Create an empty buffer with a fresh id.
    pub fn new() -> Self {
        Self::with_id(ControlId::next())
    }

    /// Create an empty buffer with the given id.
    pub fn with_id(id: ControlId) -> Self {
        Self {
            id,
            text: String::new(),
            cursor_pos: 0,
            focused: false,
        }
    }

    /// Set the initial text, with the caret at the end.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self.cursor_pos = self.text.len();
        self
    }

    /// Whether the buffer has been focused.
    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Drop focus.
    pub fn clear_focus(&mut self) {
        self.focused = false;
    }

    /// Insert text at the caret and move the caret past it.
    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor_pos, s);
        self.cursor_pos += s.len();
    }

    /// Delete the grapheme before the caret.
    pub fn backspace(&mut self) {
        if self.cursor_pos == 0 {
            return;
        }
        let start = self.prev_grapheme_boundary(self.cursor_pos);
        self.text.replace_range(start..self.cursor_pos, "");
        self.cursor_pos = start;
    }

    /// Move the caret one grapheme to the left.
    pub fn cursor_left(&mut self) {
        self.cursor_pos = self.prev_grapheme_boundary(self.cursor_pos);
    }

    /// Move the caret one grapheme to the right.
    pub fn cursor_right(&mut self) {
        self.cursor_pos = self.next_grapheme_boundary(self.cursor_pos);
    }

    /// Move the caret to the end of the text.
    pub fn cursor_to_end(&mut self) {
        self.cursor_pos = self.text.len();
    }

    fn prev_grapheme_boundary(&self, pos: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .map(|(offset, _)| offset)
            .take_while(|&offset| offset < pos)
            .last()
            .unwrap_or(0)
    }

    fn next_grapheme_boundary(&self, pos: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .map(|(offset, grapheme)| offset + grapheme.len())
            .find(|&end| end > pos)
            .unwrap_or(self.text.len())
    }

    /// Snap a position to the grapheme boundary at or before it.
    fn snap_to_grapheme_boundary(&self, pos: usize) -> usize {
        let pos = clamp_offset(&self.text, pos);
        if pos == self.text.len() {
            return pos;
        }
        self.text
            .grapheme_indices(true)
            .map(|(offset, _)| offset)
            .take_while(|&offset| offset <= pos)
            .last()
            .unwrap_or(0)
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextControl for TextBuffer {
    fn id(&self) -> ControlId {
        self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn caret_offset(&self) -> usize {
        self.cursor_pos
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.cursor_pos = self.snap_to_grapheme_boundary(self.cursor_pos);
    }

    fn set_caret_offset(&mut self, offset: usize) {
        self.cursor_pos = self.snap_to_grapheme_boundary(offset);
    }

    fn set_focus(&mut self) {
        self.focused = true;
    }
}
