//! Caret-relative text operations.
//!
//! All offsets are UTF-8 byte offsets, the same convention the host text
//! controls use for their cursor position. Offsets handed in from outside are
//! passed through [`clamp_offset`] before any slicing, so a stale caret can
//! never split a character or run past the end of the text.

mod splice;
mod word;

pub use splice::{Splice, replace_current_word, splice_current_word};
pub use word::{current_word, word_bounds};

/// Clamp `offset` into `text`, moving it back to the nearest char boundary.
pub fn clamp_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
