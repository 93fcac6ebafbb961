//! Extraction of the whitespace-delimited word under the caret.

use std::ops::Range;

use super::clamp_offset;

/// The part of the word that lies before the caret.
///
/// Every whitespace character is a separator on its own, so this is empty
/// when the caret directly follows whitespace.
pub(crate) fn head(before: &str) -> &str {
    before.rsplit(char::is_whitespace).next().unwrap_or("")
}

/// The part of the word that lies after the caret.
pub(crate) fn tail(after: &str) -> &str {
    after.split(char::is_whitespace).next().unwrap_or("")
}

/// Byte range of the word straddling `caret`.
///
/// ```
/// use horizon_lookup::text::word_bounds;
///
/// assert_eq!(word_bounds("abc 123 xyz", 6), 4..7);
/// assert_eq!(word_bounds("abc  xyz", 4), 4..4);
/// ```
pub fn word_bounds(text: &str, caret: usize) -> Range<usize> {
    let caret = clamp_offset(text, caret);
    let (before, after) = text.split_at(caret);
    (caret - head(before).len())..(caret + tail(after).len())
}

/// The contiguous non-whitespace token around `caret`, possibly empty.
///
/// ```
/// use horizon_lookup::text::current_word;
///
/// assert_eq!(current_word("abc 123 xyz", 6), "123");
/// assert_eq!(current_word("abc 123 xyz", 3), "abc");
/// assert_eq!(current_word("abc 123 xyz", 4), "123");
/// ```
pub fn current_word(text: &str, caret: usize) -> &str {
    &text[word_bounds(text, caret)]
}
