//! Replacing the word under the caret.

use super::{clamp_offset, word};

/// Result of splicing a replacement into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    /// The new text.
    pub text: String,
    /// Byte offset just after the inserted replacement.
    pub caret: usize,
}

/// Replace the word under `caret` with `new_word`, returning the new text
/// and the caret offset after the inserted word.
///
/// When the caret sits between whitespace the word is empty, and
/// `new_word` is inserted at the caret with nothing removed.
pub fn splice_current_word(text: &str, caret: usize, new_word: &str) -> Splice {
    let caret = clamp_offset(text, caret);
    let (before, after) = text.split_at(caret);
    let head = word::head(before);
    let tail = word::tail(after);

    // The word is head + tail, so head always starts at the beginning of it.
    let word_start = caret - head.len();
    let word_end = caret + tail.len();

    let mut spliced = String::with_capacity(text.len() - (word_end - word_start) + new_word.len());
    spliced.push_str(&text[..word_start]);
    spliced.push_str(new_word);
    let new_caret = spliced.len();
    spliced.push_str(&text[word_end..]);

    Splice {
        text: spliced,
        caret: new_caret,
    }
}

/// Replace the word under `caret` with `new_word`.
///
/// ```
/// use horizon_lookup::text::replace_current_word;
///
/// assert_eq!(replace_current_word("abc 123 xyz", 6, "999"), "abc 999 xyz");
/// ```
pub fn replace_current_word(text: &str, caret: usize, new_word: &str) -> String {
    splice_current_word(text, caret, new_word).text
}
