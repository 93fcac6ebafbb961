//! Positional placeholder formatting.
//!
//! Templates reference values by position: `"{0} {1} ({2})"` renders the
//! first three values. Placeholders without a matching value are kept as
//! written, so a short value list never fails.
//!
//! ```
//! use horizon_lookup::format::format;
//!
//! assert_eq!(format("{0} {1} ({2})", &["Laser", "1234", "Ann"]), "Laser 1234 (Ann)");
//! assert_eq!(format("{0} {1}", &["a"]), "a {1}");
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([0-9]+)\}").expect("placeholder pattern is valid"));

/// The byte range a substituted value occupies in rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpan {
    /// The placeholder index, which is also the index into the value list.
    pub index: usize,
    /// Byte range of the substituted value in [`FormattedText::text`].
    pub range: Range<usize>,
}

/// Rendered template text together with the spans of substituted values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedText {
    /// The rendered text.
    pub text: String,
    /// One span per substituted placeholder, in text order.
    pub spans: Vec<ValueSpan>,
}

/// Replace each `{i}` in `template` with `values[i]`.
///
/// Placeholders whose index has no value (including indices too large to
/// represent) are left verbatim.
pub fn format<S: AsRef<str>>(template: &str, values: &[S]) -> String {
    format_spans(template, values).text
}

/// Like [`format`], but also reports where each value landed.
pub fn format_spans<S: AsRef<str>>(template: &str, values: &[S]) -> FormattedText {
    let mut out = FormattedText {
        text: String::with_capacity(template.len()),
        spans: Vec::new(),
    };
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let value = caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| values.get(index).map(|v| (index, v.as_ref())));

        let Some((index, value)) = value else {
            continue;
        };

        out.text.push_str(&template[last..whole.start]);
        let start = out.text.len();
        out.text.push_str(value);
        out.spans.push(ValueSpan {
            index,
            range: start..out.text.len(),
        });
        last = whole.end;
    }

    out.text.push_str(&template[last..]);
    out
}
