//! Citation marker scanner.
//!
//! Finds citation keys written as `<<citekey>>` in AsciiDoc text.
//!
//! Keys are resolved in lexicographic order of their delimited form, not in
//! document order. This keeps the generated bibliography reproducible no matter
//! how the document is edited around its markers.

use std::sync::LazyLock;

use regex::Regex;

/// A `<<...>>` marker: non-greedy, at least one character, never across a newline.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<<.+?>>").unwrap());

/// A citation marker found in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// The citation key with its `<<`/`>>` delimiters removed
    pub key: String,
    /// Start and end byte positions of the delimited marker in the source text
    pub span: (usize, usize),
}

impl Marker {
    /// Returns the delimited marker text (e.g. `<<smith2020>>`) from `text`.
    pub fn raw<'a>(&self, text: &'a str) -> &'a str {
        &text[self.span.0..self.span.1]
    }
}

/// Extracts all citation markers from the given text, in document order.
///
/// # Examples
///
/// ```
/// use citekey_bib::extract_markers;
///
/// let markers = extract_markers("see <<b>> and <<a>>");
/// assert_eq!(markers.len(), 2);
/// assert_eq!(markers[0].key, "b");
/// assert_eq!(markers[0].span, (4, 9));
/// ```
pub fn extract_markers(text: &str) -> Vec<Marker> {
    MARKER_RE
        .find_iter(text)
        .map(|m| Marker {
            key: strip_delimiters(m.as_str()).to_string(),
            span: (m.start(), m.end()),
        })
        .collect()
}

/// Extracts citation keys in resolution order.
///
/// Markers are sorted by their delimited text (`<<key>>`) before the
/// delimiters are stripped. Duplicates are kept: a key cited twice is
/// resolved and emitted twice.
///
/// # Examples
///
/// ```
/// use citekey_bib::extract_citekeys;
///
/// assert_eq!(extract_citekeys("see <<b>> and <<a>>"), vec!["a", "b"]);
/// assert!(extract_citekeys("no markers here").is_empty());
/// ```
pub fn extract_citekeys(text: &str) -> Vec<String> {
    let mut markers = extract_markers(text);
    markers.sort_by(|a, b| a.raw(text).cmp(b.raw(text)));
    markers.into_iter().map(|m| m.key).collect()
}

/// Trims every `<` and `>` character from both ends of a marker.
fn strip_delimiters(raw: &str) -> &str {
    raw.trim_matches(|c| c == '<' || c == '>')
}
