//! AsciiDoc bibliography entry formatting.
//!
//! Each entry is a list item with an inline anchor so that `<<citekey>>`
//! cross-references in the document link to it:
//!
//! ```text
//! - [[[smith2020, smith2020]]] J Smith. "A Study" (2020). Journal X. DOI: 10.1/xyz.
//! ```
//!
//! Entries are not numbered; the position of an entry in the list plays no
//! part in its text.

use thiserror::Error;

use crate::record::{Author, Record};

/// Errors that can occur while formatting an entry.
#[derive(Error, Debug, PartialEq)]
pub enum FormatError {
    #[error("No issued year for citation key '{key}'")]
    MissingYear { key: String },
}

/// Formats one bibliography entry for `citekey`.
///
/// The returned line has no trailing newline.
///
/// # Errors
///
/// Returns `FormatError::MissingYear` when the record's `date-parts` has no
/// first element to use as the year.
///
/// # Examples
///
/// ```
/// use citekey_bib::{format_entry, Record};
///
/// let record: Record = serde_json::from_str(
///     r#"{"title": "Solo Work", "issued": {"date-parts": [[1999]]}}"#,
/// ).unwrap();
/// assert_eq!(format_entry("k", &record).unwrap(), r#"- [[[k, k]]] "Solo Work" (1999)."#);
/// ```
pub fn format_entry(citekey: &str, record: &Record) -> Result<String, FormatError> {
    let year = record.issued.year().ok_or_else(|| FormatError::MissingYear {
        key: citekey.to_string(),
    })?;

    let mut entry = format!("- [[[{}, {}]]] ", citekey, citekey);
    entry.push_str(&format_authors(&record.author));
    entry.push_str(&format!("\"{}\"", record.title));
    entry.push_str(&format!(" ({}).", year));

    if let Some(container) = record.container_title() {
        entry.push_str(&format!(" {}.", container));
    }

    if let Some(doi) = record.doi() {
        entry.push_str(&format!(" DOI: {}.", doi));
    }

    Ok(entry)
}

/// "Given Family" names joined by " and ", closed with ". ".
/// Empty when there are no authors.
fn format_authors(authors: &[Author]) -> String {
    if authors.is_empty() {
        return String::new();
    }

    let names: Vec<String> = authors
        .iter()
        .map(|a| format!("{} {}", a.given, a.family))
        .collect();
    format!("{}. ", names.join(" and "))
}
