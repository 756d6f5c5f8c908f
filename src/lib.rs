//! citekey-bib: build an AsciiDoc bibliography from Zotero citation keys.
//!
//! This library provides functionality to:
//! - Find `<<citekey>>` markers in AsciiDoc text
//! - Look each key up through the Better BibTeX JSON-RPC service
//! - Format each record as an AsciiDoc bibliography entry

pub mod driver;
pub mod format;
pub mod markers;
pub mod record;
pub mod resolver;

pub use driver::{load_document, write_bibliography, DriverError};
pub use format::{format_entry, FormatError};
pub use markers::{extract_citekeys, extract_markers, Marker};
pub use record::{Author, DateValue, Issued, Record};
pub use resolver::{Endpoint, ItemSearch, ResolveError, Resolver};
