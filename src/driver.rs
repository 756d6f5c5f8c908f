//! Bibliography generation pipeline.
//!
//! Extracts the citation keys of a document, resolves and formats each one in
//! turn, and writes the entries as they are produced. The first failure stops
//! the run; entries written before it stay written.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::format::{format_entry, FormatError};
use crate::markers::extract_citekeys;
use crate::resolver::{ItemSearch, ResolveError};

/// Default document read when no input path is given.
pub const DEFAULT_INPUT: &str = "README.asc";

/// Errors that stop a bibliography run.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to resolve citation key '{key}': {source}")]
    Resolve {
        key: String,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Reads the whole document into memory.
pub fn load_document(path: &Path) -> Result<String, DriverError> {
    fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes one bibliography entry per citation marker in `text`.
///
/// Entries follow the sorted key order of [`extract_citekeys`], each followed
/// by a blank line. Output is flushed after every entry.
///
/// # Returns
///
/// The number of entries written.
pub fn write_bibliography<S, W>(text: &str, search: &S, out: &mut W) -> Result<usize, DriverError>
where
    S: ItemSearch + ?Sized,
    W: Write,
{
    let citekeys = extract_citekeys(text);
    info!(count = citekeys.len(), "found citation markers");

    for citekey in &citekeys {
        let record = search
            .search(citekey)
            .map_err(|source| DriverError::Resolve {
                key: citekey.clone(),
                source,
            })?;
        let entry = format_entry(citekey, &record)?;

        write!(out, "{}\n\n", entry)?;
        out.flush()?;
        debug!(citekey = %citekey, "wrote entry");
    }

    Ok(citekeys.len())
}
