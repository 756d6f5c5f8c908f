//! CLI for citekey-bib - Print an AsciiDoc bibliography for a document's citation keys.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use citekey_bib::{
    driver::DEFAULT_INPUT,
    load_document,
    resolver::{DEFAULT_ADDRESS, DEFAULT_PATH},
    write_bibliography, DriverError, Endpoint, FormatError, ResolveError, Resolver,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Print an AsciiDoc bibliography for the <<citekey>> markers of a document
#[derive(Parser)]
#[command(name = "citekey-bib")]
#[command(version)]
#[command(after_help = "\
Citation keys are looked up in Zotero through the Better BibTeX JSON-RPC
service, which must be running. Entries are printed in sorted key order.

Examples:
  citekey-bib
  citekey-bib paper.asc > references.asc
  citekey-bib paper.asc --endpoint-address 127.0.0.1:24119

Exit codes:
  10  input document unreadable
  11  server unreachable, unreadable reply, or JSON-RPC error reply
  12  no item found for a citation key (empty result)
  13  item has no issued year
  14  cannot write to stdout")]
struct Cli {
    /// AsciiDoc document to scan for <<citekey>> markers
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Host and port of the Better BibTeX server
    #[arg(long, default_value = DEFAULT_ADDRESS)]
    endpoint_address: String,

    /// JSON-RPC path on the Better BibTeX server
    #[arg(long, default_value = DEFAULT_PATH)]
    endpoint_path: String,
}

// ---------------------------------------------------------------------------
// AppError — semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 — input document not found / unreadable
    InputFile(String),
    /// Exit 11 — metadata service unreachable, replied with garbage or with a JSON-RPC error
    Service(String),
    /// Exit 12 — citation key not found in Zotero
    ReferenceNotFound(String),
    /// Exit 13 — record lacks data needed for the entry
    Format(String),
    /// Exit 14 — cannot write to stdout
    Output(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::InputFile(_) => 10,
            AppError::Service(_) => 11,
            AppError::ReferenceNotFound(_) => 12,
            AppError::Format(_) => 13,
            AppError::Output(_) => 14,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::Service(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that Zotero is running with the Better BibTeX plugin enabled",
                    msg
                )
            }
            AppError::ReferenceNotFound(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that this citation key exists in your Zotero library",
                    msg
                )
            }
            AppError::Format(msg) => {
                write!(
                    f,
                    "{}\n  hint: add an issued date to this item in Zotero",
                    msg
                )
            }
            AppError::Output(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<DriverError> for AppError {
    fn from(e: DriverError) -> Self {
        let msg = e.to_string();
        match e {
            DriverError::Read { .. } => AppError::InputFile(msg),
            DriverError::Resolve {
                source: ResolveError::NotFound(_),
                ..
            } => AppError::ReferenceNotFound(msg),
            DriverError::Resolve { .. } => AppError::Service(msg),
            DriverError::Format(FormatError::MissingYear { .. }) => AppError::Format(msg),
            DriverError::Output(_) => AppError::Output(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "citekey_bib=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let document = load_document(&cli.input)?;
    let endpoint = Endpoint::new(cli.endpoint_address, cli.endpoint_path);
    let resolver = Resolver::new(&endpoint).map_err(|e| AppError::Service(e.to_string()))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_bibliography(&document, &resolver, &mut handle)?;

    Ok(())
}
