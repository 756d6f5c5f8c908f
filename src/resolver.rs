//! Citation key lookup against the Better BibTeX JSON-RPC endpoint.
//!
//! Zotero with the Better BibTeX plugin serves a JSON-RPC API on a loopback
//! port. Each key is looked up with one `item.search` call; the first
//! candidate in the reply is taken as the record for that key.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::record::Record;

/// Default host and port of the Better BibTeX server.
pub const DEFAULT_ADDRESS: &str = "localhost:23119";

/// Default JSON-RPC path of the Better BibTeX server.
pub const DEFAULT_PATH: &str = "/better-bibtex/json-rpc";

const JSONRPC_VERSION: &str = "2.0";
const SEARCH_METHOD: &str = "item.search";

/// Errors that can occur while resolving a citation key.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to set up HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to reach the metadata service: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("Failed to read the metadata service response: {0}")]
    Io(#[source] reqwest::Error),

    #[error("Invalid response from the metadata service: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Metadata service error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("No item found for citation key '{0}'")]
    NotFound(String),
}

/// Location of the JSON-RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host and port, e.g. `localhost:23119`
    pub address: String,
    /// Request path, e.g. `/better-bibtex/json-rpc`
    pub path: String,
}

impl Endpoint {
    pub fn new(address: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            path: path.into(),
        }
    }

    /// Full URL to POST requests to.
    pub fn url(&self) -> String {
        format!("http://{}{}", self.address, self.path)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS, DEFAULT_PATH)
    }
}

/// Looks up the bibliographic record for a citation key.
pub trait ItemSearch {
    fn search(&self, citekey: &str) -> Result<Record, ResolveError>;
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: [&'a str; 1],
}

#[derive(Deserialize)]
struct SearchReply {
    #[serde(default)]
    result: Option<Vec<Record>>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// HTTP client for the Better BibTeX JSON-RPC endpoint.
///
/// The underlying client is created once and reused for every lookup.
pub struct Resolver {
    client: reqwest::blocking::Client,
    url: String,
}

impl Resolver {
    /// Creates a resolver for `endpoint`.
    ///
    /// Proxy settings from the environment are ignored: the service lives on
    /// the local machine.
    pub fn new(endpoint: &Endpoint) -> Result<Self, ResolveError> {
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .build()
            .map_err(ResolveError::Client)?;

        Ok(Self {
            client,
            url: endpoint.url(),
        })
    }

    /// Resolves a citation key to its first matching record.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::NotFound` when the service has no candidates for
    /// the key, and the other variants for transport, read or decode failures.
    pub fn resolve(&self, citekey: &str) -> Result<Record, ResolveError> {
        let request = SearchRequest {
            jsonrpc: JSONRPC_VERSION,
            method: SEARCH_METHOD,
            params: [citekey],
        };

        debug!(url = %self.url, citekey, "searching item");
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .map_err(ResolveError::Connection)?;
        debug!(status = %response.status(), "metadata service replied");

        let body = response.bytes().map_err(ResolveError::Io)?;
        first_candidate(citekey, &body)
    }
}

impl ItemSearch for Resolver {
    fn search(&self, citekey: &str) -> Result<Record, ResolveError> {
        self.resolve(citekey)
    }
}

/// Decodes a JSON-RPC reply body and picks its first candidate.
fn first_candidate(citekey: &str, body: &[u8]) -> Result<Record, ResolveError> {
    let reply: SearchReply = serde_json::from_slice(body)?;

    if let Some(error) = reply.error {
        return Err(ResolveError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    let candidates = reply.result.unwrap_or_default();
    debug!(citekey, candidates = candidates.len(), "decoded search reply");
    if candidates.len() > 1 {
        warn!(
            citekey,
            candidates = candidates.len(),
            "several items match, using the first one"
        );
    }

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ResolveError::NotFound(citekey.to_string()))
}
