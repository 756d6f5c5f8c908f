//! Bibliographic records returned by the Better BibTeX JSON-RPC service.
//!
//! Records are CSL-JSON items. Decoding is permissive: a missing or `null`
//! field takes its default value instead of rejecting the whole reply.
//!
//! Field names are matched exactly. Better BibTeX always sends the CSL names
//! (`container-title`, `DOI`), so a lowercase `doi` key is ignored.

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata for one cited item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Page or page range, if any
    pub page: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Journal, book or proceedings the item appeared in
    #[serde(rename = "container-title")]
    pub container_title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub author: Vec<Author>,
    #[serde(deserialize_with = "null_as_default")]
    pub issued: Issued,
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
}

impl Record {
    /// Returns the container title, treating an empty string as absent.
    pub fn container_title(&self) -> Option<&str> {
        non_empty(self.container_title.as_deref())
    }

    /// Returns the DOI, treating an empty string as absent.
    pub fn doi(&self) -> Option<&str> {
        non_empty(self.doi.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// An author name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Author {
    #[serde(deserialize_with = "null_as_default")]
    pub family: String,
    #[serde(deserialize_with = "null_as_default")]
    pub given: String,
}

/// CSL issued date.
///
/// `date-parts` is a list of date groups (one, or two for a range), each
/// holding year, month and day. The parts are kept loosely typed because
/// Zotero emits both numbers and strings here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Issued {
    #[serde(rename = "date-parts", deserialize_with = "null_as_default")]
    pub date_parts: Vec<Vec<DateValue>>,
}

impl Issued {
    /// First element of the first date group, which is the year.
    pub fn year(&self) -> Option<&DateValue> {
        self.date_parts.first().and_then(|parts| parts.first())
    }
}

/// One date part as sent by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Number(n) => write!(f, "{}", n),
            DateValue::Text(s) => write!(f, "{}", s),
            DateValue::Other(v) => write!(f, "{}", v),
        }
    }
}
