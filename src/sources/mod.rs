//! Typed raw records, one module per provider.
//!
//! Each record is the document shape one source returns for one entity,
//! tagged with its candidate identifiers. Records are ephemeral: they exist
//! only between loading and normalization.

pub mod imdb;
pub mod omdb;
pub mod tmdb;

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Loads a single JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Loads a JSON array of source documents, dropping null entries.
///
/// Retrieval appends a null for every request that returned nothing, so raw
/// batch files are sparse by design.
pub fn load_json_batch<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)?;
    let entries: Vec<Option<T>> = serde_json::from_str(&content)?;
    Ok(entries.into_iter().flatten().collect())
}
