//! Publication page fetching.
//!
//! The portal serves each norm as a single HTML page; this module turns a
//! URL into decoded page text or a `Fetch` error carrying the URL.

use reqwest::blocking::Client;

use crate::config::validate_url;
use crate::error::{OrganizerError, Result};
use crate::http::{bytes_to_string, download_bytes};

/// Download and decode a publication page.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - Page address, validated before any request is made
///
/// # Returns
/// The page HTML as a string
pub fn fetch_document(client: &Client, url: &str) -> Result<String> {
    validate_url(url)?;
    tracing::info!(url, "Fetching publication");

    let bytes = download_bytes(client, url).map_err(|e| OrganizerError::Fetch {
        url: url.to_string(),
        source: Box::new(e),
    })?;

    Ok(bytes_to_string(&bytes, url))
}
