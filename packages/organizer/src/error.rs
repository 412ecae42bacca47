//! Error types for the organizer.
//!
//! Fatal conditions surface as `OrganizerError`; recoverable oddities in the
//! source documents (missing divider, empty article spans, failed single
//! writes) are logged with `tracing` and never raised.

use thiserror::Error;

/// Main error type for the organizer library.
#[derive(Debug, Error)]
pub enum OrganizerError {
    /// URL does not look like an HTTP(S) address.
    #[error("Invalid URL: '{0}'. Expected an http:// or https:// address")]
    InvalidUrl(String),

    /// Numbered scaffold range is empty or reversed.
    #[error("Invalid range: first ({first}) must be >= 1 and <= last ({last})")]
    InvalidRange { first: u32, last: u32 },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to fetch a publication page.
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<OrganizerError>,
    },

    /// Every retry attempt failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// DOCX archive could not be read.
    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Missing required element in a source document.
    #[error("Missing required element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// No main content container could be located.
    #[error("No main content found in {0}")]
    MissingContent(String),

    /// CSS selector failed to parse.
    #[error("Invalid CSS selector '{0}'")]
    InvalidSelector(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile file could not be parsed.
    #[error("Profile parsing failed: {0}")]
    Profile(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for organizer operations.
pub type Result<T> = std::result::Result<T, OrganizerError>;
