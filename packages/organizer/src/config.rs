//! Configuration constants, validation functions and batch profiles.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{OrganizerError, Result};
use crate::outline::DocumentFamily;

/// Publication of Acuerdo 927 de 2024 on the district legal portal.
pub const DEFAULT_HTML_URL: &str =
    "https://sisjur.bogotajuridica.gov.co/sisjur/normas/Norma1.jsp?i=155699";

/// Publication of Decreto 555 de 2021, exported as one flat Markdown file.
pub const DEFAULT_FLATTEN_URL: &str =
    "https://sisjur.bogotajuridica.gov.co/sisjur/normas/Norma1.jsp?i=119582";

/// Output directory for the organized HTML publication.
pub const DEFAULT_HTML_OUTPUT: &str = "pot-bogota-scraped";

/// Output file for the flat Markdown export.
pub const DEFAULT_FLATTEN_OUTPUT: &str = "pot-bogota/document_119582_full_text.md";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Browser user agent; the portal rejects unknown clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Maximum length of an article description snippet, ellipsis included.
pub const SNIPPET_MAX_CHARS: usize = 100;

/// Maximum length of the composed frontmatter description, ellipsis included.
pub const DESCRIPTION_MAX_CHARS: usize = 250;

/// Maximum length of a derived article caption, ellipsis included.
pub const ARTICLE_TITLE_MAX_CHARS: usize = 150;

/// Prose lines longer than this many words are never taken as a heading title.
pub const TITLE_LINE_MAX_WORDS: usize = 10;

/// File name of the per-parent table of contents.
pub const INDEX_FILE_NAME: &str = "_index.mdx";

/// Display name of the implicit node holding articles found before any marker.
pub const PREAMBLE_DISPLAY_NAME: &str = "Documento Principal";

/// HTTP(S) URL pattern.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid regex"));

/// Validate that a string is an HTTP(S) URL.
///
/// # Examples
/// ```
/// use normas_organizer::config::validate_url;
///
/// assert!(validate_url("https://sisjur.bogotajuridica.gov.co/sisjur/normas/Norma1.jsp?i=155699").is_ok());
/// assert!(validate_url("ftp://example.org").is_err());
/// assert!(validate_url("not a url").is_err());
/// ```
pub fn validate_url(url: &str) -> Result<()> {
    if URL_PATTERN.is_match(url) {
        Ok(())
    } else {
        Err(OrganizerError::InvalidUrl(url.to_string()))
    }
}

/// Validate a numbered scaffold range.
///
/// # Examples
/// ```
/// use normas_organizer::config::validate_range;
///
/// assert!(validate_range(1, 380).is_ok());
/// assert!(validate_range(5, 5).is_ok());
/// assert!(validate_range(0, 3).is_err());
/// assert!(validate_range(10, 2).is_err());
/// ```
pub fn validate_range(first: u32, last: u32) -> Result<()> {
    if first >= 1 && first <= last {
        Ok(())
    } else {
        Err(OrganizerError::InvalidRange { first, last })
    }
}

/// Where a profile document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Publication page on the legal portal.
    Url(String),
    /// Local DOCX file.
    Docx(PathBuf),
}

/// One document entry of a batch profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentProfile {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub docx: Option<PathBuf>,
    pub family: DocumentFamily,
    /// Document name used in article descriptions ("Acuerdo 927 de 2024").
    #[serde(default)]
    pub description: Option<String>,
    pub output: PathBuf,
}

impl DocumentProfile {
    /// Resolve the source, requiring exactly one of `url` and `docx`.
    pub fn source(&self) -> Result<DocumentSource> {
        match (&self.url, &self.docx) {
            (Some(url), None) => Ok(DocumentSource::Url(url.clone())),
            (None, Some(path)) => Ok(DocumentSource::Docx(path.clone())),
            _ => Err(OrganizerError::MissingElement {
                element: "exactly one of 'url' or 'docx'".to_string(),
                context: format!("profile document '{}'", self.name),
            }),
        }
    }

    /// Document name for descriptions, falling back to the family default.
    pub fn document_name(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| self.family.default_document_name().to_string())
    }
}

/// A batch profile: documents processed in order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub documents: Vec<DocumentProfile>,
}

impl Profile {
    /// Parse a profile from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let profile: Profile = serde_yaml_ng::from_str(yaml)?;
        for document in &profile.documents {
            document.source()?;
        }
        Ok(profile)
    }

    /// Load a profile file, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)?;
        let mut profile = Self::from_yaml(&yaml)?;
        if let Some(base) = path.parent() {
            for document in &mut profile.documents {
                if let Some(docx) = document.docx.as_mut() {
                    if docx.is_relative() {
                        *docx = base.join(&*docx);
                    }
                }
                if document.output.is_relative() {
                    document.output = base.join(&document.output);
                }
            }
        }
        Ok(profile)
    }
}
