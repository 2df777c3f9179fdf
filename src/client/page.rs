//! Listing-page scraping behind a narrow parser contract.
//!
//! The gallery serves listing and search results as HTML. All knowledge of
//! the page shape lives behind [`PageParser`], so the fragile scraping stays
//! in one fixture-testable spot and the client only sees catalog entries.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Opening tag of a package container: any element whose class list carries
/// `div_package`.
static PACKAGE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r#"(?is)<[a-z][a-z0-9]*\b[^>]*class\s*=\s*["'][^"']*\bdiv_package\b[^"']*["'][^>]*>"#,
    )
});

/// `package_idx` attribute inside a container's opening tag.
static PACKAGE_IDX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r#"(?is)package_idx\s*=\s*["']([^"']*)["']"#));

/// Text of the nested name element (class `sticker1_name`).
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r#"(?is)<[a-z][a-z0-9]*\b[^>]*class\s*=\s*["'][^"']*\bsticker1_name\b[^"']*["'][^>]*>\s*([^<]*?)\s*<"#,
    )
});

/// One (identifier, display name) pair from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Opaque package identifier, stable across requests.
    pub package_idx: String,
    /// Display name. Multiple identifiers may share a name.
    pub name: String,
}

/// A parser for one known page shape.
pub trait PageParser {
    /// Extracts catalog entries from a page body.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] when the expected structural elements are
    /// absent. A page with no recognizable package containers is a parse
    /// failure, not an empty result; callers treat the two differently.
    fn parse(&self, html: &str) -> Result<Vec<CatalogEntry>, PageError>;
}

/// Parser for the gallery's listing/search result pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPageParser;

impl PageParser for ListPageParser {
    fn parse(&self, html: &str) -> Result<Vec<CatalogEntry>, PageError> {
        let tags: Vec<regex::Match<'_>> = PACKAGE_TAG_RE.find_iter(html).collect();
        if tags.is_empty() {
            return Err(PageError::NoPackages);
        }

        let mut entries = Vec::with_capacity(tags.len());
        for (position, tag) in tags.iter().enumerate() {
            let package_idx = PACKAGE_IDX_RE
                .captures(tag.as_str())
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .ok_or(PageError::MissingIdentifier { position })?;

            // The name element sits between this container's opening tag and
            // the next container (or end of document).
            let segment_end = tags
                .get(position + 1)
                .map_or(html.len(), |next| next.start());
            let segment = &html[tag.end()..segment_end];
            let name = NAME_RE
                .captures(segment)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .ok_or(PageError::MissingName { position })?;

            entries.push(CatalogEntry { package_idx, name });
        }
        Ok(entries)
    }
}

/// Errors raised while scraping a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The page has no recognizable package containers at all.
    #[error("no package containers found in listing page")]
    NoPackages,

    /// A container's opening tag is missing its `package_idx` attribute.
    #[error("package container #{position} is missing its package_idx attribute")]
    MissingIdentifier {
        /// Zero-based position of the container in the page.
        position: usize,
    },

    /// A container has no nested name element.
    #[error("package container #{position} has no name element")]
    MissingName {
        /// Zero-based position of the container in the page.
        position: usize,
    },
}
