//! Error types for gallery client operations.
//!
//! Every failure surfaces directly to the immediate caller with no local
//! recovery and no retries; callers own any retry policy.

use thiserror::Error;

use super::page::PageError;

/// Errors that can occur while talking to the gallery.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, connection refused, TLS, mid-body
    /// aborts). Covers session priming as well; never retried.
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Listing page did not contain the expected package markup.
    #[error("unparseable listing page at {url}: {source}")]
    Parse {
        /// The listing URL whose body failed to parse.
        url: String,
        /// What was missing from the page.
        #[source]
        source: PageError,
    },

    /// Package detail body was not valid structured data.
    #[error("invalid package detail response from {url}: {source}")]
    Decode {
        /// The detail endpoint URL.
        url: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Image body could not be decoded by any enabled codec.
    #[error("undecodable image at {url}: {source}")]
    Image {
        /// The image URL.
        url: String,
        /// The underlying decoder error.
        #[source]
        source: image::ImageError,
    },
}

impl ClientError {
    /// Creates a network error for a failed request.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a parse error for a listing page.
    pub fn parse(url: impl Into<String>, source: PageError) -> Self {
        Self::Parse {
            url: url.into(),
            source,
        }
    }

    /// Creates a decode error for a detail response.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates a decode error for an image body.
    pub fn image(url: impl Into<String>, source: image::ImageError) -> Self {
        Self::Image {
            url: url.into(),
            source,
        }
    }
}

// The variants require request context (url) that the source errors don't
// carry, so no blanket From impls; the helper constructors are the seam.
