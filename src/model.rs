//! Decoded package detail records.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One image inside a package, as described by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageDescriptor {
    /// Image index within the package.
    #[serde(deserialize_with = "ordinal")]
    pub idx: u64,
    /// Sort position within the package.
    #[serde(deserialize_with = "ordinal")]
    pub sort: u64,
    /// Display title of the image.
    pub title: String,
    /// File extension of the source image (`png`, `gif`, ...).
    pub ext: String,
    /// Remote path token used to fetch the image bytes.
    pub path: String,
}

impl ImageDescriptor {
    /// Output filename for this image: `{idx}-{sort}-{title}.{ext}`.
    ///
    /// Descriptors colliding on all four fields produce the same name;
    /// callers keying a map by it let later entries overwrite earlier ones.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}-{}-{}.{}", self.idx, self.sort, self.title, self.ext)
    }
}

/// Detail record for one package.
///
/// Top-level response fields beyond `detail` are retained verbatim in
/// [`extra`](Self::extra) so callers can reach package metadata the service
/// adds over time without a crate release.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackageDetail {
    /// Ordered image descriptors for the package.
    pub detail: Vec<ImageDescriptor>,
    /// Remaining top-level response fields, undecoded.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The live service quotes `idx`/`sort` as JSON strings; the documented
/// interface and older captures use bare numbers. Accept both.
fn ordinal<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(value) => value.trim().parse().map_err(serde::de::Error::custom),
    }
}
