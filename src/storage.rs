//! Writes downloaded package images to disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;
use tracing::debug;

/// Errors raised while persisting package images.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Target file could not be encoded or written (missing directory,
    /// permissions, unsupported extension).
    #[error("failed to save image to {path}: {source}")]
    Save {
        /// The file path that failed.
        path: PathBuf,
        /// The underlying encoder or IO error.
        #[source]
        source: image::ImageError,
    },
}

impl StorageError {
    /// Creates a save error for a failed write.
    pub fn save(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Save {
            path: path.into(),
            source,
        }
    }
}

/// Saves every bitmap as `directory/filename`, with the output format
/// inferred from each filename's extension.
///
/// The directory must already exist and be writable; it is not created.
/// There is no partial-success rollback: files written before a failure
/// remain on disk.
///
/// # Errors
///
/// Returns [`StorageError`] for the first entry that cannot be written.
pub fn save_package_images(
    images: &HashMap<String, DynamicImage>,
    directory: impl AsRef<Path>,
) -> Result<(), StorageError> {
    let directory = directory.as_ref();
    for (name, image) in images {
        let path = directory.join(name);
        image
            .save(&path)
            .map_err(|source| StorageError::save(&path, source))?;
        debug!(path = %path.display(), "saved image");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_save_error_display_names_path() {
        let source = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such directory",
        ));
        let error = StorageError::save("/missing/out.png", source);
        let msg = error.to_string();
        assert!(msg.contains("/missing/out.png"), "got: {msg}");
    }
}
