//! dccon gallery client library
//!
//! This library browses, searches, and downloads sticker packages from the
//! dccon gallery, and reformats the downloaded images for display on a
//! mobile chat client.
//!
//! # Architecture
//!
//! - [`client`] - Blocking HTTP client for the gallery's listing/search,
//!   package-detail, and image endpoints, with memoized results
//! - [`model`] - Decoded package detail records and image descriptors
//! - [`cache`] - Memo caches with an injectable capacity policy
//! - [`ratio`] - Pure compositing pass that letterboxes images to the
//!   22:13 chat-card layout
//! - [`storage`] - Writes a downloaded package to a directory
//!
//! # Example
//!
//! ```no_run
//! use dccon::{DcconClient, ListOrder, fix_ratio_slack, save_package_images};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = DcconClient::new(None)?;
//!
//! let packages = client.get_list(1, ListOrder::New)?;
//! for (package_idx, name) in &packages {
//!     println!("{package_idx}: {name}");
//! }
//!
//! let images = client.get_package_images("12345")?;
//! save_package_images(&fix_ratio_slack(&images), "stickers")?;
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod client;
pub mod model;
pub mod ratio;
pub mod storage;

// Re-export commonly used types
pub use cache::{CachePolicy, MemoCache};
pub use client::{
    CatalogEntry, ClientError, DcconClient, ListOrder, ListPageParser, PageError, PageParser,
    SearchCondition, SearchQuery,
};
pub use model::{ImageDescriptor, PackageDetail};
pub use ratio::{fix_ratio_slack, target_width};
pub use storage::{StorageError, save_package_images};
