//! Blocking client for the dccon sticker gallery.
//!
//! # Architecture
//!
//! - [`DcconClient`] - owns the HTTP session and the memo caches
//! - [`PageParser`] / [`ListPageParser`] - listing-page scraping contract
//! - [`ClientError`] - error taxonomy for every client operation
//!
//! All operations are synchronous and sequential. Mutating operations take
//! `&mut self`; sharing a client across threads requires external
//! serialization, which the borrow checker enforces.

mod error;
mod http;
mod page;

pub use error::ClientError;
pub use page::{CatalogEntry, ListPageParser, PageError, PageParser};

use std::collections::HashMap;
use std::sync::Arc;

use image::DynamicImage;
use reqwest::blocking::{Client, Response};
use reqwest::cookie::Jar;
use reqwest::header::REFERER;
use tracing::debug;
use url::Url;

use crate::cache::{CachePolicy, MemoCache};
use crate::model::PackageDetail;

const DEFAULT_GALLERY_BASE_URL: &str = "http://dccon.dcinside.com";
const DEFAULT_IMAGE_BASE_URL: &str = "http://dcimg5.dcinside.com";

/// Session cookie echoed back as the `ci_t` form field on detail requests.
const ANTI_FORGERY_COOKIE: &str = "ci_c";

/// Listing order accepted by the gallery's list/search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Most popular packages first.
    Hot,
    /// Most recently released packages first.
    #[default]
    New,
}

impl ListOrder {
    /// Path segment the endpoint expects for this order.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
        }
    }
}

/// Field a search keyword matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCondition {
    /// Package title.
    Title,
    /// Author nickname.
    NickName,
    /// Package tags.
    Tags,
}

impl SearchCondition {
    /// Path segment the endpoint expects for this condition.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::NickName => "nick_name",
            Self::Tags => "tags",
        }
    }
}

/// A search condition paired with its keyword.
///
/// Pairing the two makes a keyword without a condition unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuery<'a> {
    /// Field to match against.
    pub condition: SearchCondition,
    /// Keyword to match. An empty keyword degrades to the plain listing.
    pub keyword: &'a str,
}

/// Blocking client for the sticker gallery.
///
/// Owns the HTTP session (cookie jar included) for its entire lifetime, plus
/// two memo caches: identifier→detail-record and name→identifier. Both
/// default to unbounded and grow for the life of the client; see
/// [`set_cache_policy`](Self::set_cache_policy) to bound them.
pub struct DcconClient {
    client: Client,
    cookie_jar: Arc<Jar>,
    gallery_base_url: String,
    image_base_url: String,
    parser: ListPageParser,
    reverse_list_cache: MemoCache<String, String>,
    details_cache: MemoCache<String, PackageDetail>,
}

impl std::fmt::Debug for DcconClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DcconClient")
            .field("gallery_base_url", &self.gallery_base_url)
            .field("image_base_url", &self.image_base_url)
            .field("details_cached", &self.details_cache.len())
            .finish_non_exhaustive()
    }
}

impl DcconClient {
    /// Creates a client against the live gallery endpoints and primes the
    /// session with one GET on the gallery root.
    ///
    /// Pass an existing cookie jar to reuse a session; `None` starts fresh.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] when client construction or the
    /// priming request fails. Priming is not retried.
    pub fn new(cookie_jar: Option<Arc<Jar>>) -> Result<Self, ClientError> {
        Self::with_base_urls(cookie_jar, DEFAULT_GALLERY_BASE_URL, DEFAULT_IMAGE_BASE_URL)
    }

    /// Creates a client with custom gallery and image hosts (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] when client construction or the
    /// priming request fails.
    pub fn with_base_urls(
        cookie_jar: Option<Arc<Jar>>,
        gallery_base_url: impl Into<String>,
        image_base_url: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let gallery_base_url = trim_base_url(gallery_base_url.into());
        let image_base_url = trim_base_url(image_base_url.into());
        let cookie_jar = cookie_jar.unwrap_or_default();
        let client = http::build_gallery_http_client(
            http::default_user_agent(),
            Arc::clone(&cookie_jar),
            &gallery_base_url,
        )?;
        http::prime_session(&client, &gallery_base_url)?;

        Ok(Self {
            client,
            cookie_jar,
            gallery_base_url,
            image_base_url,
            parser: ListPageParser,
            reverse_list_cache: MemoCache::new(CachePolicy::Unbounded),
            details_cache: MemoCache::new(CachePolicy::Unbounded),
        })
    }

    /// Replaces the cache policy, clearing both memo caches.
    pub fn set_cache_policy(&mut self, policy: CachePolicy) {
        self.reverse_list_cache = MemoCache::new(policy);
        self.details_cache = MemoCache::new(policy);
    }

    /// Fetches one page of the package listing.
    ///
    /// Equivalent to [`search_list`](Self::search_list) with no query.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] on transport failure and
    /// [`ClientError::Parse`] when the page lacks the expected markup.
    pub fn get_list(
        &mut self,
        page: u32,
        order: ListOrder,
    ) -> Result<HashMap<String, String>, ClientError> {
        self.search_list(None, page, order)
    }

    /// Fetches one page of listing or search results as identifier→name.
    ///
    /// Exactly one page per call; no pagination traversal. As a side effect
    /// the inverse pairs are merged into the reverse-lookup cache, later
    /// entries overwriting earlier ones on name collision.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] on transport failure and
    /// [`ClientError::Parse`] when the page lacks the expected markup;
    /// callers must treat an empty mapping and a parse failure as distinct
    /// outcomes.
    #[tracing::instrument(skip(self))]
    pub fn search_list(
        &mut self,
        query: Option<SearchQuery<'_>>,
        page: u32,
        order: ListOrder,
    ) -> Result<HashMap<String, String>, ClientError> {
        let url = self.list_url(query, page, order);
        let html = self
            .client
            .get(&url)
            .send()
            .and_then(Response::text)
            .map_err(|source| ClientError::network(&url, source))?;

        let entries = self
            .parser
            .parse(&html)
            .map_err(|source| ClientError::parse(&url, source))?;

        let mut result = HashMap::with_capacity(entries.len());
        for entry in entries {
            self.reverse_list_cache
                .insert(entry.name.clone(), entry.package_idx.clone());
            result.insert(entry.package_idx, entry.name);
        }
        debug!(packages = result.len(), "parsed listing page");
        Ok(result)
    }

    /// Fetches the detail record for one package, memoizing the decoded
    /// result for the life of the client.
    ///
    /// A cached record always short-circuits the network, even when its
    /// image list is empty; repeated calls return the first-seen value and
    /// the cache is never invalidated or refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] on transport failure and
    /// [`ClientError::Decode`] when the body is not valid structured data.
    #[tracing::instrument(skip(self))]
    pub fn get_details(&mut self, package_idx: &str) -> Result<PackageDetail, ClientError> {
        if let Some(cached) = self.details_cache.get(package_idx) {
            debug!("package detail served from cache");
            return Ok(cached.clone());
        }

        let url = format!("{}/index/package_detail", self.gallery_base_url);
        let mut form: Vec<(&str, String)> = Vec::with_capacity(2);
        if let Some(token) = self.anti_forgery_token() {
            form.push(("ci_t", token));
        }
        form.push(("package_idx", package_idx.to_string()));

        let body = self
            .client
            .post(&url)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&form)
            .send()
            .and_then(Response::text)
            .map_err(|source| ClientError::network(&url, source))?;

        let record: PackageDetail =
            serde_json::from_str(&body).map_err(|source| ClientError::decode(&url, source))?;
        self.details_cache
            .insert(package_idx.to_string(), record.clone());
        debug!(images = record.detail.len(), "decoded package detail");
        Ok(record)
    }

    /// Fetches and decodes a single image by its remote path token.
    ///
    /// The image host rejects requests without a `Referer` naming the
    /// gallery root, so one is always sent.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] on transport failure and
    /// [`ClientError::Image`] when the body is not a decodable image.
    #[tracing::instrument(skip(self))]
    pub fn get_image(&self, path: &str) -> Result<DynamicImage, ClientError> {
        let url = format!("{}/dccon.php?no={path}", self.image_base_url);
        let bytes = self
            .client
            .get(&url)
            .header(REFERER, http::root_url(&self.gallery_base_url))
            .send()
            .and_then(Response::bytes)
            .map_err(|source| ClientError::network(&url, source))?;

        image::load_from_memory(&bytes).map_err(|source| ClientError::image(&url, source))
    }

    /// Downloads every image in a package, keyed by
    /// `{idx}-{sort}-{title}.{ext}`.
    ///
    /// Images are fetched sequentially in the record's order. Filenames are
    /// not guaranteed unique; descriptors colliding on all four fields
    /// overwrite earlier entries in the returned mapping.
    ///
    /// # Errors
    ///
    /// Propagates the first failing fetch; no partial mapping is returned.
    pub fn get_package_images(
        &mut self,
        package_idx: &str,
    ) -> Result<HashMap<String, DynamicImage>, ClientError> {
        let record = self.get_details(package_idx)?;
        let mut images = HashMap::with_capacity(record.detail.len());
        for descriptor in &record.detail {
            images.insert(descriptor.file_name(), self.get_image(&descriptor.path)?);
        }
        Ok(images)
    }

    /// Most recently seen identifier for `name`, from any prior list or
    /// search call. Never populated by detail fetches.
    #[must_use]
    pub fn reverse_lookup(&self, name: &str) -> Option<&str> {
        self.reverse_list_cache.get(name).map(String::as_str)
    }

    /// Read-only view of the name→identifier cache.
    #[must_use]
    pub fn reverse_list_cache(&self) -> &MemoCache<String, String> {
        &self.reverse_list_cache
    }

    /// Read-only view of the identifier→detail cache.
    #[must_use]
    pub fn details_cache(&self) -> &MemoCache<String, PackageDetail> {
        &self.details_cache
    }

    fn list_url(&self, query: Option<SearchQuery<'_>>, page: u32, order: ListOrder) -> String {
        let mut url = format!("{}/{}/{page}", self.gallery_base_url, order.as_str());
        if let Some(SearchQuery { condition, keyword }) = query {
            if !keyword.is_empty() {
                url.push('/');
                url.push_str(condition.as_str());
                url.push('/');
                url.push_str(&quote_plus(keyword));
            }
        }
        url
    }

    fn anti_forgery_token(&self) -> Option<String> {
        let root = Url::parse(&http::root_url(&self.gallery_base_url)).ok()?;
        http::cookie_value(&self.cookie_jar, &root, ANTI_FORGERY_COOKIE)
    }
}

fn trim_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Form-style escaping for search keywords: percent-encoding with spaces
/// as `+`.
fn quote_plus(keyword: &str) -> String {
    urlencoding::encode(keyword).replace("%20", "+")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn offline_client() -> DcconClient {
        DcconClient {
            client: Client::new(),
            cookie_jar: Arc::new(Jar::default()),
            gallery_base_url: "http://gallery.example".to_string(),
            image_base_url: "http://images.example".to_string(),
            parser: ListPageParser,
            reverse_list_cache: MemoCache::new(CachePolicy::Unbounded),
            details_cache: MemoCache::new(CachePolicy::Unbounded),
        }
    }

    #[test]
    fn test_list_url_without_query() {
        let client = offline_client();
        assert_eq!(
            client.list_url(None, 3, ListOrder::Hot),
            "http://gallery.example/hot/3"
        );
    }

    #[test]
    fn test_list_url_with_query_encodes_keyword() {
        let client = offline_client();
        let query = SearchQuery {
            condition: SearchCondition::Title,
            keyword: "hello world",
        };
        assert_eq!(
            client.list_url(Some(query), 1, ListOrder::New),
            "http://gallery.example/new/1/title/hello+world"
        );
    }

    #[test]
    fn test_list_url_with_empty_keyword_is_plain_listing() {
        let client = offline_client();
        let query = SearchQuery {
            condition: SearchCondition::Tags,
            keyword: "",
        };
        assert_eq!(
            client.list_url(Some(query), 1, ListOrder::New),
            "http://gallery.example/new/1"
        );
    }

    #[test]
    fn test_quote_plus_escapes_reserved_characters() {
        assert_eq!(quote_plus("a b"), "a+b");
        assert_eq!(quote_plus("a/b&c"), "a%2Fb%26c");
        assert_eq!(quote_plus("plain"), "plain");
    }

    #[test]
    fn test_order_and_condition_path_segments() {
        assert_eq!(ListOrder::Hot.as_str(), "hot");
        assert_eq!(ListOrder::New.as_str(), "new");
        assert_eq!(ListOrder::default(), ListOrder::New);
        assert_eq!(SearchCondition::Title.as_str(), "title");
        assert_eq!(SearchCondition::NickName.as_str(), "nick_name");
        assert_eq!(SearchCondition::Tags.as_str(), "tags");
    }

    #[test]
    fn test_base_urls_are_trimmed() {
        assert_eq!(
            trim_base_url("http://g.example/".to_string()),
            "http://g.example"
        );
    }
}
