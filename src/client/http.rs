//! Shared HTTP construction policy for the gallery client.
//!
//! Centralizes cookie-jar wiring, User-Agent, and timeout policy so every
//! gallery request goes out with the same session behavior.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use url::Url;

use super::error::ClientError;

/// Default User-Agent for gallery traffic (identifies the library).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("dccon/{version}")
}

/// Builds the blocking gallery client around `cookie_jar`.
///
/// No request timeout is configured (the blocking client's 30-second default
/// is cleared): a hung remote connection blocks the caller until the OS gives
/// up, and callers needing bounded latency wrap calls externally.
pub(crate) fn build_gallery_http_client(
    user_agent: impl Into<String>,
    cookie_jar: Arc<Jar>,
    gallery_base_url: &str,
) -> Result<Client, ClientError> {
    Client::builder()
        .user_agent(user_agent.into())
        .cookie_provider(cookie_jar)
        .gzip(true)
        .timeout(None::<Duration>)
        .build()
        .map_err(|source| ClientError::network(gallery_base_url, source))
}

/// Primes the session: one GET against the gallery root to pick up the
/// cookies later calls depend on (notably the anti-forgery cookie echoed
/// back in detail requests). The response body is discarded.
pub(crate) fn prime_session(client: &Client, gallery_base_url: &str) -> Result<(), ClientError> {
    let url = root_url(gallery_base_url);
    client
        .get(&url)
        .send()
        .map_err(|source| ClientError::network(&url, source))?;
    Ok(())
}

/// Gallery root with a trailing slash, as sent for priming and `Referer`.
pub(crate) fn root_url(gallery_base_url: &str) -> String {
    format!("{}/", gallery_base_url.trim_end_matches('/'))
}

/// Reads one cookie's value for `url` back out of the jar.
pub(crate) fn cookie_value(jar: &Jar, url: &Url, name: &str) -> Option<String> {
    let header = jar.cookies(url)?;
    let header = header.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
