//! HTTP port for fetching remote text payloads.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

/// Boxed future type alias used by [`HttpFetcher`] to keep the trait dyn-compatible.
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Fetches text documents over HTTP.
///
/// The catalog site serves HTML pages and compiled JS chunks; both are
/// consumed as UTF-8 text. Implementations must fail on non-success
/// status codes and on timeout so callers can skip the affected entry.
pub trait HttpFetcher: Send + Sync {
    /// Fetches the document at `url` and returns its body as text.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, timeout, or a non-2xx status.
    fn fetch(&self, url: &str) -> FetchFuture<'_>;
}
