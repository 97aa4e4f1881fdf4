//! Service context bundling all port trait objects.

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::http::LiveHttpFetcher;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::http::HttpFetcher;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Tests construct
/// a context from in-memory fakes; the CLI wires up the live adapters.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem for writing the catalog tree.
    pub fs: Box<dyn FileSystem>,
    /// HTTP fetcher for pages and script chunks.
    pub http: Box<dyn HttpFetcher>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for clock, filesystem,
    /// and HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn live() -> Result<Self, String> {
        Ok(Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            http: Box::new(LiveHttpFetcher::new()?),
        })
    }
}
