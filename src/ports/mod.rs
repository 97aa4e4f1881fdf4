//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the extraction pipeline and an
//! external system (time, HTTP, filesystem). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod http;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use http::{FetchFuture, HttpFetcher};
