//! Filesystem port for writing the catalog tree.

use std::path::Path;

/// Provides filesystem access for writing catalog output.
///
/// Abstracting the filesystem allows tests to capture the full output
/// tree in memory without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Writes the given contents to a file, creating parent directories
    /// and overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
