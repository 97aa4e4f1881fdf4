//! `compose-harvest sync` command.

use std::path::Path;

use crate::config::SourceConfig;
use crate::context::ServiceContext;
use crate::pipeline;

/// Execute the `sync` command.
///
/// Parses the source configuration, wires up live adapters, and drives
/// the extraction pipeline to completion on a current-thread runtime.
///
/// # Errors
///
/// Returns an error string when the configuration is invalid, the
/// runtime cannot be built, or the pipeline hits a fatal condition.
pub fn run(source_config_json: &str, out_dir: &Path, commit_file: &Path) -> Result<(), String> {
    let config = SourceConfig::from_json(source_config_json)?;
    let ctx = ServiceContext::live()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to build async runtime: {e}"))?;

    runtime.block_on(pipeline::run(&ctx, &config, out_dir, commit_file))
}
