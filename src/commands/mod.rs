//! Command dispatch and handlers.

pub mod sync;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Sync { source_config_json, out_dir, commit_file } => {
            sync::run(source_config_json, out_dir, commit_file)
        }
    }
}
