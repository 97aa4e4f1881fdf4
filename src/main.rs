//! Binary entrypoint for the `compose-harvest` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    match compose_harvest::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
