//! Binary entrypoint for the `ght` CLI.

use std::process::ExitCode;

use ght::error::GhtError;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Recording is handled in commands::dispatch via GHT_RECORD=<dir>.
    match ght::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(GhtError::Cli(err)) => {
            // Prints help/version to stdout and usage errors to stderr.
            let _ = err.print();
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
