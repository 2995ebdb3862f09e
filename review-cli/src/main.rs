//! Entry point for the `reviews` command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use env_logger::Env;

#[expect(clippy::print_stderr, reason = "the binary reports fatal errors on stderr")]
fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    match review_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(review_cli::CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("reviews: {err}");
            ExitCode::FAILURE
        }
    }
}
