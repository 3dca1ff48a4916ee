//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use poisim_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "fatal errors are reported on stderr before exiting"
)]
fn main() {
    match poisim_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("poisim: {err}");
            std::process::exit(1);
        }
    }
}
