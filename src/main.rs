//! aeropart CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Parses CLI arguments and dispatches the command (via cli::run)
//! 2. Reports errors as a JSON error line and on stderr
//! 3. Exits with non-zero on failure

use aeropart::cli;

fn main() {
    if let Err(e) = cli::run() {
        let _ = cli::write_error(e.code_str(), e.message());
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
