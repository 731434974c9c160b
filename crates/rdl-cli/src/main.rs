use rdl_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable ({:#}); logging to stderr", e);
    }

    if let Err(err) = Cli::run_from_args() {
        eprintln!("rdl error: {:#}", err);
        std::process::exit(1);
    }
}
