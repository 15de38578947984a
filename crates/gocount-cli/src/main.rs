use gocount_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; a missing state dir is not fatal.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    if let Err(err) = Cli::run_from_args().await {
        eprintln!("gocount error: {:#}", err);
        std::process::exit(1);
    }
}
