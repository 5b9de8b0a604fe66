//! Diagnostic output setup
//!
//! Every diagnostic goes to stderr through `tracing`, leaving stdout free
//! for the report when `-o -` is used.

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::tty::should_use_colors_with_mode;

/// Install the global subscriber. `RUST_LOG` wins over -v/-q when set.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(should_use_colors_with_mode(config.color))
        .with_target(config.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(config.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(config.verbose >= 3) // Show line numbers for -vvv
        .try_init();

    if installed.is_err() {
        // A subscriber was already set, e.g. by a test harness
        return;
    }

    debug!("reqtrace started with verbosity level: {}", config.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
