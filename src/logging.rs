// ── Logging ───────────────────────────────────────────────────────────────────
//
// Diagnostics go to stderr through `tracing`.  Filtering follows `RUST_LOG`
// (e.g. `RUST_LOG=cadshell::device=trace` to watch navigator packets); the
// default shows startup milestones and warnings.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.  Call once, first thing in `main()`.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
