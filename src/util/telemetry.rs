//! Tracing subscriber setup for hosts that do not bring their own.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset: admission decisions are logged at
/// debug, so the default keeps only sampler warnings and lifecycle events.
pub const DEFAULT_FILTER: &str = "cpu_admission=info";

/// Install an fmt subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`]. Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Install an fmt subscriber with an explicit filter directive, e.g.
/// `"cpu_admission=debug"` to see every admission decision.
pub fn init_tracing_with(directive: &str) {
    install(EnvFilter::new(directive));
}

fn install(filter: EnvFilter) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
