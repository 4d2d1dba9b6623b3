//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Install a fmt subscriber reading its filter from `RUST_LOG`.
///
/// Falls back to [`DEFAULT_FILTER`]. Calling this more than once is harmless.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Install a fmt subscriber with an explicit filter directive string.
///
/// # Example
/// ```no_run
/// sdfplot_core::logging::init_with_filter("sdfplot_render=trace,wgpu_core=info");
/// ```
pub fn init_with_filter(directives: &str) {
    install(EnvFilter::new(directives));
}

fn install(filter: EnvFilter) {
    // A subscriber may already be installed by the host or another test.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
