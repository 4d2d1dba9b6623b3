//! Profiling utilities based on the `puffin` crate.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

#[cfg(feature = "profiling-server")]
use std::sync::OnceLock;

/// Profiling backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingBackend {
    /// Collect scopes in-process only.
    InProcess,
    /// Send profiling data to puffin_viewer via HTTP.
    ///
    /// Needs the `profiling-server` feature; without it this behaves like `InProcess`.
    PuffinHttp,
}

/// Address the puffin server listens on.
pub const SERVER_ADDR: &str = "127.0.0.1:8585";

#[cfg(feature = "profiling-server")]
static PROFILING_SERVER: OnceLock<puffin_http::Server> = OnceLock::new();

/// Enable puffin scopes and start the selected backend.
///
/// # Example
/// ```no_run
/// use sdfplot_core::profiling::{init_profiling, ProfilingBackend};
///
/// init_profiling(ProfilingBackend::PuffinHttp);
/// ```
pub fn init_profiling(backend: ProfilingBackend) {
    puffin::set_scopes_on(true);

    match backend {
        ProfilingBackend::InProcess => {
            tracing::debug!("puffin scopes enabled");
        }
        ProfilingBackend::PuffinHttp => start_server(),
    }
}

#[cfg(feature = "profiling-server")]
fn start_server() {
    if PROFILING_SERVER.get().is_some() {
        return;
    }
    match puffin_http::Server::new(SERVER_ADDR) {
        Ok(server) => {
            tracing::info!("Puffin profiler server started on http://{}", SERVER_ADDR);
            let _ = PROFILING_SERVER.set(server);
        }
        Err(e) => {
            tracing::error!("Failed to start puffin server: {}", e);
        }
    }
}

#[cfg(not(feature = "profiling-server"))]
fn start_server() {
    tracing::warn!("profiling-server feature disabled, collecting puffin scopes in-process only");
}

/// Whether puffin scopes are currently recorded.
pub fn is_enabled() -> bool {
    puffin::are_scopes_on()
}

/// Mark the start of a new frame for profiling.
///
/// Call this once per rendered plot frame.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_process_enables_scopes() {
        init_profiling(ProfilingBackend::InProcess);
        assert!(is_enabled());
        {
            profile_scope!("test_scope");
        }
        new_frame();
    }
}
