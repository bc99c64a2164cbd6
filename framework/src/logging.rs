use env_logger::Env;

/// The graphics stack is chatty on `info`; keep it down to warnings unless
/// `RUST_LOG` says otherwise.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn,calloop=warn";

/// Initializes the process-wide logger.
///
/// The `RUST_LOG` environment variable overrides the default filter.
pub fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)).init();
}
