use tracing_subscriber::{fmt, EnvFilter};

/// Logs are written to stderr, so that stdout belongs to the executor.
/// The filter is read from `NX_COMPAT_LOG`, then `MOON_LOG`.
pub fn init_logging() {
    let directive = std::env::var("NX_COMPAT_LOG")
        .or_else(|_| std::env::var("MOON_LOG"))
        .ok()
        .filter(|value| !value.is_empty() && value != "off")
        .unwrap_or_else(|| "warn".into());

    let filter = EnvFilter::try_new(format!("moon_nx_compat={directive}"))
        .unwrap_or_else(|_| EnvFilter::new("moon_nx_compat=warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
