use tracing_subscriber::EnvFilter;

pub(crate) const LOG_ENV_VAR: &str = "THEATRE_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Logs go to stderr so stdout stays a clean play or protocol surface.
pub(crate) fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
