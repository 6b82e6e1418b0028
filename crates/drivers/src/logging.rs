use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "recipe_book=info";

/// Logs go to stderr so command output on stdout stays clean.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
