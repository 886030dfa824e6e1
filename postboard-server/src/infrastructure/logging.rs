use tracing_subscriber::{EnvFilter, fmt};

/// `LOG_FORMAT=pretty` switches from JSON lines to human-readable output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,postboard_server=debug"));
    let pretty = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("pretty"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let _ = if pretty {
        builder.try_init()
    } else {
        builder.json().try_init()
    };
}
