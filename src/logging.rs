use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging. Progress output goes to stdout, so the
/// subscriber writes to stderr.
pub fn init_logging() {
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("facility2osm=info".parse().unwrap()))
        .with(console_layer)
        .init();
}
