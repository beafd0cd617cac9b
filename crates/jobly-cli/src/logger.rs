use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` directives are honored on top of
/// `log_level`; e.g. `RUST_LOG=jobly.sql=debug` prints every statement.
///
/// Events go to stderr so `--json` output stays machine-readable.
pub fn setup_logger(log_level: LevelFilter) {
    let filter = EnvFilter::from_default_env().add_directive(log_level.into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        debug!("Logger has already been set up, continuing...");
    }
}
