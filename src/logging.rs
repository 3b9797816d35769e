use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let to_stdout = config.target == "stdout";

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match (config.format.as_str(), to_stdout) {
        ("json", true) => builder.json().with_writer(std::io::stdout).try_init(),
        ("json", false) => builder.json().with_writer(std::io::stderr).try_init(),
        ("compact", true) => builder.compact().with_writer(std::io::stdout).try_init(),
        ("compact", false) => builder.compact().with_writer(std::io::stderr).try_init(),
        (_, true) => builder.with_writer(std::io::stdout).try_init(),
        (_, false) => builder.with_writer(std::io::stderr).try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
