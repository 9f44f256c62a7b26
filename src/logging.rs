use tracing_subscriber::filter::EnvFilter;

const DEFAULT_FILTER: &str = "ytissues=info,warn";
const DEBUG_FILTER: &str = "ytissues=debug,warn";

/// Installs a stderr subscriber. `RUST_LOG` wins over the `debug` flag.
pub fn init(debug: bool) {
    let fallback = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
