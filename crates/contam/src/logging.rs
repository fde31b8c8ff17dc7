//! Logger setup for the command line.

use log::LevelFilter;

/// Build the logger. `filter` (from `--log`) wins over `env_filter`
/// (from `RUST_LOG`); with neither, `info` and above are shown.
fn builder(filter: Option<&str>, env_filter: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    match filter.or(env_filter) {
        Some(spec) => builder.parse_filters(spec),
        None => builder.filter_level(LevelFilter::Info),
    };
    builder
}

/// Install the global logger. Later calls are ignored.
pub fn init_logging(filter: Option<&str>) {
    let env_filter = std::env::var("RUST_LOG").ok();
    if builder(filter, env_filter.as_deref()).try_init().is_ok() {
        log::debug!("logging initialized");
    }
}
