use std::sync::Mutex;

use slog::Drain;
use slog::Fuse;
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Discard, Level, Logger};

/// Builds the root JSON logger, dropping records below `level`.
pub fn initialize_logger(level: Level) -> Logger {
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);
    let drain = Async::new(drain).build().fuse();
    let drain = drain.filter_level(level).fuse();

    Logger::root(
        drain,
        o!("version" => info::VERSION, "revision" => info::REVISION, "build_timestamp" => info::BUILD_TIMESTAMP),
    )
}

/// Parses a level name such as `debug` or `warn`, falling back to
/// `Info` for anything unrecognized.
pub fn parse_level(name: &str) -> Level {
    name.parse().unwrap_or(Level::Info)
}
