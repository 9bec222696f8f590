use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use trivia_bot::Settings;
use trivia_bot::settings::LOG_FILE;

/// Install the global subscriber for a play session.
///
/// The level comes from the bot settings unless `RUST_LOG` is set. With file
/// logging enabled, output goes to the log file in `dir` instead of stderr;
/// the returned guard must be held until exit so buffered lines are flushed.
pub fn init(settings: &Settings, dir: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(settings.debug_level.level_filter().into())
    });

    if settings.enable_file_logging {
        let appender = tracing_appender::rolling::never(dir, LOG_FILE);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .try_init();
        Some(guard)
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        None
    }
}
