//! Process-wide log sinks for the CLI and tools.
//!
//! Library code only talks to the `log` facade (or `tracing` spans behind
//! the `tracing` feature); binaries pick one of the sinks below at startup.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Writes one line per record to stderr, timestamped relative to install.
struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = format_line(self.started.elapsed().as_secs_f64(), record);
            let _ = writeln!(std::io::stderr().lock(), "{line}");
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// `  12.345s DEBUG featurefinder_resolve: message`
fn format_line(elapsed_s: f64, record: &Record) -> String {
    format!(
        "{elapsed_s:>8.3}s {:<5} {}: {}",
        record.level(),
        record.target(),
        record.args()
    )
}

/// Install the stderr logger at `level`.
///
/// Only the first call installs anything (concurrent callers wait for it);
/// later calls return `Ok(())` and keep the original level. The first call
/// fails if some other logger was installed before it.
pub fn init_with_level(level: LevelFilter) -> Result<(), SetLoggerError> {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    let mut result = Ok(());
    INSTALLED.get_or_init(|| {
        result = log::set_boxed_logger(Box::new(StderrLogger {
            level,
            started: Instant::now(),
        }))
        .map(|()| log::set_max_level(level));
    });
    result
}

/// Install a `tracing-subscriber` registry filtered by `RUST_LOG`, falling
/// back to `default_filter`. Span closings are reported so resolver timings
/// show up. `log` records are bridged into the same output.
#[cfg(feature = "tracing")]
pub fn init_tracing(default_filter: &str, json: bool) {
    use tracing_subscriber::fmt::{self, format::FmtSpan, time::Uptime};
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .flatten_event(true)
            .with_span_events(FmtSpan::CLOSE)
    });
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_timer(Uptime::default())
            .with_span_events(FmtSpan::CLOSE)
    });
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn line_carries_elapsed_level_and_target() {
        let line = format_line(
            1.5,
            &Record::builder()
                .level(Level::Warn)
                .target("featurefinder_resolve")
                .args(format_args!("triangle mismatch"))
                .build(),
        );
        assert_eq!(line, "   1.500s WARN  featurefinder_resolve: triangle mismatch");
    }

    #[test]
    fn repeated_init_keeps_the_first_level() {
        init_with_level(LevelFilter::Warn).expect("first init");
        init_with_level(LevelFilter::Trace).expect("second init is ignored");
        assert_eq!(log::max_level(), LevelFilter::Warn);
    }

    #[test]
    fn init_error_boxes_into_std_error() {
        // The CLI propagates logger setup failures with `?`.
        fn setup() -> Result<(), Box<dyn std::error::Error>> {
            init_with_level(LevelFilter::Warn)?;
            Ok(())
        }
        setup().expect("logger installed once");
    }
}
