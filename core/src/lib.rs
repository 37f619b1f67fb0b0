use anyhow::Context;
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::{pattern::PatternEncoder, Encode},
    filter::threshold::ThresholdFilter,
};
use std::backtrace::{Backtrace, BacktraceStatus};

pub mod change_rect;
pub mod constants;
pub mod error;
pub mod events;
pub mod geometry;
pub mod map_cursor;
pub mod map_grid;
pub mod selection;
pub mod transaction;

pub use constants::{GridFlags, HighlightLevel};
pub use error::GridError;
pub use events::{ListenerId, MapGridEvent, MapGridListener};
pub use geometry::{Point, Rect, Size2D};
pub use map_cursor::{MapCursor, MapCursorListener};
pub use map_grid::MapGrid;
pub use selection::SelectionMode;

/// Pattern encoder that appends a backtrace to error records whenever the
/// standard library captures one (`RUST_BACKTRACE` or `RUST_LIB_BACKTRACE`).
#[derive(Debug)]
struct ErrorBacktraceEncoder {
    pattern: PatternEncoder,
}

impl ErrorBacktraceEncoder {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: PatternEncoder::new(pattern),
        }
    }
}

impl Encode for ErrorBacktraceEncoder {
    fn encode(
        &self,
        w: &mut dyn log4rs::encode::Write,
        record: &log::Record<'_>,
    ) -> anyhow::Result<()> {
        if record.level() != log::Level::Error {
            return self.pattern.encode(w, record);
        }
        let backtrace = Backtrace::capture();
        if backtrace.status() != BacktraceStatus::Captured {
            return self.pattern.encode(w, record);
        }
        self.pattern.encode(
            w,
            &record
                .to_builder()
                .args(format_args!("{}\nBacktrace:\n{backtrace}", record.args()))
                .build(),
        )
    }
}

/// Installs the global logger: stderr always, plus `file_path` if given.
///
/// The file receives everything at `log_level`; stderr is filtered by the
/// same threshold.
pub fn initialize_logger(log_level: LevelFilter, file_path: Option<&str>) -> anyhow::Result<()> {
    const LOGGING_PATTERN: &str = "{d} {l} {f}:{L} - {m}\n";

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(ErrorBacktraceEncoder::new(LOGGING_PATTERN)))
        .build();

    let mut config_builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(log_level)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = file_path {
        let logfile = FileAppender::builder()
            .encoder(Box::new(ErrorBacktraceEncoder::new(LOGGING_PATTERN)))
            .build(path)
            .with_context(|| format!("unable to open log file {path}"))?;
        config_builder =
            config_builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    let config = config_builder
        .build(root.build(log_level))
        .context("invalid logger configuration")?;

    let _handle = log4rs::init_config(config)?;

    Ok(())
}

/// Parses a level name such as `"debug"`; unknown names fall back to `Info`.
pub fn parse_level_filter(name: &str) -> LevelFilter {
    name.parse().unwrap_or_else(|_| {
        log::warn!("unknown log level {name:?}, using info");
        LevelFilter::Info
    })
}
