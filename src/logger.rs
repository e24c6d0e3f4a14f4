//! Log sinks used by the template session.
//! A session reports every event through a [`LogSink`]. Without one it writes to
//! the console itself; applications that already install a `log` backend can use
//! [`LogFacadeSink`] instead.

use crate::constants::{LOG_CONTEXT, LOG_TARGET};
use log::Level;
use std::io::{self, Write};

/// Destination for the leveled messages emitted by a session.
pub trait LogSink {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes debug, info and warning lines to stdout and error lines to stderr.
///
/// When `verbose` is off only error lines are written.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    pub verbose: bool,
}

impl ConsoleSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Returns true when a line at `level` is written with the current verbosity.
    pub fn should_emit(&self, level: Level) -> bool {
        self.verbose || level == Level::Error
    }

    /// Writes one formatted line, routing errors to `err` and everything else to `out`.
    pub fn write_line<O: Write, E: Write>(
        &self,
        level: Level,
        message: &str,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<()> {
        if !self.should_emit(level) {
            return Ok(());
        }
        let line = format_console_line(level, message);
        match level {
            Level::Error => writeln!(err, "{line}"),
            _ => writeln!(out, "{line}"),
        }
    }

    fn emit(&self, level: Level, message: &str) {
        // Console output failures are not reportable anywhere else.
        let (mut out, mut err) = (io::stdout().lock(), io::stderr().lock());
        let _ = self.write_line(level, message, &mut out, &mut err);
    }
}

impl LogSink for ConsoleSink {
    fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// Forwards every message to the `log` crate under the `jinjautils` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn debug(&self, message: &str) {
        log::debug!(target: LOG_TARGET, "{message}");
    }

    fn info(&self, message: &str) {
        log::info!(target: LOG_TARGET, "{message}");
    }

    fn warning(&self, message: &str) {
        log::warn!(target: LOG_TARGET, "{message}");
    }

    fn error(&self, message: &str) {
        log::error!(target: LOG_TARGET, "{message}");
    }
}

/// Prefixes a message with the session context and the operation that emitted it.
///
/// # Example
/// ```
/// use jinjautils::logger::format_message;
/// assert_eq!(format_message("load", "hi"), "CLS->JinjaUtils.load: -> hi");
/// ```
pub fn format_message(operation: &str, message: &str) -> String {
    format!("{LOG_CONTEXT}.{operation}: -> {message}")
}

/// Adds the padded level column used for console output, e.g. `"INFO    ..."`.
pub fn format_console_line(level: Level, message: &str) -> String {
    let label = match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug | Level::Trace => "DEBUG",
    };
    format!("{label:<8}{message}")
}

/// Installs `env_logger` for the command-line front end.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Error
        })
        .format_target(false)
        .init();
}
