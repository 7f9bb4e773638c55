#![deny(missing_docs)]
//! Shared logging utilities for the potplay workspace.
//!
//! This crate provides the `potplay_*` logging macros used by the core and
//! the engine, a fallible global logger initializer for terminal and file
//! output, and a minimal test initializer.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::{LevelFilter, SetLoggerError};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use thiserror::Error;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! potplay_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! potplay_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! potplay_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! potplay_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! potplay_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given file, truncating it.
    File(PathBuf),
    /// Write to the terminal.
    Terminal,
    /// Write to both the given file and the terminal.
    Both(PathBuf),
}

/// Errors raised while installing the global logger.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file could not be created.
    #[error("could not create log file {path:?}: {source}")]
    CreateFile {
        /// Requested log file.
        path: PathBuf,
        /// Underlying IO failure.
        source: std::io::Error,
    },
    /// A global logger is already installed.
    #[error("a logger is already installed: {0}")]
    AlreadyInitialized(#[from] SetLoggerError),
}

/// Builds the loggers for `destination` without installing them.
pub fn build_loggers(
    destination: &LogDestination,
    level: LevelFilter,
) -> Result<Vec<Box<dyn SharedLogger>>, LoggingError> {
    let config = build_config();
    let terminal = |config: Config| -> Box<dyn SharedLogger> {
        TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
    };

    let loggers = match destination {
        LogDestination::File(path) => vec![create_file_logger(path, level, config)?],
        LogDestination::Terminal => vec![terminal(config)],
        LogDestination::Both(path) => vec![
            terminal(config.clone()),
            create_file_logger(path, level, config)?,
        ],
    };
    Ok(loggers)
}

/// Installs the global logger at `level` for the given destination.
pub fn initialize(destination: &LogDestination, level: LevelFilter) -> Result<(), LoggingError> {
    CombinedLogger::init(build_loggers(destination, level)?)?;
    Ok(())
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Result<Box<dyn SharedLogger>, LoggingError> {
    let file = File::create(path).map_err(|source| LoggingError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(WriteLogger::new(level, config, file))
}
