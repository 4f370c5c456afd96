//! Structured tagged logging
//!
//! Console logger with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-tag debug control via --debug-<tag> flags
//! - --verbose for everything, --quiet for errors only
//!
//! ## Usage
//!
//! ```rust
//! use clmm_analyzer::logger::{self, LogTag};
//!
//! logger::init();
//! logger::info(LogTag::Pool, "Decoded pool");
//! logger::debug(LogTag::Rpc, "getMultipleAccounts: 2 keys"); // Only with --debug-rpc
//! ```
//!
//! The decode and math core never logs; only the fetch layer, the analyzer and
//! the binaries do.

mod config;
mod core;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, init_from_args, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Read logging flags from the command line. Call once at startup.
pub fn init() {
    config::init_from_args();
}

/// Always shown
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Only shown with --debug-<tag>
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Only shown with --verbose
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}
