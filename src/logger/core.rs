/// Filtering rules shared by every log call
use super::config::{get_logger_config, LoggerConfig};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Filtering rules:
/// 1. Errors are always shown
/// 2. Anything above the minimum level is dropped
/// 3. Debug needs --debug-<tag> (or --verbose)
/// 4. Verbose needs --verbose
pub fn should_log(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    if level > config.min_level {
        return false;
    }

    match level {
        LogLevel::Debug => config.is_debug_enabled_for(tag),
        LogLevel::Verbose => config.min_level == LogLevel::Verbose,
        _ => true,
    }
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&get_logger_config(), &tag, level) {
        return;
    }

    super::format::format_and_log(tag, level, message);
}
