/// Logger configuration derived from command-line flags
use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::{get_cmd_args, has_arg};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Messages above this level are dropped (Debug still needs a tag flag)
    pub min_level: LogLevel,
    /// Tags named by --debug-<tag>
    pub debug_tags: HashSet<String>,
    pub use_colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Debug,
            debug_tags: HashSet::new(),
            use_colors: true,
        }
    }
}

impl LoggerConfig {
    /// Build from raw arguments (`--quiet`, `--verbose`, `--no-color`, `--debug-<tag>`)
    pub fn from_args(args: &[String]) -> Self {
        let min_level = if args.iter().any(|a| a == "--quiet") {
            LogLevel::Error
        } else if args.iter().any(|a| a == "--verbose") {
            LogLevel::Verbose
        } else {
            LogLevel::Debug
        };

        let debug_tags = args
            .iter()
            .filter_map(|a| a.strip_prefix("--debug-"))
            .map(|tag| tag.to_lowercase())
            .collect();

        Self {
            min_level,
            debug_tags,
            use_colors: !args.iter().any(|a| a == "--no-color"),
        }
    }

    pub fn is_debug_enabled_for(&self, tag: &LogTag) -> bool {
        self.min_level == LogLevel::Verbose || self.debug_tags.contains(tag.to_debug_key())
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn set_logger_config(config: LoggerConfig) {
    match LOGGER_CONFIG.write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

pub fn init_from_args() {
    let config = LoggerConfig::from_args(&get_cmd_args());
    if has_arg("--no-color") {
        colored::control::set_override(false);
    }
    set_logger_config(config);
}
