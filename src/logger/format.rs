//! Console formatting with ANSI colors and text wrapping
//!
//! Broken pipes (e.g. `clmm-analyzer ... | head`) end the process quietly.

use super::config::get_logger_config;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 8;
const LEVEL_WIDTH: usize = 7;
const BRACKET_SPACE_WIDTH: usize = 3;
const TOTAL_PREFIX_WIDTH: usize = TAG_WIDTH + LEVEL_WIDTH + BRACKET_SPACE_WIDTH * 2;

/// Maximum line length before wrapping
const MAX_LINE_LENGTH: usize = 145;

pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let use_colors = get_logger_config().use_colors;
    let time = Local::now().format("%H:%M:%S").to_string();

    let base_line = if use_colors {
        format!(
            "{} [{}] [{}] ",
            time.dimmed(),
            format_tag(&tag),
            format_level(level)
        )
    } else {
        format!(
            "{} [{:<tw$}] [{:<lw$}] ",
            time,
            tag.to_plain_string(),
            level.as_str(),
            tw = TAG_WIDTH,
            lw = LEVEL_WIDTH
        )
    };

    let base_length = strip_ansi_codes(&base_line).len();
    let available_space = MAX_LINE_LENGTH.saturating_sub(base_length).max(50);
    let chunks = wrap_text(message, available_space);

    let mut lines = chunks.iter();
    if let Some(first) = lines.next() {
        print_stdout_safe(&format!("{}{}", base_line, first));
    }

    let continuation_prefix = " ".repeat(time.len() + 1 + TOTAL_PREFIX_WIDTH);
    for chunk in lines {
        print_stdout_safe(&format!("{}{}", continuation_prefix, chunk));
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Rpc => label.bright_cyan().bold(),
        LogTag::Pool => label.bright_blue().bold(),
        LogTag::Decoder => label.bright_magenta().bold(),
        LogTag::Tokens => label.bright_green().bold(),
        LogTag::Output => label.bright_white().bold(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.bright_yellow().bold(),
        LogLevel::Debug | LogLevel::Verbose => label.dimmed(),
        LogLevel::Info => label.white().bold(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    if let Err(e) = writeln!(stdout(), "{}", message) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
    if let Err(e) = stdout().flush() {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
    }
}

/// Remove ANSI color codes from text
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::new();
    let mut in_escape = false;

    for ch in text.chars() {
        if ch == '\x1b' {
            in_escape = true;
        } else if in_escape && ch == 'm' {
            in_escape = false;
        } else if !in_escape {
            result.push(ch);
        }
    }
    result
}

/// Wrap text at word boundaries, respecting existing newlines.
/// Words longer than `max_width` (addresses, sqrt prices) are hard-split.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for line in text.split('\n') {
        if strip_ansi_codes(line).len() <= max_width {
            result.push(line.to_string());
            continue;
        }

        let mut current_line = String::new();
        for word in line.split_whitespace() {
            let word_len = strip_ansi_codes(word).chars().count();
            let current_len = strip_ansi_codes(&current_line).chars().count();

            if word_len > max_width {
                if !current_line.is_empty() {
                    result.push(std::mem::take(&mut current_line));
                }
                let chars: Vec<char> = word.chars().collect();
                result.extend(chars.chunks(max_width).map(|c| c.iter().collect::<String>()));
            } else if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_len + word_len + 1 <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current_line, word.to_string()));
            }
        }

        if !current_line.is_empty() {
            result.push(current_line);
        }
    }

    if result.is_empty() {
        result.push(String::new());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes() {
        let colored = "\x1b[1;31mERROR\x1b[0m done";
        assert_eq!(strip_ansi_codes(colored), "ERROR done");
    }

    #[test]
    fn test_wrap_text_word_boundaries() {
        let chunks = wrap_text("alpha beta gamma delta", 11);
        assert_eq!(chunks, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn test_wrap_text_splits_long_words_and_keeps_newlines() {
        let chunks = wrap_text("abcdefghij\nxy", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij", "xy"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
