/// Process-wide command-line argument access
///
/// Binaries parse their own flags with clap; this module keeps the raw
/// argument list around so the logger and other modules can check
/// `--debug-<tag>` style flags without threading them through every call.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Used by binaries and tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Returns a clone to avoid holding the mutex lock
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

/// RPC calls debug mode
pub fn is_debug_rpc_enabled() -> bool {
    has_arg("--debug-rpc")
}

/// Pool analysis debug mode
pub fn is_debug_pool_enabled() -> bool {
    has_arg("--debug-pool")
}

/// Account decoding debug mode
pub fn is_debug_decoder_enabled() -> bool {
    has_arg("--debug-decoder")
}

/// Token metadata debug mode
pub fn is_debug_tokens_enabled() -> bool {
    has_arg("--debug-tokens")
}

/// Startup and CLI debug mode
pub fn is_debug_system_enabled() -> bool {
    has_arg("--debug-system")
}

/// Report writing debug mode
pub fn is_debug_output_enabled() -> bool {
    has_arg("--debug-output")
}

pub fn is_verbose_enabled() -> bool {
    has_arg("--verbose")
}

/// Debug flags that are currently set, for the startup banner
pub fn get_enabled_debug_modes() -> Vec<&'static str> {
    let mut modes = Vec::new();
    if is_debug_rpc_enabled() {
        modes.push("rpc");
    }
    if is_debug_pool_enabled() {
        modes.push("pool");
    }
    if is_debug_decoder_enabled() {
        modes.push("decoder");
    }
    if is_debug_tokens_enabled() {
        modes.push("tokens");
    }
    if is_debug_system_enabled() {
        modes.push("system");
    }
    if is_debug_output_enabled() {
        modes.push("output");
    }
    if is_verbose_enabled() {
        modes.push("verbose");
    }
    modes
}
