//! Logging with colored module prefixes.
//!
//! Provides the `log!` macro for formatted terminal output:
//!
//! ```ignore
//! log!("serve"; "http://{}", addr);
//! log!("pages"; "registered {} pages", count);
//! ```

use colored::{ColoredString, Colorize};
use crossterm::terminal::size;
use std::{
    io::{Write, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log($module, &format!($($arg)*))
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// Automatically truncates long messages to fit terminal width.
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let width = get_terminal_width() as usize;

    // "[module] " occupies module.len() + 3 columns
    let max_msg_len = width.saturating_sub(module.len() + 3);
    let message = truncate_str(message, max_msg_len);

    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" => prefix.bright_blue().bold(),
        "pages" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within max_len bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================
