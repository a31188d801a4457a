//! ANSI sequence helpers used by the renderer and the shell.
//!
//! Wrapping the handful of sequences we emit keeps call sites from
//! hand-rolling escape codes. All functions return owned `String`s or
//! static slices callers can write directly to stdout.

const CSI: &str = "\x1b[";

/// Move the cursor to an absolute 1-based `row` and `column`.
pub fn move_to(row: u16, column: u16) -> String {
    format!("{CSI}{row};{column}H")
}

/// Clear the entire screen and home the cursor.
pub fn clear_screen() -> &'static str {
    "\x1b[2J\x1b[H"
}

/// Enable reverse-video emphasis for subsequent text.
pub fn reverse_on() -> &'static str {
    "\x1b[7m"
}

/// Return to normal (non-reversed) rendering.
pub fn reverse_off() -> &'static str {
    "\x1b[27m"
}
