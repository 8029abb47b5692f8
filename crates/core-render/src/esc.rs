//! Raw terminal escape sequences used by the output path.

pub const RESET: &str = "\x1b[0m";
pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
pub const HIDE_CURSOR: &str = "\x1b[?25l";

/// Position `(1, 1)`.
pub const HOME: &str = "\x1b[1;1H";

/// Sequence written when the engine takes the screen: reset attributes,
/// clear, hide the cursor and home it.
pub fn screen_init() -> String {
    [RESET, CLEAR_SCREEN, HIDE_CURSOR, HOME].concat()
}

/// Inverse of [`screen_init`]: leave attributes normal, the cursor visible
/// and parked on the last row.
pub fn screen_exit(rows: u16) -> String {
    format!("{RESET}{SHOW_CURSOR}\x1b[{};1H", rows.max(1))
}

pub fn cursor_visibility(visible: bool) -> &'static str {
    if visible { SHOW_CURSOR } else { HIDE_CURSOR }
}
