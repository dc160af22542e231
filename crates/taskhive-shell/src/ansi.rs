//! ANSI key codes and cursor-control escape sequences, ported directly from
//! the original's `ansi.go`.

pub const BACKSPACE_1: u8 = 127;
pub const BACKSPACE_2: u8 = 8;
pub const ENTER_1: u8 = b'\r';
pub const ENTER_2: u8 = b'\n';
pub const CTRL_C: u8 = 3;
pub const OPTION_BACKSPACE: u8 = 23; // Ctrl-W
pub const SPACE: u8 = 32;
pub const ESC: u8 = 0x1b;
pub const CMD_BACKSPACE: u8 = 21; // Ctrl-U
pub const HORIZONTAL_TAB: u8 = 9;

pub const SAVE_CURSOR_POS: &[u8] = b"\x1b[s";
pub const RESTORE_CURSOR_POS: &[u8] = b"\x1b[u";
pub const DIM_TEXT: &[u8] = b"\x1b[2m";
pub const RESET_ALL_MODES: &[u8] = b"\x1b[0m";
pub const MOVE_CURSOR_DOWN_LEFT: &[u8] = b"\x1b[1E";
pub const ERASE_ENTIRE_LINE: &[u8] = b"\x1b[2K";
pub const ERASE_CHAR: &[u8] = b"\x08 \x08";
pub const CLEAR_SCREEN: &[u8] = b"\x1b[H\x1b[2J";
pub const CURSOR_LEFT: &[u8] = b"\x1b[D";
pub const CURSOR_RIGHT: &[u8] = b"\x1b[C";
pub const ERASE_DOWN: &[u8] = b"\x1b[J";

/// Moves the cursor to the beginning of the line `n` rows up.
pub fn move_cursor_prev_n_beg(n: usize) -> String {
    format!("\x1b[{n}F")
}

/// Moves the cursor to column `col` (1-based) on the current line.
pub fn move_cursor_to_col(col: usize) -> String {
    format!("\x1b[{col}G")
}
