//! 4×20 character frame buffer.
//!
//! Stands in for the LCD on host and in tests. On target the firmware
//! mirrors the frame to the console whenever it changes.

use super::Display;

pub const DISPLAY_ROWS: usize = 4;
pub const DISPLAY_COLS: usize = 20;

/// In-memory character display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFrame {
    cells: [[u8; DISPLAY_COLS]; DISPLAY_ROWS],
    col: usize,
    row: usize,
    backlight: bool,
    clears: u32,
}

impl TextFrame {
    pub const fn new() -> Self {
        Self {
            cells: [[b' '; DISPLAY_COLS]; DISPLAY_ROWS],
            col: 0,
            row: 0,
            backlight: true,
            clears: 0,
        }
    }

    /// Row contents with trailing blanks removed. Out-of-range rows are empty.
    pub fn line(&self, row: usize) -> &str {
        let Some(cells) = self.cells.get(row) else {
            return "";
        };
        let end = cells.iter().rposition(|&c| c != b' ').map_or(0, |p| p + 1);
        core::str::from_utf8(&cells[..end]).unwrap_or("")
    }

    #[inline]
    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Number of `clear` calls so far.
    #[inline]
    pub fn clears(&self) -> u32 {
        self.clears
    }
}

impl Default for TextFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TextFrame {
    fn clear(&mut self) {
        self.cells = [[b' '; DISPLAY_COLS]; DISPLAY_ROWS];
        self.col = 0;
        self.row = 0;
        self.clears = self.clears.wrapping_add(1);
    }

    fn goto(&mut self, col: u8, row: u8) {
        self.col = (col.max(1) - 1) as usize;
        self.row = (row.max(1) - 1) as usize;
    }

    fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            if self.row >= DISPLAY_ROWS || self.col >= DISPLAY_COLS {
                break;
            }
            // ASCII only, like the HD44780 character ROM
            self.cells[self.row][self.col] = if b.is_ascii() { b } else { b'?' };
            self.col += 1;
        }
    }

    fn set_backlight(&mut self, on: bool) {
        self.backlight = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_at_position() {
        let mut frame = TextFrame::new();
        frame.goto(3, 2);
        frame.write_str("abc");
        assert_eq!(frame.line(1), "  abc");
        assert_eq!(frame.line(0), "");
    }

    #[test]
    fn test_clips_at_right_edge() {
        let mut frame = TextFrame::new();
        frame.goto(18, 1);
        frame.write_str("123456");
        assert_eq!(frame.line(0).len(), DISPLAY_COLS);
        assert!(frame.line(0).ends_with("123"));
    }

    #[test]
    fn test_clear_resets_cells() {
        let mut frame = TextFrame::new();
        frame.write_str("x");
        frame.clear();
        assert_eq!(frame.line(0), "");
        assert_eq!(frame.clears(), 1);
    }
}
