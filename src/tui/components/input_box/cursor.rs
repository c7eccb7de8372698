//! Cursor position tracking for the single-line InputBox.
//!
//! `CursorState` owns the cursor byte offset and the horizontal scroll
//! column. The text itself is owned by `InputBox` and passed in explicitly.

use unicode_width::UnicodeWidthStr;

/// Cursor and scroll state, separated from the text buffer.
pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First display column shown when the text is wider than the box
    pub scroll_col: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_col: 0,
        }
    }

    /// Reset cursor to start (used after the buffer is cleared).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_col = 0;
    }

    /// Display column of the cursor, counting wide characters as two cells.
    pub fn column(&self, buffer: &str) -> u16 {
        let width = buffer[..self.pos].width();
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    /// Shift the horizontal scroll so the cursor stays inside `inner_width` columns.
    pub fn update_scroll(&mut self, buffer: &str, inner_width: u16) {
        if inner_width == 0 {
            self.scroll_col = 0;
            return;
        }
        let col = self.column(buffer);
        if col < self.scroll_col {
            self.scroll_col = col;
        } else if col >= self.scroll_col.saturating_add(inner_width) {
            self.scroll_col = col - inner_width + 1;
        }
    }

    /// Cursor position on screen for a box whose content starts at `origin_x`.
    pub fn screen_x(&self, buffer: &str, origin_x: u16) -> u16 {
        origin_x + self.column(buffer).saturating_sub(self.scroll_col)
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
