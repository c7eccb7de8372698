//! # InputBox Component
//!
//! A single-line text field. The panel uses two of them: one for the
//! server URL and one for the outgoing message.
//!
//! ## Responsibilities
//!
//! - Capture text input
//! - Handle editing (backspace, delete, cursor movement, paste)
//! - Emit submission on Enter
//! - Show a placeholder while empty and dim itself while disabled
//!
//! ## State Management
//!
//! The buffer is internal state. `title`, `placeholder`, `enabled` and
//! `focused` are props synced from the application state every frame.
//! Cursor position and horizontal scroll are encapsulated in `CursorState`.

mod cursor;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::{CursorState, next_char_boundary, prev_char_boundary};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Offset from area edge to content (border width)
const BORDER_OFFSET: u16 = 1;
/// Rendered height: one content line plus top and bottom borders
pub const INPUT_HEIGHT: u16 = 3;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed). The buffer is left as is.
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

/// Single-line text input component.
///
/// # Props
///
/// - `title`: Border title
/// - `placeholder`: Hint shown while the buffer is empty
/// - `enabled`: Whether the field accepts input
/// - `focused`: Whether the terminal cursor is drawn in this field
pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    pub title: &'static str,
    pub placeholder: &'static str,
    pub enabled: bool,
    pub focused: bool,
    cursor: CursorState,
}

impl InputBox {
    pub fn new(title: &'static str, placeholder: &'static str) -> Self {
        Self {
            buffer: String::new(),
            title,
            placeholder,
            enabled: true,
            focused: false,
            cursor: CursorState::new(),
        }
    }

    /// Create an InputBox pre-filled with `text`, cursor at the end.
    pub fn with_text(title: &'static str, placeholder: &'static str, text: &str) -> Self {
        let mut input = Self::new(title, placeholder);
        input.buffer = text.to_string();
        input.cursor.pos = input.buffer.len();
        input
    }

    /// Empty the buffer (after a message has been handed to the transport).
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        self.cursor.update_scroll(&self.buffer, inner_width);

        let (border_style, text_style) = if !self.enabled {
            (
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
                Style::default().fg(Color::DarkGray),
            )
        } else if self.focused {
            (
                Style::default().fg(Color::Cyan),
                Style::default().fg(Color::Green),
            )
        } else {
            (Style::default(), Style::default().fg(Color::Green))
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(Span::styled(
                self.placeholder,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            Paragraph::new(self.buffer.as_str())
                .style(text_style)
                .scroll((0, self.cursor.scroll_col))
        };

        frame.render_widget(paragraph.block(block), area);

        if self.focused && self.enabled && area.height >= INPUT_HEIGHT {
            let origin_x = area.x + BORDER_OFFSET + CONTENT_PAD_H;
            let cursor_x = self.cursor.screen_x(&self.buffer, origin_x);
            frame.set_cursor_position((cursor_x, area.y + BORDER_OFFSET));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.enabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line field: fold line breaks into spaces
                let flattened: String = text
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .collect();
                self.insert_str(&flattened);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor.pos != 0).then(|| {
                self.cursor.pos = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor.pos != self.buffer.len()).then(|| {
                self.cursor.pos = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => Some(InputEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}
