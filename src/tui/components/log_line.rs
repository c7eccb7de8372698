use chrono::{DateTime, Local};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::core::message_log::LineKind;

/// `strftime` pattern for the timestamp column.
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Width of the timestamp column, including its trailing space.
const GUTTER: &str = "         ";

/// A stateless component that renders one plain log entry with kind-based styling.
///
/// # Design
///
/// `LogLine` is a **transient component**: the parent `MessageList` creates
/// it each frame for the visible entries. Continuation lines of a multi-line
/// message are indented under the text column so the timestamps line up.
///
/// # Styling
///
/// - **Status** (dark gray, italic): connection lifecycle notices
/// - **Sent** (green): text we put on the wire
/// - **Received** (white): plain text from the server
/// - **Error** (red): transport failures
/// - **Fallback** (yellow): control messages that failed to parse
#[derive(Clone, Copy)]
pub struct LogLine<'a> {
    pub at: &'a DateTime<Local>,
    pub kind: LineKind,
    pub text: &'a str,
}

impl<'a> LogLine<'a> {
    pub fn new(at: &'a DateTime<Local>, kind: LineKind, text: &'a str) -> Self {
        Self { at, kind, text }
    }

    pub fn style(kind: LineKind) -> Style {
        match kind {
            LineKind::Status => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            LineKind::Sent => Style::default().fg(Color::Green),
            LineKind::Received => Style::default().fg(Color::White),
            LineKind::Error => Style::default().fg(Color::Red),
            LineKind::Fallback => Style::default().fg(Color::Yellow),
        }
    }

    fn paragraph(&self) -> Paragraph<'a> {
        let stamp_style = Style::default().fg(Color::DarkGray);
        let style = Self::style(self.kind);
        let stamp = format!("{} ", self.at.format(TIME_FORMAT));

        let mut lines = Vec::new();
        for (i, line) in self.text.split('\n').enumerate() {
            let gutter = if i == 0 {
                Span::styled(stamp.clone(), stamp_style)
            } else {
                Span::raw(GUTTER)
            };
            lines.push(Line::from(vec![gutter, Span::styled(line, style)]));
        }

        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
    }

    /// Rows this entry occupies at `width`.
    ///
    /// Uses the paragraph's own line counter so the prediction matches the
    /// rendered wrap exactly.
    pub fn calculate_height(&self, width: u16) -> u16 {
        if width == 0 {
            return 1;
        }
        let rows = self.paragraph().line_count(width).max(1);
        u16::try_from(rows).unwrap_or(u16::MAX)
    }
}

impl<'a> Widget for LogLine<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.paragraph().render(area, buf);
    }
}
