//! # ControlCardView Component
//!
//! Renders a parsed device-control command as a bordered card, one block
//! per device present in the payload, in the fixed order fan, light, curtain.
//!
//!   `╭─ ⚙ AI control command · 12:00:05 ─╮`
//!   `│ ▸ 风扇                             │`
//!   `│   开关: on                         │`
//!   `│   风速: 3                          │`
//!   `│   理由: it is hot                  │`
//!   `│ ▸ 窗帘                             │`
//!   `│   开关: off                        │`
//!   `│   理由: -                          │`
//!   `╰────────────────────────────────────╯`

use chrono::{DateTime, Local};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::control::ControlCard;
use crate::tui::components::log_line::TIME_FORMAT;

/// Horizontal padding (per side) inside the bordered view.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal overhead: borders (2) + padding (2 × CONTENT_PAD_H).
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical overhead: top border + bottom border.
const VERTICAL_OVERHEAD: u16 = 2;

// ─── Styles ──────────────────────────────────────────────────────────
// Yellow = the command itself, white = field values.

const fn card_style() -> Style {
    Style::new().fg(Color::Yellow)
}
const fn device_style() -> Style {
    Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}
const fn label_style() -> Style {
    Style::new().fg(Color::DarkGray)
}
const fn value_style() -> Style {
    Style::new().fg(Color::White)
}

pub struct ControlCardView<'a> {
    pub at: &'a DateTime<Local>,
    pub card: &'a ControlCard,
}

impl<'a> ControlCardView<'a> {
    pub fn new(at: &'a DateTime<Local>, card: &'a ControlCard) -> Self {
        Self { at, card }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let card: &'a ControlCard = self.card;
        let label_width = card
            .blocks
            .iter()
            .flat_map(|b| b.fields.iter())
            .map(|(label, _)| label.width())
            .max()
            .unwrap_or(0);

        let mut lines = Vec::with_capacity(card.line_count());
        for block in &card.blocks {
            lines.push(Line::from(Span::styled(
                format!("▸ {}", block.label),
                device_style(),
            )));
            for (label, value) in &block.fields {
                let pad = " ".repeat(label_width.saturating_sub(label.width()));
                lines.push(Line::from(vec![
                    Span::styled(format!("  {label}{pad}: "), label_style()),
                    Span::styled(value.as_str(), value_style()),
                ]));
            }
        }
        lines
    }

    fn title(&self) -> String {
        format!("⚙ {} · {}", self.card.heading, self.at.format(TIME_FORMAT))
    }

    /// Calculate height needed to render this card at the given width.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let rows = Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        u16::try_from(rows)
            .unwrap_or(u16::MAX)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

impl<'a> Widget for ControlCardView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let block = Block::bordered()
            .title(self.title())
            .border_type(BorderType::Rounded)
            .border_style(card_style())
            .title_style(card_style().add_modifier(Modifier::BOLD))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
