//! # AlertPopup Component
//!
//! Blocking message box drawn over the whole panel. While it is visible the
//! event loop routes every key to "dismiss", so nothing else reacts.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::tui::component::Component;

/// Popup height: message line, blank line, borders.
const POPUP_HEIGHT: u16 = 5;

pub struct AlertPopup<'a> {
    pub message: &'a str,
}

impl<'a> AlertPopup<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl<'a> Component for AlertPopup<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, POPUP_HEIGHT, area);

        // Clear underlying content
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red))
            .title(" Alert ")
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Press any key ").centered())
            .padding(Padding::new(1, 1, 1, 0));

        let paragraph = Paragraph::new(self.message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, overlay);
    }
}

/// A rect `percent_x` wide and `height` rows tall, centered in `outer`.
fn centered_rect(percent_x: u16, height: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(outer.height)),
        Constraint::Fill(1),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
