//! # ModeBar Component
//!
//! One-line selector showing the three framing modes with their function
//! keys. Exactly the active mode is highlighted.
//!
//! `" F1 Passthrough  F2 AI Chat  F3 AI Control "`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::mode::Mode;
use crate::tui::component::Component;

const fn active_style() -> Style {
    Style::new()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}
const fn inactive_style() -> Style {
    Style::new().fg(Color::DarkGray)
}

pub struct ModeBar {
    pub active: Mode,
}

impl ModeBar {
    pub fn new(active: Mode) -> Self {
        Self { active }
    }

    fn line(&self) -> Line<'static> {
        let mut spans = Vec::with_capacity(Mode::ALL.len() * 2);
        for (i, mode) in Mode::ALL.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let style = if mode == self.active {
                active_style()
            } else {
                inactive_style()
            };
            spans.push(Span::styled(format!(" F{} {} ", i + 1, mode.label()), style));
        }
        Line::from(spans)
    }
}

impl Component for ModeBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// Text of every cell drawn with the active highlight.
    fn highlighted_text(mode: Mode) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut bar = ModeBar::new(mode);
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .filter(|c| c.bg == Color::Cyan)
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_exactly_active_mode_highlighted() {
        assert_eq!(highlighted_text(Mode::Passthrough), " F1 Passthrough ");
        assert_eq!(highlighted_text(Mode::AiChat), " F2 AI Chat ");
        assert_eq!(highlighted_text(Mode::AiControl), " F3 AI Control ");
    }

    #[test]
    fn test_all_modes_listed() {
        let line = ModeBar::new(Mode::AiChat).line();
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("Passthrough"));
        assert!(text.contains("AI Chat"));
        assert!(text.contains("AI Control"));
    }
}
