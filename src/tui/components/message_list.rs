//! # MessageList Component
//!
//! Scrollable view of the message log.
//!
//! ## Responsibilities
//!
//! - Display every log entry in arrival order
//! - Manage scrolling and stick-to-bottom
//! - Cache entry heights between frames
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and `&'a MessageLog` (props).
//!
//! Since `Component::render` takes `&mut self`, we can safely mutate the state
//! (including layout cache and scroll state) during the render pass, aligning
//! with Ratatui's `StatefulWidget` pattern.
//!
//! The log is append-only, so once measured an entry's height only changes
//! when the width does. The cache therefore measures new entries and nothing
//! else.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message_log::{EntryBody, LogEntry, MessageLog};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::control_card::ControlCardView;
use crate::tui::components::log_line::LogLine;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Content exists below the viewport (drives the "↓ New" indicator)
    pub has_unseen_content: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            has_unseen_content: false,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    /// Called on scroll-down events so that scrolling past the end re-pins to bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable message log component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub log: &'a MessageLog,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, log: &'a MessageLog) -> Self {
        Self { state, log }
    }
}

/// Rows an entry needs at `width`.
fn entry_height(entry: &LogEntry, width: u16) -> u16 {
    match &entry.body {
        EntryBody::Line { kind, text } => LogLine::new(&entry.at, *kind, text).calculate_height(width),
        EntryBody::Card(card) => ControlCardView::new(&entry.at, card).calculate_height(width),
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let entries = self.log.entries();

        // 1. Update Layout Cache (Internal Mutation)
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(entries.len(), content_width);
        layout.heights.truncate(reusable);
        for entry in entries.iter().skip(layout.heights.len()) {
            layout.heights.push(entry_height(entry, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(entries.len(), content_width);

        let total_height = self.state.layout.total_height();

        // 2. Clamp scroll offset to prevent overscrolling past content.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let entry = &entries[i];
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);

            match &entry.body {
                EntryBody::Line { kind, text } => {
                    scroll_view.render_widget(LogLine::new(&entry.at, *kind, text), rect);
                }
                EntryBody::Card(card) => {
                    scroll_view.render_widget(ControlCardView::new(&entry.at, card), rect);
                }
            }

            y_offset += height;
        }

        // Auto-scroll logic (Mutation)
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // Update auxiliary state
        let max_y = self.state.max_offset();
        self.state.has_unseen_content =
            !self.state.stick_to_bottom && self.state.scroll_state.offset().y < max_y;
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList` because:
/// 1. Event handling requires persistent state (scroll position, stick_to_bottom flag)
/// 2. `MessageList` is recreated each frame with fresh props, so it can't hold state
impl EventHandler for MessageListState {
    type Event = (); // Scrolling is handled internally

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                self.scroll_state.scroll_to_bottom();
                None
            }
            _ => None,
        }
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    entry_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            entry_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights are still valid for a log of `entry_count` at `content_width`.
    pub fn reusable_count(&self, entry_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        // A shorter log means a different log, not an edit
        if entry_count < self.entry_count {
            return 0;
        }
        self.heights.len().min(entry_count)
    }

    pub fn update_metadata(&mut self, entry_count: usize, content_width: u16) {
        self.entry_count = entry_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message_log::LineKind;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn log_with(lines: &[&str]) -> MessageLog {
        let mut log = MessageLog::new();
        for line in lines {
            log.push(LogEntry::line(LineKind::Received, *line));
        }
        log
    }

    fn draw(state: &mut MessageListState, log: &MessageLog, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| MessageList::new(state, log).render(f, f.area()))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_layout_cache_reusable() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![1; 5];
        cache.update_metadata(5, 80);

        // Same everything -> all reusable
        assert_eq!(cache.reusable_count(5, 80), 5);
        // New entry appended -> existing heights stay valid
        assert_eq!(cache.reusable_count(6, 80), 5);
        // Width changed -> nothing reusable
        assert_eq!(cache.reusable_count(5, 40), 0);
        // Fewer entries than cached -> invalid
        assert_eq!(cache.reusable_count(3, 80), 0);
    }

    #[test]
    fn test_prefix_heights_and_total() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![1, 3, 2];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.prefix_heights, vec![1, 4, 6]);
        assert_eq!(cache.total_height(), 6);
    }

    #[test]
    fn test_visible_range_skips_far_entries() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![1; 100];
        cache.rebuild_prefix_heights();
        let range = cache.visible_range(50, 10);
        assert!(range.start > 0);
        assert!(range.end < 100);
        assert!(range.contains(&50) && range.contains(&59));
    }

    #[test]
    fn test_render_shows_entries_in_order() {
        let log = log_with(&["received: first", "received: second"]);
        let mut state = MessageListState::new();
        let text = draw(&mut state, &log, 60, 10);

        let first = text.find("received: first").unwrap();
        let second = text.find("received: second").unwrap();
        assert!(first < second);
        assert_eq!(state.layout.heights, vec![1, 1]);
    }

    #[test]
    fn test_sticks_to_bottom_as_log_grows() {
        let lines: Vec<String> = (0..30).map(|i| format!("received: line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let log = log_with(&refs);
        let mut state = MessageListState::new();

        let text = draw(&mut state, &log, 60, 5);

        assert!(text.contains("line 29"));
        assert!(!text.contains("line 0 "));
        assert!(!state.has_unseen_content);
    }

    #[test]
    fn test_scroll_up_unpins_and_flags_unseen() {
        let lines: Vec<String> = (0..30).map(|i| format!("received: line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let log = log_with(&refs);
        let mut state = MessageListState::new();
        draw(&mut state, &log, 60, 5);

        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        draw(&mut state, &log, 60, 5);
        assert!(state.has_unseen_content);

        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
        draw(&mut state, &log, 60, 5);
        assert!(!state.has_unseen_content);
    }
}
