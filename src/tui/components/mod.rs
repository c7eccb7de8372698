//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `TitleBar`: Connection state, URL and status line
//! - `ModeBar`: The three framing modes, active one highlighted
//! - `LogLine`: One plain log entry
//! - `ControlCardView`: One device-control card
//! - `AlertPopup`: Blocking alert overlay
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: Single-line text field (used for both URL and message)
//! - `MessageList`: Scrollable log view with layout caching
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props, not by reaching into `App`.
//!
//! ```rust,ignore
//! // Good: Dependencies are explicit
//! ModeBar::new(app.mode).render(frame, area);
//!
//! // Bad: Hidden dependency on global state
//! mode_bar.render(frame, area); // reads from global App
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── mode_bar.rs      (Mode selector)
//! ├── log_line.rs      (Plain log entry renderer)
//! ├── control_card.rs  (Device-control card renderer)
//! ├── message_list.rs  (Scrollable log container)
//! ├── alert.rs         (Alert overlay)
//! └── input_box/       (Single-line text input)
//! ```

pub mod alert;
pub mod control_card;
pub mod input_box;
pub mod log_line;
pub mod message_list;
pub mod mode_bar;
mod title_bar;

pub use alert::AlertPopup;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use mode_bar::ModeBar;
pub use title_bar::TitleBar;
