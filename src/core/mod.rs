//! # Core Application Logic
//!
//! This module contains Wisp's business logic.
//! It knows nothing about terminals or sockets.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │ Transport  │
//!           │  Adapter   │              │ (WebSocket)│
//!           │ (ratatui)  │              │            │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`protocol`]: Outbound prefixes and inbound routing
//! - [`control`]: Typed control payloads and the card built from them
//! - [`message_log`]: The append-only message log
//! - [`mode`]: Framing modes
//! - [`config`]: Settings resolution
//! - [`error`]: Recoverable panel errors

pub mod action;
pub mod config;
pub mod control;
pub mod error;
pub mod message_log;
pub mod mode;
pub mod protocol;
pub mod state;
