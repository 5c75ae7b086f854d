//! Event handling for the application.
//!
//! This module turns terminal input into application events and defines the
//! key bindings shown in the help bar and help screen.

mod handler;
pub mod keys;

use crossterm::event::KeyEvent;

pub use handler::EventHandler;
pub use keys::{get_context_hints, KeyContext, HELP_SECTIONS};

/// An application event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// The tick interval elapsed with no input.
    Tick,
    /// Request to exit the application.
    Quit,
}
