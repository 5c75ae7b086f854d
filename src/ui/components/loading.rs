//! Loading indicator component.
//!
//! A spinner shown while a fetch or mutation is in flight. The animation
//! advances on each tick; whether it is shown is decided by the slice
//! loading flags, not by the indicator itself.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

/// Spinner animation frames.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An animated spinner.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    /// Current spinner frame index.
    frame: usize,
}

impl LoadingIndicator {
    /// Create a new loading indicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the spinner animation.
    ///
    /// This should be called on each tick event.
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    /// Get the current spinner frame.
    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.frame]
    }

    /// Spinner followed by a message, for embedding in other widgets.
    pub fn text(&self, message: &str) -> String {
        format!("{} {}", self.spinner_frame(), message)
    }

    /// Render the spinner and message centered in the given area.
    pub fn render(&self, frame: &mut Frame, area: Rect, message: &str) {
        let paragraph = Paragraph::new(self.text(message))
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_frame() {
        let mut loader = LoadingIndicator::new();
        let first = loader.spinner_frame();
        loader.tick();
        assert_ne!(first, loader.spinner_frame());
    }

    #[test]
    fn test_tick_wraps() {
        let mut loader = LoadingIndicator::new();
        for _ in 0..SPINNER_FRAMES.len() {
            loader.tick();
        }
        assert_eq!(loader.frame, 0);
    }

    #[test]
    fn test_text_includes_message() {
        let loader = LoadingIndicator::new();
        assert_eq!(loader.text("Loading tickets..."), "⠋ Loading tickets...");
    }
}
