//! Multi-line text editor component.
//!
//! Used for ticket descriptions and the comment composer. Columns are counted
//! in characters, and the viewport scrolls to keep the cursor visible.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

/// A multi-line text editor component.
#[derive(Debug, Clone)]
pub struct TextEditor {
    /// Lines of text content.
    lines: Vec<String>,
    /// Current line (0-indexed).
    row: usize,
    /// Current column within the line, in characters.
    col: usize,
    /// First visible line.
    scroll: usize,
    /// Placeholder text shown when empty.
    placeholder: String,
}

impl TextEditor {
    /// Create an empty editor.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            scroll: 0,
            placeholder: String::new(),
        }
    }

    /// Set the placeholder text.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Get the current content as a string.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether the content is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Discard all content.
    pub fn clear(&mut self) {
        *self = Self::new().with_placeholder(std::mem::take(&mut self.placeholder));
    }

    /// Cursor position as (line, column).
    #[cfg(test)]
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Get the number of lines.
    #[cfg(test)]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_chars(&self) -> usize {
        self.lines[self.row].chars().count()
    }

    fn byte_index(&self, col: usize) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the content was modified.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_index(self.col);
                self.lines[self.row].insert(at, c);
                self.col += 1;
                true
            }
            (KeyCode::Enter, KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_index(self.col);
                let rest = self.lines[self.row].split_off(at);
                self.lines.insert(self.row + 1, rest);
                self.row += 1;
                self.col = 0;
                true
            }
            (KeyCode::Backspace, _) => self.delete_backward(),
            (KeyCode::Delete, _) => self.delete_forward(),
            (KeyCode::Left, _) => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.line_chars();
                }
                false
            }
            (KeyCode::Right, _) => {
                if self.col < self.line_chars() {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
                false
            }
            (KeyCode::Up, _) => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.line_chars());
                }
                false
            }
            (KeyCode::Down, _) => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(self.line_chars());
                }
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.col = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.col = self.line_chars();
                false
            }
            // Ctrl+U - delete line content before cursor
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.col == 0 {
                    return false;
                }
                let at = self.byte_index(self.col);
                self.lines[self.row].replace_range(..at, "");
                self.col = 0;
                true
            }
            _ => false,
        }
    }

    fn delete_backward(&mut self) -> bool {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_index(self.col);
            self.lines[self.row].remove(at);
            true
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_chars();
            self.lines[self.row].push_str(&current);
            true
        } else {
            false
        }
    }

    fn delete_forward(&mut self) -> bool {
        if self.col < self.line_chars() {
            let at = self.byte_index(self.col);
            self.lines[self.row].remove(at);
            true
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
            true
        } else {
            false
        }
    }

    /// Render the editor inside a bordered block.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, title: &str, focused: bool) {
        let visible_height = area.height.saturating_sub(2) as usize;
        if visible_height > 0 {
            if self.row < self.scroll {
                self.scroll = self.row;
            }
            if self.row >= self.scroll + visible_height {
                self.scroll = self.row + 1 - visible_height;
            }
        }

        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused));

        let paragraph = if self.content().is_empty() && !self.placeholder.is_empty() {
            Paragraph::new(self.placeholder.as_str()).style(Style::default().fg(theme::MUTED))
        } else {
            let lines: Vec<Line> = self
                .lines
                .iter()
                .enumerate()
                .skip(self.scroll)
                .take(visible_height)
                .map(|(i, line)| {
                    if focused && i == self.row {
                        Line::from(line.as_str()).style(Style::default().bg(Color::Rgb(40, 40, 40)))
                    } else {
                        Line::from(line.as_str())
                    }
                })
                .collect();
            Paragraph::new(lines)
        };

        frame.render_widget(paragraph.block(block), area);

        if focused {
            let x = area.x + 1 + self.col as u16;
            let y = area.y + 1 + (self.row - self.scroll) as u16;
            if y < area.bottom().saturating_sub(1) && x < area.right().saturating_sub(1) {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
    }
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::new()
    }
}
