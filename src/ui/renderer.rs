//! Drawing surface used by the views.
//!
//! Views never talk to the terminal directly. They emit primitives through
//! [`TerminalRenderer`]; the application backs it with a [`BufferRenderer`],
//! a persistent canvas that survives between frames so that clean views can
//! skip drawing entirely. Each frame the canvas is copied into ratatui's
//! frame buffer, which diffs it against what is already on screen.

use super::view::{Dimensions, Position};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols::line,
};

/// Primitive drawing operations.
///
pub trait TerminalRenderer {
    fn clear(&mut self);
    fn write(&mut self, text: &str, position: Position, style: Option<Style>);
    /// Write text and blank the remainder of the row.
    fn write_line(&mut self, text: &str, position: Position, style: Option<Style>);
    fn draw_box(&mut self, position: Position, width: u16, height: u16, style: Option<Style>);
    fn set_cursor_position(&mut self, position: Position);
    fn show_cursor(&mut self);
    fn hide_cursor(&mut self);

    /// Blank a rectangle.
    fn clear_area(&mut self, position: Position, dimensions: Dimensions, style: Option<Style>) {
        let blank = " ".repeat(dimensions.width as usize);
        for row in 0..dimensions.height {
            self.write(&blank, position.offset(0, row), style);
        }
    }
}

/// Every write fully defines the cells it touches, so leftovers from an
/// earlier frame never bleed through.
fn cell_style(style: Option<Style>) -> Style {
    Style::reset().patch(style.unwrap_or_default())
}

/// Renderer writing into an in-memory ratatui buffer.
///
pub struct BufferRenderer {
    buffer: Buffer,
    cursor: Position,
    cursor_visible: bool,
}

impl BufferRenderer {
    pub fn new(width: u16, height: u16) -> Self {
        BufferRenderer {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            cursor: Position::default(),
            cursor_visible: false,
        }
    }

    /// Resize the canvas. Existing content is discarded.
    ///
    pub fn resize(&mut self, width: u16, height: u16) {
        self.buffer = Buffer::empty(Rect::new(0, 0, width, height));
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn area(&self) -> Rect {
        self.buffer.area
    }

    /// Return the cursor position if the cursor is visible.
    ///
    pub fn cursor(&self) -> Option<Position> {
        self.cursor_visible.then_some(self.cursor)
    }

    /// Return a row of the canvas as plain text with trailing blanks trimmed.
    ///
    pub fn row_text(&self, y: u16) -> String {
        let area = self.buffer.area;
        if y >= area.height {
            return String::new();
        }
        let mut row = String::new();
        for x in 0..area.width {
            row.push_str(self.buffer.get(x, y).symbol());
        }
        row.trim_end().to_string()
    }

    /// Return the style of a single cell.
    ///
    pub fn style_at(&self, x: u16, y: u16) -> Style {
        self.buffer.get(x, y).style()
    }

    fn max_width(&self, position: Position) -> Option<usize> {
        let area = self.buffer.area;
        if position.x >= area.width || position.y >= area.height {
            return None;
        }
        Some((area.width - position.x) as usize)
    }
}

impl TerminalRenderer for BufferRenderer {
    fn clear(&mut self) {
        self.buffer.reset();
    }

    fn write(&mut self, text: &str, position: Position, style: Option<Style>) {
        if let Some(max_width) = self.max_width(position) {
            self.buffer
                .set_stringn(position.x, position.y, text, max_width, cell_style(style));
        }
    }

    fn write_line(&mut self, text: &str, position: Position, style: Option<Style>) {
        let Some(max_width) = self.max_width(position) else {
            return;
        };
        let style = cell_style(style);
        let (end_x, _) = self
            .buffer
            .set_stringn(position.x, position.y, text, max_width, style);
        let right = self.buffer.area.width;
        for x in end_x..right {
            self.buffer.get_mut(x, position.y).set_symbol(" ").set_style(style);
        }
    }

    fn draw_box(&mut self, position: Position, width: u16, height: u16, style: Option<Style>) {
        if width < 2 || height < 2 {
            return;
        }
        let style = style.unwrap_or_default();
        let right = position.x + width - 1;
        let bottom = position.y + height - 1;
        let horizontal = line::HORIZONTAL.repeat((width - 2) as usize);

        let top = format!("{}{}{}", line::TOP_LEFT, horizontal, line::TOP_RIGHT);
        let base = format!("{}{}{}", line::BOTTOM_LEFT, horizontal, line::BOTTOM_RIGHT);
        self.write(&top, position, Some(style));
        self.write(&base, Position::new(position.x, bottom), Some(style));
        for y in position.y + 1..bottom {
            self.write(line::VERTICAL, Position::new(position.x, y), Some(style));
            self.write(line::VERTICAL, Position::new(right, y), Some(style));
        }
    }

    fn set_cursor_position(&mut self, position: Position) {
        self.cursor = position;
    }

    fn show_cursor(&mut self) {
        self.cursor_visible = true;
    }

    fn hide_cursor(&mut self) {
        self.cursor_visible = false;
    }
}
