//! User interface module.
//!
//! This module holds the view framework and everything it draws with:
//! - The drawing surface (`renderer`) and the view contract (`view`)
//! - Concrete views (task list, task detail, search, help)
//! - Theme management and styling helpers
//! - The projection from domain tasks to renderable view models

type Frame<'a> = ratatui::Frame<'a>;

pub mod renderer;
pub mod theme;
pub mod view;
pub mod viewmodel;
pub mod views;
pub mod widgets;

pub use renderer::{BufferRenderer, TerminalRenderer};
pub use theme::Theme;
pub use view::{Dimensions, Position, View, ViewEvent, ViewState};
pub use viewmodel::TaskViewModel;

/// Copy the canvas into the frame and place the terminal cursor.
///
pub fn present(frame: &mut Frame, canvas: &BufferRenderer) {
    let area = frame.size().intersection(canvas.area());
    let source = canvas.buffer();
    let target = frame.buffer_mut();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            *target.get_mut(x, y) = source.get(x, y).clone();
        }
    }
    if let Some(cursor) = canvas.cursor() {
        if cursor.x < area.right() && cursor.y < area.bottom() {
            frame.set_cursor(cursor.x, cursor.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_present_copies_canvas_and_cursor() {
        let mut canvas = BufferRenderer::new(20, 4);
        canvas.write("hello", Position::new(1, 1), None);
        canvas.set_cursor_position(Position::new(6, 1));
        canvas.show_cursor();

        let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
        terminal.draw(|frame| present(frame, &canvas)).unwrap();
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer.get(1, 1).symbol(), "h");
        assert_eq!(buffer.get(5, 1).symbol(), "o");
        assert_eq!(terminal.get_cursor().unwrap(), (6, 1));
    }

    #[test]
    fn test_present_clips_to_frame() {
        let mut canvas = BufferRenderer::new(40, 10);
        canvas.write("x", Position::new(30, 8), None);
        let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
        assert!(terminal.draw(|frame| present(frame, &canvas)).is_ok());
    }
}
