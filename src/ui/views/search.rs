//! Incremental search overlay.
//!
//! Every edit of the query notifies the controller with
//! [`ViewEvent::QueryChanged`]; the controller ranks the tasks and hands the
//! results back through [`SearchView::set_results`] before the next key is
//! read.

use crate::input::key;
use crate::input::Modifiers;
use crate::tasks::SearchResult;
use crate::ui::renderer::TerminalRenderer;
use crate::ui::theme::Theme;
use crate::ui::view::{Dimensions, Position, View, ViewCore, ViewEvent};
use crate::ui::widgets::styling;
use crate::utils::text_processing::{clip_to_width, display_width, truncate_with_ellipsis};
use log::*;

pub const PROMPT: &str = "❯";
pub const HELP_FOOTER: &str = "Enter: open  Ctrl+Enter: select  Esc: close  ↑/↓: navigate";
pub const MAX_QUERY_LENGTH: usize = 100;
const INPUT_HEIGHT: u16 = 3;
/// Rows used by the input box, the results border, the count and the footer.
const RESERVED_ROWS: u16 = 7;
const MAX_HISTORY: usize = 50;

pub struct SearchView {
    core: ViewCore,
    theme: Theme,
    query: String,
    cursor_position: usize,
    results: Vec<SearchResult>,
    selected_index: usize,
    scroll_offset: usize,
    search_history: Vec<String>,
    history_index: Option<usize>,
}

impl SearchView {
    pub fn new(theme: Theme) -> Self {
        SearchView {
            core: ViewCore::new(),
            theme,
            query: String::new(),
            cursor_position: 0,
            results: vec![],
            selected_index: 0,
            scroll_offset: 0,
            search_history: vec![],
            history_index: None,
        }
    }

    /// Show and focus the view with an initial query. The cursor is placed at
    /// the start or the end of it.
    ///
    pub fn open(&mut self, query: &str, cursor_at_end: bool) {
        self.query = query.chars().take(MAX_QUERY_LENGTH).collect();
        self.cursor_position = if cursor_at_end { self.query_len() } else { 0 };
        self.history_index = None;
        self.show();
        self.focus();
        self.search();
    }

    /// Reset and hide without notifying the controller.
    ///
    pub fn dismiss(&mut self) {
        self.reset();
        self.hide();
    }

    /// Reset, hide and restore the terminal cursor.
    ///
    pub fn close(&mut self, renderer: &mut dyn TerminalRenderer) {
        self.dismiss();
        renderer.hide_cursor();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.selected_index)
    }

    pub fn history(&self) -> &[String] {
        &self.search_history
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.invalidate();
    }

    /// Replace the results and select the first one.
    ///
    pub fn set_results(&mut self, results: Vec<SearchResult>) {
        self.results = results;
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.invalidate();
    }

    pub fn insert_char(&mut self, c: char) {
        if self.query_len() >= MAX_QUERY_LENGTH {
            return;
        }
        let at = self.byte_index(self.cursor_position);
        self.query.insert(at, c);
        self.cursor_position += 1;
        self.search();
    }

    pub fn backspace(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let at = self.byte_index(self.cursor_position);
        self.query.remove(at);
        self.search();
    }

    pub fn delete(&mut self) {
        if self.cursor_position >= self.query_len() {
            return;
        }
        let at = self.byte_index(self.cursor_position);
        self.query.remove(at);
        self.search();
    }

    /// Clear the whole query.
    ///
    pub fn clear_query(&mut self) {
        if self.query.is_empty() {
            return;
        }
        self.query.clear();
        self.cursor_position = 0;
        self.search();
    }

    /// Delete the word before the cursor, along with any whitespace between
    /// it and the cursor.
    ///
    pub fn delete_word(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let chars: Vec<char> = self.query.chars().collect();
        let mut start = self.cursor_position;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let from = self.byte_index(start);
        let to = self.byte_index(self.cursor_position);
        self.query.replace_range(from..to, "");
        self.cursor_position = start;
        self.search();
    }

    pub fn move_cursor_left(&mut self) {
        self.set_cursor(self.cursor_position.saturating_sub(1));
    }

    pub fn move_cursor_right(&mut self) {
        self.set_cursor(self.cursor_position + 1);
    }

    pub fn move_cursor_home(&mut self) {
        self.set_cursor(0);
    }

    pub fn move_cursor_end(&mut self) {
        self.set_cursor(self.query_len());
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.results.len() {
            self.selected_index += 1;
            self.ensure_visible();
            self.invalidate();
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.ensure_visible();
            self.invalidate();
        }
    }

    /// Record the query in the history and pick the selected result.
    ///
    pub fn execute(&mut self) {
        let query = self.query.trim().to_string();
        if !query.is_empty() {
            if self.search_history.last() != Some(&query) {
                self.search_history.push(query.clone());
            }
            if self.search_history.len() > MAX_HISTORY {
                self.search_history.remove(0);
            }
            debug!("Executed search '{}'", query);
        }
        self.history_index = None;
        self.select_current();
    }

    /// Pick the selected result without touching the history.
    ///
    pub fn select_current(&mut self) {
        if let Some(result) = self.selected_result() {
            self.core.notify(ViewEvent::ResultSelected(result.task.id.clone()));
        }
    }

    /// Step back through earlier queries.
    ///
    pub fn history_previous(&mut self) {
        if self.search_history.is_empty() {
            return;
        }
        let index = match self.history_index {
            Some(0) => 0,
            Some(i) => i - 1,
            None => self.search_history.len() - 1,
        };
        self.recall(Some(index));
    }

    /// Step forward through earlier queries, ending on an empty query.
    ///
    pub fn history_next(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.search_history.len() => self.recall(Some(i + 1)),
            Some(_) => self.recall(None),
            None => {}
        }
    }

    fn recall(&mut self, index: Option<usize>) {
        self.history_index = index;
        self.query = index
            .and_then(|i| self.search_history.get(i).cloned())
            .unwrap_or_default();
        self.cursor_position = self.query_len();
        self.search();
    }

    fn reset(&mut self) {
        self.query.clear();
        self.cursor_position = 0;
        self.results.clear();
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.history_index = None;
        self.invalidate();
    }

    fn search(&mut self) {
        self.core.notify(ViewEvent::QueryChanged(self.query.clone()));
        self.invalidate();
    }

    fn set_cursor(&mut self, position: usize) {
        let position = position.min(self.query_len());
        if position != self.cursor_position {
            self.cursor_position = position;
            self.invalidate();
        }
    }

    fn query_len(&self) -> usize {
        self.query.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_index)
            .map_or(self.query.len(), |(i, _)| i)
    }

    fn visible_results(&self) -> usize {
        (self.core.dimensions.height.saturating_sub(RESERVED_ROWS) as usize).max(1)
    }

    fn ensure_visible(&mut self) {
        let visible = self.visible_results();
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible {
            self.scroll_offset = self.selected_index + 1 - visible;
        }
    }

    fn draw_result(&self, renderer: &mut dyn TerminalRenderer, index: usize, at: Position, width: usize) {
        let result = &self.results[index];
        let selected = index == self.selected_index;
        let base = if selected {
            styling::current_row_style(&self.theme)
        } else {
            styling::normal_text_style(&self.theme)
        };
        renderer.write(&" ".repeat(width), at, Some(base));

        let prefix = format!(" {:<6} {} ", result.task.priority_icon, result.task.status_icon);
        let prefix_style = if selected {
            base
        } else {
            base.patch(styling::fg(result.task.priority_color))
        };
        renderer.write(&prefix, at, Some(prefix_style));

        let title_x = at.x + display_width(&prefix) as u16;
        let budget = width.saturating_sub(display_width(&prefix));
        let title = truncate_with_ellipsis(&result.task.title, budget);
        if selected || result.highlights.is_empty() {
            renderer.write(&title, Position::new(title_x, at.y), Some(base));
            return;
        }
        let highlight = base.patch(styling::match_style(&self.theme));
        let style_for = |matched: bool| if matched { highlight } else { base };
        let mut x = title_x;
        let mut segment = String::new();
        let mut segment_matched = false;
        for (offset, c) in title.chars().enumerate() {
            let matched = result
                .highlights
                .iter()
                .any(|&(start, end)| offset >= start && offset < end);
            if matched != segment_matched && !segment.is_empty() {
                renderer.write(&segment, Position::new(x, at.y), Some(style_for(segment_matched)));
                x += display_width(&segment) as u16;
                segment.clear();
            }
            segment_matched = matched;
            segment.push(c);
        }
        if !segment.is_empty() {
            renderer.write(&segment, Position::new(x, at.y), Some(style_for(segment_matched)));
        }
    }

    fn count_line(&self) -> String {
        match self.results.len() {
            0 if self.query.is_empty() => "Type to search".to_string(),
            0 => "No matches".to_string(),
            1 => "1 result".to_string(),
            n => format!("{} results", n),
        }
    }
}

impl View for SearchView {
    fn name(&self) -> &'static str {
        "search"
    }

    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn draw(&mut self, renderer: &mut dyn TerminalRenderer) -> bool {
        let position = self.core.position;
        let dimensions = self.core.dimensions;
        if dimensions.width < 6 || dimensions.height < RESERVED_ROWS + 1 {
            return true;
        }
        renderer.clear_area(position, dimensions, None);
        let width = dimensions.width;
        let border = if self.is_focused() {
            styling::active_border_style(&self.theme)
        } else {
            styling::normal_border_style(&self.theme)
        };

        // Input box
        renderer.draw_box(position, width, INPUT_HEIGHT, Some(border));
        renderer.write(" Search ", position.offset(2, 0), Some(styling::title_style(&self.theme)));
        renderer.write(PROMPT, position.offset(1, 1), Some(styling::title_style(&self.theme)));
        let query_width = (width - 3) as usize;
        let query = clip_to_width(&self.query, query_width);
        renderer.write(&query, position.offset(2, 1), Some(styling::normal_text_style(&self.theme)));

        // Results panel
        let panel = position.offset(0, INPUT_HEIGHT);
        let panel_height = dimensions.height - INPUT_HEIGHT;
        renderer.draw_box(panel, width, panel_height, Some(border));
        let inner_width = (width - 2) as usize;
        let visible = self.visible_results();
        for row in 0..visible {
            let index = self.scroll_offset + row;
            if index >= self.results.len() {
                break;
            }
            self.draw_result(renderer, index, panel.offset(1, 1 + row as u16), inner_width);
        }

        let bottom = position.y + dimensions.height;
        renderer.write(
            &self.count_line(),
            Position::new(position.x + 2, bottom - 3),
            Some(styling::muted_text_style(&self.theme)),
        );
        let footer = truncate_with_ellipsis(HELP_FOOTER, inner_width.saturating_sub(2));
        renderer.write(
            &footer,
            Position::new(position.x + 2, bottom - 2),
            Some(styling::muted_text_style(&self.theme)),
        );

        if self.is_focused() {
            let max_x = position.x + width - 2;
            let before: String = self.query.chars().take(self.cursor_position).collect();
            let cursor_x = (position.x + 2 + display_width(&before) as u16).min(max_x);
            renderer.set_cursor_position(Position::new(cursor_x, position.y + 1));
            renderer.show_cursor();
        }
        true
    }

    fn on_key_press(&mut self, key: &str, modifiers: Modifiers) -> bool {
        if !self.is_focused() {
            return false;
        }
        if modifiers.ctrl {
            match key.to_lowercase().as_str() {
                "enter" => self.select_current(),
                "u" => self.clear_query(),
                "w" => self.delete_word(),
                "a" => self.move_cursor_home(),
                "e" => self.move_cursor_end(),
                "p" => self.history_previous(),
                "n" => self.history_next(),
                _ => return false,
            }
            return true;
        }
        match key {
            key::ENTER => self.execute(),
            key::ESCAPE => {
                self.dismiss();
                self.core.notify(ViewEvent::Close);
            }
            key::LEFT => self.move_cursor_left(),
            key::RIGHT => self.move_cursor_right(),
            key::HOME => self.move_cursor_home(),
            key::END => self.move_cursor_end(),
            key::BACKSPACE => self.backspace(),
            key::DELETE => self.delete(),
            key::UP => self.select_previous(),
            key::DOWN => self.select_next(),
            _ => match key::printable_char(key) {
                Some(c) if !modifiers.alt && !modifiers.meta => self.insert_char(c),
                _ => return false,
            },
        }
        true
    }

    fn on_resize(&mut self, dimensions: Dimensions) {
        self.set_dimensions(dimensions);
        self.ensure_visible();
    }

    fn dispose(&mut self, renderer: &mut dyn TerminalRenderer) {
        renderer.hide_cursor();
        self.reset();
        self.core.dispose();
    }
}
