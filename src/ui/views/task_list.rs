//! Scrollable task list.

use crate::input::key;
use crate::input::Modifiers;
use crate::ui::renderer::TerminalRenderer;
use crate::ui::theme::Theme;
use crate::ui::view::{Position, View, ViewCore, ViewEvent};
use crate::ui::viewmodel::TaskViewModel;
use crate::ui::widgets::styling;
use crate::utils::text_processing::{truncate_with_ellipsis, word_wrap};
use ratatui::style::Style;
use serde::{Deserialize, Serialize};

/// Rows taken by the header, the status line and the bottom border.
pub const RESERVED_ROWS: u16 = 3;
pub const TAG_COLUMN_WIDTH: usize = 15;
const LINE_NUMBER_WIDTH: usize = 4;
const STATUS_WIDTH: usize = 2;
const PRIORITY_WIDTH: usize = 7;

/// Per-list display options.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    pub show_line_numbers: bool,
    pub show_priority: bool,
    pub show_status: bool,
    pub show_tags: bool,
    pub wrap_text: bool,
    pub highlight_current_line: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            show_line_numbers: false,
            show_priority: true,
            show_status: true,
            show_tags: true,
            wrap_text: false,
            highlight_current_line: true,
        }
    }
}

impl ListOptions {
    /// Width of the columns drawn before the title.
    ///
    pub fn prefix_width(&self) -> usize {
        let mut width = 0;
        if self.show_line_numbers {
            width += LINE_NUMBER_WIDTH;
        }
        if self.show_status {
            width += STATUS_WIDTH;
        }
        if self.show_priority {
            width += PRIORITY_WIDTH;
        }
        width
    }

    /// Width left for the title in a row of `total_width` cells.
    ///
    pub fn title_width(&self, total_width: usize) -> usize {
        let tags = if self.show_tags { TAG_COLUMN_WIDTH } else { 0 };
        total_width.saturating_sub(self.prefix_width() + tags)
    }
}

/// Fit a title into `width` cells, either by truncation or by keeping the
/// first wrapped line.
///
pub fn fit_title(title: &str, width: usize, wrap: bool) -> String {
    if wrap {
        let first = word_wrap(title, width).into_iter().next().unwrap_or_default();
        if first.chars().count() < title.chars().count() {
            return truncate_with_ellipsis(&format!("{}...", first), width);
        }
        return first;
    }
    truncate_with_ellipsis(title, width)
}

pub struct TaskListView {
    core: ViewCore,
    theme: Theme,
    options: ListOptions,
    title: String,
    tasks: Vec<TaskViewModel>,
    selected_index: usize,
    scroll_offset: usize,
    visual_anchor: Option<usize>,
}

impl TaskListView {
    pub fn new(theme: Theme, options: ListOptions) -> Self {
        TaskListView {
            core: ViewCore::new(),
            theme,
            options,
            title: "Tasks".to_string(),
            tasks: vec![],
            selected_index: 0,
            scroll_offset: 0,
            visual_anchor: None,
        }
    }

    /// Replace the list, keeping the selection index in range.
    ///
    pub fn set_tasks(&mut self, tasks: Vec<TaskViewModel>) {
        self.tasks = tasks;
        self.selected_index = self.clamp_index(self.selected_index);
        if let Some(anchor) = self.visual_anchor {
            self.visual_anchor = Some(self.clamp_index(anchor));
        }
        self.ensure_visible();
        self.invalidate();
    }

    pub fn tasks(&self) -> &[TaskViewModel] {
        &self.tasks
    }

    pub fn selected_task(&self) -> Option<&TaskViewModel> {
        self.tasks.get(self.selected_index)
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_title(&mut self, title: &str) {
        if self.title != title {
            self.title = title.to_string();
            self.invalidate();
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.invalidate();
    }

    /// Number of task rows that fit in the view.
    ///
    pub fn visible_lines(&self) -> usize {
        (self.core.dimensions.height.saturating_sub(RESERVED_ROWS) as usize).max(1)
    }

    /// Select a row by index, clamped into range.
    ///
    pub fn select(&mut self, index: usize) {
        self.selected_index = self.clamp_index(index);
        self.ensure_visible();
        self.invalidate();
    }

    /// Select the task with the given id. Returns false if it is not listed.
    ///
    pub fn select_id(&mut self, id: &str) -> bool {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(index) => {
                self.select(index);
                true
            }
            None => false,
        }
    }

    /// Move the selection by `delta` rows.
    ///
    pub fn move_by(&mut self, delta: i64) {
        let target = (self.selected_index as i64).saturating_add(delta).max(0);
        self.select(target as usize);
    }

    pub fn move_down(&mut self) {
        self.move_by(1);
    }

    pub fn move_up(&mut self) {
        self.move_by(-1);
    }

    pub fn move_to_start(&mut self) {
        self.select(0);
    }

    pub fn move_to_end(&mut self) {
        self.select(self.tasks.len().saturating_sub(1));
    }

    pub fn page_down(&mut self) {
        self.move_by(self.visible_lines() as i64);
    }

    pub fn page_up(&mut self) {
        self.move_by(-(self.visible_lines() as i64));
    }

    /// Adjust the scroll offset so the selected row is on screen.
    ///
    pub fn ensure_visible(&mut self) {
        let visible = self.visible_lines();
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible {
            self.scroll_offset = self.selected_index + 1 - visible;
        }
        let max_offset = self.tasks.len().saturating_sub(visible);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Start a visual selection anchored at the current row.
    ///
    pub fn start_visual(&mut self) {
        self.visual_anchor = Some(self.selected_index);
        self.invalidate();
    }

    pub fn clear_visual(&mut self) {
        if self.visual_anchor.take().is_some() {
            self.invalidate();
        }
    }

    pub fn visual_anchor(&self) -> Option<usize> {
        self.visual_anchor
    }

    /// Inclusive row range between the visual anchor and the selection.
    ///
    pub fn visual_range(&self) -> Option<(usize, usize)> {
        if self.tasks.is_empty() {
            return None;
        }
        self.visual_anchor.map(|anchor| {
            (
                anchor.min(self.selected_index),
                anchor.max(self.selected_index),
            )
        })
    }

    /// Ids of the tasks in the visual range, or of the selected task when no
    /// visual selection is active.
    ///
    pub fn selection_ids(&self) -> Vec<String> {
        match self.visual_range() {
            Some((start, end)) => self.tasks[start..=end].iter().map(|t| t.id.clone()).collect(),
            None => self.selected_task().map(|t| vec![t.id.clone()]).unwrap_or_default(),
        }
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.tasks.len().saturating_sub(1))
    }

    fn in_visual_range(&self, index: usize) -> bool {
        self.visual_range()
            .map_or(false, |(start, end)| index >= start && index <= end)
    }

    fn header(&self) -> String {
        let mut columns = vec![];
        if self.options.show_line_numbers {
            columns.push("#");
        }
        if self.options.show_status {
            columns.push("Status");
        }
        if self.options.show_priority {
            columns.push("Priority");
        }
        columns.push("Title");
        if self.options.show_tags {
            columns.push("Tags");
        }
        format!(" {} │ {} ", self.title, columns.join(" · "))
    }

    fn row_style(&self, index: usize) -> Style {
        if index == self.selected_index && self.options.highlight_current_line && self.is_focused() {
            styling::current_row_style(&self.theme)
        } else if self.in_visual_range(index) {
            styling::visual_row_style(&self.theme)
        } else {
            styling::normal_text_style(&self.theme)
        }
    }

    fn draw_row(&self, renderer: &mut dyn TerminalRenderer, index: usize, at: Position, width: usize) {
        let task = &self.tasks[index];
        let base = self.row_style(index);
        let plain = index == self.selected_index && self.options.highlight_current_line && self.is_focused();
        let colored = |color| if plain { base } else { base.patch(styling::fg(color)) };

        renderer.write(&" ".repeat(width), at, Some(base));
        let mut x = at.x;
        if self.options.show_line_numbers {
            let number = format!("{:>3} ", index + 1);
            let style = if plain { base } else { base.patch(styling::muted_text_style(&self.theme)) };
            renderer.write(&number, Position::new(x, at.y), Some(style));
            x += LINE_NUMBER_WIDTH as u16;
        }
        if self.options.show_status {
            renderer.write(task.status_icon, Position::new(x, at.y), Some(colored(task.status_color)));
            x += STATUS_WIDTH as u16;
        }
        if self.options.show_priority {
            renderer.write(task.priority_icon, Position::new(x, at.y), Some(colored(task.priority_color)));
            x += PRIORITY_WIDTH as u16;
        }

        let title_width = self.options.title_width(width);
        let title = fit_title(&task.title, title_width, self.options.wrap_text);
        let title_style = if task.is_overdue && !plain {
            base.patch(styling::error_style(&self.theme))
        } else {
            base
        };
        renderer.write(&title, Position::new(x, at.y), Some(title_style));

        if self.options.show_tags && !task.tags.is_empty() && width >= TAG_COLUMN_WIDTH {
            let tags = truncate_with_ellipsis(&task.tags.join(","), TAG_COLUMN_WIDTH - 1);
            let tag_x = at.x + (width - TAG_COLUMN_WIDTH) as u16 + 1;
            let style = if plain { base } else { base.patch(styling::muted_text_style(&self.theme)) };
            renderer.write(&tags, Position::new(tag_x, at.y), Some(style));
        }
    }

    fn draw_scrollbar(&self, renderer: &mut dyn TerminalRenderer, x: u16, top: u16) {
        let total = self.tasks.len();
        let visible = self.visible_lines();
        if total <= visible {
            return;
        }
        let thumb = (visible * visible / total).max(1);
        let position = (self.scroll_offset * visible / total).min(visible - thumb);
        for row in 0..visible {
            let (symbol, style) = if row >= position && row < position + thumb {
                ("█", styling::scrollbar_style(&self.theme))
            } else {
                ("░", styling::muted_text_style(&self.theme))
            };
            renderer.write(symbol, Position::new(x, top + row as u16), Some(style));
        }
    }

    fn status_line(&self) -> String {
        if self.tasks.is_empty() {
            return "0/0".to_string();
        }
        let mut line = format!("{}/{}", self.selected_index + 1, self.tasks.len());
        if let Some((start, end)) = self.visual_range() {
            line.push_str(&format!("  {} selected", end - start + 1));
        }
        line
    }
}

impl View for TaskListView {
    fn name(&self) -> &'static str {
        "task-list"
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
        if dimensions.width < 4 || dimensions.height < RESERVED_ROWS + 1 {
            return true;
        }
        renderer.clear_area(position, dimensions, None);

        let border = if self.is_focused() {
            styling::active_border_style(&self.theme)
        } else {
            styling::normal_border_style(&self.theme)
        };
        renderer.draw_box(position, dimensions.width, dimensions.height, Some(border));

        let inner_width = (dimensions.width - 2) as usize;
        let header = truncate_with_ellipsis(&self.header(), inner_width.saturating_sub(2));
        renderer.write(&header, position.offset(2, 0), Some(styling::title_style(&self.theme)));

        let content_width = inner_width.saturating_sub(1);
        let top = position.y + 1;
        let visible = self.visible_lines();
        if self.tasks.is_empty() {
            renderer.write(
                "No tasks",
                Position::new(position.x + 2, top),
                Some(styling::muted_text_style(&self.theme)),
            );
        }
        for row in 0..visible {
            let index = self.scroll_offset + row;
            if index >= self.tasks.len() {
                break;
            }
            self.draw_row(renderer, index, Position::new(position.x + 1, top + row as u16), content_width);
        }
        self.draw_scrollbar(renderer, position.x + dimensions.width - 2, top);

        let status_y = position.y + dimensions.height - 2;
        renderer.write(
            &self.status_line(),
            Position::new(position.x + 2, status_y),
            Some(styling::muted_text_style(&self.theme)),
        );
        true
    }

    fn on_key_press(&mut self, key: &str, modifiers: Modifiers) -> bool {
        if !self.is_focused() {
            return false;
        }
        match (key, modifiers.ctrl) {
            ("j", false) | (key::DOWN, _) => self.move_down(),
            ("k", false) | (key::UP, _) => self.move_up(),
            ("g", false) | (key::HOME, _) => self.move_to_start(),
            ("G", false) | (key::END, _) => self.move_to_end(),
            (key::PAGE_DOWN, _) | ("d", true) | ("f", true) => self.page_down(),
            (key::PAGE_UP, _) | ("u", true) | ("b", true) => self.page_up(),
            (key::ENTER, false) | ("o", false) => {
                if let Some(task) = self.selected_task() {
                    self.core.notify(ViewEvent::OpenTask(task.id.clone()));
                }
            }
            (key::SPACE, false) => {
                if let Some(task) = self.selected_task() {
                    self.core.notify(ViewEvent::ToggleStatus(task.id.clone()));
                }
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Task;
    use crate::ui::renderer::BufferRenderer;
    use crate::ui::view::Dimensions;
    use chrono::Utc;
    use std::sync::mpsc;

    fn models(titles: &[&str]) -> Vec<TaskViewModel> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| TaskViewModel::from_task(&Task::new(&format!("t{}", i), title), Utc::now()))
            .collect()
    }

    fn numbered(n: usize) -> Vec<TaskViewModel> {
        let titles: Vec<String> = (0..n).map(|i| format!("Task {}", i)).collect();
        let refs: Vec<&str> = titles.iter().map(|s| s.as_str()).collect();
        models(&refs)
    }

    fn list(n: usize, height: u16) -> TaskListView {
        let mut view = TaskListView::new(Theme::default(), ListOptions::default());
        view.set_dimensions(Dimensions::new(60, height));
        view.set_tasks(numbered(n));
        view.show();
        view.focus();
        view
    }

    fn assert_viewport(view: &TaskListView) {
        let visible = view.visible_lines();
        assert!(view.scroll_offset() <= view.selected_index());
        assert!(view.selected_index() < view.scroll_offset() + visible);
    }

    #[test]
    fn test_move_to_end_scrolls() {
        let mut view = list(5, 6);
        assert_eq!(view.visible_lines(), 3);
        view.move_to_end();
        assert_eq!(view.selected_index(), 4);
        assert_eq!(view.scroll_offset(), 2);
    }

    #[test]
    fn test_navigation_clamps() {
        let mut view = list(3, 10);
        view.move_up();
        assert_eq!(view.selected_index(), 0);
        view.move_to_end();
        view.move_down();
        assert_eq!(view.selected_index(), 2);
        view.move_by(-100);
        assert_eq!(view.selected_index(), 0);
    }

    #[test]
    fn test_viewport_invariant_under_navigation() {
        let mut view = list(40, 8);
        let mut seed: u64 = 7;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            match (seed >> 33) % 6 {
                0 => view.move_down(),
                1 => view.move_up(),
                2 => view.page_down(),
                3 => view.page_up(),
                4 => view.move_to_start(),
                _ => view.move_to_end(),
            }
            assert_viewport(&view);
        }
    }

    #[test]
    fn test_page_moves_by_visible_lines() {
        let mut view = list(20, 8);
        view.page_down();
        assert_eq!(view.selected_index(), 5);
        view.page_up();
        assert_eq!(view.selected_index(), 0);
    }

    #[test]
    fn test_set_tasks_clamps_selection() {
        let mut view = list(10, 8);
        view.move_to_end();
        view.set_tasks(numbered(4));
        assert_eq!(view.selected_index(), 3);
        assert_viewport(&view);
        view.set_tasks(vec![]);
        assert_eq!(view.selected_index(), 0);
        assert!(view.selected_task().is_none());
    }

    #[test]
    fn test_select_id() {
        let mut view = list(5, 10);
        assert!(view.select_id("t3"));
        assert_eq!(view.selected_index(), 3);
        assert!(!view.select_id("missing"));
        assert_eq!(view.selected_index(), 3);
    }

    #[test]
    fn test_keys_ignored_when_unfocused() {
        let mut view = list(5, 10);
        view.blur();
        assert!(!view.on_key_press("j", Modifiers::NONE));
        assert_eq!(view.selected_index(), 0);
    }

    #[test]
    fn test_key_navigation() {
        let mut view = list(5, 10);
        assert!(view.on_key_press("j", Modifiers::NONE));
        assert!(view.on_key_press(key::DOWN, Modifiers::NONE));
        assert_eq!(view.selected_index(), 2);
        assert!(view.on_key_press("G", Modifiers::NONE));
        assert_eq!(view.selected_index(), 4);
        assert!(view.on_key_press("u", Modifiers::CTRL));
        assert_eq!(view.selected_index(), 0);
        assert!(!view.on_key_press("x", Modifiers::NONE));
    }

    #[test]
    fn test_open_and_toggle_notify_without_mutation() {
        let (tx, rx) = mpsc::channel();
        let mut view = list(3, 10);
        view.core_mut().set_event_sender(tx);
        view.move_down();
        let before = view.tasks().to_vec();

        assert!(view.on_key_press(key::ENTER, Modifiers::NONE));
        assert!(view.on_key_press(key::SPACE, Modifiers::NONE));
        assert_eq!(rx.try_recv().unwrap(), ViewEvent::OpenTask("t1".to_string()));
        assert_eq!(rx.try_recv().unwrap(), ViewEvent::ToggleStatus("t1".to_string()));
        assert_eq!(view.tasks(), &before[..]);
    }

    #[test]
    fn test_visual_range() {
        let mut view = list(6, 10);
        view.move_by(3);
        view.start_visual();
        view.move_up();
        view.move_up();
        assert_eq!(view.visual_range(), Some((1, 3)));
        assert_eq!(view.selection_ids(), vec!["t1", "t2", "t3"]);
        view.clear_visual();
        assert_eq!(view.selection_ids(), vec!["t1"]);
    }

    #[test]
    fn test_title_width_budget() {
        let options = ListOptions::default();
        assert_eq!(options.prefix_width(), STATUS_WIDTH + PRIORITY_WIDTH);
        assert_eq!(options.title_width(60), 60 - 9 - 15);
        let bare = ListOptions {
            show_priority: false,
            show_status: false,
            show_tags: false,
            ..ListOptions::default()
        };
        assert_eq!(bare.title_width(60), 60);
    }

    #[test]
    fn test_fit_title() {
        assert_eq!(fit_title("short", 10, false), "short");
        assert_eq!(fit_title("a rather long title", 10, false), "a rathe...");
        assert_eq!(fit_title("a rather long title", 10, true), "a rathe...");
        assert_eq!(fit_title("fits", 10, true), "fits");
    }

    #[test]
    fn test_render_rows_and_status() {
        let mut renderer = BufferRenderer::new(60, 8);
        let mut view = TaskListView::new(Theme::default(), ListOptions::default());
        view.set_dimensions(Dimensions::new(60, 8));
        let mut tasks = models(&["Fix login bug", "Write docs"]);
        tasks[0].tags = vec!["auth".to_string()];
        view.set_tasks(tasks);
        view.show();
        view.focus();
        view.render(&mut renderer);

        assert!(renderer.row_text(0).contains("Tasks"));
        let first = renderer.row_text(1);
        assert!(first.contains("○ [MED]  Fix login bug"));
        assert!(first.contains("auth"));
        assert!(renderer.row_text(2).contains("Write docs"));
        assert!(renderer.row_text(6).contains("1/2"));
        assert!(!view.needs_redraw());
    }

    #[test]
    fn test_render_truncates_long_titles() {
        let mut renderer = BufferRenderer::new(40, 6);
        let options = ListOptions {
            show_tags: false,
            ..ListOptions::default()
        };
        let mut view = TaskListView::new(Theme::default(), options);
        view.set_dimensions(Dimensions::new(40, 6));
        view.set_tasks(models(&["An extremely long task title that cannot possibly fit"]));
        view.show();
        view.render(&mut renderer);
        let row = renderer.row_text(1);
        assert!(row.contains("..."));
        assert!(!row.contains("possibly"));
    }

    #[test]
    fn test_render_keeps_wide_titles_inside_the_border() {
        let mut renderer = BufferRenderer::new(40, 6);
        let options = ListOptions {
            show_tags: false,
            ..ListOptions::default()
        };
        let mut view = TaskListView::new(Theme::default(), options);
        view.set_dimensions(Dimensions::new(40, 6));
        view.set_tasks(models(&["日本語のタイトルがとても長い日本語のタイトル"]));
        view.show();
        view.render(&mut renderer);
        assert!(renderer.row_text(1).contains("..."));
        assert_eq!(renderer.buffer().get(39, 1).symbol(), ratatui::symbols::line::VERTICAL);
    }

    #[test]
    fn test_scrollbar_thumb_is_proportional() {
        let thumb_rows = |renderer: &BufferRenderer| -> Vec<u16> {
            (1..=10)
                .filter(|y| renderer.buffer().get(58, *y).symbol() == "█")
                .collect()
        };
        let mut renderer = BufferRenderer::new(60, 13);
        let mut view = list(20, 13);
        assert_eq!(view.visible_lines(), 10);
        view.render(&mut renderer);
        assert_eq!(thumb_rows(&renderer), vec![1, 2, 3, 4, 5]);
        assert_eq!(renderer.buffer().get(58, 6).symbol(), "░");

        view.move_to_end();
        view.render(&mut renderer);
        assert_eq!(thumb_rows(&renderer), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_no_scrollbar_when_everything_fits() {
        let mut renderer = BufferRenderer::new(60, 13);
        let mut view = list(3, 13);
        view.render(&mut renderer);
        assert_eq!(renderer.buffer().get(58, 1).symbol(), " ");
    }

    #[test]
    fn test_render_empty_list() {
        let mut renderer = BufferRenderer::new(30, 6);
        let mut view = TaskListView::new(Theme::default(), ListOptions::default());
        view.set_dimensions(Dimensions::new(30, 6));
        view.show();
        view.render(&mut renderer);
        assert!(renderer.row_text(1).contains("No tasks"));
        assert!(renderer.row_text(4).contains("0/0"));
    }

    #[test]
    fn test_line_numbers() {
        let mut renderer = BufferRenderer::new(50, 6);
        let options = ListOptions {
            show_line_numbers: true,
            ..ListOptions::default()
        };
        let mut view = TaskListView::new(Theme::default(), options);
        view.set_dimensions(Dimensions::new(50, 6));
        view.set_tasks(numbered(2));
        view.show();
        view.render(&mut renderer);
        assert!(renderer.row_text(2).contains("  2 ○"));
    }
}
