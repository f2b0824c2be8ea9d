use crate::input::{key, timer, Mode, ModalInputEngine, Modifiers};
use crate::tasks::search::title_matches;
use crate::tasks::{rank, Task, TaskStatus};
use crate::ui::renderer::TerminalRenderer;
use crate::ui::theme::Theme;
use crate::ui::view::{
    Dimensions, Position, View, ViewError, ViewEvent, ViewEventReceiver, ViewEventSender,
};
use crate::ui::viewmodel::TaskViewModel;
use crate::ui::views::{HelpView, ListOptions, SearchView, TaskDetailView, TaskListView};
use crate::ui::widgets::styling;
use chrono::prelude::*;
use log::*;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use super::error::StateError;
use super::navigation::{ActiveView, StatusFilter};

const STATUS_BAR_HEIGHT: u16 = 1;
const OVERLAY_MARGIN_X: u16 = 4;
const OVERLAY_MARGIN_Y: u16 = 1;
const MAX_UNDO: usize = 100;
const YANK_REGISTER: char = '0';

/// Statuses recorded before one user action, restored together by undo.
type UndoEntry = Vec<(String, TaskStatus)>;

/// Run an expression against the view behind an [`ActiveView`].
macro_rules! with_view {
    ($state:expr, $view:expr, $v:ident => $body:expr) => {
        match $view {
            ActiveView::TaskList => {
                let $v = &mut $state.list;
                $body
            }
            ActiveView::TaskDetail => {
                let $v = &mut $state.detail;
                $body
            }
            ActiveView::Search => {
                let $v = &mut $state.search;
                $body
            }
            ActiveView::Help => {
                let $v = &mut $state.help;
                $body
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq)]
struct StatusMessage {
    text: String,
    is_error: bool,
}

/// Houses data representative of application state.
///
/// `State` is the controller: it feeds keys through the modal engine, maps
/// resolved actions onto the views, drains the notifications the views send
/// back and owns the in-memory task list, the status bar and the command line.
///
pub struct State {
    theme: Theme,
    engine: ModalInputEngine,
    tasks: Vec<Task>,
    filter: StatusFilter,
    list: TaskListView,
    detail: TaskDetailView,
    search: SearchView,
    help: HelpView,
    view_stack: Vec<ActiveView>,
    events: ViewEventReceiver,
    undo_stack: Vec<UndoEntry>,
    yanked: Vec<String>,
    command_line: String,
    message: Option<StatusMessage>,
    terminal_size: Dimensions,
    should_quit: bool,
    reload_requested: bool,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State::new(Theme::default(), ListOptions::default(), timer::DEFAULT_TIMEOUT)
    }
}

impl State {
    /// Return a new state with the task list shown and focused.
    ///
    pub fn new(theme: Theme, options: ListOptions, command_timeout: Duration) -> Self {
        let (sender, events): (ViewEventSender, ViewEventReceiver) = mpsc::channel();
        let engine = ModalInputEngine::with_timeout(command_timeout);

        let mut list = TaskListView::new(theme.clone(), options);
        list.core_mut().set_event_sender(sender.clone());
        list.show();
        list.focus();
        let mut detail = TaskDetailView::new(theme.clone());
        detail.core_mut().set_event_sender(sender.clone());
        let mut search = SearchView::new(theme.clone());
        search.core_mut().set_event_sender(sender.clone());
        let mut help = HelpView::new(theme.clone());
        help.core_mut().set_event_sender(sender);
        help.set_text(&engine.keybinding_help());

        State {
            theme,
            engine,
            tasks: vec![],
            filter: StatusFilter::default(),
            list,
            detail,
            search,
            help,
            view_stack: vec![ActiveView::TaskList],
            events,
            undo_stack: vec![],
            yanked: vec![],
            command_line: String::new(),
            message: None,
            terminal_size: Dimensions::default(),
            should_quit: false,
            reload_requested: false,
        }
    }

    /// Initialize every view before the first render.
    ///
    pub async fn initialize(&mut self) -> Result<(), ViewError> {
        self.list.initialize().await?;
        self.detail.initialize().await?;
        self.search.initialize().await?;
        self.help.initialize().await?;
        Ok(())
    }

    /// Release renderer resources held by the views.
    ///
    pub fn dispose(&mut self, renderer: &mut dyn TerminalRenderer) {
        self.help.dispose(renderer);
        self.search.dispose(renderer);
        self.detail.dispose(renderer);
        self.list.dispose(renderer);
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn engine(&self) -> &ModalInputEngine {
        &self.engine
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn list(&self) -> &TaskListView {
        &self.list
    }

    pub fn detail(&self) -> &TaskDetailView {
        &self.detail
    }

    pub fn search(&self) -> &SearchView {
        &self.search
    }

    pub fn help(&self) -> &HelpView {
        &self.help
    }

    pub fn yanked(&self) -> &[String] {
        &self.yanked
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    pub fn terminal_size(&self) -> Dimensions {
        self.terminal_size
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Return the topmost view, which receives unresolved keys.
    ///
    pub fn current_view(&self) -> ActiveView {
        self.view_stack.last().copied().unwrap_or(ActiveView::TaskList)
    }

    /// Return true once, after a reload has been requested.
    ///
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    /// Replace the task list, e.g. after loading from the task source.
    ///
    pub fn set_tasks(&mut self, tasks: Vec<Task>) -> &mut Self {
        info!("Showing {} tasks", tasks.len());
        self.tasks = tasks;
        self.undo_stack.clear();
        self.rebuild_list();
        self.refresh_detail();
        if self.search.is_visible() {
            let results = rank(&self.tasks, self.search.query(), Utc::now());
            self.search.set_results(results);
        }
        self
    }

    /// Replace the status filter and rebuild the list.
    ///
    pub fn set_filter(&mut self, filter: StatusFilter) -> &mut Self {
        self.filter = filter;
        self.rebuild_list();
        self.set_message(&format!("Filter: {}", filter.label()));
        self
    }

    /// Switch every view and the status bar to a new theme.
    ///
    pub fn set_theme(&mut self, theme: Theme) -> &mut Self {
        info!("Switching to theme '{}'", theme.name);
        self.list.set_theme(theme.clone());
        self.detail.set_theme(theme.clone());
        self.search.set_theme(theme.clone());
        self.help.set_theme(theme.clone());
        self.theme = theme;
        self
    }

    /// Lay the views out for a terminal of the given size.
    ///
    pub fn on_resize(&mut self, width: u16, height: u16) {
        debug!("Resizing views to {}x{}", width, height);
        self.terminal_size = Dimensions::new(width, height);
        let body = Dimensions::new(width, height.saturating_sub(STATUS_BAR_HEIGHT));
        let overlay = Dimensions::new(
            width.saturating_sub(OVERLAY_MARGIN_X * 2),
            body.height.saturating_sub(OVERLAY_MARGIN_Y * 2),
        );
        let overlay_position = Position::new(OVERLAY_MARGIN_X, OVERLAY_MARGIN_Y);

        self.list.set_position(Position::default());
        self.list.on_resize(body);
        self.detail.set_position(Position::default());
        self.detail.on_resize(body);
        self.search.set_position(overlay_position);
        self.search.on_resize(overlay);
        self.help.set_position(overlay_position);
        self.help.on_resize(overlay);
    }

    /// Fire the engine's ambiguity timer if it is due.
    ///
    pub fn tick(&mut self, now: Instant) {
        self.engine.tick(now);
    }

    /// Handle a key press. The engine resolves first; keys it neither
    /// resolves nor buffers go to the focused view, or to the command line
    /// in command mode. A key that breaks off a pending sequence is
    /// discarded along with it.
    ///
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers, now: Instant) {
        self.engine.tick(now);
        let mode = self.engine.mode();
        let was_pending = self.engine.is_pending();
        match self.engine.process_key_at(key, modifiers, now) {
            Some(action) => self.dispatch(&action, mode),
            None if was_pending || self.engine.is_pending() => {}
            None => self.forward_key(key, modifiers),
        }
        self.process_view_events();
    }

    /// Drain notifications sent by the views.
    ///
    pub fn process_view_events(&mut self) {
        loop {
            let event = match self.events.try_recv() {
                Ok(event) => event,
                Err(_) => break,
            };
            self.handle_view_event(event);
        }
    }

    /// Render dirty views bottom to top, then the status bar.
    ///
    pub fn render(&mut self, renderer: &mut dyn TerminalRenderer) {
        let mut dirty_below = false;
        render_layer(&mut self.list, renderer, &mut dirty_below);
        render_layer(&mut self.detail, renderer, &mut dirty_below);
        render_layer(&mut self.search, renderer, &mut dirty_below);
        render_layer(&mut self.help, renderer, &mut dirty_below);
        self.render_status_bar(renderer);
    }

    fn render_status_bar(&self, renderer: &mut dyn TerminalRenderer) {
        let size = self.terminal_size;
        if size.width == 0 || size.height == 0 {
            return;
        }
        let y = size.height - 1;
        let mode = self.engine.mode();
        let badge = format!(" {} ", mode.label());
        let badge_width = badge.chars().count() as u16;

        renderer.write(&badge, Position::new(0, y), Some(styling::mode_style(&self.theme, mode)));

        let state = self.engine.state();
        let (text, style) = if mode == Mode::Command {
            (format!(" :{}", self.command_line), styling::status_bar_style(&self.theme))
        } else if !state.command_buffer.is_empty() {
            (format!(" {}", state.command_buffer), styling::status_bar_style(&self.theme))
        } else {
            match &self.message {
                Some(message) if message.is_error => (
                    format!(" {}", message.text),
                    styling::status_bar_style(&self.theme).patch(styling::error_style(&self.theme)),
                ),
                Some(message) => (format!(" {}", message.text), styling::status_bar_style(&self.theme)),
                None => (String::new(), styling::status_bar_style(&self.theme)),
            }
        };
        renderer.write_line(&text, Position::new(badge_width, y), Some(style));

        let summary = format!("{} | {} tasks ", self.filter.label(), self.list.tasks().len());
        let summary_width = summary.chars().count() as u16;
        let text_end = badge_width + text.chars().count() as u16;
        if text_end + summary_width < size.width {
            renderer.write(
                &summary,
                Position::new(size.width - summary_width, y),
                Some(styling::status_bar_style(&self.theme)),
            );
        }

        if mode == Mode::Command {
            let cursor_x = (badge_width + 2 + self.command_line.chars().count() as u16)
                .min(size.width.saturating_sub(1));
            renderer.set_cursor_position(Position::new(cursor_x, y));
            renderer.show_cursor();
        } else if !self.search.is_visible() {
            renderer.hide_cursor();
        }
    }

    fn forward_key(&mut self, key: &str, modifiers: Modifiers) {
        if self.engine.mode() == Mode::Command {
            self.edit_command_line(key, modifiers);
            return;
        }
        let view = self.current_view();
        let handled = with_view!(self, view, v => v.on_key_press(key, modifiers));
        if !handled {
            trace!("Key '{}' not handled by {:?}", key, view);
        }
    }

    fn edit_command_line(&mut self, key: &str, modifiers: Modifiers) {
        if key == key::BACKSPACE {
            if self.command_line.pop().is_none() {
                self.engine.set_mode(Mode::Normal);
            }
            return;
        }
        if modifiers.ctrl || modifiers.alt || modifiers.meta {
            return;
        }
        if let Some(c) = key::printable_char(key) {
            self.command_line.push(c);
        }
    }

    fn dispatch(&mut self, action: &str, previous_mode: Mode) {
        let (name, count) = split_count(action);
        debug!("Dispatching action '{}' on {:?}", action, self.current_view());
        match name {
            "move-down" => self.move_selection(count as i64),
            "move-up" => self.move_selection(-(count as i64)),
            "move-to-start" => self.move_to_start(),
            "move-to-end" => self.move_to_end(),
            "page-down" => self.page(count as i64),
            "page-up" => self.page(-(count as i64)),
            "move-left" => self.switch_section(false),
            "move-right" => self.switch_section(true),
            "search" => self.open_search("", true),
            "enter-insert" => self.open_search_from_history(false),
            "enter-insert-after" => self.open_search_from_history(true),
            "open-below" | "open-above" => self.open_selected(),
            "enter-visual" | "enter-visual-line" => self.start_visual(),
            "enter-command" => {
                self.command_line.clear();
                self.message = None;
            }
            "enter-normal" => self.leave_mode(previous_mode),
            "execute-command" => {
                let line = std::mem::take(&mut self.command_line);
                self.engine.set_mode(Mode::Normal);
                if let Err(e) = self.execute_command(&line) {
                    warn!("Command ':{}' failed: {}", line, e);
                    self.set_error(&e);
                }
            }
            "delete-line" => {
                let ids = self.target_ids(count);
                self.archive(&ids);
            }
            "delete-word" => self.set_message("Nothing to delete here"),
            "yank-line" => {
                let ids = self.target_ids(count);
                self.yank(ids);
            }
            "yank-selection" => {
                let ids = self.list.selection_ids();
                self.leave_visual();
                self.yank(ids);
            }
            "delete-selection" => {
                let ids = self.list.selection_ids();
                self.leave_visual();
                self.archive(&ids);
            }
            "toggle-selection" => {
                let ids = self.list.selection_ids();
                self.leave_visual();
                self.toggle_status(&ids);
            }
            "undo" => self.undo(),
            "search-next" => self.jump_to_match(true),
            "search-prev" => self.jump_to_match(false),
            "cycle-filter" => {
                let filter = self.filter.next();
                self.set_filter(filter);
            }
            "refresh" => self.request_reload(),
            "show-help" => self.show_help(),
            "quit" => self.quit(),
            _ => debug!("Unhandled action '{}'", action),
        }
    }

    /// Run a command line. The leading `:` is not part of `line`.
    ///
    pub fn execute_command(&mut self, line: &str) -> Result<(), StateError> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(());
        };
        match name {
            "q" | "q!" | "quit" | "qa" => self.should_quit = true,
            "h" | "help" => self.show_help(),
            "e" | "refresh" => self.request_reload(),
            "filter" => {
                let argument = parts.next().ok_or(StateError::MissingArgument("filter"))?;
                let filter = StatusFilter::parse(argument)
                    .ok_or_else(|| StateError::InvalidFilter(argument.to_string()))?;
                self.set_filter(filter);
            }
            "theme" | "colorscheme" => {
                let argument = parts.next().ok_or(StateError::MissingArgument("theme"))?;
                let theme = Theme::from_name(argument)
                    .ok_or_else(|| StateError::UnknownTheme(argument.to_string()))?;
                self.set_theme(theme);
                self.set_message(&format!("Theme: {}", argument));
            }
            _ => return Err(StateError::UnknownCommand(line.trim().to_string())),
        }
        Ok(())
    }

    fn handle_view_event(&mut self, event: ViewEvent) {
        debug!("View event {:?}", event);
        match event {
            ViewEvent::OpenTask(id) => self.open_task(&id),
            ViewEvent::ToggleStatus(id) => self.toggle_status(&[id]),
            ViewEvent::QueryChanged(query) => {
                let results = rank(&self.tasks, &query, Utc::now());
                self.search.set_results(results);
            }
            ViewEvent::ResultSelected(id) => {
                self.close_search();
                self.open_task(&id);
            }
            ViewEvent::Close => {
                let view = self.current_view();
                if view == ActiveView::Search {
                    self.close_search();
                } else {
                    self.pop_view(view);
                }
            }
        }
    }

    fn move_selection(&mut self, delta: i64) {
        match self.current_view() {
            ActiveView::TaskList => {
                self.list.move_by(delta);
                self.sync_visual_range();
            }
            ActiveView::TaskDetail if delta >= 0 => self.detail.scroll_down(delta as usize),
            ActiveView::TaskDetail => self.detail.scroll_up(delta.unsigned_abs() as usize),
            ActiveView::Help => self.help.scroll_by(delta),
            ActiveView::Search => {}
        }
    }

    fn move_to_start(&mut self) {
        match self.current_view() {
            ActiveView::TaskList => {
                self.list.move_to_start();
                self.sync_visual_range();
            }
            ActiveView::TaskDetail => self.detail.scroll_to_top(),
            ActiveView::Help => self.help.scroll_by(-(self.help.scroll_offset() as i64)),
            ActiveView::Search => {}
        }
    }

    fn move_to_end(&mut self) {
        match self.current_view() {
            ActiveView::TaskList => {
                self.list.move_to_end();
                self.sync_visual_range();
            }
            ActiveView::TaskDetail => self.detail.scroll_down(u16::MAX as usize),
            ActiveView::Help => self.help.scroll_by(i64::from(u16::MAX)),
            ActiveView::Search => {}
        }
    }

    fn page(&mut self, pages: i64) {
        match self.current_view() {
            ActiveView::TaskList => {
                self.list.move_by(pages.saturating_mul(self.list.visible_lines() as i64));
                self.sync_visual_range();
            }
            ActiveView::TaskDetail => {
                let rows = pages.saturating_mul(self.detail.body_height().max(1) as i64);
                self.move_selection(rows);
            }
            ActiveView::Help => self.help.page_by(pages),
            ActiveView::Search => {}
        }
    }

    fn switch_section(&mut self, forward: bool) {
        if self.current_view() != ActiveView::TaskDetail {
            return;
        }
        if forward {
            self.detail.next_section();
        } else {
            self.detail.previous_section();
        }
    }

    fn open_search_from_history(&mut self, cursor_at_end: bool) {
        let query = self.search.history().last().cloned().unwrap_or_default();
        self.open_search(&query, cursor_at_end);
    }

    fn open_search(&mut self, query: &str, cursor_at_end: bool) {
        self.engine.set_mode(Mode::Insert);
        self.push_view(ActiveView::Search);
        self.search.open(query, cursor_at_end);
    }

    fn close_search(&mut self) {
        self.search.dismiss();
        if self.engine.mode() == Mode::Insert {
            self.engine.set_mode(Mode::Normal);
        }
        self.pop_view(ActiveView::Search);
    }

    fn open_selected(&mut self) {
        self.engine.set_mode(Mode::Normal);
        if self.current_view() != ActiveView::TaskList {
            return;
        }
        if let Some(id) = self.list.selected_task().map(|t| t.id.clone()) {
            self.open_task(&id);
        }
    }

    fn open_task(&mut self, id: &str) {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            self.set_error(&StateError::TaskNotFound { id: id.to_string() });
            return;
        };
        let model = TaskViewModel::from_task(task, Utc::now());
        if self.engine.mode() == Mode::Visual {
            self.leave_visual();
        }
        self.list.select_id(id);
        self.detail.set_task(model);
        self.push_view(ActiveView::TaskDetail);
    }

    fn show_help(&mut self) {
        self.help.scroll_by(-(self.help.scroll_offset() as i64));
        self.push_view(ActiveView::Help);
    }

    fn quit(&mut self) {
        match self.current_view() {
            ActiveView::TaskList => self.should_quit = true,
            ActiveView::Search => self.close_search(),
            view => self.pop_view(view),
        }
    }

    fn request_reload(&mut self) {
        self.reload_requested = true;
        self.set_message("Reloading tasks");
    }

    fn leave_mode(&mut self, previous_mode: Mode) {
        match previous_mode {
            Mode::Insert if self.search.is_visible() => self.close_search(),
            Mode::Visual => self.list.clear_visual(),
            Mode::Command => self.command_line.clear(),
            _ => {}
        }
    }

    fn start_visual(&mut self) {
        if self.current_view() != ActiveView::TaskList || self.list.tasks().is_empty() {
            self.engine.set_mode(Mode::Normal);
            return;
        }
        self.list.start_visual();
        self.sync_visual_range();
    }

    fn leave_visual(&mut self) {
        self.list.clear_visual();
        self.engine.set_mode(Mode::Normal);
    }

    fn sync_visual_range(&mut self) {
        if self.engine.mode() != Mode::Visual {
            return;
        }
        if let Some(anchor) = self.list.visual_anchor() {
            let selected = self.list.selected_index();
            self.engine.set_visual_range((anchor, 0), (selected, 0));
        }
    }

    /// Ids an operator with a count applies to: the task shown in the detail
    /// view, or `count` tasks starting at the list selection.
    ///
    fn target_ids(&self, count: usize) -> Vec<String> {
        if self.current_view() == ActiveView::TaskDetail {
            return self.detail.task().map(|t| vec![t.id.clone()]).unwrap_or_default();
        }
        self.list
            .tasks()
            .iter()
            .skip(self.list.selected_index())
            .take(count.max(1))
            .map(|t| t.id.clone())
            .collect()
    }

    fn yank(&mut self, ids: Vec<String>) {
        if ids.is_empty() {
            return;
        }
        self.engine.set_register(YANK_REGISTER);
        self.set_message(&match ids.len() {
            1 => format!("Yanked {}", ids[0]),
            n => format!("Yanked {} task ids", n),
        });
        self.yanked = ids;
    }

    fn toggle_status(&mut self, ids: &[String]) {
        let changed = self.change_status(ids, |status| status.next());
        match (changed, ids) {
            (0, _) => {}
            (1, [id]) => {
                let status = self.find_task(id).map(|t| t.status).unwrap_or_default();
                self.set_message(&format!("{} → {}", id, status));
            }
            (n, _) => self.set_message(&format!("Toggled {} tasks", n)),
        }
    }

    fn archive(&mut self, ids: &[String]) {
        match self.change_status(ids, |_| TaskStatus::Archived) {
            0 => self.set_message("Nothing to archive"),
            1 => self.set_message("Archived 1 task"),
            n => self.set_message(&format!("Archived {} tasks", n)),
        }
    }

    /// Apply a status transition to each task and record one undo entry.
    /// Returns the number of tasks whose status changed.
    ///
    fn change_status<F>(&mut self, ids: &[String], transition: F) -> usize
    where
        F: Fn(TaskStatus) -> TaskStatus,
    {
        let now = Utc::now();
        let mut entry: UndoEntry = vec![];
        for id in ids {
            if let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) {
                let previous = task.status;
                let status = transition(previous);
                if status != previous {
                    task.set_status(status, now);
                    entry.push((id.clone(), previous));
                }
            }
        }
        let changed = entry.len();
        if changed > 0 {
            debug!("Changed status of {} tasks", changed);
            self.undo_stack.push(entry);
            if self.undo_stack.len() > MAX_UNDO {
                self.undo_stack.remove(0);
            }
            self.rebuild_list();
            self.refresh_detail();
        }
        changed
    }

    fn undo(&mut self) {
        let Some(entry) = self.undo_stack.pop() else {
            self.set_message("Already at oldest change");
            return;
        };
        let now = Utc::now();
        for (id, status) in &entry {
            if let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) {
                task.set_status(*status, now);
            }
        }
        self.rebuild_list();
        self.refresh_detail();
        self.set_message(&match entry.len() {
            1 => "1 change undone".to_string(),
            n => format!("{} changes undone", n),
        });
    }

    fn jump_to_match(&mut self, forward: bool) {
        let Some(query) = self.search.history().last().cloned() else {
            self.set_message("No previous search");
            return;
        };
        let tasks = self.list.tasks();
        let len = tasks.len();
        let start = self.list.selected_index();
        let found = (1..=len)
            .map(|step| {
                if forward {
                    (start + step) % len
                } else {
                    (start + len - step) % len
                }
            })
            .find(|&index| title_matches(&tasks[index].title, &query));
        match found {
            Some(index) => {
                self.list.select(index);
                self.sync_visual_range();
                self.set_message(&format!("/{}", query));
            }
            None => self.set_error(&format!("Pattern not found: {}", query)),
        }
    }

    /// Rebuild the list from the filtered tasks, keeping the selection on the
    /// same task if it is still listed, else on the same row.
    ///
    fn rebuild_list(&mut self) {
        let selected_id = self.list.selected_task().map(|t| t.id.clone());
        let index = self.list.selected_index();
        let now = Utc::now();
        let models: Vec<TaskViewModel> = self
            .tasks
            .iter()
            .filter(|t| self.filter.matches(t))
            .map(|t| TaskViewModel::from_task(t, now))
            .collect();
        self.list.set_tasks(models);
        if !selected_id.map_or(false, |id| self.list.select_id(&id)) {
            self.list.select(index);
        }
        let title = match self.filter {
            StatusFilter::All => "Tasks".to_string(),
            filter => format!("Tasks [{}]", filter.label()),
        };
        self.list.set_title(&title);
    }

    fn refresh_detail(&mut self) {
        let Some(id) = self.detail.task().map(|t| t.id.clone()) else {
            return;
        };
        let model = self.find_task(&id).map(|t| TaskViewModel::from_task(t, Utc::now()));
        match model {
            Some(model) => self.detail.refresh_task(model),
            None => {
                self.detail.clear_task();
                self.pop_view(ActiveView::TaskDetail);
            }
        }
    }

    fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn push_view(&mut self, view: ActiveView) {
        let current = self.current_view();
        if current == view {
            return;
        }
        with_view!(self, current, v => v.blur());
        self.view_stack.retain(|v| *v != view);
        self.view_stack.push(view);
        with_view!(self, view, v => {
            v.show();
            v.focus();
        });
        debug!("Showing {:?}", view);
    }

    fn pop_view(&mut self, view: ActiveView) {
        if view == ActiveView::TaskList {
            return;
        }
        with_view!(self, view, v => v.hide());
        self.view_stack.retain(|v| *v != view);
        // The canvas under a closed overlay must be repainted.
        for below in self.view_stack.clone() {
            with_view!(self, below, v => v.invalidate());
        }
        let current = self.current_view();
        with_view!(self, current, v => v.focus());
        debug!("Closed {:?}, showing {:?}", view, current);
    }

    fn set_message(&mut self, text: &str) {
        self.message = Some(StatusMessage {
            text: text.to_string(),
            is_error: false,
        });
    }

    fn set_error(&mut self, error: &dyn std::fmt::Display) {
        self.message = Some(StatusMessage {
            text: error.to_string(),
            is_error: true,
        });
    }
}

/// Render one layer. A layer is redrawn whenever a layer below it drew,
/// since that may have painted over it.
fn render_layer<V: View>(view: &mut V, renderer: &mut dyn TerminalRenderer, dirty_below: &mut bool) {
    if !view.is_visible() {
        return;
    }
    if *dirty_below {
        view.invalidate();
    }
    let dirty = view.needs_redraw();
    view.render(renderer);
    *dirty_below |= dirty;
}

/// Split a resolved action into its name and repeat count.
fn split_count(action: &str) -> (&str, usize) {
    match action.split_once(':') {
        Some((name, count)) => (name, count.parse::<usize>().unwrap_or(1).max(1)),
        None => (action, 1),
    }
}
