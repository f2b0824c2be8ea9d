//! Full-screen task detail with tabbed sections.

use crate::input::key;
use crate::input::Modifiers;
use crate::ui::renderer::TerminalRenderer;
use crate::ui::theme::Theme;
use crate::ui::view::{Position, View, ViewCore, ViewEvent};
use crate::ui::viewmodel::TaskViewModel;
use crate::ui::widgets::styling;
use crate::utils::text_processing::{truncate_with_ellipsis, word_wrap};
use ratatui::style::Style;
use ratatui::symbols::line;

const MAX_BAR_WIDTH: u16 = 30;
const LABEL_WIDTH: usize = 11;
/// Rows above the body: border, header, tabs and separator.
const BODY_TOP: u16 = 4;

/// Sections of the detail view, in tab order.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailSection {
    Overview,
    Description,
    Metadata,
    Subtasks,
}

impl DetailSection {
    pub const ALL: [DetailSection; 4] = [
        DetailSection::Overview,
        DetailSection::Description,
        DetailSection::Metadata,
        DetailSection::Subtasks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DetailSection::Overview => "Overview",
            DetailSection::Description => "Description",
            DetailSection::Metadata => "Metadata",
            DetailSection::Subtasks => "Subtasks",
        }
    }
}

/// Width of the progress bar for a view of the given width.
///
pub fn progress_bar_width(width: u16) -> usize {
    MAX_BAR_WIDTH.min(width.saturating_sub(20)) as usize
}

/// Number of filled cells for a progress percentage.
///
pub fn progress_filled(progress: u8, bar_width: usize) -> usize {
    (progress.min(100) as usize * bar_width) / 100
}

enum BodyLine {
    Text(String, Style),
    Progress(u8),
}

pub struct TaskDetailView {
    core: ViewCore,
    theme: Theme,
    task: Option<TaskViewModel>,
    scroll_offset: usize,
    current_section: usize,
}

impl TaskDetailView {
    pub fn new(theme: Theme) -> Self {
        TaskDetailView {
            core: ViewCore::new(),
            theme,
            task: None,
            scroll_offset: 0,
            current_section: 0,
        }
    }

    /// Display a task, starting on the first section.
    ///
    pub fn set_task(&mut self, task: TaskViewModel) {
        self.task = Some(task);
        self.scroll_offset = 0;
        self.current_section = 0;
        self.invalidate();
    }

    /// Replace the displayed task with a newer projection of the same task,
    /// keeping the section and scroll position.
    ///
    pub fn refresh_task(&mut self, task: TaskViewModel) {
        self.task = Some(task);
        self.invalidate();
    }

    pub fn clear_task(&mut self) {
        self.task = None;
        self.scroll_offset = 0;
        self.current_section = 0;
        self.invalidate();
    }

    pub fn task(&self) -> Option<&TaskViewModel> {
        self.task.as_ref()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn current_section(&self) -> DetailSection {
        DetailSection::ALL[self.current_section]
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.invalidate();
    }

    pub fn next_section(&mut self) {
        self.current_section = (self.current_section + 1) % DetailSection::ALL.len();
        self.scroll_offset = 0;
        self.invalidate();
    }

    pub fn previous_section(&mut self) {
        self.current_section = match self.current_section {
            0 => DetailSection::ALL.len() - 1,
            n => n - 1,
        };
        self.scroll_offset = 0;
        self.invalidate();
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max = self.body_lines().len().saturating_sub(1);
        let target = self.scroll_offset.saturating_add(lines).min(max);
        if target != self.scroll_offset {
            self.scroll_offset = target;
            self.invalidate();
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let target = self.scroll_offset.saturating_sub(lines);
        if target != self.scroll_offset {
            self.scroll_offset = target;
            self.invalidate();
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_up(self.scroll_offset);
    }

    /// Rows available to the section body.
    ///
    pub fn body_height(&self) -> usize {
        self.core.dimensions.height.saturating_sub(BODY_TOP + 1) as usize
    }

    fn body_width(&self) -> usize {
        self.core.dimensions.width.saturating_sub(4) as usize
    }

    fn body_lines(&self) -> Vec<BodyLine> {
        let Some(task) = &self.task else {
            return vec![];
        };
        let text = styling::normal_text_style(&self.theme);
        let muted = styling::muted_text_style(&self.theme);
        let field = |label: &str, value: &str| {
            BodyLine::Text(format!("{:<width$}{}", format!("{}:", label), value, width = LABEL_WIDTH), text)
        };
        let or_dash = |value: Option<&String>| value.cloned().unwrap_or_else(|| "-".to_string());

        match self.current_section() {
            DetailSection::Overview => {
                let tags = if task.tags.is_empty() { "-".to_string() } else { task.tags.join(", ") };
                let subtasks = if task.has_subtasks() {
                    format!("{}/{} done", task.subtasks_done(), task.subtask_count())
                } else {
                    "none".to_string()
                };
                vec![
                    field("ID", &task.id),
                    field("Status", &format!("{} {}", task.status_icon, task.status)),
                    field("Priority", &format!("{} {}", task.priority_icon, task.priority)),
                    field("Created", &task.created_at),
                    field("Updated", &task.updated_at),
                    field("Completed", &or_dash(task.completed_at.as_ref())),
                    field("Duration", &or_dash(task.duration.as_ref())),
                    field("Tags", &tags),
                    field("Subtasks", &subtasks),
                    BodyLine::Text(String::new(), text),
                    BodyLine::Progress(task.progress),
                ]
            }
            DetailSection::Description => {
                if task.description.trim().is_empty() {
                    return vec![BodyLine::Text("No description".to_string(), muted)];
                }
                word_wrap(&task.description, self.body_width())
                    .into_iter()
                    .map(|l| BodyLine::Text(l, text))
                    .collect()
            }
            DetailSection::Metadata => {
                let assignee = if task.assignee.is_empty() { "unassigned" } else { task.assignee.as_str() };
                let estimate = match task.estimated_hours {
                    0 => "-".to_string(),
                    h => format!("{}h", h),
                };
                let overdue = if task.is_overdue {
                    BodyLine::Text(
                        format!("{:<width$}yes", "Overdue:", width = LABEL_WIDTH),
                        styling::error_style(&self.theme),
                    )
                } else {
                    field("Overdue", "no")
                };
                vec![
                    field("Assignee", assignee),
                    field("Estimate", &estimate),
                    field("Due", &or_dash(task.due_date.as_ref())),
                    overdue,
                ]
            }
            DetailSection::Subtasks => {
                if task.subtasks.is_empty() {
                    return vec![BodyLine::Text("No subtasks".to_string(), muted)];
                }
                task.subtasks
                    .iter()
                    .map(|s| {
                        let (mark, style) = if s.done { ("[x]", muted) } else { ("[ ]", text) };
                        BodyLine::Text(format!("{} {}", mark, s.title), style)
                    })
                    .collect()
            }
        }
    }

    fn draw_tabs(&self, renderer: &mut dyn TerminalRenderer, at: Position) {
        let mut x = at.x;
        for (i, section) in DetailSection::ALL.iter().enumerate() {
            let (label, style) = if i == self.current_section {
                (format!("[{}]", section.label()), styling::active_tab_style(&self.theme))
            } else {
                (format!(" {} ", section.label()), styling::inactive_tab_style(&self.theme))
            };
            renderer.write(&label, Position::new(x, at.y), Some(style));
            x += label.chars().count() as u16 + 1;
        }
    }

    fn draw_progress(&self, renderer: &mut dyn TerminalRenderer, progress: u8, at: Position) {
        let bar_width = progress_bar_width(self.core.dimensions.width);
        let filled = progress_filled(progress, bar_width);
        renderer.write(
            &format!("{:<width$}", "Progress:", width = LABEL_WIDTH),
            at,
            Some(styling::normal_text_style(&self.theme)),
        );
        let bar_x = at.x + LABEL_WIDTH as u16;
        renderer.write(
            &"█".repeat(filled),
            Position::new(bar_x, at.y),
            Some(styling::progress_filled_style(&self.theme)),
        );
        renderer.write(
            &"░".repeat(bar_width - filled),
            Position::new(bar_x + filled as u16, at.y),
            Some(styling::progress_empty_style(&self.theme)),
        );
        renderer.write(
            &format!(" {}%", progress),
            Position::new(bar_x + bar_width as u16, at.y),
            Some(styling::normal_text_style(&self.theme)),
        );
    }
}

impl View for TaskDetailView {
    fn name(&self) -> &'static str {
        "task-detail"
    }

    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn draw(&mut self, renderer: &mut dyn TerminalRenderer) -> bool {
        let Some(task) = &self.task else {
            return false;
        };
        let position = self.core.position;
        let dimensions = self.core.dimensions;
        if dimensions.width < 6 || dimensions.height < BODY_TOP + 2 {
            return true;
        }
        renderer.clear_area(position, dimensions, None);
        let border = styling::active_border_style(&self.theme);
        renderer.draw_box(position, dimensions.width, dimensions.height, Some(border));

        let inner = self.body_width();
        let header = format!("{} {} {}", task.priority_icon, task.title, task.status_icon);
        renderer.write(
            &truncate_with_ellipsis(&header, inner),
            position.offset(2, 1),
            Some(styling::title_style(&self.theme)),
        );
        self.draw_tabs(renderer, position.offset(2, 2));
        renderer.write(
            &line::HORIZONTAL.repeat((dimensions.width - 2) as usize),
            position.offset(1, 3),
            Some(border),
        );

        let lines = self.body_lines();
        for (row, body_line) in lines
            .iter()
            .skip(self.scroll_offset)
            .take(self.body_height())
            .enumerate()
        {
            let at = position.offset(2, BODY_TOP + row as u16);
            match body_line {
                BodyLine::Text(text, style) => {
                    renderer.write(&truncate_with_ellipsis(text, inner), at, Some(*style))
                }
                BodyLine::Progress(progress) => self.draw_progress(renderer, *progress, at),
            }
        }

        let hint = " Tab: section  j/k: scroll  Space: status  q: close ";
        if (dimensions.width as usize) > hint.chars().count() + 4 {
            renderer.write(
                hint,
                position.offset(2, dimensions.height - 1),
                Some(styling::muted_text_style(&self.theme)),
            );
        }
        true
    }

    fn on_key_press(&mut self, key: &str, modifiers: Modifiers) -> bool {
        if !self.is_focused() {
            return false;
        }
        match key {
            key::TAB if modifiers.shift => self.previous_section(),
            key::TAB => self.next_section(),
            "l" | key::RIGHT => self.next_section(),
            "h" | key::LEFT => self.previous_section(),
            "j" | key::DOWN => self.scroll_down(1),
            "k" | key::UP => self.scroll_up(1),
            key::PAGE_DOWN => self.scroll_down(self.body_height().max(1)),
            key::PAGE_UP => self.scroll_up(self.body_height().max(1)),
            "g" | key::HOME => self.scroll_to_top(),
            "q" | key::ESCAPE => self.core.notify(ViewEvent::Close),
            key::SPACE => {
                if let Some(task) = &self.task {
                    self.core.notify(ViewEvent::ToggleStatus(task.id.clone()));
                }
            }
            _ => return false,
        }
        true
    }
}
