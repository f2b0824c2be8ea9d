//! View contract.
//!
//! Every concrete view embeds a [`ViewCore`] holding its geometry and
//! [`ViewState`] and implements [`View`]. The trait supplies the lifecycle
//! (show/hide/focus/blur, geometry, dirty tracking, `render`) on top of the
//! three things a view has to provide itself: access to its core, `draw` and
//! `on_key_press`.

use super::renderer::TerminalRenderer;
use crate::input::Modifiers;
use std::sync::mpsc;
use std::time::Duration;

/// Screen coordinate.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Position { x, y }
    }

    /// Return the position offset by the given amounts.
    ///
    pub fn offset(&self, dx: u16, dy: u16) -> Position {
        Position::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Width and height in cells.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u16,
    pub height: u16,
}

impl Dimensions {
    pub const fn new(width: u16, height: u16) -> Self {
        Dimensions { width, height }
    }
}

/// Visibility, focus and dirty flag.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub is_visible: bool,
    pub is_focused: bool,
    pub needs_redraw: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            is_visible: false,
            is_focused: false,
            needs_redraw: true,
        }
    }
}

/// Notifications a view sends to the controller.
///
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Open the task with the given id.
    OpenTask(String),
    /// Advance the status of the task with the given id.
    ToggleStatus(String),
    /// The search query changed.
    QueryChanged(String),
    /// A search result was chosen.
    ResultSelected(String),
    /// The view asks to be closed.
    Close,
}

pub type ViewEventSender = mpsc::Sender<ViewEvent>;
pub type ViewEventReceiver = mpsc::Receiver<ViewEvent>;

/// Errors raised by the view lifecycle.
///
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ViewError {
    /// The view was disposed and cannot be initialized again.
    #[error("View '{0}' was disposed")]
    Disposed(&'static str),
}

/// State shared by all views, embedded by value.
///
#[derive(Debug, Default)]
pub struct ViewCore {
    pub state: ViewState,
    pub position: Position,
    pub dimensions: Dimensions,
    initialized: bool,
    disposed: bool,
    events: Option<ViewEventSender>,
}

impl ViewCore {
    pub fn new() -> Self {
        ViewCore::default()
    }

    pub fn set_event_sender(&mut self, sender: ViewEventSender) {
        self.events = Some(sender);
    }

    /// Send a notification to the controller. Dropped silently if no
    /// controller is listening.
    ///
    pub fn notify(&self, event: ViewEvent) {
        if let Some(sender) = &self.events {
            if sender.send(event).is_err() {
                log::debug!("View event dropped, receiver gone");
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.state.needs_redraw = true;
    }

    pub fn mark_as_drawn(&mut self) {
        self.state.needs_redraw = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Mark the view as disposed and drop visibility and focus.
    ///
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.state.is_visible = false;
        self.state.is_focused = false;
    }
}

/// Capability interface implemented by every view.
///
pub trait View {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    fn core(&self) -> &ViewCore;

    fn core_mut(&mut self) -> &mut ViewCore;

    /// Emit draw primitives. Returns false if nothing was drawn, in which case
    /// the view stays dirty.
    fn draw(&mut self, renderer: &mut dyn TerminalRenderer) -> bool;

    /// Handle a key press. Returns false if the key was not consumed.
    fn on_key_press(&mut self, key: &str, modifiers: Modifiers) -> bool;

    /// Prepare the view before its first render. Calling it again is a no-op.
    #[allow(async_fn_in_trait)]
    async fn initialize(&mut self) -> Result<(), ViewError> {
        let name = self.name();
        let core = self.core_mut();
        if core.disposed {
            return Err(ViewError::Disposed(name));
        }
        if !core.initialized {
            core.initialized = true;
            core.invalidate();
            log::debug!("Initialized view '{}'", name);
        }
        Ok(())
    }

    /// Draw the view if it is visible and dirty.
    fn render(&mut self, renderer: &mut dyn TerminalRenderer) {
        let state = self.core().state;
        if !state.is_visible || !state.needs_redraw {
            return;
        }
        if self.draw(renderer) {
            self.core_mut().mark_as_drawn();
        }
    }

    /// Release renderer-owned resources.
    fn dispose(&mut self, _renderer: &mut dyn TerminalRenderer) {
        self.core_mut().dispose();
    }

    fn state(&self) -> ViewState {
        self.core().state
    }

    fn is_visible(&self) -> bool {
        self.core().state.is_visible
    }

    fn is_focused(&self) -> bool {
        self.core().state.is_focused
    }

    fn needs_redraw(&self) -> bool {
        self.core().state.needs_redraw
    }

    fn show(&mut self) {
        self.core_mut().state.is_visible = true;
        self.invalidate();
    }

    /// Hide the view. Focus is dropped but content is not invalidated.
    fn hide(&mut self) {
        let state = &mut self.core_mut().state;
        state.is_visible = false;
        state.is_focused = false;
    }

    fn focus(&mut self) {
        self.core_mut().state.is_focused = true;
        self.invalidate();
    }

    fn blur(&mut self) {
        self.core_mut().state.is_focused = false;
        self.invalidate();
    }

    fn position(&self) -> Position {
        self.core().position
    }

    fn dimensions(&self) -> Dimensions {
        self.core().dimensions
    }

    fn set_position(&mut self, position: Position) {
        self.core_mut().position = position;
        self.invalidate();
    }

    fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.core_mut().dimensions = dimensions;
        self.invalidate();
    }

    fn on_resize(&mut self, dimensions: Dimensions) {
        self.set_dimensions(dimensions);
    }

    fn invalidate(&mut self) {
        self.core_mut().invalidate();
    }

    /// Advance animations. Views without animation ignore it.
    fn update(&mut self, _delta: Duration) {}
}
