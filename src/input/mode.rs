//! Input modes and the engine state snapshot.

use super::command::VimCommand;
use std::fmt;

/// The four mutually exclusive input-interpretation states.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Normal,
    Insert,
    Visual,
    Command,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Normal, Mode::Insert, Mode::Visual, Mode::Command];

    /// Return the label shown in the status bar.
    ///
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual => "VISUAL",
            Mode::Command => "COMMAND",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Visual => "visual",
            Mode::Command => "command",
        };
        write!(f, "{}", name)
    }
}

/// A `(line, column)` pair marking one end of a visual selection.
///
pub type Mark = (usize, usize);

/// Read-only snapshot of the modal engine.
///
#[derive(Debug, Clone, PartialEq)]
pub struct VimState {
    pub mode: Mode,
    pub command_buffer: String,
    pub count: u32,
    pub register: char,
    pub last_command: Option<VimCommand>,
    pub visual_start: Option<Mark>,
    pub visual_end: Option<Mark>,
}
