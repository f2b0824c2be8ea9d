//! Command registry.
//!
//! Commands are plain static data: a key sequence, the modes in which it is
//! recognized, the action identifier the engine resolves to and a short
//! description for the help screen.

use super::mode::Mode;

const N: &[Mode] = &[Mode::Normal];
const V: &[Mode] = &[Mode::Visual];
const NV: &[Mode] = &[Mode::Normal, Mode::Visual];
const I: &[Mode] = &[Mode::Insert];
const C: &[Mode] = &[Mode::Command];
const IVC: &[Mode] = &[Mode::Insert, Mode::Visual, Mode::Command];

pub const ENTER_NORMAL: &str = "enter-normal";
pub const ENTER_INSERT: &str = "enter-insert";
pub const ENTER_INSERT_AFTER: &str = "enter-insert-after";
pub const OPEN_BELOW: &str = "open-below";
pub const OPEN_ABOVE: &str = "open-above";
pub const ENTER_VISUAL: &str = "enter-visual";
pub const ENTER_VISUAL_LINE: &str = "enter-visual-line";
pub const ENTER_COMMAND: &str = "enter-command";

/// A registered key sequence.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VimCommand {
    pub keys: &'static [&'static str],
    pub modes: &'static [Mode],
    pub action: &'static str,
    pub description: &'static str,
}

impl VimCommand {
    /// Return true if the command is recognized in the given mode.
    ///
    pub fn applies_in(&self, mode: Mode) -> bool {
        self.modes.contains(&mode)
    }

    /// Return true if the command's key sequence equals the given tokens.
    ///
    pub fn matches(&self, tokens: &[String]) -> bool {
        self.keys.len() == tokens.len() && self.keys.iter().zip(tokens).all(|(k, t)| *k == *t)
    }

    /// Return true if the given tokens are a strict prefix of the command's
    /// key sequence.
    ///
    pub fn has_prefix(&self, tokens: &[String]) -> bool {
        tokens.len() < self.keys.len() && self.keys.iter().zip(tokens).all(|(k, t)| *k == *t)
    }
}

const fn cmd(
    keys: &'static [&'static str],
    modes: &'static [Mode],
    action: &'static str,
    description: &'static str,
) -> VimCommand {
    VimCommand {
        keys,
        modes,
        action,
        description,
    }
}

/// Default command set used by the browser.
///
pub static DEFAULT_COMMANDS: &[VimCommand] = &[
    // Movement
    cmd(&["j"], NV, "move-down", "Move down"),
    cmd(&["Down"], NV, "move-down", "Move down"),
    cmd(&["k"], NV, "move-up", "Move up"),
    cmd(&["Up"], NV, "move-up", "Move up"),
    cmd(&["h"], N, "move-left", "Previous section"),
    cmd(&["Left"], N, "move-left", "Previous section"),
    cmd(&["l"], N, "move-right", "Next section"),
    cmd(&["Right"], N, "move-right", "Next section"),
    cmd(&["g", "g"], NV, "move-to-start", "Go to first task"),
    cmd(&["G"], NV, "move-to-end", "Go to last task"),
    cmd(&["ctrl+d"], NV, "page-down", "Page down"),
    cmd(&["ctrl+f"], NV, "page-down", "Page down"),
    cmd(&["ctrl+u"], NV, "page-up", "Page up"),
    cmd(&["ctrl+b"], NV, "page-up", "Page up"),
    // Mode changes
    cmd(&["i"], N, ENTER_INSERT, "Search (insert at start)"),
    cmd(&["a"], N, ENTER_INSERT_AFTER, "Search (append)"),
    cmd(&["o"], N, OPEN_BELOW, "Open selected task"),
    cmd(&["O"], N, OPEN_ABOVE, "Open selected task"),
    cmd(&["v"], N, ENTER_VISUAL, "Visual selection"),
    cmd(&["V"], N, ENTER_VISUAL_LINE, "Visual line selection"),
    cmd(&[":"], N, ENTER_COMMAND, "Command line"),
    cmd(&["Escape"], IVC, ENTER_NORMAL, "Back to normal mode"),
    cmd(&["ctrl+c"], I, ENTER_NORMAL, "Back to normal mode"),
    cmd(&["v"], V, ENTER_NORMAL, "Leave visual mode"),
    cmd(&["V"], V, ENTER_NORMAL, "Leave visual mode"),
    // Editing
    cmd(&["d", "d"], N, "delete-line", "Archive task"),
    cmd(&["d", "w"], N, "delete-word", "Delete word"),
    cmd(&["y", "y"], N, "yank-line", "Yank task id"),
    cmd(&["u"], N, "undo", "Undo last status change"),
    cmd(&["y"], V, "yank-selection", "Yank selected ids"),
    cmd(&["d"], V, "delete-selection", "Archive selected tasks"),
    cmd(&[" "], V, "toggle-selection", "Toggle status of selection"),
    // Search
    cmd(&["/"], N, "search", "Search tasks"),
    cmd(&["n"], N, "search-next", "Next match"),
    cmd(&["N"], N, "search-prev", "Previous match"),
    // Application
    cmd(&["f"], N, "cycle-filter", "Cycle status filter"),
    cmd(&["r"], N, "refresh", "Reload tasks"),
    cmd(&["?"], N, "show-help", "Show keybindings"),
    cmd(&["q"], N, "quit", "Close view / quit"),
    cmd(&["Enter"], C, "execute-command", "Run command line"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_matches_and_prefix() {
        let command = cmd(&["d", "d"], N, "delete-line", "");
        assert!(command.matches(&tokens(&["d", "d"])));
        assert!(!command.matches(&tokens(&["d"])));
        assert!(command.has_prefix(&tokens(&["d"])));
        assert!(!command.has_prefix(&tokens(&["d", "d"])));
        assert!(!command.has_prefix(&tokens(&["x"])));
    }

    #[test]
    fn test_escape_registered_for_every_non_normal_mode() {
        for mode in [Mode::Insert, Mode::Visual, Mode::Command] {
            assert!(DEFAULT_COMMANDS
                .iter()
                .any(|c| c.applies_in(mode) && c.action == ENTER_NORMAL && c.keys == ["Escape"]));
        }
    }

    #[test]
    fn test_no_duplicate_sequences_per_mode() {
        for mode in Mode::ALL {
            let commands: Vec<_> = DEFAULT_COMMANDS.iter().filter(|c| c.applies_in(mode)).collect();
            for (i, a) in commands.iter().enumerate() {
                for b in commands.iter().skip(i + 1) {
                    assert_ne!(a.keys, b.keys, "duplicate binding in {} mode", mode);
                }
            }
        }
    }
}
