//! Vim-style modal input.
//!
//! The [`ModalInputEngine`] turns raw `(key, modifiers)` pairs into semantic
//! action strings. It knows nothing about views: the controller decides what
//! `move-down` or `open-below` means for whatever is on screen.
//!
//! Resolution works on a buffer of normalized key tokens:
//! - a buffer made only of digits (normal mode) is a repeat count,
//! - an exact match against a command valid in the current mode resolves,
//! - a strict prefix of some command waits for more input (with a timeout),
//! - anything else is discarded.

pub mod command;
pub mod key;
pub mod mode;
pub mod timer;

pub use command::{VimCommand, DEFAULT_COMMANDS};
pub use key::Modifiers;
pub use mode::{Mark, Mode, VimState};

use command::{
    ENTER_COMMAND, ENTER_INSERT, ENTER_INSERT_AFTER, ENTER_NORMAL, ENTER_VISUAL,
    ENTER_VISUAL_LINE, OPEN_ABOVE, OPEN_BELOW,
};
use log::*;
use std::time::{Duration, Instant};
use timer::ResetTimer;

const DEFAULT_REGISTER: char = '"';

/// Modal keystroke interpreter.
///
pub struct ModalInputEngine {
    commands: &'static [VimCommand],
    mode: Mode,
    buffer: Vec<String>,
    count: u32,
    register: char,
    last_command: Option<VimCommand>,
    visual_start: Option<Mark>,
    visual_end: Option<Mark>,
    timer: ResetTimer,
}

impl Default for ModalInputEngine {
    fn default() -> Self {
        ModalInputEngine::new()
    }
}

impl ModalInputEngine {
    /// Return a new engine in normal mode with the default command set.
    ///
    pub fn new() -> Self {
        ModalInputEngine::with_commands(DEFAULT_COMMANDS, timer::DEFAULT_TIMEOUT)
    }

    /// Return a new engine with the default command set and a custom
    /// ambiguity timeout.
    ///
    pub fn with_timeout(timeout: Duration) -> Self {
        ModalInputEngine::with_commands(DEFAULT_COMMANDS, timeout)
    }

    pub fn with_commands(commands: &'static [VimCommand], timeout: Duration) -> Self {
        ModalInputEngine {
            commands,
            mode: Mode::Normal,
            buffer: vec![],
            count: 0,
            register: DEFAULT_REGISTER,
            last_command: None,
            visual_start: None,
            visual_end: None,
            timer: ResetTimer::new(timeout),
        }
    }

    /// Resolve a key press against the registered commands using the current
    /// time for the ambiguity timer.
    ///
    pub fn process_key(&mut self, key: &str, modifiers: Modifiers) -> Option<String> {
        self.process_key_at(key, modifiers, Instant::now())
    }

    /// Resolve a key press. Returns the resolved action (suffixed with
    /// `:{count}` when a count greater than one was typed) or None when the
    /// key was buffered or discarded.
    ///
    pub fn process_key_at(&mut self, key: &str, modifiers: Modifiers, now: Instant) -> Option<String> {
        let token = key::normalize(key, modifiers);

        if self.mode != Mode::Normal && token == key::ESCAPE {
            let escape = self
                .commands
                .iter()
                .find(|c| c.applies_in(self.mode) && c.action == ENTER_NORMAL)
                .copied();
            if escape.is_some() {
                self.last_command = escape;
            }
            self.reset_buffer();
            self.apply_transition(ENTER_NORMAL);
            debug!("Escape resolved to '{}'", ENTER_NORMAL);
            return Some(ENTER_NORMAL.to_string());
        }

        self.buffer.push(token);

        if self.mode == Mode::Normal && self.buffer.iter().all(|t| is_digit_token(t)) {
            self.count = self.buffer.concat().parse().unwrap_or(u32::MAX);
            self.timer.arm(now);
            return None;
        }

        let pending = self.pending_tokens();
        let exact = self
            .commands
            .iter()
            .find(|c| c.applies_in(self.mode) && c.matches(pending))
            .copied();

        if let Some(command) = exact {
            let action = if self.count > 1 {
                format!("{}:{}", command.action, self.count)
            } else {
                command.action.to_string()
            };
            self.last_command = Some(command);
            self.reset_buffer();
            self.apply_transition(command.action);
            debug!("Resolved '{}' in {} mode", action, self.mode);
            return Some(action);
        }

        let is_prefix = self
            .commands
            .iter()
            .any(|c| c.applies_in(self.mode) && c.has_prefix(pending));
        if is_prefix {
            self.timer.arm(now);
            return None;
        }

        trace!("Discarding unmatched key sequence '{}'", self.buffer.concat());
        self.reset_buffer();
        None
    }

    /// Fire the ambiguity timer if its deadline has passed. Returns true if a
    /// pending sequence was dropped.
    ///
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.timer.fire_if_due(now) {
            trace!("Command buffer timed out: '{}'", self.buffer.concat());
            self.buffer.clear();
            self.count = 0;
            return true;
        }
        false
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Set the mode explicitly. Clears any pending sequence.
    ///
    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.reset_buffer();
        if mode != Mode::Visual {
            self.clear_visual_range();
        }
        self.mode = mode;
        self
    }

    /// Return a snapshot of the engine state.
    ///
    pub fn state(&self) -> VimState {
        VimState {
            mode: self.mode,
            command_buffer: self.buffer.concat(),
            count: self.count,
            register: self.register,
            last_command: self.last_command,
            visual_start: self.visual_start,
            visual_end: self.visual_end,
        }
    }

    /// Return true while a multi-key sequence or count is being typed.
    ///
    pub fn is_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn set_register(&mut self, register: char) -> &mut Self {
        self.register = register;
        self
    }

    pub fn set_visual_range(&mut self, start: Mark, end: Mark) -> &mut Self {
        self.visual_start = Some(start);
        self.visual_end = Some(end);
        self
    }

    pub fn clear_visual_range(&mut self) -> &mut Self {
        self.visual_start = None;
        self.visual_end = None;
        self
    }

    /// Return the registered commands, optionally only those valid in a mode.
    ///
    pub fn commands(&self, mode: Option<Mode>) -> Vec<&VimCommand> {
        self.commands
            .iter()
            .filter(|c| mode.map_or(true, |m| c.applies_in(m)))
            .collect()
    }

    /// Return a formatted keybinding listing grouped by mode. Commands sharing
    /// an action and description are listed on one line.
    ///
    pub fn keybinding_help(&self) -> String {
        let mut sections = vec![];
        for mode in Mode::ALL {
            let mut rows: Vec<(Vec<String>, &str)> = vec![];
            for command in self.commands(Some(mode)) {
                let keys = key::format_keys(command.keys);
                match rows.iter_mut().find(|(_, description)| *description == command.description) {
                    Some((bound, _)) => bound.push(keys),
                    None => rows.push((vec![keys], command.description)),
                }
            }
            if rows.is_empty() {
                continue;
            }
            let mut lines = vec![format!("{} mode", capitalize(&mode.to_string()))];
            for (keys, description) in rows {
                lines.push(format!("  {:<14} {}", keys.join(", "), description));
            }
            sections.push(lines.join("\n"));
        }
        sections.join("\n\n")
    }

    fn pending_tokens(&self) -> &[String] {
        if self.mode != Mode::Normal {
            return &self.buffer;
        }
        let digits = self.buffer.iter().take_while(|t| is_digit_token(t)).count();
        &self.buffer[digits..]
    }

    fn reset_buffer(&mut self) {
        self.buffer.clear();
        self.count = 0;
        self.timer.cancel();
    }

    fn apply_transition(&mut self, action: &str) {
        let next = match action {
            ENTER_INSERT | ENTER_INSERT_AFTER | OPEN_BELOW | OPEN_ABOVE => Mode::Insert,
            ENTER_VISUAL | ENTER_VISUAL_LINE => Mode::Visual,
            ENTER_COMMAND => Mode::Command,
            ENTER_NORMAL => Mode::Normal,
            _ => return,
        };
        if next != Mode::Visual {
            self.clear_visual_range();
        }
        if next != self.mode {
            debug!("Mode transition {} -> {}", self.mode, next);
        }
        self.mode = next;
    }
}

fn is_digit_token(token: &str) -> bool {
    token.len() == 1 && token.as_bytes()[0].is_ascii_digit()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(engine: &mut ModalInputEngine, keys: &[&str], now: Instant) -> Vec<Option<String>> {
        keys.iter()
            .map(|k| engine.process_key_at(k, Modifiers::NONE, now))
            .collect()
    }

    #[test]
    fn test_single_key_exact_match() {
        let mut engine = ModalInputEngine::new();
        assert_eq!(engine.process_key("j", Modifiers::NONE), Some("move-down".to_string()));
        assert_eq!(engine.state().command_buffer, "");
        assert!(!engine.timer_armed());
    }

    #[test]
    fn test_multi_key_exact_match_resolves_once() {
        let mut engine = ModalInputEngine::new();
        let now = Instant::now();
        let results = press(&mut engine, &["g", "g"], now);
        assert_eq!(results, vec![None, Some("move-to-start".to_string())]);
        assert_eq!(engine.state().command_buffer, "");
        assert_eq!(engine.state().last_command.map(|c| c.action), Some("move-to-start"));
    }

    #[test]
    fn test_prefix_waits_then_times_out() {
        let mut engine = ModalInputEngine::new();
        let now = Instant::now();
        assert_eq!(engine.process_key_at("d", Modifiers::NONE, now), None);
        assert_eq!(engine.state().command_buffer, "d");
        assert!(engine.timer_armed());

        assert!(!engine.tick(now + Duration::from_millis(999)));
        assert_eq!(engine.state().command_buffer, "d");

        assert!(engine.tick(now + Duration::from_millis(1000)));
        assert_eq!(engine.state().command_buffer, "");
        assert!(!engine.timer_armed());

        // A later 'd' starts a fresh sequence rather than completing "dd".
        assert_eq!(engine.process_key_at("d", Modifiers::NONE, now + Duration::from_secs(2)), None);
    }

    #[test]
    fn test_prefix_completion_before_timeout() {
        let mut engine = ModalInputEngine::new();
        let now = Instant::now();
        let results = press(&mut engine, &["d", "w"], now);
        assert_eq!(results[1], Some("delete-word".to_string()));
        assert!(!engine.tick(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_new_keystroke_replaces_timer() {
        let mut engine = ModalInputEngine::new();
        let start = Instant::now();
        engine.process_key_at("1", Modifiers::NONE, start);
        engine.process_key_at("2", Modifiers::NONE, start + Duration::from_millis(800));
        assert!(!engine.tick(start + Duration::from_millis(1200)));
        assert_eq!(engine.state().count, 12);
        assert!(engine.tick(start + Duration::from_millis(1800)));
        assert_eq!(engine.state().count, 0);
    }

    #[test]
    fn test_no_match_discards() {
        let mut engine = ModalInputEngine::new();
        assert_eq!(engine.process_key("Z", Modifiers::NONE), None);
        assert!(!engine.is_pending());
        assert!(!engine.timer_armed());

        engine.process_key("d", Modifiers::NONE);
        assert_eq!(engine.process_key("x", Modifiers::NONE), None);
        assert_eq!(engine.state().command_buffer, "");
    }

    #[test]
    fn test_count_applies_once() {
        let mut engine = ModalInputEngine::new();
        assert_eq!(engine.process_key("5", Modifiers::NONE), None);
        assert_eq!(engine.state().count, 5);
        assert_eq!(engine.process_key("j", Modifiers::NONE), Some("move-down:5".to_string()));
        assert_eq!(engine.state().count, 0);
        assert_eq!(engine.process_key("j", Modifiers::NONE), Some("move-down".to_string()));
    }

    #[test]
    fn test_multi_digit_count_with_multi_key_command() {
        let mut engine = ModalInputEngine::new();
        let now = Instant::now();
        let results = press(&mut engine, &["1", "2", "d", "d"], now);
        assert_eq!(results.last().cloned().flatten(), Some("delete-line:12".to_string()));
    }

    #[test]
    fn test_count_of_one_is_plain_action() {
        let mut engine = ModalInputEngine::new();
        engine.process_key("1", Modifiers::NONE);
        assert_eq!(engine.process_key("k", Modifiers::NONE), Some("move-up".to_string()));
    }

    #[test]
    fn test_ctrl_chord() {
        let mut engine = ModalInputEngine::new();
        assert_eq!(engine.process_key("d", Modifiers::CTRL), Some("page-down".to_string()));
    }

    #[test]
    fn test_shift_uppercases() {
        let mut engine = ModalInputEngine::new();
        assert_eq!(engine.process_key("g", Modifiers::SHIFT), Some("move-to-end".to_string()));
    }

    #[test]
    fn test_mode_transitions() {
        let mut engine = ModalInputEngine::new();
        assert_eq!(engine.process_key("i", Modifiers::NONE), Some("enter-insert".to_string()));
        assert_eq!(engine.mode(), Mode::Insert);
        // Normal-mode bindings are not active while inserting.
        assert_eq!(engine.process_key("j", Modifiers::NONE), None);
        assert_eq!(engine.process_key("Escape", Modifiers::NONE), Some("enter-normal".to_string()));
        assert_eq!(engine.mode(), Mode::Normal);

        engine.process_key("V", Modifiers::NONE);
        assert_eq!(engine.mode(), Mode::Visual);
        engine.process_key("Escape", Modifiers::NONE);
        engine.process_key(":", Modifiers::NONE);
        assert_eq!(engine.mode(), Mode::Command);
        engine.process_key("Escape", Modifiers::NONE);
        engine.process_key("o", Modifiers::NONE);
        assert_eq!(engine.mode(), Mode::Insert);
    }

    #[test]
    fn test_escape_wins_over_buffered_state() {
        for entry in ["i", "v", ":"] {
            let mut engine = ModalInputEngine::new();
            engine.process_key(entry, Modifiers::NONE);
            engine.process_key("q", Modifiers::NONE);
            engine.process_key("w", Modifiers::NONE);
            assert_eq!(
                engine.process_key("Escape", Modifiers::NONE),
                Some("enter-normal".to_string())
            );
            assert_eq!(engine.mode(), Mode::Normal);
            assert_eq!(engine.state().command_buffer, "");
        }
    }

    #[test]
    fn test_digits_are_not_counts_outside_normal_mode() {
        let mut engine = ModalInputEngine::new();
        engine.process_key("v", Modifiers::NONE);
        assert_eq!(engine.process_key("3", Modifiers::NONE), None);
        assert_eq!(engine.state().count, 0);
        assert!(!engine.is_pending());
    }

    #[test]
    fn test_set_mode_clears_buffer() {
        let mut engine = ModalInputEngine::new();
        engine.process_key("g", Modifiers::NONE);
        engine.set_mode(Mode::Command);
        assert_eq!(engine.mode(), Mode::Command);
        assert!(!engine.is_pending());
        assert!(!engine.timer_armed());
    }

    #[test]
    fn test_leaving_visual_clears_range() {
        let mut engine = ModalInputEngine::new();
        engine.process_key("v", Modifiers::NONE);
        engine.set_visual_range((2, 0), (4, 0));
        assert_eq!(engine.state().visual_start, Some((2, 0)));
        engine.process_key("Escape", Modifiers::NONE);
        assert_eq!(engine.state().visual_start, None);
    }

    #[test]
    fn test_commands_filtered_by_mode() {
        let engine = ModalInputEngine::new();
        let command_mode = engine.commands(Some(Mode::Command));
        assert!(command_mode.iter().all(|c| c.applies_in(Mode::Command)));
        assert!(command_mode.iter().any(|c| c.action == "execute-command"));
        assert_eq!(engine.commands(None).len(), DEFAULT_COMMANDS.len());
    }

    #[test]
    fn test_keybinding_help() {
        let engine = ModalInputEngine::new();
        let help = engine.keybinding_help();
        assert!(help.starts_with("Normal mode"));
        assert!(help.contains("Insert mode"));
        assert!(help.contains("j, Down"));
        assert!(help.contains("gg"));
        assert!(help.contains("Ctrl+d, Ctrl+f"));
    }
}
