//! Read-only keybinding help.

use crate::input::key;
use crate::input::Modifiers;
use crate::ui::renderer::TerminalRenderer;
use crate::ui::theme::Theme;
use crate::ui::view::{View, ViewCore, ViewEvent};
use crate::ui::widgets::styling;
use crate::utils::text_processing::truncate_with_ellipsis;

pub struct HelpView {
    core: ViewCore,
    theme: Theme,
    lines: Vec<String>,
    scroll_offset: usize,
}

impl HelpView {
    pub fn new(theme: Theme) -> Self {
        HelpView {
            core: ViewCore::new(),
            theme,
            lines: vec![],
            scroll_offset: 0,
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = text.lines().map(str::to_string).collect();
        self.scroll_offset = 0;
        self.invalidate();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.invalidate();
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn page(&self) -> usize {
        (self.core.dimensions.height.saturating_sub(2) as usize).max(1)
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.page())
    }

    pub fn scroll_by(&mut self, delta: i64) {
        let target = (self.scroll_offset as i64)
            .saturating_add(delta)
            .clamp(0, self.max_offset() as i64) as usize;
        if target != self.scroll_offset {
            self.scroll_offset = target;
            self.invalidate();
        }
    }

    /// Scroll by whole pages; negative counts scroll up.
    ///
    pub fn page_by(&mut self, pages: i64) {
        self.scroll_by(pages.saturating_mul(self.page() as i64));
    }

    pub fn page_down(&mut self) {
        self.page_by(1);
    }

    pub fn page_up(&mut self) {
        self.page_by(-1);
    }
}

impl View for HelpView {
    fn name(&self) -> &'static str {
        "help"
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
        if dimensions.width < 4 || dimensions.height < 3 {
            return true;
        }
        renderer.clear_area(position, dimensions, None);
        renderer.draw_box(
            position,
            dimensions.width,
            dimensions.height,
            Some(styling::active_border_style(&self.theme)),
        );
        renderer.write(
            " Keybindings (q to close) ",
            position.offset(2, 0),
            Some(styling::title_style(&self.theme)),
        );

        let width = dimensions.width.saturating_sub(4) as usize;
        for (row, line) in self.lines.iter().skip(self.scroll_offset).take(self.page()).enumerate() {
            let style = if line.starts_with(' ') {
                styling::normal_text_style(&self.theme)
            } else {
                styling::title_style(&self.theme)
            };
            renderer.write(
                &truncate_with_ellipsis(line, width),
                position.offset(2, 1 + row as u16),
                Some(style),
            );
        }
        true
    }

    fn on_key_press(&mut self, key: &str, modifiers: Modifiers) -> bool {
        if !self.is_focused() {
            return false;
        }
        match (key, modifiers.ctrl) {
            ("j", false) | (key::DOWN, _) => self.scroll_by(1),
            ("k", false) | (key::UP, _) => self.scroll_by(-1),
            ("g", false) | (key::HOME, _) => self.scroll_by(-(self.scroll_offset as i64)),
            ("G", false) | (key::END, _) => self.scroll_by(self.lines.len() as i64),
            (key::PAGE_DOWN, _) | ("d", true) => self.page_down(),
            (key::PAGE_UP, _) | ("u", true) => self.page_up(),
            ("q", false) | ("?", false) | (key::ESCAPE, _) => self.core.notify(ViewEvent::Close),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ModalInputEngine;
    use crate::ui::renderer::BufferRenderer;
    use crate::ui::view::Dimensions;
    use std::sync::mpsc;

    fn help(height: u16) -> HelpView {
        let mut view = HelpView::new(Theme::default());
        view.set_dimensions(Dimensions::new(60, height));
        view.set_text(&ModalInputEngine::new().keybinding_help());
        view.show();
        view.focus();
        view
    }

    #[test]
    fn test_renders_keybinding_help() {
        let mut renderer = BufferRenderer::new(60, 12);
        let mut view = help(12);
        view.render(&mut renderer);
        assert!(renderer.row_text(0).contains("Keybindings"));
        assert!(renderer.row_text(1).contains("Normal mode"));
        assert!(renderer.row_text(2).contains("j, Down"));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut view = help(12);
        view.on_key_press("k", Modifiers::NONE);
        assert_eq!(view.scroll_offset(), 0);
        view.on_key_press("G", Modifiers::NONE);
        let end = view.scroll_offset();
        assert!(end > 0);
        view.on_key_press("j", Modifiers::NONE);
        assert_eq!(view.scroll_offset(), end);
        view.on_key_press("g", Modifiers::NONE);
        assert_eq!(view.scroll_offset(), 0);
    }

    #[test]
    fn test_page_by_clamps_large_counts() {
        let mut view = help(12);
        view.page_by(i64::from(u32::MAX));
        let end = view.scroll_offset();
        view.on_key_press("G", Modifiers::NONE);
        assert_eq!(view.scroll_offset(), end);
        view.page_by(i64::MIN);
        assert_eq!(view.scroll_offset(), 0);
    }

    #[test]
    fn test_close_keys_notify() {
        let (tx, rx) = mpsc::channel();
        let mut view = help(12);
        view.core_mut().set_event_sender(tx);
        for k in ["q", "?", key::ESCAPE] {
            assert!(view.on_key_press(k, Modifiers::NONE));
        }
        assert_eq!(rx.try_iter().count(), 3);
    }
}
