use crate::input::Mode;
use crate::ui::theme::Theme;
use ratatui::style::{Color, Modifier, Style};

/// Return the border style for focused views.
///
pub fn active_border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.border_active.to_color())
}

/// Return the border style for unfocused views.
///
pub fn normal_border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.border_normal.to_color())
}

/// Return the style for header and title rows.
///
pub fn title_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.primary.to_color())
        .add_modifier(Modifier::BOLD)
}

/// Return the style for normal text.
///
pub fn normal_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text.to_color())
}

/// Return the style for secondary text such as counts and hints.
///
pub fn muted_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text_muted.to_color())
}

/// Return the style for the current row.
///
pub fn current_row_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.highlight_fg.to_color())
        .bg(theme.highlight_bg.to_color())
        .add_modifier(Modifier::BOLD)
}

/// Return the style for rows inside a visual selection.
///
pub fn visual_row_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.text.to_color())
        .bg(theme.surface.to_color())
}

/// Return the style for matched characters in search results.
///
pub fn match_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.match_fg.to_color())
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Return the style for the active section tab.
///
pub fn active_tab_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.background.to_color())
        .bg(theme.primary.to_color())
        .add_modifier(Modifier::BOLD)
}

/// Return the style for inactive section tabs.
///
pub fn inactive_tab_style(theme: &Theme) -> Style {
    muted_text_style(theme)
}

/// Return the style for the filled part of a progress bar.
///
pub fn progress_filled_style(theme: &Theme) -> Style {
    Style::default().fg(theme.success.to_color())
}

/// Return the style for the empty part of a progress bar.
///
pub fn progress_empty_style(theme: &Theme) -> Style {
    Style::default().fg(theme.surface.to_color())
}

/// Return the style for the scrollbar thumb.
///
pub fn scrollbar_style(theme: &Theme) -> Style {
    Style::default().fg(theme.border_active.to_color())
}

/// Return the style for the mode badge in the status bar.
///
pub fn mode_style(theme: &Theme, mode: Mode) -> Style {
    let bg = match mode {
        Mode::Normal => theme.mode_normal,
        Mode::Insert => theme.mode_insert,
        Mode::Visual => theme.mode_visual,
        Mode::Command => theme.mode_command,
    };
    Style::default()
        .fg(theme.background.to_color())
        .bg(bg.to_color())
        .add_modifier(Modifier::BOLD)
}

/// Return the style for status bar text.
///
pub fn status_bar_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.text.to_color())
        .bg(theme.surface.to_color())
}

/// Return the style for error messages.
///
pub fn error_style(theme: &Theme) -> Style {
    Style::default().fg(theme.error.to_color())
}

/// Return a foreground-only style.
///
pub fn fg(color: Color) -> Style {
    Style::default().fg(color)
}
