use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used by the browser.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub accent: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_muted: ColorSpec,

    // Background colors
    pub background: ColorSpec,
    pub surface: ColorSpec,

    // Status colors
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,
    pub info: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,
    pub match_fg: ColorSpec,

    // Status bar mode colors
    pub mode_normal: ColorSpec,
    pub mode_insert: ColorSpec,
    pub mode_visual: ColorSpec,
    pub mode_command: ColorSpec,
}

/// Color specification that can be serialized/deserialized.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        ColorSpec { r, g, b }
    }

    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> ColorSpec {
    ColorSpec::new(r, g, b)
}

pub const DEFAULT_THEME: &str = "tokyo-night";

impl Default for Theme {
    fn default() -> Self {
        Self::tokyo_night()
    }
}

impl Theme {
    /// Tokyo Night theme.
    ///
    pub fn tokyo_night() -> Self {
        Theme {
            name: "tokyo-night".to_string(),
            primary: rgb(125, 207, 255),      // Cyan
            accent: rgb(255, 159, 196),       // Pink
            text: rgb(169, 177, 214),         // Foreground
            text_muted: rgb(117, 121, 148),   // Comment
            background: rgb(26, 27, 38),      // Background
            surface: rgb(36, 40, 59),         // Surface
            success: rgb(158, 206, 106),      // Green
            warning: rgb(255, 202, 40),       // Yellow
            error: rgb(247, 118, 142),        // Red
            info: rgb(122, 162, 247),         // Blue
            border_active: rgb(125, 207, 255),
            border_normal: rgb(117, 121, 148),
            highlight_bg: rgb(41, 46, 66),
            highlight_fg: rgb(192, 202, 245),
            match_fg: rgb(255, 158, 100),     // Orange
            mode_normal: rgb(122, 162, 247),
            mode_insert: rgb(158, 206, 106),
            mode_visual: rgb(187, 154, 247),
            mode_command: rgb(255, 202, 40),
        }
    }

    /// Dracula theme.
    ///
    pub fn dracula() -> Self {
        Theme {
            name: "dracula".to_string(),
            primary: rgb(189, 147, 249),      // Purple
            accent: rgb(255, 121, 198),       // Pink
            text: rgb(248, 248, 242),         // Foreground
            text_muted: rgb(98, 114, 164),    // Comment
            background: rgb(40, 42, 54),      // Background
            surface: rgb(68, 71, 90),         // Current line
            success: rgb(80, 250, 123),       // Green
            warning: rgb(241, 250, 140),      // Yellow
            error: rgb(255, 85, 85),          // Red
            info: rgb(139, 233, 253),         // Cyan
            border_active: rgb(189, 147, 249),
            border_normal: rgb(98, 114, 164),
            highlight_bg: rgb(68, 71, 90),
            highlight_fg: rgb(248, 248, 242),
            match_fg: rgb(255, 184, 108),     // Orange
            mode_normal: rgb(189, 147, 249),
            mode_insert: rgb(80, 250, 123),
            mode_visual: rgb(255, 121, 198),
            mode_command: rgb(255, 184, 108),
        }
    }

    /// Catppuccin Mocha theme.
    ///
    pub fn catppuccin_mocha() -> Self {
        Theme {
            name: "catppuccin-mocha".to_string(),
            primary: rgb(203, 166, 247),      // Mauve
            accent: rgb(245, 189, 230),       // Pink
            text: rgb(205, 214, 244),         // Text
            text_muted: rgb(127, 132, 156),   // Overlay1
            background: rgb(30, 30, 46),      // Base
            surface: rgb(49, 50, 68),         // Surface0
            success: rgb(166, 227, 161),      // Green
            warning: rgb(249, 226, 175),      // Yellow
            error: rgb(243, 139, 168),        // Red
            info: rgb(137, 180, 250),         // Blue
            border_active: rgb(203, 166, 247),
            border_normal: rgb(127, 132, 156),
            highlight_bg: rgb(69, 71, 90),
            highlight_fg: rgb(205, 214, 244),
            match_fg: rgb(250, 179, 135),     // Peach
            mode_normal: rgb(137, 180, 250),
            mode_insert: rgb(166, 227, 161),
            mode_visual: rgb(203, 166, 247),
            mode_command: rgb(250, 179, 135),
        }
    }

    /// Rose Pine theme.
    ///
    pub fn rose_pine() -> Self {
        Theme {
            name: "rose-pine".to_string(),
            primary: rgb(196, 167, 231),      // Iris
            accent: rgb(235, 188, 186),       // Rose
            text: rgb(224, 222, 244),         // Text
            text_muted: rgb(110, 106, 134),   // Muted
            background: rgb(25, 23, 36),      // Base
            surface: rgb(31, 29, 46),         // Surface
            success: rgb(49, 116, 143),       // Pine
            warning: rgb(246, 193, 119),      // Gold
            error: rgb(235, 111, 146),        // Love
            info: rgb(156, 207, 216),         // Foam
            border_active: rgb(196, 167, 231),
            border_normal: rgb(110, 106, 134),
            highlight_bg: rgb(38, 35, 58),
            highlight_fg: rgb(224, 222, 244),
            match_fg: rgb(246, 193, 119),
            mode_normal: rgb(156, 207, 216),
            mode_insert: rgb(49, 116, 143),
            mode_visual: rgb(196, 167, 231),
            mode_command: rgb(246, 193, 119),
        }
    }

    /// Get a theme by name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tokyo-night" => Some(Self::tokyo_night()),
            "dracula" => Some(Self::dracula()),
            "catppuccin-mocha" => Some(Self::catppuccin_mocha()),
            "rose-pine" => Some(Self::rose_pine()),
            _ => None,
        }
    }

    /// Get list of all available theme names.
    ///
    pub fn available_themes() -> Vec<String> {
        vec![
            "tokyo-night".to_string(),
            "dracula".to_string(),
            "catppuccin-mocha".to_string(),
            "rose-pine".to_string(),
        ]
    }
}
