use ratatui::prelude::*;

/// Theme errors
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Unknown theme '{0}' (available: dark, light)")]
    UnknownTheme(String),
}

/// Runtime theme with direct field access for all UI elements
#[derive(Debug, Clone)]
pub struct Theme {
    // === Default Colors ===
    pub default_fg: Color,
    pub default_bg: Color,

    // === Backgrounds ===
    pub panel_bg: Color,
    pub modal_bg: Color,
    pub selection_bg: Color,
    pub status_bar_bg: Color,
    pub search_focused_bg: Color,

    // === Room List ===
    pub room_number: Style,
    pub room_text: Style,
    pub room_text_selected: Style,
    pub room_occupied: Style,
    pub badge_ac: Style,
    pub badge_washroom: Style,
    pub badge_occupied: Style,
    pub list_header: Style,
    pub list_item_count: Style,
    pub empty_state: Style,

    // === Stats Bar ===
    pub stat_label: Style,
    pub stat_value: Style,

    // === Side Panel ===
    pub panel_title: Style,
    pub panel_label: Style,
    pub panel_value: Style,
    pub field_focused: Style,
    pub success: Style,
    pub error: Style,

    // === Status Bar ===
    pub status_key: Style,
    pub status_desc: Style,

    // === Search Input ===
    pub search_input: Style,

    // === Help Modal ===
    pub help_title: Style,
    pub help_header: Style,
    pub help_key: Style,
    pub help_desc: Style,
    pub help_footer: Style,

    // === Error Modal ===
    pub error_text: Style,
    pub error_border: Style,

    // === Confirm Modal ===
    pub confirm_text: Style,
    pub confirm_key: Style,

    // === Divider ===
    pub divider: String,
    pub divider_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl Theme {
    /// Load a built-in theme by name
    pub fn load(name: &str) -> Result<Self, ThemeError> {
        BuiltInTheme::from_name(name)
            .map(|t| t.to_theme())
            .ok_or_else(|| ThemeError::UnknownTheme(name.to_string()))
    }

    /// Catppuccin Mocha theme (dark)
    pub fn catppuccin_mocha() -> Self {
        let fg = Color::Rgb(205, 214, 244);
        let bg = Color::Rgb(30, 30, 46);
        let subtext = Color::Rgb(166, 173, 200);
        let blue = Color::Rgb(137, 180, 250);
        let green = Color::Rgb(166, 227, 161);
        let red = Color::Rgb(243, 139, 168);
        let yellow = Color::Rgb(249, 226, 175);
        let sky = Color::Rgb(137, 220, 235);
        let pink = Color::Rgb(245, 194, 231);

        Theme {
            default_fg: fg,
            default_bg: bg,

            panel_bg: bg,
            modal_bg: Color::Rgb(24, 24, 37),
            selection_bg: Color::Rgb(49, 50, 68),
            status_bar_bg: Color::Rgb(49, 50, 68),
            search_focused_bg: Color::Rgb(69, 71, 90),

            room_number: Style::default().fg(pink).add_modifier(Modifier::BOLD),
            room_text: Style::default().fg(fg),
            room_text_selected: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            room_occupied: Style::default().fg(subtext).add_modifier(Modifier::DIM),
            badge_ac: Style::default().fg(sky),
            badge_washroom: Style::default().fg(green),
            badge_occupied: Style::default().fg(red),
            list_header: Style::default().fg(subtext),
            list_item_count: Style::default().fg(subtext).add_modifier(Modifier::DIM),
            empty_state: Style::default().fg(subtext),

            stat_label: Style::default().fg(subtext),
            stat_value: Style::default().fg(fg).add_modifier(Modifier::BOLD),

            panel_title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            panel_label: Style::default().fg(subtext),
            panel_value: Style::default().fg(fg),
            field_focused: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
            success: Style::default().fg(green),
            error: Style::default().fg(red),

            status_key: Style::default().add_modifier(Modifier::BOLD),
            status_desc: Style::default().fg(subtext),

            search_input: Style::default().fg(yellow),

            help_title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            help_header: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
            help_desc: Style::default().fg(fg),
            help_footer: Style::default().fg(subtext),

            error_text: Style::default().fg(fg),
            error_border: Style::default().fg(red),

            confirm_text: Style::default().fg(fg),
            confirm_key: Style::default().fg(sky).add_modifier(Modifier::BOLD),

            divider: "│".to_string(),
            divider_style: Style::default().fg(Color::Rgb(108, 112, 134)),
        }
    }

    /// Catppuccin Latte theme (light)
    pub fn catppuccin_latte() -> Self {
        let fg = Color::Rgb(76, 79, 105);
        let bg = Color::Rgb(239, 241, 245);
        let subtext = Color::Rgb(108, 111, 133);
        let blue = Color::Rgb(30, 102, 245);
        let green = Color::Rgb(64, 160, 43);
        let red = Color::Rgb(210, 15, 57);
        let yellow = Color::Rgb(223, 142, 29);
        let sky = Color::Rgb(4, 165, 229);
        let pink = Color::Rgb(234, 118, 203);

        Theme {
            default_fg: fg,
            default_bg: bg,

            panel_bg: bg,
            modal_bg: Color::Rgb(230, 233, 239),
            selection_bg: Color::Rgb(204, 208, 218),
            status_bar_bg: Color::Rgb(204, 208, 218),
            search_focused_bg: Color::Rgb(220, 224, 232),

            room_number: Style::default().fg(pink).add_modifier(Modifier::BOLD),
            room_text: Style::default().fg(fg),
            room_text_selected: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            room_occupied: Style::default().fg(subtext).add_modifier(Modifier::DIM),
            badge_ac: Style::default().fg(sky),
            badge_washroom: Style::default().fg(green),
            badge_occupied: Style::default().fg(red),
            list_header: Style::default().fg(subtext),
            list_item_count: Style::default().fg(subtext).add_modifier(Modifier::DIM),
            empty_state: Style::default().fg(subtext),

            stat_label: Style::default().fg(subtext),
            stat_value: Style::default().fg(fg).add_modifier(Modifier::BOLD),

            panel_title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            panel_label: Style::default().fg(subtext),
            panel_value: Style::default().fg(fg),
            field_focused: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
            success: Style::default().fg(green),
            error: Style::default().fg(red),

            status_key: Style::default().add_modifier(Modifier::BOLD),
            status_desc: Style::default().fg(subtext),

            search_input: Style::default().fg(yellow),

            help_title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            help_header: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
            help_desc: Style::default().fg(fg),
            help_footer: Style::default().fg(subtext),

            error_text: Style::default().fg(fg),
            error_border: Style::default().fg(red),

            confirm_text: Style::default().fg(fg),
            confirm_key: Style::default().fg(sky).add_modifier(Modifier::BOLD),

            divider: "│".to_string(),
            divider_style: Style::default().fg(Color::Rgb(156, 160, 176)),
        }
    }
}

/// Themes compiled into the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltInTheme {
    Dark,
    Light,
}

impl BuiltInTheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" | "catppuccin-mocha" => Some(BuiltInTheme::Dark),
            "light" | "catppuccin-latte" => Some(BuiltInTheme::Light),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltInTheme::Dark => "dark",
            BuiltInTheme::Light => "light",
        }
    }

    pub fn to_theme(&self) -> Theme {
        match self {
            BuiltInTheme::Dark => Theme::catppuccin_mocha(),
            BuiltInTheme::Light => Theme::catppuccin_latte(),
        }
    }
}
