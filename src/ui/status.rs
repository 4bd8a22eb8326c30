use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::Theme;
use crate::app::AppMode;
use crate::models::RoomStats;

const NORMAL_HINTS: &[(&[&str], &str)] = &[
    (&["j", "k"], "move"),
    (&["a"], "add"),
    (&["o"], "allocate"),
    (&["r"], "release"),
    (&["d"], "delete"),
    (&["/"], "search"),
    (&["C", "A", "W"], "filter"),
    (&["q"], "quit"),
    (&["?"], "help"),
];

const SEARCH_HINTS: &[(&[&str], &str)] = &[
    (&["↑", "↓"], "move"),
    (&["Enter", "Esc"], "done"),
];

const FORM_HINTS: &[(&[&str], &str)] = &[
    (&["Tab", "↑", "↓"], "field"),
    (&["Space"], "toggle"),
    (&["Enter"], "submit"),
    (&["Esc"], "close"),
];

const CONFIRM_HINTS: &[(&[&str], &str)] = &[
    (&["y"], "confirm"),
    (&["n", "Esc"], "cancel"),
];

const HELP_HINTS: &[(&[&str], &str)] = &[(&["ESC"], "press any key to close help")];

/// Render keyboard hints bar showing mode-specific shortcuts
pub fn render_keyboard_hints(frame: &mut Frame, area: Rect, mode: AppMode, theme: &Theme) {
    let hint_data = match mode {
        AppMode::Normal => NORMAL_HINTS,
        AppMode::Search => SEARCH_HINTS,
        AppMode::Form => FORM_HINTS,
        AppMode::Confirm => CONFIRM_HINTS,
        AppMode::Help => HELP_HINTS,
    };

    let mut hints = Vec::new();

    for (keys, description) in hint_data {
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                hints.push(Span::styled("/", theme.status_desc.add_modifier(Modifier::DIM)));
            }
            hints.push(Span::styled(*key, theme.status_key));
        }

        hints.push(Span::raw(" "));
        hints.push(Span::styled(*description, theme.status_desc));
        hints.push(Span::raw("  "));
    }

    let paragraph =
        Paragraph::new(Line::from(hints)).style(theme.status_desc.bg(theme.status_bar_bg));

    frame.render_widget(paragraph, area);
}

/// Render the Total / Free / Allocated counters
pub fn render_stats_bar(frame: &mut Frame, area: Rect, stats: RoomStats, theme: &Theme) {
    let mut spans = vec![Span::styled(" Rooms  ", theme.panel_title)];

    for (label, value) in [
        ("Total", stats.total),
        ("Free", stats.free),
        ("Allocated", stats.allocated),
    ] {
        spans.push(Span::styled(format!("{}: ", label), theme.stat_label));
        spans.push(Span::styled(value.to_string(), theme.stat_value));
        spans.push(Span::raw("   "));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.panel_bg));
    frame.render_widget(paragraph, area);
}
