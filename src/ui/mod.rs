pub mod details;
pub mod error_modal;
pub mod help;
pub mod layout;
pub mod room_list;
pub mod status;
pub mod theme;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph};

pub use details::render_side_panel;
pub use error_modal::render_error_modal;
pub use help::render_help_overlay;
pub use layout::{MainLayout, centered_rect, create_main_layout};
pub use room_list::render_room_list;
pub use status::{render_keyboard_hints, render_stats_bar};
pub use theme::{BuiltInTheme, Theme};

/// Render vertical divider line between the room list and the side panel
pub fn render_divider(frame: &mut Frame, area: Rect, theme: &Theme) {
    let lines: Vec<Line> = (0..area.height)
        .map(|_| Line::from(Span::styled(theme.divider.as_str(), theme.divider_style)))
        .collect();

    // Center the line in the gutter
    let inner = Rect {
        x: area.x + area.width / 2,
        width: area.width.min(1),
        ..area
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render confirmation dialog before deleting a room
pub fn render_confirm_overlay(frame: &mut Frame, area: Rect, room_no: &str, theme: &Theme) {
    let overlay_area = centered_rect(50, 20, area);

    frame.render_widget(Clear, overlay_area);

    let message = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Delete room {}?", room_no),
            theme.confirm_text.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(Its allocation is released as well)",
            theme.help_footer,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", theme.confirm_key),
            Span::styled(" - Yes, delete  ", theme.confirm_text),
            Span::styled("n", theme.confirm_key),
            Span::styled(" - No, keep it", theme.confirm_text),
        ]),
    ];

    let paragraph = Paragraph::new(message)
        .block(
            Block::default()
                .style(Style::default().bg(theme.modal_bg))
                .padding(ratatui::widgets::Padding::uniform(2)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, overlay_area);
}
