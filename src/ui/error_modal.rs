use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::Theme;
use super::layout::centered_rect;

/// Render a startup problem (bad config value) over the room view
///
/// The app keeps running with defaults; any key closes the modal.
pub fn render_error_modal(frame: &mut Frame, area: Rect, error_msg: &str, theme: &Theme) {
    let overlay_area = centered_rect(70, 30, area);

    frame.render_widget(Clear, overlay_area);

    let lines = vec![
        Line::from(Span::styled(
            error_msg,
            theme.error_text.add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Using the default theme. Fix roomr.toml to make this go away.",
            theme.help_footer,
        )),
        Line::default(),
        Line::from(Span::styled("Press any key to continue", theme.help_footer)),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.error_border)
                .title(" roomr: config problem ")
                .style(Style::default().bg(theme.modal_bg))
                .padding(ratatui::widgets::Padding::uniform(1)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, overlay_area);
}
