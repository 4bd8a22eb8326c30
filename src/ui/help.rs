use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use super::Theme;
use super::layout::centered_rect;

struct HelpSection {
    title: &'static str,
    items: &'static [(&'static [&'static str], &'static str)],
}

const HELP_SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Navigation",
        items: &[
            (&["k", "↑", "j", "↓"], "Move up/down"),
            (&["Home", "End"], "Jump to top/bottom"),
        ],
    },
    HelpSection {
        title: "Rooms",
        items: &[
            (&["a"], "Add a room"),
            (&["o"], "Allocate the best-fitting free room"),
            (&["r"], "Free an allocated room"),
            (&["d"], "Delete selected room"),
            (&["x"], "Dismiss result"),
        ],
    },
    HelpSection {
        title: "Forms",
        items: &[
            (&["Tab", "S-Tab"], "Next/previous field"),
            (&["Space"], "Toggle checkbox"),
            (&["Enter"], "Submit"),
            (&["Esc"], "Cancel"),
        ],
    },
    HelpSection {
        title: "Search & Filter",
        items: &[
            (&["/"], "Search by room number"),
            (&["C"], "Cycle capacity filter (1, 2, 3, 4+)"),
            (&["A"], "Cycle AC filter (yes, no)"),
            (&["W"], "Cycle washroom filter (yes, no)"),
            (&["Esc"], "Clear search, then filters"),
        ],
    },
    HelpSection {
        title: "General",
        items: &[(&["?"], "Show/hide this help"), (&["q"], "Quit")],
    },
];

/// Add one section with a fixed-width key column
fn add_help_content<'a>(content: &mut Vec<Line<'a>>, section: &HelpSection, theme: &Theme) {
    const KEY_COLUMN_WIDTH: usize = 16;

    content.push(Line::from(Span::styled(section.title, theme.help_header)));
    content.push(Line::default());

    for (keys, description) in section.items {
        let mut line_spans = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                line_spans.push(Span::styled(
                    "/",
                    theme.help_desc.add_modifier(Modifier::DIM),
                ));
            }
            line_spans.push(Span::styled(*key, theme.help_key));
        }

        let keys_width = keys.join("/").width();
        line_spans.push(Span::raw(
            " ".repeat(KEY_COLUMN_WIDTH.saturating_sub(keys_width)),
        ));
        line_spans.push(Span::styled(*description, theme.help_desc));

        content.push(Line::from(line_spans));
    }

    content.push(Line::default());
}

/// Render help overlay with keybindings
pub fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let overlay_area = centered_rect(60, 80, area);

    frame.render_widget(Clear, overlay_area);

    let mut content = vec![
        Line::from(Span::styled("Help", theme.help_title)),
        Line::default(),
    ];

    for section in HELP_SECTIONS {
        add_help_content(&mut content, section, theme);
    }

    content.push(Line::from(Span::styled(
        "Press ?/Esc to close",
        theme.help_footer,
    )));

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .style(Style::default().bg(theme.modal_bg))
                .padding(ratatui::widgets::Padding::uniform(2)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, overlay_area);
}
