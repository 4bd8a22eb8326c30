use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use super::Theme;
use crate::app::Outcome;
use crate::form::{FieldValue, Form};
use crate::logging::FlashMessage;
use crate::models::Room;

/// Everything the side panel may show
pub struct SidePanelContext<'a> {
    pub form: Option<&'a Form>,
    pub outcome: Option<&'a Outcome>,
    pub selected: Option<&'a Room>,
    pub selected_allocated: bool,
    pub flash_messages: &'a [FlashMessage],
    pub theme: &'a Theme,
}

/// Render the side panel: open form or selected room, then the result box,
/// then notifications at the bottom
pub fn render_side_panel(frame: &mut Frame, area: Rect, ctx: SidePanelContext) {
    let flash_height = ctx.flash_messages.len().min(5) as u16;
    let outcome_height = ctx
        .outcome
        .map(|o| o.details.len() as u16 + 3)
        .unwrap_or(0);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(outcome_height),
            Constraint::Length(flash_height),
        ])
        .split(area);

    match ctx.form {
        Some(form) => render_form(frame, chunks[0], form, ctx.theme),
        None => render_room_details(
            frame,
            chunks[0],
            ctx.selected,
            ctx.selected_allocated,
            ctx.theme,
        ),
    }

    if let Some(outcome) = ctx.outcome {
        render_outcome(frame, chunks[1], outcome, ctx.theme);
    }

    if flash_height > 0 {
        render_flash_messages(frame, chunks[2], ctx.flash_messages, ctx.theme);
    }
}

fn render_room_details(
    frame: &mut Frame,
    area: Rect,
    room: Option<&Room>,
    allocated: bool,
    theme: &Theme,
) {
    let Some(room) = room else {
        let msg = Paragraph::new("No selection").style(theme.panel_label.bg(theme.panel_bg));
        frame.render_widget(msg, area);
        return;
    };

    let yes_no = |b: bool| if b { "Yes" } else { "No" };
    let (status, status_style) = if allocated {
        ("Occupied", theme.error)
    } else {
        ("Available", theme.success)
    };

    let lines = vec![
        Line::from(Span::styled(format!("Room {}", room.room_no), theme.panel_title)),
        Line::default(),
        detail_line("Capacity", room.capacity_label(), theme.panel_value, theme),
        detail_line("AC", yes_no(room.has_ac).to_string(), theme.panel_value, theme),
        detail_line(
            "Washroom",
            yes_no(room.has_attached_washroom).to_string(),
            theme.panel_value,
            theme,
        ),
        detail_line("Status", status.to_string(), status_style, theme),
    ];

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(theme.panel_bg))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn detail_line<'a>(label: &'a str, value: String, value_style: Style, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), theme.panel_label),
        Span::styled(value, value_style),
    ])
}

/// Render a form with the focused field highlighted
pub fn render_form(frame: &mut Frame, area: Rect, form: &Form, theme: &Theme) {
    const LABEL_WIDTH: usize = 20;

    let mut lines = vec![
        Line::from(Span::styled(form.kind.title(), theme.panel_title)),
        Line::default(),
    ];

    let mut cursor = None;

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focused;
        let label_style = if focused {
            theme.field_focused
        } else {
            theme.panel_label
        };
        let marker = if focused { "› " } else { "  " };
        let label = format!("{}{}", marker, field.label);
        let padding = LABEL_WIDTH.saturating_sub(label.width());

        let value = match &field.value {
            FieldValue::Text(input) => {
                if focused {
                    cursor = Some((
                        (LABEL_WIDTH + 1 + input.visual_cursor()) as u16,
                        lines.len() as u16,
                    ));
                }
                Span::styled(format!("[{}]", input.value()), theme.panel_value)
            }
            FieldValue::Toggle(on) => {
                let mark = if *on { "[x]" } else { "[ ]" };
                Span::styled(mark, theme.panel_value)
            }
        };

        lines.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::raw(" ".repeat(padding)),
            value,
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("Enter", theme.status_key),
        Span::styled(format!(" {}", form.kind.submit_label()), theme.panel_label),
    ]));

    let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.panel_bg));
    frame.render_widget(paragraph, area);

    if let Some((x, y)) = cursor
        && x < area.width
        && y < area.height
    {
        frame.set_cursor_position(Position::new(area.x + x, area.y + y));
    }
}

fn render_outcome(frame: &mut Frame, area: Rect, outcome: &Outcome, theme: &Theme) {
    let style = if outcome.success {
        theme.success
    } else {
        theme.error
    };

    let mut lines = vec![Line::from(Span::styled(
        outcome.headline.as_str(),
        style.add_modifier(Modifier::BOLD),
    ))];
    for detail in &outcome.details {
        lines.push(Line::from(Span::styled(detail.as_str(), theme.panel_value)));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::TOP).border_style(style))
        .style(Style::default().bg(theme.panel_bg))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_flash_messages(frame: &mut Frame, area: Rect, messages: &[FlashMessage], theme: &Theme) {
    let lines: Vec<Line> = messages
        .iter()
        .rev()
        .take(area.height as usize)
        .map(|msg| {
            let style = if msg.is_error() {
                theme.error
            } else {
                theme.success
            };
            Line::from(Span::styled(msg.message.as_str(), style))
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme.panel_bg)),
        area,
    );
}
