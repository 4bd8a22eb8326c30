use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::prelude::*;
use ratatui::widgets::{Cell, Paragraph, Row, Table, Wrap};
use tui_input::Input;

use crate::app::AppMode;
use crate::models::{Room, RoomFilter, RoomRegistry};

/// Build the badge cell: AC, Washroom and Occupied markers
fn badge_line<'a>(room: &Room, occupied: bool, theme: &'a super::Theme) -> Line<'a> {
    let mut spans = Vec::new();
    for badge in room.amenity_badges() {
        let style = if badge == "AC" {
            theme.badge_ac
        } else {
            theme.badge_washroom
        };
        spans.push(Span::styled(format!("[{}]", badge), style));
        spans.push(Span::raw(" "));
    }
    if occupied {
        spans.push(Span::styled("[Occupied]", theme.badge_occupied));
    }
    Line::from(spans)
}

/// Render one table row per room
fn render_room_rows<'a>(
    rooms: &[&Room],
    registry: &RoomRegistry,
    selected: usize,
    theme: &'a super::Theme,
) -> Vec<Row<'a>> {
    rooms
        .iter()
        .enumerate()
        .map(|(i, room)| {
            let is_selected = i == selected;
            let occupied = registry.is_allocated(&room.room_no);

            let text_style = if is_selected {
                theme.room_text_selected
            } else if occupied {
                theme.room_occupied
            } else {
                theme.room_text
            };

            let status = if occupied { "Occupied" } else { "Available" };

            let row = Row::new(vec![
                Cell::from(Span::styled(format!("{:3}", i + 1), theme.room_number)),
                Cell::from(Span::styled(format!("Room {}", room.room_no), text_style)),
                Cell::from(Span::styled(room.capacity_label(), text_style)),
                Cell::from(Span::styled(status, text_style)),
                Cell::from(badge_line(room, occupied, theme)),
            ]);

            if is_selected {
                row.style(Style::default().bg(theme.selection_bg))
            } else {
                row
            }
        })
        .collect()
}

/// Context for rendering the room list
pub struct RoomListRenderContext<'a> {
    pub selected: usize,
    pub mode: AppMode,
    pub search_input: &'a Input,
    pub filter: &'a RoomFilter,
    pub registry: &'a RoomRegistry,
    pub total_rooms: usize,
    pub theme: &'a super::Theme,
}

/// Render the room list with a header line (title or search, filters, count)
pub fn render_room_list(frame: &mut Frame, area: Rect, rooms: &[&Room], ctx: RoomListRenderContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Spacing
            Constraint::Min(1),    // List
        ])
        .split(area);

    let header_area = chunks[0];
    let list_area = chunks[2];

    let count_text = if rooms.len() == ctx.total_rooms {
        format!("{} rooms", rooms.len())
    } else {
        format!("{} of {} rooms", rooms.len(), ctx.total_rooms)
    };

    let search_query = ctx.search_input.value();
    let criteria = ctx.filter.describe();
    let (header_left, header_style) =
        if matches!(ctx.mode, AppMode::Search) || !search_query.is_empty() {
            (format!("/ {}", search_query), ctx.theme.search_input)
        } else if !criteria.is_empty() {
            (format!("Rooms [{}]", criteria), ctx.theme.search_input)
        } else {
            ("Rooms".to_string(), ctx.theme.list_header)
        };

    let search_line_bg = if matches!(ctx.mode, AppMode::Search) {
        ctx.theme.search_focused_bg
    } else {
        ctx.theme.panel_bg
    };

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(count_text.len() as u16),
        ])
        .split(header_area);

    // Show active criteria next to the search text too
    let header_line = if !search_query.is_empty() && !criteria.is_empty() {
        Line::from(vec![
            Span::styled(header_left, header_style),
            Span::styled(format!("  [{}]", criteria), ctx.theme.list_header),
        ])
    } else {
        Line::from(Span::styled(header_left, header_style))
    };

    frame.render_widget(
        Paragraph::new(header_line).style(Style::default().bg(search_line_bg)),
        header_chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(count_text, ctx.theme.list_item_count))
            .style(Style::default().bg(ctx.theme.panel_bg)),
        header_chunks[2],
    );

    if rooms.is_empty() {
        let hint = if ctx.total_rooms == 0 {
            "Add rooms with 'a'"
        } else {
            "Clear the search or filters with Esc"
        };
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "No rooms found",
                ctx.theme.empty_state.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(hint, ctx.theme.empty_state)),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(empty, list_area);
    } else {
        let rows = render_room_rows(rooms, ctx.registry, ctx.selected, ctx.theme);

        let widths = [
            Constraint::Length(3),  // Number
            Constraint::Min(10),    // Room number
            Constraint::Length(11), // Capacity
            Constraint::Length(9),  // Status
            Constraint::Length(26), // Badges
        ];
        let table = Table::new(rows, widths).style(Style::default().bg(ctx.theme.panel_bg));

        let mut table_state = ratatui::widgets::TableState::default();
        table_state.select(Some(ctx.selected));

        frame.render_stateful_widget(table, list_area, &mut table_state);
    }

    if matches!(ctx.mode, AppMode::Search) {
        let cursor_x = header_area.x + "/ ".len() as u16 + ctx.search_input.visual_cursor() as u16;
        frame.set_cursor_position(Position::new(cursor_x, header_area.y));
    }
}
