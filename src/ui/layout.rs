use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the main screen
#[derive(Debug, Clone, Copy)]
pub struct MainLayout {
    pub stats: Rect,
    pub list: Rect,
    pub divider: Rect,
    pub side: Rect,
    pub hints: Rect,
}

/// Create main application layout: stats bar on top, room list and side
/// panel in the middle, keyboard hints at the bottom
pub fn create_main_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Stats bar
            Constraint::Length(1), // Spacing
            Constraint::Min(3),    // Main content area
            Constraint::Length(1), // Spacing before hints
            Constraint::Length(1), // Keyboard hints bar
        ])
        .split(area);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Room list (left)
            Constraint::Length(3),      // Divider line with padding
            Constraint::Min(20),        // Side panel (right)
        ])
        .split(main_chunks[2]);

    MainLayout {
        stats: main_chunks[0],
        list: content_chunks[0],
        divider: content_chunks[1],
        side: content_chunks[2],
        hints: main_chunks[4],
    }
}

/// Create centered rectangle for popups/overlays
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fills_area() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = create_main_layout(area);

        assert_eq!(layout.stats.y, 0);
        assert_eq!(layout.hints.y, 29);
        assert_eq!(layout.list.height, 26);
        assert_eq!(layout.list.width + layout.divider.width + layout.side.width, 100);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 25);
    }
}
