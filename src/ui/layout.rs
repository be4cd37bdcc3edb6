use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const SIDEBAR_EXPANDED_WIDTH: u16 = 26;
pub const SIDEBAR_COLLAPSED_WIDTH: u16 = 7;
const PROFILE_CARD_HEIGHT: u16 = 5;

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Rect,
    /// Brand plus navigation rows
    pub sidebar_nav: Rect,
    /// Empty when collapsed
    pub profile_card: Rect,
    pub content: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

/// Where a click inside the sidebar landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarHit {
    Brand,
    Entry(usize),
}

pub fn areas(size: Rect, sidebar_expanded: bool) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size);

    let sidebar_width = if sidebar_expanded {
        SIDEBAR_EXPANDED_WIDTH
    } else {
        SIDEBAR_COLLAPSED_WIDTH
    };
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
        .split(vertical[1]);

    let card = if sidebar_expanded { PROFILE_CARD_HEIGHT } else { 0 };
    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(card)])
        .split(main_chunks[0]);

    UiAreas {
        size,
        header: vertical[0],
        main: vertical[1],
        sidebar: main_chunks[0],
        sidebar_nav: sidebar_chunks[0],
        profile_card: sidebar_chunks[1],
        content: main_chunks[1],
        status_line: vertical[2],
        command_line: vertical[3],
    }
}

pub fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

pub fn rect_inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}

/// Row 0 of the bordered nav block is the brand, row 1 a spacer, then one
/// row per entry.
pub fn sidebar_hit(areas: &UiAreas, entries: usize, col: u16, row: u16) -> Option<SidebarHit> {
    let inner = rect_inner(areas.sidebar_nav);
    if !rect_contains(inner, col, row) {
        return None;
    }
    let offset = row - inner.y;
    match offset {
        0 => Some(SidebarHit::Brand),
        1 => None,
        n => {
            let idx = (n - 2) as usize;
            (idx < entries).then_some(SidebarHit::Entry(idx))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_width_follows_flag() {
        let size = Rect::new(0, 0, 120, 40);
        assert_eq!(areas(size, true).sidebar.width, SIDEBAR_EXPANDED_WIDTH);
        let collapsed = areas(size, false);
        assert_eq!(collapsed.sidebar.width, SIDEBAR_COLLAPSED_WIDTH);
        assert_eq!(collapsed.profile_card.height, 0);
        assert_eq!(collapsed.content.x, SIDEBAR_COLLAPSED_WIDTH);
    }

    #[test]
    fn test_sidebar_hits() {
        let ui = areas(Rect::new(0, 0, 120, 40), true);
        let top = ui.sidebar_nav.y + 1;
        assert_eq!(sidebar_hit(&ui, 6, 2, top), Some(SidebarHit::Brand));
        assert_eq!(sidebar_hit(&ui, 6, 2, top + 1), None);
        assert_eq!(sidebar_hit(&ui, 6, 2, top + 2), Some(SidebarHit::Entry(0)));
        assert_eq!(sidebar_hit(&ui, 6, 2, top + 7), Some(SidebarHit::Entry(5)));
        assert_eq!(sidebar_hit(&ui, 6, 2, top + 8), None);
        assert_eq!(sidebar_hit(&ui, 6, 60, top + 2), None);
    }
}
